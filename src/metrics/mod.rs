pub mod collector;
pub mod printer;

pub use collector::MetricsCollector;
pub use printer::{print_metrics, OutputFormat};
