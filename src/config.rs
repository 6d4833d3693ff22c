//! Command-line configuration (A3 in SPEC_FULL.md).
//!
//! CLI flags over a YAML config file: there is no cluster-wide config
//! object to load here, only the buffer policy and loop cadence, and
//! those are small enough that `clap` derive is the whole story.

use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use crate::core::resources::ResourceVector;
use crate::metrics::OutputFormat;
use crate::reconciler::BufferPolicy;

#[derive(Debug, Parser)]
#[command(name = "fleet-autoscaler", about = "Resizes cloud scaling groups to match observed workload")]
pub struct Cli {
    /// Run a single reconciliation pass and exit, instead of looping.
    #[arg(long)]
    pub once: bool,

    /// Compute and log resize decisions without calling set_desired_capacity.
    #[arg(long)]
    pub dry_run: bool,

    /// Seconds between reconciliation passes.
    #[arg(long, default_value_t = 60)]
    pub interval_seconds: u64,

    #[arg(long, default_value_t = 10.0)]
    pub buffer_cpu_percentage: f64,
    #[arg(long, default_value_t = 10.0)]
    pub buffer_memory_percentage: f64,
    #[arg(long, default_value_t = 10.0)]
    pub buffer_pods_percentage: f64,

    #[arg(long, default_value_t = 0.2)]
    pub buffer_cpu_fixed: f64,
    #[arg(long, default_value_t = 209_715_200.0)]
    pub buffer_memory_fixed: f64,
    #[arg(long, default_value_t = 10.0)]
    pub buffer_pods_fixed: f64,

    /// Minimum log level (error, warn, info, debug, trace).
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Append logs to this file (rotated) instead of stderr only.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Write a metrics snapshot to this path after every pass.
    #[arg(long)]
    pub metrics_output: Option<PathBuf>,

    /// Metrics output format: json or table.
    #[arg(long, default_value = "json")]
    pub metrics_format: String,
}

impl Cli {
    pub fn log_level_filter(&self) -> LevelFilter {
        match self.log_level.to_lowercase().as_str() {
            "error" => LevelFilter::Error,
            "warn" => LevelFilter::Warn,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            _ => LevelFilter::Info,
        }
    }

    pub fn metrics_output_format(&self) -> OutputFormat {
        match self.metrics_format.to_lowercase().as_str() {
            "table" | "pretty" | "pretty_table" => OutputFormat::PrettyTable,
            _ => OutputFormat::Json,
        }
    }

    pub fn buffer_policy(&self) -> BufferPolicy {
        let mut percentage = ResourceVector::new();
        percentage.set("cpu", self.buffer_cpu_percentage);
        percentage.set("memory", self.buffer_memory_percentage);
        percentage.set("pods", self.buffer_pods_percentage);

        let mut fixed = ResourceVector::new();
        fixed.set("cpu", self.buffer_cpu_fixed);
        fixed.set("memory", self.buffer_memory_fixed);
        fixed.set("pods", self.buffer_pods_fixed);

        BufferPolicy { percentage, fixed }
    }
}
