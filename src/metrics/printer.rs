//! Dual-format metrics printer (JSON / pretty table), structurally
//! descended from the teacher's own `metrics/printer.rs`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use prettytable::{row, Table};
use serde::Serialize;

use crate::metrics::collector::MetricsCollector;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    PrettyTable,
}

pub fn print_metrics(
    metrics: &MetricsCollector,
    format: OutputFormat,
    output_file: &Path,
) -> std::io::Result<()> {
    match format {
        OutputFormat::PrettyTable => print_as_pretty_table(metrics, output_file),
        OutputFormat::Json => print_as_json(metrics, output_file),
    }
}

fn print_as_pretty_table(metrics: &MetricsCollector, output_file: &Path) -> std::io::Result<()> {
    let mut file = File::create(output_file)?;

    let mut counters = Table::new();
    counters.add_row(row!["Metric", "Count"]);
    counters.add_row(row!["Total passes", metrics.total_passes]);
    counters.add_row(row!["Total pass errors", metrics.total_pass_errors]);
    counters.add_row(row!["Total scale ups", metrics.total_scale_ups]);
    counters.add_row(row!["Total scale downs", metrics.total_scale_downs]);
    counters.add_row(row![
        "Total constrained resizes",
        metrics.total_constrained_resizes
    ]);

    let mut durations = Table::new();
    durations.add_row(row!["Metric", "Min", "Max", "Mean", "Variance"]);
    durations.add_row(row![
        "Pass duration (s)",
        metrics.pass_duration_stats.min(),
        metrics.pass_duration_stats.max(),
        metrics.pass_duration_stats.mean(),
        metrics.pass_duration_stats.population_variance()
    ]);

    counters.print(&mut file)?;
    durations.print(&mut file)?;
    Ok(())
}

#[derive(Serialize)]
struct MetricsJson {
    counters: CountersJson,
    pass_duration_seconds: DurationStatsJson,
}

#[derive(Serialize)]
struct CountersJson {
    total_passes: u64,
    total_pass_errors: u64,
    total_scale_ups: u64,
    total_scale_downs: u64,
    total_constrained_resizes: u64,
}

#[derive(Serialize)]
struct DurationStatsJson {
    min: f64,
    max: f64,
    mean: f64,
    variance: f64,
}

fn print_as_json(metrics: &MetricsCollector, output_file: &Path) -> std::io::Result<()> {
    let mut file = File::create(output_file)?;
    let json = MetricsJson {
        counters: CountersJson {
            total_passes: metrics.total_passes,
            total_pass_errors: metrics.total_pass_errors,
            total_scale_ups: metrics.total_scale_ups,
            total_scale_downs: metrics.total_scale_downs,
            total_constrained_resizes: metrics.total_constrained_resizes,
        },
        pass_duration_seconds: DurationStatsJson {
            min: metrics.pass_duration_stats.min(),
            max: metrics.pass_duration_stats.max(),
            mean: metrics.pass_duration_stats.mean(),
            variance: metrics.pass_duration_stats.population_variance(),
        },
    };
    let serialized = serde_json::to_string_pretty(&json)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
    file.write_all(serialized.as_bytes())
}
