use std::io::Write as _;
use std::time::Duration;

use clap::Parser;
use file_rotate::{compression::Compression, suffix::AppendCount, ContentLimit, FileRotate};
use log::{error, info};
use tokio::signal::unix::{signal, SignalKind};

use fleet_autoscaler::clients::aws_client::AwsScalingGroupClient;
use fleet_autoscaler::clients::kube_client::KubeClusterObserver;
use fleet_autoscaler::config::Cli;
use fleet_autoscaler::metrics::{print_metrics, MetricsCollector};
use fleet_autoscaler::reconciler::run_once;

const ROTATED_LOG_FILES: usize = 5;
const ROTATED_LOG_LINES: usize = 10_000;

fn init_logging(cli: &Cli) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(cli.log_level_filter());

    match &cli.log_file {
        Some(path) => {
            let rotated = FileRotate::new(
                path,
                AppendCount::new(ROTATED_LOG_FILES),
                ContentLimit::Lines(ROTATED_LOG_LINES),
                Compression::None,
                None,
            );
            builder.target(env_logger::Target::Pipe(Box::new(rotated)));
        }
        None => {
            builder.target(env_logger::Target::Stderr);
        }
    }

    builder.init();
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let observer = match KubeClusterObserver::new().await {
        Ok(observer) => observer,
        Err(err) => {
            error!("failed to build cluster client: {err}");
            std::process::exit(1);
        }
    };
    let scaling_client = AwsScalingGroupClient::new().await;
    let buffer = cli.buffer_policy();

    let mut metrics = MetricsCollector::new();
    let interval = Duration::from_secs(cli.interval_seconds);

    // Runs as a pod inside the cluster it manages (spec.md §6's
    // in-cluster credential path), so the orchestrator sends SIGTERM on
    // shutdown, not SIGINT; ctrl-c is kept for interactive/local runs.
    let mut sigterm = signal(SignalKind::terminate())
        .expect("failed to install SIGTERM handler");

    loop {
        let _ = run_once(&observer, &scaling_client, &buffer, cli.dry_run, &mut metrics).await;

        if let Some(output_path) = &cli.metrics_output {
            if let Err(err) = print_metrics(&metrics, cli.metrics_output_format(), output_path) {
                error!("failed to write metrics to {output_path:?}: {err}");
            }
        }

        if cli.once {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("received ctrl-c, shutting down");
                break;
            }
            _ = sigterm.recv() => {
                info!("received SIGTERM, shutting down");
                break;
            }
        }
    }

    std::io::stdout().flush()
}
