#![doc = include_str!("../README.md")]

mod config;
mod telemetry;
mod workload;

use clap::Parser;
use config::{CliArgs, LoadConfig, Precision};
use telemetry::init_telemetry;
use workload::LoadReport;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = LoadConfig::try_from(args)?;

    init_telemetry(config.log_format)?;
    log_startup_info(&config);

    let report = match config.precision {
        Precision::F32 => workload::run::<f32>(&config)?,
        Precision::F64 => workload::run::<f64>(&config)?,
    };
    log_report(&report);

    if report.succeeded() + report.failed() != config.total_tasks() {
        anyhow::bail!(
            "collected {} of {} results",
            report.succeeded() + report.failed(),
            config.total_tasks()
        );
    }

    Ok(())
}

fn log_startup_info(config: &LoadConfig) {
    if cfg!(debug_assertions) {
        tracing::info!("Starting load run with full config: {:#?}", config);
    } else {
        tracing::info!(
            "Starting load run: {} clients x {} {:?} tasks ({:?})",
            config.num_clients,
            config.tasks_per_client,
            config.workload,
            config.precision,
        );
    }
}

fn log_report(report: &LoadReport) {
    for (client, outcome) in report.clients.iter().enumerate() {
        tracing::debug!(
            client,
            succeeded = outcome.succeeded,
            failed = outcome.failed,
            timeouts = outcome.timeouts,
            checksum = outcome.checksum,
            "Client finished"
        );
    }

    tracing::info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        timeouts = report.timeouts(),
        checksum = report.checksum(),
        elapsed_ms = report.elapsed.as_millis() as u64,
        throughput = report.throughput(),
        "Load run finished"
    );
    tracing::info!(
        submitted = report.stats.submitted,
        completed = report.stats.completed,
        failed = report.stats.failed,
        "Server stats"
    );
}
