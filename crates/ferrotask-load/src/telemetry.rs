//! Log output for the load driver.
//!
//! Events are written to the console through `tracing_subscriber::fmt`, either
//! human-readable (`pretty`) or as JSON lines (`json`). Verbosity follows
//! `RUST_LOG` and defaults to `info`. The `ferrotask` library emits its own
//! lifecycle events (`info`), failed tasks (`debug`) and per-task dispatch
//! (`trace`) into the same subscriber.

use crate::config::LogFormat;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry(format: LogFormat) -> anyhow::Result<()> {
    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()));

    let layer = tracing_subscriber::fmt::layer()
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .with_target(false)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_file(true);

    match format {
        LogFormat::Pretty => registry.with(layer.pretty()).try_init()?,
        LogFormat::Json => registry.with(layer.json()).try_init()?,
    }

    Ok(())
}
