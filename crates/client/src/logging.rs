//! Tracing subscriber setup.

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::SimConfig;

/// Logs to stderr and, when a log directory is configured, to
/// `<log_dir>/<session_id>/sim.log`.
///
/// Keep the returned guard alive until exit so buffered file output is
/// flushed.
pub fn setup_logging(config: &SimConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match &config.log_dir {
        Some(log_dir) => {
            let session_log_dir = log_dir.join(&config.session_id);
            std::fs::create_dir_all(&session_log_dir).with_context(|| {
                format!("Failed to create log directory {}", session_log_dir.display())
            })?;
            let file_appender = tracing_appender::rolling::never(&session_log_dir, "sim.log");
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!(session = %config.session_id, "logging initialized");
    if let Some(log_dir) = &config.log_dir {
        tracing::info!(
            "Log file: {}",
            log_dir.join(&config.session_id).join("sim.log").display()
        );
    }
    Ok(guard)
}
