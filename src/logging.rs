//! Logging setup and configuration.

use tracing_appender::non_blocking::NonBlocking;
use tracing_appender::rolling::RollingFileAppender;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::Config;
use crate::error::AppError;

/// Sets up logging for the demo binary.
///
/// Console output goes to stderr so the REPL prompt on stdout stays clean;
/// a daily-rolling file under `config.logs_path` keeps a plain-text copy.
pub fn setup_logging(config: &Config) -> Result<(), AppError> {
    let file_writer = build_file_writer(config)?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("event_bus=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_ansi(true))
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .init();

    Ok(())
}

fn build_file_writer(config: &Config) -> Result<NonBlocking, AppError> {
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("event-bus")
        .filename_suffix("log")
        .max_log_files(7)
        .build(&config.logs_path)
        .map_err(|e| AppError::ConfigurationError {
            msg: format!(
                "Failed to initialize rolling file appender at '{}': {}",
                config.logs_path.to_string_lossy(),
                e
            ),
        })?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The writer stops flushing once the guard drops; keep it for the
    // lifetime of the process.
    std::mem::forget(guard);

    Ok(non_blocking)
}
