//! Tracing subscriber setup

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::config::LogConfig;

/// File name prefix for daily-rolling log files
pub const LOG_FILE_NAME: &str = "modcheck.log";

/// Build the filter from RUST_LOG, falling back to the configured level.
pub fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the global subscriber.
///
/// Logs go to stderr unless `directory` is set, in which case they are
/// written to a daily-rolling file there. The returned guard flushes the
/// file writer on drop and must be held for the life of the process.
/// Installing twice is a no-op.
pub fn init(config: &LogConfig) -> Option<WorkerGuard> {
    let (writer, guard) = match &config.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(writer), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stderr), None),
    };

    let layer = if config.json {
        fmt::layer().json().with_writer(writer).boxed()
    } else {
        fmt::layer()
            .with_ansi(config.directory.is_none())
            .with_writer(writer)
            .boxed()
    };

    let _ = tracing_subscriber::registry()
        .with(layer)
        .with(env_filter(config))
        .try_init();

    guard
}
