//! Tracing setup for the embedding application: stdout always, plus an
//! optional daily-rolling log file.

use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "engtutor.log";

/// Keeps the background log writer alive; dropping it flushes remaining
/// output.
pub struct LogGuard {
    _worker: WorkerGuard,
}

/// Installs the global subscriber. `log_dir` of `None` logs to stdout only;
/// otherwise a daily-rolling file under that directory is added. Returns a
/// guard the caller must hold for the file writer to flush.
pub fn init_tracing(log_level: &str, log_dir: Option<&Path>) -> Option<LogGuard> {
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(true);
    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer);

    match log_dir.and_then(rolling_writer) {
        Some((writer, worker)) => {
            registry
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .init();
            Some(LogGuard { _worker: worker })
        }
        None => {
            registry.init();
            None
        }
    }
}

fn rolling_writer(dir: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    if let Err(err) = std::fs::create_dir_all(dir) {
        eprintln!("failed to create log directory {}: {err}", dir.display());
        return None;
    }
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
    Some(tracing_appender::non_blocking(appender))
}
