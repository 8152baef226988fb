//! Logging initialization.
//!
//! Logs go to a daily rolling file under the platform data directory so they
//! never interleave with the interactive prompts. `RUST_LOG` overrides the
//! default filter (e.g. `huffman_cli=debug`).

use std::path::PathBuf;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_NAME: &str = "huffman-cli.log";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Level used when `RUST_LOG` is not set.
    pub level: Level,
    /// Log directory; `None` means [`default_log_dir`].
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            dir: None,
        }
    }
}

/// `<data dir>/huffman-cli/logs`, or `./logs` when there is no data dir.
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("huffman-cli"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("logs")
}

fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("huffman_cli={}", level.as_str().to_lowercase()))
    })
}

/// Install the global subscriber.
///
/// Returns the writer guard; keep it alive for the life of the process or
/// buffered lines are lost. Returns `None` (and logs nowhere) if the log
/// directory cannot be created.
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let dir = config.dir.clone().unwrap_or_else(default_log_dir);
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("Warning: failed to create log directory {}: {}", dir.display(), e);
        return None;
    }

    let appender = RollingFileAppender::new(Rotation::DAILY, &dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false);

    let installed = tracing_subscriber::registry()
        .with(env_filter(config.level))
        .with(file_layer)
        .try_init();
    if installed.is_err() {
        return None;
    }

    tracing::info!(dir = %dir.display(), "Logging initialized");
    Some(guard)
}
