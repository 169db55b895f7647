//! Structured logging of git invocations.
//!
//! The library only emits `tracing` events. Applications that want them
//! recorded install a subscriber once with [`init`].

use crate::config::{LogFormat, LoggerConfig};
use crate::error::GitError;
use crate::types::Result;
use std::fs;
use std::path::Path;
use tracing::{error, info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Records one git invocation with its arguments, outcome and captured output.
pub fn log_git_operation(
    operation: &str,
    args: &[String],
    work_dir: &Path,
    success: bool,
    output: &str,
    err: Option<&GitError>,
) {
    let work_dir = work_dir.display();
    match err {
        Some(e) => error!(
            operation,
            ?args,
            %work_dir,
            success,
            output,
            error = %e,
            "Git operation failed"
        ),
        None => info!(
            operation,
            ?args,
            %work_dir,
            success,
            output,
            "Git operation completed"
        ),
    }
}

/// Maps a configured level name to a `tracing` level. Unknown names mean `info`.
pub fn parse_level(level: &str) -> Level {
    match level.trim().to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Installs the global subscriber described by `config`.
///
/// `RUST_LOG` takes precedence over the configured level. With a `file_path`
/// events are appended to that file through a non-blocking writer; the
/// returned guard must be kept alive to flush it. Without one they go to
/// stderr. Fails if a global subscriber is already installed.
pub fn init(config: &LoggerConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(parse_level(&config.level).as_str().to_lowercase()));

    match &config.file_path {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            fs::create_dir_all(dir).map_err(|e| {
                GitError::Config(format!("failed to create log directory {}: {}", dir.display(), e))
            })?;
            let file_name = path
                .file_name()
                .ok_or_else(|| GitError::Config(format!("invalid log file path: {}", path.display())))?;

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            let installed = match config.format {
                LogFormat::Json => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().json().with_writer(writer).with_ansi(false))
                    .try_init(),
                LogFormat::Pretty => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().with_writer(writer).with_ansi(false))
                    .try_init(),
            };
            installed.map_err(|e| GitError::Config(e.to_string()))?;
            Ok(Some(guard))
        }
        None => {
            let installed = match config.format {
                LogFormat::Json => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().json().with_writer(std::io::stderr))
                    .try_init(),
                LogFormat::Pretty => tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
                    .try_init(),
            };
            installed.map_err(|e| GitError::Config(e.to_string()))?;
            Ok(None)
        }
    }
}
