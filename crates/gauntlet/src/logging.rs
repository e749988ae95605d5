//! Log output.
//!
//! The game owns the terminal (raw mode, alternate screen), so nothing may be
//! printed to it while playing. Logs go to a daily-rotated file instead.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

const LOG_FILE_PREFIX: &str = "gauntlet";
const LOG_FILE_SUFFIX: &str = "log";

/// Initialize structured logging into files under `log_dir`.
///
/// `RUST_LOG` wins over `level`. Keep the returned guard alive for the whole
/// run; dropping it flushes whatever is still buffered.
pub fn init_logging(level: &str, json: bool, log_dir: &Path) -> Result<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let (writer, guard) = file_writer(log_dir)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer(writer, json))
        .init();

    Ok(guard)
}

fn file_writer(log_dir: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(log_dir)
        .context("Failed to open log file")?;

    Ok(tracing_appender::non_blocking(appender))
}

fn file_layer<S>(writer: NonBlocking, json: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    if json { layer.json().boxed() } else { layer.boxed() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gauntlet-{name}-{}", std::process::id()))
    }

    /// Log a couple of lines through a file layer and return what landed on disk
    fn capture(dir: &Path, json: bool) -> String {
        let (writer, guard) = file_writer(dir).unwrap();
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new("info"))
            .with(file_layer(writer, json));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(challenges = 3, "Session started");
            tracing::debug!("Below the filter");
        });
        drop(guard);

        let mut contents = String::new();
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            assert!(name.starts_with(LOG_FILE_PREFIX), "unexpected file {name}");
            contents.push_str(&std::fs::read_to_string(&path).unwrap());
        }
        std::fs::remove_dir_all(dir).ok();
        contents
    }

    #[test]
    fn test_logs_land_in_file() {
        let contents = capture(&scratch_dir("logs-text"), false);
        assert!(contents.contains("Session started"));
        assert!(contents.contains("challenges=3"));
        assert!(!contents.contains("Below the filter"));
        // Plain text only; no escape codes in the file
        assert!(!contents.contains('\x1b'));
    }

    #[test]
    fn test_json_logs_land_in_file() {
        let contents = capture(&scratch_dir("logs-json"), true);
        let line = contents.lines().next().unwrap();
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["fields"]["message"], "Session started");
        assert_eq!(value["level"], "INFO");
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = scratch_dir("logs-nested").join("deeper");
        let (_writer, guard) = file_writer(&dir).unwrap();
        drop(guard);
        assert!(dir.is_dir());
        std::fs::remove_dir_all(dir.parent().unwrap()).ok();
    }
}
