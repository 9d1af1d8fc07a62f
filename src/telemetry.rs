//! Logging initialization.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::{self, Write};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Installs the global tracing subscriber.
///
/// Logs go to stdout, or are appended to `LOG_PATH` when it is set. Either way
/// they pass through a non-blocking writer; the returned guard must be kept
/// alive until shutdown so buffered lines get flushed.
///
/// # Errors
///
/// Returns an error if the log filter is invalid, the log file cannot be
/// opened, or a global subscriber is already installed.
pub fn init_tracing(config: &Config) -> Result<WorkerGuard> {
    let filter = EnvFilter::try_new(&config.log_level)
        .with_context(|| format!("Invalid log filter '{}'", config.log_level))?;

    let writer: Box<dyn Write + Send + Sync> = match &config.log_path {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file '{path}'"))?;
            Box::new(file)
        }
        None => Box::new(io::stdout()),
    };

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking_writer)
        .with_ansi(config.log_path.is_none());

    let installed = if config.log_format == "json" {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_init_tracing_writes_to_log_file() {
        let path = std::env::temp_dir().join(format!("cleanlink-test-{}.log", std::process::id()));
        let _ = fs::remove_file(&path);

        let config = Config {
            log_path: Some(path.to_string_lossy().into_owned()),
            log_format: "json".to_string(),
            ..Config::default()
        };

        let guard = init_tracing(&config).unwrap();
        tracing::info!(code = "aB3xYz", "Short link created");
        drop(guard);

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Short link created"));
        assert!(contents.contains("aB3xYz"));

        // a second subscriber cannot be installed
        assert!(init_tracing(&config).is_err());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_init_tracing_rejects_bad_filter() {
        let config = Config {
            log_level: "cleanlink=loud".to_string(),
            ..Config::default()
        };

        assert!(init_tracing(&config).is_err());
    }

    #[test]
    fn test_init_tracing_rejects_unopenable_log_file() {
        let config = Config {
            log_path: Some("/nonexistent-dir/cleanlink/app.log".to_string()),
            ..Config::default()
        };

        let err = init_tracing(&config).unwrap_err();
        assert!(err.to_string().contains("Failed to open log file"));
    }
}
