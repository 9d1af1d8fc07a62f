//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## Variables
//!
//! - `DATABASE_URL` - SQLite location (default: `sqlite://shortlinks.db`)
//! - `LISTEN` - Bind address (default: `0.0.0.0:8889`)
//! - `SHORT_DOMAIN` - Prefix of returned short URLs (default: `http://localhost`)
//! - `CACHE_EXPIRY` - Retention window in days (default: 30)
//! - `CODE_LENGTH` - Short code length (default: 6)
//! - `SWEEP_INTERVAL_SECONDS` - Period of the retention sweep (default: 86400)
//! - `DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `LOG_PATH` - Optional log file, written instead of stdout

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::utils::code_generator::DEFAULT_CODE_LENGTH;

const MIN_CODE_LENGTH: usize = 4;
const MAX_CODE_LENGTH: usize = 32;
const MAX_RETENTION_DAYS: u32 = 36_500;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    /// Display domain prepended to codes, e.g. `https://s.example.com`.
    pub short_domain: String,
    /// Links older than this many days are removed by the sweep.
    pub retention_days: u32,
    pub code_length: usize,
    pub sweep_interval_seconds: u64,
    pub db_max_connections: u32,
    pub log_level: String,
    pub log_format: String,
    pub log_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://shortlinks.db".to_string(),
            listen_addr: "0.0.0.0:8889".to_string(),
            short_domain: "http://localhost".to_string(),
            retention_days: 30,
            code_length: DEFAULT_CODE_LENGTH,
            sweep_interval_seconds: 24 * 60 * 60,
            db_max_connections: 5,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            log_path: None,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Unset variables fall back to [`Config::default`].
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            listen_addr: env::var("LISTEN").unwrap_or(defaults.listen_addr),
            short_domain: env::var("SHORT_DOMAIN")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.short_domain),
            retention_days: parse_var("CACHE_EXPIRY", defaults.retention_days)?,
            code_length: parse_var("CODE_LENGTH", defaults.code_length)?,
            sweep_interval_seconds: parse_var(
                "SWEEP_INTERVAL_SECONDS",
                defaults.sweep_interval_seconds,
            )?,
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            log_level: env::var("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: env::var("LOG_FORMAT").unwrap_or(defaults.log_format),
            log_path: env::var("LOG_PATH").ok().filter(|v| !v.is_empty()),
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `database_url` is not a `sqlite:` URL
    /// - `listen_addr` is not `host:port`
    /// - `code_length` is outside 4..=32
    /// - `retention_days` is outside 1..=36500
    /// - `sweep_interval_seconds` or `db_max_connections` is zero
    /// - `log_format` is not `text` or `json`
    pub fn validate(&self) -> Result<()> {
        if !self.database_url.starts_with("sqlite:") {
            anyhow::bail!(
                "DATABASE_URL must start with 'sqlite:', got '{}'",
                self.database_url
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&self.code_length) {
            anyhow::bail!(
                "CODE_LENGTH must be between {} and {}, got {}",
                MIN_CODE_LENGTH,
                MAX_CODE_LENGTH,
                self.code_length
            );
        }

        if !(1..=MAX_RETENTION_DAYS).contains(&self.retention_days) {
            anyhow::bail!(
                "CACHE_EXPIRY must be between 1 and {} days, got {}",
                MAX_RETENTION_DAYS,
                self.retention_days
            );
        }

        if self.sweep_interval_seconds == 0 {
            anyhow::bail!("SWEEP_INTERVAL_SECONDS must be greater than 0");
        }

        if self.db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        Ok(())
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }

    /// Logs a configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Database: {}", self.database_url);
        tracing::info!("  Short domain: {}", self.short_domain);
        tracing::info!("  Retention: {} days", self.retention_days);
        tracing::info!("  Code length: {}", self.code_length);
        tracing::info!("  Sweep interval: {}s", self.sweep_interval_seconds);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a number, got '{raw}'")),
        _ => Ok(default),
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a variable is malformed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
