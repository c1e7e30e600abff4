//! Environment-driven service configuration
//!
//! Three variables drive the service:
//! - `LOG_LEVEL` - one of DEBUG, INFO, WARNING, ERROR, CRITICAL (default INFO)
//! - `API_PORT` - TCP port for the HTTP listener (default 8000)
//! - `PROMETHEUS_METRICS_PREFIX` - namespace for exported metrics (default `defi_api_`)

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::info;

use crate::logging;

pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";
pub const API_PORT_VAR: &str = "API_PORT";
pub const METRICS_PREFIX_VAR: &str = "PROMETHEUS_METRICS_PREFIX";

pub const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;
pub const DEFAULT_API_PORT: u16 = 8000;
pub const DEFAULT_METRICS_PREFIX: &str = "defi_api_";

/// Errors raised while reading or validating the environment
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Valid 'LOG_LEVEL' values: DEBUG, INFO, WARNING, ERROR, CRITICAL (got '{0}')")]
    InvalidLogLevel(String),

    #[error("'API_PORT' must be an integer (got '{0}')")]
    InvalidPort(String),

    #[error("'API_PORT' must be between 1 and 65535 (got {0})")]
    PortOutOfRange(i64),

    #[error("'PROMETHEUS_METRICS_PREFIX' is not a valid metric name prefix: '{0}'")]
    InvalidMetricsPrefix(String),
}

/// Log verbosity accepted in `LOG_LEVEL`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }

    /// Directive understood by `tracing_subscriber::EnvFilter`
    ///
    /// tracing has no level above ERROR, so CRITICAL collapses into it.
    pub fn filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| ConfigError::InvalidLogLevel(s.to_string()))
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable configuration resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    log_level: LogLevel,
    api_port: u16,
    metrics_prefix: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL,
            api_port: DEFAULT_API_PORT,
            metrics_prefix: DEFAULT_METRICS_PREFIX.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load from the process environment and install logging
    ///
    /// Logging is initialized as soon as the level is known, so every
    /// later startup message is emitted at the configured verbosity.
    pub fn load() -> Result<Self, ConfigError> {
        let lookup = |key: &str| std::env::var(key).ok();

        let log_level = parse_log_level(&lookup)?;
        logging::init(log_level);

        info!("Checking configuration parameters");
        info!("[ENV] {}: {}", LOG_LEVEL_VAR, log_level);

        let config = Self::from_lookup(lookup)?;
        info!("[ENV] {}: {}", API_PORT_VAR, config.api_port);
        info!("[ENV] {}: {}", METRICS_PREFIX_VAR, config.metrics_prefix);
        info!("Successfully checked configuration parameters");

        Ok(config)
    }

    /// Parse configuration from an arbitrary key lookup
    ///
    /// Only unset variables fall back to defaults; a set-but-empty value is
    /// validated like any other.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_level = parse_log_level(&lookup)?;
        let api_port = parse_port(&lookup)?;
        let metrics_prefix = parse_metrics_prefix(&lookup)?;

        Ok(Self {
            log_level,
            api_port,
            metrics_prefix,
        })
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn api_port(&self) -> u16 {
        self.api_port
    }

    pub fn metrics_prefix(&self) -> &str {
        &self.metrics_prefix
    }
}

fn parse_log_level<F>(lookup: &F) -> Result<LogLevel, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(LOG_LEVEL_VAR) {
        Some(value) => value.parse(),
        None => Ok(DEFAULT_LOG_LEVEL),
    }
}

/// Surrounding whitespace is tolerated, an empty value is not
fn parse_port<F>(lookup: &F) -> Result<u16, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(API_PORT_VAR) else {
        return Ok(DEFAULT_API_PORT);
    };

    let port: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidPort(raw.clone()))?;
    match u16::try_from(port) {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(ConfigError::PortOutOfRange(port)),
    }
}

fn parse_metrics_prefix<F>(lookup: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let prefix = lookup(METRICS_PREFIX_VAR)
        .unwrap_or_else(|| DEFAULT_METRICS_PREFIX.to_string());

    if is_valid_metric_prefix(&prefix) {
        Ok(prefix)
    } else {
        Err(ConfigError::InvalidMetricsPrefix(prefix))
    }
}

/// Prometheus metric names match `[a-zA-Z_:][a-zA-Z0-9_:]*`
fn is_valid_metric_prefix(prefix: &str) -> bool {
    let mut chars = prefix.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
