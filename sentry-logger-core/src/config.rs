//! Configuration loading and management
//!
//! Two sources feed the configuration:
//! - The process environment supplies the connection: `SENTRY_DSN` (required)
//!   and `ENVIRONMENT` (optional, defaults to `development`).
//! - An optional TOML file at `$XDG_CONFIG_HOME/sentry-logger/config.toml`
//!   tunes the reporter client and logging.
//!
//! Logs follow the XDG Base Directory Specification:
//! - State/Logs: `$XDG_STATE_HOME/sentry-logger/` (~/.local/state/sentry-logger/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable holding the reporter DSN.
pub const DSN_VAR: &str = "SENTRY_DSN";

/// Environment variable holding the environment tag.
pub const ENVIRONMENT_VAR: &str = "ENVIRONMENT";

/// Environment tag used when `ENVIRONMENT` is unset.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Reporter client options
    #[serde(default)]
    pub reporter: ReporterConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Options passed to the error-tracking client at initialization.
#[derive(Debug, Deserialize, Clone)]
pub struct ReporterConfig {
    /// Attach personal data (IP, request headers) to events
    #[serde(default = "default_send_default_pii")]
    pub send_default_pii: bool,

    /// Fraction of transactions sent for performance monitoring
    #[serde(default = "default_sample_rate")]
    pub traces_sample_rate: f32,

    /// Fraction of transactions profiled
    #[serde(default = "default_sample_rate")]
    pub profiles_sample_rate: f32,

    /// Upper bound on the wait for pending events at shutdown
    #[serde(default = "default_flush_timeout")]
    pub flush_timeout_secs: u64,

    /// Release name (defaults to `sentry-logger@<version>`)
    pub release: Option<String>,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            send_default_pii: default_send_default_pii(),
            traces_sample_rate: default_sample_rate(),
            profiles_sample_rate: default_sample_rate(),
            flush_timeout_secs: default_flush_timeout(),
            release: None,
        }
    }
}

impl ReporterConfig {
    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        check_sample_rate("reporter.traces_sample_rate", self.traces_sample_rate)?;
        check_sample_rate("reporter.profiles_sample_rate", self.profiles_sample_rate)?;
        Ok(())
    }

    /// Release name reported with every event.
    pub fn release_name(&self) -> String {
        self.release
            .clone()
            .unwrap_or_else(|| format!("sentry-logger@{}", crate::VERSION))
    }

    /// Flush timeout as a [`std::time::Duration`].
    pub fn flush_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.flush_timeout_secs)
    }
}

fn check_sample_rate(name: &str, rate: f32) -> Result<()> {
    if (0.0..=1.0).contains(&rate) {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "{name} must be between 0.0 and 1.0, got {rate}"
        )))
    }
}

fn default_send_default_pii() -> bool {
    true
}

fn default_sample_rate() -> f32 {
    1.0
}

fn default_flush_timeout() -> u64 {
    2
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Mirror log lines to stderr
    #[serde(default = "default_true")]
    pub stderr: bool,

    /// Write log lines to the rolling file in the state directory
    #[serde(default = "default_true")]
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            stderr: true,
            file: true,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

/// Connection settings read from the process environment.
///
/// Read once at startup and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// Reporter DSN
    pub dsn: String,
    /// Environment tag attached to every event
    pub environment: String,
}

impl Connection {
    /// Read the connection from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the connection through an arbitrary variable lookup.
    ///
    /// An empty `SENTRY_DSN` counts as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dsn = lookup(DSN_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(Error::ConfigMissing(DSN_VAR))?;

        let environment = lookup(ENVIRONMENT_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());

        Ok(Self { dsn, environment })
    }
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::debug!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        Self::parse(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.reporter.validate()?;
        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/sentry-logger/config.toml` (~/.config/sentry-logger/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("sentry-logger").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/sentry-logger/` (~/.local/state/sentry-logger/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("sentry-logger")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/sentry-logger/sentry-logger.log`
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("sentry-logger.log")
    }
}
