//! Error types for sentry-logger-core

use thiserror::Error;

/// Main error type for the sentry-logger-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error (console, log directory)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A required configuration value is not set
    #[error("{0} environment variable is not set")]
    ConfigMissing(&'static str),
}

/// Result type alias for sentry-logger-core
pub type Result<T> = std::result::Result<T, Error>;
