//! # sentry-logger-core
//!
//! Core library for sentry-logger - an interactive demonstration of wiring
//! an application to an error-tracking service.
//!
//! This library provides:
//! - Domain types for simulated operations, failures and events
//! - A reporter seam with Sentry-backed and in-memory implementations
//! - The operation simulator and event logger
//! - The interactive menu loop
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sentry_logger_core::{Config, Connection, EventLogger, SentryReporter, Severity};
//!
//! let config = Config::load().expect("failed to load config");
//! let connection = Connection::from_env().expect("SENTRY_DSN is not set");
//! let reporter = Arc::new(
//!     SentryReporter::init(&connection, &config.reporter).expect("failed to init reporter"),
//! );
//!
//! let logger = EventLogger::new(reporter);
//! logger.log_event("hello", Severity::Info, None);
//! ```

// Re-export commonly used items at the crate root
pub use config::{Config, Connection};
pub use error::{Error, Result};
pub use events::EventLogger;
pub use interaction::{InteractionLoop, LoopExit, LoopState};
pub use reporter::{MemoryReporter, Reporter, SentryReporter};
pub use simulator::OperationSimulator;
pub use types::*;

// Public modules
pub mod config;
pub mod error;
pub mod events;
pub mod interaction;
pub mod logging;
pub mod reporter;
pub mod simulator;
pub mod types;

/// Version reported in the startup event and default release name.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
