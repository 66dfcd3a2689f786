//! Core domain types for sentry-logger
//!
//! These types describe the simulated operations, their outcomes and
//! failures, and the events handed to the reporter.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================
// Operations
// ============================================

/// One of the five simulated operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationVariant {
    DivideByZero,
    InvalidKeyAccess,
    TypeMismatch,
    CustomFailure,
    Success,
}

impl OperationVariant {
    /// All variants in menu order.
    pub const ALL: [OperationVariant; 5] = [
        OperationVariant::DivideByZero,
        OperationVariant::InvalidKeyAccess,
        OperationVariant::TypeMismatch,
        OperationVariant::CustomFailure,
        OperationVariant::Success,
    ];

    /// Stable name used in log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationVariant::DivideByZero => "divide_by_zero",
            OperationVariant::InvalidKeyAccess => "access_invalid_key",
            OperationVariant::TypeMismatch => "type_error",
            OperationVariant::CustomFailure => "custom_error",
            OperationVariant::Success => "successful_operation",
        }
    }

    /// Variant behind a "trigger specific error" sub-menu choice (1-4).
    pub fn from_error_choice(choice: &str) -> Option<Self> {
        match choice {
            "1" => Some(OperationVariant::DivideByZero),
            "2" => Some(OperationVariant::InvalidKeyAccess),
            "3" => Some(OperationVariant::TypeMismatch),
            "4" => Some(OperationVariant::CustomFailure),
            _ => None,
        }
    }
}

impl fmt::Display for OperationVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a simulated failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    ArithmeticError,
    KeyNotFound,
    TypeMismatch,
    ValidationError,
}

impl ErrorKind {
    /// Name shown to the operator and used as the reported exception type.
    pub fn display_name(&self) -> &'static str {
        match self {
            ErrorKind::ArithmeticError => "ZeroDivisionError",
            ErrorKind::KeyNotFound => "KeyError",
            ErrorKind::TypeMismatch => "TypeError",
            ErrorKind::ValidationError => "ValueError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Failure raised by a simulated operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct OperationFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl OperationFailure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Result payload of the successful operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationOutcome {
    /// Always `"success"`
    pub status: String,
    /// Local time the operation completed
    pub timestamp: NaiveDateTime,
}

impl OperationOutcome {
    pub const STATUS_SUCCESS: &'static str = "success";

    pub fn success(timestamp: NaiveDateTime) -> Self {
        Self {
            status: Self::STATUS_SUCCESS.to_string(),
            timestamp,
        }
    }

    /// ISO-8601 timestamp with microsecond precision.
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

impl fmt::Display for OperationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{'status': '{}', 'timestamp': '{}'}}",
            self.status,
            self.timestamp_iso()
        )
    }
}

/// Running counters kept by the simulator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SimulationStats {
    pub success_count: u64,
    pub failure_count: u64,
}

impl SimulationStats {
    pub fn total(&self) -> u64 {
        self.success_count + self.failure_count
    }
}

// ============================================
// Events
// ============================================

/// Severity of a reported message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// Parse operator input; empty or unrecognized input means [`Severity::Info`].
    pub fn parse_lenient(input: &str) -> Self {
        input.parse().unwrap_or_default()
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Severity> for sentry::Level {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Info => sentry::Level::Info,
            Severity::Warning => sentry::Level::Warning,
            Severity::Error => sentry::Level::Error,
        }
    }
}

/// Structured metadata attached to a single reported event.
pub type EventContext = BTreeMap<String, serde_json::Value>;

/// A message handed to the reporter.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub message: String,
    pub severity: Severity,
    pub context: Option<EventContext>,
}

impl LogEvent {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            context: None,
        }
    }

    pub fn with_context(mut self, context: EventContext) -> Self {
        self.context = Some(context);
        self
    }
}
