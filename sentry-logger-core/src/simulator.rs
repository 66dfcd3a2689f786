//! Simulated operations
//!
//! [`OperationSimulator`] picks one of five fixed operations, runs it, and
//! keeps success/failure counters. Four operations always fail with a
//! distinct [`ErrorKind`]; one always succeeds.
//!
//! Selection goes through an injected selector so tests can replay a fixed
//! sequence instead of drawing at random.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Local;
use rand::Rng;
use serde_json::{json, Value};

use crate::reporter::Reporter;
use crate::types::{
    ErrorKind, OperationFailure, OperationOutcome, OperationVariant, SimulationStats,
};

/// Message carried by the custom validation failure.
pub const CUSTOM_FAILURE_MESSAGE: &str = "This is a custom error for testing Sentry";

/// Chooses the next operation to run.
pub type Selector = Box<dyn FnMut() -> OperationVariant>;

/// Uniform random choice over [`OperationVariant::ALL`].
pub fn random_selector() -> Selector {
    Box::new(|| {
        let index = rand::thread_rng().gen_range(0..OperationVariant::ALL.len());
        OperationVariant::ALL[index]
    })
}

/// Replays `variants` in order, starting over after the last one.
///
/// # Panics
///
/// Panics if `variants` is empty.
pub fn sequence_selector(variants: Vec<OperationVariant>) -> Selector {
    assert!(!variants.is_empty(), "sequence selector needs at least one variant");
    let mut index = 0;
    Box::new(move || {
        let variant = variants[index % variants.len()];
        index += 1;
        variant
    })
}

/// Result type shared by all operations.
pub type OperationResult = std::result::Result<OperationOutcome, OperationFailure>;

/// Runs simulated operations and tracks how they went.
pub struct OperationSimulator {
    stats: SimulationStats,
    selector: Selector,
    reporter: Arc<dyn Reporter>,
}

impl OperationSimulator {
    /// Create a simulator that picks operations at random.
    pub fn new(reporter: Arc<dyn Reporter>) -> Self {
        Self::with_selector(reporter, random_selector())
    }

    /// Create a simulator with a custom selector.
    pub fn with_selector(reporter: Arc<dyn Reporter>, selector: Selector) -> Self {
        Self {
            stats: SimulationStats::default(),
            selector,
            reporter,
        }
    }

    /// Run one selected operation, update counters, report failures.
    pub fn run(&mut self) -> OperationResult {
        let variant = (self.selector)();

        match Self::execute(variant) {
            Ok(outcome) => {
                self.stats.success_count += 1;
                tracing::info!(
                    operation = %variant,
                    result = %outcome,
                    "Operation succeeded"
                );
                Ok(outcome)
            }
            Err(failure) => {
                self.stats.failure_count += 1;
                tracing::error!(
                    operation = %variant,
                    error = %failure,
                    "Operation failed"
                );
                self.reporter.capture_failure(&failure);
                Err(failure)
            }
        }
    }

    /// Run a specific operation on demand and report a failure.
    ///
    /// Counters are left untouched.
    pub fn trigger(&self, variant: OperationVariant) -> OperationResult {
        let result = Self::execute(variant);
        if let Err(failure) = &result {
            tracing::error!(operation = %variant, error = %failure, "Triggered operation failed");
            self.reporter.capture_failure(failure);
        }
        result
    }

    /// Current counters.
    pub fn stats(&self) -> SimulationStats {
        self.stats
    }

    /// Run the action behind `variant`. No counters, no reporting.
    pub fn execute(variant: OperationVariant) -> OperationResult {
        match variant {
            OperationVariant::DivideByZero => Self::divide_by_zero(),
            OperationVariant::InvalidKeyAccess => Self::invalid_key_access(),
            OperationVariant::TypeMismatch => Self::type_mismatch(),
            OperationVariant::CustomFailure => Self::custom_failure(),
            OperationVariant::Success => Ok(Self::successful_operation()),
        }
    }

    /// Divide ten by zero.
    pub fn divide_by_zero() -> OperationResult {
        let divisor: i64 = 0;
        let _quotient = 10_i64
            .checked_div(divisor)
            .ok_or_else(|| OperationFailure::new(ErrorKind::ArithmeticError, "division by zero"))?;
        Ok(Self::successful_operation())
    }

    /// Look up a key that is not in the record.
    pub fn invalid_key_access() -> OperationResult {
        let data = BTreeMap::from([("name", "test")]);
        let key = "invalid_key";
        let _value = data
            .get(key)
            .ok_or_else(|| OperationFailure::new(ErrorKind::KeyNotFound, format!("'{key}'")))?;
        Ok(Self::successful_operation())
    }

    /// Add a string and a number.
    pub fn type_mismatch() -> OperationResult {
        let _sum = add(&json!("string"), &json!(123))?;
        Ok(Self::successful_operation())
    }

    /// Fail validation unconditionally.
    pub fn custom_failure() -> OperationResult {
        Err(OperationFailure::new(
            ErrorKind::ValidationError,
            CUSTOM_FAILURE_MESSAGE,
        ))
    }

    /// Report success with the current local time.
    pub fn successful_operation() -> OperationOutcome {
        OperationOutcome::success(Local::now().naive_local())
    }
}

/// Dynamic `+`: concatenates strings, sums numbers, rejects anything else.
fn add(lhs: &Value, rhs: &Value) -> std::result::Result<Value, OperationFailure> {
    match (lhs, rhs) {
        (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{a}{b}"))),
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => Ok(json!(a + b)),
            _ => Ok(json!(a.as_f64().unwrap_or_default() + b.as_f64().unwrap_or_default())),
        },
        (Value::String(_), other) => Err(OperationFailure::new(
            ErrorKind::TypeMismatch,
            format!(
                "can only concatenate str (not \"{}\") to str",
                type_name(other)
            ),
        )),
        (other, rhs) => Err(OperationFailure::new(
            ErrorKind::TypeMismatch,
            format!(
                "unsupported operand type(s) for +: '{}' and '{}'",
                type_name(other),
                type_name(rhs)
            ),
        )),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NoneType",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::MemoryReporter;

    fn simulator(
        sequence: Vec<OperationVariant>,
    ) -> (OperationSimulator, Arc<MemoryReporter>) {
        let reporter = Arc::new(MemoryReporter::new());
        let sim = OperationSimulator::with_selector(reporter.clone(), sequence_selector(sequence));
        (sim, reporter)
    }

    #[test]
    fn test_direct_entry_points_fail_with_documented_kind() {
        for _ in 0..10 {
            let err = OperationSimulator::divide_by_zero().unwrap_err();
            assert_eq!(err.kind, ErrorKind::ArithmeticError);
            assert_eq!(err.message, "division by zero");

            let err = OperationSimulator::invalid_key_access().unwrap_err();
            assert_eq!(err.kind, ErrorKind::KeyNotFound);
            assert_eq!(err.message, "'invalid_key'");

            let err = OperationSimulator::type_mismatch().unwrap_err();
            assert_eq!(err.kind, ErrorKind::TypeMismatch);
            assert_eq!(err.message, "can only concatenate str (not \"int\") to str");

            let err = OperationSimulator::custom_failure().unwrap_err();
            assert_eq!(err.kind, ErrorKind::ValidationError);
            assert_eq!(err.message, CUSTOM_FAILURE_MESSAGE);
        }
    }

    #[test]
    fn test_success_payload() {
        let outcome = OperationSimulator::execute(OperationVariant::Success).unwrap();
        assert_eq!(outcome.status, "success");
        assert!(outcome.timestamp_iso().contains('T'));
    }

    #[test]
    fn test_counts_follow_selector_sequence() {
        let sequence = vec![
            OperationVariant::Success,
            OperationVariant::DivideByZero,
            OperationVariant::TypeMismatch,
            OperationVariant::Success,
            OperationVariant::CustomFailure,
            OperationVariant::InvalidKeyAccess,
            OperationVariant::Success,
        ];
        let (mut sim, reporter) = simulator(sequence.clone());

        for _ in 0..sequence.len() {
            let _ = sim.run();
        }

        let stats = sim.stats();
        assert_eq!(stats.total(), sequence.len() as u64);
        assert_eq!(stats.success_count, 3);
        assert_eq!(stats.failure_count, 4);
        assert_eq!(
            reporter.failures(),
            vec![
                ErrorKind::ArithmeticError,
                ErrorKind::TypeMismatch,
                ErrorKind::ValidationError,
                ErrorKind::KeyNotFound,
            ]
        );
    }

    #[test]
    fn test_trigger_reports_without_counting() {
        let (sim, reporter) = simulator(vec![OperationVariant::Success]);

        let err = sim.trigger(OperationVariant::InvalidKeyAccess).unwrap_err();
        assert_eq!(err.kind, ErrorKind::KeyNotFound);
        assert_eq!(sim.stats(), SimulationStats::default());
        assert_eq!(reporter.failures(), vec![ErrorKind::KeyNotFound]);
    }

    #[test]
    fn test_stats_has_no_side_effect() {
        let (mut sim, _reporter) = simulator(vec![OperationVariant::Success]);
        sim.run().unwrap();
        assert_eq!(sim.stats(), sim.stats());
        assert_eq!(sim.stats().success_count, 1);
    }

    #[test]
    fn test_random_selector_covers_all_variants() {
        let mut selector = random_selector();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            seen.insert(selector());
        }
        assert_eq!(seen.len(), OperationVariant::ALL.len());
    }

    #[test]
    fn test_sequence_selector_cycles() {
        let mut selector =
            sequence_selector(vec![OperationVariant::Success, OperationVariant::DivideByZero]);
        assert_eq!(selector(), OperationVariant::Success);
        assert_eq!(selector(), OperationVariant::DivideByZero);
        assert_eq!(selector(), OperationVariant::Success);
    }

    #[test]
    fn test_add_semantics() {
        assert_eq!(add(&json!("a"), &json!("b")).unwrap(), json!("ab"));
        assert_eq!(add(&json!(2), &json!(3)).unwrap(), json!(5));
        let err = add(&json!(1), &json!("x")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
    }
}
