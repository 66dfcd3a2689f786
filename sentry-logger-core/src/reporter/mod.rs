//! Error-tracking reporter
//!
//! The reporter is the outbound seam to the error-tracking backend. The
//! application creates exactly one handle at startup and passes it to the
//! components that report through it.
//!
//! ## Implementations
//!
//! - [`SentryReporter`]: forwards to a Sentry hub; transport, batching and
//!   retry belong to the `sentry` crate.
//! - [`MemoryReporter`]: records events in process, used by tests.
//!
//! ## Scoping
//!
//! Per-event context is attached to a forked scope that lives only for the
//! capture call, so metadata never carries over into later events.

mod memory;
mod sentry_hub;

pub use memory::{CapturedEvent, MemoryReporter, ScopeGuard};
pub use sentry_hub::SentryReporter;

use std::time::Duration;

use crate::types::{LogEvent, OperationFailure};

/// Destination for messages and failures.
///
/// Implementations are best-effort: capture calls never fail towards the
/// caller.
pub trait Reporter: Send + Sync {
    /// Capture a message, attaching `event.context` to this event only.
    fn capture_message(&self, event: &LogEvent);

    /// Capture a simulated operation failure.
    fn capture_failure(&self, failure: &OperationFailure);

    /// Wait up to `timeout` for pending events to be delivered.
    ///
    /// Returns `true` if everything was flushed in time.
    fn flush(&self, timeout: Duration) -> bool;
}
