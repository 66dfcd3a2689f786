//! In-process reporter that records what it is given.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use super::Reporter;
use crate::types::{ErrorKind, EventContext, LogEvent, OperationFailure, Severity};

/// An event as the backend would have received it.
#[derive(Debug, Clone, PartialEq)]
pub enum CapturedEvent {
    Message {
        message: String,
        severity: Severity,
        extras: EventContext,
    },
    Failure {
        kind: ErrorKind,
        message: String,
        extras: EventContext,
    },
}

impl CapturedEvent {
    /// Extras that were in scope when the event was captured.
    pub fn extras(&self) -> &EventContext {
        match self {
            CapturedEvent::Message { extras, .. } | CapturedEvent::Failure { extras, .. } => {
                extras
            }
        }
    }
}

#[derive(Default)]
struct State {
    /// Extras of the currently active scope
    scope: EventContext,
    events: Vec<CapturedEvent>,
    flushes: usize,
}

/// Reporter that keeps captured events in memory.
///
/// Models a reporter scope: [`MemoryReporter::push_scope`] forks the active
/// extras and the returned guard restores them when dropped.
#[derive(Default)]
pub struct MemoryReporter {
    state: Mutex<State>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A poisoned lock only means a test panicked mid-capture.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fork the active scope until the guard is dropped.
    pub fn push_scope(&self) -> ScopeGuard<'_> {
        let saved = self.lock().scope.clone();
        ScopeGuard {
            reporter: self,
            saved: Some(saved),
        }
    }

    /// Set an extra on the active scope.
    pub fn set_extra(&self, key: impl Into<String>, value: serde_json::Value) {
        self.lock().scope.insert(key.into(), value);
    }

    /// All captured events in order.
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.lock().events.clone()
    }

    /// Captured messages as `(message, severity)` pairs.
    pub fn messages(&self) -> Vec<(String, Severity)> {
        self.lock()
            .events
            .iter()
            .filter_map(|event| match event {
                CapturedEvent::Message {
                    message, severity, ..
                } => Some((message.clone(), *severity)),
                CapturedEvent::Failure { .. } => None,
            })
            .collect()
    }

    /// Kinds of captured failures in order.
    pub fn failures(&self) -> Vec<ErrorKind> {
        self.lock()
            .events
            .iter()
            .filter_map(|event| match event {
                CapturedEvent::Failure { kind, .. } => Some(*kind),
                CapturedEvent::Message { .. } => None,
            })
            .collect()
    }

    /// Number of flush requests received.
    pub fn flush_count(&self) -> usize {
        self.lock().flushes
    }

    fn record(&self, build: impl FnOnce(EventContext) -> CapturedEvent) {
        let mut state = self.lock();
        let event = build(state.scope.clone());
        state.events.push(event);
    }
}

/// Forked scope on a [`MemoryReporter`]; restores the previous extras on drop.
pub struct ScopeGuard<'a> {
    reporter: &'a MemoryReporter,
    saved: Option<EventContext>,
}

impl ScopeGuard<'_> {
    /// Set an extra visible only while this guard is alive.
    pub fn set_extra(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.reporter.set_extra(key, value);
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.reporter.lock().scope = saved;
        }
    }
}

impl Reporter for MemoryReporter {
    fn capture_message(&self, event: &LogEvent) {
        let mut scope = self.push_scope();
        if let Some(context) = &event.context {
            for (key, value) in context {
                scope.set_extra(key.clone(), value.clone());
            }
        }
        self.record(|extras| CapturedEvent::Message {
            message: event.message.clone(),
            severity: event.severity,
            extras,
        });
    }

    fn capture_failure(&self, failure: &OperationFailure) {
        self.record(|extras| CapturedEvent::Failure {
            kind: failure.kind,
            message: failure.message.clone(),
            extras,
        });
    }

    fn flush(&self, _timeout: Duration) -> bool {
        self.lock().flushes += 1;
        true
    }
}
