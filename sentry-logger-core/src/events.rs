//! Custom event logging
//!
//! Sends operator or application messages to the reporter with a severity
//! and optional per-event context, and mirrors them to the local log.

use std::sync::Arc;

use crate::reporter::Reporter;
use crate::types::{EventContext, LogEvent, Severity};

/// Forwards messages to the reporter.
#[derive(Clone)]
pub struct EventLogger {
    reporter: Arc<dyn Reporter>,
}

impl EventLogger {
    pub fn new(reporter: Arc<dyn Reporter>) -> Self {
        Self { reporter }
    }

    /// Log a message. Fire-and-forget: delivery problems are the reporter's.
    pub fn log_event(&self, message: &str, severity: Severity, context: Option<&EventContext>) {
        let mut event = LogEvent::new(message, severity);
        if let Some(context) = context.filter(|c| !c.is_empty()) {
            event = event.with_context(context.clone());
        }

        self.reporter.capture_message(&event);

        tracing::info!(severity = %severity, "Custom event logged to Sentry: {}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::{CapturedEvent, MemoryReporter};
    use serde_json::json;

    #[test]
    fn test_context_does_not_leak_into_next_event() {
        let reporter = Arc::new(MemoryReporter::new());
        let logger = EventLogger::new(reporter.clone());

        let mut context = EventContext::new();
        context.insert("version".to_string(), json!("1.0.0"));
        context.insert("retries".to_string(), json!(3));

        logger.log_event("with context", Severity::Warning, Some(&context));
        logger.log_event("without context", Severity::Info, None);

        let events = reporter.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].extras(), &context);
        assert!(events[1].extras().is_empty());
    }

    #[test]
    fn test_severity_is_forwarded() {
        let reporter = Arc::new(MemoryReporter::new());
        let logger = EventLogger::new(reporter.clone());

        logger.log_event("disk almost full", Severity::Error, None);

        match &reporter.events()[0] {
            CapturedEvent::Message {
                message, severity, ..
            } => {
                assert_eq!(message, "disk almost full");
                assert_eq!(*severity, Severity::Error);
            }
            other => panic!("expected message, got {other:?}"),
        }
    }
}
