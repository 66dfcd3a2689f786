//! Sentry-backed reporter.

use std::sync::Arc;
use std::time::Duration;

use sentry::protocol::Event;
use sentry::types::Dsn;
use sentry::{ClientInitGuard, ClientOptions, Hub};

use super::Reporter;
use crate::config::{Connection, ReporterConfig, DSN_VAR};
use crate::error::{Error, Result};
use crate::types::{LogEvent, OperationFailure};

/// Reporter that forwards to the Sentry main hub.
///
/// Holds the client guard for the lifetime of the process; dropping the
/// reporter closes the client after a final flush.
pub struct SentryReporter {
    hub: Arc<Hub>,
    _guard: ClientInitGuard,
}

impl SentryReporter {
    /// Initialize the Sentry client and bind it to the main hub.
    ///
    /// Fails if the reporter options are invalid or the DSN cannot be parsed.
    pub fn init(connection: &Connection, config: &ReporterConfig) -> Result<Self> {
        config.validate()?;

        let dsn: Dsn = connection
            .dsn
            .parse()
            .map_err(|e| Error::Config(format!("invalid {DSN_VAR}: {e}")))?;

        let release = config.release_name();
        let guard = sentry::init(ClientOptions {
            dsn: Some(dsn),
            send_default_pii: config.send_default_pii,
            traces_sample_rate: config.traces_sample_rate,
            environment: Some(connection.environment.clone().into()),
            release: Some(release.clone().into()),
            ..Default::default()
        });

        tracing::info!(
            environment = %connection.environment,
            release = %release,
            send_default_pii = config.send_default_pii,
            traces_sample_rate = config.traces_sample_rate,
            profiles_sample_rate = config.profiles_sample_rate,
            enabled = guard.is_enabled(),
            "Sentry client initialized"
        );

        Ok(Self {
            hub: Hub::main(),
            _guard: guard,
        })
    }

    /// The hub events are captured on.
    pub fn hub(&self) -> &Arc<Hub> {
        &self.hub
    }
}

/// Build the exception event for a failure, typed by its error kind.
fn failure_event(failure: &OperationFailure) -> Event<'static> {
    let mut event = sentry::event_from_error(failure);
    if let Some(exception) = event.exception.values.last_mut() {
        exception.ty = failure.kind.display_name().to_string();
        exception.value = Some(failure.message.clone());
    }
    event
        .tags
        .insert("error.kind".to_string(), format!("{:?}", failure.kind));
    event
}

impl Reporter for SentryReporter {
    fn capture_message(&self, event: &LogEvent) {
        self.hub.with_scope(
            |scope| {
                if let Some(context) = &event.context {
                    for (key, value) in context {
                        scope.set_extra(key, value.clone());
                    }
                }
            },
            || {
                let id = self
                    .hub
                    .capture_message(&event.message, event.severity.into());
                tracing::debug!(event_id = %id, "Captured message");
            },
        );
    }

    fn capture_failure(&self, failure: &OperationFailure) {
        let id = self.hub.capture_event(failure_event(failure));
        tracing::debug!(event_id = %id, kind = ?failure.kind, "Captured failure");
    }

    fn flush(&self, timeout: Duration) -> bool {
        match self.hub.client() {
            Some(client) => client.flush(Some(timeout)),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;

    #[test]
    fn test_failure_event_uses_kind_name() {
        let failure = OperationFailure::new(ErrorKind::ArithmeticError, "division by zero");
        let event = failure_event(&failure);

        let exception = event.exception.values.last().unwrap();
        assert_eq!(exception.ty, "ZeroDivisionError");
        assert_eq!(exception.value.as_deref(), Some("division by zero"));
        assert_eq!(
            event.tags.get("error.kind").map(String::as_str),
            Some("ArithmeticError")
        );
    }

    #[test]
    fn test_invalid_dsn_is_config_error() {
        let connection = Connection {
            dsn: "not a dsn".to_string(),
            environment: "test".to_string(),
        };
        let err = match SentryReporter::init(&connection, &ReporterConfig::default()) {
            Ok(_) => panic!("expected invalid DSN to be rejected"),
            Err(e) => e,
        };
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains(DSN_VAR));
    }
}
