//! Integration tests for the interactive session
//!
//! These tests drive the full menu through the public API with an in-memory
//! reporter standing in for Sentry.

use sentry_logger_core::interaction::{INTERRUPT_MESSAGE, SHUTDOWN_MESSAGE, STARTUP_MESSAGE};
use sentry_logger_core::reporter::CapturedEvent;
use sentry_logger_core::simulator::sequence_selector;
use sentry_logger_core::{
    logging, ErrorKind, EventLogger, InteractionLoop, LoopExit, LoopState, MemoryReporter,
    OperationSimulator, OperationVariant, Severity,
};
use std::io::Cursor;
use std::sync::Arc;

fn session(
    input: &str,
    sequence: Vec<OperationVariant>,
) -> (
    InteractionLoop<Cursor<Vec<u8>>, Vec<u8>>,
    Arc<MemoryReporter>,
) {
    logging::init_test();

    let reporter = Arc::new(MemoryReporter::new());
    let simulator =
        OperationSimulator::with_selector(reporter.clone(), sequence_selector(sequence));
    let logger = EventLogger::new(reporter.clone());
    let interaction = InteractionLoop::new(
        simulator,
        logger,
        "integration",
        Cursor::new(input.as_bytes().to_vec()),
        Vec::new(),
    );
    (interaction, reporter)
}

// ============================================
// Full Session Tests
// ============================================

#[test]
fn test_full_session_reports_in_order() {
    let (mut interaction, reporter) = session(
        "1\n2\nbackup finished\ninfo\n1\n4\n4\n3\n5\n",
        vec![OperationVariant::Success, OperationVariant::TypeMismatch],
    );

    assert_eq!(interaction.run().unwrap(), LoopExit::Exited);
    assert_eq!(interaction.state(), LoopState::Terminated);

    let stats = interaction.stats();
    assert_eq!(stats.success_count, 1);
    assert_eq!(stats.failure_count, 1);

    let events = reporter.events();
    assert_eq!(events.len(), 5);
    assert!(matches!(
        &events[0],
        CapturedEvent::Message { message, .. } if message == STARTUP_MESSAGE
    ));
    assert!(matches!(
        &events[1],
        CapturedEvent::Message { message, severity: Severity::Info, .. }
            if message == "backup finished"
    ));
    assert!(matches!(
        &events[2],
        CapturedEvent::Failure { kind: ErrorKind::TypeMismatch, .. }
    ));
    assert!(matches!(
        &events[3],
        CapturedEvent::Failure { kind: ErrorKind::ValidationError, .. }
    ));
    assert!(matches!(
        &events[4],
        CapturedEvent::Message { message, .. } if message == SHUTDOWN_MESSAGE
    ));

    // Only the startup event carries context.
    assert!(!events[0].extras().is_empty());
    for event in &events[1..] {
        assert!(event.extras().is_empty(), "context leaked into {event:?}");
    }

    let output = String::from_utf8(interaction.into_output()).unwrap();
    assert!(
        output.contains("✗ Error triggered: ValueError: This is a custom error for testing Sentry")
    );
    assert!(output.contains("  Total operations: 2"));
}

#[test]
fn test_interrupt_message_is_informational() {
    let reporter = Arc::new(MemoryReporter::new());
    let logger = EventLogger::new(reporter.clone());

    logger.log_event(INTERRUPT_MESSAGE, Severity::Info, None);

    assert_eq!(
        reporter.messages(),
        vec![(INTERRUPT_MESSAGE.to_string(), Severity::Info)]
    );
    assert!(reporter.failures().is_empty());
}

#[test]
fn test_many_runs_keep_invariant() {
    let (mut interaction, _reporter) =
        session(&"1\n".repeat(50), OperationVariant::ALL.to_vec());

    assert_eq!(interaction.run().unwrap(), LoopExit::Interrupted);

    let stats = interaction.stats();
    assert_eq!(stats.total(), 50);
    assert_eq!(stats.success_count, 10);
    assert_eq!(stats.failure_count, 40);
}
