//! Interactive menu loop
//!
//! [`InteractionLoop`] reads menu choices line by line, dispatches them to
//! the [`OperationSimulator`] or the [`EventLogger`], and writes results for
//! the operator. It is generic over its input and output so the whole
//! console surface can be driven from memory.
//!
//! ## States
//!
//! The loop starts [`LoopState::Running`]. Choice `5` moves it to
//! [`LoopState::Terminated`]; nothing else does. End of input, at the menu
//! or inside a sub-prompt, stops the loop as an interruption without
//! changing the state or reporting anything.

use std::io::{BufRead, Write};
use std::ops::ControlFlow;

use serde_json::json;

use crate::error::Result;
use crate::events::EventLogger;
use crate::simulator::OperationSimulator;
use crate::types::{EventContext, OperationVariant, Severity, SimulationStats};

/// Message reported when the operator interrupts the application.
pub const INTERRUPT_MESSAGE: &str = "Application interrupted by user";

/// Message reported once the loop starts.
pub const STARTUP_MESSAGE: &str = "Application started";

/// Message reported on a normal exit.
pub const SHUTDOWN_MESSAGE: &str = "Application shutting down";

const SENT_NOTE: &str = "  (Error has been sent to Sentry)";

/// Lifecycle of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated,
}

/// How the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// Operator chose "Exit"
    Exited,
    /// Input ended before an explicit exit
    Interrupted,
}

/// Console menu driving the simulator and event logger.
pub struct InteractionLoop<R, W> {
    simulator: OperationSimulator,
    logger: EventLogger,
    environment: String,
    input: R,
    output: W,
    state: LoopState,
}

impl<R: BufRead, W: Write> InteractionLoop<R, W> {
    pub fn new(
        simulator: OperationSimulator,
        logger: EventLogger,
        environment: impl Into<String>,
        input: R,
        output: W,
    ) -> Self {
        Self {
            simulator,
            logger,
            environment: environment.into(),
            input,
            output,
            state: LoopState::Running,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stats(&self) -> SimulationStats {
        self.simulator.stats()
    }

    /// Consume the loop and hand back its output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Print the banner, report startup, and serve the menu until exit.
    pub fn run(&mut self) -> Result<LoopExit> {
        writeln!(self.output, "Sentry Error Logger Microapplication")?;
        writeln!(self.output, "====================================")?;
        writeln!(
            self.output,
            "This app demonstrates Sentry integration for error tracking."
        )?;
        writeln!(self.output)?;

        let mut context = EventContext::new();
        context.insert("version".to_string(), json!(crate::VERSION));
        context.insert("environment".to_string(), json!(self.environment));
        self.logger.log_event(STARTUP_MESSAGE, Severity::Info, Some(&context));

        loop {
            self.print_menu()?;
            let Some(choice) = self.prompt("\nEnter your choice (1-5): ")? else {
                return Ok(self.input_closed());
            };
            if let ControlFlow::Break(exit) = self.handle_choice(&choice)? {
                return Ok(exit);
            }
        }
    }

    /// Dispatch one top-level menu choice.
    ///
    /// The choice must match a menu number exactly. Breaks with the reason
    /// the loop ends: [`LoopExit::Exited`] after choice `5` (or any choice
    /// once terminated), [`LoopExit::Interrupted`] if input ends inside a
    /// sub-prompt.
    pub fn handle_choice(&mut self, choice: &str) -> Result<ControlFlow<LoopExit>> {
        if self.state == LoopState::Terminated {
            return Ok(ControlFlow::Break(LoopExit::Exited));
        }

        match choice {
            "1" => self.simulate(),
            "2" => self.log_custom_message(),
            "3" => self.print_stats(),
            "4" => self.trigger_specific_error(),
            "5" => self.exit(),
            other => {
                tracing::debug!(choice = other, "Invalid menu choice");
                writeln!(self.output, "Invalid choice. Please try again.")?;
                Ok(ControlFlow::Continue(()))
            }
        }
    }

    fn input_closed(&self) -> LoopExit {
        tracing::info!("Input closed before exit was selected");
        LoopExit::Interrupted
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.output, "\nOptions:")?;
        writeln!(self.output, "1. Simulate random operation (may fail)")?;
        writeln!(self.output, "2. Log custom message to Sentry")?;
        writeln!(self.output, "3. View statistics")?;
        writeln!(self.output, "4. Trigger specific error")?;
        writeln!(self.output, "5. Exit")?;
        Ok(())
    }

    /// Write `text` and read one line. `None` means end of input.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn simulate(&mut self) -> Result<ControlFlow<LoopExit>> {
        match self.simulator.run() {
            Ok(outcome) => writeln!(self.output, "✓ Operation successful: {outcome}")?,
            Err(failure) => {
                writeln!(self.output, "✗ Operation failed: {failure}")?;
                writeln!(self.output, "{SENT_NOTE}")?;
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    fn log_custom_message(&mut self) -> Result<ControlFlow<LoopExit>> {
        let Some(message) = self.prompt("Enter message to log: ")? else {
            return Ok(ControlFlow::Break(self.input_closed()));
        };
        let Some(level) = self.prompt("Enter level (info/warning/error) [info]: ")? else {
            return Ok(ControlFlow::Break(self.input_closed()));
        };

        let severity = Severity::parse_lenient(&level);
        self.logger.log_event(&message, severity, None);
        writeln!(self.output, "✓ Message logged to Sentry")?;
        Ok(ControlFlow::Continue(()))
    }

    fn print_stats(&mut self) -> Result<ControlFlow<LoopExit>> {
        let stats = self.simulator.stats();
        writeln!(self.output, "\nStatistics:")?;
        writeln!(self.output, "  Total operations: {}", stats.total())?;
        writeln!(self.output, "  Successful: {}", stats.success_count)?;
        writeln!(self.output, "  Failed: {}", stats.failure_count)?;
        Ok(ControlFlow::Continue(()))
    }

    fn trigger_specific_error(&mut self) -> Result<ControlFlow<LoopExit>> {
        writeln!(self.output, "\nSelect error type:")?;
        writeln!(self.output, "1. ZeroDivisionError")?;
        writeln!(self.output, "2. KeyError")?;
        writeln!(self.output, "3. TypeError")?;
        writeln!(self.output, "4. Custom ValueError")?;

        let Some(choice) = self.prompt("Enter choice (1-4): ")? else {
            return Ok(ControlFlow::Break(self.input_closed()));
        };
        let Some(variant) = OperationVariant::from_error_choice(&choice) else {
            writeln!(self.output, "Invalid choice")?;
            return Ok(ControlFlow::Continue(()));
        };

        match self.simulator.trigger(variant) {
            Ok(outcome) => writeln!(self.output, "✓ Operation successful: {outcome}")?,
            Err(failure) => {
                writeln!(self.output, "✗ Error triggered: {failure}")?;
                writeln!(self.output, "{SENT_NOTE}")?;
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    fn exit(&mut self) -> Result<ControlFlow<LoopExit>> {
        self.logger.log_event(SHUTDOWN_MESSAGE, Severity::Info, None);
        writeln!(self.output, "Goodbye!")?;
        self.state = LoopState::Terminated;
        Ok(ControlFlow::Break(LoopExit::Exited))
    }
}
