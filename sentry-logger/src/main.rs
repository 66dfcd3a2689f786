//! sentry-logger - Sentry error logger microapplication
//!
//! Interactive console menu that simulates failing operations and forwards
//! them, along with custom messages, to Sentry.
//!
//! Configuration:
//! - `SENTRY_DSN` (required) and `ENVIRONMENT` (optional), from the process
//!   environment or a `.env` file in the working directory
//! - Config: $XDG_CONFIG_HOME/sentry-logger/config.toml (~/.config/sentry-logger/config.toml)
//! - Logs: $XDG_STATE_HOME/sentry-logger/sentry-logger.log

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use sentry::integrations::anyhow::AnyhowHubExt;
use sentry_logger_core::config::DSN_VAR;
use sentry_logger_core::interaction::INTERRUPT_MESSAGE;
use sentry_logger_core::logging::LoggingGuard;
use sentry_logger_core::{
    Config, Connection, EventLogger, InteractionLoop, LoopExit, OperationSimulator, Reporter,
    SentryReporter, Severity,
};

#[derive(Parser)]
#[command(name = "sentry-logger")]
#[command(about = "Interactive demo of Sentry error tracking")]
#[command(version)]
struct Args {
    /// Path to config file (default: $XDG_CONFIG_HOME/sentry-logger/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Variables already set in the environment win over .env entries.
    dotenvy::dotenv().ok();

    let connection = match Connection::from_env() {
        Ok(connection) => connection,
        Err(_) => {
            println!("Error: {DSN_VAR} environment variable is not set.");
            println!("Please set it in your .env file or export it as an environment variable.");
            println!("Example: export {DSN_VAR}='your-sentry-dsn-here'");
            return ExitCode::FAILURE;
        }
    };

    match run(&args, &connection) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, connection: &Connection) -> Result<ExitCode> {
    let config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;

    // Shared with the Ctrl+C handler, which must flush file logs before exiting.
    let log_guard = Arc::new(Mutex::new(Some(
        sentry_logger_core::logging::init(&config.logging)
            .context("failed to initialize logging")?,
    )));

    tracing::info!(environment = %connection.environment, "sentry-logger starting");

    let reporter = Arc::new(
        SentryReporter::init(connection, &config.reporter)
            .context("failed to initialize Sentry")?,
    );
    let flush_timeout = config.reporter.flush_timeout();
    let logger = EventLogger::new(reporter.clone());

    install_interrupt_handler(
        logger.clone(),
        reporter.clone(),
        log_guard.clone(),
        flush_timeout,
    )?;

    let simulator = OperationSimulator::new(reporter.clone());
    let mut interaction = InteractionLoop::new(
        simulator,
        logger.clone(),
        connection.environment.clone(),
        io::stdin().lock(),
        io::stdout(),
    );

    let code = match interaction.run().context("interactive session failed") {
        Ok(LoopExit::Exited) => ExitCode::SUCCESS,
        Ok(LoopExit::Interrupted) => {
            report_interrupt(&logger);
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("\n\nUnexpected error: {e:#}");
            tracing::error!(error = %e, "Unhandled error");
            reporter.hub().capture_anyhow(&e);
            ExitCode::FAILURE
        }
    };

    if !reporter.flush(flush_timeout) {
        tracing::warn!(
            timeout_secs = flush_timeout.as_secs(),
            "Timed out flushing pending events"
        );
    }
    tracing::info!("sentry-logger shutting down");
    release_log_guard(&log_guard);

    Ok(code)
}

/// Print the interruption notice and report it as an informational event.
fn report_interrupt(logger: &EventLogger) {
    println!("\n\n{INTERRUPT_MESSAGE}");
    logger.log_event(INTERRUPT_MESSAGE, Severity::Info, None);
}

/// Drop the logging guard, writing out any buffered file log lines.
///
/// The handler closure holds its own `Arc`, so the guard is taken out of the
/// slot rather than left to the last reference.
fn release_log_guard(log_guard: &Mutex<Option<LoggingGuard>>) {
    let guard = match log_guard.lock() {
        Ok(mut slot) => slot.take(),
        Err(poisoned) => poisoned.into_inner().take(),
    };
    drop(guard);
}

/// On Ctrl+C: report the interruption, flush, and exit cleanly.
///
/// The main thread may be blocked reading stdin, so the handler finishes
/// the process itself instead of signalling the loop. `process::exit` runs
/// no destructors, hence the explicit guard release.
fn install_interrupt_handler(
    logger: EventLogger,
    reporter: Arc<SentryReporter>,
    log_guard: Arc<Mutex<Option<LoggingGuard>>>,
    flush_timeout: Duration,
) -> Result<()> {
    ctrlc::set_handler(move || {
        report_interrupt(&logger);
        if !reporter.flush(flush_timeout) {
            tracing::warn!("Timed out flushing pending events");
        }
        tracing::info!("sentry-logger interrupted, exiting");
        release_log_guard(&log_guard);
        std::process::exit(0);
    })
    .context("failed to set Ctrl+C handler")
}
