//! # Calculator CLI Application
//!
//! Line-oriented front end for `calc_core`. Reads one command per line from
//! stdin, runs it through the [`Calculator`] facade and prints the outcome.
//!
//! ## Startup
//!
//! 1. Parse flags (`--base-dir`, `--no-auto-save`, `--json`, `--env-file`)
//! 2. Load `.env` (or the given env file)
//! 3. Build the configuration from `CALCULATOR_*` variables plus flags
//! 4. Install file logging
//! 5. Create the calculator (loads existing history)
//!
//! Only startup failures end the process with a non-zero status. Errors from
//! commands are printed and the loop continues; end of input acts as `exit`.

mod cli;
mod command;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calc_core::{CalcError, Calculator, CalculatorConfig, HistoryRecord};
use clap::Parser;
use serde_json::json;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::Cli;
use command::{help_text, Command};

/// Used when RUST_LOG is not set
const DEFAULT_LOG_FILTER: &str = "calc_core=info,calc_cli=info";

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.env_file {
        Some(path) => {
            dotenv::from_path(path)
                .with_context(|| format!("Failed to load env file {}", path.display()))?;
        }
        None => {
            dotenv::dotenv().ok();
        }
    }

    let config = cli.apply(CalculatorConfig::from_env().context("Invalid configuration")?);

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_logging(&config);

    let mut calculator = Calculator::new(config).context("Failed to start calculator")?;
    let output = Output { json: cli.json };

    output.message("Calculator started. Type 'help' for commands.");
    run(&mut calculator, io::stdin().lock(), &output)?;

    match calculator.save() {
        Ok(()) => output.message("History saved successfully."),
        Err(e) => output.warning(&e),
    }
    output.message("Goodbye!");
    info!("Calculator exited");
    Ok(())
}

/// Install the tracing subscriber writing to the configured log file.
///
/// Falls back to stderr if the log file cannot be set up.
fn init_logging(config: &CalculatorConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    let log_file = config.log_file();
    let log_dir = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let file_name = log_file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "calculator.log".to_string());

    let appender = std::fs::create_dir_all(&log_dir)
        .map_err(|e| e.to_string())
        .and_then(|()| {
            RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(file_name)
                .build(&log_dir)
                .map_err(|e| e.to_string())
        });

    match appender {
        Ok(appender) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
                .init();
            Some(guard)
        }
        Err(e) => {
            eprintln!(
                "Warning: Could not open log file {}: {}",
                log_file.display(),
                e
            );
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
                .init();
            None
        }
    }
}

/// The command loop. Returns on `exit` or end of input.
///
/// A line that is not valid UTF-8 is reported and skipped; any other read
/// failure ends the loop like end of input. Only a failure to write to
/// stdout is returned as an error.
fn run<R: BufRead>(calculator: &mut Calculator, input: R, output: &Output) -> Result<()> {
    let mut lines = input.lines();

    loop {
        output.prompt()?;
        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) if e.kind() == io::ErrorKind::InvalidData => {
                output.error(&CalcError::validation("Input is not valid UTF-8"));
                continue;
            }
            Some(Err(e)) => {
                warn!("Failed to read input: {}", e);
                break;
            }
            None => break,
        };

        match Command::parse(&line) {
            Ok(None) => continue,
            Ok(Some(Command::Exit)) => break,
            Ok(Some(command)) => {
                if let Err(e) = execute(calculator, command, output) {
                    output.error(&e);
                }
            }
            Err(e) => output.error(&e),
        }

        for warning in calculator.take_warnings() {
            output.warning(&warning);
        }
    }
    Ok(())
}

fn execute(
    calculator: &mut Calculator,
    command: Command,
    output: &Output,
) -> Result<(), CalcError> {
    match command {
        Command::Calculate {
            operation,
            operand1,
            operand2,
        } => {
            let record = calculator.compute(operation.as_str(), &operand1, &operand2)?;
            output.result(&record, calculator.config().precision);
        }
        Command::History => output.history(&calculator.history()),
        Command::Clear => {
            calculator.clear();
            output.message("History cleared.");
        }
        Command::Undo => {
            calculator.undo()?;
            output.message("Operation undone.");
        }
        Command::Redo => {
            calculator.redo()?;
            output.message("Operation redone.");
        }
        Command::Save => {
            calculator.save()?;
            output.message("History saved successfully.");
        }
        Command::Load => {
            let count = calculator.load()?;
            output.message(&format!("History loaded successfully ({} records).", count));
        }
        Command::Help => output.help(),
        // handled by the loop
        Command::Exit => {}
    }
    Ok(())
}

/// Renders outcomes as plain text or one JSON object per line.
struct Output {
    json: bool,
}

impl Output {
    fn prompt(&self) -> Result<()> {
        if !self.json {
            print!("> ");
            io::stdout().flush().context("Failed to write prompt")?;
        }
        Ok(())
    }

    fn result(&self, record: &HistoryRecord, precision: u32) {
        if self.json {
            self.emit(json!({ "record": record, "display": record.to_string() }));
        } else {
            println!("Result: {}", record.format_result(precision));
        }
    }

    fn history(&self, records: &[HistoryRecord]) {
        if self.json {
            self.emit(json!({ "history": records }));
        } else if records.is_empty() {
            println!("No calculations in history.");
        } else {
            println!("Calculation History:");
            for (i, record) in records.iter().enumerate() {
                println!("{}. {}", i + 1, record);
            }
        }
    }

    fn help(&self) {
        if self.json {
            self.emit(json!({ "help": help_text() }));
        } else {
            print!("{}", help_text());
        }
    }

    fn message(&self, text: &str) {
        if self.json {
            self.emit(json!({ "message": text }));
        } else {
            println!("{}", text);
        }
    }

    fn error(&self, error: &CalcError) {
        if self.json {
            self.emit(json!({
                "code": error.error_code(),
                "message": error.to_string(),
                "error": error,
            }));
        } else if error.is_informational() {
            println!("{}", error);
        } else {
            println!("Error: {}", error);
        }
    }

    /// Already logged by the calculator; only shown to the user here.
    fn warning(&self, error: &CalcError) {
        if self.json {
            self.emit(json!({
                "code": error.error_code(),
                "warning": error.to_string(),
            }));
        } else {
            println!("Warning: {}", error);
        }
    }

    fn emit(&self, value: serde_json::Value) {
        println!("{}", value);
    }
}
