//! # calc_core - Calculator Engine
//!
//! `calc_core` is the engine behind the interactive calculator: exact decimal
//! arithmetic, a bounded history with undo/redo, observers notified on every
//! calculation, and CSV persistence of the history. Errors and records are
//! serde-serializable, so front ends can print them as text or JSON.
//!
//! ## Design Philosophy
//!
//! - **Exact**: Arithmetic uses `rust_decimal`, so `0.1 + 0.2 == 0.3`
//! - **Typed Errors**: One structured error enum, not strings
//! - **Explicit Configuration**: One immutable config value, no globals
//! - **Atomic Saves**: The history file is never left half-written
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use calc_core::{Calculator, CalculatorConfig};
//!
//! let config = CalculatorConfig::from_env()?;
//! let mut calc = Calculator::new(config)?;
//!
//! let record = calc.compute("divide", "10", "4")?;
//! println!("{}", record); // Division(10, 4) = 2.5
//! calc.save()?;
//! # Ok::<(), calc_core::CalcError>(())
//! ```
//!
//! ## Modules
//!
//! - [`calculator`] - The facade front ends talk to
//! - [`operations`] - Arithmetic operations and the operation factory
//! - [`history`] - Bounded history store, undo/redo, observers
//! - [`record`] - A single performed calculation
//! - [`validation`] - Raw operand text to checked decimal
//! - [`config`] - Environment-driven settings
//! - [`codec`] - History to and from CSV text
//! - [`file_io`] - History file operations with atomic saves
//! - [`errors`] - Structured error types

pub mod calculator;
pub mod codec;
pub mod config;
pub mod errors;
pub mod file_io;
pub mod history;
pub mod operations;
pub mod record;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use calculator::Calculator;
pub use config::CalculatorConfig;
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_history, save_history};
pub use history::{HistoryObserver, HistoryStore};
pub use operations::{Operation, OperationFactory, OperationKind};
pub use record::HistoryRecord;
pub use validation::InputValidator;
