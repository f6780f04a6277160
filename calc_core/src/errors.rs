//! # Error Types
//!
//! Structured error types for calc_core. Every failure the calculator can
//! report to a user maps onto one variant here, so a front end can decide how
//! loudly to report it (a failed undo is informational, a bad configuration
//! is fatal) without string matching.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::errors::{CalcError, CalcResult};
//! use rust_decimal::Decimal;
//!
//! fn checked_divisor(b: Decimal) -> CalcResult<Decimal> {
//!     if b.is_zero() {
//!         return Err(CalcError::operation("Division by zero is not allowed"));
//!     }
//!     Ok(b)
//! }
//!
//! let err = checked_divisor(Decimal::ZERO).unwrap_err();
//! assert_eq!(err.error_code(), "OPERATION_ERROR");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for calc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculator operations.
///
/// Each variant corresponds to one class of failure. None of them is meant to
/// terminate an interactive session except `Configuration` at startup.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// Operand input did not parse or is out of the configured range
    #[error("{message}")]
    Validation { message: String },

    /// Domain-invalid arithmetic (division by zero, negative root, overflow)
    #[error("{message}")]
    Operation { message: String },

    /// Operation name is not one of the known operations
    #[error("Unknown operation: {name}")]
    UnknownOperation { name: String },

    /// Undo requested with an empty history
    #[error("Nothing to undo")]
    NothingToUndo,

    /// Redo requested with an empty redo stack
    #[error("Nothing to redo")]
    NothingToRedo,

    /// Saving or loading the history file failed
    #[error("Persistence error: {operation} on '{path}' - {reason}")]
    Persistence {
        operation: String,
        path: String,
        reason: String,
    },

    /// Configuration value is invalid
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// One or more observers failed while being notified of a new record.
    /// The record itself was stored.
    #[error("Observer notification failed: {}", .failures.join("; "))]
    ObserverFailed { failures: Vec<String> },
}

impl CalcError {
    /// Create a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        CalcError::Validation {
            message: message.into(),
        }
    }

    /// Create an Operation error
    pub fn operation(message: impl Into<String>) -> Self {
        CalcError::Operation {
            message: message.into(),
        }
    }

    /// Create an UnknownOperation error
    pub fn unknown_operation(name: impl Into<String>) -> Self {
        CalcError::UnknownOperation { name: name.into() }
    }

    /// Create a Persistence error
    pub fn persistence(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::Persistence {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a Configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        CalcError::Configuration {
            message: message.into(),
        }
    }

    /// True for outcomes that are reported as information rather than
    /// failures (nothing to undo or redo).
    pub fn is_informational(&self) -> bool {
        matches!(self, CalcError::NothingToUndo | CalcError::NothingToRedo)
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::Validation { .. } => "VALIDATION_ERROR",
            CalcError::Operation { .. } => "OPERATION_ERROR",
            CalcError::UnknownOperation { .. } => "UNKNOWN_OPERATION",
            CalcError::NothingToUndo => "NOTHING_TO_UNDO",
            CalcError::NothingToRedo => "NOTHING_TO_REDO",
            CalcError::Persistence { .. } => "PERSISTENCE_ERROR",
            CalcError::Configuration { .. } => "CONFIGURATION_ERROR",
            CalcError::ObserverFailed { .. } => "OBSERVER_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::persistence("read", "/tmp/history.csv", "No such file");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"Persistence\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::validation("bad").error_code(), "VALIDATION_ERROR");
        assert_eq!(CalcError::unknown_operation("modulo").error_code(), "UNKNOWN_OPERATION");
        assert_eq!(CalcError::NothingToRedo.error_code(), "NOTHING_TO_REDO");
    }

    #[test]
    fn test_informational_errors() {
        assert!(CalcError::NothingToUndo.is_informational());
        assert!(CalcError::NothingToRedo.is_informational());
        assert!(!CalcError::operation("Division by zero is not allowed").is_informational());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            CalcError::operation("Division by zero is not allowed").to_string(),
            "Division by zero is not allowed"
        );
        assert_eq!(
            CalcError::unknown_operation("modulo").to_string(),
            "Unknown operation: modulo"
        );
        let failed = CalcError::ObserverFailed {
            failures: vec!["auto_save: disk full".to_string(), "audit: closed".to_string()],
        };
        assert_eq!(
            failed.to_string(),
            "Observer notification failed: auto_save: disk full; audit: closed"
        );
    }
}
