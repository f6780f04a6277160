//! # Arithmetic Operations
//!
//! The six operations the calculator supports. Each operation is its own
//! stateless type implementing [`Operation`]; the [`factory`] maps a command
//! name onto a boxed instance.
//!
//! Every operation follows the same pattern:
//!
//! - `validate_operands(a, b)` - domain checks (division by zero, ...)
//! - `execute(a, b)` - the raw checked computation, `None` on numeric fault
//! - `compute(a, b)` - validate, execute, and turn any fault into
//!   [`CalcError::Operation`]
//!
//! ## Example
//!
//! ```rust
//! use calc_core::operations::factory::OperationFactory;
//! use rust_decimal::Decimal;
//!
//! let divide = OperationFactory::create("divide").unwrap();
//! assert_eq!(divide.compute(Decimal::from(10), Decimal::from(4)).unwrap(), Decimal::new(25, 1));
//! assert!(divide.compute(Decimal::from(10), Decimal::ZERO).is_err());
//! ```
//!
//! ## Available Operations
//!
//! - [`arithmetic`] - Addition, Subtraction, Multiplication, Division, Power, Root
//! - [`factory`] - Name to operation lookup

pub mod arithmetic;
pub mod factory;

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

pub use arithmetic::{Addition, Division, Multiplication, Power, Root, Subtraction};
pub use factory::OperationFactory;

/// Tag identifying one of the six operations.
///
/// Serializes as the lowercase command name (`"add"`, `"root"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Root,
}

impl OperationKind {
    /// All operations, in help-text order
    pub const ALL: [OperationKind; 6] = [
        OperationKind::Add,
        OperationKind::Subtract,
        OperationKind::Multiply,
        OperationKind::Divide,
        OperationKind::Power,
        OperationKind::Root,
    ];

    /// Command name as typed by the user and written to history files
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Add => "add",
            OperationKind::Subtract => "subtract",
            OperationKind::Multiply => "multiply",
            OperationKind::Divide => "divide",
            OperationKind::Power => "power",
            OperationKind::Root => "root",
        }
    }

    /// Human-readable name used when displaying records
    pub fn display_name(&self) -> &'static str {
        match self {
            OperationKind::Add => "Addition",
            OperationKind::Subtract => "Subtraction",
            OperationKind::Multiply => "Multiplication",
            OperationKind::Divide => "Division",
            OperationKind::Power => "Power",
            OperationKind::Root => "Root",
        }
    }

    /// One-line description for the help screen
    pub fn description(&self) -> &'static str {
        match self {
            OperationKind::Add => "Add two numbers",
            OperationKind::Subtract => "Subtract the second number from the first",
            OperationKind::Multiply => "Multiply two numbers",
            OperationKind::Divide => "Divide the first number by the second",
            OperationKind::Power => "Raise the first number to a non-negative power",
            OperationKind::Root => "Take the n-th root of a non-negative number",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = CalcError;

    /// Accepts the command name or the display name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        OperationKind::ALL
            .into_iter()
            .find(|kind| {
                kind.as_str().eq_ignore_ascii_case(needle)
                    || kind.display_name().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| CalcError::unknown_operation(needle))
    }
}

/// Shared capability of every arithmetic operation.
///
/// Implementors hold no state. Only `kind` and `execute` are required;
/// operations with domain restrictions override `validate_operands`.
pub trait Operation: fmt::Debug {
    /// Which operation this is
    fn kind(&self) -> OperationKind;

    /// Reject operands outside the operation's domain.
    fn validate_operands(&self, _a: Decimal, _b: Decimal) -> CalcResult<()> {
        Ok(())
    }

    /// Checked computation. Returns `None` on overflow or any other numeric
    /// fault.
    fn execute(&self, a: Decimal, b: Decimal) -> Option<Decimal>;

    /// Validate then execute. Numeric faults surface as `CalcError::Operation`.
    fn compute(&self, a: Decimal, b: Decimal) -> CalcResult<Decimal> {
        self.validate_operands(a, b)?;
        self.execute(a, b).ok_or_else(|| {
            CalcError::operation(format!(
                "Calculation failed: {}({}, {}) is out of the representable range",
                self.kind().display_name(),
                a,
                b
            ))
        })
    }
}

/// Round a computed value to `precision` decimal places (banker's rounding)
/// and strip trailing zeros.
pub fn round_result(value: Decimal, precision: u32) -> Decimal {
    value
        .round_dp_with_strategy(precision, RoundingStrategy::MidpointNearestEven)
        .normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_command_name() {
        assert_eq!("add".parse::<OperationKind>().unwrap(), OperationKind::Add);
        assert_eq!("ROOT".parse::<OperationKind>().unwrap(), OperationKind::Root);
        assert_eq!(" divide ".parse::<OperationKind>().unwrap(), OperationKind::Divide);
    }

    #[test]
    fn test_kind_from_display_name() {
        assert_eq!("Addition".parse::<OperationKind>().unwrap(), OperationKind::Add);
        assert_eq!("multiplication".parse::<OperationKind>().unwrap(), OperationKind::Multiply);
    }

    #[test]
    fn test_kind_unknown() {
        let err = "modulo".parse::<OperationKind>().unwrap_err();
        assert_eq!(err, CalcError::unknown_operation("modulo"));
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&OperationKind::Subtract).unwrap();
        assert_eq!(json, "\"subtract\"");
    }

    #[test]
    fn test_round_result() {
        let third = Decimal::ONE / Decimal::from(3);
        assert_eq!(round_result(third, 4), Decimal::new(3333, 4));
        assert_eq!(round_result(Decimal::new(25000, 3), 10).to_string(), "25");
        // midpoint goes to even
        assert_eq!(round_result(Decimal::new(125, 2), 1), Decimal::new(12, 1));
    }
}
