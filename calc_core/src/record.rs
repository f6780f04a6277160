//! # History Records
//!
//! A [`HistoryRecord`] is one completed calculation: which operation ran, on
//! what operands, what it produced, and when. Records are immutable once
//! built; the history store moves them between its live sequence and its
//! redo stack but never edits them.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::operations::OperationKind;
//! use calc_core::record::HistoryRecord;
//! use rust_decimal::Decimal;
//!
//! let record = HistoryRecord::new(
//!     OperationKind::Add,
//!     Decimal::from(2),
//!     Decimal::from(3),
//!     Decimal::from(5),
//! );
//! assert_eq!(record.to_string(), "Addition(2, 3) = 5");
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::operations::{round_result, OperationKind};

/// One completed calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    operation: OperationKind,
    operand1: Decimal,
    operand2: Decimal,
    result: Decimal,
    timestamp: DateTime<Utc>,
}

impl HistoryRecord {
    /// Create a record stamped with the current time.
    pub fn new(
        operation: OperationKind,
        operand1: Decimal,
        operand2: Decimal,
        result: Decimal,
    ) -> Self {
        Self::with_timestamp(operation, operand1, operand2, result, Utc::now())
    }

    /// Create a record with an explicit timestamp (used when loading history).
    pub fn with_timestamp(
        operation: OperationKind,
        operand1: Decimal,
        operand2: Decimal,
        result: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Self {
        HistoryRecord {
            operation,
            operand1,
            operand2,
            result,
            timestamp,
        }
    }

    pub fn operation(&self) -> OperationKind {
        self.operation
    }

    pub fn operand1(&self) -> Decimal {
        self.operand1
    }

    pub fn operand2(&self) -> Decimal {
        self.operand2
    }

    pub fn result(&self) -> Decimal {
        self.result
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// The result rounded to `precision` decimal places with trailing zeros
    /// removed.
    pub fn format_result(&self, precision: u32) -> String {
        round_result(self.result, precision).to_string()
    }
}

impl fmt::Display for HistoryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}, {}) = {}",
            self.operation.display_name(),
            self.operand1.normalize(),
            self.operand2.normalize(),
            self.result.normalize()
        )
    }
}
