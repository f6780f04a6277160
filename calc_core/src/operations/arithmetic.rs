//! # Operation Catalog
//!
//! One zero-sized type per operation. Addition, subtraction and
//! multiplication accept any operands that passed input validation; the
//! remaining three enforce their own domains before computing.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};

use super::{Operation, OperationKind};
use crate::errors::{CalcError, CalcResult};

/// a + b
#[derive(Debug, Clone, Copy, Default)]
pub struct Addition;

impl Operation for Addition {
    fn kind(&self) -> OperationKind {
        OperationKind::Add
    }

    fn execute(&self, a: Decimal, b: Decimal) -> Option<Decimal> {
        a.checked_add(b)
    }
}

/// a - b
#[derive(Debug, Clone, Copy, Default)]
pub struct Subtraction;

impl Operation for Subtraction {
    fn kind(&self) -> OperationKind {
        OperationKind::Subtract
    }

    fn execute(&self, a: Decimal, b: Decimal) -> Option<Decimal> {
        a.checked_sub(b)
    }
}

/// a * b
#[derive(Debug, Clone, Copy, Default)]
pub struct Multiplication;

impl Operation for Multiplication {
    fn kind(&self) -> OperationKind {
        OperationKind::Multiply
    }

    fn execute(&self, a: Decimal, b: Decimal) -> Option<Decimal> {
        a.checked_mul(b)
    }
}

/// a / b, b != 0
#[derive(Debug, Clone, Copy, Default)]
pub struct Division;

impl Operation for Division {
    fn kind(&self) -> OperationKind {
        OperationKind::Divide
    }

    fn validate_operands(&self, _a: Decimal, b: Decimal) -> CalcResult<()> {
        if b.is_zero() {
            return Err(CalcError::operation("Division by zero is not allowed"));
        }
        Ok(())
    }

    fn execute(&self, a: Decimal, b: Decimal) -> Option<Decimal> {
        a.checked_div(b)
    }
}

/// a ^ b, b >= 0.
///
/// Integral exponents are computed exactly by repeated multiplication.
/// Fractional exponents go through `exp(b * ln(a))` and therefore need a
/// non-negative base.
#[derive(Debug, Clone, Copy, Default)]
pub struct Power;

impl Operation for Power {
    fn kind(&self) -> OperationKind {
        OperationKind::Power
    }

    fn validate_operands(&self, a: Decimal, b: Decimal) -> CalcResult<()> {
        if b.is_sign_negative() && !b.is_zero() {
            return Err(CalcError::operation("Negative exponents are not supported"));
        }
        if a.is_sign_negative() && !a.is_zero() && !b.fract().is_zero() {
            return Err(CalcError::operation(
                "Cannot raise a negative number to a fractional power",
            ));
        }
        Ok(())
    }

    fn execute(&self, a: Decimal, b: Decimal) -> Option<Decimal> {
        if b.fract().is_zero() {
            a.checked_powu(b.to_u64()?)
        } else {
            a.checked_powd(b)
        }
    }
}

/// b-th root of a, computed as a ^ (1 / b).
#[derive(Debug, Clone, Copy, Default)]
pub struct Root;

impl Operation for Root {
    fn kind(&self) -> OperationKind {
        OperationKind::Root
    }

    fn validate_operands(&self, a: Decimal, b: Decimal) -> CalcResult<()> {
        if b.is_zero() {
            return Err(CalcError::operation("Zero root is undefined"));
        }
        if a.is_sign_negative() && !a.is_zero() {
            return Err(CalcError::operation("Cannot calculate root of negative number"));
        }
        Ok(())
    }

    fn execute(&self, a: Decimal, b: Decimal) -> Option<Decimal> {
        if a.is_zero() {
            // 0 ^ (1/b) diverges for negative b
            return if b.is_sign_positive() { Some(Decimal::ZERO) } else { None };
        }
        if b == Decimal::TWO {
            return a.sqrt();
        }
        let exponent = Decimal::ONE.checked_div(b)?;
        a.checked_powd(exponent)
    }
}
