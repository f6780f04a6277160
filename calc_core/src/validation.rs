//! # Input Validation
//!
//! Turns raw operand text into a [`Decimal`] and bounds-checks it against
//! `max_input_value`. Accepts plain (`"12.5"`) and scientific (`"1e3"`)
//! notation; surrounding whitespace is ignored.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::config::CalculatorConfig;
//! use calc_core::validation::InputValidator;
//! use rust_decimal::Decimal;
//!
//! let config = CalculatorConfig::default().with_max_input_value(Decimal::from(1000));
//! assert_eq!(InputValidator::validate(" 12.5 ", &config).unwrap(), Decimal::new(125, 1));
//! assert!(InputValidator::validate("1001", &config).is_err());
//! assert!(InputValidator::validate("$12", &config).is_err());
//! ```

use rust_decimal::Decimal;

use crate::config::{parse_decimal, CalculatorConfig};
use crate::errors::{CalcError, CalcResult};

/// Operand parser and range checker.
pub struct InputValidator;

impl InputValidator {
    /// Parse `raw` and check `|value| <= config.max_input_value`.
    ///
    /// Text that is numeric but too large for a `Decimal` (for example
    /// `"1e40"` or `"inf"`) is reported as out of range rather than as a
    /// format error. Non-zero values below the smallest `Decimal` step
    /// (`"1e-40"`) are reported as too small to represent.
    pub fn validate(raw: &str, config: &CalculatorConfig) -> CalcResult<Decimal> {
        let text = raw.trim();

        let value = match parse_decimal(text) {
            Some(value) => value,
            None => return Err(Self::unparseable(raw, text, config)),
        };

        if value.abs() > config.max_input_value {
            return Err(exceeds_maximum(config));
        }
        Ok(value)
    }

    fn unparseable(raw: &str, text: &str, config: &CalculatorConfig) -> CalcError {
        if text.contains('_') {
            return invalid_format(raw);
        }
        match text.parse::<f64>() {
            Ok(float) if float.is_nan() => invalid_format(raw),
            Ok(float) if float.abs() >= 1.0 => exceeds_maximum(config),
            Ok(float) if float != 0.0 => CalcError::validation(format!(
                "Value too small to represent: {}",
                raw.trim()
            )),
            _ => invalid_format(raw),
        }
    }
}

fn invalid_format(raw: &str) -> CalcError {
    CalcError::validation(format!("Invalid number format: {}", raw))
}

fn exceeds_maximum(config: &CalculatorConfig) -> CalcError {
    CalcError::validation(format!(
        "Value exceeds maximum allowed: {}",
        config.max_input_value
    ))
}
