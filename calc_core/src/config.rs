//! # Calculator Configuration
//!
//! A single immutable value built once at startup and shared read-only by
//! every component. Values come from `CALCULATOR_*` environment variables
//! with explicit defaults:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `CALCULATOR_BASE_DIR` | current directory |
//! | `CALCULATOR_MAX_HISTORY_SIZE` | `1000` |
//! | `CALCULATOR_AUTO_SAVE` | `true` (`"true"`/`"1"` enable) |
//! | `CALCULATOR_PRECISION` | `10` |
//! | `CALCULATOR_MAX_INPUT_VALUE` | largest representable decimal |
//! | `CALCULATOR_DEFAULT_ENCODING` | `utf-8` |
//! | `CALCULATOR_LOG_DIR` | `<base_dir>/logs` |
//! | `CALCULATOR_LOG_FILE` | `<log_dir>/calculator.log` |
//! | `CALCULATOR_HISTORY_DIR` | `<base_dir>/history` |
//! | `CALCULATOR_HISTORY_FILE` | `<history_dir>/calculator_history.csv` |
//!
//! ## Example
//!
//! ```rust
//! use calc_core::config::CalculatorConfig;
//! use std::path::Path;
//!
//! let config = CalculatorConfig::default()
//!     .with_base_dir("/tmp/calc")
//!     .with_max_history_size(50)
//!     .with_auto_save(false);
//! config.validate().unwrap();
//! assert_eq!(config.history_file(), Path::new("/tmp/calc/history/calculator_history.csv"));
//! ```

use std::path::PathBuf;
use std::str::FromStr;

use encoding_rs::Encoding;
use rust_decimal::Decimal;

use crate::errors::{CalcError, CalcResult};

pub const DEFAULT_MAX_HISTORY_SIZE: usize = 1000;
pub const DEFAULT_PRECISION: u32 = 10;
pub const DEFAULT_ENCODING: &str = "utf-8";
/// Upper bound on the number of decimal places a `Decimal` can carry
pub const MAX_PRECISION: u32 = 28;

const HISTORY_FILE_NAME: &str = "calculator_history.csv";
const LOG_FILE_NAME: &str = "calculator.log";

/// Calculator settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorConfig {
    /// Root directory for logs and history
    pub base_dir: PathBuf,

    /// Maximum number of records kept in history (oldest evicted first)
    pub max_history_size: usize,

    /// Save history after every new record
    pub auto_save: bool,

    /// Decimal places results are rounded to
    pub precision: u32,

    /// Largest accepted operand magnitude
    pub max_input_value: Decimal,

    /// Text encoding label for the history file (any WHATWG label)
    pub default_encoding: String,

    /// Explicit log directory; `None` means `<base_dir>/logs`
    pub log_dir: Option<PathBuf>,

    /// Explicit log file; `None` means `<log_dir>/calculator.log`
    pub log_file: Option<PathBuf>,

    /// Explicit history directory; `None` means `<base_dir>/history`
    pub history_dir: Option<PathBuf>,

    /// Explicit history file; `None` means `<history_dir>/calculator_history.csv`
    pub history_file: Option<PathBuf>,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        CalculatorConfig {
            base_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            max_history_size: DEFAULT_MAX_HISTORY_SIZE,
            auto_save: true,
            precision: DEFAULT_PRECISION,
            max_input_value: Decimal::MAX,
            default_encoding: DEFAULT_ENCODING.to_string(),
            log_dir: None,
            log_file: None,
            history_dir: None,
            history_file: None,
        }
    }
}

impl CalculatorConfig {
    /// Build configuration from the process environment.
    ///
    /// The result is validated before it is returned.
    pub fn from_env() -> CalcResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key/value lookup.
    ///
    /// Unset keys fall back to defaults; set-but-unparseable keys are an
    /// error rather than being silently ignored.
    pub fn from_lookup<F>(lookup: F) -> CalcResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = CalculatorConfig::default();

        let base_dir = lookup("CALCULATOR_BASE_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.base_dir);

        let max_history_size = parse_var(&lookup, "CALCULATOR_MAX_HISTORY_SIZE")?
            .unwrap_or(defaults.max_history_size);

        let auto_save = lookup("CALCULATOR_AUTO_SAVE")
            .map(|v| {
                let v = v.trim().to_lowercase();
                v == "true" || v == "1"
            })
            .unwrap_or(defaults.auto_save);

        let precision =
            parse_var(&lookup, "CALCULATOR_PRECISION")?.unwrap_or(defaults.precision);

        let max_input_value = match lookup("CALCULATOR_MAX_INPUT_VALUE") {
            Some(raw) => parse_decimal(raw.trim()).ok_or_else(|| {
                CalcError::configuration(format!(
                    "CALCULATOR_MAX_INPUT_VALUE '{}' is not a representable decimal",
                    raw
                ))
            })?,
            None => defaults.max_input_value,
        };

        let default_encoding = lookup("CALCULATOR_DEFAULT_ENCODING")
            .unwrap_or(defaults.default_encoding);

        let config = CalculatorConfig {
            base_dir,
            max_history_size,
            auto_save,
            precision,
            max_input_value,
            default_encoding,
            log_dir: lookup("CALCULATOR_LOG_DIR").map(PathBuf::from),
            log_file: lookup("CALCULATOR_LOG_FILE").map(PathBuf::from),
            history_dir: lookup("CALCULATOR_HISTORY_DIR").map(PathBuf::from),
            history_file: lookup("CALCULATOR_HISTORY_FILE").map(PathBuf::from),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn with_max_history_size(mut self, max_history_size: usize) -> Self {
        self.max_history_size = max_history_size;
        self
    }

    pub fn with_auto_save(mut self, auto_save: bool) -> Self {
        self.auto_save = auto_save;
        self
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_max_input_value(mut self, max_input_value: Decimal) -> Self {
        self.max_input_value = max_input_value;
        self
    }

    pub fn with_default_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.default_encoding = encoding.into();
        self
    }

    pub fn with_history_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_file = Some(path.into());
        self
    }

    /// Directory log files are written to
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| self.base_dir.join("logs"))
    }

    /// Full path of the log file
    pub fn log_file(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.log_dir().join(LOG_FILE_NAME))
    }

    /// Directory the history file lives in
    pub fn history_dir(&self) -> PathBuf {
        self.history_dir
            .clone()
            .unwrap_or_else(|| self.base_dir.join("history"))
    }

    /// Full path of the persisted history file
    pub fn history_file(&self) -> PathBuf {
        self.history_file
            .clone()
            .unwrap_or_else(|| self.history_dir().join(HISTORY_FILE_NAME))
    }

    /// Resolved text encoding for the history file. Falls back to UTF-8 when
    /// the label is unknown; call [`validate`](Self::validate) to reject that.
    pub fn encoding(&self) -> &'static Encoding {
        Encoding::for_label(self.default_encoding.trim().as_bytes()).unwrap_or(encoding_rs::UTF_8)
    }

    /// Check every setting is within its allowed range.
    pub fn validate(&self) -> CalcResult<()> {
        if self.max_history_size == 0 {
            return Err(CalcError::configuration("max_history_size must be positive"));
        }
        if self.precision > MAX_PRECISION {
            return Err(CalcError::configuration(format!(
                "precision must be at most {}",
                MAX_PRECISION
            )));
        }
        if self.max_input_value <= Decimal::ZERO {
            return Err(CalcError::configuration("max_input_value must be positive"));
        }
        match Encoding::for_label(self.default_encoding.trim().as_bytes()) {
            None => {
                return Err(CalcError::configuration(format!(
                    "unknown encoding '{}'",
                    self.default_encoding
                )));
            }
            // utf-16 and the replacement encoding are decode-only
            Some(encoding) if encoding.output_encoding() != encoding => {
                return Err(CalcError::configuration(format!(
                    "encoding '{}' cannot be used to write files",
                    self.default_encoding
                )));
            }
            Some(_) => {}
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> CalcResult<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            CalcError::configuration(format!("{} has invalid value '{}'", key, raw))
        }),
        None => Ok(None),
    }
}

/// Parse plain (`"1000"`) or scientific (`"1e3"`) decimal text. Digit
/// separators (`"1_000"`) are not accepted.
pub(crate) fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.contains('_') {
        return None;
    }
    Decimal::from_str(text)
        .ok()
        .or_else(|| Decimal::from_scientific(text).ok())
}
