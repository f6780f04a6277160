//! # Calculator Facade
//!
//! The single entry point a front end talks to. A [`Calculator`] owns the
//! history store and a shared, read-only configuration, and runs every
//! command through the same pipeline:
//!
//! ```text
//! raw operands ─► InputValidator ─► OperationFactory ─► Operation::compute
//!              ─► round to precision ─► HistoryRecord ─► HistoryStore::append ─► observers
//! ```
//!
//! Nothing is appended unless the computation succeeded. Observer failures
//! do not undo a calculation; they are logged and queued as warnings (see
//! [`Calculator::take_warnings`]).
//!
//! ## Example
//!
//! ```rust,no_run
//! use calc_core::calculator::Calculator;
//! use calc_core::config::CalculatorConfig;
//!
//! let config = CalculatorConfig::default().with_base_dir("/tmp/calc").with_auto_save(false);
//! let mut calc = Calculator::new(config)?;
//!
//! let record = calc.compute("root", "4", "2")?;
//! assert_eq!(record.to_string(), "Root(4, 2) = 2");
//!
//! calc.undo()?;
//! assert!(calc.history().is_empty());
//! # Ok::<(), calc_core::errors::CalcError>(())
//! ```

use std::path::Path;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::config::CalculatorConfig;
use crate::errors::{CalcError, CalcResult};
use crate::file_io::{ensure_dir, load_history, save_history};
use crate::history::{AutoSaveObserver, HistoryObserver, HistoryStore, LoggingObserver};
use crate::operations::{round_result, Operation, OperationFactory};
use crate::record::HistoryRecord;
use crate::validation::InputValidator;

/// Orchestrates validation, computation, history and persistence.
#[derive(Debug)]
pub struct Calculator {
    config: Arc<CalculatorConfig>,
    history: HistoryStore,
    warnings: Vec<CalcError>,
}

impl Calculator {
    /// Create a calculator from a configuration.
    ///
    /// Validates the configuration, creates the history directory, registers
    /// the logging observer (and the auto-save observer when `auto_save` is
    /// on), then loads the existing history file if there is one. A history
    /// file that fails to load is logged and ignored.
    ///
    /// # Errors
    ///
    /// `CalcError::Configuration` for invalid settings and
    /// `CalcError::Persistence` if the history directory cannot be created.
    pub fn new(config: CalculatorConfig) -> CalcResult<Self> {
        config.validate()?;
        let history_file = config.history_file();
        if let Some(parent) = history_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir(parent)?;
        }

        let mut history = HistoryStore::new(config.max_history_size);
        history.add_observer(Box::new(LoggingObserver));
        if config.auto_save {
            history.add_observer(Box::new(AutoSaveObserver::new(&history_file, config.encoding())));
        }

        let mut calculator = Calculator {
            config: Arc::new(config),
            history,
            warnings: Vec::new(),
        };

        if history_file.exists() {
            match calculator.load() {
                Ok(count) => info!("Loaded {} records from {}", count, history_file.display()),
                Err(e) => warn!("Could not load existing history: {}", e),
            }
        }

        info!(
            max_history_size = calculator.config.max_history_size,
            auto_save = calculator.config.auto_save,
            precision = calculator.config.precision,
            "Calculator initialized"
        );
        Ok(calculator)
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Shared handle to the configuration
    pub fn shared_config(&self) -> Arc<CalculatorConfig> {
        Arc::clone(&self.config)
    }

    /// Run the operation called `operation_name` on two raw operands.
    ///
    /// # Errors
    ///
    /// `Validation` for bad operands, `UnknownOperation` for a bad name,
    /// `Operation` for domain-invalid arithmetic. History is untouched on
    /// any error.
    pub fn compute(
        &mut self,
        operation_name: &str,
        raw_operand1: &str,
        raw_operand2: &str,
    ) -> CalcResult<HistoryRecord> {
        let a = InputValidator::validate(raw_operand1, &self.config)?;
        let b = InputValidator::validate(raw_operand2, &self.config)?;
        let operation = OperationFactory::create(operation_name)?;
        self.record(operation.as_ref(), a, b)
    }

    /// Run an already-constructed operation on two raw operands.
    pub fn perform(
        &mut self,
        operation: &dyn Operation,
        raw_operand1: &str,
        raw_operand2: &str,
    ) -> CalcResult<HistoryRecord> {
        let a = InputValidator::validate(raw_operand1, &self.config)?;
        let b = InputValidator::validate(raw_operand2, &self.config)?;
        self.record(operation, a, b)
    }

    fn record(
        &mut self,
        operation: &dyn Operation,
        a: Decimal,
        b: Decimal,
    ) -> CalcResult<HistoryRecord> {
        let result = round_result(operation.compute(a, b)?, self.config.precision);
        let record = HistoryRecord::new(operation.kind(), a, b, result);
        if let Err(e) = self.history.append(record.clone()) {
            self.defer_warning(e);
        }
        Ok(record)
    }

    /// Undo the most recent calculation.
    pub fn undo(&mut self) -> CalcResult<HistoryRecord> {
        self.history.undo()
    }

    /// Redo the most recently undone calculation.
    pub fn redo(&mut self) -> CalcResult<HistoryRecord> {
        match self.history.redo() {
            Ok(record) => Ok(record),
            Err(e @ CalcError::ObserverFailed { .. }) => {
                self.defer_warning(e);
                self.history.last().cloned().ok_or(CalcError::NothingToRedo)
            }
            Err(e) => Err(e),
        }
    }

    /// Forget all history, including redo history.
    pub fn clear(&mut self) {
        self.history.clear();
        info!("History cleared");
    }

    /// Copy of the history, most recent last.
    pub fn history(&self) -> Vec<HistoryRecord> {
        self.history.snapshot()
    }

    /// History formatted for display, e.g. `Addition(2, 3) = 5`.
    pub fn history_lines(&self) -> Vec<String> {
        self.history.iter().map(|record| record.to_string()).collect()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Write the history to the configured history file.
    pub fn save(&self) -> CalcResult<()> {
        let path = self.config.history_file();
        let result = save_history(&self.history.snapshot(), &path, self.config.encoding());
        match &result {
            Ok(()) => info!("History saved to {}", path.display()),
            Err(e) => warn!("Failed to save history: {}", e),
        }
        result
    }

    /// Replace the history with the contents of the configured history file.
    ///
    /// Each loaded record is recomputed; a differing result is logged and the
    /// stored value kept. A record whose operands are invalid for its
    /// operation fails the whole load. On any error the current history is
    /// left unchanged.
    ///
    /// Returns the number of records now in history.
    pub fn load(&mut self) -> CalcResult<usize> {
        let path = self.config.history_file();
        let records = load_history(&path, self.config.encoding())?;
        self.verify_loaded(&records, &path)?;
        self.history.replace(records);
        info!("History loaded from {}", path.display());
        Ok(self.history.len())
    }

    fn verify_loaded(&self, records: &[HistoryRecord], path: &Path) -> CalcResult<()> {
        for (index, record) in records.iter().enumerate() {
            let operation = OperationFactory::for_kind(record.operation());
            let recomputed = operation
                .compute(record.operand1(), record.operand2())
                .map_err(|e| {
                    CalcError::persistence(
                        "verify",
                        path.display().to_string(),
                        format!("record {}: {}", index + 1, e),
                    )
                })?;
            let recomputed = round_result(recomputed, self.config.precision);
            if recomputed != record.result() {
                warn!(
                    "Loaded calculation result {} differs from computed result {} for {}",
                    record.result(),
                    recomputed,
                    record
                );
            }
        }
        Ok(())
    }

    /// Register an additional observer after the built-in ones.
    pub fn add_observer(&mut self, observer: Box<dyn HistoryObserver>) {
        self.history.add_observer(observer);
    }

    /// Remove observers by name. Returns whether any was removed.
    pub fn remove_observer(&mut self, name: &str) -> bool {
        self.history.remove_observer(name)
    }

    pub fn observer_names(&self) -> Vec<&str> {
        self.history.observer_names()
    }

    /// Drain non-fatal problems (observer failures) collected since the last
    /// call.
    pub fn take_warnings(&mut self) -> Vec<CalcError> {
        std::mem::take(&mut self.warnings)
    }

    fn defer_warning(&mut self, error: CalcError) {
        self.warnings.push(error);
    }
}
