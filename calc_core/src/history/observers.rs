//! # Built-in History Observers
//!
//! - [`LoggingObserver`] writes one `info` line per calculation.
//! - [`AutoSaveObserver`] rewrites the history file after every calculation.

use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use tracing::info;

use super::HistoryObserver;
use crate::errors::CalcResult;
use crate::file_io::save_history;
use crate::record::HistoryRecord;

/// Logs every performed calculation.
#[derive(Debug, Default)]
pub struct LoggingObserver;

impl LoggingObserver {
    pub const NAME: &'static str = "logging";
}

impl HistoryObserver for LoggingObserver {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn on_record_appended(
        &mut self,
        record: &HistoryRecord,
        _history: &[HistoryRecord],
    ) -> CalcResult<()> {
        info!(
            "Calculation performed: {} ({}, {}) = {}",
            record.operation().display_name(),
            record.operand1(),
            record.operand2(),
            record.result()
        );
        Ok(())
    }
}

/// Persists the whole history to disk whenever a record is appended.
#[derive(Debug)]
pub struct AutoSaveObserver {
    path: PathBuf,
    encoding: &'static Encoding,
}

impl AutoSaveObserver {
    pub const NAME: &'static str = "auto_save";

    pub fn new(path: impl Into<PathBuf>, encoding: &'static Encoding) -> Self {
        AutoSaveObserver {
            path: path.into(),
            encoding,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryObserver for AutoSaveObserver {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn on_record_appended(
        &mut self,
        _record: &HistoryRecord,
        history: &[HistoryRecord],
    ) -> CalcResult<()> {
        save_history(history, &self.path, self.encoding)?;
        info!("History auto-saved to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CalcError;
    use crate::file_io::load_history;
    use crate::operations::OperationKind;
    use rust_decimal::Decimal;

    fn record(n: i64) -> HistoryRecord {
        let n = Decimal::from(n);
        HistoryRecord::new(OperationKind::Multiply, n, n, n * n)
    }

    #[test]
    fn test_logging_observer_never_fails() {
        let mut observer = LoggingObserver;
        let r = record(3);
        assert!(observer.on_record_appended(&r, std::slice::from_ref(&r)).is_ok());
        assert_eq!(observer.name(), "logging");
    }

    #[test]
    fn test_auto_save_writes_full_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.csv");
        let mut observer = AutoSaveObserver::new(&path, encoding_rs::UTF_8);

        let history = vec![record(2), record(3)];
        observer.on_record_appended(&history[1], &history).unwrap();

        let loaded = load_history(&path, encoding_rs::UTF_8).unwrap();
        assert_eq!(loaded, history);
    }

    #[test]
    fn test_auto_save_reports_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        // a regular file where a directory is expected
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let mut observer = AutoSaveObserver::new(blocker.join("history.csv"), encoding_rs::UTF_8);

        let r = record(1);
        let err = observer.on_record_appended(&r, std::slice::from_ref(&r)).unwrap_err();
        assert!(matches!(err, CalcError::Persistence { .. }));
    }
}
