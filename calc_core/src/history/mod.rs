//! # History Store
//!
//! The ordered, size-bounded log of [`HistoryRecord`]s with undo/redo.
//!
//! ## Structure
//!
//! ```text
//! HistoryStore
//! ├── entries: VecDeque<HistoryRecord>   (oldest first, at most max_size)
//! ├── redo_stack: Vec<HistoryRecord>     (most recently undone last)
//! └── observers: Vec<Box<dyn HistoryObserver>>
//! ```
//!
//! - `append` pushes to `entries`, evicts from the front past `max_size`,
//!   clears `redo_stack` and notifies observers.
//! - `undo` moves the last entry onto `redo_stack`.
//! - `redo` moves it back (same eviction rule) and notifies observers again,
//!   leaving the rest of `redo_stack` intact.
//!
//! Observers run synchronously in registration order. A failing observer
//! does not stop the others; all failures are collected into a single
//! [`CalcError::ObserverFailed`] returned once every observer has run. The
//! record stays stored either way.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::history::HistoryStore;
//! use calc_core::operations::OperationKind;
//! use calc_core::record::HistoryRecord;
//! use rust_decimal::Decimal;
//!
//! let mut store = HistoryStore::new(2);
//! for n in 1..=3 {
//!     let n = Decimal::from(n);
//!     store.append(HistoryRecord::new(OperationKind::Add, n, n, n + n)).unwrap();
//! }
//! let results: Vec<_> = store.snapshot().iter().map(|r| r.result()).collect();
//! assert_eq!(results, vec![Decimal::from(4), Decimal::from(6)]);
//! ```

pub mod observers;

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::errors::{CalcError, CalcResult};
use crate::record::HistoryRecord;

pub use observers::{AutoSaveObserver, LoggingObserver};

/// Something that wants to hear about every record added to history.
pub trait HistoryObserver {
    /// Stable identifier, used for removal and in failure messages.
    fn name(&self) -> &str;

    /// Called after `record` has been stored. `history` is the full live
    /// sequence, oldest first, with `record` as its last element.
    fn on_record_appended(
        &mut self,
        record: &HistoryRecord,
        history: &[HistoryRecord],
    ) -> CalcResult<()>;
}

/// Bounded undo/redo-capable calculation history.
pub struct HistoryStore {
    entries: VecDeque<HistoryRecord>,
    redo_stack: Vec<HistoryRecord>,
    observers: Vec<Box<dyn HistoryObserver>>,
    max_size: usize,
}

impl HistoryStore {
    /// Create an empty store holding at most `max_size` records (minimum 1).
    pub fn new(max_size: usize) -> Self {
        let max_size = max_size.max(1);
        HistoryStore {
            entries: VecDeque::with_capacity(max_size.min(1024)),
            redo_stack: Vec::new(),
            observers: Vec::new(),
            max_size,
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Add a freshly computed record. Invalidates redo history.
    ///
    /// # Errors
    ///
    /// `CalcError::ObserverFailed` if any observer failed. The record has
    /// been stored regardless.
    pub fn append(&mut self, record: HistoryRecord) -> CalcResult<()> {
        self.redo_stack.clear();
        self.push_bounded(record);
        self.notify_last()
    }

    /// Remove the most recent record and keep it for `redo`.
    pub fn undo(&mut self) -> CalcResult<HistoryRecord> {
        let record = self.entries.pop_back().ok_or(CalcError::NothingToUndo)?;
        self.redo_stack.push(record.clone());
        Ok(record)
    }

    /// Restore the most recently undone record.
    ///
    /// # Errors
    ///
    /// `CalcError::NothingToRedo` if nothing has been undone since the last
    /// append. `CalcError::ObserverFailed` if an observer failed while being
    /// re-notified; the record is restored regardless and is available as
    /// [`last`](Self::last).
    pub fn redo(&mut self) -> CalcResult<HistoryRecord> {
        let record = self.redo_stack.pop().ok_or(CalcError::NothingToRedo)?;
        self.push_bounded(record.clone());
        self.notify_last()?;
        Ok(record)
    }

    /// Drop every record and all redo history. Observers are not notified.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.redo_stack.clear();
    }

    /// Replace the live sequence wholesale (used when loading from disk).
    ///
    /// Only the newest `max_size` records are kept. Redo history is cleared
    /// and observers are not notified.
    pub fn replace(&mut self, records: Vec<HistoryRecord>) {
        let skip = records.len().saturating_sub(self.max_size);
        if skip > 0 {
            debug!(dropped = skip, "loaded history exceeds max size, keeping newest records");
        }
        self.entries = records.into_iter().skip(skip).collect();
        self.redo_stack.clear();
    }

    /// Read-only copy of the live sequence, most recent last.
    pub fn snapshot(&self) -> Vec<HistoryRecord> {
        self.entries.iter().cloned().collect()
    }

    /// Iterate the live sequence without copying, most recent last.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.entries.iter()
    }

    /// Most recent record, if any
    pub fn last(&self) -> Option<&HistoryRecord> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Register an observer. Observers run in registration order.
    pub fn add_observer(&mut self, observer: Box<dyn HistoryObserver>) {
        self.observers.push(observer);
    }

    /// Remove every observer called `name`. Returns whether any was removed.
    pub fn remove_observer(&mut self, name: &str) -> bool {
        let before = self.observers.len();
        self.observers.retain(|observer| observer.name() != name);
        self.observers.len() != before
    }

    /// Names of registered observers, in registration order
    pub fn observer_names(&self) -> Vec<&str> {
        self.observers.iter().map(|observer| observer.name()).collect()
    }

    fn push_bounded(&mut self, record: HistoryRecord) {
        self.entries.push_back(record);
        while self.entries.len() > self.max_size {
            if let Some(evicted) = self.entries.pop_front() {
                debug!(record = %evicted, "evicted oldest history record");
            }
        }
    }

    fn notify_last(&mut self) -> CalcResult<()> {
        let history: &[HistoryRecord] = self.entries.make_contiguous();
        let Some(record) = history.last() else {
            return Ok(());
        };

        let mut failures = Vec::new();
        for observer in self.observers.iter_mut() {
            if let Err(e) = observer.on_record_appended(record, history) {
                warn!(observer = observer.name(), error = %e, "history observer failed");
                failures.push(format!("{}: {}", observer.name(), e));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(CalcError::ObserverFailed { failures })
        }
    }
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore")
            .field("entries", &self.entries)
            .field("redo_stack", &self.redo_stack)
            .field("observers", &self.observer_names())
            .field("max_size", &self.max_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::OperationKind;
    use rust_decimal::Decimal;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn add(n: i64) -> HistoryRecord {
        let n = Decimal::from(n);
        HistoryRecord::new(OperationKind::Add, n, n, n + n)
    }

    fn operands(store: &HistoryStore) -> Vec<Decimal> {
        store.iter().map(|r| r.operand1()).collect()
    }

    /// Records every notification into a shared log; optionally fails.
    struct Recorder {
        name: String,
        log: Rc<RefCell<Vec<String>>>,
        fail: bool,
    }

    impl Recorder {
        fn boxed(
            name: &str,
            log: &Rc<RefCell<Vec<String>>>,
            fail: bool,
        ) -> Box<dyn HistoryObserver> {
            Box::new(Recorder {
                name: name.to_string(),
                log: Rc::clone(log),
                fail,
            })
        }
    }

    impl HistoryObserver for Recorder {
        fn name(&self) -> &str {
            &self.name
        }

        fn on_record_appended(
            &mut self,
            record: &HistoryRecord,
            history: &[HistoryRecord],
        ) -> CalcResult<()> {
            assert_eq!(history.last(), Some(record));
            self.log
                .borrow_mut()
                .push(format!("{}:{}:{}", self.name, record.operand1(), history.len()));
            if self.fail {
                return Err(CalcError::persistence("write", "/nowhere", "read-only"));
            }
            Ok(())
        }
    }

    #[test]
    fn test_append_and_snapshot_order() {
        let mut store = HistoryStore::new(10);
        store.append(add(1)).unwrap();
        store.append(add(2)).unwrap();
        assert_eq!(operands(&store), vec![Decimal::from(1), Decimal::from(2)]);
        assert_eq!(store.snapshot().len(), 2);
        assert_eq!(store.last().unwrap().operand1(), Decimal::from(2));
    }

    #[test]
    fn test_size_bound_evicts_oldest() {
        let mut store = HistoryStore::new(2);
        store.append(add(1)).unwrap();
        store.append(add(2)).unwrap();
        store.append(add(3)).unwrap();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].to_string(), "Addition(2, 2) = 4");
        assert_eq!(snapshot[1].to_string(), "Addition(3, 3) = 6");
    }

    #[test]
    fn test_size_bound_with_overflow_k() {
        let mut store = HistoryStore::new(5);
        for n in 0..12 {
            store.append(add(n)).unwrap();
        }
        assert_eq!(store.len(), 5);
        assert_eq!(operands(&store), (7..12).map(Decimal::from).collect::<Vec<_>>());
    }

    #[test]
    fn test_zero_max_size_is_clamped_to_one() {
        let mut store = HistoryStore::new(0);
        store.append(add(1)).unwrap();
        store.append(add(2)).unwrap();
        assert_eq!(store.max_size(), 1);
        assert_eq!(operands(&store), vec![Decimal::from(2)]);
    }

    #[test]
    fn test_undo_empty() {
        let mut store = HistoryStore::new(10);
        assert_eq!(store.undo().unwrap_err(), CalcError::NothingToUndo);
    }

    #[test]
    fn test_redo_empty() {
        let mut store = HistoryStore::new(10);
        store.append(add(1)).unwrap();
        assert_eq!(store.redo().unwrap_err(), CalcError::NothingToRedo);
    }

    #[test]
    fn test_undo_then_redo_restores_state() {
        let mut store = HistoryStore::new(10);
        store.append(add(1)).unwrap();
        store.append(add(2)).unwrap();
        let before = store.snapshot();

        let undone = store.undo().unwrap();
        assert_eq!(undone.operand1(), Decimal::from(2));
        assert_eq!(store.len(), 1);
        assert!(store.can_redo());

        let redone = store.redo().unwrap();
        assert_eq!(redone, undone);
        assert_eq!(store.snapshot(), before);
        assert!(!store.can_redo());
    }

    #[test]
    fn test_multiple_undo_redo_in_order() {
        let mut store = HistoryStore::new(10);
        for n in 1..=3 {
            store.append(add(n)).unwrap();
        }
        store.undo().unwrap();
        store.undo().unwrap();
        assert_eq!(operands(&store), vec![Decimal::from(1)]);

        assert_eq!(store.redo().unwrap().operand1(), Decimal::from(2));
        assert_eq!(store.redo().unwrap().operand1(), Decimal::from(3));
        assert_eq!(store.redo().unwrap_err(), CalcError::NothingToRedo);
    }

    #[test]
    fn test_append_after_undo_clears_redo() {
        let mut store = HistoryStore::new(10);
        store.append(add(1)).unwrap();
        store.undo().unwrap();
        store.append(add(5)).unwrap();
        assert!(!store.can_redo());
        assert_eq!(store.redo().unwrap_err(), CalcError::NothingToRedo);
    }

    #[test]
    fn test_undo_redo_at_capacity() {
        let mut store = HistoryStore::new(2);
        for n in 1..=3 {
            store.append(add(n)).unwrap();
        }
        store.undo().unwrap();
        store.redo().unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(operands(&store), vec![Decimal::from(2), Decimal::from(3)]);
    }

    #[test]
    fn test_clear() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut store = HistoryStore::new(10);
        store.add_observer(Recorder::boxed("rec", &log, false));
        store.append(add(1)).unwrap();
        store.append(add(2)).unwrap();
        store.undo().unwrap();

        store.clear();
        assert!(store.is_empty());
        assert!(!store.can_redo());
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn test_replace_keeps_newest() {
        let mut store = HistoryStore::new(2);
        store.replace(vec![add(1), add(2), add(3)]);
        assert_eq!(operands(&store), vec![Decimal::from(2), Decimal::from(3)]);
    }

    #[test]
    fn test_observers_run_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut store = HistoryStore::new(10);
        store.add_observer(Recorder::boxed("first", &log, false));
        store.add_observer(Recorder::boxed("second", &log, false));

        store.append(add(4)).unwrap();
        assert_eq!(*log.borrow(), vec!["first:4:1", "second:4:1"]);
    }

    #[test]
    fn test_redo_renotifies_observers() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut store = HistoryStore::new(10);
        store.add_observer(Recorder::boxed("rec", &log, false));

        store.append(add(1)).unwrap();
        store.undo().unwrap();
        store.redo().unwrap();
        assert_eq!(*log.borrow(), vec!["rec:1:1", "rec:1:1"]);
    }

    #[test]
    fn test_failing_observer_is_isolated() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut store = HistoryStore::new(10);
        store.add_observer(Recorder::boxed("broken", &log, true));
        store.add_observer(Recorder::boxed("healthy", &log, false));

        let err = store.append(add(3)).unwrap_err();
        match err {
            CalcError::ObserverFailed { failures } => {
                assert_eq!(failures.len(), 1);
                assert!(failures[0].starts_with("broken: "));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // both observers ran, record was stored
        assert_eq!(*log.borrow(), vec!["broken:3:1", "healthy:3:1"]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_redo_with_failing_observer_still_restores() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut store = HistoryStore::new(10);
        store.append(add(1)).unwrap();
        store.undo().unwrap();
        store.add_observer(Recorder::boxed("broken", &log, true));

        assert!(matches!(store.redo(), Err(CalcError::ObserverFailed { .. })));
        assert_eq!(store.last().unwrap().operand1(), Decimal::from(1));
    }

    #[test]
    fn test_remove_observer() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut store = HistoryStore::new(10);
        store.add_observer(Recorder::boxed("a", &log, false));
        store.add_observer(Recorder::boxed("b", &log, false));

        assert!(store.remove_observer("a"));
        assert!(!store.remove_observer("a"));
        assert_eq!(store.observer_names(), vec!["b"]);

        store.append(add(1)).unwrap();
        assert_eq!(*log.borrow(), vec!["b:1:1"]);
    }
}
