//! # Operation Factory
//!
//! Maps an operation name onto a constructed [`Operation`]. The lookup table
//! is built once and keyed by every accepted spelling (command name and
//! display name, lowercased).

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::arithmetic::{Addition, Division, Multiplication, Power, Root, Subtraction};
use super::{Operation, OperationKind};
use crate::errors::{CalcError, CalcResult};

type Constructor = fn() -> Box<dyn Operation>;

static REGISTRY: Lazy<HashMap<String, Constructor>> = Lazy::new(|| {
    let mut registry = HashMap::new();
    for kind in OperationKind::ALL {
        let constructor = constructor_for(kind);
        registry.insert(kind.as_str().to_string(), constructor);
        registry.insert(kind.display_name().to_lowercase(), constructor);
    }
    registry
});

fn constructor_for(kind: OperationKind) -> Constructor {
    match kind {
        OperationKind::Add => boxed::<Addition>,
        OperationKind::Subtract => boxed::<Subtraction>,
        OperationKind::Multiply => boxed::<Multiplication>,
        OperationKind::Divide => boxed::<Division>,
        OperationKind::Power => boxed::<Power>,
        OperationKind::Root => boxed::<Root>,
    }
}

fn boxed<T: Operation + Default + 'static>() -> Box<dyn Operation> {
    Box::new(T::default())
}

/// Creates operations by name.
pub struct OperationFactory;

impl OperationFactory {
    /// Construct the operation called `name` (case-insensitive).
    ///
    /// # Errors
    ///
    /// `CalcError::UnknownOperation` if the name is not recognised.
    ///
    /// # Example
    ///
    /// ```rust
    /// use calc_core::operations::{OperationFactory, OperationKind};
    ///
    /// let op = OperationFactory::create("Power").unwrap();
    /// assert_eq!(op.kind(), OperationKind::Power);
    /// assert!(OperationFactory::create("modulo").is_err());
    /// ```
    pub fn create(name: &str) -> CalcResult<Box<dyn Operation>> {
        let key = name.trim().to_lowercase();
        REGISTRY
            .get(&key)
            .map(|constructor| constructor())
            .ok_or_else(|| CalcError::unknown_operation(name.trim()))
    }

    /// Construct the operation for an already-parsed tag.
    pub fn for_kind(kind: OperationKind) -> Box<dyn Operation> {
        constructor_for(kind)()
    }

    /// Command names of every registered operation, in help-text order.
    pub fn names() -> Vec<&'static str> {
        OperationKind::ALL.iter().map(|kind| kind.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_every_operation() {
        for kind in OperationKind::ALL {
            let op = OperationFactory::create(kind.as_str()).unwrap();
            assert_eq!(op.kind(), kind);
        }
    }

    #[test]
    fn test_create_is_case_insensitive() {
        assert_eq!(OperationFactory::create("ADD").unwrap().kind(), OperationKind::Add);
        assert_eq!(OperationFactory::create("Divide").unwrap().kind(), OperationKind::Divide);
        assert_eq!(OperationFactory::create("root ").unwrap().kind(), OperationKind::Root);
    }

    #[test]
    fn test_create_by_display_name() {
        assert_eq!(
            OperationFactory::create("Subtraction").unwrap().kind(),
            OperationKind::Subtract
        );
    }

    #[test]
    fn test_create_unknown() {
        let err = OperationFactory::create("modulo").unwrap_err();
        assert_eq!(err, CalcError::unknown_operation("modulo"));
        assert!(OperationFactory::create("").is_err());
    }

    #[test]
    fn test_for_kind_matches_create() {
        for kind in OperationKind::ALL {
            assert_eq!(OperationFactory::for_kind(kind).kind(), kind);
        }
    }

    #[test]
    fn test_names() {
        assert_eq!(
            OperationFactory::names(),
            vec!["add", "subtract", "multiply", "divide", "power", "root"]
        );
    }
}
