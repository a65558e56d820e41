//! Identity-comparable predicates.
//!
//! A [`Predicate`] is a shared one-argument test. Two predicates are the
//! *same* predicate only when they share the underlying allocation, i.e.
//! one is a clone of the other. Behaviourally equal closures wrapped
//! separately are distinct predicates and occupy distinct trie edges.

use std::fmt;
use std::ptr;
use std::sync::Arc;

/// The callable behind a predicate.
pub type PredicateFn<T> = dyn Fn(&T) -> bool + Send + Sync;

/// A one-argument boolean test, compared by identity.
pub struct Predicate<T> {
    func: Arc<PredicateFn<T>>,
    label: Option<Arc<str>>,
}

impl<T> Predicate<T> {
    /// Wraps a function as a new predicate with a fresh identity.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            label: None,
        }
    }

    /// Wraps a function as a new predicate carrying a display label.
    ///
    /// The label is only used for diagnostics; it takes no part in identity.
    pub fn named<F>(label: impl Into<Arc<str>>, func: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            label: Some(label.into()),
        }
    }

    /// Runs the predicate against a single feature.
    #[inline]
    pub fn test(&self, feature: &T) -> bool {
        (self.func)(feature)
    }

    /// Returns true if both handles refer to the same predicate.
    #[inline]
    pub fn same(&self, other: &Self) -> bool {
        ptr::addr_eq(Arc::as_ptr(&self.func), Arc::as_ptr(&other.func))
    }

    /// The display label, if one was given.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
            label: self.label.clone(),
        }
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{}", label),
            None => write!(f, "<predicate>"),
        }
    }
}
