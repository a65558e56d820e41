//! Dispatch table: handlers keyed by predicate sequences.
//!
//! A thin layer over [`MatchIndex`] that speaks in predicates, arguments and
//! handlers. It performs no validation; arity checks and fallback handling
//! belong to [`GenericFunction`](crate::GenericFunction).

use crate::index::MatchIndex;
use crate::predicate::Predicate;

/// Handlers indexed by the predicates their arguments must satisfy.
pub struct DispatchTable<A, H> {
    index: MatchIndex<A, H>,
}

impl<A, H> DispatchTable<A, H> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            index: MatchIndex::new(),
        }
    }

    /// Gets the handler whose predicates accept `args`, if any.
    pub fn get_handler(&self, args: &[A]) -> Option<&H> {
        self.index.get_value(args)
    }

    /// Sets a handler for a sequence of predicates, returning the one it replaces.
    pub fn set_handler(&mut self, predicates: &[Predicate<A>], handler: H) -> Option<H> {
        self.index.set_value(predicates, handler)
    }

    /// Gets the handler registered under exactly these predicates.
    pub fn get_registered(&self, predicates: &[Predicate<A>]) -> Option<&H> {
        self.index.get_exact(predicates)
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if no handler has been registered.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// The underlying index.
    pub fn index(&self) -> &MatchIndex<A, H> {
        &self.index
    }
}

impl<A, H> Default for DispatchTable<A, H> {
    fn default() -> Self {
        Self::new()
    }
}
