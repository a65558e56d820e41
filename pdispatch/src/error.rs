//! Dispatch errors.

use std::fmt::Debug;

use thiserror::Error;

/// Error raised when a registration is rejected.
///
/// Registrations are validated before the dispatch table is touched, so a
/// rejected registration leaves the table unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The predicate sequence does not match the generic function's arity.
    #[error("generic function \"{name}\" expects {expected} predicates, got {found}")]
    ArityMismatch {
        /// The generic function's name.
        name: String,
        /// The declared arity.
        expected: usize,
        /// The number of predicates supplied.
        found: usize,
    },
}

/// Error when no handler matches the arguments and no default is configured.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("generic function \"{name}\" cannot be applied to arguments {args:?}")]
pub struct NoMatchError<A: Debug> {
    /// The generic function that was called.
    pub name: String,
    /// The arguments that did not match, in full.
    pub args: Vec<A>,
}

impl<A: Debug> NoMatchError<A> {
    /// Creates a no-match error for the named generic function.
    pub fn new(name: impl Into<String>, args: Vec<A>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}
