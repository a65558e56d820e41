//! Generic functions with predicate-based multiple dispatch.
//!
//! A [`GenericFunction`] selects its implementation at call time by testing
//! each of its first `arity` arguments against a registered predicate
//! sequence.
//!
//! # Call Resolution
//!
//! 1. **Truncate**: keep the first `arity` arguments (fewer if fewer given)
//! 2. **Lookup**: query the dispatch table with the truncated arguments
//! 3. **Fall back**: use the default handler when nothing matches
//! 4. **Invoke**: call the chosen handler with *all* the arguments
//!
//! With neither a match nor a default handler the call fails with
//! [`NoMatchError`].

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::{NoMatchError, RegistrationError};
use crate::options::GenericOptions;
use crate::predicate::Predicate;
use crate::table::DispatchTable;

/// A shared handler receiving the full argument list.
pub type Handler<A, R> = Arc<dyn Fn(&[A]) -> R + Send + Sync>;

/// A function whose implementation is chosen by argument predicates.
pub struct GenericFunction<A, R> {
    name: String,
    arity: usize,
    table: DispatchTable<A, Handler<A, R>>,
    default_handler: Option<Handler<A, R>>,
}

impl<A, R> GenericFunction<A, R> {
    /// Creates a generic function without a default handler.
    pub fn new(options: GenericOptions) -> Self {
        Self {
            name: options.name,
            arity: options.arity,
            table: DispatchTable::new(),
            default_handler: None,
        }
    }

    /// Creates a generic function that falls back to `handler`.
    pub fn with_default<H>(options: GenericOptions, handler: H) -> Self
    where
        H: Fn(&[A]) -> R + Send + Sync + 'static,
    {
        let mut generic = Self::new(options);
        generic.default_handler = Some(Arc::new(handler));
        generic
    }

    /// Promotes an ordinary function to a generic function.
    ///
    /// The function becomes the default handler, so calls behave exactly as
    /// before until more specific handlers are registered.
    pub fn of<H>(name: impl Into<String>, arity: usize, func: H) -> Self
    where
        H: Fn(&[A]) -> R + Send + Sync + 'static,
    {
        Self::with_default(GenericOptions::new(name, arity), func)
    }

    /// The name used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The number of leading arguments used for dispatch.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Returns true if a default handler is configured.
    pub fn has_default(&self) -> bool {
        self.default_handler.is_some()
    }

    /// The underlying dispatch table.
    pub fn table(&self) -> &DispatchTable<A, Handler<A, R>> {
        &self.table
    }

    /// Registers `handler` for arguments accepted by `predicates`.
    ///
    /// The predicate count must equal the arity. Registering the same
    /// predicates again replaces the previous handler.
    pub fn when<H>(&mut self, predicates: &[Predicate<A>], handler: H) -> Result<(), RegistrationError>
    where
        H: Fn(&[A]) -> R + Send + Sync + 'static,
    {
        if predicates.len() != self.arity {
            return Err(RegistrationError::ArityMismatch {
                name: self.name.clone(),
                expected: self.arity,
                found: predicates.len(),
            });
        }

        let replaced = self.table.set_handler(predicates, Arc::new(handler));
        debug!(
            generic = %self.name,
            predicates = ?predicates,
            replaced = replaced.is_some(),
            "registered handler"
        );
        Ok(())
    }

    /// Finds the handler that a call with `args` would run.
    pub fn resolve(&self, args: &[A]) -> Option<&Handler<A, R>> {
        let key = &args[..args.len().min(self.arity)];
        match self.table.get_handler(key) {
            Some(handler) => Some(handler),
            None => {
                trace!(generic = %self.name, fallback = self.has_default(), "no registered handler matched");
                self.default_handler.as_ref()
            }
        }
    }

    /// Applies the generic function to `args`.
    ///
    /// Arguments beyond the arity take no part in dispatch but are passed
    /// to the chosen handler.
    pub fn call(&self, args: &[A]) -> Result<R, NoMatchError<A>>
    where
        A: Clone + fmt::Debug,
    {
        match self.resolve(args) {
            Some(handler) => Ok(handler(args)),
            None => Err(NoMatchError::new(self.name.clone(), args.to_vec())),
        }
    }
}

impl<A, R> fmt::Debug for GenericFunction<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("handlers", &self.table.len())
            .field("has_default", &self.has_default())
            .finish()
    }
}
