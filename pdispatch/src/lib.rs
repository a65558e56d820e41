//! Predicate-based multiple dispatch.
//!
//! A generic function chooses its implementation by running each of its
//! leading arguments through an independent predicate and picking the
//! handler whose whole predicate tuple succeeds.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌───────────────┐    ┌────────────┐
//! │ GenericFunction │───►│ DispatchTable │───►│ MatchIndex │
//! │ arity, fallback │    │   handlers    │    │    trie    │
//! └─────────────────┘    └───────────────┘    └────────────┘
//! ```
//!
//! - [`MatchIndex`]: a trie whose edges are labelled by predicates compared
//!   by identity. Lookup walks one argument per level and the most recently
//!   registered accepting edge wins.
//! - [`DispatchTable`]: handler vocabulary over the index.
//! - [`GenericFunction`]: arity validation, argument truncation and the
//!   default handler.
//!
//! # Example
//!
//! ```
//! use pdispatch::{GenericFunction, GenericOptions, Predicate};
//!
//! let is_int = Predicate::named("int", |v: &i64| *v >= 0);
//! let mut describe = GenericFunction::with_default(
//!     GenericOptions::new("describe", 1),
//!     |_: &[i64]| "negative".to_string(),
//! );
//! describe.when(&[is_int], |args: &[i64]| format!("count {}", args[0])).unwrap();
//!
//! assert_eq!(describe.call(&[3]).unwrap(), "count 3");
//! assert_eq!(describe.call(&[-3]).unwrap(), "negative");
//! ```
//!
//! Registration takes `&mut self` and nothing is synchronized internally;
//! share a generic function between threads behind a lock.

pub mod error;
pub mod generic;
pub mod index;
pub mod options;
pub mod predicate;
pub mod table;

pub use error::{NoMatchError, RegistrationError};
pub use generic::{GenericFunction, Handler};
pub use index::MatchIndex;
pub use options::GenericOptions;
pub use predicate::{Predicate, PredicateFn};
pub use table::DispatchTable;
