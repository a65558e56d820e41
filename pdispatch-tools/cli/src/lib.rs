//! Command-line host for pdispatch generic functions.
//!
//! Generic functions are declared in a TOML manifest using builtin
//! predicates and handlers over JSON values, then called from the command
//! line:
//!
//! ```text
//! $ pdispatch call sum 5 6
//! 11
//! $ pdispatch call sum '[7, 2]' '[3, 4]'
//! [10,6]
//! ```

pub mod builtins;
pub mod manifest;
pub mod session;

pub use builtins::{BuiltinError, Builtins, HANDLER_NAMES, PREDICATE_NAMES};
pub use manifest::{GenericSpec, Manifest, ManifestError, WhenSpec, EXAMPLE_MANIFEST};
pub use session::{parse_argument, CallError, Entry, JsonGeneric, Registration, Session};
