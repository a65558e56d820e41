//! Generic Function Options
//!
//! Naming and arity metadata for a generic function.

use serde::{Deserialize, Serialize};

/// Options for creating a generic function.
///
/// Missing fields take their defaults: an empty name and arity zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenericOptions {
    /// Name used in diagnostics.
    pub name: String,

    /// Number of leading arguments used for dispatch.
    pub arity: usize,
}

impl GenericOptions {
    /// Creates options with the given name and arity.
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the arity.
    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = arity;
        self
    }
}
