//! Dispatch Manifest
//!
//! A TOML file declaring generic functions in terms of builtin predicates
//! and handlers.
//!
//! ```toml
//! [[generic]]
//! name = "sum"
//! arity = 2
//! default = "add"
//!
//! [[generic.when]]
//! predicates = ["array", "array"]
//! handler = "zip_add"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use pdispatch::{GenericOptions, RegistrationError};
use serde::Deserialize;
use thiserror::Error;

/// Manifest loading and building errors.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("generic function \"{function}\" uses unknown predicate `{name}`")]
    UnknownPredicate { function: String, name: String },

    #[error("generic function \"{function}\" uses unknown handler `{name}`")]
    UnknownHandler { function: String, name: String },

    #[error("generic function \"{0}\" is declared more than once")]
    DuplicateFunction(String),

    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

/// A manifest of generic functions.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Manifest {
    /// Declared generic functions, in file order.
    #[serde(default, rename = "generic")]
    pub generics: Vec<GenericSpec>,
}

/// One generic function declaration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenericSpec {
    /// Name and arity.
    #[serde(flatten)]
    pub options: GenericOptions,

    /// Builtin handler used when no registration matches.
    #[serde(default)]
    pub default: Option<String>,

    /// Registrations, applied in order.
    #[serde(default)]
    pub when: Vec<WhenSpec>,
}

/// One `when` registration: predicate names and a handler name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WhenSpec {
    pub predicates: Vec<String>,
    pub handler: String,
}

/// The manifest printed by `pdispatch manifest`.
pub const EXAMPLE_MANIFEST: &str = r#"# Generic functions over JSON values.
#
# Predicates: any, null, bool, number, integer, string, array, object
# Handlers:   add, zip_add, concat, first, count

[[generic]]
name = "sum"
arity = 2

[[generic.when]]
predicates = ["number", "number"]
handler = "add"

[[generic.when]]
predicates = ["array", "array"]
handler = "zip_add"

[[generic]]
name = "plus"
arity = 2
default = "add"

[[generic]]
name = "join"
arity = 1
default = "count"

[[generic.when]]
predicates = ["string"]
handler = "concat"

[[generic.when]]
predicates = ["array"]
handler = "concat"
"#;

impl Manifest {
    /// Parses a manifest from TOML source.
    pub fn from_toml_str(source: &str) -> Result<Self, ManifestError> {
        Ok(toml::from_str(source)?)
    }

    /// Reads and parses a manifest file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}
