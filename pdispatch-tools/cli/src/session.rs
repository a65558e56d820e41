//! Generic functions built from a manifest.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use pdispatch::{GenericFunction, Handler, NoMatchError};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::builtins::{BuiltinError, BuiltinHandler, Builtins, HandlerResult};
use crate::manifest::{Manifest, ManifestError};

/// A generic function over JSON values.
pub type JsonGeneric = GenericFunction<Value, HandlerResult>;

/// Errors raised when calling a generic function.
#[derive(Debug, Error)]
pub enum CallError {
    #[error("unknown generic function \"{0}\"")]
    UnknownFunction(String),

    #[error(transparent)]
    NoMatch(#[from] NoMatchError<Value>),

    #[error(transparent)]
    Handler(#[from] BuiltinError),
}

/// A registration as declared in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub predicates: Vec<String>,
    pub handler: String,
}

/// A generic function together with the names it was declared with.
pub struct Entry {
    pub generic: JsonGeneric,
    pub default: Option<String>,
    pub registrations: Vec<Registration>,
    /// Manifest names of the stored handlers, keyed by handler address.
    handler_names: HashMap<usize, String>,
}

impl Entry {
    /// The manifest name of a handler stored in this entry's table.
    pub fn handler_name(&self, handler: &Handler<Value, HandlerResult>) -> Option<&str> {
        self.handler_names.get(&handler_key(handler)).map(String::as_str)
    }
}

fn handler_key(handler: &Handler<Value, HandlerResult>) -> usize {
    Arc::as_ptr(handler) as *const () as usize
}

/// All generic functions of one manifest, in declaration order.
pub struct Session {
    entries: IndexMap<String, Entry>,
}

impl Session {
    /// Builds every generic function declared in `manifest`.
    ///
    /// Predicate names resolve against one shared [`Builtins`] set, so equal
    /// names across registrations share trie edges.
    pub fn from_manifest(manifest: &Manifest) -> Result<Self, ManifestError> {
        let builtins = Builtins::new();
        let mut entries = IndexMap::new();

        for spec in &manifest.generics {
            let name = spec.options.name.clone();
            if entries.contains_key(&name) {
                return Err(ManifestError::DuplicateFunction(name));
            }

            let handler_for = |handler: &str| -> Result<BuiltinHandler, ManifestError> {
                builtins.handler(handler).ok_or_else(|| ManifestError::UnknownHandler {
                    function: name.clone(),
                    name: handler.to_string(),
                })
            };

            let mut generic = match &spec.default {
                Some(default) => JsonGeneric::with_default(spec.options.clone(), handler_for(default.as_str())?),
                None => JsonGeneric::new(spec.options.clone()),
            };

            let mut registrations = Vec::with_capacity(spec.when.len());
            let mut handler_names = HashMap::new();
            for when in &spec.when {
                let predicates = when
                    .predicates
                    .iter()
                    .map(|p| {
                        builtins.predicate(p).ok_or_else(|| ManifestError::UnknownPredicate {
                            function: name.clone(),
                            name: p.clone(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let replaced = generic.table().get_registered(&predicates).map(handler_key);
                generic.when(&predicates, handler_for(when.handler.as_str())?)?;
                if let Some(key) = replaced {
                    handler_names.remove(&key);
                }
                if let Some(stored) = generic.table().get_registered(&predicates) {
                    handler_names.insert(handler_key(stored), when.handler.clone());
                }
                registrations.push(Registration {
                    predicates: when.predicates.clone(),
                    handler: when.handler.clone(),
                });
            }

            debug!(
                generic = %name,
                arity = generic.arity(),
                handlers = generic.table().len(),
                "built generic function"
            );
            entries.insert(
                name,
                Entry {
                    generic,
                    default: spec.default.clone(),
                    registrations,
                    handler_names,
                },
            );
        }

        info!("Loaded {} generic functions", entries.len());
        Ok(Self { entries })
    }

    /// Looks up a generic function by name.
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    /// Iterates over the generic functions in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// Number of generic functions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the manifest declared no functions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Calls the named generic function.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, CallError> {
        let entry = self
            .get(name)
            .ok_or_else(|| CallError::UnknownFunction(name.to_string()))?;
        Ok(entry.generic.call(args)??)
    }

    /// Renders the match index of the named generic function.
    ///
    /// Stored handlers are shown by their manifest name.
    pub fn render_tree(&self, name: &str) -> Option<String> {
        let entry = self.get(name)?;
        let index = entry.generic.table().index();
        Some(index.render_with(|handler| entry.handler_name(handler).unwrap_or("?")))
    }
}

/// Parses a command-line argument as JSON, falling back to a JSON string.
pub fn parse_argument(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
