//! Builtin predicates and handlers over JSON values.
//!
//! Manifests refer to these by name. Each [`Builtins`] instance creates one
//! predicate per name, so every registration naming `"number"` shares the
//! same predicate identity and therefore the same trie edges.

use indexmap::IndexMap;
use pdispatch::Predicate;
use serde_json::{Number, Value};
use thiserror::Error;

/// Errors raised by builtin handlers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuiltinError {
    #[error("`{handler}` needs at least {expected} arguments, got {found}")]
    MissingArguments {
        handler: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("`{handler}` cannot be applied to {args}")]
    Unsupported { handler: &'static str, args: String },
}

/// What a builtin handler produces.
pub type HandlerResult = Result<Value, BuiltinError>;

/// A builtin handler.
pub type BuiltinHandler = fn(&[Value]) -> HandlerResult;

/// Names of the builtin predicates, in registration order.
pub const PREDICATE_NAMES: &[&str] = &[
    "any", "null", "bool", "number", "integer", "string", "array", "object",
];

/// Names of the builtin handlers.
pub const HANDLER_NAMES: &[&str] = &["add", "zip_add", "concat", "first", "count"];

/// The builtin predicate set of one manifest.
pub struct Builtins {
    predicates: IndexMap<&'static str, Predicate<Value>>,
}

impl Builtins {
    /// Creates a fresh predicate for every builtin name.
    pub fn new() -> Self {
        let predicates = PREDICATE_NAMES
            .iter()
            .map(|&name| (name, Predicate::named(name, predicate_fn(name))))
            .collect();
        Self { predicates }
    }

    /// Looks up a predicate by name.
    pub fn predicate(&self, name: &str) -> Option<Predicate<Value>> {
        self.predicates.get(name).cloned()
    }

    /// Looks up a handler by name.
    pub fn handler(&self, name: &str) -> Option<BuiltinHandler> {
        let handler: BuiltinHandler = match name {
            "add" => add,
            "zip_add" => zip_add,
            "concat" => concat,
            "first" => first,
            "count" => count,
            _ => return None,
        };
        Some(handler)
    }
}

impl Default for Builtins {
    fn default() -> Self {
        Self::new()
    }
}

fn predicate_fn(name: &str) -> fn(&Value) -> bool {
    match name {
        "null" => Value::is_null,
        "bool" => Value::is_boolean,
        "number" => Value::is_number,
        "integer" => |v| v.is_i64() || v.is_u64(),
        "string" => Value::is_string,
        "array" => Value::is_array,
        "object" => Value::is_object,
        _ => |_| true,
    }
}

fn require(handler: &'static str, args: &[Value], expected: usize) -> Result<(), BuiltinError> {
    if args.len() < expected {
        return Err(BuiltinError::MissingArguments {
            handler,
            expected,
            found: args.len(),
        });
    }
    Ok(())
}

fn unsupported(handler: &'static str, args: &[Value]) -> BuiltinError {
    BuiltinError::Unsupported {
        handler,
        args: Value::Array(args.to_vec()).to_string(),
    }
}

fn add_numbers(x: &Value, y: &Value) -> Option<Value> {
    if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
        if let Some(sum) = a.checked_add(b) {
            return Some(Value::from(sum));
        }
    }
    Number::from_f64(x.as_f64()? + y.as_f64()?).map(Value::Number)
}

/// Adds two numbers or concatenates two strings. Extra arguments are ignored.
fn add(args: &[Value]) -> HandlerResult {
    require("add", args, 2)?;
    match (&args[0], &args[1]) {
        (Value::String(x), Value::String(y)) => Ok(Value::String(format!("{}{}", x, y))),
        (x, y) => add_numbers(x, y).ok_or_else(|| unsupported("add", &args[..2])),
    }
}

/// Element-wise sum of two numeric arrays, truncated to the shorter one.
fn zip_add(args: &[Value]) -> HandlerResult {
    require("zip_add", args, 2)?;
    match (&args[0], &args[1]) {
        (Value::Array(xs), Value::Array(ys)) => xs
            .iter()
            .zip(ys)
            .map(|(x, y)| add_numbers(x, y))
            .collect::<Option<Vec<_>>>()
            .map(Value::Array)
            .ok_or_else(|| unsupported("zip_add", &args[..2])),
        _ => Err(unsupported("zip_add", &args[..2])),
    }
}

/// Concatenates all arguments, which must be all strings or all arrays.
fn concat(args: &[Value]) -> HandlerResult {
    require("concat", args, 1)?;
    if args.iter().all(Value::is_string) {
        let joined: String = args.iter().filter_map(Value::as_str).collect();
        return Ok(Value::String(joined));
    }
    if args.iter().all(Value::is_array) {
        let joined: Vec<Value> = args
            .iter()
            .filter_map(Value::as_array)
            .flatten()
            .cloned()
            .collect();
        return Ok(Value::Array(joined));
    }
    Err(unsupported("concat", args))
}

fn first(args: &[Value]) -> HandlerResult {
    require("first", args, 1)?;
    Ok(args[0].clone())
}

fn count(args: &[Value]) -> HandlerResult {
    Ok(Value::from(args.len()))
}
