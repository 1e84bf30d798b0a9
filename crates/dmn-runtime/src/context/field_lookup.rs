//! Field Lookup Utilities
//!
//! Helper functions for navigating object values using dot-notation paths.

use super::VariableContext;
use dmn_core::Value;

/// Get the value at `path`, starting from a variable of the context
///
/// Returns `Value::Null` if the variable or any field along the path is
/// missing.
pub(crate) fn lookup_path(context: &dyn VariableContext, path: &[String]) -> Value {
    let Some((root, rest)) = path.split_first() else {
        return Value::Null;
    };

    let value = match context.resolve(root) {
        Some(typed) => &typed.value,
        None => {
            tracing::debug!("Variable not found: {}, returning Null", root);
            return Value::Null;
        }
    };

    navigate_path(value, rest)
}

/// Follow `path` through nested objects, returning Null if any part is missing
fn navigate_path(value: &Value, path: &[String]) -> Value {
    let mut current = value;
    for key in path {
        match current {
            Value::Object(fields) => match fields.get(key) {
                Some(next) => current = next,
                None => {
                    tracing::debug!("Field not found: {}, returning Null", key);
                    return Value::Null;
                }
            },
            _ => {
                tracing::debug!("Cannot access field {} on {}, returning Null", key, current.kind());
                return Value::Null;
            }
        }
    }
    current.clone()
}
