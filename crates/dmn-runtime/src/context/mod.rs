//! Variable contexts
//!
//! Expressions read their variables through the [`VariableContext`] trait.
//! Callers supply [`Variables`]; the evaluation layers a child scope in front
//! of the caller's context with [`CompositeVariableContext`] instead of
//! mutating it.

mod composite;
mod field_lookup;
mod variables;

pub use composite::{CompositeVariableContext, EmptyVariableContext};
pub(crate) use field_lookup::lookup_path;
pub use variables::Variables;

use dmn_core::TypedValue;

/// Read-only name to typed value lookup
pub trait VariableContext {
    /// Typed value bound to `name`, if any
    fn resolve(&self, name: &str) -> Option<&TypedValue>;

    fn contains_variable(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }
}
