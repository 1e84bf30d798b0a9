//! Layered variable contexts

use super::VariableContext;
use dmn_core::TypedValue;

/// A child context checked before its parent
pub struct CompositeVariableContext<'a> {
    child: &'a dyn VariableContext,
    parent: &'a dyn VariableContext,
}

impl<'a> CompositeVariableContext<'a> {
    pub fn compose(child: &'a dyn VariableContext, parent: &'a dyn VariableContext) -> Self {
        Self { child, parent }
    }
}

impl VariableContext for CompositeVariableContext<'_> {
    fn resolve(&self, name: &str) -> Option<&TypedValue> {
        self.child.resolve(name).or_else(|| self.parent.resolve(name))
    }
}

/// Context without variables
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyVariableContext;

impl VariableContext for EmptyVariableContext {
    fn resolve(&self, _name: &str) -> Option<&TypedValue> {
        None
    }
}
