//! Template (EL) backend

use crate::context::VariableContext;
use crate::engine::Interpreter;
use crate::error::Result;
use dmn_core::ast::Template;
use dmn_core::Value;
use dmn_parser::TemplateParser;
use std::sync::Arc;

/// A compiled template expression
pub trait ElExpression: Send + Sync {
    fn get_value(&self, context: &dyn VariableContext) -> Result<Value>;
}

/// Compiles template expressions
pub trait ElProvider: Send + Sync {
    /// Compile `expression`, which carries its `${...}` delimiters
    fn create_expression(&self, expression: &str) -> Result<Arc<dyn ElExpression>>;
}

/// Built-in provider backed by the template parser and interpreter
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateElProvider;

impl TemplateElProvider {
    pub fn new() -> Self {
        Self
    }
}

struct TemplateExpression {
    template: Template,
}

impl ElExpression for TemplateExpression {
    fn get_value(&self, context: &dyn VariableContext) -> Result<Value> {
        Interpreter::render_template(&self.template, context)
    }
}

impl ElProvider for TemplateElProvider {
    fn create_expression(&self, expression: &str) -> Result<Arc<dyn ElExpression>> {
        let template = TemplateParser::parse(expression)?;
        Ok(Arc::new(TemplateExpression { template }))
    }
}
