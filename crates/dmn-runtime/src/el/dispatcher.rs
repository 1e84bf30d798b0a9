//! Expression dispatcher
//!
//! Routes expression nodes to the backend for their language and owns the
//! lazy compilation into the node's compiled-form cache.

use super::feel::FeelEngine;
use super::script::{CompiledScript, ScriptEngineResolver};
use super::template::{ElExpression, ElProvider};
use super::{is_feel_language, ExpressionLanguage};
use crate::context::VariableContext;
use crate::error::{EvaluationError, EvaluationResult, RuntimeError};
use dmn_core::definition::CompiledForm;
use dmn_core::{ExpressionNode, Value};
use dmn_parser::TemplateParser;
use std::sync::Arc;

/// Evaluates expression nodes with pluggable backends
#[derive(Clone)]
pub struct ExpressionDispatcher {
    feel_engine: Arc<dyn FeelEngine>,
    el_provider: Arc<dyn ElProvider>,
    script_engine_resolver: Arc<dyn ScriptEngineResolver>,
}

impl ExpressionDispatcher {
    pub fn new(
        feel_engine: Arc<dyn FeelEngine>,
        el_provider: Arc<dyn ElProvider>,
        script_engine_resolver: Arc<dyn ScriptEngineResolver>,
    ) -> Self {
        Self {
            feel_engine,
            el_provider,
            script_engine_resolver,
        }
    }

    pub fn feel_engine(&self) -> &Arc<dyn FeelEngine> {
        &self.feel_engine
    }

    pub fn is_feel_language(&self, language: &str) -> bool {
        is_feel_language(language)
    }

    /// Evaluate `node` in `language`; blank text evaluates to null
    pub fn evaluate_expression(
        &self,
        language: &str,
        node: &ExpressionNode,
        context: &dyn VariableContext,
    ) -> EvaluationResult<Value> {
        let text = node.text().unwrap_or_default();
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        let result = match ExpressionLanguage::resolve(language) {
            ExpressionLanguage::Feel => self.feel_engine.evaluate_simple_expression(text, context),
            ExpressionLanguage::Template => self.evaluate_template(node, text, context),
            ExpressionLanguage::Script(name) => {
                let engine = self
                    .script_engine_resolver
                    .get_script_engine_for_language(name)
                    .ok_or_else(|| EvaluationError::UnresolvedLanguage {
                        language: language.to_string(),
                        expression: text.to_string(),
                    })?;

                if engine.supports_compilation() {
                    self.compiled_script(node, text, || engine.compile(text))
                        .and_then(|script| script.eval(context))
                } else {
                    engine.eval(text, context)
                }
            }
        };

        result.map_err(|source| expression_error(text, language, source))
    }

    /// Evaluate `node` as simple unary tests against `input_variable`
    pub fn evaluate_simple_unary_tests(
        &self,
        language: &str,
        node: &ExpressionNode,
        input_variable: &str,
        context: &dyn VariableContext,
    ) -> EvaluationResult<bool> {
        let text = node.text().unwrap_or_default();
        self.feel_engine
            .evaluate_simple_unary_tests(text, input_variable, context)
            .map_err(|source| expression_error(text, language, source))
    }

    fn evaluate_template(
        &self,
        node: &ExpressionNode,
        text: &str,
        context: &dyn VariableContext,
    ) -> Result<Value, RuntimeError> {
        let form = node.cache().template().get_or_try_compile(|| {
            let source = if TemplateParser::is_template(text) {
                text.to_string()
            } else {
                format!("${{{}}}", text)
            };
            tracing::debug!("Compiling template expression for node '{}'", node.id);
            self.el_provider
                .create_expression(&source)
                .map(|expression| Arc::new(expression) as CompiledForm)
        })?;

        let expression = form
            .downcast_ref::<Arc<dyn ElExpression>>()
            .ok_or_else(|| foreign_form(node, "template"))?;
        expression.get_value(context)
    }

    fn compiled_script<F>(
        &self,
        node: &ExpressionNode,
        text: &str,
        compile: F,
    ) -> Result<Arc<dyn CompiledScript>, RuntimeError>
    where
        F: FnOnce() -> Result<Arc<dyn CompiledScript>, RuntimeError>,
    {
        let form = node.cache().script().get_or_try_compile(|| {
            tracing::debug!("Compiling script '{}' for node '{}'", text, node.id);
            compile().map(|script| Arc::new(script) as CompiledForm)
        })?;

        form.downcast_ref::<Arc<dyn CompiledScript>>()
            .cloned()
            .ok_or_else(|| foreign_form(node, "script"))
    }
}

fn expression_error(text: &str, language: &str, source: RuntimeError) -> EvaluationError {
    EvaluationError::Expression {
        expression: text.to_string(),
        language: language.to_string(),
        source,
    }
}

fn foreign_form(node: &ExpressionNode, role: &str) -> RuntimeError {
    RuntimeError::RuntimeError(format!(
        "Cached {} form of node '{}' has an unexpected type",
        role, node.id
    ))
}

impl std::fmt::Debug for ExpressionDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpressionDispatcher").finish_non_exhaustive()
    }
}
