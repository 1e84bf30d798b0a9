//! FEEL engine backend

use crate::context::{lookup_path, VariableContext};
use crate::engine::Interpreter;
use crate::error::Result;
use dmn_core::ast::{Expression, UnaryTests};
use dmn_core::Value;
use dmn_parser::{ExpressionParser, UnaryTestParser};
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Evaluates FEEL simple expressions and simple unary tests
pub trait FeelEngine: Send + Sync {
    fn evaluate_simple_expression(
        &self,
        expression: &str,
        context: &dyn VariableContext,
    ) -> Result<Value>;

    /// Test the value of `input_variable` against the unary tests in `expression`
    fn evaluate_simple_unary_tests(
        &self,
        expression: &str,
        input_variable: &str,
        context: &dyn VariableContext,
    ) -> Result<bool>;
}

/// Built-in FEEL engine
///
/// Parsed forms are memoized in bounded LRU caches keyed by expression text.
pub struct DefaultFeelEngine {
    expressions: Mutex<LruCache<String, Arc<Expression>>>,
    unary_tests: Mutex<LruCache<String, Arc<UnaryTests>>>,
}

impl DefaultFeelEngine {
    pub const DEFAULT_CACHE_SIZE: usize = 1000;

    pub fn new() -> Self {
        Self::with_cache_size(Self::DEFAULT_CACHE_SIZE)
    }

    /// Engine whose parse caches hold at most `size` entries each
    pub fn with_cache_size(size: usize) -> Self {
        let capacity = NonZeroUsize::new(size).unwrap_or(NonZeroUsize::MIN);
        Self {
            expressions: Mutex::new(LruCache::new(capacity)),
            unary_tests: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn parsed_expression(&self, text: &str) -> Result<Arc<Expression>> {
        if let Some(parsed) = self.expressions.lock().get(text) {
            return Ok(Arc::clone(parsed));
        }
        let parsed = Arc::new(ExpressionParser::parse(text)?);
        self.expressions
            .lock()
            .put(text.to_string(), Arc::clone(&parsed));
        Ok(parsed)
    }

    fn parsed_unary_tests(&self, text: &str) -> Result<Arc<UnaryTests>> {
        if let Some(parsed) = self.unary_tests.lock().get(text) {
            return Ok(Arc::clone(parsed));
        }
        let parsed = Arc::new(UnaryTestParser::parse(text)?);
        self.unary_tests
            .lock()
            .put(text.to_string(), Arc::clone(&parsed));
        Ok(parsed)
    }

    /// Number of cached parsed expressions and unary tests
    pub fn cached_entries(&self) -> (usize, usize) {
        (self.expressions.lock().len(), self.unary_tests.lock().len())
    }
}

impl Default for DefaultFeelEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FeelEngine for DefaultFeelEngine {
    fn evaluate_simple_expression(
        &self,
        expression: &str,
        context: &dyn VariableContext,
    ) -> Result<Value> {
        let parsed = self.parsed_expression(expression)?;
        Interpreter::evaluate(&parsed, context)
    }

    fn evaluate_simple_unary_tests(
        &self,
        expression: &str,
        input_variable: &str,
        context: &dyn VariableContext,
    ) -> Result<bool> {
        let parsed = self.parsed_unary_tests(expression)?;
        let input = lookup_path(context, &[input_variable.to_string()]);
        Interpreter::evaluate_unary_tests(&parsed, &input, context)
    }
}
