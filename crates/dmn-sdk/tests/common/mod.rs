//! Common test utilities for SDK integration tests

#![allow(dead_code)]

use dmn_core::definition::{BuiltinAggregator, DecisionTableBuilder};
use dmn_core::{Decision, DecisionTable, ExpressionNode, HitPolicy, InputClause, OutputClause, Value};
use dmn_runtime::{
    CompiledScript, DecisionResult, DefaultFeelEngine, ElExpression, ElProvider, FeelEngine,
    ScriptEngine, TemplateElProvider, VariableContext,
};
use dmn_sdk::{DecisionEngine, DecisionEngineBuilder};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ============================================================================
// Table harness
// ============================================================================

/// Builds decision tables from cell texts
pub struct TableHarness {
    key: String,
    builder: DecisionTableBuilder,
}

impl TableHarness {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            builder: DecisionTable::builder(key),
        }
    }

    pub fn hit_policy(mut self, hit_policy: HitPolicy) -> Self {
        self.builder = self.builder.hit_policy(hit_policy);
        self
    }

    pub fn aggregation(mut self, aggregator: BuiltinAggregator) -> Self {
        self.builder = self.builder.aggregation(aggregator);
        self
    }

    /// Input clause `id` with input expression `expression`
    pub fn input(mut self, id: &str, expression: &str) -> Self {
        let node = ExpressionNode::new(format!("{}-expr", id), expression);
        self.builder = self.builder.input(InputClause::new(id, node));
        self
    }

    pub fn input_clause(mut self, input: InputClause) -> Self {
        self.builder = self.builder.input(input);
        self
    }

    /// Untyped output clause named `name`
    pub fn output(mut self, name: &str) -> Self {
        self.builder = self.builder.output(OutputClause::new(format!("{}-out", name), name));
        self
    }

    pub fn output_clause(mut self, output: OutputClause) -> Self {
        self.builder = self.builder.output(output);
        self
    }

    pub fn rule(mut self, conditions: &[&str], conclusions: &[&str]) -> Self {
        self.builder = self.builder.rule_texts(conditions, conclusions);
        self
    }

    pub fn table(self) -> DecisionTable {
        self.builder.build().expect("valid decision table")
    }

    pub fn decision(self) -> Decision {
        let key = self.key.clone();
        Decision::table(key, self.table())
    }

    pub fn shared(self) -> Arc<Decision> {
        Arc::new(self.decision())
    }
}

/// `age < 18 -> "minor"`, otherwise `"adult"`
pub fn age_category() -> TableHarness {
    TableHarness::new("category")
        .hit_policy(HitPolicy::First)
        .input("age", "age")
        .output("category")
        .rule(&["< 18"], &["\"minor\""])
        .rule(&[""], &["\"adult\""])
}

/// Engine with the given decisions deployed and metrics enabled
pub fn engine_with(decisions: Vec<Decision>) -> DecisionEngine {
    decisions
        .into_iter()
        .fold(DecisionEngineBuilder::new(), |builder, decision| {
            builder.add_decision(decision)
        })
        .build()
        .expect("engine builds")
}

// ============================================================================
// Counting backends
// ============================================================================

/// FEEL engine that counts evaluations per expression text
#[derive(Default)]
pub struct CountingFeelEngine {
    inner: DefaultFeelEngine,
    expressions: Mutex<HashMap<String, usize>>,
    unary_tests: Mutex<HashMap<String, usize>>,
}

impl CountingFeelEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expression_count(&self, text: &str) -> usize {
        self.expressions.lock().get(text).copied().unwrap_or(0)
    }

    pub fn unary_test_count(&self, text: &str) -> usize {
        self.unary_tests.lock().get(text).copied().unwrap_or(0)
    }

    pub fn reset(&self) {
        self.expressions.lock().clear();
        self.unary_tests.lock().clear();
    }
}

impl FeelEngine for CountingFeelEngine {
    fn evaluate_simple_expression(
        &self,
        expression: &str,
        context: &dyn VariableContext,
    ) -> dmn_runtime::Result<Value> {
        *self.expressions.lock().entry(expression.to_string()).or_default() += 1;
        self.inner.evaluate_simple_expression(expression, context)
    }

    fn evaluate_simple_unary_tests(
        &self,
        expression: &str,
        input_variable: &str,
        context: &dyn VariableContext,
    ) -> dmn_runtime::Result<bool> {
        *self.unary_tests.lock().entry(expression.to_string()).or_default() += 1;
        self.inner
            .evaluate_simple_unary_tests(expression, input_variable, context)
    }
}

/// Script engine whose scripts are built-in language expressions
///
/// Counts compilations and evaluations so tests can observe the compile-once
/// cache of expression nodes.
pub struct CountingScriptEngine {
    feel: Arc<DefaultFeelEngine>,
    compilable: bool,
    compilations: AtomicUsize,
    evaluations: Arc<AtomicUsize>,
}

impl CountingScriptEngine {
    pub fn compiling() -> Self {
        Self::with_compilation(true)
    }

    pub fn interpreting() -> Self {
        Self::with_compilation(false)
    }

    fn with_compilation(compilable: bool) -> Self {
        Self {
            feel: Arc::new(DefaultFeelEngine::new()),
            compilable,
            compilations: AtomicUsize::new(0),
            evaluations: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn compilations(&self) -> usize {
        self.compilations.load(Ordering::SeqCst)
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::SeqCst)
    }
}

struct CountingCompiledScript {
    script: String,
    feel: Arc<DefaultFeelEngine>,
    evaluations: Arc<AtomicUsize>,
}

impl CompiledScript for CountingCompiledScript {
    fn eval(&self, context: &dyn VariableContext) -> dmn_runtime::Result<Value> {
        self.evaluations.fetch_add(1, Ordering::SeqCst);
        self.feel.evaluate_simple_expression(&self.script, context)
    }
}

impl ScriptEngine for CountingScriptEngine {
    fn eval(&self, script: &str, context: &dyn VariableContext) -> dmn_runtime::Result<Value> {
        self.evaluations.fetch_add(1, Ordering::SeqCst);
        self.feel.evaluate_simple_expression(script, context)
    }

    fn supports_compilation(&self) -> bool {
        self.compilable
    }

    fn compile(&self, script: &str) -> dmn_runtime::Result<Arc<dyn CompiledScript>> {
        self.compilations.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(CountingCompiledScript {
            script: script.to_string(),
            feel: Arc::clone(&self.feel),
            evaluations: Arc::clone(&self.evaluations),
        }))
    }
}

/// Template provider counting the expressions it creates
#[derive(Default)]
pub struct CountingElProvider {
    inner: TemplateElProvider,
    created: AtomicUsize,
}

impl CountingElProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl ElProvider for CountingElProvider {
    fn create_expression(&self, expression: &str) -> dmn_runtime::Result<Arc<dyn ElExpression>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        self.inner.create_expression(expression)
    }
}

// ============================================================================
// Result assertions
// ============================================================================

pub trait ResultAssertions {
    /// Assert rows and their entries, in order
    fn assert_rows(&self, expected: &[&[(&str, Value)]]);
    fn assert_single_entry(&self, expected: Value);
    fn assert_empty(&self);
}

impl ResultAssertions for DecisionResult {
    fn assert_rows(&self, expected: &[&[(&str, Value)]]) {
        assert_eq!(
            self.len(),
            expected.len(),
            "Expected {} row(s), got {}",
            expected.len(),
            self
        );
        for (row, expected_row) in self.iter().zip(expected) {
            let actual: Vec<(&str, &Value)> =
                row.iter().map(|(name, typed)| (name, &typed.value)).collect();
            let expected: Vec<(&str, &Value)> =
                expected_row.iter().map(|(name, value)| (*name, value)).collect();
            assert_eq!(actual.len(), expected.len(), "Unexpected entries in row {}", row);
            for ((actual_name, actual_value), (expected_name, expected_value)) in
                actual.iter().zip(&expected)
            {
                assert_eq!(actual_name, expected_name);
                assert!(
                    actual_value.loosely_equals(expected_value),
                    "Expected {} = {}, got {}",
                    expected_name,
                    expected_value,
                    actual_value
                );
            }
        }
    }

    fn assert_single_entry(&self, expected: Value) {
        let actual = self
            .single_entry()
            .expect("single result")
            .unwrap_or_else(|| panic!("Expected a single entry, got {}", self));
        assert!(
            actual.loosely_equals(&expected),
            "Expected {}, got {}",
            expected,
            actual
        );
    }

    fn assert_empty(&self) {
        assert!(self.is_empty(), "Expected no result, got {}", self);
    }
}
