//! Unit tests for dmn-runtime
//!
//! Exercises the public runtime API without the SDK: variable contexts,
//! expression backends, handlers wired by hand, results and errors.

use dmn_core::{
    Decision, DecisionTable, ExpressionNode, HitPolicy, InputClause, LiteralExpression,
    OutputClause, TypedValue, Value, ValueType,
};
use dmn_runtime::{
    CompositeVariableContext, DecisionEvaluationHandler, DecisionEvaluationListener,
    DecisionResult, DecisionResultEntries, DecisionResultError, DecisionTableEvaluationEvent,
    DecisionTableEvaluationHandler, DefaultFeelEngine, DefaultHitPolicyResolver,
    DefaultScriptEngineResolver, EmptyVariableContext, EngineMetricCollector, EvaluationError,
    EvaluationSettings, ExpressionDispatcher, FeelEngine, HitPolicyError, HitPolicyResolver,
    LiteralExpressionEvaluationHandler, RuntimeError, TemplateElProvider, VariableContext,
    Variables,
};
use rust_decimal::Decimal;
use std::sync::Arc;

fn dispatcher() -> ExpressionDispatcher {
    ExpressionDispatcher::new(
        Arc::new(DefaultFeelEngine::new()),
        Arc::new(TemplateElProvider::new()),
        Arc::new(DefaultScriptEngineResolver::new()),
    )
}

fn handler_with(
    resolver: Arc<dyn HitPolicyResolver>,
    metrics: Option<Arc<EngineMetricCollector>>,
) -> DecisionEvaluationHandler {
    let settings = EvaluationSettings::default();
    let listeners = metrics
        .into_iter()
        .map(|collector| collector as Arc<dyn DecisionEvaluationListener>)
        .collect();
    DecisionEvaluationHandler::new(
        DecisionTableEvaluationHandler::new(dispatcher(), resolver, Vec::new(), settings.clone()),
        LiteralExpressionEvaluationHandler::new(dispatcher(), settings),
        listeners,
    )
}

fn handler() -> DecisionEvaluationHandler {
    handler_with(Arc::new(DefaultHitPolicyResolver::new()), None)
}

fn shipping_table(hit_policy: HitPolicy) -> Arc<Decision> {
    let table = DecisionTable::builder("shipping")
        .hit_policy(hit_policy)
        .input(InputClause::new("weight", ExpressionNode::new("weight-expr", "parcel.weight")))
        .output(OutputClause::new("carrier-out", "carrier"))
        .output(OutputClause::new("cost-out", "cost"))
        .rule_texts(&["< 2"], &["\"post\"", "5"])
        .rule_texts(&["< 20"], &["\"courier\"", "parcel.weight * 2"])
        .rule_texts(&[">= 20"], &["\"freight\"", "100"])
        .build()
        .unwrap();
    Arc::new(Decision::table("shipping", table))
}

// ========== Context Tests ==========

#[test]
fn test_variables_builder() {
    let variables = Variables::new()
        .put_value("name", "Ada")
        .put_value("age", 36)
        .put_value_typed("score", TypedValue::new(Value::Integer(7), ValueType::Long));

    assert_eq!(variables.len(), 3);
    assert_eq!(variables.get_value("name"), Some(&Value::from("Ada")));
    assert_eq!(variables.get("score").unwrap().value_type, ValueType::Long);
    assert!(variables.contains_variable("age"));
    assert!(!variables.contains_variable("missing"));
}

#[test]
fn test_variables_from_json_and_iterator() {
    let from_json = Variables::from_json(serde_json::json!({"a": 1, "b": {"c": true}}));
    assert_eq!(from_json.len(), 2);
    assert!(matches!(from_json.get_value("b"), Some(Value::Object(_))));

    let collected: Variables = vec![("x", 1), ("y", 2)].into_iter().collect();
    let names: Vec<&str> = collected.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["x", "y"]);
}

#[test]
fn test_composite_context_prefers_child() {
    let parent = Variables::new().put_value("a", 1).put_value("b", 2);
    let child = Variables::new().put_value("a", 10);
    let composite = CompositeVariableContext::compose(&child, &parent);

    assert_eq!(composite.resolve("a").unwrap().value, Value::Integer(10));
    assert_eq!(composite.resolve("b").unwrap().value, Value::Integer(2));
    assert!(composite.resolve("c").is_none());
    assert!(EmptyVariableContext.resolve("a").is_none());
}

// ========== Expression Backend Tests ==========

#[test]
fn test_feel_engine_expression_and_unary_tests() {
    let engine = DefaultFeelEngine::new();
    let variables = Variables::new().put_value("a", 2).put_value("b", 3);

    assert_eq!(
        engine.evaluate_simple_expression("a + b", &variables).unwrap(),
        Value::Integer(5)
    );
    assert!(engine
        .evaluate_simple_unary_tests("< 3", "a", &variables)
        .unwrap());
    assert!(!engine
        .evaluate_simple_unary_tests("not(3)", "b", &variables)
        .unwrap());
}

#[test]
fn test_feel_engine_cache_is_bounded() {
    let engine = DefaultFeelEngine::with_cache_size(2);
    let variables = Variables::new().put_value("x", 1);
    for text in ["x + 1", "x + 2", "x + 3", "x + 1"] {
        engine.evaluate_simple_expression(text, &variables).unwrap();
    }
    assert_eq!(engine.cached_entries(), (2, 0));
}

#[test]
fn test_dispatcher_routes_by_language() {
    let dispatcher = dispatcher();
    let variables = Variables::new().put_value("name", "Ada").put_value("n", 4);

    let feel = ExpressionNode::new("feel", "n * 2");
    assert_eq!(
        dispatcher.evaluate_expression("FEEL", &feel, &variables).unwrap(),
        Value::Integer(8)
    );

    let template = ExpressionNode::new("template", "${name} signed in");
    assert_eq!(
        dispatcher.evaluate_expression("juel", &template, &variables).unwrap(),
        Value::from("Ada signed in")
    );

    let blank = ExpressionNode::new("blank", "   ");
    assert_eq!(
        dispatcher.evaluate_expression("feel", &blank, &variables).unwrap(),
        Value::Null
    );
}

#[test]
fn test_dispatcher_wraps_body_with_inner_delimiter() {
    let dispatcher = dispatcher();
    let variables = Variables::new().put_value("label", "${x}");

    // a `${` inside a string literal does not make the body a template
    let node = ExpressionNode::new("equals", r#"label == "${x}""#);
    assert_eq!(
        dispatcher.evaluate_expression("juel", &node, &variables).unwrap(),
        Value::Bool(true)
    );
}

#[test]
fn test_dispatcher_errors() {
    let dispatcher = dispatcher();
    let node = ExpressionNode::new("node", "n +");

    let err = dispatcher
        .evaluate_expression("feel", &node, &EmptyVariableContext)
        .unwrap_err();
    match err {
        EvaluationError::Expression {
            expression,
            language,
            source,
        } => {
            assert_eq!(expression, "n +");
            assert_eq!(language, "feel");
            assert!(matches!(source, RuntimeError::Parse(_)));
        }
        other => panic!("Expected expression error, got {:?}", other),
    }

    let err = dispatcher
        .evaluate_expression("python", &ExpressionNode::new("py", "1"), &EmptyVariableContext)
        .unwrap_err();
    assert!(matches!(err, EvaluationError::UnresolvedLanguage { .. }));
}

// ========== Handler Tests ==========

#[test]
fn test_table_with_multiple_outputs() {
    let decision = shipping_table(HitPolicy::Unique);
    let variables = Variables::from_json(serde_json::json!({"parcel": {"weight": 7}}));

    let result = handler().evaluate_decision(&decision, &variables).unwrap();
    let row = result.single_result().unwrap().unwrap();
    assert_eq!(row.get("carrier"), Some(&Value::from("courier")));
    assert_eq!(row.get("cost"), Some(&Value::Integer(14)));
    assert!(row.single_entry().is_err());
}

#[test]
fn test_literal_decision() {
    let decision = Arc::new(Decision::literal(
        "vat",
        LiteralExpression::new("vat", ExpressionNode::new("vat-expr", "net * 20 / 100")),
    ));
    let result = handler()
        .evaluate_decision(&decision, &Variables::new().put_value("net", 50))
        .unwrap();
    // integer division is exact
    assert_eq!(
        result.single_entry().unwrap(),
        Some(&Value::Decimal(Decimal::from(10)))
    );
}

/// Keeps only the last matching rule
struct LastMatchResolver;

impl HitPolicyResolver for LastMatchResolver {
    fn apply(
        &self,
        _table: &DecisionTable,
        event: &mut DecisionTableEvaluationEvent,
    ) -> Result<(), HitPolicyError> {
        if let Some(last) = event.matching_rules.pop() {
            event.matching_rules = vec![last];
        }
        Ok(())
    }
}

#[test]
fn test_custom_hit_policy_resolver() {
    let decision = shipping_table(HitPolicy::RuleOrder);
    let variables = Variables::from_json(serde_json::json!({"parcel": {"weight": 1}}));

    let default = handler().evaluate_decision(&decision, &variables).unwrap();
    assert_eq!(default.len(), 2);

    let custom = handler_with(Arc::new(LastMatchResolver), None)
        .evaluate_decision(&decision, &variables)
        .unwrap();
    assert_eq!(custom.collect_entries("carrier"), vec![&Value::from("courier")]);
}

#[test]
fn test_metric_collector_as_listener() {
    let collector = Arc::new(EngineMetricCollector::new());
    let handler = handler_with(
        Arc::new(DefaultHitPolicyResolver::new()),
        Some(Arc::clone(&collector)),
    );
    let decision = shipping_table(HitPolicy::First);
    let variables = Variables::from_json(serde_json::json!({"parcel": {"weight": 30}}));

    let event = handler.evaluate_decision_event(&decision, &variables).unwrap();
    // (1 input + 2 outputs) * 3 rules
    assert_eq!(event.executed_decision_elements, 9);
    assert_eq!(collector.executed_decision_elements(), 9);
    assert_eq!(collector.executed_decision_instances(), 1);
}

// ========== Result Tests ==========

fn row(entries: &[(&str, Value)]) -> DecisionResultEntries {
    let mut row = DecisionResultEntries::new();
    for (name, value) in entries {
        row.put_value(*name, TypedValue::untyped(value.clone()));
    }
    row
}

#[test]
fn test_decision_result_accessors() {
    let result = DecisionResult::new(vec![
        row(&[("tag", Value::from("a")), ("weight", Value::Integer(1))]),
        row(&[("tag", Value::from("b"))]),
    ]);

    assert_eq!(result.len(), 2);
    assert_eq!(result.first_result().unwrap().first_entry(), Some(&Value::from("a")));
    assert_eq!(
        result.collect_entries("tag"),
        vec![&Value::from("a"), &Value::from("b")]
    );
    assert_eq!(result.collect_entries("weight"), vec![&Value::Integer(1)]);
    assert_eq!(result.to_string(), "[{tag: a, weight: 1}, {tag: b}]");
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        serde_json::json!([{"tag": "a", "weight": 1}, {"tag": "b"}])
    );
}

#[test]
fn test_decision_result_single_access_errors() {
    let result = DecisionResult::new(vec![row(&[("a", 1.into())]), row(&[("a", 2.into())])]);
    assert_eq!(
        result.single_result().unwrap_err(),
        DecisionResultError::SingleResultExpected {
            count: 2,
            results: "[{a: 1}, {a: 2}]".to_string(),
        }
    );

    let empty = DecisionResult::default();
    assert_eq!(empty.single_entry().unwrap(), None);
}

// ========== Error Tests ==========

#[test]
fn test_in_decision_and_root() {
    let err = EvaluationError::Expression {
        expression: "x".to_string(),
        language: "feel".to_string(),
        source: RuntimeError::DivisionByZero,
    }
    .in_decision("quota");
    assert!(err.to_string().starts_with("Error while evaluating decision 'quota'"));
    assert!(matches!(err.root(), EvaluationError::Expression { .. }));

    let listener = EvaluationError::Listener("boom".to_string()).in_decision("quota");
    assert_eq!(listener.to_string(), "Evaluation listener failed: boom");
}

#[test]
fn test_hit_policy_error_messages() {
    let err = HitPolicyError::UniqueViolation {
        rule_ids: vec!["r1".to_string(), "r2".to_string()],
    };
    assert_eq!(
        err.to_string(),
        "Hit policy 'UNIQUE' only allows a single rule to match, but 2 rules matched: r1, r2"
    );
}
