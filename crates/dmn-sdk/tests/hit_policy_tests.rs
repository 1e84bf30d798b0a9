//! Integration tests for hit policies applied by the engine

mod common;

use common::{engine_with, ResultAssertions, TableHarness};
use dmn_core::definition::BuiltinAggregator;
use dmn_core::{HitPolicy, OutputClause, Value, ValueType};
use dmn_runtime::{EvaluationError, HitPolicyError, Variables};
use dmn_sdk::SdkError;

fn hit_policy_error(err: SdkError) -> HitPolicyError {
    match err {
        SdkError::EvaluationError(EvaluationError::HitPolicy(err)) => err,
        other => panic!("Expected hit policy error, got {:?}", other),
    }
}

/// Rules matching `n` at 1, 2 and 3 with outputs 10, 20 and 5
fn points(hit_policy: HitPolicy) -> TableHarness {
    TableHarness::new("points")
        .hit_policy(hit_policy)
        .input("n", "n")
        .output("points")
        .rule(&[">= 1"], &["10"])
        .rule(&[">= 2"], &["20"])
        .rule(&[">= 3"], &["5"])
}

// ============================================================================
// Single hit
// ============================================================================

#[test]
fn test_unique() {
    let engine = engine_with(vec![points(HitPolicy::Unique).decision()]);

    engine
        .evaluate("points", &Variables::new().put_value("n", 1))
        .unwrap()
        .assert_single_entry(Value::Integer(10));

    let err = engine
        .evaluate("points", &Variables::new().put_value("n", 2))
        .unwrap_err();
    assert_eq!(
        hit_policy_error(err),
        HitPolicyError::UniqueViolation {
            rule_ids: vec!["points-rule1".to_string(), "points-rule2".to_string()],
        }
    );
}

#[test]
fn test_any() {
    let decision = TableHarness::new("eligible")
        .hit_policy(HitPolicy::Any)
        .input("age", "age")
        .output("eligible")
        .rule(&[">= 18"], &["true"])
        .rule(&[">= 21"], &["true"])
        .rule(&[">= 65"], &["false"])
        .decision();
    let engine = engine_with(vec![decision]);

    engine
        .evaluate("eligible", &Variables::new().put_value("age", 30))
        .unwrap()
        .assert_rows(&[&[("eligible", Value::Bool(true))]]);

    let err = engine
        .evaluate("eligible", &Variables::new().put_value("age", 70))
        .unwrap_err();
    assert!(matches!(hit_policy_error(err), HitPolicyError::AnyViolation { .. }));
}

#[test]
fn test_first() {
    let engine = engine_with(vec![points(HitPolicy::First).decision()]);
    engine
        .evaluate("points", &Variables::new().put_value("n", 3))
        .unwrap()
        .assert_rows(&[&[("points", Value::Integer(10))]]);
}

#[test]
fn test_priority() {
    let decision = TableHarness::new("risk")
        .hit_policy(HitPolicy::Priority)
        .input("score", "score")
        .output_clause(
            OutputClause::new("risk-out", "risk").with_output_values(["high", "medium", "low"]),
        )
        .rule(&[""], &["\"low\""])
        .rule(&["> 50"], &["\"medium\""])
        .rule(&["> 80"], &["\"high\""])
        .decision();
    let engine = engine_with(vec![decision]);

    engine
        .evaluate("risk", &Variables::new().put_value("score", 60))
        .unwrap()
        .assert_single_entry(Value::from("medium"));
    engine
        .evaluate("risk", &Variables::new().put_value("score", 90))
        .unwrap()
        .assert_single_entry(Value::from("high"));
}

#[test]
fn test_priority_requires_a_match() {
    let decision = TableHarness::new("risk")
        .hit_policy(HitPolicy::Priority)
        .input("score", "score")
        .output_clause(OutputClause::new("risk-out", "risk").with_output_values(["high", "low"]))
        .rule(&["> 80"], &["\"high\""])
        .decision();
    let engine = engine_with(vec![decision]);

    let err = engine
        .evaluate("risk", &Variables::new().put_value("score", 10))
        .unwrap_err();
    assert!(matches!(hit_policy_error(err), HitPolicyError::NoMatchingRule { .. }));
}

// ============================================================================
// Multiple hits
// ============================================================================

#[test]
fn test_rule_order_and_collect_keep_rule_order() {
    for hit_policy in [HitPolicy::RuleOrder, HitPolicy::Collect] {
        let engine = engine_with(vec![points(hit_policy).decision()]);
        engine
            .evaluate("points", &Variables::new().put_value("n", 3))
            .unwrap()
            .assert_rows(&[
                &[("points", Value::Integer(10))],
                &[("points", Value::Integer(20))],
                &[("points", Value::Integer(5))],
            ]);
    }
}

#[test]
fn test_output_order() {
    let decision = TableHarness::new("actions")
        .hit_policy(HitPolicy::OutputOrder)
        .input("score", "score")
        .output_clause(
            OutputClause::new("action-out", "action")
                .with_output_values(["block", "review", "notify"]),
        )
        .rule(&[""], &["\"notify\""])
        .rule(&["> 90"], &["\"block\""])
        .rule(&["> 50"], &["\"review\""])
        .rule(&["> 10"], &["\"notify\""])
        .decision();
    let engine = engine_with(vec![decision]);

    let result = engine
        .evaluate("actions", &Variables::new().put_value("score", 95))
        .unwrap();
    let actions: Vec<&Value> = result.collect_entries("action");
    assert_eq!(
        actions,
        vec![
            &Value::from("block"),
            &Value::from("review"),
            &Value::from("notify"),
            &Value::from("notify"),
        ]
    );
}

// ============================================================================
// Aggregation
// ============================================================================

#[test]
fn test_collect_sum() {
    let decision = points(HitPolicy::Collect)
        .aggregation(BuiltinAggregator::Sum)
        .decision();
    let engine = engine_with(vec![decision]);

    let result = engine
        .evaluate("points", &Variables::new().put_value("n", 3))
        .unwrap();
    let total = result.first_result().unwrap().get_typed("points").unwrap();
    assert_eq!(total.value, Value::Integer(35));
    assert_eq!(total.value_type, ValueType::Long);

    // nothing to sum
    engine
        .evaluate("points", &Variables::new().put_value("n", 0))
        .unwrap()
        .assert_empty();
}

#[test]
fn test_collect_min_and_max() {
    let min = points(HitPolicy::Collect).aggregation(BuiltinAggregator::Min);
    let max = TableHarness::new("max-points")
        .aggregation(BuiltinAggregator::Max)
        .input("n", "n")
        .output("points")
        .rule(&[">= 1"], &["10"])
        .rule(&[">= 2"], &["20.5"])
        .rule(&[">= 3"], &["5"]);
    let engine = engine_with(vec![min.decision(), max.decision()]);
    let variables = Variables::new().put_value("n", 3);

    engine
        .evaluate("points", &variables)
        .unwrap()
        .assert_single_entry(Value::Integer(5));
    engine
        .evaluate("max-points", &variables)
        .unwrap()
        .assert_single_entry(Value::Double(20.5));
}

#[test]
fn test_collect_count() {
    let decision = points(HitPolicy::Collect)
        .aggregation(BuiltinAggregator::Count)
        .decision();
    let engine = engine_with(vec![decision]);

    engine
        .evaluate("points", &Variables::new().put_value("n", 2))
        .unwrap()
        .assert_rows(&[&[("points", Value::Integer(2))]]);

    let result = engine
        .evaluate("points", &Variables::new().put_value("n", 0))
        .unwrap();
    let count = result.first_result().unwrap().get_typed("points").unwrap();
    assert_eq!(count.value, Value::Integer(0));
    assert_eq!(count.value_type, ValueType::Integer);
}

#[test]
fn test_aggregation_on_multiple_outputs_is_rejected() {
    let decision = TableHarness::new("pair")
        .aggregation(BuiltinAggregator::Sum)
        .input("n", "n")
        .output("a")
        .output("b")
        .rule(&[""], &["1", "2"])
        .decision();
    let engine = engine_with(vec![decision]);

    let err = engine
        .evaluate("pair", &Variables::new().put_value("n", 1))
        .unwrap_err();
    assert!(matches!(
        hit_policy_error(err),
        HitPolicyError::AggregationOnMultipleOutputs { outputs: 2, .. }
    ));
}
