use super::*;
use crate::context::Variables;
use crate::el::{
    DefaultFeelEngine, DefaultScriptEngineResolver, ExpressionDispatcher, TemplateElProvider,
};
use crate::error::EvaluationError;
use crate::hitpolicy::DefaultHitPolicyResolver;
use crate::listener::DecisionTableEvaluationListener;
use crate::result::DecisionResult;
use dmn_core::{
    Decision, DecisionTable, ExpressionNode, HitPolicy, InputClause, LiteralExpression,
    OutputClause, TypeDefinition, TypedValue, Value, ValueType,
};
use parking_lot::Mutex;
use std::sync::Arc;

fn dispatcher() -> ExpressionDispatcher {
    ExpressionDispatcher::new(
        Arc::new(DefaultFeelEngine::new()),
        Arc::new(TemplateElProvider::new()),
        Arc::new(DefaultScriptEngineResolver::new()),
    )
}

fn table_handler(settings: EvaluationSettings) -> DecisionTableEvaluationHandler {
    DecisionTableEvaluationHandler::new(
        dispatcher(),
        Arc::new(DefaultHitPolicyResolver::new()),
        Vec::new(),
        settings,
    )
}

fn decision_handler(settings: EvaluationSettings) -> DecisionEvaluationHandler {
    DecisionEvaluationHandler::new(
        table_handler(settings.clone()),
        LiteralExpressionEvaluationHandler::new(dispatcher(), settings),
        Vec::new(),
    )
}

fn age_table() -> DecisionTable {
    DecisionTable::builder("age")
        .input(InputClause::new("in-age", ExpressionNode::new("in-age-expr", "age")))
        .output(OutputClause::new("out-category", "category"))
        .rule_texts(&["< 18"], &["\"minor\""])
        .rule_texts(&[">= 18"], &[""])
        .build()
        .unwrap()
}

#[test]
fn test_matching_rule_outputs() {
    let table = age_table();
    let decision = Decision::table("age", table.clone());
    let handler = table_handler(EvaluationSettings::default());

    let event = handler
        .evaluate(&decision, &table, &Variables::new().put_value("age", 10))
        .unwrap();
    assert_eq!(event.inputs.len(), 1);
    assert_eq!(event.inputs[0].value, TypedValue::untyped(10));
    assert_eq!(event.matching_rule_ids(), vec!["age-rule1"]);
    assert_eq!(
        event.matching_rules[0].output_value("category"),
        Some(&TypedValue::untyped("minor"))
    );
    assert_eq!(event.executed_decision_elements, 4);
}

#[test]
fn test_blank_output_switch() {
    let table = age_table();
    let decision = Decision::table("age", table.clone());
    let adult = Variables::new().put_value("age", 40);

    let event = table_handler(EvaluationSettings::default())
        .evaluate(&decision, &table, &adult)
        .unwrap();
    assert_eq!(event.matching_rule_ids(), vec!["age-rule2"]);
    assert!(event.matching_rules[0].output_entries.is_empty());

    let settings = EvaluationSettings {
        return_blank_table_output_as_null: true,
        ..Default::default()
    };
    let event = table_handler(settings)
        .evaluate(&decision, &table, &adult)
        .unwrap();
    assert_eq!(
        event.matching_rules[0].output_value("category"),
        Some(&TypedValue::untyped_null())
    );
}

#[test]
fn test_input_variable_is_scoped_to_its_column() {
    let mut table = DecisionTable::builder("scoped")
        .hit_policy(HitPolicy::RuleOrder)
        .input(
            InputClause::new("in-a", ExpressionNode::new("in-a-expr", "a"))
                .with_input_variable("first"),
        )
        .input(InputClause::without_expression("in-b"))
        .output(OutputClause::new("o", "out"))
        .rule_texts(&["", ""], &["1"])
        .build()
        .unwrap();

    // column one sees its own variable and name
    table.rules[0].conditions[0] =
        ExpressionNode::new("c1", "${first == 5 && inputVariableName == \"first\"}")
            .with_language("juel");
    // column two has no expression and sees neither
    table.rules[0].conditions[1] =
        ExpressionNode::new("c2", "${first == 5}").with_language("juel");

    let decision = Decision::table("scoped", table.clone());
    let event = table_handler(EvaluationSettings::default())
        .evaluate(&decision, &table, &Variables::new().put_value("a", 5))
        .unwrap();

    assert!(event.matching_rules.is_empty());
    assert_eq!(event.inputs[1].value, TypedValue::untyped_null());
    assert_eq!(event.inputs[0].input_variable, "first");
}

#[test]
fn test_expression_condition_must_be_exactly_true() {
    let mut table = DecisionTable::builder("strict")
        .hit_policy(HitPolicy::RuleOrder)
        .input(InputClause::new("in", ExpressionNode::new("in-expr", "flag")))
        .output(OutputClause::new("o", "out"))
        .rule_texts(&["x"], &["\"bool\""])
        .rule_texts(&["x"], &["\"number\""])
        .rule_texts(&["x"], &["\"string\""])
        .build()
        .unwrap();
    table.rules[0].conditions[0] = ExpressionNode::new("c1", "${cellInput}").with_language("juel");
    table.rules[1].conditions[0] = ExpressionNode::new("c2", "${1}").with_language("juel");
    table.rules[2].conditions[0] = ExpressionNode::new("c3", "\"true\"").with_language("juel");

    let decision = Decision::table("strict", table.clone());
    let event = table_handler(EvaluationSettings::default())
        .evaluate(&decision, &table, &Variables::new().put_value("flag", true))
        .unwrap();
    assert_eq!(event.matching_rule_ids(), vec!["strict-rule1"]);
}

#[test]
fn test_input_and_output_coercion() {
    let table = DecisionTable::builder("typed")
        .input(InputClause::new(
            "in",
            ExpressionNode::new("in-expr", "amount")
                .with_type(TypeDefinition::of(ValueType::Integer)),
        ))
        .output(OutputClause::new("o", "limit").with_type(TypeDefinition::of(ValueType::Double)))
        .rule_texts(&["> 10"], &["25"])
        .build()
        .unwrap();
    let decision = Decision::table("typed", table.clone());
    let handler = table_handler(EvaluationSettings::default());

    let event = handler
        .evaluate(&decision, &table, &Variables::new().put_value("amount", "20"))
        .unwrap();
    assert_eq!(event.inputs[0].value, TypedValue::new(Value::Integer(20), ValueType::Integer));
    assert_eq!(
        event.matching_rules[0].output_value("limit"),
        Some(&TypedValue::new(Value::Double(25.0), ValueType::Double))
    );

    let err = handler
        .evaluate(&decision, &table, &Variables::new().put_value("amount", "lots"))
        .unwrap_err();
    assert!(matches!(err, EvaluationError::Coercion(_)));
}

#[test]
fn test_listeners_see_resolved_event() {
    struct Recorder(Mutex<Vec<Vec<String>>>);

    impl DecisionTableEvaluationListener for Recorder {
        fn notify(&self, event: &DecisionTableEvaluationEvent) -> anyhow::Result<()> {
            self.0.lock().push(event.matching_rule_ids());
            Ok(())
        }
    }

    struct Failing;

    impl DecisionTableEvaluationListener for Failing {
        fn notify(&self, _event: &DecisionTableEvaluationEvent) -> anyhow::Result<()> {
            anyhow::bail!("audit sink unavailable")
        }
    }

    let table = DecisionTable::builder("first")
        .hit_policy(HitPolicy::First)
        .input(InputClause::new("in", ExpressionNode::new("in-expr", "n")))
        .output(OutputClause::new("o", "out"))
        .rule_texts(&["> 1"], &["1"])
        .rule_texts(&["> 2"], &["2"])
        .build()
        .unwrap();
    let decision = Decision::table("first", table.clone());
    let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
    let handler = DecisionTableEvaluationHandler::new(
        dispatcher(),
        Arc::new(DefaultHitPolicyResolver::new()),
        vec![recorder.clone() as Arc<dyn DecisionTableEvaluationListener>],
        EvaluationSettings::default(),
    );
    handler
        .evaluate(&decision, &table, &Variables::new().put_value("n", 5))
        .unwrap();
    assert_eq!(*recorder.0.lock(), vec![vec!["first-rule1".to_string()]]);

    let handler = DecisionTableEvaluationHandler::new(
        dispatcher(),
        Arc::new(DefaultHitPolicyResolver::new()),
        vec![Arc::new(Failing) as Arc<dyn DecisionTableEvaluationListener>],
        EvaluationSettings::default(),
    );
    let err = handler
        .evaluate(&decision, &table, &Variables::new().put_value("n", 5))
        .unwrap_err();
    assert_eq!(err.to_string(), "Evaluation listener failed: audit sink unavailable");
}

#[test]
fn test_literal_expression_single_output() {
    let decision = Arc::new(Decision::literal(
        "total",
        LiteralExpression::new("result", ExpressionNode::new("expr", "amount * 1.1")),
    ));
    let result = decision_handler(EvaluationSettings::default())
        .evaluate_decision(&decision, &Variables::new().put_value("amount", 100))
        .unwrap();

    assert_eq!(result.len(), 1);
    let row = result.single_result().unwrap().unwrap();
    assert_eq!(row.len(), 1);
    assert!(row.get("result").unwrap().loosely_equals(&Value::Integer(110)));
}

#[test]
fn test_errors_name_the_decision() {
    let decision = Arc::new(Decision::literal(
        "broken",
        LiteralExpression::new("result", ExpressionNode::new("expr", "amount / 0")),
    ));
    let err = decision_handler(EvaluationSettings::default())
        .evaluate_decision(&decision, &Variables::new().put_value("amount", 1))
        .unwrap_err();
    assert!(matches!(
        err,
        EvaluationError::InDecision { ref decision_key, .. } if decision_key == "broken"
    ));
    assert!(matches!(err.root(), EvaluationError::Expression { .. }));
}

#[test]
fn test_required_decision_results_are_visible() {
    let collected = DecisionTable::builder("tags")
        .hit_policy(HitPolicy::Collect)
        .output(OutputClause::new("o", "tag"))
        .rule_texts(&[], &["\"a\""])
        .rule_texts(&[], &["\"b\""])
        .build()
        .unwrap();
    let tags = Arc::new(Decision::table("tags", collected));
    let base = Arc::new(Decision::literal(
        "base",
        LiteralExpression::new("base", ExpressionNode::new("base-expr", "40")),
    ));
    let root = Arc::new(
        Decision::literal(
            "summary",
            LiteralExpression::new("summary", ExpressionNode::new("summary-expr", "[base + 2, tag]")),
        )
        .requires(base)
        .requires(tags),
    );

    let handler = decision_handler(EvaluationSettings::default());
    let event = handler
        .evaluate_decision_event(&root, &Variables::new())
        .unwrap();
    assert_eq!(event.required_decision_results.len(), 2);
    assert_eq!(event.executed_decision_elements, 1 + 1 + 2);

    let result = DecisionResult::from_event(&event.decision_result);
    assert_eq!(
        result.single_entry().unwrap(),
        Some(&Value::List(vec![
            Value::Integer(42),
            Value::List(vec![Value::from("a"), Value::from("b")]),
        ]))
    );
}
