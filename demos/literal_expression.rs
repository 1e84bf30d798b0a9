//! Literal expression example
//!
//! This example demonstrates:
//! - Literal expression decisions in the built-in expression language
//! - The same decision written as a template
//! - Typed results

use dmn_core::{ExpressionNode, LiteralExpression, TypeDefinition, ValueType};
use dmn_sdk::{Decision, DecisionEngineBuilder, DecisionRequest, Value};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Literal Expression Example ===\n");

    let gross = Decision::literal(
        "gross",
        LiteralExpression::new("gross", ExpressionNode::new("gross-expr", "amount * 1.19")),
    );
    let label = Decision::literal(
        "label",
        LiteralExpression::new(
            "label",
            ExpressionNode::new("label-expr", "${customer}: invoice of ${amount}")
                .with_language("juel"),
        )
        .with_type(TypeDefinition::of(ValueType::String)),
    );

    let engine = DecisionEngineBuilder::new()
        .add_decision(gross)
        .add_decision(label)
        .build()?;

    for key in ["gross", "label"] {
        let request = DecisionRequest::new(key)
            .with_variable("amount", Value::Integer(250))
            .with_variable("customer", Value::from("ACME"))
            .with_metadata("request_id", format!("req-{}", key));

        let response = engine.decide(request)?;
        println!("Decision: {}", response.decision_key);
        println!("  Result: {}", serde_json::to_string(&response.result)?);
        println!("  Executed elements: {}", response.executed_decision_elements);
        println!("  Processing Time: {}ms\n", response.processing_time_ms);
    }

    Ok(())
}
