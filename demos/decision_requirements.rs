//! Decision requirements example
//!
//! This example demonstrates:
//! - A decision table that consumes the results of required decisions
//! - Loading the engine configuration from YAML
//! - Inspecting the full evaluation event

use dmn_core::{DecisionTable, ExpressionNode, HitPolicy, InputClause, LiteralExpression, OutputClause};
use dmn_sdk::{Decision, DecisionEngineBuilder, EngineConfig, Variables};
use std::sync::Arc;

const CONFIG: &str = r#"
feel_cache_size: 256
enable_metrics: true
return_blank_table_output_as_null: false
"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dmn_sdk=info".into()),
        )
        .init();

    println!("=== Decision Requirements Example ===\n");

    let season = DecisionTable::builder("season")
        .hit_policy(HitPolicy::Unique)
        .input(InputClause::new(
            "temperature",
            ExpressionNode::new("temperature-expr", "weather.temperature"),
        ))
        .output(OutputClause::new("season-out", "season"))
        .rule_texts(&["< 10"], &["\"Winter\""])
        .rule_texts(&["[10..20]"], &["\"Spring\""])
        .rule_texts(&["> 20"], &["\"Summer\""])
        .build()?;

    let guests = LiteralExpression::new(
        "guestCount",
        ExpressionNode::new("guests-expr", "adults + children"),
    );

    let dish = DecisionTable::builder("dish")
        .input(InputClause::new("season-in", ExpressionNode::new("season-in-expr", "season")))
        .input(InputClause::new("guests-in", ExpressionNode::new("guests-in-expr", "guestCount")))
        .output(OutputClause::new("dish-out", "dish"))
        .rule_texts(&["\"Winter\"", "<= 8"], &["\"Roastbeef\""])
        .rule_texts(&["\"Winter\"", "> 8"], &["\"Stew\""])
        .rule_texts(&["\"Spring\"", ""], &["\"Steak\""])
        .rule_texts(&["\"Summer\"", ""], &["\"Light Salad\""])
        .build()?;

    let decision = Decision::table("dish", dish)
        .with_name("Dish")
        .requires(Arc::new(Decision::table("season", season)))
        .requires(Arc::new(Decision::literal("guestCount", guests)));

    let engine = DecisionEngineBuilder::new()
        .with_config(EngineConfig::from_yaml_str(CONFIG)?)
        .add_decision(decision)
        .build()?;

    println!("Deployed decisions: {:?}\n", engine.repository().decision_keys());

    let variables = Variables::from_json(serde_json::json!({
        "weather": {"temperature": 4},
        "adults": 6,
        "children": 5,
    }));

    let decision = engine.find_decision("dish")?;
    let event = engine.evaluate_decision_event(&decision, &variables)?;

    for required in &event.required_decision_results {
        println!("Required decision: {}", required.decision_key());
    }
    println!("Executed decision elements: {}", event.executed_decision_elements);

    let result = engine.evaluate("dish", &variables)?;
    println!("Dish: {:?}", result.single_entry()?);

    Ok(())
}
