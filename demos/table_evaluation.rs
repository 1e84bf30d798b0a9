//! Decision table evaluation example
//!
//! This example demonstrates:
//! - Building a decision table with the table builder
//! - Deploying it into a DecisionEngine
//! - Observing matched rules with a table listener
//!
//! Run with `RUST_LOG=dmn_runtime=debug` to see each evaluation.

use dmn_core::{DecisionTable, ExpressionNode, HitPolicy, InputClause, OutputClause};
use dmn_runtime::{DecisionTableEvaluationEvent, DecisionTableEvaluationListener};
use dmn_sdk::{Decision, DecisionEngineBuilder, Variables};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Prints the ids of the rules that matched
struct MatchedRulesPrinter;

impl DecisionTableEvaluationListener for MatchedRulesPrinter {
    fn notify(&self, event: &DecisionTableEvaluationEvent) -> anyhow::Result<()> {
        let ids: Vec<&str> = event.matching_rules.iter().map(|rule| rule.id.as_str()).collect();
        println!("  [{}] matched rules: {:?}", event.decision_key, ids);
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    println!("=== Decision Table Example ===\n");

    let table = DecisionTable::builder("discount")
        .hit_policy(HitPolicy::First)
        .input(InputClause::new(
            "tier",
            ExpressionNode::new("tier-expr", "customer.tier"),
        ))
        .input(InputClause::new(
            "total",
            ExpressionNode::new("total-expr", "order.total"),
        ))
        .output(OutputClause::new("rate-out", "rate"))
        .output(OutputClause::new("reason-out", "reason"))
        .rule_texts(&["\"gold\"", ">= 1000"], &["0.15", "\"gold, large order\""])
        .rule_texts(&["\"gold\"", ""], &["0.10", "\"gold\""])
        .rule_texts(&["\"silver\", \"bronze\"", "[500..1000)"], &["0.05", "\"mid order\""])
        .rule_texts(&["", ""], &["0", "\"no discount\""])
        .build()?;

    let engine = DecisionEngineBuilder::new()
        .add_table_listener(Arc::new(MatchedRulesPrinter))
        .add_decision(Decision::table("discount", table))
        .build()?;
    tracing::info!("Discount engine ready");

    let orders = [
        serde_json::json!({"customer": {"tier": "gold"}, "order": {"total": 1500}}),
        serde_json::json!({"customer": {"tier": "silver"}, "order": {"total": 750}}),
        serde_json::json!({"customer": {"tier": "bronze"}, "order": {"total": 120}}),
    ];

    for order in orders {
        println!("Order: {}", order);
        let result = engine.evaluate("discount", &Variables::from_json(order))?;
        if let Some(row) = result.first_result() {
            for (name, value) in row.iter() {
                println!("  {} = {}", name, value.value);
            }
        }
        println!();
    }

    if let Some(metrics) = engine.metrics() {
        println!(
            "Executed decision elements: {}",
            metrics.executed_decision_elements()
        );
    }

    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dmn_sdk=info,dmn_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))
}
