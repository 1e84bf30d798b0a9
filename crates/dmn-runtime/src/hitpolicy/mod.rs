//! Hit policy resolution
//!
//! The table evaluation hands every matching rule to a [`HitPolicyResolver`],
//! which selects, orders or aggregates them into the final rows.

mod aggregation;
mod sorting;

use crate::error::HitPolicyError;
use crate::evaluation::{DecisionTableEvaluationEvent, EvaluatedDecisionRule};
use dmn_core::{DecisionTable, HitPolicy};

/// Shapes the matching rules of a table evaluation
pub trait HitPolicyResolver: Send + Sync {
    fn apply(
        &self,
        table: &DecisionTable,
        event: &mut DecisionTableEvaluationEvent,
    ) -> Result<(), HitPolicyError>;
}

/// Resolver for the standard hit policies and COLLECT aggregators
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHitPolicyResolver;

impl DefaultHitPolicyResolver {
    pub fn new() -> Self {
        Self
    }
}

impl HitPolicyResolver for DefaultHitPolicyResolver {
    fn apply(
        &self,
        table: &DecisionTable,
        event: &mut DecisionTableEvaluationEvent,
    ) -> Result<(), HitPolicyError> {
        match table.hit_policy {
            HitPolicy::Unique => {
                if event.matching_rules.len() > 1 {
                    return Err(HitPolicyError::UniqueViolation {
                        rule_ids: event.matching_rule_ids(),
                    });
                }
            }
            HitPolicy::Any => {
                if let Some((first, rest)) = event.matching_rules.split_first() {
                    if rest.iter().any(|rule| !same_outputs(first, rule)) {
                        return Err(HitPolicyError::AnyViolation {
                            rule_ids: event.matching_rule_ids(),
                        });
                    }
                }
                event.matching_rules.truncate(1);
            }
            HitPolicy::First => event.matching_rules.truncate(1),
            HitPolicy::RuleOrder => {}
            HitPolicy::Collect => {
                if let Some(aggregator) = table.aggregation {
                    aggregation::aggregate(aggregator, table, event)?;
                }
            }
            HitPolicy::Priority | HitPolicy::OutputOrder => {
                sorting::apply(table.hit_policy, table, event)?;
            }
        }

        tracing::debug!(
            "Hit policy {} kept {} rule(s) of decision '{}'",
            table.hit_policy,
            event.matching_rules.len(),
            event.decision_key
        );
        Ok(())
    }
}

fn same_outputs(left: &EvaluatedDecisionRule, right: &EvaluatedDecisionRule) -> bool {
    left.output_entries.len() == right.output_entries.len()
        && left.output_entries.iter().all(|(name, output)| {
            right
                .output_value(name)
                .is_some_and(|value| value.value.loosely_equals(&output.value.value))
        })
}
