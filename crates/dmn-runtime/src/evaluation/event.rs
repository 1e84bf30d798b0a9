//! Evaluation events
//!
//! An event accumulates what one evaluation produced: the evaluated inputs,
//! the matching rules with their typed outputs, or the single output of a
//! literal expression. Listeners observe events and the result builder
//! consumes them.

use dmn_core::definition::BuiltinAggregator;
use dmn_core::{Decision, HitPolicy, TypedValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Value of one input clause, evaluated once per evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedInput {
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Name the value was bound to while testing the column's conditions
    pub input_variable: String,

    pub value: TypedValue,
}

/// Value of one conclusion of a matching rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedOutput {
    pub id: String,
    pub output_name: String,
    pub value: TypedValue,
}

/// A matching rule with its evaluated conclusions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedDecisionRule {
    pub id: String,

    /// Conclusions keyed by output name, in output clause order
    pub output_entries: IndexMap<String, EvaluatedOutput>,
}

impl EvaluatedDecisionRule {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            output_entries: IndexMap::new(),
        }
    }

    pub fn output_value(&self, output_name: &str) -> Option<&TypedValue> {
        self.output_entries.get(output_name).map(|output| &output.value)
    }
}

/// Outcome of evaluating a decision table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTableEvaluationEvent {
    pub decision_key: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_name: Option<String>,

    pub hit_policy: HitPolicy,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<BuiltinAggregator>,

    /// One entry per input clause, in clause order
    pub inputs: Vec<EvaluatedInput>,

    /// Matching rules, as shaped by the hit policy
    pub matching_rules: Vec<EvaluatedDecisionRule>,

    /// Output name of an aggregated COLLECT result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collect_result_name: Option<String>,

    /// Aggregated COLLECT result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collect_result_value: Option<TypedValue>,

    pub executed_decision_elements: u64,
}

impl DecisionTableEvaluationEvent {
    pub fn new(decision: &Decision, hit_policy: HitPolicy) -> Self {
        Self {
            decision_key: decision.key.clone(),
            decision_name: decision.name.clone(),
            hit_policy,
            aggregation: None,
            inputs: Vec::new(),
            matching_rules: Vec::new(),
            collect_result_name: None,
            collect_result_value: None,
            executed_decision_elements: decision.executed_decision_elements(),
        }
    }

    pub fn matching_rule_ids(&self) -> Vec<String> {
        self.matching_rules.iter().map(|rule| rule.id.clone()).collect()
    }
}

/// Outcome of evaluating a literal expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralExpressionEvaluationEvent {
    pub decision_key: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_name: Option<String>,

    pub output_name: String,
    pub output_value: TypedValue,
    pub executed_decision_elements: u64,
}

/// Outcome of evaluating the logic of one decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecisionLogicEvaluationEvent {
    Table(DecisionTableEvaluationEvent),
    LiteralExpression(LiteralExpressionEvaluationEvent),
}

impl DecisionLogicEvaluationEvent {
    pub fn decision_key(&self) -> &str {
        match self {
            DecisionLogicEvaluationEvent::Table(event) => &event.decision_key,
            DecisionLogicEvaluationEvent::LiteralExpression(event) => &event.decision_key,
        }
    }

    pub fn executed_decision_elements(&self) -> u64 {
        match self {
            DecisionLogicEvaluationEvent::Table(event) => event.executed_decision_elements,
            DecisionLogicEvaluationEvent::LiteralExpression(event) => {
                event.executed_decision_elements
            }
        }
    }

    pub fn as_table(&self) -> Option<&DecisionTableEvaluationEvent> {
        match self {
            DecisionLogicEvaluationEvent::Table(event) => Some(event),
            DecisionLogicEvaluationEvent::LiteralExpression(_) => None,
        }
    }
}

/// Outcome of evaluating a decision and its required decisions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionEvaluationEvent {
    /// Event of the decision that was asked for
    pub decision_result: DecisionLogicEvaluationEvent,

    /// Events of the required decisions, in evaluation order
    pub required_decision_results: Vec<DecisionLogicEvaluationEvent>,

    /// Sum over the root and all required decisions
    pub executed_decision_elements: u64,
}

impl DecisionEvaluationEvent {
    pub fn new(
        decision_result: DecisionLogicEvaluationEvent,
        required_decision_results: Vec<DecisionLogicEvaluationEvent>,
    ) -> Self {
        let executed_decision_elements = decision_result.executed_decision_elements()
            + required_decision_results
                .iter()
                .map(DecisionLogicEvaluationEvent::executed_decision_elements)
                .sum::<u64>();
        Self {
            decision_result,
            required_decision_results,
            executed_decision_elements,
        }
    }
}
