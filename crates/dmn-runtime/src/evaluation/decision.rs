//! Decision evaluation with required decisions

use super::event::{DecisionEvaluationEvent, DecisionLogicEvaluationEvent};
use super::literal::LiteralExpressionEvaluationHandler;
use super::table::DecisionTableEvaluationHandler;
use crate::context::{CompositeVariableContext, VariableContext, Variables};
use crate::error::EvaluationResult;
use crate::listener::{notify_decision_listeners, DecisionEvaluationListener};
use crate::result::DecisionResult;
use dmn_core::{Decision, DecisionLogic, HitPolicy, TypedValue, Value};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::debug;

/// Evaluates a decision after its required decisions
///
/// Required decisions are evaluated in post-order, each once. Their results
/// are layered in front of the caller's context so that dependants can read
/// them; the caller's variables are never modified.
pub struct DecisionEvaluationHandler {
    table_handler: DecisionTableEvaluationHandler,
    literal_handler: LiteralExpressionEvaluationHandler,
    listeners: Vec<Arc<dyn DecisionEvaluationListener>>,
}

impl DecisionEvaluationHandler {
    pub fn new(
        table_handler: DecisionTableEvaluationHandler,
        literal_handler: LiteralExpressionEvaluationHandler,
        listeners: Vec<Arc<dyn DecisionEvaluationListener>>,
    ) -> Self {
        Self {
            table_handler,
            literal_handler,
            listeners,
        }
    }

    pub fn evaluate_decision(
        &self,
        decision: &Arc<Decision>,
        context: &dyn VariableContext,
    ) -> EvaluationResult<DecisionResult> {
        let event = self.evaluate_decision_event(decision, context)?;
        Ok(DecisionResult::from_event(&event.decision_result))
    }

    /// Evaluate and return the full event instead of the result
    pub fn evaluate_decision_event(
        &self,
        decision: &Arc<Decision>,
        context: &dyn VariableContext,
    ) -> EvaluationResult<DecisionEvaluationEvent> {
        let order = decision.requirement_order();
        // the decision itself comes last
        let required = &order[..order.len().saturating_sub(1)];

        let mut required_results = Variables::new();
        let mut required_events = Vec::with_capacity(required.len());
        for required_decision in required {
            debug!(
                "Evaluating required decision '{}' of '{}'",
                required_decision.key, decision.key
            );
            let event = {
                let scope = CompositeVariableContext::compose(&required_results, context);
                self.evaluate_logic(required_decision, &scope)?
            };
            add_result_to_variables(required_decision, &event, &mut required_results);
            required_events.push(event);
        }

        let root_event = {
            let scope = CompositeVariableContext::compose(&required_results, context);
            self.evaluate_logic(decision, &scope)?
        };

        let event = DecisionEvaluationEvent::new(root_event, required_events);
        notify_decision_listeners(&self.listeners, &event)?;
        Ok(event)
    }

    /// Evaluate only the logic of `decision`, ignoring its requirements
    pub fn evaluate_logic(
        &self,
        decision: &Decision,
        context: &dyn VariableContext,
    ) -> EvaluationResult<DecisionLogicEvaluationEvent> {
        let event = match &decision.logic {
            DecisionLogic::Table(table) => self
                .table_handler
                .evaluate(decision, table, context)
                .map(DecisionLogicEvaluationEvent::Table),
            DecisionLogic::LiteralExpression(literal) => self
                .literal_handler
                .evaluate(decision, literal, context)
                .map(DecisionLogicEvaluationEvent::LiteralExpression),
        };
        event.map_err(|err| err.in_decision(&decision.key))
    }
}

/// Expose the result of a required decision to its dependants
///
/// A single row contributes its entries, unless the decision is a table
/// collecting several rows; then every output name maps to the list of its
/// values.
fn add_result_to_variables(
    decision: &Decision,
    event: &DecisionLogicEvaluationEvent,
    variables: &mut Variables,
) {
    let result = DecisionResult::from_event(event);
    if result.is_empty() {
        return;
    }

    let collects_rows = decision.as_table().is_some_and(|table| {
        table.aggregation.is_none()
            && matches!(table.hit_policy, HitPolicy::Collect | HitPolicy::RuleOrder)
    });

    if result.len() == 1 && !collects_rows {
        for row in &result {
            for (name, value) in row.iter() {
                variables.insert(name, value.clone());
            }
        }
        return;
    }

    let mut collected: IndexMap<String, Vec<Value>> = IndexMap::new();
    for row in &result {
        for (name, value) in row.iter() {
            collected
                .entry(name.to_string())
                .or_default()
                .push(value.value.clone());
        }
    }
    for (name, values) in collected {
        variables.insert(name, TypedValue::untyped(Value::List(values)));
    }
}
