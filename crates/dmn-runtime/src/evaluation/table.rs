//! Decision table evaluation

use super::event::{
    DecisionTableEvaluationEvent, EvaluatedDecisionRule, EvaluatedInput, EvaluatedOutput,
};
use super::{EvaluationSettings, INPUT_VARIABLE_NAME};
use crate::context::{CompositeVariableContext, VariableContext, Variables};
use crate::el::ExpressionDispatcher;
use crate::error::EvaluationResult;
use crate::hitpolicy::HitPolicyResolver;
use crate::listener::{notify_table_listeners, DecisionTableEvaluationListener};
use dmn_core::{Decision, DecisionTable, ExpressionNode, InputClause, Rule, TypedValue, Value};
use std::sync::Arc;
use tracing::debug;

/// Evaluates decision tables
///
/// Each input expression is evaluated once. Rules are then narrowed column
/// by column: a rule eliminated at one column never has its later conditions
/// evaluated. The conclusions of the surviving rules are evaluated against
/// the caller's context and handed to the hit policy resolver, after which
/// the listeners are notified.
pub struct DecisionTableEvaluationHandler {
    dispatcher: ExpressionDispatcher,
    hit_policy_resolver: Arc<dyn HitPolicyResolver>,
    listeners: Vec<Arc<dyn DecisionTableEvaluationListener>>,
    settings: EvaluationSettings,
}

impl DecisionTableEvaluationHandler {
    pub fn new(
        dispatcher: ExpressionDispatcher,
        hit_policy_resolver: Arc<dyn HitPolicyResolver>,
        listeners: Vec<Arc<dyn DecisionTableEvaluationListener>>,
        settings: EvaluationSettings,
    ) -> Self {
        Self {
            dispatcher,
            hit_policy_resolver,
            listeners,
            settings,
        }
    }

    pub fn evaluate(
        &self,
        decision: &Decision,
        table: &DecisionTable,
        context: &dyn VariableContext,
    ) -> EvaluationResult<DecisionTableEvaluationEvent> {
        let mut event = DecisionTableEvaluationEvent::new(decision, table.hit_policy);
        event.aggregation = table.aggregation;

        let matching_rules = self.filter_rules(table, context, &mut event)?;
        debug!(
            "Decision '{}': {} of {} rule(s) matched",
            decision.key,
            matching_rules.len(),
            table.rules.len()
        );

        event.matching_rules = matching_rules
            .into_iter()
            .map(|rule| self.evaluate_matching_rule(table, rule, context))
            .collect::<EvaluationResult<Vec<_>>>()?;

        self.hit_policy_resolver.apply(table, &mut event)?;
        notify_table_listeners(&self.listeners, &event)?;
        Ok(event)
    }

    /// Narrow the rules column by column, recording every evaluated input
    fn filter_rules<'t>(
        &self,
        table: &'t DecisionTable,
        context: &dyn VariableContext,
        event: &mut DecisionTableEvaluationEvent,
    ) -> EvaluationResult<Vec<&'t Rule>> {
        let mut candidates: Vec<&Rule> = table.rules.iter().collect();

        for (column, input) in table.inputs.iter().enumerate() {
            let evaluated = self.evaluate_input(input, context)?;

            let local_variables = local_variables(input, &evaluated);
            let composite;
            let column_context: &dyn VariableContext = match &local_variables {
                Some(local) => {
                    composite = CompositeVariableContext::compose(local, context);
                    &composite
                }
                None => context,
            };

            let mut matching = Vec::with_capacity(candidates.len());
            for rule in candidates {
                if self.is_condition_applicable(input, rule.conditions.get(column), column_context)? {
                    matching.push(rule);
                }
            }
            debug!("Input '{}' kept {} rule(s)", input.id, matching.len());

            candidates = matching;
            event.inputs.push(evaluated);
        }

        Ok(candidates)
    }

    fn evaluate_input(
        &self,
        input: &InputClause,
        context: &dyn VariableContext,
    ) -> EvaluationResult<EvaluatedInput> {
        let value = match &input.expression {
            Some(expression) => {
                let language = language_of(expression, &self.settings.input_expression_language);
                let raw = self.dispatcher.evaluate_expression(language, expression, context)?;
                expression.type_definition.transform(raw)?
            }
            None => TypedValue::untyped_null(),
        };

        Ok(EvaluatedInput {
            id: input.id.clone(),
            label: input.label.clone(),
            input_variable: input.input_variable.clone(),
            value,
        })
    }

    /// Blank conditions always apply; others must evaluate to exactly `true`
    fn is_condition_applicable(
        &self,
        input: &InputClause,
        condition: Option<&ExpressionNode>,
        context: &dyn VariableContext,
    ) -> EvaluationResult<bool> {
        let Some(condition) = condition.filter(|condition| condition.is_non_empty()) else {
            return Ok(true);
        };

        let language = language_of(condition, &self.settings.input_entry_language);
        if self.dispatcher.is_feel_language(language) {
            self.dispatcher.evaluate_simple_unary_tests(
                language,
                condition,
                &input.input_variable,
                context,
            )
        } else {
            let result = self.dispatcher.evaluate_expression(language, condition, context)?;
            Ok(result == Value::Bool(true))
        }
    }

    fn evaluate_matching_rule(
        &self,
        table: &DecisionTable,
        rule: &Rule,
        context: &dyn VariableContext,
    ) -> EvaluationResult<EvaluatedDecisionRule> {
        let mut evaluated = EvaluatedDecisionRule::new(rule.id.clone());

        for (idx, output) in table.outputs.iter().enumerate() {
            let conclusion = rule
                .conclusions
                .get(idx)
                .filter(|conclusion| conclusion.is_non_empty());

            let raw = match conclusion {
                Some(conclusion) => {
                    let language = language_of(conclusion, &self.settings.output_entry_language);
                    self.dispatcher.evaluate_expression(language, conclusion, context)?
                }
                None if self.settings.return_blank_table_output_as_null => Value::Null,
                None => continue,
            };

            evaluated.output_entries.insert(
                output.output_name.clone(),
                EvaluatedOutput {
                    id: output.id.clone(),
                    output_name: output.output_name.clone(),
                    value: output.type_definition.transform(raw)?,
                },
            );
        }

        Ok(evaluated)
    }
}

/// Child scope exposing the column's value under its input variable
///
/// Only inputs with a non-blank expression get one; otherwise conditions
/// see the caller's context unchanged.
fn local_variables(input: &InputClause, evaluated: &EvaluatedInput) -> Option<Variables> {
    input
        .expression
        .as_ref()
        .filter(|expression| expression.is_non_empty())
        .map(|_| {
            Variables::new()
                .put_value(INPUT_VARIABLE_NAME, evaluated.input_variable.as_str())
                .put_value_typed(evaluated.input_variable.clone(), evaluated.value.clone())
        })
}

pub(super) fn language_of<'a>(node: &'a ExpressionNode, default: &'a str) -> &'a str {
    node.expression_language.as_deref().unwrap_or(default)
}
