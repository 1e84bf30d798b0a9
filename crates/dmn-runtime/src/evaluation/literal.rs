//! Literal expression evaluation

use super::event::LiteralExpressionEvaluationEvent;
use super::table::language_of;
use super::EvaluationSettings;
use crate::context::VariableContext;
use crate::el::ExpressionDispatcher;
use crate::error::EvaluationResult;
use dmn_core::{Decision, LiteralExpression};

/// Evaluates decisions whose logic is one expression
pub struct LiteralExpressionEvaluationHandler {
    dispatcher: ExpressionDispatcher,
    settings: EvaluationSettings,
}

impl LiteralExpressionEvaluationHandler {
    pub fn new(dispatcher: ExpressionDispatcher, settings: EvaluationSettings) -> Self {
        Self {
            dispatcher,
            settings,
        }
    }

    pub fn evaluate(
        &self,
        decision: &Decision,
        literal: &LiteralExpression,
        context: &dyn VariableContext,
    ) -> EvaluationResult<LiteralExpressionEvaluationEvent> {
        let expression = &literal.expression;
        let language = language_of(expression, &self.settings.literal_expression_language);
        let raw = self.dispatcher.evaluate_expression(language, expression, context)?;

        Ok(LiteralExpressionEvaluationEvent {
            decision_key: decision.key.clone(),
            decision_name: decision.name.clone(),
            output_name: literal.variable_name.clone(),
            output_value: literal.type_definition.transform(raw)?,
            executed_decision_elements: decision.executed_decision_elements(),
        })
    }
}
