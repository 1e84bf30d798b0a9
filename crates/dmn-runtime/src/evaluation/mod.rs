//! Decision evaluation
//!
//! - [`DecisionTableEvaluationHandler`] filters rules column by column,
//!   evaluates the conclusions of the survivors and applies the hit policy
//! - [`LiteralExpressionEvaluationHandler`] evaluates a single expression
//! - [`DecisionEvaluationHandler`] evaluates a decision with its required
//!   decisions and builds the [`DecisionResult`](crate::result::DecisionResult)

mod decision;
mod event;
mod literal;
mod table;

pub use decision::DecisionEvaluationHandler;
pub use event::{
    DecisionEvaluationEvent, DecisionLogicEvaluationEvent, DecisionTableEvaluationEvent,
    EvaluatedDecisionRule, EvaluatedInput, EvaluatedOutput, LiteralExpressionEvaluationEvent,
};
pub use literal::LiteralExpressionEvaluationHandler;
pub use table::DecisionTableEvaluationHandler;

use crate::el::FEEL_LANGUAGE;

/// Name bound to the input variable's name while a column is tested
pub const INPUT_VARIABLE_NAME: &str = "inputVariableName";

/// Languages used for nodes without an explicit language, and the blank-output switch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationSettings {
    pub input_expression_language: String,
    pub input_entry_language: String,
    pub output_entry_language: String,
    pub literal_expression_language: String,
    /// Emit a typed null for blank conclusions instead of omitting the output
    pub return_blank_table_output_as_null: bool,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            input_expression_language: FEEL_LANGUAGE.to_string(),
            input_entry_language: FEEL_LANGUAGE.to_string(),
            output_entry_language: FEEL_LANGUAGE.to_string(),
            literal_expression_language: FEEL_LANGUAGE.to_string(),
            return_blank_table_output_as_null: false,
        }
    }
}

#[cfg(test)]
mod tests;
