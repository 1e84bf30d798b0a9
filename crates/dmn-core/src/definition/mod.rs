//! Decision definitions
//!
//! A decision definition is immutable once built and may be shared by any
//! number of concurrent evaluations. The only interior mutability lives in
//! the compiled-form caches of its expression nodes.

pub mod cache;
pub mod expression_node;
pub mod table;

pub use cache::{CompileOnce, CompiledForm, CompiledFormCache};
pub use expression_node::ExpressionNode;
pub use table::{
    BuiltinAggregator, DecisionTable, DecisionTableBuilder, HitPolicy, InputClause,
    LiteralExpression, OutputClause, Rule, DEFAULT_INPUT_VARIABLE,
};

use std::sync::Arc;

/// Logic of a decision
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionLogic {
    Table(DecisionTable),
    LiteralExpression(LiteralExpression),
}

/// A named decision with its logic and required decisions
#[derive(Debug, Clone)]
pub struct Decision {
    pub key: String,
    pub name: Option<String>,
    pub logic: DecisionLogic,
    /// Decisions whose results are inputs of this one
    pub required_decisions: Vec<Arc<Decision>>,
}

impl Decision {
    pub fn new(key: impl Into<String>, logic: DecisionLogic) -> Self {
        Self {
            key: key.into(),
            name: None,
            logic,
            required_decisions: Vec::new(),
        }
    }

    pub fn table(key: impl Into<String>, table: DecisionTable) -> Self {
        Self::new(key, DecisionLogic::Table(table))
    }

    pub fn literal(key: impl Into<String>, literal: LiteralExpression) -> Self {
        Self::new(key, DecisionLogic::LiteralExpression(literal))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn requires(mut self, decision: Arc<Decision>) -> Self {
        self.required_decisions.push(decision);
        self
    }

    pub fn is_table(&self) -> bool {
        matches!(self.logic, DecisionLogic::Table(_))
    }

    pub fn as_table(&self) -> Option<&DecisionTable> {
        match &self.logic {
            DecisionLogic::Table(table) => Some(table),
            DecisionLogic::LiteralExpression(_) => None,
        }
    }

    /// Number of decision elements one evaluation touches
    pub fn executed_decision_elements(&self) -> u64 {
        match &self.logic {
            DecisionLogic::Table(table) => {
                ((table.inputs.len() + table.outputs.len()) * table.rules.len()) as u64
            }
            DecisionLogic::LiteralExpression(_) => 1,
        }
    }

    /// This decision and its requirements in post-order, each key once
    pub fn requirement_order(self: &Arc<Self>) -> Vec<Arc<Decision>> {
        let mut ordered: Vec<Arc<Decision>> = Vec::new();
        collect_post_order(self, &mut ordered);
        ordered
    }
}

fn collect_post_order(decision: &Arc<Decision>, ordered: &mut Vec<Arc<Decision>>) {
    if ordered.iter().any(|d| d.key == decision.key) {
        return;
    }
    for required in &decision.required_decisions {
        collect_post_order(required, ordered);
    }
    ordered.push(Arc::clone(decision));
}
