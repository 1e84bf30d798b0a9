//! Decision table and literal expression definitions

use super::expression_node::ExpressionNode;
use crate::error::{CoreError, Result};
use crate::types::{TypeDefinition, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default name of the per-column input variable
pub const DEFAULT_INPUT_VARIABLE: &str = "cellInput";

/// Hit policy of a decision table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HitPolicy {
    #[default]
    Unique,
    Any,
    First,
    RuleOrder,
    Collect,
    Priority,
    OutputOrder,
}

impl fmt::Display for HitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HitPolicy::Unique => "UNIQUE",
            HitPolicy::Any => "ANY",
            HitPolicy::First => "FIRST",
            HitPolicy::RuleOrder => "RULE ORDER",
            HitPolicy::Collect => "COLLECT",
            HitPolicy::Priority => "PRIORITY",
            HitPolicy::OutputOrder => "OUTPUT ORDER",
        };
        f.write_str(name)
    }
}

/// Aggregator of a COLLECT hit policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuiltinAggregator {
    Sum,
    Min,
    Max,
    Count,
}

impl fmt::Display for BuiltinAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuiltinAggregator::Sum => "SUM",
            BuiltinAggregator::Min => "MIN",
            BuiltinAggregator::Max => "MAX",
            BuiltinAggregator::Count => "COUNT",
        };
        f.write_str(name)
    }
}

/// Input column of a decision table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputClause {
    pub id: String,

    #[serde(default)]
    pub label: Option<String>,

    /// Input expression, evaluated once per evaluation
    #[serde(default)]
    pub expression: Option<ExpressionNode>,

    /// Name under which the evaluated input is visible to the column's conditions
    #[serde(default = "default_input_variable")]
    pub input_variable: String,
}

fn default_input_variable() -> String {
    DEFAULT_INPUT_VARIABLE.to_string()
}

impl InputClause {
    pub fn new(id: impl Into<String>, expression: ExpressionNode) -> Self {
        Self {
            id: id.into(),
            label: None,
            expression: Some(expression),
            input_variable: default_input_variable(),
        }
    }

    /// Input clause without an input expression
    pub fn without_expression(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            expression: None,
            input_variable: default_input_variable(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_input_variable(mut self, name: impl Into<String>) -> Self {
        self.input_variable = name.into();
        self
    }
}

/// Output column of a decision table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputClause {
    pub id: String,

    /// Name of the output in result rows
    pub output_name: String,

    #[serde(default)]
    pub type_definition: TypeDefinition,

    /// Allowed output values in priority order
    #[serde(default)]
    pub output_values: Vec<Value>,
}

impl OutputClause {
    pub fn new(id: impl Into<String>, output_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            output_name: output_name.into(),
            type_definition: TypeDefinition::untyped(),
            output_values: Vec::new(),
        }
    }

    pub fn with_type(mut self, type_definition: TypeDefinition) -> Self {
        self.type_definition = type_definition;
        self
    }

    pub fn with_output_values<V: Into<Value>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.output_values = values.into_iter().map(Into::into).collect();
        self
    }
}

/// One table row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    /// One condition per input clause
    pub conditions: Vec<ExpressionNode>,
    /// One conclusion per output clause
    pub conclusions: Vec<ExpressionNode>,
}

impl Rule {
    pub fn new(
        id: impl Into<String>,
        conditions: Vec<ExpressionNode>,
        conclusions: Vec<ExpressionNode>,
    ) -> Self {
        Self {
            id: id.into(),
            conditions,
            conclusions,
        }
    }

    /// Build a rule from cell texts; empty cells become blank nodes
    pub fn from_texts(id: impl Into<String>, conditions: &[&str], conclusions: &[&str]) -> Self {
        let id = id.into();
        let cell = |prefix: &str, idx: usize, text: &&str| {
            let node_id = format!("{}-{}{}", id, prefix, idx);
            if text.trim().is_empty() {
                ExpressionNode::blank(node_id)
            } else {
                ExpressionNode::new(node_id, *text)
            }
        };
        let conditions = conditions
            .iter()
            .enumerate()
            .map(|(i, t)| cell("in", i, t))
            .collect();
        let conclusions = conclusions
            .iter()
            .enumerate()
            .map(|(i, t)| cell("out", i, t))
            .collect();
        Self::new(id, conditions, conclusions)
    }
}

/// Tabular decision logic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTable {
    pub id: String,
    #[serde(default)]
    pub hit_policy: HitPolicy,
    #[serde(default)]
    pub aggregation: Option<BuiltinAggregator>,
    pub inputs: Vec<InputClause>,
    pub outputs: Vec<OutputClause>,
    pub rules: Vec<Rule>,
}

impl DecisionTable {
    pub fn builder(id: impl Into<String>) -> DecisionTableBuilder {
        DecisionTableBuilder::new(id)
    }

    /// Check that every rule has one cell per clause
    pub fn validate(&self) -> Result<()> {
        if self.aggregation.is_some() && self.hit_policy != HitPolicy::Collect {
            return Err(CoreError::InvalidDefinition(format!(
                "table '{}': aggregation requires hit policy COLLECT, found {}",
                self.id, self.hit_policy
            )));
        }
        for rule in &self.rules {
            if rule.conditions.len() != self.inputs.len() {
                return Err(CoreError::InvalidDefinition(format!(
                    "table '{}', rule '{}': {} conditions for {} input clauses",
                    self.id,
                    rule.id,
                    rule.conditions.len(),
                    self.inputs.len()
                )));
            }
            if rule.conclusions.len() != self.outputs.len() {
                return Err(CoreError::InvalidDefinition(format!(
                    "table '{}', rule '{}': {} conclusions for {} output clauses",
                    self.id,
                    rule.id,
                    rule.conclusions.len(),
                    self.outputs.len()
                )));
            }
        }
        Ok(())
    }
}

/// Builder for validated decision tables
#[derive(Debug, Clone)]
pub struct DecisionTableBuilder {
    table: DecisionTable,
}

impl DecisionTableBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            table: DecisionTable {
                id: id.into(),
                hit_policy: HitPolicy::default(),
                aggregation: None,
                inputs: Vec::new(),
                outputs: Vec::new(),
                rules: Vec::new(),
            },
        }
    }

    pub fn hit_policy(mut self, hit_policy: HitPolicy) -> Self {
        self.table.hit_policy = hit_policy;
        self
    }

    /// COLLECT with a builtin aggregator
    pub fn aggregation(mut self, aggregator: BuiltinAggregator) -> Self {
        self.table.hit_policy = HitPolicy::Collect;
        self.table.aggregation = Some(aggregator);
        self
    }

    pub fn input(mut self, input: InputClause) -> Self {
        self.table.inputs.push(input);
        self
    }

    pub fn output(mut self, output: OutputClause) -> Self {
        self.table.outputs.push(output);
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.table.rules.push(rule);
        self
    }

    /// Add a rule from cell texts, numbering it after the existing rules
    pub fn rule_texts(self, conditions: &[&str], conclusions: &[&str]) -> Self {
        let id = format!("{}-rule{}", self.table.id, self.table.rules.len() + 1);
        self.rule(Rule::from_texts(id, conditions, conclusions))
    }

    pub fn build(self) -> Result<DecisionTable> {
        self.table.validate()?;
        Ok(self.table)
    }
}

/// Decision logic consisting of one expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralExpression {
    /// Name of the single output
    pub variable_name: String,
    #[serde(default)]
    pub type_definition: TypeDefinition,
    pub expression: ExpressionNode,
}

impl LiteralExpression {
    pub fn new(variable_name: impl Into<String>, expression: ExpressionNode) -> Self {
        Self {
            variable_name: variable_name.into(),
            type_definition: TypeDefinition::untyped(),
            expression,
        }
    }

    pub fn with_type(mut self, type_definition: TypeDefinition) -> Self {
        self.type_definition = type_definition;
        self
    }
}
