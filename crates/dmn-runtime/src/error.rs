//! Runtime error types

use dmn_core::CoreError;
use dmn_parser::ParseError;
use thiserror::Error;

/// Failure inside an expression backend (parse, compile or evaluation)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// Expression text could not be parsed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Type error
    #[error("Type error: {0}")]
    TypeError(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Division by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Numeric overflow
    #[error("Numeric overflow: {0}")]
    Overflow(String),

    /// Script engine failure
    #[error("Script error: {0}")]
    Script(String),

    /// Generic runtime error
    #[error("Runtime error: {0}")]
    RuntimeError(String),
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Error raised while evaluating a decision
#[derive(Error, Debug)]
pub enum EvaluationError {
    /// No backend is registered for the expression language
    #[error("Unable to find a backend for expression language '{language}' (expression '{expression}')")]
    UnresolvedLanguage { language: String, expression: String },

    /// A backend failed to compile or evaluate an expression
    #[error("Unable to evaluate expression '{expression}' in language '{language}': {source}")]
    Expression {
        expression: String,
        language: String,
        #[source]
        source: RuntimeError,
    },

    /// An evaluated value could not be coerced to its declared type
    #[error(transparent)]
    Coercion(#[from] CoreError),

    /// Raised by the hit policy and forwarded unaltered
    #[error(transparent)]
    HitPolicy(#[from] HitPolicyError),

    /// An evaluation listener failed
    #[error("Evaluation listener failed: {0}")]
    Listener(String),

    /// Expression or coercion failure within a named decision
    #[error("Error while evaluating decision '{decision_key}': {source}")]
    InDecision {
        decision_key: String,
        #[source]
        source: Box<EvaluationError>,
    },
}

impl EvaluationError {
    /// Attach the decision key to expression and coercion failures
    pub fn in_decision(self, decision_key: &str) -> Self {
        match self {
            EvaluationError::Expression { .. } | EvaluationError::Coercion(_) => {
                EvaluationError::InDecision {
                    decision_key: decision_key.to_string(),
                    source: Box::new(self),
                }
            }
            other => other,
        }
    }

    /// The error with decision context removed
    pub fn root(&self) -> &EvaluationError {
        match self {
            EvaluationError::InDecision { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result type for decision evaluation
pub type EvaluationResult<T> = std::result::Result<T, EvaluationError>;

/// Hit policy violation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HitPolicyError {
    /// UNIQUE matched more than one rule
    #[error("Hit policy 'UNIQUE' only allows a single rule to match, but {} rules matched: {}", .rule_ids.len(), .rule_ids.join(", "))]
    UniqueViolation { rule_ids: Vec<String> },

    /// ANY matched rules with different outputs
    #[error("Hit policy 'ANY' only allows multiple matching rules with equal output, but matching rules {} differ", .rule_ids.join(", "))]
    AnyViolation { rule_ids: Vec<String> },

    /// Aggregation requested on a table with several outputs
    #[error("Unable to execute aggregation '{aggregator}' on a decision table with {outputs} outputs")]
    AggregationOnMultipleOutputs { aggregator: String, outputs: usize },

    /// Aggregation over a value that is not a number
    #[error("Unable to execute aggregation '{aggregator}' on non-numeric value '{value}'")]
    NonNumericAggregation { aggregator: String, value: String },

    /// Aggregation result does not fit the result type
    #[error("Aggregation '{aggregator}' overflowed")]
    AggregationOverflow { aggregator: String },

    /// PRIORITY and OUTPUT ORDER need a match
    #[error("Hit policy '{hit_policy}' requires at least one matching rule")]
    NoMatchingRule { hit_policy: String },

    /// PRIORITY needs output values to rank by
    #[error("Hit policy '{hit_policy}' requires at least one output with output values")]
    OutputValuesRequired { hit_policy: String },

    /// Ranking by output values needs named outputs when there are several
    #[error("Hit policy '{hit_policy}' requires every output to have a name when the table has multiple outputs")]
    OutputNameRequired { hit_policy: String },

    /// An output value is not in the declared output values
    #[error("Value '{value}' of output '{output_name}' is not one of the output values [{allowed}]")]
    OutputValueNotFound {
        output_name: String,
        value: String,
        allowed: String,
    },
}

/// Error when reading a decision result
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecisionResultError {
    /// More than one result row where one was expected
    #[error("Expected a single decision result, but found {count}: {results}")]
    SingleResultExpected { count: usize, results: String },

    /// More than one entry where one was expected
    #[error("Expected a single entry in the decision result, but found {count}: {entries}")]
    SingleEntryExpected { count: usize, entries: String },
}
