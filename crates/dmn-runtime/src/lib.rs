//! DMN Runtime - Evaluation engine for decision tables and literal expressions
//!
//! This crate evaluates decision definitions against caller variables:
//! - expression backends and the dispatcher that routes to them
//! - the column-by-column rule filter and output assembly of decision tables
//! - hit policy resolution
//! - evaluation events, listeners and metrics
//! - decision results

pub mod context;
pub mod el;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod hitpolicy;
pub mod listener;
pub mod observability;
pub mod result;

// Re-export main types
pub use context::{CompositeVariableContext, EmptyVariableContext, VariableContext, Variables};
pub use el::{
    CompiledScript, DefaultFeelEngine, DefaultScriptEngineResolver, ElExpression, ElProvider,
    ExpressionDispatcher, FeelEngine, ScriptEngine, ScriptEngineResolver, TemplateElProvider,
};
pub use engine::Interpreter;
pub use error::{
    DecisionResultError, EvaluationError, EvaluationResult, HitPolicyError, Result, RuntimeError,
};
pub use evaluation::{
    DecisionEvaluationEvent, DecisionEvaluationHandler, DecisionLogicEvaluationEvent,
    DecisionTableEvaluationEvent, DecisionTableEvaluationHandler, EvaluatedDecisionRule,
    EvaluatedInput, EvaluatedOutput, EvaluationSettings, LiteralExpressionEvaluationEvent,
    LiteralExpressionEvaluationHandler,
};
pub use hitpolicy::{DefaultHitPolicyResolver, HitPolicyResolver};
pub use listener::{DecisionEvaluationListener, DecisionTableEvaluationListener};
pub use observability::EngineMetricCollector;
pub use result::{DecisionResult, DecisionResultEntries};
