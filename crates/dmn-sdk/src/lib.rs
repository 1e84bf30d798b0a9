//! DMN Evaluation Engine SDK
//!
//! High-level API for building a decision engine and evaluating decision
//! tables and literal expressions with it.

pub mod builder;
pub mod config;
pub mod decision_engine;
pub mod error;
pub mod repository;

// Re-export main types
pub use builder::DecisionEngineBuilder;
pub use config::EngineConfig;
pub use decision_engine::{DecisionEngine, DecisionRequest, DecisionResponse};
pub use error::{Result, SdkError};
pub use repository::{DecisionRepository, InMemoryDecisionRepository};

// Re-export commonly used types from dependencies
pub use dmn_core::{Decision, DecisionTable, TypedValue, Value};
pub use dmn_runtime::{DecisionResult, DecisionResultEntries, EngineMetricCollector, Variables};
