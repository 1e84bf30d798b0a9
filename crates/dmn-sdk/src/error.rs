//! SDK error types

use dmn_core::CoreError;
use dmn_runtime::{DecisionResultError, EvaluationError};
use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// YAML configuration could not be read
    #[error("Invalid YAML configuration: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// JSON configuration or request could not be read
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A decision definition was rejected on deployment
    #[error(transparent)]
    DefinitionError(#[from] CoreError),

    /// Evaluation failed
    #[error(transparent)]
    EvaluationError(#[from] EvaluationError),

    /// Reading the decision result failed
    #[error(transparent)]
    ResultError(#[from] DecisionResultError),

    /// No decision is deployed under the key
    #[error("No decision found for key '{0}'")]
    DecisionNotFound(String),

    /// A decision table was asked for, but the decision has other logic
    #[error("Decision '{0}' is not a decision table")]
    NotADecisionTable(String),
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
