//! Error types for DMN Core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A value could not be coerced to the requested type
    #[error("Unable to transform value '{value}' ({kind}) to type '{target}'")]
    Transform {
        value: String,
        kind: &'static str,
        target: String,
    },

    /// A decision definition violates a structural invariant
    #[error("Invalid decision definition: {0}")]
    InvalidDefinition(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
