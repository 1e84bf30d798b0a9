//! Request/Response types for DecisionEngine

use dmn_core::Value;
use dmn_runtime::{DecisionResult, Variables};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Request to evaluate a deployed decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRequest {
    /// Key of the decision to evaluate
    pub decision_key: String,

    /// Variables visible to the decision's expressions
    #[serde(default)]
    pub variables: IndexMap<String, Value>,

    /// Request metadata, echoed in the response
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl DecisionRequest {
    /// Create a new decision request
    pub fn new(decision_key: impl Into<String>) -> Self {
        Self {
            decision_key: decision_key.into(),
            variables: IndexMap::new(),
            metadata: HashMap::new(),
        }
    }

    /// Add a variable
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Variables as an evaluation context
    pub fn to_variables(&self) -> Variables {
        self.variables
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

/// Outcome of a [`DecisionRequest`]
#[derive(Debug, Clone, Serialize)]
pub struct DecisionResponse {
    pub decision_key: String,

    pub result: DecisionResult,

    /// Decision elements touched, summed over the requirement graph
    pub executed_decision_elements: u64,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,

    /// Metadata of the request
    pub metadata: HashMap<String, String>,
}
