//! DecisionEngine - Main API for evaluating decisions
//!
//! The module is organized into:
//! - `types`: Request/Response types (DecisionRequest, DecisionResponse)
//! - `engine`: Core DecisionEngine implementation

mod engine;
mod types;

// Re-export public types
pub use engine::DecisionEngine;
pub use types::{DecisionRequest, DecisionResponse};
