//! Observability
//!
//! Engine metrics collected through evaluation listeners.

pub mod metrics;

pub use metrics::{Counter, EngineMetricCollector};
