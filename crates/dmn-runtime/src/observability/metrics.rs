//! Engine metrics

use crate::evaluation::DecisionEvaluationEvent;
use crate::listener::DecisionEvaluationListener;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counter
#[derive(Debug)]
pub struct Counter {
    name: String,
    value: AtomicU64,
}

impl Counter {
    /// Create a new counter
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inc(&self) {
        self.add(1);
    }

    pub fn add(&self, value: u64) {
        self.value.fetch_add(value, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Reset to zero, returning the previous value
    pub fn reset(&self) -> u64 {
        self.value.swap(0, Ordering::Relaxed)
    }
}

/// Counts executed decision elements and decision instances
///
/// Registered as a decision evaluation listener when metrics are enabled.
#[derive(Debug)]
pub struct EngineMetricCollector {
    executed_decision_elements: Counter,
    executed_decision_instances: Counter,
}

impl EngineMetricCollector {
    pub fn new() -> Self {
        Self {
            executed_decision_elements: Counter::new("executed-decision-elements"),
            executed_decision_instances: Counter::new("executed-decision-instances"),
        }
    }

    pub fn executed_decision_elements(&self) -> u64 {
        self.executed_decision_elements.get()
    }

    pub fn executed_decision_instances(&self) -> u64 {
        self.executed_decision_instances.get()
    }

    /// Reset the element count, returning the previous value
    pub fn clear_executed_decision_elements(&self) -> u64 {
        self.executed_decision_elements.reset()
    }

    pub fn clear_executed_decision_instances(&self) -> u64 {
        self.executed_decision_instances.reset()
    }

    pub fn clear(&self) {
        self.executed_decision_elements.reset();
        self.executed_decision_instances.reset();
    }
}

impl Default for EngineMetricCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionEvaluationListener for EngineMetricCollector {
    fn notify(&self, event: &DecisionEvaluationEvent) -> anyhow::Result<()> {
        self.executed_decision_elements.add(event.executed_decision_elements);
        self.executed_decision_instances
            .add(1 + event.required_decision_results.len() as u64);
        Ok(())
    }
}
