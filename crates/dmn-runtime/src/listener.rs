//! Evaluation listeners

use crate::error::{EvaluationError, EvaluationResult};
use crate::evaluation::{DecisionEvaluationEvent, DecisionTableEvaluationEvent};
use std::sync::Arc;

/// Observes every decision table evaluation after the hit policy was applied
pub trait DecisionTableEvaluationListener: Send + Sync {
    fn notify(&self, event: &DecisionTableEvaluationEvent) -> anyhow::Result<()>;
}

/// Observes every top-level decision evaluation
pub trait DecisionEvaluationListener: Send + Sync {
    fn notify(&self, event: &DecisionEvaluationEvent) -> anyhow::Result<()>;
}

/// Notify table listeners in registration order; the first failure stops the chain
pub(crate) fn notify_table_listeners(
    listeners: &[Arc<dyn DecisionTableEvaluationListener>],
    event: &DecisionTableEvaluationEvent,
) -> EvaluationResult<()> {
    for listener in listeners {
        listener.notify(event).map_err(listener_error)?;
    }
    Ok(())
}

pub(crate) fn notify_decision_listeners(
    listeners: &[Arc<dyn DecisionEvaluationListener>],
    event: &DecisionEvaluationEvent,
) -> EvaluationResult<()> {
    for listener in listeners {
        listener.notify(event).map_err(listener_error)?;
    }
    Ok(())
}

fn listener_error(err: anyhow::Error) -> EvaluationError {
    tracing::warn!("Evaluation listener failed: {:#}", err);
    EvaluationError::Listener(format!("{:#}", err))
}
