//! Core DecisionEngine implementation

use super::types::{DecisionRequest, DecisionResponse};
use crate::builder::DecisionEngineBuilder;
use crate::config::EngineConfig;
use crate::error::{Result, SdkError};
use crate::repository::DecisionRepository;
use dmn_core::Decision;
use dmn_runtime::{
    DecisionEvaluationEvent, DecisionEvaluationHandler, DecisionResult, EngineMetricCollector,
    EvaluationSettings, VariableContext,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Evaluates decisions
///
/// The engine holds no per-evaluation state: one instance, shared by `Arc`,
/// serves any number of threads, as do the decision definitions it
/// evaluates.
pub struct DecisionEngine {
    handler: DecisionEvaluationHandler,
    repository: Arc<dyn DecisionRepository>,
    metrics: Option<Arc<EngineMetricCollector>>,
    config: EngineConfig,
    settings: EvaluationSettings,
}

impl DecisionEngine {
    pub(crate) fn new(
        handler: DecisionEvaluationHandler,
        repository: Arc<dyn DecisionRepository>,
        metrics: Option<Arc<EngineMetricCollector>>,
        config: EngineConfig,
        settings: EvaluationSettings,
    ) -> Self {
        Self {
            handler,
            repository,
            metrics,
            config,
            settings,
        }
    }

    /// Create a builder
    pub fn builder() -> DecisionEngineBuilder {
        DecisionEngineBuilder::new()
    }

    /// Create an engine with built-in backends and an empty repository
    pub fn from_config(config: EngineConfig) -> Result<Self> {
        DecisionEngineBuilder::new().with_config(config).build()
    }

    /// Evaluate the decision deployed under `decision_key`
    pub fn evaluate(
        &self,
        decision_key: &str,
        variables: &dyn VariableContext,
    ) -> Result<DecisionResult> {
        let decision = self.find_decision(decision_key)?;
        self.evaluate_decision(&decision, variables)
    }

    /// Evaluate a decision and its required decisions
    pub fn evaluate_decision(
        &self,
        decision: &Arc<Decision>,
        variables: &dyn VariableContext,
    ) -> Result<DecisionResult> {
        debug!("Evaluating decision '{}'", decision.key);
        Ok(self.handler.evaluate_decision(decision, variables)?)
    }

    /// Evaluate a decision whose logic must be a decision table
    pub fn evaluate_decision_table(
        &self,
        decision: &Arc<Decision>,
        variables: &dyn VariableContext,
    ) -> Result<DecisionResult> {
        if !decision.is_table() {
            return Err(SdkError::NotADecisionTable(decision.key.clone()));
        }
        self.evaluate_decision(decision, variables)
    }

    /// Evaluate and return the full evaluation event
    pub fn evaluate_decision_event(
        &self,
        decision: &Arc<Decision>,
        variables: &dyn VariableContext,
    ) -> Result<DecisionEvaluationEvent> {
        Ok(self.handler.evaluate_decision_event(decision, variables)?)
    }

    /// Evaluate a request against the repository
    pub fn decide(&self, request: DecisionRequest) -> Result<DecisionResponse> {
        let start = Instant::now();
        let decision = self.find_decision(&request.decision_key)?;
        let variables = request.to_variables();

        let event = self.evaluate_decision_event(&decision, &variables)?;
        let result = DecisionResult::from_event(&event.decision_result);
        let processing_time_ms = start.elapsed().as_millis() as u64;
        debug!(
            "Decision '{}' produced {} result(s) in {}ms",
            request.decision_key,
            result.len(),
            processing_time_ms
        );

        Ok(DecisionResponse {
            decision_key: request.decision_key,
            result,
            executed_decision_elements: event.executed_decision_elements,
            processing_time_ms,
            metadata: request.metadata,
        })
    }

    /// Look up a deployed decision
    pub fn find_decision(&self, decision_key: &str) -> Result<Arc<Decision>> {
        self.repository
            .find_decision(decision_key)
            .ok_or_else(|| SdkError::DecisionNotFound(decision_key.to_string()))
    }

    /// Metric collector, when metrics are enabled
    pub fn metrics(&self) -> Option<&Arc<EngineMetricCollector>> {
        self.metrics.as_ref()
    }

    /// Get configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Language defaults and blank-output switch resolved from the configuration
    pub fn evaluation_settings(&self) -> &EvaluationSettings {
        &self.settings
    }

    pub fn repository(&self) -> &Arc<dyn DecisionRepository> {
        &self.repository
    }
}

impl std::fmt::Debug for DecisionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionEngine")
            .field("settings", &self.settings)
            .field("decisions", &self.repository.decision_keys())
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}
