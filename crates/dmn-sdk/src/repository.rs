//! Decision definition providers
//!
//! The engine looks decisions up by key through a [`DecisionRepository`].
//! [`InMemoryDecisionRepository`] keeps deployed definitions in memory; it
//! validates every table of a decision and its requirements on deployment so
//! that evaluation can rely on one cell per clause.

use crate::error::{Result, SdkError};
use dmn_core::{Decision, DecisionLogic};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

/// Provides decision definitions by key
pub trait DecisionRepository: Send + Sync {
    /// Find the decision deployed under `key`
    fn find_decision(&self, key: &str) -> Option<Arc<Decision>>;

    /// Keys of all deployed decisions, in deployment order
    fn decision_keys(&self) -> Vec<String>;

    fn contains(&self, key: &str) -> bool {
        self.find_decision(key).is_some()
    }
}

/// Thread-safe in-memory repository
#[derive(Debug, Default)]
pub struct InMemoryDecisionRepository {
    decisions: RwLock<IndexMap<String, Arc<Decision>>>,
}

impl InMemoryDecisionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deploy a decision and its requirements, replacing decisions with the same keys
    pub fn deploy(&self, decision: Decision) -> Result<Arc<Decision>> {
        self.deploy_shared(Arc::new(decision))
    }

    /// Deploy an already shared decision and its requirements
    pub fn deploy_shared(&self, decision: Arc<Decision>) -> Result<Arc<Decision>> {
        let order = decision.requirement_order();
        for deployed in &order {
            validate_decision(deployed)?;
        }

        let mut decisions = self.decisions.write();
        for deployed in order {
            info!("Deployed decision '{}'", deployed.key);
            decisions.insert(deployed.key.clone(), deployed);
        }
        Ok(decision)
    }

    /// Builder-style deployment
    pub fn with_decision(self, decision: Decision) -> Result<Self> {
        self.deploy(decision)?;
        Ok(self)
    }

    /// Remove the decision deployed under `key`
    pub fn undeploy(&self, key: &str) -> Option<Arc<Decision>> {
        self.decisions.write().shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.decisions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.read().is_empty()
    }
}

impl DecisionRepository for InMemoryDecisionRepository {
    fn find_decision(&self, key: &str) -> Option<Arc<Decision>> {
        self.decisions.read().get(key).cloned()
    }

    fn decision_keys(&self) -> Vec<String> {
        self.decisions.read().keys().cloned().collect()
    }
}

fn validate_decision(decision: &Decision) -> Result<()> {
    if decision.key.trim().is_empty() {
        return Err(SdkError::ConfigError(
            "decision key must not be blank".to_string(),
        ));
    }
    match &decision.logic {
        DecisionLogic::Table(table) => table.validate()?,
        DecisionLogic::LiteralExpression(_) => {}
    }
    Ok(())
}
