//! Builder pattern for DecisionEngine

use crate::config::EngineConfig;
use crate::decision_engine::DecisionEngine;
use crate::error::{Result, SdkError};
use crate::repository::{DecisionRepository, InMemoryDecisionRepository};
use dmn_core::Decision;
use dmn_runtime::{
    DecisionEvaluationHandler, DecisionEvaluationListener, DecisionTableEvaluationHandler,
    DecisionTableEvaluationListener, DefaultFeelEngine, DefaultHitPolicyResolver,
    DefaultScriptEngineResolver, ElProvider, EngineMetricCollector, ExpressionDispatcher,
    FeelEngine, HitPolicyResolver, LiteralExpressionEvaluationHandler, ScriptEngine,
    ScriptEngineResolver, TemplateElProvider,
};
use std::sync::Arc;
use tracing::info;

/// Builder for DecisionEngine
///
/// # Example
///
/// ```rust,ignore
/// use dmn_sdk::{DecisionEngineBuilder, EngineConfig};
///
/// let engine = DecisionEngineBuilder::new()
///     .with_config(EngineConfig::from_yaml_str(yaml)?)
///     .add_decision(dish_decision)
///     .build()?;
///
/// let result = engine.evaluate("dish", &Variables::new().put_value("season", "Fall"))?;
/// ```
///
/// Collaborators that are not set fall back to the built-in FEEL engine,
/// template provider, script engine registry and hit policy resolver.
#[derive(Default)]
pub struct DecisionEngineBuilder {
    config: EngineConfig,
    feel_engine: Option<Arc<dyn FeelEngine>>,
    el_provider: Option<Arc<dyn ElProvider>>,
    script_engine_resolver: Option<Arc<dyn ScriptEngineResolver>>,
    script_engines: DefaultScriptEngineResolver,
    hit_policy_resolver: Option<Arc<dyn HitPolicyResolver>>,
    pre_table_listeners: Vec<Arc<dyn DecisionTableEvaluationListener>>,
    post_table_listeners: Vec<Arc<dyn DecisionTableEvaluationListener>>,
    pre_decision_listeners: Vec<Arc<dyn DecisionEvaluationListener>>,
    post_decision_listeners: Vec<Arc<dyn DecisionEvaluationListener>>,
    metric_collector: Option<Arc<EngineMetricCollector>>,
    repository: Option<Arc<dyn DecisionRepository>>,
    decisions: Vec<Decision>,
}

impl DecisionEngineBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Configuration ==========

    /// Replace the whole configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn default_input_expression_language(mut self, language: impl Into<String>) -> Self {
        self.config = self.config.with_input_expression_language(language);
        self
    }

    pub fn default_input_entry_language(mut self, language: impl Into<String>) -> Self {
        self.config = self.config.with_input_entry_language(language);
        self
    }

    pub fn default_output_entry_language(mut self, language: impl Into<String>) -> Self {
        self.config = self.config.with_output_entry_language(language);
        self
    }

    pub fn default_literal_expression_language(mut self, language: impl Into<String>) -> Self {
        self.config = self.config.with_literal_expression_language(language);
        self
    }

    pub fn enable_feel_legacy_behavior(mut self, enable: bool) -> Self {
        self.config = self.config.enable_feel_legacy_behavior(enable);
        self
    }

    pub fn return_blank_table_output_as_null(mut self, enable: bool) -> Self {
        self.config = self.config.return_blank_table_output_as_null(enable);
        self
    }

    pub fn feel_cache_size(mut self, size: usize) -> Self {
        self.config = self.config.with_feel_cache_size(size);
        self
    }

    /// Enable metrics
    pub fn enable_metrics(mut self, enable: bool) -> Self {
        self.config = self.config.enable_metrics(enable);
        self
    }

    // ========== Expression backends ==========

    /// Use a custom FEEL engine instead of the built-in one
    pub fn with_feel_engine(mut self, feel_engine: Arc<dyn FeelEngine>) -> Self {
        self.feel_engine = Some(feel_engine);
        self
    }

    /// Use a custom template provider instead of the built-in one
    pub fn with_el_provider(mut self, el_provider: Arc<dyn ElProvider>) -> Self {
        self.el_provider = Some(el_provider);
        self
    }

    /// Use a custom script engine resolver
    pub fn with_script_engine_resolver(mut self, resolver: Arc<dyn ScriptEngineResolver>) -> Self {
        self.script_engine_resolver = Some(resolver);
        self
    }

    /// Register a script engine with the built-in resolver
    pub fn with_script_engine(mut self, language: &str, engine: Arc<dyn ScriptEngine>) -> Self {
        self.script_engines.register(language, engine);
        self
    }

    pub fn with_hit_policy_resolver(mut self, resolver: Arc<dyn HitPolicyResolver>) -> Self {
        self.hit_policy_resolver = Some(resolver);
        self
    }

    // ========== Listeners ==========

    /// Table listener notified before the post listeners
    pub fn add_table_listener(mut self, listener: Arc<dyn DecisionTableEvaluationListener>) -> Self {
        self.pre_table_listeners.push(listener);
        self
    }

    pub fn add_post_table_listener(
        mut self,
        listener: Arc<dyn DecisionTableEvaluationListener>,
    ) -> Self {
        self.post_table_listeners.push(listener);
        self
    }

    /// Decision listener notified before the metric collector and the post listeners
    pub fn add_decision_listener(mut self, listener: Arc<dyn DecisionEvaluationListener>) -> Self {
        self.pre_decision_listeners.push(listener);
        self
    }

    pub fn add_post_decision_listener(
        mut self,
        listener: Arc<dyn DecisionEvaluationListener>,
    ) -> Self {
        self.post_decision_listeners.push(listener);
        self
    }

    /// Share a metric collector with the engine; enables metrics
    pub fn with_metric_collector(mut self, collector: Arc<EngineMetricCollector>) -> Self {
        self.metric_collector = Some(collector);
        self.config = self.config.enable_metrics(true);
        self
    }

    // ========== Decisions ==========

    /// Look decisions up in a custom repository
    pub fn with_repository(mut self, repository: Arc<dyn DecisionRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Deploy a decision into the built-in in-memory repository
    pub fn add_decision(mut self, decision: Decision) -> Self {
        self.decisions.push(decision);
        self
    }

    /// Build the decision engine
    pub fn build(self) -> Result<DecisionEngine> {
        let DecisionEngineBuilder {
            config,
            feel_engine,
            el_provider,
            script_engine_resolver,
            script_engines,
            hit_policy_resolver,
            pre_table_listeners,
            post_table_listeners,
            pre_decision_listeners,
            post_decision_listeners,
            metric_collector,
            repository,
            decisions,
        } = self;

        config.validate()?;
        let settings = config.evaluation_settings();

        let feel_engine = feel_engine.unwrap_or_else(|| {
            Arc::new(DefaultFeelEngine::with_cache_size(config.feel_cache_size))
        });
        let el_provider = el_provider.unwrap_or_else(|| Arc::new(TemplateElProvider::new()));
        let script_engine_resolver: Arc<dyn ScriptEngineResolver> = match script_engine_resolver {
            Some(resolver) => {
                if script_engines.languages().next().is_some() {
                    return Err(SdkError::ConfigError(
                        "script engines cannot be registered together with a custom script engine resolver"
                            .to_string(),
                    ));
                }
                resolver
            }
            None => {
                let languages: Vec<&str> = script_engines.languages().collect();
                if !languages.is_empty() {
                    info!("Registered script engines: {}", languages.join(", "));
                }
                Arc::new(script_engines)
            }
        };
        let hit_policy_resolver =
            hit_policy_resolver.unwrap_or_else(|| Arc::new(DefaultHitPolicyResolver::new()));

        let repository: Arc<dyn DecisionRepository> = match repository {
            Some(repository) => {
                if !decisions.is_empty() {
                    return Err(SdkError::ConfigError(
                        "decisions cannot be added together with a custom repository".to_string(),
                    ));
                }
                repository
            }
            None => {
                let in_memory = InMemoryDecisionRepository::new();
                for decision in decisions {
                    in_memory.deploy(decision)?;
                }
                Arc::new(in_memory)
            }
        };

        let metrics = if config.enable_metrics {
            Some(metric_collector.unwrap_or_default())
        } else {
            None
        };

        let mut table_listeners = pre_table_listeners;
        table_listeners.extend(post_table_listeners);

        let mut decision_listeners = pre_decision_listeners;
        if let Some(collector) = &metrics {
            decision_listeners.push(Arc::clone(collector) as Arc<dyn DecisionEvaluationListener>);
        }
        decision_listeners.extend(post_decision_listeners);

        info!(
            "Building decision engine: input expressions '{}', input entries '{}', output entries '{}', literal expressions '{}', metrics {}",
            settings.input_expression_language,
            settings.input_entry_language,
            settings.output_entry_language,
            settings.literal_expression_language,
            if metrics.is_some() { "enabled" } else { "disabled" }
        );

        let dispatcher = ExpressionDispatcher::new(feel_engine, el_provider, script_engine_resolver);
        let table_handler = DecisionTableEvaluationHandler::new(
            dispatcher.clone(),
            hit_policy_resolver,
            table_listeners,
            settings.clone(),
        );
        let literal_handler = LiteralExpressionEvaluationHandler::new(dispatcher, settings.clone());
        let handler =
            DecisionEvaluationHandler::new(table_handler, literal_handler, decision_listeners);

        Ok(DecisionEngine::new(handler, repository, metrics, config, settings))
    }
}
