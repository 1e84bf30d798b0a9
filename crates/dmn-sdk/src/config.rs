//! Configuration types for DecisionEngine

use crate::error::{Result, SdkError};
use dmn_runtime::el::{FEEL_LANGUAGE, TEMPLATE_LANGUAGE};
use dmn_runtime::{DefaultFeelEngine, EvaluationSettings};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main engine configuration
///
/// Language defaults left unset are resolved when the engine is built, see
/// [`EngineConfig::evaluation_settings`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Language of input expressions without an explicit language
    pub default_input_expression_language: Option<String>,

    /// Language of input entries (conditions) without an explicit language
    pub default_input_entry_language: Option<String>,

    /// Language of output entries (conclusions) without an explicit language
    pub default_output_entry_language: Option<String>,

    /// Language of literal expressions without an explicit language
    pub default_literal_expression_language: Option<String>,

    /// Default to the template language instead of FEEL for every role but input entries
    pub enable_feel_legacy_behavior: bool,

    /// Emit a typed null for blank conclusions instead of omitting the output
    pub return_blank_table_output_as_null: bool,

    /// Capacity of the built-in FEEL engine's parse caches
    pub feel_cache_size: usize,

    /// Enable metrics collection
    pub enable_metrics: bool,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            default_input_expression_language: None,
            default_input_entry_language: None,
            default_output_entry_language: None,
            default_literal_expression_language: None,
            enable_feel_legacy_behavior: false,
            return_blank_table_output_as_null: false,
            feel_cache_size: DefaultFeelEngine::DEFAULT_CACHE_SIZE,
            enable_metrics: true,
        }
    }

    /// Load a configuration from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file; `.json` files are read as JSON, anything else as YAML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Set the default input expression language
    pub fn with_input_expression_language(mut self, language: impl Into<String>) -> Self {
        self.default_input_expression_language = Some(language.into());
        self
    }

    /// Set the default input entry language
    pub fn with_input_entry_language(mut self, language: impl Into<String>) -> Self {
        self.default_input_entry_language = Some(language.into());
        self
    }

    /// Set the default output entry language
    pub fn with_output_entry_language(mut self, language: impl Into<String>) -> Self {
        self.default_output_entry_language = Some(language.into());
        self
    }

    /// Set the default literal expression language
    pub fn with_literal_expression_language(mut self, language: impl Into<String>) -> Self {
        self.default_literal_expression_language = Some(language.into());
        self
    }

    pub fn enable_feel_legacy_behavior(mut self, enable: bool) -> Self {
        self.enable_feel_legacy_behavior = enable;
        self
    }

    pub fn return_blank_table_output_as_null(mut self, enable: bool) -> Self {
        self.return_blank_table_output_as_null = enable;
        self
    }

    pub fn with_feel_cache_size(mut self, size: usize) -> Self {
        self.feel_cache_size = size;
        self
    }

    /// Enable metrics
    pub fn enable_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = enable;
        self
    }

    /// Reject blank language ids and an empty FEEL cache
    pub fn validate(&self) -> Result<()> {
        let languages = [
            ("default_input_expression_language", &self.default_input_expression_language),
            ("default_input_entry_language", &self.default_input_entry_language),
            ("default_output_entry_language", &self.default_output_entry_language),
            ("default_literal_expression_language", &self.default_literal_expression_language),
        ];
        for (field, language) in languages {
            if language.as_deref().is_some_and(|l| l.trim().is_empty()) {
                return Err(SdkError::ConfigError(format!("{} must not be blank", field)));
            }
        }
        if self.feel_cache_size == 0 {
            return Err(SdkError::ConfigError(
                "feel_cache_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the language defaults
    ///
    /// Explicit defaults win. Otherwise every role defaults to FEEL, unless
    /// legacy behavior is enabled: then input expressions, output entries and
    /// literal expressions default to the template language.
    pub fn evaluation_settings(&self) -> EvaluationSettings {
        let legacy_default = if self.enable_feel_legacy_behavior {
            TEMPLATE_LANGUAGE
        } else {
            FEEL_LANGUAGE
        };
        let resolve = |language: &Option<String>, default: &str| {
            language.clone().unwrap_or_else(|| default.to_string())
        };

        EvaluationSettings {
            input_expression_language: resolve(
                &self.default_input_expression_language,
                legacy_default,
            ),
            input_entry_language: resolve(&self.default_input_entry_language, FEEL_LANGUAGE),
            output_entry_language: resolve(&self.default_output_entry_language, legacy_default),
            literal_expression_language: resolve(
                &self.default_literal_expression_language,
                legacy_default,
            ),
            return_blank_table_output_as_null: self.return_blank_table_output_as_null,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
