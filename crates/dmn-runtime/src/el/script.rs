//! Script engine backend

use crate::context::VariableContext;
use crate::error::{Result, RuntimeError};
use dmn_core::Value;
use indexmap::IndexMap;
use std::sync::Arc;

/// A script compiled once and evaluated many times
pub trait CompiledScript: Send + Sync {
    fn eval(&self, context: &dyn VariableContext) -> Result<Value>;
}

/// A scripting language backend
pub trait ScriptEngine: Send + Sync {
    /// Evaluate script source directly
    fn eval(&self, script: &str, context: &dyn VariableContext) -> Result<Value>;

    /// Whether [`ScriptEngine::compile`] is supported
    fn supports_compilation(&self) -> bool {
        false
    }

    fn compile(&self, script: &str) -> Result<Arc<dyn CompiledScript>> {
        Err(RuntimeError::Script(format!(
            "script engine does not support compilation of '{}'",
            script
        )))
    }
}

/// Looks up script engines by language id
pub trait ScriptEngineResolver: Send + Sync {
    fn get_script_engine_for_language(&self, language: &str) -> Option<Arc<dyn ScriptEngine>>;
}

/// Registry of script engines keyed by case-insensitive language name
#[derive(Default, Clone)]
pub struct DefaultScriptEngineResolver {
    engines: IndexMap<String, Arc<dyn ScriptEngine>>,
}

impl DefaultScriptEngineResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `engine` under `language`, replacing any earlier engine
    pub fn register(&mut self, language: &str, engine: Arc<dyn ScriptEngine>) {
        self.engines.insert(language.to_ascii_lowercase(), engine);
    }

    pub fn with_engine(mut self, language: &str, engine: Arc<dyn ScriptEngine>) -> Self {
        self.register(language, engine);
        self
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.engines.keys().map(String::as_str)
    }
}

impl ScriptEngineResolver for DefaultScriptEngineResolver {
    fn get_script_engine_for_language(&self, language: &str) -> Option<Arc<dyn ScriptEngine>> {
        self.engines.get(&language.to_ascii_lowercase()).cloned()
    }
}

impl std::fmt::Debug for DefaultScriptEngineResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultScriptEngineResolver")
            .field("languages", &self.engines.keys().collect::<Vec<_>>())
            .finish()
    }
}
