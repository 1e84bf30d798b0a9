//! Expression nodes of a decision definition

use super::cache::CompiledFormCache;
use crate::types::TypeDefinition;
use serde::{Deserialize, Serialize};

/// A textual expression with its language, declared type and compile cache
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpressionNode {
    #[serde(default)]
    pub id: String,

    /// Expression text; absent or blank text counts as a blank cell
    #[serde(default)]
    pub text: Option<String>,

    /// Expression language id; absent means the engine default for the node's role
    #[serde(default)]
    pub expression_language: Option<String>,

    #[serde(default)]
    pub type_definition: TypeDefinition,

    #[serde(skip)]
    cache: CompiledFormCache,
}

impl ExpressionNode {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// A node without text
    pub fn blank(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.expression_language = Some(language.into());
        self
    }

    pub fn with_type(mut self, type_definition: TypeDefinition) -> Self {
        self.type_definition = type_definition;
        self
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// True if the text is present and not only whitespace
    pub fn is_non_empty(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    pub fn cache(&self) -> &CompiledFormCache {
        &self.cache
    }
}

impl PartialEq for ExpressionNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.text == other.text
            && self.expression_language == other.expression_language
            && self.type_definition == other.type_definition
    }
}
