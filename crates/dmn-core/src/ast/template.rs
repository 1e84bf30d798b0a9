//! Template AST (`${...}` expressions embedded in text)

use super::expression::Expression;
use serde::{Deserialize, Serialize};

/// Parsed template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub segments: Vec<TemplateSegment>,
}

/// Part of a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TemplateSegment {
    /// Literal text outside `${...}`
    Text(String),
    /// Expression inside `${...}`
    Expression(Expression),
}

impl Template {
    /// The expression of a template consisting of exactly one `${...}`
    pub fn single_expression(&self) -> Option<&Expression> {
        match self.segments.as_slice() {
            [TemplateSegment::Expression(expr)] => Some(expr),
            _ => None,
        }
    }
}
