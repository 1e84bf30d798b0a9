//! Operators of the built-in expression language

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary operators of the built-in expression language
///
/// Keywords (`and`, `or`, `in`, ...) and their symbolic forms (`&&`, `||`)
/// parse to the same variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    // comparison: = (or ==), !=, >, >=, <, <=
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,

    // arithmetic: + - * / %
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    And,
    Or,

    // string tests, left operand is the subject
    Contains,
    StartsWith,
    EndsWith,

    /// List membership
    In,
    NotIn,
}

impl Operator {
    /// Returns true if this is a comparison operator
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Operator::Eq | Operator::Ne | Operator::Gt | Operator::Ge | Operator::Lt | Operator::Le
        )
    }

    /// Returns true if this is an arithmetic operator
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            Operator::Add | Operator::Sub | Operator::Mul | Operator::Div | Operator::Mod
        )
    }

    /// Returns true if this is a logical operator
    pub fn is_logical(&self) -> bool {
        matches!(self, Operator::And | Operator::Or)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Mod => "%",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Contains => "contains",
            Operator::StartsWith => "starts_with",
            Operator::EndsWith => "ends_with",
            Operator::In => "in",
            Operator::NotIn => "not_in",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
