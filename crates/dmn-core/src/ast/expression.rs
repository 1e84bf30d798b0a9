//! Expression AST nodes

use super::operator::Operator;
use crate::types::Value;
use serde::{Deserialize, Serialize};

/// Expression AST node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Literal value
    Literal(Value),

    /// Variable reference with optional dotted path (e.g., applicant.age)
    Variable(Vec<String>),

    /// List literal (e.g., ["a", "b"])
    List(Vec<Expression>),

    /// Binary operation
    Binary {
        left: Box<Expression>,
        op: Operator,
        right: Box<Expression>,
    },

    /// Unary operation
    Unary {
        op: UnaryOperator,
        operand: Box<Expression>,
    },
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperator {
    /// Logical NOT (!, not)
    Not,
    /// Arithmetic negation (-)
    Negate,
}

impl Expression {
    pub fn literal(value: impl Into<Value>) -> Self {
        Expression::Literal(value.into())
    }

    /// Create a variable reference from a dotted path
    pub fn variable(path: &str) -> Self {
        Expression::Variable(path.split('.').map(str::to_string).collect())
    }

    pub fn binary(left: Expression, op: Operator, right: Expression) -> Self {
        Expression::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOperator, operand: Expression) -> Self {
        Expression::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Names of the root variables referenced by this expression
    pub fn referenced_variables(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Expression::Literal(_) => {}
            Expression::Variable(path) => {
                if let Some(root) = path.first() {
                    if !names.contains(&root.as_str()) {
                        names.push(root);
                    }
                }
            }
            Expression::List(items) => {
                for item in items {
                    item.collect_variables(names);
                }
            }
            Expression::Binary { left, right, .. } => {
                left.collect_variables(names);
                right.collect_variables(names);
            }
            Expression::Unary { operand, .. } => operand.collect_variables(names),
        }
    }
}
