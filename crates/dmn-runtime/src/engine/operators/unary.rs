//! Unary operator execution

use crate::error::{Result, RuntimeError};
use dmn_core::ast::UnaryOperator;
use dmn_core::Value;

/// Execute a unary operation
pub(crate) fn execute_unary_op(operand: &Value, op: &UnaryOperator) -> Result<Value> {
    match (op, operand) {
        (_, Value::Null) => Ok(Value::Null),
        (UnaryOperator::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOperator::Negate, Value::Integer(i)) => i
            .checked_neg()
            .map(Value::Integer)
            .ok_or_else(|| RuntimeError::Overflow(format!("-({})", i))),
        (UnaryOperator::Negate, Value::Double(d)) => Ok(Value::Double(-d)),
        (UnaryOperator::Negate, Value::Decimal(d)) => Ok(Value::Decimal(-*d)),
        _ => Err(RuntimeError::InvalidOperation(format!(
            "Cannot apply {:?} to {}",
            op,
            operand.kind()
        ))),
    }
}
