//! Comparison operator execution

use crate::error::{Result, RuntimeError};
use dmn_core::ast::Operator;
use dmn_core::Value;
use std::cmp::Ordering;

/// Execute a comparison operation
pub(crate) fn execute_compare(left: &Value, op: &Operator, right: &Value) -> Result<bool> {
    // Null compared to anything returns false, so missing inputs match no test
    if left.is_null() || right.is_null() {
        tracing::debug!(
            "Null comparison: {:?} {} {:?}, returning false",
            left,
            op,
            right
        );
        return Ok(false);
    }

    match op {
        Operator::Eq => Ok(left.loosely_equals(right)),
        Operator::Ne => Ok(!left.loosely_equals(right)),
        Operator::Gt | Operator::Ge | Operator::Lt | Operator::Le => {
            let ordering = compare_values(left, right).ok_or_else(|| {
                RuntimeError::InvalidOperation(format!(
                    "Cannot compare {} and {} with {}",
                    left.kind(),
                    right.kind(),
                    op
                ))
            })?;
            Ok(match op {
                Operator::Gt => ordering == Ordering::Greater,
                Operator::Ge => ordering != Ordering::Less,
                Operator::Lt => ordering == Ordering::Less,
                _ => ordering != Ordering::Greater,
            })
        }
        _ => Err(RuntimeError::InvalidOperation(format!(
            "{} is not a comparison",
            op
        ))),
    }
}

/// Ordering of two values of comparable kinds
fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Integer(l), Value::Integer(r)) => Some(l.cmp(r)),
        (Value::Double(_), _) | (_, Value::Double(_)) if left.is_number() && right.is_number() => {
            left.as_f64()?.partial_cmp(&right.as_f64()?)
        }
        _ if left.is_number() && right.is_number() => Some(left.as_decimal()?.cmp(&right.as_decimal()?)),
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        (Value::Date(l), Value::Date(r)) => Some(l.cmp(r)),
        _ => None,
    }
}
