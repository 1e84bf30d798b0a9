//! Binary operator execution

use super::comparison::execute_compare;
use crate::error::{Result, RuntimeError};
use dmn_core::ast::Operator;
use dmn_core::Value;
use rust_decimal::Decimal;

/// Execute a binary operation
pub(crate) fn execute_binary_op(left: &Value, op: &Operator, right: &Value) -> Result<Value> {
    if op.is_comparison() {
        return execute_compare(left, op, right).map(Value::Bool);
    }

    if op.is_logical() {
        return execute_logical(left, op, right);
    }

    // Null in any other operation returns Null, so missing variables propagate
    if left.is_null() || right.is_null() {
        tracing::debug!(
            "Null in binary operation: {:?} {} {:?}, returning Null",
            left,
            op,
            right
        );
        return Ok(Value::Null);
    }

    if op.is_arithmetic() {
        return execute_arithmetic(left, op, right);
    }

    match (left, op, right) {
        // String operations
        (Value::String(l), Operator::Contains, Value::String(r)) => Ok(Value::Bool(l.contains(r.as_str()))),
        (Value::String(l), Operator::StartsWith, Value::String(r)) => {
            Ok(Value::Bool(l.starts_with(r.as_str())))
        }
        (Value::String(l), Operator::EndsWith, Value::String(r)) => {
            Ok(Value::Bool(l.ends_with(r.as_str())))
        }

        // List operations
        (Value::List(items), Operator::Contains, val) => {
            Ok(Value::Bool(items.iter().any(|v| v.loosely_equals(val))))
        }
        (val, Operator::In, Value::List(items)) => {
            Ok(Value::Bool(items.iter().any(|v| v.loosely_equals(val))))
        }
        (val, Operator::NotIn, Value::List(items)) => {
            Ok(Value::Bool(!items.iter().any(|v| v.loosely_equals(val))))
        }

        _ => Err(RuntimeError::InvalidOperation(format!(
            "Cannot apply {} to {} and {}",
            op,
            left.kind(),
            right.kind()
        ))),
    }
}

/// Three-valued `and`/`or`: a deciding operand wins over null
fn execute_logical(left: &Value, op: &Operator, right: &Value) -> Result<Value> {
    let truth = |value: &Value| match value {
        Value::Bool(b) => Ok(Some(*b)),
        Value::Null => Ok(None),
        other => Err(RuntimeError::TypeError(format!(
            "Operator {} expects boolean operands, got {}",
            op,
            other.kind()
        ))),
    };

    let (l, r) = (truth(left)?, truth(right)?);
    let result = match op {
        Operator::And => match (l, r) {
            (Some(false), _) | (_, Some(false)) => Value::Bool(false),
            (Some(true), Some(true)) => Value::Bool(true),
            _ => Value::Null,
        },
        _ => match (l, r) {
            (Some(true), _) | (_, Some(true)) => Value::Bool(true),
            (Some(false), Some(false)) => Value::Bool(false),
            _ => Value::Null,
        },
    };
    Ok(result)
}

fn execute_arithmetic(left: &Value, op: &Operator, right: &Value) -> Result<Value> {
    match (left, right) {
        (Value::String(l), Value::String(r)) if *op == Operator::Add => {
            Ok(Value::String(format!("{}{}", l, r)))
        }
        (Value::Integer(l), Value::Integer(r)) => integer_arithmetic(*l, op, *r),
        (Value::Double(_), _) | (_, Value::Double(_)) if left.is_number() && right.is_number() => {
            double_arithmetic(to_f64(left)?, op, to_f64(right)?)
        }
        _ if left.is_number() && right.is_number() => {
            decimal_arithmetic(to_decimal(left)?, op, to_decimal(right)?)
        }
        _ => Err(RuntimeError::InvalidOperation(format!(
            "Cannot apply {} to {} and {}",
            op,
            left.kind(),
            right.kind()
        ))),
    }
}

fn integer_arithmetic(l: i64, op: &Operator, r: i64) -> Result<Value> {
    let overflow = || RuntimeError::Overflow(format!("{} {} {}", l, op, r));
    match op {
        Operator::Add => l.checked_add(r).map(Value::Integer).ok_or_else(overflow),
        Operator::Sub => l.checked_sub(r).map(Value::Integer).ok_or_else(overflow),
        Operator::Mul => l.checked_mul(r).map(Value::Integer).ok_or_else(overflow),
        // Integer division is exact
        Operator::Div => decimal_arithmetic(Decimal::from(l), op, Decimal::from(r)),
        Operator::Mod => {
            if r == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            l.checked_rem(r).map(Value::Integer).ok_or_else(overflow)
        }
        _ => Err(RuntimeError::InvalidOperation(format!("{} is not arithmetic", op))),
    }
}

fn decimal_arithmetic(l: Decimal, op: &Operator, r: Decimal) -> Result<Value> {
    if matches!(op, Operator::Div | Operator::Mod) && r.is_zero() {
        return Err(RuntimeError::DivisionByZero);
    }
    let result = match op {
        Operator::Add => l.checked_add(r),
        Operator::Sub => l.checked_sub(r),
        Operator::Mul => l.checked_mul(r),
        Operator::Div => l.checked_div(r),
        Operator::Mod => l.checked_rem(r),
        _ => return Err(RuntimeError::InvalidOperation(format!("{} is not arithmetic", op))),
    };
    result
        .map(Value::Decimal)
        .ok_or_else(|| RuntimeError::Overflow(format!("{} {} {}", l, op, r)))
}

fn double_arithmetic(l: f64, op: &Operator, r: f64) -> Result<Value> {
    match op {
        Operator::Add => Ok(Value::Double(l + r)),
        Operator::Sub => Ok(Value::Double(l - r)),
        Operator::Mul => Ok(Value::Double(l * r)),
        Operator::Div | Operator::Mod if r == 0.0 => Err(RuntimeError::DivisionByZero),
        Operator::Div => Ok(Value::Double(l / r)),
        Operator::Mod => Ok(Value::Double(l % r)),
        _ => Err(RuntimeError::InvalidOperation(format!("{} is not arithmetic", op))),
    }
}

fn to_f64(value: &Value) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| RuntimeError::TypeError(format!("{} is not a number", value)))
}

fn to_decimal(value: &Value) -> Result<Decimal> {
    value
        .as_decimal()
        .ok_or_else(|| RuntimeError::TypeError(format!("{} is not a decimal", value)))
}
