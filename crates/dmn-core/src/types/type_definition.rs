//! Type definitions and value coercion
//!
//! Every input expression, output clause and literal expression carries a
//! type definition. Evaluated raw values are passed through
//! [`TypeDefinition::transform`] before they are recorded, so downstream
//! consumers always see values of the declared kind.

use super::typed_value::TypedValue;
use super::value::Value;
use crate::error::{CoreError, Result};
use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date format accepted when coercing strings to dates
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Semantic type of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// No declared type; values pass through unchanged
    #[default]
    Untyped,
    String,
    Boolean,
    Integer,
    Long,
    Double,
    Date,
}

impl ValueType {
    /// Resolve a type reference name; unknown names fall back to untyped
    pub fn from_type_ref(type_ref: Option<&str>) -> Self {
        match type_ref.map(|t| t.trim().to_ascii_lowercase()).as_deref() {
            Some("string") => ValueType::String,
            Some("boolean") => ValueType::Boolean,
            Some("integer") => ValueType::Integer,
            Some("long") => ValueType::Long,
            Some("double") => ValueType::Double,
            Some("date") => ValueType::Date,
            _ => ValueType::Untyped,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Untyped => "untyped",
            ValueType::String => "string",
            ValueType::Boolean => "boolean",
            ValueType::Integer => "integer",
            ValueType::Long => "long",
            ValueType::Double => "double",
            ValueType::Date => "date",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared type of an expression or clause
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TypeDefinition {
    /// Type reference as written in the definition, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default)]
    pub value_type: ValueType,
}

impl TypeDefinition {
    pub fn untyped() -> Self {
        Self::default()
    }

    pub fn from_type_ref(type_ref: Option<&str>) -> Self {
        Self {
            type_name: type_ref.map(str::to_string),
            value_type: ValueType::from_type_ref(type_ref),
        }
    }

    pub fn of(value_type: ValueType) -> Self {
        Self {
            type_name: Some(value_type.name().to_string()),
            value_type,
        }
    }

    /// Coerce a raw value into a typed value of this definition's type
    pub fn transform(&self, value: Value) -> Result<TypedValue> {
        let target = self.value_type;
        if value.is_null() {
            return Ok(TypedValue::new(Value::Null, target));
        }

        let coerced = match target {
            ValueType::Untyped => Some(value.clone()),
            ValueType::String => to_string_value(&value),
            ValueType::Boolean => to_boolean(&value),
            ValueType::Integer => to_integer(&value),
            ValueType::Long => to_long(&value),
            ValueType::Double => to_double(&value),
            ValueType::Date => to_date(&value),
        };

        coerced
            .map(|v| TypedValue::new(v, target))
            .ok_or_else(|| CoreError::Transform {
                value: value.to_string(),
                kind: value.kind(),
                target: self
                    .type_name
                    .clone()
                    .unwrap_or_else(|| target.name().to_string()),
            })
    }
}

fn to_string_value(value: &Value) -> Option<Value> {
    match value {
        Value::List(_) | Value::Object(_) => None,
        other => Some(Value::String(other.to_string())),
    }
}

fn to_boolean(value: &Value) -> Option<Value> {
    match value {
        Value::Bool(b) => Some(Value::Bool(*b)),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Some(Value::Bool(true)),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Some(Value::Bool(false)),
        _ => None,
    }
}

fn to_integer(value: &Value) -> Option<Value> {
    match to_long(value)? {
        Value::Integer(i) if i32::try_from(i).is_ok() => Some(Value::Integer(i)),
        _ => None,
    }
}

fn to_long(value: &Value) -> Option<Value> {
    match value {
        Value::Integer(i) => Some(Value::Integer(*i)),
        Value::Double(d) => {
            // i64::MAX is not representable as f64, the bound is exclusive
            let in_range = *d >= i64::MIN as f64 && *d < i64::MAX as f64;
            (d.fract() == 0.0 && in_range).then(|| Value::Integer(*d as i64))
        }
        Value::Decimal(d) if d.fract().is_zero() => d.to_i64().map(Value::Integer),
        Value::String(s) => s.trim().parse::<i64>().ok().map(Value::Integer),
        _ => None,
    }
}

fn to_double(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) => s.trim().parse::<f64>().ok().map(Value::Double),
        other => other.as_f64().map(Value::Double),
    }
}

fn to_date(value: &Value) -> Option<Value> {
    match value {
        Value::Date(d) => Some(Value::Date(*d)),
        Value::String(s) => NaiveDateTime::parse_from_str(s.trim(), DATE_FORMAT)
            .ok()
            .map(Value::Date),
        _ => None,
    }
}
