//! Values tagged with the type they were coerced to

use super::type_definition::ValueType;
use super::value::Value;
use serde::{Deserialize, Serialize};

/// A runtime value together with its semantic type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedValue {
    pub value: Value,
    pub value_type: ValueType,
}

impl TypedValue {
    pub fn new(value: Value, value_type: ValueType) -> Self {
        Self { value, value_type }
    }

    /// Value without a declared type
    pub fn untyped(value: impl Into<Value>) -> Self {
        Self::new(value.into(), ValueType::Untyped)
    }

    /// The null value used for absent input expressions
    pub fn untyped_null() -> Self {
        Self::new(Value::Null, ValueType::Untyped)
    }

    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

impl From<Value> for TypedValue {
    fn from(value: Value) -> Self {
        TypedValue::untyped(value)
    }
}
