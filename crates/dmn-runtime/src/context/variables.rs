//! Caller supplied variables

use super::VariableContext;
use dmn_core::{TypedValue, Value};
use indexmap::IndexMap;
use serde::Serialize;

/// Ordered map of variable names to typed values
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Variables {
    entries: IndexMap<String, TypedValue>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an untyped value
    pub fn put_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, TypedValue::untyped(value));
        self
    }

    pub fn put_value_typed(mut self, name: impl Into<String>, value: TypedValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: TypedValue) {
        self.entries.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.entries.get(name)
    }

    pub fn get_value(&self, name: &str) -> Option<&Value> {
        self.entries.get(name).map(|typed| &typed.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypedValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Variables from the fields of a JSON object; other JSON values yield none
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Object(map) => map
                .into_iter()
                .map(|(name, value)| (name, Value::from(value)))
                .collect(),
            _ => Self::new(),
        }
    }
}

impl VariableContext for Variables {
    fn resolve(&self, name: &str) -> Option<&TypedValue> {
        self.entries.get(name)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut variables = Variables::new();
        for (name, value) in iter {
            variables.insert(name, TypedValue::untyped(value));
        }
        variables
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dmn_core::ValueType;

    #[test]
    fn test_put_values_keep_order() {
        let variables = Variables::new()
            .put_value("b", 2)
            .put_value("a", "x")
            .put_value_typed("c", TypedValue::new(Value::Integer(3), ValueType::Long));

        let names: Vec<&str> = variables.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(variables.get("c").map(|v| v.value_type), Some(ValueType::Long));
    }

    #[test]
    fn test_from_json() {
        let variables = Variables::from_json(serde_json::json!({"age": 10, "name": "Ann"}));
        assert_eq!(variables.len(), 2);
        assert_eq!(variables.get_value("age"), Some(&Value::Integer(10)));

        assert!(Variables::from_json(serde_json::json!([1, 2])).is_empty());
    }
}
