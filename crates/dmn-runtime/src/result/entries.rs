//! One row of a decision result

use crate::error::DecisionResultError;
use dmn_core::{TypedValue, Value};
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// Output name to typed value map of one result row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecisionResultEntries {
    entries: IndexMap<String, TypedValue>,
}

impl DecisionResultEntries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_value(&mut self, name: impl Into<String>, value: TypedValue) {
        self.entries.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name).map(|typed| &typed.value)
    }

    pub fn get_typed(&self, name: &str) -> Option<&TypedValue> {
        self.entries.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn first_entry(&self) -> Option<&Value> {
        self.first_entry_typed().map(|typed| &typed.value)
    }

    pub fn first_entry_typed(&self) -> Option<&TypedValue> {
        self.entries.values().next()
    }

    /// The only entry of the row; fails if there are several
    pub fn single_entry(&self) -> Result<Option<&Value>, DecisionResultError> {
        Ok(self.single_entry_typed()?.map(|typed| &typed.value))
    }

    pub fn single_entry_typed(&self) -> Result<Option<&TypedValue>, DecisionResultError> {
        if self.entries.len() > 1 {
            return Err(DecisionResultError::SingleEntryExpected {
                count: self.entries.len(),
                entries: self.to_string(),
            });
        }
        Ok(self.first_entry_typed())
    }

    /// Plain values by output name
    pub fn entry_map(&self) -> IndexMap<String, Value> {
        self.entries
            .iter()
            .map(|(name, typed)| (name.clone(), typed.value.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypedValue)> {
        self.entries.iter().map(|(name, typed)| (name.as_str(), typed))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl fmt::Display for DecisionResultEntries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, typed)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, typed.value)?;
        }
        write!(f, "}}")
    }
}

/// Serialized as a plain object of output values
impl Serialize for DecisionResultEntries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, typed) in &self.entries {
            map.serialize_entry(name, &typed.value)?;
        }
        map.end()
    }
}

impl FromIterator<(String, TypedValue)> for DecisionResultEntries {
    fn from_iter<I: IntoIterator<Item = (String, TypedValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
