//! Ordered rows of a decision evaluation

use super::entries::DecisionResultEntries;
use crate::error::DecisionResultError;
use dmn_core::Value;
use indexmap::IndexMap;
use serde::Serialize;

/// Result of evaluating a decision, serialized as a list of objects
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DecisionResult {
    rows: Vec<DecisionResultEntries>,
}

impl DecisionResult {
    pub fn new(rows: Vec<DecisionResultEntries>) -> Self {
        Self { rows }
    }

    pub fn first_result(&self) -> Option<&DecisionResultEntries> {
        self.rows.first()
    }

    /// The only row; fails if there are several
    pub fn single_result(&self) -> Result<Option<&DecisionResultEntries>, DecisionResultError> {
        if self.rows.len() > 1 {
            return Err(DecisionResultError::SingleResultExpected {
                count: self.rows.len(),
                results: self.to_string(),
            });
        }
        Ok(self.rows.first())
    }

    /// The only entry of the only row
    pub fn single_entry(&self) -> Result<Option<&Value>, DecisionResultError> {
        match self.single_result()? {
            Some(row) => row.single_entry(),
            None => Ok(None),
        }
    }

    /// Values of `name` across all rows that have it, in row order
    pub fn collect_entries(&self, name: &str) -> Vec<&Value> {
        self.rows.iter().filter_map(|row| row.get(name)).collect()
    }

    /// Rows as plain value maps
    pub fn result_list(&self) -> Vec<IndexMap<String, Value>> {
        self.rows.iter().map(DecisionResultEntries::entry_map).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DecisionResultEntries> {
        self.rows.iter()
    }

    pub fn get(&self, index: usize) -> Option<&DecisionResultEntries> {
        self.rows.get(index)
    }
}

impl std::fmt::Display for DecisionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", row)?;
        }
        write!(f, "]")
    }
}

impl IntoIterator for DecisionResult {
    type Item = DecisionResultEntries;
    type IntoIter = std::vec::IntoIter<DecisionResultEntries>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a DecisionResult {
    type Item = &'a DecisionResultEntries;
    type IntoIter = std::slice::Iter<'a, DecisionResultEntries>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dmn_core::TypedValue;

    fn row(pairs: &[(&str, i64)]) -> DecisionResultEntries {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), TypedValue::untyped(*value)))
            .collect()
    }

    #[test]
    fn test_single_result() {
        let result = DecisionResult::new(vec![row(&[("a", 1)])]);
        assert_eq!(result.single_entry().unwrap(), Some(&Value::Integer(1)));

        let result = DecisionResult::new(vec![row(&[("a", 1)]), row(&[("a", 2)])]);
        assert_eq!(
            result.single_result().unwrap_err().to_string(),
            "Expected a single decision result, but found 2: [{a: 1}, {a: 2}]"
        );
        assert!(DecisionResult::default().single_result().unwrap().is_none());
    }

    #[test]
    fn test_collect_entries_skips_rows_without_name() {
        let result = DecisionResult::new(vec![
            row(&[("a", 1), ("b", 10)]),
            row(&[("b", 20)]),
            row(&[("a", 3)]),
        ]);
        assert_eq!(
            result.collect_entries("a"),
            vec![&Value::Integer(1), &Value::Integer(3)]
        );
        assert_eq!(result.result_list()[0].get("b"), Some(&Value::Integer(10)));
        assert_eq!(result.first_result().map(|r| r.len()), Some(2));
    }

    #[test]
    fn test_serializes_as_list_of_objects() {
        let result = DecisionResult::new(vec![row(&[("a", 1)]), row(&[("a", 2)])]);
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"[{"a":1},{"a":2}]"#
        );
    }
}
