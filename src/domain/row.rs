//! Ordered column/value rows
//!
//! Rows are ordered mappings from column name to [`Value`]. Source rows are
//! read once and treated as immutable; target rows are assembled
//! incrementally from mandatory columns, catalog-derived columns, and
//! computed columns before validation and queuing.

use crate::domain::value::Value;
use std::fmt;

/// An ordered mapping from column name to scalar value.
///
/// Insertion order is preserved so that batched inserts and audit output
/// keep a stable column order. Lookups are linear; rows in this pipeline
/// are tens of columns at most.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a value by column name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(col, _)| col == name)
            .map(|(_, v)| v)
    }

    /// True when the column exists in the row (even if its value is null).
    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|(col, _)| col == name)
    }

    /// Set a column value, replacing in place or appending at the end.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.columns.iter_mut().find(|(col, _)| *col == name) {
            Some((_, existing)) => *existing = value,
            None => self.columns.push((name, value)),
        }
    }

    /// Iterate columns in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(col, v)| (col.as_str(), v))
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(col, _)| col.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Serialize to a JSON object for the audit trail.
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .columns
            .iter()
            .map(|(col, v)| (col.clone(), v.to_json()))
            .collect();
        serde_json::Value::Object(map)
    }

    /// Render as `col: value, col: value` for human-readable log lines.
    pub fn describe(&self) -> String {
        self.columns
            .iter()
            .map(|(col, v)| format!("{col}: {v}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.describe())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (col, value) in iter {
            row.set(col, value);
        }
        row
    }
}
