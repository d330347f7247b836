//! Row transfer object

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single data row in transit between a caller and a [`Table`]
///
/// Cells are keyed by field name. Fields marked as key fields form a
/// composite uniqueness constraint that [`Table::add_row`] checks before
/// inserting.
///
/// [`Table`]: crate::table::Table
/// [`Table::add_row`]: crate::table::Table::add_row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    cells: HashMap<String, String>,
    key_fields: Vec<String>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty row sized for the given number of fields
    pub fn with_capacity(fields: usize) -> Self {
        Self {
            cells: HashMap::with_capacity(fields),
            key_fields: Vec::new(),
        }
    }

    /// Add a field to the row
    ///
    /// `is_key` marks the field as part of the row's composite uniqueness
    /// key. Adding a field name twice fails with
    /// [`StoreError::DuplicateField`].
    pub fn add_field(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        is_key: bool,
    ) -> Result<(), StoreError> {
        let name = name.into();
        if self.cells.contains_key(&name) {
            return Err(StoreError::DuplicateField { field: name });
        }
        if is_key {
            self.key_fields.push(name.clone());
        }
        self.cells.insert(name, value.into());
        Ok(())
    }

    /// Number of fields in the row
    pub fn field_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of key fields in the row
    pub fn key_count(&self) -> usize {
        self.key_fields.len()
    }

    /// Names of all fields in the row, in no particular order
    pub fn field_names(&self) -> Vec<&str> {
        self.cells.keys().map(String::as_str).collect()
    }

    /// Names of the key fields, in the order they were added
    pub fn key_fields(&self) -> &[String] {
        &self.key_fields
    }

    /// Value of the named field, if the row has it
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cells.get(name).map(String::as_str)
    }

    /// Replace the value of an existing field, returning the previous value
    ///
    /// Returns `None` without inserting anything when the field was never
    /// added; `set` cannot create new fields.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Option<String> {
        self.cells
            .get_mut(name)
            .map(|slot| std::mem::replace(slot, value.into()))
    }

    /// True when the row has no fields at all
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_get_fields() {
        let mut row = Row::new();
        row.add_field("Name", "Alice", true).unwrap();
        row.add_field("Age", "30", false).unwrap();

        assert_eq!(row.field_count(), 2);
        assert_eq!(row.key_count(), 1);
        assert_eq!(row.get("Name"), Some("Alice"));
        assert_eq!(row.get("Age"), Some("30"));
        assert_eq!(row.get("Missing"), None);
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let mut row = Row::new();
        row.add_field("Name", "Alice", false).unwrap();
        let result = row.add_field("Name", "Bob", false);
        assert!(matches!(result, Err(StoreError::DuplicateField { .. })));
        assert_eq!(row.get("Name"), Some("Alice"));
    }

    #[test]
    fn test_key_fields_keep_insertion_order() {
        let mut row = Row::new();
        row.add_field("C", "3", true).unwrap();
        row.add_field("A", "1", true).unwrap();
        row.add_field("B", "2", false).unwrap();
        assert_eq!(row.key_fields(), ["C", "A"]);
    }

    #[test]
    fn test_set_only_updates_existing_fields() {
        let mut row = Row::new();
        row.add_field("Age", "30", false).unwrap();

        assert_eq!(row.set("Age", "31"), Some("30".to_string()));
        assert_eq!(row.get("Age"), Some("31"));

        assert_eq!(row.set("Ghost", "boo"), None);
        assert_eq!(row.get("Ghost"), None);
        assert_eq!(row.field_count(), 1);
    }

    #[test]
    fn test_row_serde_round_trip() {
        let mut row = Row::new();
        row.add_field("Id", "7", true).unwrap();
        row.add_field("Label", "widget", false).unwrap();

        let json = serde_json::to_string(&row).unwrap();
        let back: Row = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
    }
}
