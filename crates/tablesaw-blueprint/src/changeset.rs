//! The accumulated, table-scoped change set.
//!
//! A change set is a pure data carrier: it holds descriptors in
//! declaration order and performs no SQL assembly. All dialect syntax
//! lives in the grammars that consume it.

use serde::{Deserialize, Serialize};

use crate::column::{ColumnEntry, ColumnSpec};
use crate::constraint::ConstraintDescriptor;
use crate::foreign_key::ForeignKeyDescriptor;

/// The operation mode a blueprint session was opened with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableMode {
    /// The session describes a new table (CREATE).
    Create,
    /// The session alters an existing table (ALTER).
    Alter,
}

/// All pending schema operations for one table, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// Table name.
    pub table: String,
    /// Create vs alter.
    pub mode: TableMode,
    /// Ordered column operations.
    pub columns: Vec<ColumnEntry>,
    /// Named constraints.
    pub constraints: Vec<ConstraintDescriptor>,
    /// Completed foreign keys.
    pub foreign_keys: Vec<ForeignKeyDescriptor>,
}

impl ChangeSet {
    /// Creates an empty change set for the given table and mode.
    #[must_use]
    pub fn new(table: impl Into<String>, mode: TableMode) -> Self {
        Self {
            table: table.into(),
            mode,
            columns: Vec::new(),
            constraints: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// Returns the specs of all add/modify entries, in order.
    pub fn column_specs(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter_map(ColumnEntry::spec)
    }

    /// Returns true if no operations were declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.constraints.is_empty() && self.foreign_keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnType;

    #[test]
    fn test_declaration_order_is_preserved() {
        let mut cs = ChangeSet::new("users", TableMode::Create);
        cs.columns.push(ColumnEntry::AddColumn(ColumnSpec::new(
            ColumnType::String,
            "name",
            None,
            false,
        )));
        cs.columns.push(ColumnEntry::AddColumn(ColumnSpec::new(
            ColumnType::String,
            "email",
            None,
            false,
        )));

        let names: Vec<&str> = cs.column_specs().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["name", "email"]);
    }

    #[test]
    fn test_empty_change_set() {
        let cs = ChangeSet::new("users", TableMode::Alter);
        assert!(cs.is_empty());
    }
}
