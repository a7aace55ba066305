//! Foreign key descriptors and the staged completion state machine.
//!
//! A foreign key is declared across three chained calls:
//! `foreign(column)`, `references(target_column)`, `on(target_table)`.
//! The in-progress descriptor lives in [`PendingForeignKey`] and only a
//! descriptor that reaches completion (both targets known) is moved into
//! the change set. The stages are enum variants, so an incomplete
//! descriptor cannot be confused with a renderable one.

use serde::{Deserialize, Serialize};

use crate::error::{BlueprintError, Result};

/// Referential action for ON DELETE / ON UPDATE clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ForeignKeyAction {
    /// No action.
    #[default]
    NoAction,
    /// Restrict the delete/update.
    Restrict,
    /// Cascade the delete/update to referencing rows.
    Cascade,
    /// Set the referencing column to NULL.
    SetNull,
    /// Set the referencing column to its default.
    SetDefault,
}

impl ForeignKeyAction {
    /// Returns the SQL clause body for this action.
    #[must_use]
    pub fn to_sql(self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

/// A completed referential constraint, eligible for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyDescriptor {
    /// Referencing column in the blueprint's table.
    pub column: String,
    /// The blueprint's table.
    pub table: String,
    /// Referenced table.
    pub foreign_table: String,
    /// Referenced column.
    pub foreign_column: String,
    /// ON DELETE action.
    pub on_delete: ForeignKeyAction,
    /// ON UPDATE action.
    pub on_update: ForeignKeyAction,
    /// Derived name: `{table}_{column}_foreign`, materialized at
    /// completion time.
    pub index_name: String,
}

/// In-progress foreign key declaration.
///
/// Stages: `ColumnSet` (only the local column is known) and
/// `ReferencesSet` (target column known, target table still pending).
/// Completion happens in [`PendingForeignKey::complete`], which consumes
/// the pending value and produces a [`ForeignKeyDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingForeignKey {
    /// `foreign(column)` has been called.
    ColumnSet {
        /// Local column.
        column: String,
        /// ON DELETE action chosen so far.
        on_delete: ForeignKeyAction,
        /// ON UPDATE action chosen so far.
        on_update: ForeignKeyAction,
    },
    /// `references(target_column)` has also been called.
    ReferencesSet {
        /// Local column.
        column: String,
        /// Referenced column.
        foreign_column: String,
        /// ON DELETE action chosen so far.
        on_delete: ForeignKeyAction,
        /// ON UPDATE action chosen so far.
        on_update: ForeignKeyAction,
    },
}

impl PendingForeignKey {
    /// Opens a pending declaration for the given local column.
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self::ColumnSet {
            column: column.into(),
            on_delete: ForeignKeyAction::default(),
            on_update: ForeignKeyAction::default(),
        }
    }

    /// Returns the local column the chain started from.
    #[must_use]
    pub fn column(&self) -> &str {
        match self {
            Self::ColumnSet { column, .. } | Self::ReferencesSet { column, .. } => column,
        }
    }

    /// Records the referenced column, advancing to `ReferencesSet`.
    #[must_use]
    pub fn references(self, foreign_column: impl Into<String>) -> Self {
        match self {
            Self::ColumnSet {
                column,
                on_delete,
                on_update,
            }
            | Self::ReferencesSet {
                column,
                on_delete,
                on_update,
                ..
            } => Self::ReferencesSet {
                column,
                foreign_column: foreign_column.into(),
                on_delete,
                on_update,
            },
        }
    }

    /// Sets the ON DELETE action on the pending declaration.
    pub fn set_on_delete(&mut self, action: ForeignKeyAction) {
        match self {
            Self::ColumnSet { on_delete, .. } | Self::ReferencesSet { on_delete, .. } => {
                *on_delete = action;
            }
        }
    }

    /// Sets the ON UPDATE action on the pending declaration.
    pub fn set_on_update(&mut self, action: ForeignKeyAction) {
        match self {
            Self::ColumnSet { on_update, .. } | Self::ReferencesSet { on_update, .. } => {
                *on_update = action;
            }
        }
    }

    /// Completes the declaration against the given target table.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::IncompleteForeignKey`] when no referenced
    /// column was recorded, i.e. `on()` was called before `references()`.
    pub fn complete(self, table: &str, foreign_table: impl Into<String>) -> Result<ForeignKeyDescriptor> {
        match self {
            Self::ColumnSet { column, .. } => Err(BlueprintError::IncompleteForeignKey {
                table: table.to_string(),
                column,
                missing: "column",
            }),
            Self::ReferencesSet {
                column,
                foreign_column,
                on_delete,
                on_update,
            } => {
                let index_name = format!("{table}_{column}_foreign");
                Ok(ForeignKeyDescriptor {
                    column,
                    table: table.to_string(),
                    foreign_table: foreign_table.into(),
                    foreign_column,
                    on_delete,
                    on_update,
                    index_name,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_chain_derives_index_name() {
        let fk = PendingForeignKey::new("user_id")
            .references("id")
            .complete("posts", "users")
            .unwrap();

        assert_eq!(fk.index_name, "posts_user_id_foreign");
        assert_eq!(fk.foreign_table, "users");
        assert_eq!(fk.foreign_column, "id");
        assert_eq!(fk.on_delete, ForeignKeyAction::NoAction);
    }

    #[test]
    fn test_complete_without_references_is_rejected() {
        let err = PendingForeignKey::new("user_id")
            .complete("posts", "users")
            .unwrap_err();

        match err {
            BlueprintError::IncompleteForeignKey { column, missing, .. } => {
                assert_eq!(column, "user_id");
                assert_eq!(missing, "column");
            }
            other => panic!("expected IncompleteForeignKey, got {other:?}"),
        }
    }

    #[test]
    fn test_actions_survive_stage_transition() {
        let mut pending = PendingForeignKey::new("author_id");
        pending.set_on_delete(ForeignKeyAction::Cascade);
        let fk = pending
            .references("id")
            .complete("posts", "users")
            .unwrap();

        assert_eq!(fk.on_delete, ForeignKeyAction::Cascade);
        assert_eq!(fk.on_update, ForeignKeyAction::NoAction);
    }
}
