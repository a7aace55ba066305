//! Named table constraints (unique, index, fulltext, primary).

use serde::{Deserialize, Serialize};

/// The kind of a named constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    /// Unique constraint.
    Unique,
    /// Plain index.
    Index,
    /// Full-text index.
    Fulltext,
    /// Primary key.
    Primary,
}

impl ConstraintKind {
    /// Returns the suffix used in derived index names.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Unique => "unique",
            Self::Index => "index",
            Self::Fulltext => "fulltext",
            Self::Primary => "primary",
        }
    }
}

/// A named constraint over one or more columns.
///
/// The index name is derived deterministically from the column list and
/// kind, so the same declaration always produces the same name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintDescriptor {
    /// Ordered columns the constraint covers.
    pub columns: Vec<String>,
    /// Constraint kind.
    pub kind: ConstraintKind,
    /// Derived name: `{joined column names}_{kind}`.
    pub index_name: String,
}

impl ConstraintDescriptor {
    /// Creates a constraint over the given columns, deriving its name.
    #[must_use]
    pub fn new(columns: Vec<String>, kind: ConstraintKind) -> Self {
        let index_name = format!("{}_{}", columns.join("_"), kind.suffix());
        Self {
            columns,
            kind,
            index_name,
        }
    }

    /// Convenience constructor for a single-column constraint.
    #[must_use]
    pub fn single(column: impl Into<String>, kind: ConstraintKind) -> Self {
        Self::new(vec![column.into()], kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_column_index_name() {
        let c = ConstraintDescriptor::single("email", ConstraintKind::Unique);
        assert_eq!(c.index_name, "email_unique");
        assert_eq!(c.columns, vec!["email"]);
    }

    #[test]
    fn test_composite_index_name_joins_columns() {
        let c = ConstraintDescriptor::new(
            vec!["company_id".to_string(), "status".to_string()],
            ConstraintKind::Index,
        );
        assert_eq!(c.index_name, "company_id_status_index");
    }

    #[test]
    fn test_name_is_deterministic() {
        let a = ConstraintDescriptor::single("title", ConstraintKind::Fulltext);
        let b = ConstraintDescriptor::single("title", ConstraintKind::Fulltext);
        assert_eq!(a.index_name, b.index_name);
    }
}
