//! Column descriptors.
//!
//! A column operation is a tagged union: add/modify entries carry a full
//! [`ColumnSpec`], while drop entries carry only the name (or nothing at
//! all for a primary-key drop). Grammars match on the variant and never
//! have to interpret a null type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Column data types understood by the blueprint.
///
/// Grammars map these to dialect-specific type names; the blueprint never
/// commits to any dialect's spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// Variable-length string (VARCHAR-family).
    String,
    /// Fixed-length character string.
    Char,
    /// Unbounded text.
    Text,
    /// Signed integer.
    Integer,
    /// Auto-incrementing integer primary key.
    Increments,
    /// Unsigned integer.
    Unsigned,
    /// Binary data.
    Binary,
    /// Boolean.
    Boolean,
    /// Date only.
    Date,
    /// Date and time.
    DateTime,
    /// Timestamp.
    Timestamp,
    /// Fixed-precision decimal.
    Decimal,
    /// Enumerated value set.
    Enum,
}

impl ColumnType {
    /// Returns the stable tag for this type.
    ///
    /// Grammars embed the tag unmodified in `UnknownColumnType` errors so
    /// the failing declaration is attributable.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Char => "char",
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Increments => "increments",
            Self::Unsigned => "unsigned",
            Self::Binary => "binary",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Timestamp => "timestamp",
            Self::Decimal => "decimal",
            Self::Enum => "enum",
        }
    }
}

/// Length descriptor for a column type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnLength {
    /// Single scalar length, e.g. `VARCHAR(255)`.
    Fixed(u32),
    /// Combined precision pair for decimal columns, rendered as a single
    /// specifier `"{length}, {scale}"`.
    Precision {
        /// Total number of digits.
        length: u32,
        /// Digits after the decimal point.
        scale: u32,
    },
    /// Enum option set, rendered as comma-joined single-quoted literals.
    /// An empty set renders as an empty string.
    Set(Vec<String>),
}

impl fmt::Display for ColumnLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(len) => write!(f, "{len}"),
            Self::Precision { length, scale } => write!(f, "{length}, {scale}"),
            Self::Set(options) => {
                let quoted: Vec<String> = options
                    .iter()
                    .map(|o| format!("'{}'", o.replace('\'', "''")))
                    .collect();
                write!(f, "{}", quoted.join(","))
            }
        }
    }
}

/// Default value for a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DefaultValue {
    /// Boolean default.
    Bool(bool),
    /// Integer default.
    Integer(i64),
    /// Float default.
    Float(f64),
    /// String default.
    String(String),
    /// Raw SQL expression.
    Expression(String),
    /// Sentinel meaning "use the current timestamp"; grammars pick the
    /// dialect spelling.
    CurrentTimestamp,
}

impl DefaultValue {
    /// Returns the dialect-neutral SQL fragment for this default.
    ///
    /// `CurrentTimestamp` renders as `CURRENT_TIMESTAMP`, which every
    /// supported dialect accepts.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Bool(b) => {
                if *b {
                    String::from("TRUE")
                } else {
                    String::from("FALSE")
                }
            }
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::String(s) => format!("'{}'", s.replace('\'', "''")),
            Self::Expression(expr) => expr.clone(),
            Self::CurrentTimestamp => String::from("CURRENT_TIMESTAMP"),
        }
    }
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for DefaultValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for DefaultValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for DefaultValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Full description of a column being added or modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name.
    pub name: String,
    /// Data type.
    pub column_type: ColumnType,
    /// Length / precision / option set, where the type takes one.
    pub length: Option<ColumnLength>,
    /// Whether the column allows NULL.
    pub nullable: bool,
    /// Default value, if any.
    pub default: Option<DefaultValue>,
    /// Previous name, when the declaration renames an existing column.
    pub rename_from: Option<String>,
    /// Physical-ordering hint: place this column after the named one.
    pub after: Option<String>,
}

impl ColumnSpec {
    /// Creates a new column spec with no default, rename, or position hint.
    #[must_use]
    pub fn new(
        column_type: ColumnType,
        name: impl Into<String>,
        length: Option<ColumnLength>,
        nullable: bool,
    ) -> Self {
        Self {
            name: name.into(),
            column_type,
            length,
            nullable,
            default: None,
            rename_from: None,
            after: None,
        }
    }
}

/// One ordered entry in a change set's column list.
///
/// Each variant carries only the fields its operation needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnEntry {
    /// Add a new column.
    AddColumn(ColumnSpec),
    /// Modify an existing column (ALTER ... MODIFY semantics). Only ever
    /// produced by flipping an `AddColumn` via the `change()` refinement.
    ModifyColumn(ColumnSpec),
    /// Rename a column in place, keeping its definition.
    RenameColumn {
        /// Current column name.
        from: String,
        /// New column name.
        to: String,
    },
    /// Drop a column.
    DropColumn {
        /// Column name.
        name: String,
    },
    /// Drop a named index.
    DropIndex {
        /// Index name.
        name: String,
    },
    /// Drop a named unique constraint.
    DropUnique {
        /// Constraint name.
        name: String,
    },
    /// Drop the table's primary key.
    DropPrimary,
    /// Drop a foreign key constraint by its canonical index name.
    DropForeign {
        /// Canonical `{table}_{column}_foreign` name.
        name: String,
    },
}

impl ColumnEntry {
    /// Returns the spec for add/modify entries.
    #[must_use]
    pub fn spec(&self) -> Option<&ColumnSpec> {
        match self {
            Self::AddColumn(spec) | Self::ModifyColumn(spec) => Some(spec),
            _ => None,
        }
    }

    /// Returns the mutable spec for add/modify entries.
    pub fn spec_mut(&mut self) -> Option<&mut ColumnSpec> {
        match self {
            Self::AddColumn(spec) | Self::ModifyColumn(spec) => Some(spec),
            _ => None,
        }
    }

    /// Returns true if this entry drops a named constraint rather than a
    /// real column.
    #[must_use]
    pub fn is_constraint_drop(&self) -> bool {
        matches!(
            self,
            Self::DropIndex { .. } | Self::DropUnique { .. } | Self::DropPrimary | Self::DropForeign { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_length_renders_as_pair() {
        let length = ColumnLength::Precision {
            length: 17,
            scale: 6,
        };
        assert_eq!(length.to_string(), "17, 6");
    }

    #[test]
    fn test_option_set_renders_quoted() {
        let length = ColumnLength::Set(vec!["open".to_string(), "closed".to_string()]);
        assert_eq!(length.to_string(), "'open','closed'");
    }

    #[test]
    fn test_empty_option_set_renders_empty() {
        let length = ColumnLength::Set(Vec::new());
        assert_eq!(length.to_string(), "");
    }

    #[test]
    fn test_option_set_escapes_quotes() {
        let length = ColumnLength::Set(vec!["it's".to_string()]);
        assert_eq!(length.to_string(), "'it''s'");
    }

    #[test]
    fn test_default_value_to_sql() {
        assert_eq!(DefaultValue::Bool(true).to_sql(), "TRUE");
        assert_eq!(DefaultValue::Integer(42).to_sql(), "42");
        assert_eq!(DefaultValue::String("a'b".to_string()).to_sql(), "'a''b'");
        assert_eq!(DefaultValue::CurrentTimestamp.to_sql(), "CURRENT_TIMESTAMP");
    }

    #[test]
    fn test_constraint_drop_classification() {
        assert!(ColumnEntry::DropPrimary.is_constraint_drop());
        assert!(ColumnEntry::DropForeign {
            name: "posts_user_id_foreign".to_string()
        }
        .is_constraint_drop());
        assert!(!ColumnEntry::DropColumn {
            name: "email".to_string()
        }
        .is_constraint_drop());
    }

    #[test]
    fn test_type_tags_are_stable() {
        assert_eq!(ColumnType::Increments.tag(), "increments");
        assert_eq!(ColumnType::Enum.tag(), "enum");
    }
}
