//! Error types for blueprint construction and rendering.

/// Errors that can occur while building or rendering a schema blueprint.
#[derive(Debug, thiserror::Error)]
pub enum BlueprintError {
    /// A refinement call (nullable, unique, rename, after, change, ...)
    /// was made before any column was declared in the session.
    #[error("'{operation}' called on table '{table}' before any column was declared")]
    InvalidBuilderState {
        /// The table the blueprint is scoped to.
        table: String,
        /// The refinement operation that was misused.
        operation: &'static str,
    },

    /// A foreign key chain was left without a target table and/or target
    /// column. Incomplete foreign keys are never rendered.
    #[error("foreign key on column '{column}' of table '{table}' is missing its target {missing}")]
    IncompleteForeignKey {
        /// The table the blueprint is scoped to.
        table: String,
        /// The local column the chain started from.
        column: String,
        /// What is missing: "table" or "column".
        missing: &'static str,
    },

    /// A grammar received a column type tag it does not know how to render.
    ///
    /// The tag is passed through unmodified from the descriptor so the
    /// failure is attributable to the exact declaration.
    #[error("grammar '{grammar}' does not recognize column type '{type_tag}'")]
    UnknownColumnType {
        /// Name of the grammar that rejected the type.
        grammar: &'static str,
        /// The stable tag of the unrecognized column type.
        type_tag: String,
    },

    /// Reserved for builders carrying more than one column cursor.
    ///
    /// The current blueprint keeps exactly one focus, so this variant is
    /// never constructed; tests assert the single-focus behavior.
    #[error("refinement target is ambiguous")]
    AmbiguousFocus,
}

/// Result type for blueprint operations.
pub type Result<T> = std::result::Result<T, BlueprintError>;
