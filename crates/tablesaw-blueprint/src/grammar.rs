//! The grammar (renderer) contract.
//!
//! A grammar is a strategy that turns one [`ChangeSet`] into dialect
//! DDL. Concrete dialects implement this trait; the blueprint core never
//! commits to any dialect's syntax.

use crate::changeset::ChangeSet;
use crate::error::Result;

/// Rendered DDL for one change set.
///
/// A single change set may compile to several statements (e.g. an ALTER
/// plus trailing index creations); `to_sql` joins them for callers that
/// want one script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledDdl {
    statements: Vec<String>,
}

impl CompiledDdl {
    /// Wraps a list of rendered statements.
    #[must_use]
    pub fn new(statements: Vec<String>) -> Self {
        Self { statements }
    }

    /// Returns the individual statements in emission order.
    #[must_use]
    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    /// Returns the statements joined into one script.
    #[must_use]
    pub fn to_sql(&self) -> String {
        self.statements.join(";\n")
    }
}

/// Dialect-specific DDL generation over a change set.
pub trait Grammar {
    /// Returns the grammar name, used in attributable errors.
    fn name(&self) -> &'static str;

    /// Compiles a create-mode change set into DDL.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BlueprintError::UnknownColumnType`] when a
    /// descriptor carries a type this grammar cannot render.
    fn compile_create(&self, changeset: &ChangeSet) -> Result<CompiledDdl>;

    /// Compiles an alter-mode change set into DDL.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BlueprintError::UnknownColumnType`] when a
    /// descriptor carries a type this grammar cannot render.
    fn compile_alter(&self, changeset: &ChangeSet) -> Result<CompiledDdl>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compiled_ddl_joins_statements() {
        let ddl = CompiledDdl::new(vec![
            "CREATE TABLE t (a INTEGER)".to_string(),
            "CREATE INDEX a_index ON t (a)".to_string(),
        ]);
        assert_eq!(ddl.statements().len(), 2);
        assert_eq!(
            ddl.to_sql(),
            "CREATE TABLE t (a INTEGER);\nCREATE INDEX a_index ON t (a)"
        );
    }
}
