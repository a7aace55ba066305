//! PostgreSQL grammar.

use tracing::warn;

use tablesaw_blueprint::{
    ChangeSet, ColumnEntry, ColumnLength, ColumnSpec, ColumnType, CompiledDdl,
    ConstraintDescriptor, ConstraintKind, ForeignKeyAction, ForeignKeyDescriptor, Grammar, Result,
};

/// PostgreSQL dialect grammar.
///
/// Double-quote quoting, `SERIAL` auto-increment, `ALTER COLUMN` for
/// modifications, and check-constraint enums. Column position hints have
/// no PostgreSQL equivalent and are ignored with a warning.
#[derive(Debug, Clone, Default)]
pub struct PostgresGrammar;

impl PostgresGrammar {
    /// Creates a new PostgreSQL grammar.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn quote(&self, name: &str) -> String {
        format!("\"{name}\"")
    }

    fn type_name(&self, spec: &ColumnSpec) -> String {
        match spec.column_type {
            ColumnType::String => format!("VARCHAR({})", length_or(spec, 255)),
            ColumnType::Char => format!("CHAR({})", length_or(spec, 1)),
            ColumnType::Text => "TEXT".to_string(),
            // Display widths are a MySQL notion; the stored type is the same.
            ColumnType::Integer | ColumnType::Unsigned => "INTEGER".to_string(),
            ColumnType::Increments => "SERIAL PRIMARY KEY".to_string(),
            ColumnType::Binary => "BYTEA".to_string(),
            ColumnType::Boolean => "BOOLEAN".to_string(),
            ColumnType::Date => "DATE".to_string(),
            ColumnType::DateTime | ColumnType::Timestamp => "TIMESTAMP".to_string(),
            ColumnType::Decimal => format!("DECIMAL({})", length_or(spec, 0)),
            ColumnType::Enum => "VARCHAR(255)".to_string(),
        }
    }

    fn enum_check(&self, spec: &ColumnSpec) -> Option<String> {
        if spec.column_type != ColumnType::Enum {
            return None;
        }
        match &spec.length {
            Some(ColumnLength::Set(options)) if !options.is_empty() => {
                let set = ColumnLength::Set(options.clone()).to_string();
                Some(format!("CHECK ({} IN ({set}))", self.quote(&spec.name)))
            }
            _ => None,
        }
    }

    fn column_definition(&self, spec: &ColumnSpec) -> String {
        if spec.after.is_some() {
            warn!(column = %spec.name, "PostgreSQL has no column ordering; ignoring AFTER hint");
        }
        let mut parts = vec![self.quote(&spec.name), self.type_name(spec)];
        if !spec.nullable && spec.column_type != ColumnType::Increments {
            parts.push("NOT NULL".to_string());
        }
        if let Some(default) = &spec.default {
            parts.push(format!("DEFAULT {}", default.to_sql()));
        }
        if let Some(check) = self.enum_check(spec) {
            parts.push(check);
        }
        parts.join(" ")
    }

    /// One ALTER TABLE statement altering type, nullability, and default
    /// of an existing column.
    fn modify_column_sql(&self, table: &str, spec: &ColumnSpec) -> String {
        let column = self.quote(&spec.name);
        let mut actions = vec![format!("ALTER COLUMN {column} TYPE {}", self.type_name(spec))];
        if spec.nullable {
            actions.push(format!("ALTER COLUMN {column} DROP NOT NULL"));
        } else {
            actions.push(format!("ALTER COLUMN {column} SET NOT NULL"));
        }
        if let Some(default) = &spec.default {
            actions.push(format!("ALTER COLUMN {column} SET DEFAULT {}", default.to_sql()));
        }
        format!("ALTER TABLE {} {}", self.quote(table), actions.join(", "))
    }

    fn standalone_constraint_sql(&self, table: &str, constraint: &ConstraintDescriptor) -> String {
        let quoted_table = self.quote(table);
        let name = self.quote(&constraint.index_name);
        let columns = self.quoted_list(&constraint.columns);
        match constraint.kind {
            ConstraintKind::Unique => {
                format!("ALTER TABLE {quoted_table} ADD CONSTRAINT {name} UNIQUE ({columns})")
            }
            ConstraintKind::Index => format!("CREATE INDEX {name} ON {quoted_table} ({columns})"),
            ConstraintKind::Fulltext => {
                let vector = constraint
                    .columns
                    .iter()
                    .map(|c| self.quote(c))
                    .collect::<Vec<_>>()
                    .join(" || ' ' || ");
                format!(
                    "CREATE INDEX {name} ON {quoted_table} USING GIN (to_tsvector('english', {vector}))"
                )
            }
            ConstraintKind::Primary => {
                format!("ALTER TABLE {quoted_table} ADD PRIMARY KEY ({columns})")
            }
        }
    }

    fn foreign_key_clause(&self, fk: &ForeignKeyDescriptor) -> String {
        let mut clause = format!(
            "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            self.quote(&fk.index_name),
            self.quote(&fk.column),
            self.quote(&fk.foreign_table),
            self.quote(&fk.foreign_column)
        );
        if fk.on_delete != ForeignKeyAction::NoAction {
            clause.push_str(&format!(" ON DELETE {}", fk.on_delete.to_sql()));
        }
        if fk.on_update != ForeignKeyAction::NoAction {
            clause.push_str(&format!(" ON UPDATE {}", fk.on_update.to_sql()));
        }
        clause
    }

    fn quoted_list(&self, columns: &[String]) -> String {
        columns
            .iter()
            .map(|c| self.quote(c))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn length_or(spec: &ColumnSpec, fallback: u32) -> String {
    spec.length
        .as_ref()
        .map_or_else(|| fallback.to_string(), ColumnLength::to_string)
}

impl Grammar for PostgresGrammar {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn compile_create(&self, changeset: &ChangeSet) -> Result<CompiledDdl> {
        let mut body: Vec<String> = Vec::new();
        for entry in &changeset.columns {
            match entry.spec() {
                Some(spec) => body.push(self.column_definition(spec)),
                None => {
                    warn!(table = %changeset.table, ?entry, "ignoring non-add entry in create mode");
                }
            }
        }

        let mut trailing: Vec<String> = Vec::new();
        for constraint in &changeset.constraints {
            // UNIQUE and PRIMARY KEY can be inlined; indexes cannot appear
            // inside CREATE TABLE in PostgreSQL.
            match constraint.kind {
                ConstraintKind::Unique => body.push(format!(
                    "CONSTRAINT {} UNIQUE ({})",
                    self.quote(&constraint.index_name),
                    self.quoted_list(&constraint.columns)
                )),
                ConstraintKind::Primary => body.push(format!(
                    "PRIMARY KEY ({})",
                    self.quoted_list(&constraint.columns)
                )),
                ConstraintKind::Index | ConstraintKind::Fulltext => {
                    trailing.push(self.standalone_constraint_sql(&changeset.table, constraint));
                }
            }
        }
        for fk in &changeset.foreign_keys {
            body.push(self.foreign_key_clause(fk));
        }

        let mut statements = vec![format!(
            "CREATE TABLE {} ({})",
            self.quote(&changeset.table),
            body.join(", ")
        )];
        statements.extend(trailing);
        Ok(CompiledDdl::new(statements))
    }

    fn compile_alter(&self, changeset: &ChangeSet) -> Result<CompiledDdl> {
        let table = self.quote(&changeset.table);
        let mut statements: Vec<String> = Vec::new();

        for entry in &changeset.columns {
            match entry {
                ColumnEntry::AddColumn(spec) => {
                    // A redeclaration carrying a rename source becomes a
                    // rename followed by a redefinition.
                    if let Some(old) = &spec.rename_from {
                        statements.push(format!(
                            "ALTER TABLE {table} RENAME COLUMN {} TO {}",
                            self.quote(old),
                            self.quote(&spec.name)
                        ));
                        statements.push(self.modify_column_sql(&changeset.table, spec));
                    } else {
                        statements.push(format!(
                            "ALTER TABLE {table} ADD COLUMN {}",
                            self.column_definition(spec)
                        ));
                    }
                }
                ColumnEntry::ModifyColumn(spec) => {
                    if let Some(old) = &spec.rename_from {
                        statements.push(format!(
                            "ALTER TABLE {table} RENAME COLUMN {} TO {}",
                            self.quote(old),
                            self.quote(&spec.name)
                        ));
                    }
                    statements.push(self.modify_column_sql(&changeset.table, spec));
                }
                ColumnEntry::RenameColumn { from, to } => statements.push(format!(
                    "ALTER TABLE {table} RENAME COLUMN {} TO {}",
                    self.quote(from),
                    self.quote(to)
                )),
                ColumnEntry::DropColumn { name } => statements.push(format!(
                    "ALTER TABLE {table} DROP COLUMN {}",
                    self.quote(name)
                )),
                ColumnEntry::DropIndex { name } => {
                    statements.push(format!("DROP INDEX {}", self.quote(name)));
                }
                ColumnEntry::DropUnique { name } | ColumnEntry::DropForeign { name } => statements
                    .push(format!(
                        "ALTER TABLE {table} DROP CONSTRAINT {}",
                        self.quote(name)
                    )),
                ColumnEntry::DropPrimary => statements.push(format!(
                    "ALTER TABLE {table} DROP CONSTRAINT {}",
                    self.quote(&format!("{}_pkey", changeset.table))
                )),
            }
        }

        for constraint in &changeset.constraints {
            statements.push(self.standalone_constraint_sql(&changeset.table, constraint));
        }
        for fk in &changeset.foreign_keys {
            statements.push(format!(
                "ALTER TABLE {table} ADD {}",
                self.foreign_key_clause(fk)
            ));
        }

        Ok(CompiledDdl::new(statements))
    }
}
