//! MySQL grammar.

use tracing::warn;

use tablesaw_blueprint::{
    ChangeSet, ColumnEntry, ColumnLength, ColumnSpec, ColumnType, CompiledDdl,
    ConstraintDescriptor, ConstraintKind, ForeignKeyAction, ForeignKeyDescriptor, Grammar, Result,
};

/// MySQL dialect grammar.
///
/// Backtick quoting, `AUTO_INCREMENT`, inline `ENUM(...)` types, and
/// `MODIFY`/`CHANGE` column alteration.
#[derive(Debug, Clone, Default)]
pub struct MysqlGrammar;

impl MysqlGrammar {
    /// Creates a new MySQL grammar.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn quote(&self, name: &str) -> String {
        format!("`{name}`")
    }

    fn type_name(&self, spec: &ColumnSpec) -> String {
        match spec.column_type {
            ColumnType::String => format!("VARCHAR({})", length_or(spec, 255)),
            ColumnType::Char => format!("CHAR({})", length_or(spec, 1)),
            ColumnType::Text => "TEXT".to_string(),
            ColumnType::Integer => format!("INT({})", length_or(spec, 11)),
            ColumnType::Increments => "INT UNSIGNED AUTO_INCREMENT PRIMARY KEY".to_string(),
            ColumnType::Unsigned => "INT UNSIGNED".to_string(),
            ColumnType::Binary => "LONGBLOB".to_string(),
            ColumnType::Boolean => "BOOLEAN".to_string(),
            ColumnType::Date => "DATE".to_string(),
            ColumnType::DateTime => "DATETIME".to_string(),
            ColumnType::Timestamp => "TIMESTAMP".to_string(),
            ColumnType::Decimal => format!("DECIMAL({})", length_or(spec, 0)),
            ColumnType::Enum => format!("ENUM({})", length_or(spec, 0)),
        }
    }

    fn column_definition(&self, spec: &ColumnSpec) -> String {
        let mut parts = vec![self.quote(&spec.name), self.type_name(spec)];
        if !spec.nullable && spec.column_type != ColumnType::Increments {
            parts.push("NOT NULL".to_string());
        }
        if let Some(default) = &spec.default {
            parts.push(format!("DEFAULT {}", default.to_sql()));
        }
        parts.join(" ")
    }

    fn position_clause(&self, spec: &ColumnSpec) -> String {
        spec.after
            .as_ref()
            .map(|column| format!(" AFTER {}", self.quote(column)))
            .unwrap_or_default()
    }

    fn inline_constraint(&self, constraint: &ConstraintDescriptor) -> String {
        let columns = self.quoted_list(&constraint.columns);
        let name = self.quote(&constraint.index_name);
        match constraint.kind {
            ConstraintKind::Unique => format!("CONSTRAINT {name} UNIQUE ({columns})"),
            ConstraintKind::Index => format!("INDEX {name} ({columns})"),
            ConstraintKind::Fulltext => format!("FULLTEXT INDEX {name} ({columns})"),
            ConstraintKind::Primary => format!("PRIMARY KEY ({columns})"),
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

    fn alter_constraint_sql(&self, table: &str, constraint: &ConstraintDescriptor) -> String {
        let quoted_table = self.quote(table);
        let columns = self.quoted_list(&constraint.columns);
        let name = self.quote(&constraint.index_name);
        match constraint.kind {
            ConstraintKind::Unique => {
                format!("ALTER TABLE {quoted_table} ADD CONSTRAINT {name} UNIQUE ({columns})")
            }
            ConstraintKind::Index => format!("CREATE INDEX {name} ON {quoted_table} ({columns})"),
            ConstraintKind::Fulltext => {
                format!("CREATE FULLTEXT INDEX {name} ON {quoted_table} ({columns})")
            }
            ConstraintKind::Primary => {
                format!("ALTER TABLE {quoted_table} ADD PRIMARY KEY ({columns})")
            }
        }
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

impl Grammar for MysqlGrammar {
    fn name(&self) -> &'static str {
        "mysql"
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
        for constraint in &changeset.constraints {
            body.push(self.inline_constraint(constraint));
        }
        for fk in &changeset.foreign_keys {
            body.push(self.foreign_key_clause(fk));
        }

        let sql = format!(
            "CREATE TABLE {} ({})",
            self.quote(&changeset.table),
            body.join(", ")
        );
        Ok(CompiledDdl::new(vec![sql]))
    }

    fn compile_alter(&self, changeset: &ChangeSet) -> Result<CompiledDdl> {
        let table = self.quote(&changeset.table);
        let mut statements: Vec<String> = Vec::new();

        for entry in &changeset.columns {
            let sql = match entry {
                ColumnEntry::AddColumn(spec) => match &spec.rename_from {
                    // Redeclaration with a rename source compiles to CHANGE,
                    // which renames and redefines in one statement.
                    Some(old) => format!(
                        "ALTER TABLE {table} CHANGE {} {}{}",
                        self.quote(old),
                        self.column_definition(spec),
                        self.position_clause(spec)
                    ),
                    None => format!(
                        "ALTER TABLE {table} ADD {}{}",
                        self.column_definition(spec),
                        self.position_clause(spec)
                    ),
                },
                ColumnEntry::ModifyColumn(spec) => match &spec.rename_from {
                    Some(old) => format!(
                        "ALTER TABLE {table} CHANGE {} {}{}",
                        self.quote(old),
                        self.column_definition(spec),
                        self.position_clause(spec)
                    ),
                    None => format!(
                        "ALTER TABLE {table} MODIFY {}{}",
                        self.column_definition(spec),
                        self.position_clause(spec)
                    ),
                },
                ColumnEntry::RenameColumn { from, to } => format!(
                    "ALTER TABLE {table} RENAME COLUMN {} TO {}",
                    self.quote(from),
                    self.quote(to)
                ),
                ColumnEntry::DropColumn { name } => {
                    format!("ALTER TABLE {table} DROP COLUMN {}", self.quote(name))
                }
                ColumnEntry::DropIndex { name } | ColumnEntry::DropUnique { name } => {
                    format!("ALTER TABLE {table} DROP INDEX {}", self.quote(name))
                }
                ColumnEntry::DropPrimary => format!("ALTER TABLE {table} DROP PRIMARY KEY"),
                ColumnEntry::DropForeign { name } => {
                    format!("ALTER TABLE {table} DROP FOREIGN KEY {}", self.quote(name))
                }
            };
            statements.push(sql);
        }

        for constraint in &changeset.constraints {
            statements.push(self.alter_constraint_sql(&changeset.table, constraint));
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

#[cfg(test)]
mod tests {
    use super::*;
    use tablesaw_blueprint::{Blueprint, BlueprintConfig};

    fn grammar() -> MysqlGrammar {
        MysqlGrammar::new()
    }

    #[test]
    fn test_create_table() {
        let mut bp = Blueprint::create("users", BlueprintConfig::new());
        bp.increments("id");
        bp.string("email");
        bp.unique().unwrap();
        bp.timestamps();

        let sql = bp.to_sql(&grammar()).unwrap();
        assert!(sql.starts_with("CREATE TABLE `users` ("));
        assert!(sql.contains("`id` INT UNSIGNED AUTO_INCREMENT PRIMARY KEY"));
        assert!(sql.contains("`email` VARCHAR(255) NOT NULL"));
        assert!(sql.contains("`created_at` TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP"));
        assert!(sql.contains("CONSTRAINT `email_unique` UNIQUE (`email`)"));
    }

    #[test]
    fn test_create_with_enum_and_decimal() {
        let mut bp = Blueprint::create("orders", BlueprintConfig::new());
        bp.enumeration("status", &["open", "closed"]);
        bp.decimal("total", 17, 6);

        let sql = bp.to_sql(&grammar()).unwrap();
        assert!(sql.contains("`status` ENUM('open','closed') NOT NULL"));
        assert!(sql.contains("`total` DECIMAL(17, 6) NOT NULL"));
    }

    #[test]
    fn test_empty_enum_renders() {
        let mut bp = Blueprint::create("orders", BlueprintConfig::new());
        bp.enumeration("status", &[]);
        let sql = bp.to_sql(&grammar()).unwrap();
        assert!(sql.contains("`status` ENUM() NOT NULL"));
    }

    #[test]
    fn test_alter_add_with_position() {
        let mut bp = Blueprint::alter("users", BlueprintConfig::new());
        bp.string("nickname");
        bp.nullable().unwrap();
        bp.after("email").unwrap();

        let sql = bp.to_sql(&grammar()).unwrap();
        assert_eq!(
            sql,
            "ALTER TABLE `users` ADD `nickname` VARCHAR(255) AFTER `email`"
        );
    }

    #[test]
    fn test_alter_modify_and_change() {
        let mut bp = Blueprint::alter("users", BlueprintConfig::new());
        bp.string_len("email", 191);
        bp.change().unwrap();
        bp.string("handle");
        bp.rename_from("username").unwrap();

        let sql = bp.to_sql(&grammar()).unwrap();
        assert!(sql.contains("ALTER TABLE `users` MODIFY `email` VARCHAR(191) NOT NULL"));
        assert!(sql.contains("ALTER TABLE `users` CHANGE `username` `handle` VARCHAR(255) NOT NULL"));
    }

    #[test]
    fn test_alter_drops() {
        let mut bp = Blueprint::alter("posts", BlueprintConfig::new());
        bp.drop_column(&["slug"]);
        bp.drop_index(&["title_index"]);
        bp.drop_primary();
        bp.drop_foreign(&["user_id"]);

        let sql = bp.to_sql(&grammar()).unwrap();
        let statements: Vec<&str> = sql.split(";\n").collect();
        assert_eq!(
            statements,
            vec![
                "ALTER TABLE `posts` DROP COLUMN `slug`",
                "ALTER TABLE `posts` DROP INDEX `title_index`",
                "ALTER TABLE `posts` DROP PRIMARY KEY",
                "ALTER TABLE `posts` DROP FOREIGN KEY `posts_user_id_foreign`",
            ]
        );
    }

    #[test]
    fn test_alter_foreign_key_with_actions() {
        let mut bp = Blueprint::alter("posts", BlueprintConfig::new());
        bp.foreign("author_id").unwrap();
        bp.references("id").unwrap();
        bp.on("users").unwrap();
        bp.on_delete(ForeignKeyAction::Cascade).unwrap();

        let sql = bp.to_sql(&grammar()).unwrap();
        assert_eq!(
            sql,
            "ALTER TABLE `posts` ADD CONSTRAINT `posts_author_id_foreign` \
             FOREIGN KEY (`author_id`) REFERENCES `users` (`id`) ON DELETE CASCADE"
        );
    }

    #[test]
    fn test_rename_column_statement() {
        let mut bp = Blueprint::alter("posts", BlueprintConfig::new());
        bp.rename_column("body", "content");
        let sql = bp.to_sql(&grammar()).unwrap();
        assert_eq!(sql, "ALTER TABLE `posts` RENAME COLUMN `body` TO `content`");
    }
}
