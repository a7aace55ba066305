//! The fluent table blueprint.
//!
//! A blueprint session is scoped to one table and one mode (create or
//! alter). Column factories append descriptors to the change set and move
//! the focus; refinement calls act on the focused descriptor only.
//! Finishing the session yields the change set, which a [`Grammar`]
//! renders into dialect DDL.

use tracing::debug;

use crate::changeset::{ChangeSet, TableMode};
use crate::column::{ColumnEntry, ColumnLength, ColumnSpec, ColumnType, DefaultValue};
use crate::config::BlueprintConfig;
use crate::constraint::{ConstraintDescriptor, ConstraintKind};
use crate::error::{BlueprintError, Result};
use crate::foreign_key::{ForeignKeyAction, PendingForeignKey};
use crate::grammar::Grammar;

/// Built-in default length for string columns.
pub const DEFAULT_STRING_LENGTH: u32 = 255;

/// Built-in default display width for integer columns.
pub const DEFAULT_INTEGER_LENGTH: u32 = 11;

/// Fluent builder accumulating schema operations for one table.
///
/// The builder owns its change set exclusively for the whole session;
/// nothing is shared across tables or sessions except the read-only
/// [`BlueprintConfig`].
///
/// # Example
///
/// ```rust
/// use tablesaw_blueprint::{Blueprint, BlueprintConfig};
///
/// let mut table = Blueprint::create("users", BlueprintConfig::new());
/// table.increments("id");
/// table.string("email");
/// table.unique()?;
/// table.timestamps();
///
/// let changeset = table.finish()?;
/// assert_eq!(changeset.columns.len(), 4);
/// # Ok::<(), tablesaw_blueprint::BlueprintError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Blueprint {
    changeset: ChangeSet,
    config: BlueprintConfig,
    /// Index of the most recently declared refinable column, if any.
    focus: Option<usize>,
    pending_fk: Option<PendingForeignKey>,
}

impl Blueprint {
    /// Opens a create-mode session for the given table.
    #[must_use]
    pub fn create(table: impl Into<String>, config: BlueprintConfig) -> Self {
        Self::new(table, TableMode::Create, config)
    }

    /// Opens an alter-mode session for the given table.
    #[must_use]
    pub fn alter(table: impl Into<String>, config: BlueprintConfig) -> Self {
        Self::new(table, TableMode::Alter, config)
    }

    fn new(table: impl Into<String>, mode: TableMode, config: BlueprintConfig) -> Self {
        Self {
            changeset: ChangeSet::new(table, mode),
            config,
            focus: None,
            pending_fk: None,
        }
    }

    /// Runs a bracketed builder session and returns the finished change
    /// set. Exit performs no release work; the change set holds no
    /// external resource.
    ///
    /// # Errors
    ///
    /// Propagates any builder error raised inside the closure, and the
    /// validation errors of [`Blueprint::finish`].
    pub fn session<F>(
        table: impl Into<String>,
        mode: TableMode,
        config: BlueprintConfig,
        build: F,
    ) -> Result<ChangeSet>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let mut blueprint = Self::new(table, mode, config);
        build(&mut blueprint)?;
        blueprint.finish()
    }

    /// Returns the table this session is scoped to.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.changeset.table
    }

    /// Returns the session mode.
    #[must_use]
    pub fn mode(&self) -> TableMode {
        self.changeset.mode
    }

    /// Returns a view of the accumulated change set.
    #[must_use]
    pub fn changeset(&self) -> &ChangeSet {
        &self.changeset
    }

    // -------------------------------------------------------------------
    // Column factories
    // -------------------------------------------------------------------

    fn push_spec(&mut self, spec: ColumnSpec) -> &mut Self {
        self.changeset.columns.push(ColumnEntry::AddColumn(spec));
        self.focus = Some(self.changeset.columns.len() - 1);
        self
    }

    /// Declares a string column using the configured default length
    /// (falling back to 255).
    pub fn string(&mut self, name: impl Into<String>) -> &mut Self {
        let length = self
            .config
            .default_string_length
            .unwrap_or(DEFAULT_STRING_LENGTH);
        self.string_len(name, length)
    }

    /// Declares a string column with an explicit length.
    pub fn string_len(&mut self, name: impl Into<String>, length: u32) -> &mut Self {
        self.push_spec(ColumnSpec::new(
            ColumnType::String,
            name,
            Some(ColumnLength::Fixed(length)),
            false,
        ))
    }

    /// Declares a fixed-length character column.
    pub fn char(&mut self, name: impl Into<String>, length: u32) -> &mut Self {
        self.push_spec(ColumnSpec::new(
            ColumnType::Char,
            name,
            Some(ColumnLength::Fixed(length)),
            false,
        ))
    }

    /// Declares an unbounded text column.
    pub fn text(&mut self, name: impl Into<String>) -> &mut Self {
        self.push_spec(ColumnSpec::new(ColumnType::Text, name, None, false))
    }

    /// Declares an integer column with the default display width.
    pub fn integer(&mut self, name: impl Into<String>) -> &mut Self {
        self.integer_len(name, DEFAULT_INTEGER_LENGTH)
    }

    /// Declares an integer column with an explicit display width.
    pub fn integer_len(&mut self, name: impl Into<String>, length: u32) -> &mut Self {
        self.push_spec(ColumnSpec::new(
            ColumnType::Integer,
            name,
            Some(ColumnLength::Fixed(length)),
            false,
        ))
    }

    /// Declares an auto-incrementing integer primary key column.
    pub fn increments(&mut self, name: impl Into<String>) -> &mut Self {
        self.push_spec(ColumnSpec::new(ColumnType::Increments, name, None, false))
    }

    /// Declares an unsigned integer column.
    pub fn unsigned(&mut self, name: impl Into<String>) -> &mut Self {
        self.push_spec(ColumnSpec::new(ColumnType::Unsigned, name, None, false))
    }

    /// Declares a binary column.
    pub fn binary(&mut self, name: impl Into<String>) -> &mut Self {
        self.push_spec(ColumnSpec::new(ColumnType::Binary, name, None, false))
    }

    /// Declares a boolean column.
    pub fn boolean(&mut self, name: impl Into<String>) -> &mut Self {
        self.push_spec(ColumnSpec::new(ColumnType::Boolean, name, None, false))
    }

    /// Declares a date column.
    pub fn date(&mut self, name: impl Into<String>) -> &mut Self {
        self.push_spec(ColumnSpec::new(ColumnType::Date, name, None, false))
    }

    /// Declares a datetime column.
    pub fn datetime(&mut self, name: impl Into<String>) -> &mut Self {
        self.push_spec(ColumnSpec::new(ColumnType::DateTime, name, None, false))
    }

    /// Declares a timestamp column.
    pub fn timestamp(&mut self, name: impl Into<String>) -> &mut Self {
        self.push_spec(ColumnSpec::new(ColumnType::Timestamp, name, None, false))
    }

    /// Declares the conventional `created_at` / `updated_at` pair.
    ///
    /// Both columns are NOT NULL timestamps defaulting to the current
    /// timestamp, inserted in that order; the focus is left on
    /// `updated_at`.
    pub fn timestamps(&mut self) -> &mut Self {
        for name in ["created_at", "updated_at"] {
            let mut spec = ColumnSpec::new(ColumnType::Timestamp, name, None, false);
            spec.default = Some(DefaultValue::CurrentTimestamp);
            self.push_spec(spec);
        }
        self
    }

    /// Declares a decimal column; length and scale are combined into a
    /// single precision specifier.
    pub fn decimal(&mut self, name: impl Into<String>, length: u32, scale: u32) -> &mut Self {
        self.push_spec(ColumnSpec::new(
            ColumnType::Decimal,
            name,
            Some(ColumnLength::Precision { length, scale }),
            false,
        ))
    }

    /// Declares an enum column over the given option set.
    ///
    /// An empty option set is legal and is carried through to the grammar
    /// as an empty literal set.
    pub fn enumeration(&mut self, name: impl Into<String>, options: &[&str]) -> &mut Self {
        let options = options.iter().map(|&o| o.to_string()).collect();
        self.push_spec(ColumnSpec::new(
            ColumnType::Enum,
            name,
            Some(ColumnLength::Set(options)),
            false,
        ))
    }

    // -------------------------------------------------------------------
    // Refinements on the focused column
    // -------------------------------------------------------------------

    fn misuse(&self, operation: &'static str) -> BlueprintError {
        BlueprintError::InvalidBuilderState {
            table: self.changeset.table.clone(),
            operation,
        }
    }

    fn focused_spec(&mut self, operation: &'static str) -> Result<&mut ColumnSpec> {
        let index = self.focus.ok_or_else(|| self.misuse(operation))?;
        self.changeset.columns[index]
            .spec_mut()
            .ok_or(BlueprintError::AmbiguousFocus)
    }

    /// Marks the focused column as nullable.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::InvalidBuilderState`] when no column has
    /// been declared yet.
    pub fn nullable(&mut self) -> Result<&mut Self> {
        self.focused_spec("nullable")?.nullable = true;
        Ok(self)
    }

    /// Marks the focused column as NOT NULL.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::InvalidBuilderState`] when no column has
    /// been declared yet.
    pub fn not_nullable(&mut self) -> Result<&mut Self> {
        self.focused_spec("not_nullable")?.nullable = false;
        Ok(self)
    }

    /// Sets the focused column's default value.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::InvalidBuilderState`] when no column has
    /// been declared yet.
    pub fn default(&mut self, value: impl Into<DefaultValue>) -> Result<&mut Self> {
        self.focused_spec("default")?.default = Some(value.into());
        Ok(self)
    }

    /// Defaults the focused column to the current timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::InvalidBuilderState`] when no column has
    /// been declared yet.
    pub fn use_current(&mut self) -> Result<&mut Self> {
        self.focused_spec("use_current")?.default = Some(DefaultValue::CurrentTimestamp);
        Ok(self)
    }

    /// Records the prior name of the focused column, layering a rename
    /// onto its declaration.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::InvalidBuilderState`] when no column has
    /// been declared yet.
    pub fn rename_from(&mut self, old_name: impl Into<String>) -> Result<&mut Self> {
        self.focused_spec("rename_from")?.rename_from = Some(old_name.into());
        Ok(self)
    }

    /// Records a physical-ordering hint: place the focused column after
    /// the named one. Grammars without column ordering ignore the hint.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::InvalidBuilderState`] when no column has
    /// been declared yet.
    pub fn after(&mut self, column: impl Into<String>) -> Result<&mut Self> {
        self.focused_spec("after")?.after = Some(column.into());
        Ok(self)
    }

    /// Flips the focused column from an add to a modify operation
    /// (ALTER ... MODIFY semantics).
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::InvalidBuilderState`] when no column has
    /// been declared yet.
    pub fn change(&mut self) -> Result<&mut Self> {
        let index = self.focus.ok_or_else(|| self.misuse("change"))?;
        let entry = &mut self.changeset.columns[index];
        if let ColumnEntry::AddColumn(spec) = entry {
            *entry = ColumnEntry::ModifyColumn(spec.clone());
        }
        Ok(self)
    }

    // -------------------------------------------------------------------
    // Constraints
    // -------------------------------------------------------------------

    /// Adds a unique constraint keyed to the focused column's name.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::InvalidBuilderState`] when no column has
    /// been declared yet.
    pub fn unique(&mut self) -> Result<&mut Self> {
        let column = self.focused_spec("unique")?.name.clone();
        self.changeset
            .constraints
            .push(ConstraintDescriptor::single(column, ConstraintKind::Unique));
        Ok(self)
    }

    /// Adds a unique constraint over the given columns.
    pub fn unique_on(&mut self, columns: &[&str]) -> &mut Self {
        self.constraint(columns, ConstraintKind::Unique)
    }

    /// Adds an index over the given columns.
    pub fn index(&mut self, columns: &[&str]) -> &mut Self {
        self.constraint(columns, ConstraintKind::Index)
    }

    /// Adds a full-text index over the given columns.
    pub fn fulltext(&mut self, columns: &[&str]) -> &mut Self {
        self.constraint(columns, ConstraintKind::Fulltext)
    }

    /// Adds a primary key over the given columns.
    pub fn primary(&mut self, columns: &[&str]) -> &mut Self {
        self.constraint(columns, ConstraintKind::Primary)
    }

    fn constraint(&mut self, columns: &[&str], kind: ConstraintKind) -> &mut Self {
        let columns = columns.iter().map(|&c| c.to_string()).collect();
        self.changeset
            .constraints
            .push(ConstraintDescriptor::new(columns, kind));
        self
    }

    // -------------------------------------------------------------------
    // Foreign keys
    // -------------------------------------------------------------------

    /// Opens a foreign key chain from the given local column.
    ///
    /// The descriptor stays pending until `on()` completes it; only then
    /// does it enter the change set.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::IncompleteForeignKey`] when a previous
    /// chain was left open.
    pub fn foreign(&mut self, column: impl Into<String>) -> Result<&mut Self> {
        if let Some(pending) = &self.pending_fk {
            return Err(BlueprintError::IncompleteForeignKey {
                table: self.changeset.table.clone(),
                column: pending.column().to_string(),
                missing: "table",
            });
        }
        self.pending_fk = Some(PendingForeignKey::new(column));
        Ok(self)
    }

    /// Records the referenced column of the pending foreign key.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::InvalidBuilderState`] when no chain is
    /// open.
    pub fn references(&mut self, column: impl Into<String>) -> Result<&mut Self> {
        let pending = self
            .pending_fk
            .take()
            .ok_or_else(|| self.misuse("references"))?;
        self.pending_fk = Some(pending.references(column));
        Ok(self)
    }

    /// Completes the pending foreign key against the given table and
    /// appends it to the change set.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::InvalidBuilderState`] when no chain is
    /// open, or [`BlueprintError::IncompleteForeignKey`] when
    /// `references()` was skipped.
    pub fn on(&mut self, table: impl Into<String>) -> Result<&mut Self> {
        let pending = self.pending_fk.take().ok_or_else(|| self.misuse("on"))?;
        let fk = pending.complete(&self.changeset.table, table)?;
        self.changeset.foreign_keys.push(fk);
        Ok(self)
    }

    /// Sets the ON DELETE action of the foreign key under construction,
    /// whether it is still pending or was just completed by `on()`.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::InvalidBuilderState`] when no foreign
    /// key has been declared.
    pub fn on_delete(&mut self, action: ForeignKeyAction) -> Result<&mut Self> {
        if let Some(pending) = &mut self.pending_fk {
            pending.set_on_delete(action);
        } else if let Some(last) = self.changeset.foreign_keys.last_mut() {
            last.on_delete = action;
        } else {
            return Err(self.misuse("on_delete"));
        }
        Ok(self)
    }

    /// Sets the ON UPDATE action of the foreign key under construction,
    /// whether it is still pending or was just completed by `on()`.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::InvalidBuilderState`] when no foreign
    /// key has been declared.
    pub fn on_update(&mut self, action: ForeignKeyAction) -> Result<&mut Self> {
        if let Some(pending) = &mut self.pending_fk {
            pending.set_on_update(action);
        } else if let Some(last) = self.changeset.foreign_keys.last_mut() {
            last.on_update = action;
        } else {
            return Err(self.misuse("on_update"));
        }
        Ok(self)
    }

    // -------------------------------------------------------------------
    // Drops and renames
    // -------------------------------------------------------------------

    fn push_drop(&mut self, entry: ColumnEntry) {
        self.changeset.columns.push(entry);
        // Drop entries are not refinable; a stale focus would let a
        // refinement land on the wrong declaration.
        self.focus = None;
    }

    /// Drops the given columns.
    pub fn drop_column(&mut self, columns: &[&str]) -> &mut Self {
        for &column in columns {
            self.push_drop(ColumnEntry::DropColumn {
                name: column.to_string(),
            });
        }
        self
    }

    /// Drops the given named indexes.
    pub fn drop_index(&mut self, indexes: &[&str]) -> &mut Self {
        for &index in indexes {
            self.push_drop(ColumnEntry::DropIndex {
                name: index.to_string(),
            });
        }
        self
    }

    /// Drops the given named unique constraints.
    pub fn drop_unique(&mut self, indexes: &[&str]) -> &mut Self {
        for &index in indexes {
            self.push_drop(ColumnEntry::DropUnique {
                name: index.to_string(),
            });
        }
        self
    }

    /// Drops the table's primary key.
    pub fn drop_primary(&mut self) -> &mut Self {
        self.push_drop(ColumnEntry::DropPrimary);
        self
    }

    /// Drops the given foreign keys, normalizing each key to its
    /// canonical `{table}_{column}_foreign` name first.
    pub fn drop_foreign(&mut self, keys: &[&str]) -> &mut Self {
        for &key in keys {
            let name = normalize_foreign_key(&self.changeset.table, key);
            if name != key {
                debug!(table = %self.changeset.table, key, canonical = %name, "normalized foreign key name");
            }
            self.push_drop(ColumnEntry::DropForeign { name });
        }
        self
    }

    /// Renames a column in place, preserving its existing definition.
    pub fn rename_column(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.push_drop(ColumnEntry::RenameColumn {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    // -------------------------------------------------------------------
    // Finalization
    // -------------------------------------------------------------------

    fn check_pending_fk(&self) -> Result<()> {
        match &self.pending_fk {
            None => Ok(()),
            Some(pending) => {
                let missing = match pending {
                    PendingForeignKey::ColumnSet { .. } => "column",
                    PendingForeignKey::ReferencesSet { .. } => "table",
                };
                Err(BlueprintError::IncompleteForeignKey {
                    table: self.changeset.table.clone(),
                    column: pending.column().to_string(),
                    missing,
                })
            }
        }
    }

    /// Validates the session and returns the owned change set.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::IncompleteForeignKey`] when a foreign
    /// key chain was left open.
    pub fn finish(self) -> Result<ChangeSet> {
        self.check_pending_fk()?;
        Ok(self.changeset)
    }

    /// Renders the accumulated change set through the given grammar.
    ///
    /// Dispatches to `compile_create` or `compile_alter` based on the
    /// session mode. Rendering is all-or-nothing: no DDL is returned for
    /// a session that fails validation.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::IncompleteForeignKey`] for a dangling
    /// foreign key chain, plus any error raised by the grammar.
    pub fn to_sql(&self, grammar: &dyn Grammar) -> Result<String> {
        self.check_pending_fk()?;
        debug!(
            table = %self.changeset.table,
            grammar = grammar.name(),
            operations = self.changeset.columns.len(),
            "compiling change set"
        );
        let compiled = match self.changeset.mode {
            TableMode::Create => grammar.compile_create(&self.changeset)?,
            TableMode::Alter => grammar.compile_alter(&self.changeset)?,
        };
        Ok(compiled.to_sql())
    }
}

/// Canonicalizes a foreign key name for drops: prepends the table name
/// unless already present, appends `_foreign` unless already present.
/// Applying the normalization twice yields the same name as applying it
/// once.
#[must_use]
pub fn normalize_foreign_key(table: &str, key: &str) -> String {
    let mut name = key.to_string();
    if !name.starts_with(table) {
        name = format!("{table}_{name}");
    }
    if !name.ends_with("_foreign") {
        name = format!("{name}_foreign");
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blueprint(mode: TableMode) -> Blueprint {
        Blueprint::new("posts", mode, BlueprintConfig::new())
    }

    #[test]
    fn test_column_list_preserves_call_order() {
        let mut bp = blueprint(TableMode::Create);
        bp.increments("id");
        bp.string("title");
        bp.boolean("published");

        let names: Vec<&str> = bp
            .changeset()
            .column_specs()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["id", "title", "published"]);
    }

    #[test]
    fn test_string_uses_configured_default_length() {
        let config = BlueprintConfig::new().default_string_length(191);
        let mut bp = Blueprint::create("users", config);
        bp.string("email");

        let spec = bp.changeset().column_specs().next().unwrap();
        assert_eq!(spec.length, Some(ColumnLength::Fixed(191)));
    }

    #[test]
    fn test_string_falls_back_to_255() {
        let mut bp = blueprint(TableMode::Create);
        bp.string("title");
        let spec = bp.changeset().column_specs().next().unwrap();
        assert_eq!(spec.length, Some(ColumnLength::Fixed(255)));
    }

    #[test]
    fn test_explicit_length_beats_config() {
        let config = BlueprintConfig::new().default_string_length(191);
        let mut bp = Blueprint::create("users", config);
        bp.string_len("token", 64);
        let spec = bp.changeset().column_specs().next().unwrap();
        assert_eq!(spec.length, Some(ColumnLength::Fixed(64)));
    }

    #[test]
    fn test_refinement_targets_most_recent_column() {
        let mut bp = blueprint(TableMode::Create);
        bp.string("a");
        bp.string("b");
        bp.nullable().unwrap();

        let specs: Vec<_> = bp.changeset().column_specs().collect();
        assert!(!specs[0].nullable);
        assert!(specs[1].nullable);
    }

    #[test]
    fn test_refinement_without_column_fails() {
        let mut bp = blueprint(TableMode::Alter);
        let err = bp.nullable().unwrap_err();
        assert!(matches!(err, BlueprintError::InvalidBuilderState { .. }));
    }

    #[test]
    fn test_timestamps_emits_pair_with_current_default() {
        let mut bp = blueprint(TableMode::Create);
        bp.string("title");
        bp.timestamps();

        let specs: Vec<_> = bp.changeset().column_specs().collect();
        assert_eq!(specs.len(), 3);
        assert_eq!(specs[1].name, "created_at");
        assert_eq!(specs[2].name, "updated_at");
        for spec in &specs[1..] {
            assert_eq!(spec.column_type, ColumnType::Timestamp);
            assert!(!spec.nullable);
            assert_eq!(spec.default, Some(DefaultValue::CurrentTimestamp));
        }

        // Focus ends on updated_at.
        bp.nullable().unwrap();
        let specs: Vec<_> = bp.changeset().column_specs().collect();
        assert!(specs[2].nullable);
        assert!(!specs[1].nullable);
    }

    #[test]
    fn test_decimal_combines_length_and_scale() {
        let mut bp = blueprint(TableMode::Create);
        bp.decimal("price", 17, 6);
        let spec = bp.changeset().column_specs().next().unwrap();
        assert_eq!(
            spec.length.as_ref().unwrap().to_string(),
            "17, 6"
        );
    }

    #[test]
    fn test_empty_enum_is_legal() {
        let mut bp = blueprint(TableMode::Create);
        bp.enumeration("status", &[]);
        let spec = bp.changeset().column_specs().next().unwrap();
        assert_eq!(spec.length, Some(ColumnLength::Set(Vec::new())));
        assert_eq!(spec.length.as_ref().unwrap().to_string(), "");
    }

    #[test]
    fn test_unique_derives_column_from_focus() {
        let mut bp = blueprint(TableMode::Create);
        bp.string("email");
        bp.unique().unwrap();

        let constraint = &bp.changeset().constraints[0];
        assert_eq!(constraint.columns, vec!["email"]);
        assert_eq!(constraint.index_name, "email_unique");
    }

    #[test]
    fn test_change_flips_add_to_modify() {
        let mut bp = blueprint(TableMode::Alter);
        bp.string("name");
        bp.change().unwrap();

        assert!(matches!(
            bp.changeset().columns[0],
            ColumnEntry::ModifyColumn(_)
        ));
    }

    #[test]
    fn test_incomplete_fk_never_enters_change_set() {
        let mut bp = blueprint(TableMode::Alter);
        bp.unsigned("author_id");
        bp.foreign("author_id").unwrap();
        bp.references("id").unwrap();

        assert!(bp.changeset().foreign_keys.is_empty());
        let err = bp.finish().unwrap_err();
        assert!(matches!(err, BlueprintError::IncompleteForeignKey { .. }));
    }

    #[test]
    fn test_fk_action_after_on_mutates_completed_descriptor() {
        let mut bp = blueprint(TableMode::Alter);
        bp.foreign("author_id").unwrap();
        bp.references("id").unwrap();
        bp.on("users").unwrap();
        bp.on_delete(ForeignKeyAction::Cascade).unwrap();

        let fk = &bp.changeset().foreign_keys[0];
        assert_eq!(fk.index_name, "posts_author_id_foreign");
        assert_eq!(fk.on_delete, ForeignKeyAction::Cascade);
    }

    #[test]
    fn test_fk_action_before_on_is_kept() {
        let mut bp = blueprint(TableMode::Alter);
        bp.foreign("author_id").unwrap();
        bp.on_update(ForeignKeyAction::SetNull).unwrap();
        bp.references("id").unwrap();
        bp.on("users").unwrap();

        assert_eq!(
            bp.changeset().foreign_keys[0].on_update,
            ForeignKeyAction::SetNull
        );
    }

    #[test]
    fn test_on_before_references_fails_fast() {
        let mut bp = blueprint(TableMode::Alter);
        bp.foreign("author_id").unwrap();
        let err = bp.on("users").unwrap_err();
        assert!(matches!(err, BlueprintError::IncompleteForeignKey { .. }));
    }

    #[test]
    fn test_drop_foreign_normalizes_keys() {
        let mut bp = blueprint(TableMode::Alter);
        bp.drop_foreign(&["user_id", "posts_author_id_foreign"]);

        let names: Vec<&str> = bp
            .changeset()
            .columns
            .iter()
            .filter_map(|entry| match entry {
                ColumnEntry::DropForeign { name } => Some(name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["posts_user_id_foreign", "posts_author_id_foreign"]);
    }

    #[test]
    fn test_foreign_key_normalization_is_idempotent() {
        let once = normalize_foreign_key("posts", "user_id");
        let twice = normalize_foreign_key("posts", &once);
        assert_eq!(once, "posts_user_id_foreign");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_drop_clears_focus() {
        let mut bp = blueprint(TableMode::Alter);
        bp.string("title");
        bp.drop_column(&["slug"]);

        let err = bp.nullable().unwrap_err();
        assert!(matches!(err, BlueprintError::InvalidBuilderState { .. }));
    }

    #[test]
    fn test_focus_is_never_ambiguous() {
        // Interleave adds, drops, constraints, and foreign keys; every
        // refinement either lands on the single most recent add or fails
        // as a builder-state misuse. AmbiguousFocus has no reachable path.
        let mut bp = blueprint(TableMode::Alter);
        bp.string("a");
        bp.drop_column(&["old"]);
        assert!(matches!(
            bp.nullable().unwrap_err(),
            BlueprintError::InvalidBuilderState { .. }
        ));

        bp.string("b");
        bp.index(&["a", "b"]);
        bp.nullable().unwrap();
        let specs: Vec<_> = bp.changeset().column_specs().collect();
        assert!(!specs[0].nullable);
        assert!(specs[1].nullable);
    }

    #[test]
    fn test_session_returns_change_set() {
        let changeset = Blueprint::session(
            "users",
            TableMode::Create,
            BlueprintConfig::new(),
            |table| {
                table.increments("id");
                table.string("email");
                table.unique()?;
                Ok(())
            },
        )
        .unwrap();

        assert_eq!(changeset.columns.len(), 2);
        assert_eq!(changeset.constraints.len(), 1);
    }

    #[test]
    fn test_rename_column_entry() {
        let mut bp = blueprint(TableMode::Alter);
        bp.rename_column("body", "content");
        assert_eq!(
            bp.changeset().columns[0],
            ColumnEntry::RenameColumn {
                from: "body".to_string(),
                to: "content".to_string()
            }
        );
    }
}
