//! Dialect-agnostic schema blueprint builder.
//!
//! `tablesaw-blueprint` models table structure changes (columns,
//! constraints, foreign keys, renames, drops) as a fluent, table-scoped
//! builder that accumulates descriptors into a [`ChangeSet`]. The change
//! set is a pure intermediate representation: it leaks no dialect's
//! syntax, and a pluggable [`Grammar`] renders it into DDL for a
//! specific database.
//!
//! # Architecture
//!
//! - **Column descriptors** - typed add/modify/rename/drop operations
//! - **Constraints** - unique/index/fulltext/primary with derived names
//! - **Foreign keys** - staged three-call chain, completed descriptors
//!   only
//! - **Blueprint** - the fluent builder owning one change set per
//!   session
//! - **Grammar** - the dialect rendering contract
//!   (`compile_create` / `compile_alter`)
//!
//! # Example
//!
//! ```rust
//! use tablesaw_blueprint::prelude::*;
//!
//! let changeset = Blueprint::session(
//!     "posts",
//!     TableMode::Create,
//!     BlueprintConfig::new(),
//!     |table| {
//!         table.increments("id");
//!         table.string("title");
//!         table.unsigned("author_id");
//!         table.foreign("author_id")?.references("id")?.on("users")?;
//!         table.timestamps();
//!         Ok(())
//!     },
//! )?;
//!
//! assert_eq!(changeset.foreign_keys[0].index_name, "posts_author_id_foreign");
//! # Ok::<(), tablesaw_blueprint::BlueprintError>(())
//! ```

pub mod blueprint;
pub mod changeset;
pub mod column;
pub mod config;
pub mod constraint;
pub mod error;
pub mod foreign_key;
pub mod grammar;

pub use blueprint::{Blueprint, normalize_foreign_key};
pub use changeset::{ChangeSet, TableMode};
pub use column::{ColumnEntry, ColumnLength, ColumnSpec, ColumnType, DefaultValue};
pub use config::BlueprintConfig;
pub use constraint::{ConstraintDescriptor, ConstraintKind};
pub use error::{BlueprintError, Result};
pub use foreign_key::{ForeignKeyAction, ForeignKeyDescriptor, PendingForeignKey};
pub use grammar::{CompiledDdl, Grammar};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::blueprint::Blueprint;
    pub use crate::changeset::{ChangeSet, TableMode};
    pub use crate::column::{ColumnEntry, ColumnLength, ColumnSpec, ColumnType, DefaultValue};
    pub use crate::config::BlueprintConfig;
    pub use crate::constraint::{ConstraintDescriptor, ConstraintKind};
    pub use crate::error::{BlueprintError, Result};
    pub use crate::foreign_key::{ForeignKeyAction, ForeignKeyDescriptor};
    pub use crate::grammar::{CompiledDdl, Grammar};
}
