//! Reference grammar implementations for tablesaw blueprints.
//!
//! Each grammar turns the same dialect-agnostic [`ChangeSet`] into the
//! DDL its database expects. The outputs differ textually (quoting,
//! auto-increment spelling, ALTER syntax) but express the same
//! structural operations.
//!
//! [`ChangeSet`]: tablesaw_blueprint::ChangeSet

mod mysql;
mod postgres;

pub use mysql::MysqlGrammar;
pub use postgres::PostgresGrammar;
