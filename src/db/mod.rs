//! Database module
//!
//! Handles SQLite connection and migrations.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};

/// Migrated database in a fresh temporary directory; the directory and the
/// SQLite files in it go away when the returned `TempDir` is dropped
#[cfg(test)]
pub(crate) fn temp_database() -> (tempfile::TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let database = Database::new(dir.path().join("nutrilog.db")).unwrap();
    database.with_conn(migrations::run_migrations).unwrap();
    (dir, database)
}
