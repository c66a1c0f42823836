//! # deck-db
//!
//! libSQL database operations for Sprintdeck state management.
//!
//! Handles all relational state: users, projects, sprints, tasks, bug
//! reports, project reports, and the audit trail. Repository methods live
//! on [`service::DeckService`]; the report worker lives in [`jobs`].

pub mod error;
pub mod helpers;
pub mod jobs;
mod migrations;
pub mod repos;
pub mod service;
pub mod updates;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle for all Sprintdeck state operations.
///
/// Wraps a libSQL database and connection, and provides ID generation.
pub struct DeckDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl DeckDb {
    /// Open a local-only database at the given path.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let deck_db = Self { db, conn };
        deck_db.run_migrations().await?;
        Ok(deck_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"tsk-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn test_db() -> DeckDb {
        DeckDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        let tables = [
            "users",
            "projects",
            "project_members",
            "sprints",
            "tasks",
            "bug_reports",
            "project_reports",
            "audit_trail",
        ];
        for table in &tables {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn generated_ids_are_prefixed_and_unique() {
        let db = test_db().await;
        let mut seen = HashSet::new();
        for _ in 0..50 {
            let id = db.generate_id("tsk").await.unwrap();
            assert!(id.starts_with("tsk-"));
            assert_eq!(id.len(), 12);
            assert!(seen.insert(id), "ids should not repeat");
        }
    }
}
