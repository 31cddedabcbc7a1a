//! # shift-db
//!
//! libSQL database operations for Shift.
//!
//! Holds the relational state (employees, time entries, correction requests,
//! audit log) and the services that mutate it: the clock service, the
//! validation engine, and the correction workflow. Every public mutation runs
//! inside one [`uow::UnitOfWork`] and appends its audit entries in the same
//! transaction.
//!
//! Uses the `libsql` crate (C `SQLite` fork, v0.9.29) for a local embedded
//! database.

pub mod api;
pub mod clocking;
pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod uow;
pub mod updates;
pub mod validation;
pub mod workflow;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use error::DatabaseError;
use libsql::Builder;
use tokio::sync::Mutex;
use uow::UnitOfWork;

/// Central database handle for all Shift state.
///
/// Wraps a libSQL database, its single connection, and the writer lock that
/// keeps units of work on that connection from interleaving.
pub struct ShiftDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    writer: Arc<Mutex<()>>,
}

impl ShiftDb {
    /// Open a local database at the given path (`":memory:"` for tests).
    ///
    /// Runs migrations automatically on open.
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

        let shift_db = Self {
            db,
            conn,
            writer: Arc::new(Mutex::new(())),
        };
        shift_db.run_migrations().await?;
        Ok(shift_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Start a unit of work holding the database write lock.
    ///
    /// Waits until any other open unit of work has committed or rolled back.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the transaction cannot be started.
    pub async fn begin(&self) -> Result<UnitOfWork, DatabaseError> {
        UnitOfWork::begin(&self.conn, Arc::clone(&self.writer)).await
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"ent-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        helpers::generate_id(&self.conn, prefix).await
    }
}
