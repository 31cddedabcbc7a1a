//! Unit of work around one public operation.
//!
//! A `UnitOfWork` owns an `IMMEDIATE` libSQL transaction on the shared
//! connection. SQLite scopes a transaction to its connection, so the unit of
//! work also holds the database's writer lock until it commits or rolls back;
//! a second operation waits in [`UnitOfWork::begin`] instead of joining the
//! open transaction. It derefs to `libsql::Connection`, which lets every repo
//! function run unchanged inside or outside a transaction.

use std::ops::Deref;
use std::sync::Arc;

use libsql::TransactionBehavior;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::DatabaseError;

/// One open transaction. Dropping it without [`UnitOfWork::commit`] rolls back.
pub struct UnitOfWork {
    // Declared before the guard so the transaction ends before the lock is released.
    tx: libsql::Transaction,
    _writer: OwnedMutexGuard<()>,
}

impl UnitOfWork {
    pub(crate) async fn begin(
        conn: &libsql::Connection,
        writer: Arc<Mutex<()>>,
    ) -> Result<Self, DatabaseError> {
        let writer = writer.lock_owned().await;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await?;
        Ok(Self {
            tx,
            _writer: writer,
        })
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the commit fails.
    pub async fn commit(self) -> Result<(), DatabaseError> {
        self.tx.commit().await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the rollback fails.
    pub async fn rollback(self) -> Result<(), DatabaseError> {
        self.tx.rollback().await?;
        Ok(())
    }

    /// Commit when `result` is `Ok`, roll back when it is `Err`.
    ///
    /// A failed commit replaces the `Ok` value with its error. A failed
    /// rollback is logged and the original error is returned.
    ///
    /// # Errors
    ///
    /// Returns the body's error, or the commit error.
    pub async fn finish<T, E>(self, result: Result<T, E>) -> Result<T, E>
    where
        E: From<DatabaseError> + std::fmt::Display,
    {
        match result {
            Ok(value) => {
                self.commit().await?;
                Ok(value)
            }
            Err(error) => {
                tracing::warn!(%error, "rolling back unit of work");
                if let Err(rollback_error) = self.rollback().await {
                    tracing::warn!(error = %rollback_error, "rollback failed");
                }
                Err(error)
            }
        }
    }
}

impl Deref for UnitOfWork {
    type Target = libsql::Connection;

    fn deref(&self) -> &Self::Target {
        &self.tx
    }
}
