//! Service layer orchestrating database mutations with audit.
//!
//! `ShiftService` wraps `ShiftDb` (raw database access), the injected
//! [`Clock`], and the [`PolicyConfig`] windows. Repo reads and the clock,
//! validation, and correction operations are implemented as
//! `impl ShiftService` blocks in their own modules.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use shift_config::{PolicyConfig, ShiftConfig};
use shift_core::clock::{Clock, SystemClock};

use crate::ShiftDb;
use crate::error::DatabaseError;

/// Orchestrates database mutations with audit entries.
///
/// Every mutation method follows this protocol:
/// 1. Read `now` once from the clock
/// 2. Begin an `IMMEDIATE` unit of work
/// 3. Validate and check invariants against current state
/// 4. Execute SQL and append audit entries (inside the transaction)
/// 5. Commit on success, roll back on any error
pub struct ShiftService {
    db: ShiftDb,
    clock: Arc<dyn Clock>,
    policy: PolicyConfig,
}

impl ShiftService {
    /// Create a new service wrapping a local database and the system clock.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str, policy: PolicyConfig) -> Result<Self, DatabaseError> {
        let db = ShiftDb::open_local(db_path).await?;
        Ok(Self::from_db(db, Arc::new(SystemClock), policy))
    }

    /// Create a service from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn from_config(config: &ShiftConfig) -> Result<Self, DatabaseError> {
        Self::new_local(&config.database.path, config.policy.clone()).await
    }

    /// Create from an existing `ShiftDb` and clock (for testing).
    #[must_use]
    pub fn from_db(db: ShiftDb, clock: Arc<dyn Clock>, policy: PolicyConfig) -> Self {
        Self { db, clock, policy }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &ShiftDb {
        &self.db
    }

    /// Access the policy windows.
    #[must_use]
    pub const fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Current time from the injected clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}
