//! Error types for shift-db.
//!
//! `DatabaseError` is raised by storage access. `ShiftError` is what the
//! clock service and correction workflow return: it wraps storage errors and
//! adds the domain failures a caller can act on.

use shift_core::errors::{Conflict, CoreError};
use shift_core::validation::ValidationError;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors from Shift operations.
#[derive(Debug, Error)]
pub enum ShiftError {
    /// The clock event or correction input failed hard validation.
    #[error("Validation failed: {}", join_messages(.0))]
    Validation(Vec<ValidationError>),

    /// An invariant would be violated.
    #[error(transparent)]
    Conflict(#[from] Conflict),

    /// The caller lacks the privilege for this operation.
    #[error("Permission denied: {0}")]
    Permission(String),

    /// An approved correction could not be applied to its entry.
    #[error("Failed to apply correction {correction_id}: {reason}")]
    ApplicationFailure {
        correction_id: String,
        reason: String,
    },

    /// Quick undo was attempted after the grace window closed.
    #[error("Grace period expired for entry {entry_id} ({elapsed_secs}s since last update)")]
    GraceWindowExpired { entry_id: String, elapsed_secs: i64 },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl ShiftError {
    /// Machine-readable reason code for result objects.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Validation(errors) => errors
                .first()
                .map_or("validation_failed", ValidationError::code),
            Self::Conflict(conflict) => conflict.code(),
            Self::Permission(_) => "permission_denied",
            Self::ApplicationFailure { .. } => "application_failure",
            Self::GraceWindowExpired { .. } => "grace_period_expired",
            Self::Core(CoreError::InvalidTransition { .. }) => "invalid_transition",
            Self::Core(CoreError::Validation(_)) => "invalid_input",
            Self::Core(CoreError::Other(_)) => "internal_error",
            Self::Database(_) => "storage_error",
        }
    }

    /// Correction handle carried by a conflict, if any.
    #[must_use]
    pub fn correction_handle(&self) -> Option<&str> {
        match self {
            Self::Conflict(conflict) => conflict.correction_handle(),
            _ => None,
        }
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
