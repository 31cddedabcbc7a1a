//! Cross-cutting error types for Shift.
//!
//! `CoreError` covers domain values that fail to parse or validate.
//! `Conflict` is the closed set of invariant violations a mutation can run
//! into; each variant carries a machine-readable code and, where one exists,
//! a correction handle the caller can use to file a correction instead.
//! Storage and workflow errors live in `shift-db`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can be raised by any Shift crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A state machine transition was attempted that is not allowed.
    #[error("Invalid state transition: {entity_type} {id} from {from} to {to}")]
    InvalidTransition {
        entity_type: String,
        id: String,
        from: String,
        to: String,
    },

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// An invariant violation detected before mutating state.
#[derive(Debug, Clone, Error, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Conflict {
    /// The employee already has an open shift.
    #[error("Already clocked in (open entry {active_entry_id})")]
    AlreadyClockedIn { active_entry_id: String },

    /// Clock-out without an open shift.
    #[error("No active clock-in found")]
    NoActiveEntry { last_entry_id: Option<String> },

    /// The entry already has a correction waiting for review.
    #[error("Pending correction already exists for entry {time_entry_id}")]
    PendingCorrectionExists {
        time_entry_id: String,
        correction_id: String,
    },

    /// The entry does not exist or belongs to someone else.
    #[error("Time entry not found or access denied: {entry_id}")]
    EntryNotFound { entry_id: String },

    /// The entry was cancelled and can no longer be undone.
    #[error("Time entry {entry_id} is cancelled")]
    EntryCancelled { entry_id: String },

    /// No pending correction with this id.
    #[error("Correction request not found or already processed: {correction_id}")]
    CorrectionNotFound { correction_id: String },

    /// The employee id does not resolve.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound { employee_id: String },
}

impl Conflict {
    /// Machine-readable reason code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::AlreadyClockedIn { .. } => "already_clocked_in",
            Self::NoActiveEntry { .. } => "no_active_entry",
            Self::PendingCorrectionExists { .. } => "pending_correction_exists",
            Self::EntryNotFound { .. } => "entry_not_found",
            Self::EntryCancelled { .. } => "entry_cancelled",
            Self::CorrectionNotFound { .. } => "correction_not_found",
            Self::EmployeeNotFound { .. } => "employee_not_found",
        }
    }

    /// Identifier the caller can use to start a correction instead of
    /// retrying the direct mutation.
    #[must_use]
    pub fn correction_handle(&self) -> Option<&str> {
        match self {
            Self::AlreadyClockedIn { active_entry_id } => Some(active_entry_id),
            Self::NoActiveEntry { last_entry_id } => last_entry_id.as_deref(),
            Self::PendingCorrectionExists { correction_id, .. } => Some(correction_id),
            Self::EntryNotFound { .. }
            | Self::EntryCancelled { .. }
            | Self::CorrectionNotFound { .. }
            | Self::EmployeeNotFound { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correction_handles() {
        let conflict = Conflict::AlreadyClockedIn {
            active_entry_id: "ent-1".into(),
        };
        assert_eq!(conflict.correction_handle(), Some("ent-1"));
        assert_eq!(conflict.code(), "already_clocked_in");

        let conflict = Conflict::NoActiveEntry { last_entry_id: None };
        assert_eq!(conflict.correction_handle(), None);

        let conflict = Conflict::CorrectionNotFound {
            correction_id: "cor-1".into(),
        };
        assert!(conflict.to_string().contains("already processed"));
    }

    #[test]
    fn conflict_serializes_tagged() {
        let conflict = Conflict::PendingCorrectionExists {
            time_entry_id: "ent-1".into(),
            correction_id: "cor-1".into(),
        };
        let json = serde_json::to_value(&conflict).unwrap();
        assert_eq!(json["kind"], "pending_correction_exists");
        assert_eq!(json["correction_id"], "cor-1");
    }
}
