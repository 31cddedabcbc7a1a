//! Clock service: clock-in, clock-out, quick undo, and status.
//!
//! Each operation reads `now` once, opens one unit of work, validates against
//! the state it reads inside that transaction, and writes exactly one audit
//! entry per mutated entry.

use chrono::{DateTime, Duration, Utc};
use serde_json::{Value, json};
use shift_core::clock::format_timestamp;
use shift_core::entities::TimeEntry;
use shift_core::enums::{AuditAction, AuditTable, ClockAction, EntryStatus, UndoAction};
use shift_core::errors::{Conflict, CoreError};
use shift_core::ids::PREFIX_TIME_ENTRY;
use shift_core::responses::StatusResponse;
use shift_core::validation::{ValidationReport, ValidationWarning};

use crate::error::{DatabaseError, ShiftError};
use crate::helpers::generate_id;
use crate::repos::audit::{self, AuditRecord};
use crate::repos::{employee, entry};
use crate::service::ShiftService;
use crate::updates::entry::{TimeEntryUpdate, TimeEntryUpdateBuilder};
use crate::validation::{ShiftState, assess};

/// Result of a clock-in or clock-out that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum ClockOutcome {
    /// The event was recorded.
    Recorded {
        entry: TimeEntry,
        warnings: Vec<ValidationWarning>,
    },
    /// Validation raised warnings and the caller did not override them.
    /// Nothing was written.
    ConfirmationRequired {
        report: ValidationReport,
        entry_id: Option<String>,
    },
}

/// Result of a successful quick undo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoOutcome {
    pub action: UndoAction,
    pub entry: TimeEntry,
}

/// Reject a clock-path status change the entry state machine does not allow.
fn check_transition(entry: &TimeEntry, next: EntryStatus) -> Result<(), ShiftError> {
    if entry.status.can_transition_to(next) {
        return Ok(());
    }
    if entry.status == EntryStatus::Cancelled {
        return Err(Conflict::EntryCancelled {
            entry_id: entry.id.clone(),
        }
        .into());
    }
    Err(CoreError::InvalidTransition {
        entity_type: "time_entry".into(),
        id: entry.id.clone(),
        from: entry.status.to_string(),
        to: next.to_string(),
    }
    .into())
}

pub(crate) async fn require_employee(
    conn: &libsql::Connection,
    employee_id: &str,
) -> Result<(), ShiftError> {
    if employee::find(conn, employee_id).await?.is_none() {
        return Err(Conflict::EmployeeNotFound {
            employee_id: employee_id.to_string(),
        }
        .into());
    }
    Ok(())
}

/// Apply `update` to `current` and append one audit entry for it.
///
/// `extra` keys are merged into the audit `new_values` snapshot.
pub(crate) async fn update_audited(
    conn: &libsql::Connection,
    current: &TimeEntry,
    update: &TimeEntryUpdate,
    action: AuditAction,
    extra: Option<Value>,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<TimeEntry, DatabaseError> {
    entry::update(conn, &current.id, update, now).await?;

    let mut new_values = update.new_values();
    if let (Value::Object(map), Some(Value::Object(extra))) = (&mut new_values, extra) {
        map.extend(extra);
    }
    audit::record(
        conn,
        AuditRecord {
            table: AuditTable::TimeEntries,
            record_id: &current.id,
            action,
            old_values: Some(update.old_values(current)),
            new_values: Some(new_values),
            user_id,
        },
        now,
    )
    .await?;

    let mut updated = update.project(current);
    updated.updated_at = now;
    Ok(updated)
}

impl ShiftService {
    /// Clock an employee in.
    ///
    /// With `override_warnings`, confirmation warnings are accepted and an
    /// existing open shift is cancelled and superseded by the new one.
    ///
    /// # Errors
    ///
    /// Returns `ShiftError::Conflict` for an unknown employee or an open shift
    /// without override, `ShiftError::Validation` for hard validation errors,
    /// or `ShiftError::Database` on storage failure.
    pub async fn clock_in(
        &self,
        employee_id: &str,
        location: Option<&str>,
        override_warnings: bool,
    ) -> Result<ClockOutcome, ShiftError> {
        let now = self.now();
        let uow = self.db().begin().await?;
        let result = self
            .clock_in_within(&uow, employee_id, location, override_warnings, now)
            .await;
        let outcome = uow.finish(result).await?;

        if let ClockOutcome::Recorded { ref entry, .. } = outcome {
            tracing::info!(employee_id, entry_id = %entry.id, "clocked in");
        }
        Ok(outcome)
    }

    async fn clock_in_within(
        &self,
        conn: &libsql::Connection,
        employee_id: &str,
        location: Option<&str>,
        override_warnings: bool,
        now: DateTime<Utc>,
    ) -> Result<ClockOutcome, ShiftError> {
        require_employee(conn, employee_id).await?;
        let state = ShiftState::load(conn, employee_id).await?;
        let report = assess(self.policy(), &state, ClockAction::ClockIn, now, now);

        if !report.valid {
            return Err(ShiftError::Validation(report.errors));
        }
        if report.requires_confirmation && !override_warnings {
            tracing::debug!(employee_id, warnings = ?report.warning_messages(), "clock-in needs confirmation");
            return Ok(ClockOutcome::ConfirmationRequired {
                entry_id: state.open.map(|e| e.id),
                report,
            });
        }

        let id = generate_id(conn, PREFIX_TIME_ENTRY).await?;

        if let Some(ref stale) = state.open {
            if !override_warnings {
                return Err(Conflict::AlreadyClockedIn {
                    active_entry_id: stale.id.clone(),
                }
                .into());
            }
            check_transition(stale, EntryStatus::Cancelled)?;
            let cancel = TimeEntryUpdateBuilder::new()
                .status(EntryStatus::Cancelled)
                .build();
            update_audited(
                conn,
                stale,
                &cancel,
                AuditAction::Update,
                Some(json!({ "superseded_by": id })),
                employee_id,
                now,
            )
            .await?;
            tracing::debug!(employee_id, stale_entry_id = %stale.id, "superseded open shift");
        }

        let entry = TimeEntry {
            id,
            employee_id: employee_id.to_string(),
            clock_in: Some(now),
            clock_out: None,
            status: EntryStatus::Active,
            location: location.map(String::from),
            notes: None,
            is_correction: false,
            original_entry_id: None,
            created_at: now,
            updated_at: now,
        };
        entry::insert(conn, &entry).await?;
        audit::record(
            conn,
            AuditRecord {
                table: AuditTable::TimeEntries,
                record_id: &entry.id,
                action: AuditAction::Insert,
                old_values: None,
                new_values: Some(json!({
                    "clock_in": format_timestamp(&now),
                    "status": EntryStatus::Active.as_str(),
                    "location": entry.location,
                })),
                user_id: employee_id,
            },
            now,
        )
        .await?;

        Ok(ClockOutcome::Recorded {
            entry,
            warnings: report.warnings,
        })
    }

    /// Clock an employee out of their open shift.
    ///
    /// # Errors
    ///
    /// Returns `ShiftError::Conflict` (`no_active_entry`) without an open
    /// shift, `ShiftError::Validation` for hard validation errors, or
    /// `ShiftError::Database` on storage failure.
    pub async fn clock_out(
        &self,
        employee_id: &str,
        override_warnings: bool,
    ) -> Result<ClockOutcome, ShiftError> {
        let now = self.now();
        let uow = self.db().begin().await?;
        let result = self
            .clock_out_within(&uow, employee_id, override_warnings, now)
            .await;
        let outcome = uow.finish(result).await?;

        if let ClockOutcome::Recorded { ref entry, .. } = outcome {
            tracing::info!(employee_id, entry_id = %entry.id, "clocked out");
        }
        Ok(outcome)
    }

    async fn clock_out_within(
        &self,
        conn: &libsql::Connection,
        employee_id: &str,
        override_warnings: bool,
        now: DateTime<Utc>,
    ) -> Result<ClockOutcome, ShiftError> {
        require_employee(conn, employee_id).await?;
        let state = ShiftState::load(conn, employee_id).await?;
        let report = assess(self.policy(), &state, ClockAction::ClockOut, now, now);

        if !report.valid {
            return Err(ShiftError::Validation(report.errors));
        }
        let Some(ref open) = state.open else {
            return Err(Conflict::NoActiveEntry {
                last_entry_id: state.latest.map(|e| e.id),
            }
            .into());
        };
        if report.requires_confirmation && !override_warnings {
            tracing::debug!(employee_id, warnings = ?report.warning_messages(), "clock-out needs confirmation");
            return Ok(ClockOutcome::ConfirmationRequired {
                entry_id: Some(open.id.clone()),
                report,
            });
        }

        check_transition(open, EntryStatus::Completed)?;
        let close = TimeEntryUpdateBuilder::new()
            .clock_out(Some(now))
            .status(EntryStatus::Completed)
            .build();
        let entry = update_audited(conn, open, &close, AuditAction::Update, None, employee_id, now)
            .await?;

        Ok(ClockOutcome::Recorded {
            entry,
            warnings: report.warnings,
        })
    }

    /// Reverse the last clock action on `entry_id` within the grace window.
    ///
    /// A closed entry is reopened; an open entry is cancelled.
    ///
    /// # Errors
    ///
    /// Returns `ShiftError::Conflict` if the entry is missing, not the
    /// employee's, cancelled, or reopening would create a second open shift;
    /// `ShiftError::GraceWindowExpired` once the window has passed.
    pub async fn quick_undo(
        &self,
        employee_id: &str,
        entry_id: &str,
    ) -> Result<UndoOutcome, ShiftError> {
        let now = self.now();
        let uow = self.db().begin().await?;
        let result = self.quick_undo_within(&uow, employee_id, entry_id, now).await;
        let outcome = uow.finish(result).await?;

        tracing::info!(employee_id, entry_id, action = %outcome.action, "undid clock action");
        Ok(outcome)
    }

    async fn quick_undo_within(
        &self,
        conn: &libsql::Connection,
        employee_id: &str,
        entry_id: &str,
        now: DateTime<Utc>,
    ) -> Result<UndoOutcome, ShiftError> {
        let current = entry::find_owned(conn, entry_id, employee_id)
            .await?
            .ok_or_else(|| Conflict::EntryNotFound {
                entry_id: entry_id.to_string(),
            })?;

        let reopening = current.clock_out.is_some();
        check_transition(
            &current,
            if reopening {
                EntryStatus::Active
            } else {
                EntryStatus::Cancelled
            },
        )?;

        let elapsed = now - current.updated_at;
        if elapsed > Duration::seconds(self.policy().grace_window_i64()) {
            return Err(ShiftError::GraceWindowExpired {
                entry_id: entry_id.to_string(),
                elapsed_secs: elapsed.num_seconds(),
            });
        }

        let (action, update) = if reopening {
            if let Some(other) = entry::open_shift(conn, employee_id).await? {
                return Err(Conflict::AlreadyClockedIn {
                    active_entry_id: other.id,
                }
                .into());
            }
            let reopen = TimeEntryUpdateBuilder::new()
                .clock_out(None)
                .status(EntryStatus::Active)
                .build();
            (UndoAction::ClockOutUndo, reopen)
        } else {
            let cancel = TimeEntryUpdateBuilder::new()
                .status(EntryStatus::Cancelled)
                .build();
            (UndoAction::ClockInCancel, cancel)
        };

        let entry = update_audited(
            conn,
            &current,
            &update,
            AuditAction::Update,
            Some(json!({ "undo": action.as_str() })),
            employee_id,
            now,
        )
        .await?;

        Ok(UndoOutcome { action, entry })
    }

    /// Current clock state of one employee, from their latest entry.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn status(&self, employee_id: &str) -> Result<StatusResponse, DatabaseError> {
        let now = self.now();
        let Some(latest) = entry::latest(self.db().conn(), employee_id).await? else {
            return Ok(StatusResponse::default());
        };

        let grace = Duration::seconds(self.policy().grace_window_i64());
        Ok(StatusResponse {
            clocked_in: latest.is_open(),
            clock_in_time: latest.clock_in,
            can_undo: now - latest.updated_at <= grace,
            entry_id: Some(latest.id),
        })
    }
}
