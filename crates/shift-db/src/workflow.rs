//! Correction workflow and admin override.
//!
//! A correction request moves `pending -> approved | rejected` exactly once,
//! or is created `approved` when it qualifies for auto-approval. Approval and
//! application to the time entry share one unit of work: if the change cannot
//! be applied, the approval is rolled back with it and the request stays
//! pending.

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use shift_core::clock::format_timestamp;
use shift_core::entities::{CorrectionRequest, TimeEntry};
use shift_core::enums::{
    AuditAction, AuditTable, CorrectionDisposition, CorrectionStatus, CorrectionType, EntryStatus,
    OverridableField,
};
use shift_core::errors::{Conflict, CoreError};
use shift_core::ids::{PREFIX_CORRECTION, PREFIX_TIME_ENTRY};
use shift_core::overrides::FieldOverride;
use shift_core::validation::ValidationError;

use crate::clocking::update_audited;
use crate::error::ShiftError;
use crate::helpers::{generate_id, timestamp_json};
use crate::repos::audit::{self, AuditRecord};
use crate::repos::{correction, employee, entry};
use crate::service::ShiftService;
use crate::updates::entry::{TimeEntryUpdate, TimeEntryUpdateBuilder};

/// What an employee asks to change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionInput {
    pub correction_type: CorrectionType,
    pub requested_time: Option<DateTime<Utc>>,
    pub original_time: Option<DateTime<Utc>>,
    pub reason: String,
}

impl CorrectionInput {
    #[must_use]
    pub fn new(correction_type: CorrectionType, reason: impl Into<String>) -> Self {
        Self {
            correction_type,
            requested_time: None,
            original_time: None,
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn requested(mut self, at: DateTime<Utc>) -> Self {
        self.requested_time = Some(at);
        self
    }

    #[must_use]
    pub fn original(mut self, at: DateTime<Utc>) -> Self {
        self.original_time = Some(at);
        self
    }

    fn check(&self, now: DateTime<Utc>) -> Result<(), ShiftError> {
        let kind = self.correction_type;
        if kind.requires_requested_time() && self.requested_time.is_none() {
            return Err(CoreError::Validation(format!(
                "requested_time is required for {kind} corrections"
            ))
            .into());
        }
        if kind == CorrectionType::Manual {
            match (self.requested_time, self.original_time) {
                (Some(start), Some(end)) if end < start => {
                    return Err(CoreError::Validation(
                        "manual correction must end (original_time) after it starts (requested_time)"
                            .into(),
                    )
                    .into());
                }
                (_, None) => {
                    return Err(CoreError::Validation(
                        "original_time is required for manual corrections".into(),
                    )
                    .into());
                }
                _ => {}
            }
        }

        let in_future = [self.requested_time, self.original_time]
            .into_iter()
            .flatten()
            .any(|ts| ts > now);
        if in_future {
            return Err(ShiftError::Validation(vec![ValidationError::FutureTimestamp]));
        }
        Ok(())
    }
}

/// A created correction request and how it was dispositioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionOutcome {
    pub request: CorrectionRequest,
    pub disposition: CorrectionDisposition,
}

fn request_snapshot(request: &CorrectionRequest) -> serde_json::Value {
    json!({
        "time_entry_id": request.time_entry_id,
        "correction_type": request.correction_type.as_str(),
        "requested_time": timestamp_json(request.requested_time.as_ref()),
        "original_time": timestamp_json(request.original_time.as_ref()),
        "reason": request.reason,
        "status": request.status.as_str(),
    })
}

/// Apply an approved request to its entry, writing one audit entry.
async fn apply(
    conn: &libsql::Connection,
    request: &CorrectionRequest,
    target: &TimeEntry,
    actor: &str,
    now: DateTime<Utc>,
) -> Result<(), ShiftError> {
    let failure = |reason: &str| ShiftError::ApplicationFailure {
        correction_id: request.id.clone(),
        reason: reason.to_string(),
    };
    let requested = || request.requested_time.ok_or_else(|| failure("requested_time is missing"));

    let update = match request.correction_type {
        CorrectionType::ClockIn => {
            let at = requested()?;
            if target.clock_out.is_some_and(|out| at > out) {
                return Err(failure("requested clock-in is after the entry's clock-out"));
            }
            TimeEntryUpdateBuilder::new().clock_in(at).build()
        }
        CorrectionType::ClockOut => {
            let at = requested()?;
            if target.clock_in.is_some_and(|start| at < start) {
                return Err(failure("requested clock-out is before the entry's clock-in"));
            }
            TimeEntryUpdateBuilder::new()
                .clock_out(Some(at))
                .status(EntryStatus::Completed)
                .build()
        }
        CorrectionType::BreakStart | CorrectionType::BreakEnd => {
            let at = requested()?;
            let after_start = target.clock_in.is_none_or(|start| at >= start);
            let before_end = target.clock_out.is_none_or(|end| at <= end);
            if !(after_start && before_end) {
                return Err(failure("requested break time is outside the shift"));
            }
            let line = format!(
                "{} {}: {}",
                request.correction_type,
                format_timestamp(&at),
                request.reason
            );
            let notes = match target.notes {
                Some(ref existing) => format!("{existing}\n{line}"),
                None => line,
            };
            TimeEntryUpdateBuilder::new().notes(Some(notes)).build()
        }
        CorrectionType::Cancel => {
            if target.status == EntryStatus::Cancelled {
                return Err(failure("entry is already cancelled"));
            }
            TimeEntryUpdateBuilder::new()
                .status(EntryStatus::Cancelled)
                .build()
        }
        CorrectionType::Manual => {
            let start = requested()?;
            let end = request
                .original_time
                .ok_or_else(|| failure("original_time is missing"))?;
            insert_manual_entry(conn, request, target, start, end, actor, now).await?;
            return Ok(());
        }
    };

    update_audited(
        conn,
        target,
        &update,
        AuditAction::Update,
        Some(json!({ "correction_id": request.id })),
        actor,
        now,
    )
    .await?;
    Ok(())
}

async fn insert_manual_entry(
    conn: &libsql::Connection,
    request: &CorrectionRequest,
    source: &TimeEntry,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    actor: &str,
    now: DateTime<Utc>,
) -> Result<(), ShiftError> {
    let manual = TimeEntry {
        id: generate_id(conn, PREFIX_TIME_ENTRY).await?,
        employee_id: request.employee_id.clone(),
        clock_in: Some(start),
        clock_out: Some(end),
        status: EntryStatus::Completed,
        location: source.location.clone(),
        notes: Some(format!("Manual correction: {}", request.reason)),
        is_correction: true,
        original_entry_id: Some(source.id.clone()),
        created_at: now,
        updated_at: now,
    };
    entry::insert(conn, &manual).await?;
    audit::record(
        conn,
        AuditRecord {
            table: AuditTable::TimeEntries,
            record_id: &manual.id,
            action: AuditAction::Insert,
            old_values: None,
            new_values: Some(json!({
                "correction_for": source.id,
                "correction_id": request.id,
                "clock_in": format_timestamp(&start),
                "clock_out": format_timestamp(&end),
                "status": EntryStatus::Completed.as_str(),
            })),
            user_id: actor,
        },
        now,
    )
    .await?;
    Ok(())
}

/// Storage errors while applying become application failures.
fn as_application_failure(correction_id: &str, err: ShiftError) -> ShiftError {
    match err {
        ShiftError::Database(e) => ShiftError::ApplicationFailure {
            correction_id: correction_id.to_string(),
            reason: e.to_string(),
        },
        other => other,
    }
}

async fn find_pending(
    conn: &libsql::Connection,
    correction_id: &str,
) -> Result<CorrectionRequest, ShiftError> {
    correction::find(conn, correction_id)
        .await?
        .filter(|r| r.status == CorrectionStatus::Pending)
        .ok_or_else(|| {
            Conflict::CorrectionNotFound {
                correction_id: correction_id.to_string(),
            }
            .into()
        })
}

async fn close_request(
    conn: &libsql::Connection,
    pending: &CorrectionRequest,
    status: CorrectionStatus,
    reviewer: &str,
    review_note: Option<&str>,
    now: DateTime<Utc>,
) -> Result<(), ShiftError> {
    if !pending.status.can_transition_to(status)
        || !correction::close(conn, &pending.id, status, reviewer, now, review_note).await?
    {
        return Err(Conflict::CorrectionNotFound {
            correction_id: pending.id.clone(),
        }
        .into());
    }

    let mut new_values = json!({
        "status": status.as_str(),
        "approved_by": reviewer,
        "approved_at": format_timestamp(&now),
    });
    if let Some(note) = review_note {
        new_values["review_note"] = json!(note);
    }
    audit::record(
        conn,
        AuditRecord {
            table: AuditTable::CorrectionRequests,
            record_id: &pending.id,
            action: AuditAction::Update,
            old_values: Some(json!({ "status": pending.status.as_str() })),
            new_values: Some(new_values),
            user_id: reviewer,
        },
        now,
    )
    .await?;
    Ok(())
}

async fn approve_within(
    conn: &libsql::Connection,
    correction_id: &str,
    approver_id: &str,
    now: DateTime<Utc>,
) -> Result<CorrectionRequest, ShiftError> {
    let pending = find_pending(conn, correction_id).await?;
    close_request(conn, &pending, CorrectionStatus::Approved, approver_id, None, now)
        .await?;

    let approved = CorrectionRequest {
        status: CorrectionStatus::Approved,
        approved_by: Some(approver_id.to_string()),
        approved_at: Some(now),
        ..pending
    };

    let target = entry::find(conn, &approved.time_entry_id)
        .await?
        .ok_or_else(|| ShiftError::ApplicationFailure {
            correction_id: correction_id.to_string(),
            reason: format!("time entry {} no longer exists", approved.time_entry_id),
        })?;
    apply(conn, &approved, &target, approver_id, now)
        .await
        .map_err(|e| as_application_failure(correction_id, e))?;
    Ok(approved)
}

impl ShiftService {
    /// Submit a correction request for one of the employee's entries.
    ///
    /// Requests other than `manual` filed within the auto-approve window of
    /// the entry's creation are approved and applied immediately.
    ///
    /// # Errors
    ///
    /// Returns `ShiftError::Conflict` if the entry is not the employee's or
    /// already has a pending request, `ShiftError::Core` or
    /// `ShiftError::Validation` for bad input, and
    /// `ShiftError::ApplicationFailure` if an auto-approved change cannot be
    /// applied (nothing is written in that case).
    pub async fn request_correction(
        &self,
        employee_id: &str,
        time_entry_id: &str,
        input: CorrectionInput,
    ) -> Result<CorrectionOutcome, ShiftError> {
        let now = self.now();
        let uow = self.db().begin().await?;
        let result = self
            .request_correction_within(&uow, employee_id, time_entry_id, input, now)
            .await;
        let outcome = uow.finish(result).await?;

        tracing::info!(
            employee_id,
            time_entry_id,
            correction_id = %outcome.request.id,
            disposition = %outcome.disposition,
            "correction requested"
        );
        Ok(outcome)
    }

    async fn request_correction_within(
        &self,
        conn: &libsql::Connection,
        employee_id: &str,
        time_entry_id: &str,
        input: CorrectionInput,
        now: DateTime<Utc>,
    ) -> Result<CorrectionOutcome, ShiftError> {
        let target = entry::find_owned(conn, time_entry_id, employee_id)
            .await?
            .ok_or_else(|| Conflict::EntryNotFound {
                entry_id: time_entry_id.to_string(),
            })?;

        if let Some(existing) = correction::pending_for_entry(conn, time_entry_id).await? {
            return Err(Conflict::PendingCorrectionExists {
                time_entry_id: time_entry_id.to_string(),
                correction_id: existing.id,
            }
            .into());
        }

        input.check(now)?;

        let window = Duration::seconds(self.policy().auto_approve_window_i64());
        let auto_approve =
            input.correction_type.is_auto_approvable() && now - target.created_at <= window;
        tracing::debug!(time_entry_id, auto_approve, "correction disposition decided");

        let request = CorrectionRequest {
            id: generate_id(conn, PREFIX_CORRECTION).await?,
            time_entry_id: time_entry_id.to_string(),
            employee_id: employee_id.to_string(),
            correction_type: input.correction_type,
            original_time: input.original_time,
            requested_time: input.requested_time,
            reason: input.reason,
            status: if auto_approve {
                CorrectionStatus::Approved
            } else {
                CorrectionStatus::Pending
            },
            approved_by: None,
            approved_at: auto_approve.then_some(now),
            review_note: None,
            created_at: now,
        };
        correction::insert(conn, &request).await?;
        audit::record(
            conn,
            AuditRecord {
                table: AuditTable::CorrectionRequests,
                record_id: &request.id,
                action: AuditAction::Insert,
                old_values: None,
                new_values: Some(request_snapshot(&request)),
                user_id: employee_id,
            },
            now,
        )
        .await?;

        if !auto_approve {
            return Ok(CorrectionOutcome {
                request,
                disposition: CorrectionDisposition::PendingApproval,
            });
        }

        apply(conn, &request, &target, employee_id, now)
            .await
            .map_err(|e| as_application_failure(&request.id, e))?;
        Ok(CorrectionOutcome {
            request,
            disposition: CorrectionDisposition::AutoApproved,
        })
    }

    /// Approve a pending request and apply it to its entry.
    ///
    /// # Errors
    ///
    /// Returns `ShiftError::Conflict` (`correction_not_found`) unless the
    /// request exists and is pending, or `ShiftError::ApplicationFailure` if
    /// the change cannot be applied; the request then stays pending.
    pub async fn approve_correction(
        &self,
        correction_id: &str,
        approver_id: &str,
    ) -> Result<CorrectionRequest, ShiftError> {
        let now = self.now();
        let uow = self.db().begin().await?;
        let result = approve_within(&uow, correction_id, approver_id, now).await;
        let approved = uow.finish(result).await?;

        tracing::info!(correction_id, approver_id, "correction approved and applied");
        Ok(approved)
    }

    /// Reject a pending request. The entry is not touched.
    ///
    /// # Errors
    ///
    /// Returns `ShiftError::Conflict` (`correction_not_found`) unless the
    /// request exists and is pending.
    pub async fn reject_correction(
        &self,
        correction_id: &str,
        approver_id: &str,
        reason: Option<&str>,
    ) -> Result<CorrectionRequest, ShiftError> {
        let now = self.now();
        let uow = self.db().begin().await?;
        let result = async {
            let pending = find_pending(&uow, correction_id).await?;
            close_request(&uow, &pending, CorrectionStatus::Rejected, approver_id, reason, now)
                .await?;
            Ok::<_, ShiftError>(CorrectionRequest {
                status: CorrectionStatus::Rejected,
                approved_by: Some(approver_id.to_string()),
                approved_at: Some(now),
                review_note: reason.map(String::from),
                ..pending
            })
        }
        .await;
        let rejected = uow.finish(result).await?;

        tracing::info!(correction_id, approver_id, "correction rejected");
        Ok(rejected)
    }

    /// Overwrite one field of a time entry directly, as an administrator.
    ///
    /// `raw_value` is parsed for `field` (RFC 3339 timestamps, status names,
    /// `null` or empty to clear nullable fields). The result must still keep
    /// clock order and the one-open-shift rule.
    ///
    /// # Errors
    ///
    /// Returns `ShiftError::Permission` unless `admin_id` is in the admin
    /// department, `ShiftError::Conflict` for a missing entry or a second
    /// open shift, `ShiftError::Core` for an unparsable value, and
    /// `ShiftError::Validation` if clock-out would precede clock-in.
    pub async fn admin_override(
        &self,
        admin_id: &str,
        time_entry_id: &str,
        field: OverridableField,
        raw_value: &str,
        reason: &str,
    ) -> Result<TimeEntry, ShiftError> {
        let now = self.now();
        let uow = self.db().begin().await?;
        let result = self
            .admin_override_within(&uow, admin_id, time_entry_id, field, raw_value, reason, now)
            .await;
        let updated = uow.finish(result).await?;

        tracing::info!(admin_id, time_entry_id, %field, "admin override applied");
        Ok(updated)
    }

    #[allow(clippy::too_many_arguments)]
    async fn admin_override_within(
        &self,
        conn: &libsql::Connection,
        admin_id: &str,
        time_entry_id: &str,
        field: OverridableField,
        raw_value: &str,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<TimeEntry, ShiftError> {
        let is_admin = employee::find(conn, admin_id)
            .await?
            .is_some_and(|e| e.department == self.policy().admin_department);
        if !is_admin {
            return Err(ShiftError::Permission("Admin permissions required".into()));
        }

        let current = entry::find(conn, time_entry_id)
            .await?
            .ok_or_else(|| Conflict::EntryNotFound {
                entry_id: time_entry_id.to_string(),
            })?;

        let update = TimeEntryUpdate::from(FieldOverride::parse(field, raw_value)?);
        let projected = update.project(&current);

        if let (Some(start), Some(end)) = (projected.clock_in, projected.clock_out) {
            if end < start {
                return Err(ShiftError::Validation(vec![
                    ValidationError::ClockOutBeforeClockIn {
                        entry_id: current.id.clone(),
                    },
                ]));
            }
        }
        if projected.is_open() {
            if let Some(other) = entry::open_shift(conn, &current.employee_id).await? {
                if other.id != current.id {
                    return Err(Conflict::AlreadyClockedIn {
                        active_entry_id: other.id,
                    }
                    .into());
                }
            }
        }

        let updated = update_audited(
            conn,
            &current,
            &update,
            AuditAction::AdminOverride,
            Some(json!({ "reason": reason })),
            admin_id,
            now,
        )
        .await?;
        Ok(updated)
    }
}
