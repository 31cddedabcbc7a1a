//! End-to-end shift scenarios against a file-backed database.
//!
//! - Clock lifecycle: clock-in, long shift confirmation, clock-out, reopen
//! - Quick undo expiry leaves the entry untouched
//! - Forced clock-in supersedes a stale open shift
//! - Corrections: auto-approved, queued then approved, one audit row each

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use tempfile::TempDir;

use shift_config::PolicyConfig;
use shift_core::clock::FakeClock;
use shift_core::entities::TimeEntry;
use shift_core::enums::{
    AuditAction, AuditTable, CorrectionDisposition, CorrectionStatus, CorrectionType, EntryStatus,
};
use shift_db::ShiftDb;
use shift_db::clocking::ClockOutcome;
use shift_db::repos::audit::AuditFilter;
use shift_db::service::ShiftService;
use shift_db::workflow::CorrectionInput;

fn nine_am() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
}

async fn open(path: &str, clock: &FakeClock) -> ShiftService {
    let db = ShiftDb::open_local(path).await.unwrap();
    ShiftService::from_db(db, Arc::new(clock.clone()), PolicyConfig::default())
}

async fn memory_service() -> (ShiftService, FakeClock) {
    let clock = FakeClock::new(nine_am());
    (open(":memory:", &clock).await, clock)
}

fn recorded(outcome: ClockOutcome) -> TimeEntry {
    match outcome {
        ClockOutcome::Recorded { entry, .. } => entry,
        ClockOutcome::ConfirmationRequired { report, .. } => {
            panic!("unexpected confirmation: {:?}", report.warnings)
        }
    }
}

async fn audit_for(svc: &ShiftService, table: AuditTable, record_id: &str) -> usize {
    svc.query_audit(&AuditFilter {
        table: Some(table),
        record_id: Some(record_id.to_string()),
        ..AuditFilter::default()
    })
    .await
    .unwrap()
    .len()
}

// ---------------------------------------------------------------------------
// Clock lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn long_shift_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shift.db");
    let path = path.to_str().unwrap();
    let clock = FakeClock::new(nine_am());

    let (emp, entry_id) = {
        let svc = open(path, &clock).await;
        let emp = svc.register_employee("Ada", "ops").await.unwrap().id;
        let entry = recorded(svc.clock_in(&emp, Some("dock"), false).await.unwrap());
        (emp, entry.id)
    };

    // 09:00 -> 02:00 the next day
    clock.advance(Duration::hours(17));
    let svc = open(path, &clock).await;
    assert_eq!(svc.status(&emp).await.unwrap().entry_id.as_deref(), Some(entry_id.as_str()));

    match svc.clock_out(&emp, false).await.unwrap() {
        ClockOutcome::ConfirmationRequired { report, entry_id: held } => {
            assert!(report.valid);
            assert_eq!(report.warnings[0].code(), "long_shift");
            assert_eq!(held.as_deref(), Some(entry_id.as_str()));
        }
        ClockOutcome::Recorded { .. } => panic!("long shift must need confirmation"),
    }
    assert!(svc.get_time_entry(&entry_id).await.unwrap().is_open());

    let closed = recorded(svc.clock_out(&emp, true).await.unwrap());
    assert_eq!(closed.status, EntryStatus::Completed);
    assert_eq!(closed.duration(), Some(Duration::hours(17)));
    assert_eq!(audit_for(&svc, AuditTable::TimeEntries, &entry_id).await, 2);
}

#[tokio::test]
async fn undo_after_grace_window_changes_nothing() {
    let (svc, clock) = memory_service().await;
    let emp = svc.register_employee("Ada", "ops").await.unwrap().id;
    recorded(svc.clock_in(&emp, None, false).await.unwrap());
    clock.advance(Duration::hours(8));
    let closed = recorded(svc.clock_out(&emp, false).await.unwrap());

    clock.advance(Duration::seconds(301));
    assert!(!svc.status(&emp).await.unwrap().can_undo);
    let err = svc.quick_undo(&emp, &closed.id).await.unwrap_err();
    assert_eq!(err.reason(), "grace_period_expired");
    assert_eq!(svc.get_time_entry(&closed.id).await.unwrap(), closed);
    assert_eq!(audit_for(&svc, AuditTable::TimeEntries, &closed.id).await, 2);
}

#[tokio::test]
async fn forced_clock_in_keeps_one_open_shift() {
    let (svc, clock) = memory_service().await;
    let emp = svc.register_employee("Ada", "ops").await.unwrap().id;
    let stale = recorded(svc.clock_in(&emp, None, false).await.unwrap());

    clock.advance(Duration::hours(20));
    let err = svc.clock_in(&emp, None, false).await.unwrap_err();
    assert_eq!(err.correction_handle(), Some(stale.id.as_str()));

    let fresh = recorded(svc.clock_in(&emp, None, true).await.unwrap());
    assert_eq!(svc.open_shift(&emp).await.unwrap(), Some(fresh.clone()));
    assert_eq!(
        svc.get_time_entry(&stale.id).await.unwrap().status,
        EntryStatus::Cancelled
    );

    let open = svc
        .list_entries(&emp, 10)
        .await
        .unwrap()
        .into_iter()
        .filter(TimeEntry::is_open)
        .count();
    assert_eq!(open, 1);
}

// ---------------------------------------------------------------------------
// Corrections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn auto_approved_correction_writes_one_audit_per_record() {
    let (svc, clock) = memory_service().await;
    let emp = svc.register_employee("Ada", "ops").await.unwrap().id;
    let entry = recorded(svc.clock_in(&emp, None, false).await.unwrap());

    clock.advance(Duration::minutes(14));
    let outcome = svc
        .request_correction(
            &emp,
            &entry.id,
            CorrectionInput::new(CorrectionType::ClockIn, "badge reader down")
                .requested(nine_am() - Duration::minutes(20)),
        )
        .await
        .unwrap();
    assert_eq!(outcome.disposition, CorrectionDisposition::AutoApproved);

    let corrected = svc.get_time_entry(&entry.id).await.unwrap();
    assert_eq!(corrected.clock_in, Some(nine_am() - Duration::minutes(20)));
    assert_eq!(corrected.updated_at, nine_am() + Duration::minutes(14));
    assert_eq!(audit_for(&svc, AuditTable::CorrectionRequests, &outcome.request.id).await, 1);

    let updates = svc
        .query_audit(&AuditFilter {
            record_id: Some(entry.id.clone()),
            action: Some(AuditAction::Update),
            ..AuditFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].user_id, emp);
    assert_eq!(
        updates[0].old_values.as_ref().unwrap()["clock_in"],
        "2026-03-02T09:00:00.000000Z"
    );
    assert_eq!(
        updates[0].new_values.as_ref().unwrap()["clock_in"],
        "2026-03-02T08:40:00.000000Z"
    );
}

#[tokio::test]
async fn queued_correction_applies_only_on_approval() {
    let (svc, clock) = memory_service().await;
    let emp = svc.register_employee("Ada", "ops").await.unwrap().id;
    let lead = svc.register_employee("Grace", "ops").await.unwrap().id;
    let entry = recorded(svc.clock_in(&emp, None, false).await.unwrap());

    clock.advance(Duration::minutes(16));
    let outcome = svc
        .request_correction(
            &emp,
            &entry.id,
            CorrectionInput::new(CorrectionType::ClockIn, "late badge")
                .requested(nine_am() - Duration::minutes(5)),
        )
        .await
        .unwrap();
    assert_eq!(outcome.disposition, CorrectionDisposition::PendingApproval);
    assert_eq!(svc.get_time_entry(&entry.id).await.unwrap(), entry);

    let history = svc.correction_history(&emp, 10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, CorrectionStatus::Pending);

    clock.advance(Duration::hours(1));
    svc.approve_correction(&outcome.request.id, &lead).await.unwrap();
    assert_eq!(
        svc.get_time_entry(&entry.id).await.unwrap().clock_in,
        Some(nine_am() - Duration::minutes(5))
    );
    assert_eq!(audit_for(&svc, AuditTable::CorrectionRequests, &outcome.request.id).await, 2);
    assert_eq!(audit_for(&svc, AuditTable::TimeEntries, &entry.id).await, 2);

    let err = svc
        .approve_correction(&outcome.request.id, &lead)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not found or already processed"));
}
