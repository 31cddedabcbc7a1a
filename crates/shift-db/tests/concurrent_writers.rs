//! Concurrent operations on one shared service each commit as their own unit.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use shift_config::PolicyConfig;
use shift_core::clock::FakeClock;
use shift_core::enums::{AuditAction, AuditTable};
use shift_db::ShiftDb;
use shift_db::clocking::ClockOutcome;
use shift_db::repos::audit::AuditFilter;
use shift_db::service::ShiftService;

const WORKERS: usize = 16;

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn parallel_clock_ins_stay_atomic() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shift.db");
    let clock = FakeClock::new(Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap());
    let db = ShiftDb::open_local(path.to_str().unwrap()).await.unwrap();
    let svc = Arc::new(ShiftService::from_db(
        db,
        Arc::new(clock),
        PolicyConfig::default(),
    ));

    let mut employees = Vec::with_capacity(WORKERS);
    for n in 0..WORKERS {
        let emp = svc
            .register_employee(&format!("Worker {n}"), "ops")
            .await
            .unwrap();
        employees.push(emp.id);
    }

    let handles: Vec<_> = employees
        .iter()
        .cloned()
        .map(|emp| {
            let svc = Arc::clone(&svc);
            tokio::spawn(async move { svc.clock_in(&emp, Some("dock"), false).await })
        })
        .collect();

    for handle in handles {
        match handle.await.unwrap().unwrap() {
            ClockOutcome::Recorded { .. } => {}
            ClockOutcome::ConfirmationRequired { report, .. } => {
                panic!("unexpected confirmation: {:?}", report.warnings)
            }
        }
    }

    for emp in &employees {
        assert!(svc.status(emp).await.unwrap().clocked_in, "{emp} should be on shift");
    }
    let inserts = svc
        .query_audit(&AuditFilter {
            table: Some(AuditTable::TimeEntries),
            action: Some(AuditAction::Insert),
            ..AuditFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(inserts.len(), WORKERS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_clock_ins_open_one_shift() {
    let clock = FakeClock::new(Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap());
    let db = ShiftDb::open_local(":memory:").await.unwrap();
    let svc = Arc::new(ShiftService::from_db(
        db,
        Arc::new(clock),
        PolicyConfig::default(),
    ));
    let emp = svc.register_employee("Ada", "ops").await.unwrap().id;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let svc = Arc::clone(&svc);
            let emp = emp.clone();
            tokio::spawn(async move { svc.clock_in(&emp, None, false).await })
        })
        .collect();

    let mut recorded = 0;
    for handle in handles {
        if let Ok(ClockOutcome::Recorded { .. }) = handle.await.unwrap() {
            recorded += 1;
        }
    }
    assert_eq!(recorded, 1);

    let open = svc
        .list_entries(&emp, 20)
        .await
        .unwrap()
        .into_iter()
        .filter(|entry| entry.is_open())
        .count();
    assert_eq!(open, 1);
}
