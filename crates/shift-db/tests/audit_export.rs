//! Audit log export and immutability.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use tempfile::TempDir;

use shift_config::PolicyConfig;
use shift_core::clock::FakeClock;
use shift_core::entities::AuditLogEntry;
use shift_core::enums::{AuditAction, AuditTable};
use shift_db::ShiftDb;
use shift_db::repos::audit::AuditFilter;
use shift_db::service::ShiftService;

async fn busy_day() -> (ShiftService, String) {
    let clock = FakeClock::new(Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap());
    let db = ShiftDb::open_local(":memory:").await.unwrap();
    let svc = ShiftService::from_db(db, Arc::new(clock.clone()), PolicyConfig::default());

    let emp = svc.register_employee("Ada", "ops").await.unwrap().id;
    clock.advance(Duration::minutes(1));
    svc.clock_in(&emp, None, false).await.unwrap();
    clock.advance(Duration::hours(8));
    svc.clock_out(&emp, false).await.unwrap();
    (svc, emp)
}

#[tokio::test]
async fn export_writes_oldest_first() {
    let (svc, emp) = busy_day().await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("audit.jsonl");

    let written = svc
        .export_audit_jsonl(&path, &AuditFilter::default())
        .await
        .unwrap();
    assert_eq!(written, 3);

    let lines: Vec<AuditLogEntry> = serde_jsonlines::json_lines::<AuditLogEntry, _>(&path)
        .unwrap()
        .collect::<std::io::Result<_>>()
        .unwrap();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].table_name, AuditTable::Employees);
    assert_eq!(lines[0].record_id, emp);
    assert_eq!(lines[1].action, AuditAction::Insert);
    assert_eq!(lines[2].action, AuditAction::Update);
    assert!(lines.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

    let newest_first = svc.query_audit(&AuditFilter::default()).await.unwrap();
    assert_eq!(newest_first.first(), lines.last());
}

#[tokio::test]
async fn export_respects_filter() {
    let (svc, _emp) = busy_day().await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("entries.jsonl");

    let written = svc
        .export_audit_jsonl(
            &path,
            &AuditFilter {
                table: Some(AuditTable::TimeEntries),
                ..AuditFilter::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(written, 2);

    let raw = std::fs::read_to_string(&path).unwrap();
    assert_eq!(raw.lines().count(), 2);
    assert!(raw.lines().all(|l| l.contains("\"table_name\":\"time_entries\"")));
}

#[tokio::test]
async fn audit_rows_cannot_be_rewritten() {
    let (svc, _emp) = busy_day().await;
    let conn = svc.db().conn();

    assert!(
        conn.execute("UPDATE audit_logs SET user_id = 'someone-else'", ())
            .await
            .is_err()
    );
    assert!(conn.execute("DELETE FROM audit_logs", ()).await.is_err());
    assert_eq!(svc.query_audit(&AuditFilter::default()).await.unwrap().len(), 3);
}
