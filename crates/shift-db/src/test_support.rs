//! Shared test utilities for shift-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use std::sync::Arc;

    use chrono::{DateTime, TimeZone, Utc};
    use shift_config::PolicyConfig;
    use shift_core::clock::FakeClock;

    use crate::ShiftDb;
    use crate::service::ShiftService;

    /// Monday 2026-03-02 09:00 UTC, the start of every test day.
    pub fn day_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    /// In-memory `ShiftService` with default policy and a fake clock at
    /// [`day_start`]. The returned clock shares state with the service.
    pub async fn test_service() -> (ShiftService, FakeClock) {
        let clock = FakeClock::new(day_start());
        let db = ShiftDb::open_local(":memory:").await.unwrap();
        let svc = ShiftService::from_db(db, Arc::new(clock.clone()), PolicyConfig::default());
        (svc, clock)
    }

    /// Register an employee and return its ID.
    pub async fn hire(svc: &ShiftService, name: &str, department: &str) -> String {
        svc.register_employee(name, department).await.unwrap().id
    }
}
