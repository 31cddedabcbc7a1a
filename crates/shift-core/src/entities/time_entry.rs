use chrono::{DateTime, Duration, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::EntryStatus;

/// One shift record.
///
/// At most one entry per employee may be open (`status == active` with no
/// `clock_out`). When both ends are set, `clock_out >= clock_in`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TimeEntry {
    pub id: String,
    pub employee_id: String,
    pub clock_in: Option<DateTime<Utc>>,
    pub clock_out: Option<DateTime<Utc>>,
    pub status: EntryStatus,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub is_correction: bool,
    pub original_entry_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimeEntry {
    /// Whether this entry is the employee's open shift.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == EntryStatus::Active && self.clock_out.is_none()
    }

    /// Length of the shift once both ends are known.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        match (self.clock_in, self.clock_out) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn entry(status: EntryStatus, clock_out: Option<DateTime<Utc>>) -> TimeEntry {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        TimeEntry {
            id: "ent-00000001".into(),
            employee_id: "emp-00000001".into(),
            clock_in: Some(start),
            clock_out,
            status,
            location: None,
            notes: None,
            is_correction: false,
            original_entry_id: None,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn open_shift_requires_active_and_no_clock_out() {
        assert!(entry(EntryStatus::Active, None).is_open());
        assert!(!entry(EntryStatus::Cancelled, None).is_open());
        let end = Utc.with_ymd_and_hms(2026, 3, 2, 17, 0, 0).unwrap();
        assert!(!entry(EntryStatus::Completed, Some(end)).is_open());
    }

    #[test]
    fn duration_needs_both_ends() {
        assert_eq!(entry(EntryStatus::Active, None).duration(), None);
        let end = Utc.with_ymd_and_hms(2026, 3, 2, 17, 30, 0).unwrap();
        assert_eq!(
            entry(EntryStatus::Completed, Some(end)).duration(),
            Some(Duration::minutes(510))
        );
    }
}
