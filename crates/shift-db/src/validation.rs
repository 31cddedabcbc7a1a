//! Validation engine for clock events.
//!
//! [`assess`] is a pure function over the employee's current state; the
//! clock service loads that state inside its unit of work and calls it with
//! the operation's `now`.

use chrono::{DateTime, Duration, Utc};
use shift_config::PolicyConfig;
use shift_core::entities::TimeEntry;
use shift_core::enums::ClockAction;
use shift_core::validation::{ValidationError, ValidationReport, ValidationWarning};

use crate::error::{DatabaseError, ShiftError};
use crate::repos::entry;
use crate::service::ShiftService;

/// The entries validation looks at for one employee.
#[derive(Debug, Clone, Default)]
pub struct ShiftState {
    /// Most recently updated non-cancelled entry.
    pub latest: Option<TimeEntry>,
    /// The open shift, if any.
    pub open: Option<TimeEntry>,
}

impl ShiftState {
    /// # Errors
    ///
    /// Returns `DatabaseError` if either lookup fails.
    pub async fn load(conn: &libsql::Connection, employee_id: &str) -> Result<Self, DatabaseError> {
        Ok(Self {
            latest: entry::latest(conn, employee_id).await?,
            open: entry::open_shift(conn, employee_id).await?,
        })
    }
}

/// Check one clock event against the employee's state.
#[must_use]
pub fn assess(
    policy: &PolicyConfig,
    state: &ShiftState,
    action: ClockAction,
    timestamp: DateTime<Utc>,
    now: DateTime<Utc>,
) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if timestamp > now {
        errors.push(ValidationError::FutureTimestamp);
    }

    if let Some(ref latest) = state.latest {
        let since_update = timestamp - latest.updated_at;
        if since_update < Duration::seconds(policy.grace_window_i64()) {
            let minutes_ago = since_update.num_minutes().max(0);
            match action {
                ClockAction::ClockIn if latest.is_open() => {
                    warnings.push(ValidationWarning::DuplicateClockIn { minutes_ago });
                }
                ClockAction::ClockOut if latest.clock_out.is_some() => {
                    warnings.push(ValidationWarning::DuplicateClockOut { minutes_ago });
                }
                ClockAction::ClockIn | ClockAction::ClockOut => {}
            }
        }
    }

    if action == ClockAction::ClockOut {
        if let Some(ref open) = state.open {
            if let Some(clock_in) = open.clock_in {
                let length = timestamp - clock_in;
                if length < Duration::zero() {
                    errors.push(ValidationError::ClockOutBeforeClockIn {
                        entry_id: open.id.clone(),
                    });
                } else if length > Duration::hours(i64::from(policy.max_shift_hours)) {
                    warnings.push(ValidationWarning::LongShift {
                        hours: hours(length),
                        limit_hours: policy.max_shift_hours,
                    });
                }
            }
        }
    }

    ValidationReport::new(errors, warnings)
}

#[allow(clippy::cast_precision_loss)]
fn hours(length: Duration) -> f64 {
    length.num_seconds() as f64 / 3600.0
}

impl ShiftService {
    /// Validate a clock event without recording it.
    ///
    /// `timestamp` defaults to the current time.
    ///
    /// # Errors
    ///
    /// Returns `ShiftError::Database` if the employee's entries cannot be read.
    pub async fn validate(
        &self,
        employee_id: &str,
        action: ClockAction,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<ValidationReport, ShiftError> {
        let now = self.now();
        let state = ShiftState::load(self.db().conn(), employee_id).await?;
        Ok(assess(
            self.policy(),
            &state,
            action,
            timestamp.unwrap_or(now),
            now,
        ))
    }
}
