//! Result types for clock event validation.
//!
//! The checks themselves run in `shift-db` (they need the employee's latest
//! entry); this module only defines what they report.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A hard failure: the clock event cannot be accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ValidationError {
    /// The timestamp lies after the operation's `now`.
    FutureTimestamp,
    /// A clock-out would land before the shift's clock-in.
    ClockOutBeforeClockIn { entry_id: String },
}

impl ValidationError {
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::FutureTimestamp => "future_timestamp",
            Self::ClockOutBeforeClockIn { .. } => "clock_out_before_clock_in",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FutureTimestamp => f.write_str("Cannot clock in/out in the future"),
            Self::ClockOutBeforeClockIn { entry_id } => {
                write!(f, "Clock-out would precede clock-in of entry {entry_id}")
            }
        }
    }
}

/// An advisory finding. The operation may proceed once the caller confirms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ValidationWarning {
    DuplicateClockIn { minutes_ago: i64 },
    DuplicateClockOut { minutes_ago: i64 },
    LongShift { hours: f64, limit_hours: u32 },
}

impl ValidationWarning {
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::DuplicateClockIn { .. } => "duplicate_clock_in",
            Self::DuplicateClockOut { .. } => "duplicate_clock_out",
            Self::LongShift { .. } => "long_shift",
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateClockIn { minutes_ago } => {
                write!(f, "Already clocked in {minutes_ago} minutes ago")
            }
            Self::DuplicateClockOut { minutes_ago } => {
                write!(f, "Already clocked out {minutes_ago} minutes ago")
            }
            Self::LongShift { hours, limit_hours } => {
                write!(f, "Shift exceeds {limit_hours} hours ({hours:.1}h)")
            }
        }
    }
}

/// Outcome of validating one clock event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub requires_confirmation: bool,
}

impl ValidationReport {
    /// Build a report, deriving `valid` and `requires_confirmation`.
    #[must_use]
    pub fn new(errors: Vec<ValidationError>, warnings: Vec<ValidationWarning>) -> Self {
        Self {
            valid: errors.is_empty(),
            requires_confirmation: !warnings.is_empty(),
            errors,
            warnings,
        }
    }

    /// Human-readable warning messages.
    #[must_use]
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }

    /// Human-readable error messages.
    #[must_use]
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_flags_follow_contents() {
        let clean = ValidationReport::new(vec![], vec![]);
        assert!(clean.valid);
        assert!(!clean.requires_confirmation);

        let warned = ValidationReport::new(
            vec![],
            vec![ValidationWarning::DuplicateClockIn { minutes_ago: 2 }],
        );
        assert!(warned.valid);
        assert!(warned.requires_confirmation);
        assert_eq!(warned.warning_messages(), vec!["Already clocked in 2 minutes ago"]);

        let invalid = ValidationReport::new(vec![ValidationError::FutureTimestamp], vec![]);
        assert!(!invalid.valid);
        assert!(!invalid.requires_confirmation);
    }

    #[test]
    fn long_shift_message_rounds_hours() {
        let warning = ValidationWarning::LongShift {
            hours: 17.04,
            limit_hours: 16,
        };
        assert_eq!(warning.to_string(), "Shift exceeds 16 hours (17.0h)");
        assert_eq!(warning.code(), "long_shift");
    }
}
