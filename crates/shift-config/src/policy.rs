//! Time-keeping policy: grace windows, auto-approval, shift limits.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default quick-undo / duplicate-action window (5 minutes).
const fn default_grace_window_secs() -> u64 {
    300
}

/// Default self-correction window (15 minutes).
const fn default_auto_approve_window_secs() -> u64 {
    900
}

/// Default maximum shift length before a clock-out needs confirmation.
const fn default_max_shift_hours() -> u32 {
    16
}

fn default_admin_department() -> String {
    String::from("admin")
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PolicyConfig {
    /// Seconds after a clock action during which quick undo is allowed and a
    /// repeated action triggers a duplicate warning.
    #[serde(default = "default_grace_window_secs")]
    pub grace_window_secs: u64,

    /// Seconds after entry creation during which corrections apply without
    /// review.
    #[serde(default = "default_auto_approve_window_secs")]
    pub auto_approve_window_secs: u64,

    /// Shifts longer than this need an explicit confirmation at clock-out.
    #[serde(default = "default_max_shift_hours")]
    pub max_shift_hours: u32,

    /// Department whose members may apply admin overrides.
    #[serde(default = "default_admin_department")]
    pub admin_department: String,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            grace_window_secs: default_grace_window_secs(),
            auto_approve_window_secs: default_auto_approve_window_secs(),
            max_shift_hours: default_max_shift_hours(),
            admin_department: default_admin_department(),
        }
    }
}

impl PolicyConfig {
    /// Reject values that would make the policy meaningless.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grace_window_secs == 0 {
            return Err(invalid("policy.grace_window_secs", "must be greater than zero"));
        }
        if self.auto_approve_window_secs == 0 {
            return Err(invalid(
                "policy.auto_approve_window_secs",
                "must be greater than zero",
            ));
        }
        if self.max_shift_hours == 0 || self.max_shift_hours > 24 * 7 {
            return Err(invalid("policy.max_shift_hours", "must be between 1 and 168"));
        }
        if self.admin_department.trim().is_empty() {
            return Err(invalid("policy.admin_department", "must not be empty"));
        }
        Ok(())
    }

    /// Grace window as a signed duration in seconds, for timestamp arithmetic.
    pub fn grace_window_i64(&self) -> i64 {
        i64::try_from(self.grace_window_secs).unwrap_or(i64::MAX)
    }

    /// Auto-approve window as a signed duration in seconds.
    pub fn auto_approve_window_i64(&self) -> i64 {
        i64::try_from(self.auto_approve_window_secs).unwrap_or(i64::MAX)
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
