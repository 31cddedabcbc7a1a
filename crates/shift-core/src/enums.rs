//! Status enums, correction types, and audit vocabulary for Shift.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`,
//! except [`AuditAction`] which keeps the upper-case names stored in `audit_logs`.
//! Status enums with state machines provide `allowed_next_states()` to enforce
//! valid transitions at the application layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// EntryStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a time entry on the clock path.
///
/// ```text
/// active → completed → active (quick undo of a clock-out)
///        → cancelled
/// ```
///
/// Corrections and admin overrides write status directly and do not consult
/// this table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Active,
    Completed,
    Cancelled,
}

impl EntryStatus {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Active => &[Self::Completed, Self::Cancelled],
            Self::Completed => &[Self::Active],
            Self::Cancelled => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CorrectionType
// ---------------------------------------------------------------------------

/// What a correction request asks to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionType {
    ClockIn,
    ClockOut,
    BreakStart,
    BreakEnd,
    Cancel,
    Manual,
}

impl CorrectionType {
    /// Manual entries always go through a human approver.
    #[must_use]
    pub const fn is_auto_approvable(self) -> bool {
        !matches!(self, Self::Manual)
    }

    /// Every type except `cancel` carries a `requested_time`.
    #[must_use]
    pub const fn requires_requested_time(self) -> bool {
        !matches!(self, Self::Cancel)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClockIn => "clock_in",
            Self::ClockOut => "clock_out",
            Self::BreakStart => "break_start",
            Self::BreakEnd => "break_end",
            Self::Cancel => "cancel",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for CorrectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CorrectionStatus
// ---------------------------------------------------------------------------

/// Status of a correction request.
///
/// ```text
/// pending → approved
///         → rejected
/// ```
///
/// Auto-approved requests are created directly as `approved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionStatus {
    Pending,
    Approved,
    Rejected,
}

impl CorrectionStatus {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Approved, Self::Rejected],
            Self::Approved | Self::Rejected => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for CorrectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CorrectionDisposition
// ---------------------------------------------------------------------------

/// How a freshly submitted correction request was routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionDisposition {
    AutoApproved,
    PendingApproval,
}

impl CorrectionDisposition {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AutoApproved => "auto_approved",
            Self::PendingApproval => "pending_approval",
        }
    }
}

impl fmt::Display for CorrectionDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ClockAction
// ---------------------------------------------------------------------------

/// A raw clock event submitted by an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClockAction {
    ClockIn,
    ClockOut,
}

impl ClockAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClockIn => "clock_in",
            Self::ClockOut => "clock_out",
        }
    }
}

impl fmt::Display for ClockAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// UndoAction
// ---------------------------------------------------------------------------

/// What a quick undo reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum UndoAction {
    /// The clock-out was cleared and the shift reopened.
    ClockOutUndo,
    /// The clock-in had no paired clock-out, so the entry was cancelled.
    ClockInCancel,
}

impl UndoAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClockOutUndo => "clock_out_undo",
            Self::ClockInCancel => "clock_in_cancel",
        }
    }
}

impl fmt::Display for UndoAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction / AuditTable
// ---------------------------------------------------------------------------

/// Kind of mutation recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Insert,
    Update,
    AdminOverride,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::AdminOverride => "ADMIN_OVERRIDE",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Table whose row an audit entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditTable {
    TimeEntries,
    CorrectionRequests,
    Employees,
}

impl AuditTable {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TimeEntries => "time_entries",
            Self::CorrectionRequests => "correction_requests",
            Self::Employees => "employees",
        }
    }
}

impl fmt::Display for AuditTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// OverridableField
// ---------------------------------------------------------------------------

/// Time entry columns an administrator may overwrite directly.
///
/// Anything not listed here cannot be reached through an override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OverridableField {
    ClockIn,
    ClockOut,
    Status,
    Location,
    Notes,
}

impl OverridableField {
    pub const ALL: [Self; 5] = [
        Self::ClockIn,
        Self::ClockOut,
        Self::Status,
        Self::Location,
        Self::Notes,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClockIn => "clock_in",
            Self::ClockOut => "clock_out",
            Self::Status => "status",
            Self::Location => "location",
            Self::Notes => "notes",
        }
    }
}

impl fmt::Display for OverridableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
