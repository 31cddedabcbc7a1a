use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{CorrectionStatus, CorrectionType};

/// A request to change one time entry.
///
/// `approved_by` / `approved_at` record whoever closed the request, for both
/// approvals and rejections. Auto-approved requests have `approved_at` set
/// and no `approved_by`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CorrectionRequest {
    pub id: String,
    pub time_entry_id: String,
    pub employee_id: String,
    pub correction_type: CorrectionType,
    pub original_time: Option<DateTime<Utc>>,
    pub requested_time: Option<DateTime<Utc>>,
    pub reason: String,
    pub status: CorrectionStatus,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub review_note: Option<String>,
    pub created_at: DateTime<Utc>,
}
