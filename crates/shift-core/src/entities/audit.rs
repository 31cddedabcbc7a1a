use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{AuditAction, AuditTable};

/// An append-only audit log entry recording one mutation.
///
/// `old_values` / `new_values` hold only the columns the mutation touched.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuditLogEntry {
    pub id: String,
    pub table_name: AuditTable,
    pub record_id: String,
    pub action: AuditAction,
    pub old_values: Option<serde_json::Value>,
    pub new_values: Option<serde_json::Value>,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
}
