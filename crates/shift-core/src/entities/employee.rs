use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Someone who clocks in and out, or reviews corrections.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub department: String,
    pub created_at: DateTime<Utc>,
}
