//! Typed admin override values.
//!
//! An override names one [`OverridableField`] and a raw string value. The
//! value is parsed into a [`FieldOverride`] before anything touches the
//! database, so a bad timestamp or unknown status never reaches SQL.

use chrono::{DateTime, Utc};

use crate::clock::format_timestamp;
use crate::enums::{EntryStatus, OverridableField};
use crate::errors::CoreError;

/// A parsed override for one time entry column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOverride {
    ClockIn(DateTime<Utc>),
    ClockOut(Option<DateTime<Utc>>),
    Status(EntryStatus),
    Location(Option<String>),
    Notes(Option<String>),
}

impl FieldOverride {
    /// Parse `raw` for `field`.
    ///
    /// Timestamps are RFC 3339. For nullable columns an empty string or
    /// `null` clears the value.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the value does not fit the field.
    pub fn parse(field: OverridableField, raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        let cleared = trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null");

        match field {
            OverridableField::ClockIn => {
                if cleared {
                    return Err(CoreError::Validation("clock_in cannot be cleared".into()));
                }
                Ok(Self::ClockIn(parse_timestamp(field, trimmed)?))
            }
            OverridableField::ClockOut => {
                if cleared {
                    Ok(Self::ClockOut(None))
                } else {
                    Ok(Self::ClockOut(Some(parse_timestamp(field, trimmed)?)))
                }
            }
            OverridableField::Status => {
                let status = match trimmed {
                    "active" => EntryStatus::Active,
                    "completed" => EntryStatus::Completed,
                    "cancelled" => EntryStatus::Cancelled,
                    other => {
                        return Err(CoreError::Validation(format!(
                            "invalid status '{other}' (expected active, completed or cancelled)"
                        )));
                    }
                };
                Ok(Self::Status(status))
            }
            OverridableField::Location => Ok(Self::Location(text_value(cleared, raw))),
            OverridableField::Notes => Ok(Self::Notes(text_value(cleared, raw))),
        }
    }

    #[must_use]
    pub const fn field(&self) -> OverridableField {
        match self {
            Self::ClockIn(_) => OverridableField::ClockIn,
            Self::ClockOut(_) => OverridableField::ClockOut,
            Self::Status(_) => OverridableField::Status,
            Self::Location(_) => OverridableField::Location,
            Self::Notes(_) => OverridableField::Notes,
        }
    }

    /// The new value as it appears in audit snapshots.
    #[must_use]
    pub fn value_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            Self::ClockIn(ts) => Value::String(format_timestamp(ts)),
            Self::ClockOut(ts) => ts
                .as_ref()
                .map_or(Value::Null, |ts| Value::String(format_timestamp(ts))),
            Self::Status(status) => Value::String(status.as_str().to_string()),
            Self::Location(text) | Self::Notes(text) => {
                text.clone().map_or(Value::Null, Value::String)
            }
        }
    }
}

fn parse_timestamp(field: OverridableField, raw: &str) -> Result<DateTime<Utc>, CoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CoreError::Validation(format!("invalid {field} timestamp '{raw}': {e}")))
}

fn text_value(cleared: bool, raw: &str) -> Option<String> {
    if cleared { None } else { Some(raw.to_string()) }
}
