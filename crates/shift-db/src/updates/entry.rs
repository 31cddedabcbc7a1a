//! Time entry update builder.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use shift_core::entities::TimeEntry;
use shift_core::enums::EntryStatus;
use shift_core::overrides::FieldOverride;

use crate::helpers::timestamp_json;

/// Changed columns of one time entry. `updated_at` is always set on apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeEntryUpdate {
    pub clock_in: Option<DateTime<Utc>>,
    pub clock_out: Option<Option<DateTime<Utc>>>,
    pub status: Option<EntryStatus>,
    pub location: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

impl TimeEntryUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.clock_in.is_none()
            && self.clock_out.is_none()
            && self.status.is_none()
            && self.location.is_none()
            && self.notes.is_none()
    }

    /// The entry as it would look after this update (timestamps aside).
    #[must_use]
    pub fn project(&self, entry: &TimeEntry) -> TimeEntry {
        let mut next = entry.clone();
        if let Some(clock_in) = self.clock_in {
            next.clock_in = Some(clock_in);
        }
        if let Some(clock_out) = self.clock_out {
            next.clock_out = clock_out;
        }
        if let Some(status) = self.status {
            next.status = status;
        }
        if let Some(ref location) = self.location {
            next.location.clone_from(location);
        }
        if let Some(ref notes) = self.notes {
            next.notes.clone_from(notes);
        }
        next
    }

    /// Snapshot of the touched columns as they are on `entry`.
    #[must_use]
    pub fn old_values(&self, entry: &TimeEntry) -> Value {
        let mut map = Map::new();
        if self.clock_in.is_some() {
            map.insert("clock_in".into(), timestamp_json(entry.clock_in.as_ref()));
        }
        if self.clock_out.is_some() {
            map.insert("clock_out".into(), timestamp_json(entry.clock_out.as_ref()));
        }
        if self.status.is_some() {
            map.insert("status".into(), Value::String(entry.status.as_str().into()));
        }
        if self.location.is_some() {
            map.insert("location".into(), text_json(entry.location.as_ref()));
        }
        if self.notes.is_some() {
            map.insert("notes".into(), text_json(entry.notes.as_ref()));
        }
        Value::Object(map)
    }

    /// Snapshot of the touched columns with their new values.
    #[must_use]
    pub fn new_values(&self) -> Value {
        let mut map = Map::new();
        if let Some(ref clock_in) = self.clock_in {
            map.insert("clock_in".into(), timestamp_json(Some(clock_in)));
        }
        if let Some(ref clock_out) = self.clock_out {
            map.insert("clock_out".into(), timestamp_json(clock_out.as_ref()));
        }
        if let Some(status) = self.status {
            map.insert("status".into(), Value::String(status.as_str().into()));
        }
        if let Some(ref location) = self.location {
            map.insert("location".into(), text_json(location.as_ref()));
        }
        if let Some(ref notes) = self.notes {
            map.insert("notes".into(), text_json(notes.as_ref()));
        }
        Value::Object(map)
    }
}

impl From<FieldOverride> for TimeEntryUpdate {
    fn from(value: FieldOverride) -> Self {
        let builder = TimeEntryUpdateBuilder::new();
        match value {
            FieldOverride::ClockIn(ts) => builder.clock_in(ts),
            FieldOverride::ClockOut(ts) => builder.clock_out(ts),
            FieldOverride::Status(status) => builder.status(status),
            FieldOverride::Location(location) => builder.location(location),
            FieldOverride::Notes(notes) => builder.notes(notes),
        }
        .build()
    }
}

fn text_json(text: Option<&String>) -> Value {
    text.map_or(Value::Null, |t| Value::String(t.clone()))
}

#[derive(Debug, Default)]
pub struct TimeEntryUpdateBuilder(TimeEntryUpdate);

impl TimeEntryUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(TimeEntryUpdate::default())
    }

    #[must_use]
    pub fn clock_in(mut self, clock_in: DateTime<Utc>) -> Self {
        self.0.clock_in = Some(clock_in);
        self
    }

    #[must_use]
    pub fn clock_out(mut self, clock_out: Option<DateTime<Utc>>) -> Self {
        self.0.clock_out = Some(clock_out);
        self
    }

    #[must_use]
    pub fn status(mut self, status: EntryStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub fn location(mut self, location: Option<String>) -> Self {
        self.0.location = Some(location);
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.0.notes = Some(notes);
        self
    }

    #[must_use]
    pub fn build(self) -> TimeEntryUpdate {
        self.0
    }
}
