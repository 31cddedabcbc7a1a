//! Time entry repository.
//!
//! Inserts, dynamic updates, and the lookups the clock service and
//! correction workflow need (open shift, most recent entry).

use chrono::{DateTime, Utc};
use shift_core::clock::format_timestamp;
use shift_core::entities::TimeEntry;

use crate::error::DatabaseError;
use crate::helpers::{get_bool, get_opt_string, optional_timestamp, parse_datetime, parse_enum, parse_optional_datetime};
use crate::service::ShiftService;
use crate::updates::entry::TimeEntryUpdate;

const SELECT_COLS: &str = "id, employee_id, clock_in, clock_out, status, location, notes, \
     is_correction, original_entry_id, created_at, updated_at";

fn row_to_entry(row: &libsql::Row) -> Result<TimeEntry, DatabaseError> {
    Ok(TimeEntry {
        id: row.get::<String>(0)?,
        employee_id: row.get::<String>(1)?,
        clock_in: parse_optional_datetime(get_opt_string(row, 2)?.as_deref())?,
        clock_out: parse_optional_datetime(get_opt_string(row, 3)?.as_deref())?,
        status: parse_enum(&row.get::<String>(4)?)?,
        location: get_opt_string(row, 5)?,
        notes: get_opt_string(row, 6)?,
        is_correction: get_bool(row, 7)?,
        original_entry_id: get_opt_string(row, 8)?,
        created_at: parse_datetime(&row.get::<String>(9)?)?,
        updated_at: parse_datetime(&row.get::<String>(10)?)?,
    })
}

async fn query_one(
    conn: &libsql::Connection,
    sql: &str,
    params: impl libsql::params::IntoParams,
) -> Result<Option<TimeEntry>, DatabaseError> {
    let mut rows = conn.query(sql, params).await?;
    rows.next().await?.map(|row| row_to_entry(&row)).transpose()
}

/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn find(conn: &libsql::Connection, id: &str) -> Result<Option<TimeEntry>, DatabaseError> {
    let sql = format!("SELECT {SELECT_COLS} FROM time_entries WHERE id = ?1");
    query_one(conn, &sql, [id]).await
}

/// Look up an entry only if it belongs to `employee_id`.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn find_owned(
    conn: &libsql::Connection,
    id: &str,
    employee_id: &str,
) -> Result<Option<TimeEntry>, DatabaseError> {
    let sql = format!("SELECT {SELECT_COLS} FROM time_entries WHERE id = ?1 AND employee_id = ?2");
    query_one(conn, &sql, [id, employee_id]).await
}

/// The employee's open shift (active, no clock-out), if any.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn open_shift(
    conn: &libsql::Connection,
    employee_id: &str,
) -> Result<Option<TimeEntry>, DatabaseError> {
    let sql = format!(
        "SELECT {SELECT_COLS} FROM time_entries
         WHERE employee_id = ?1 AND status = 'active' AND clock_out IS NULL
         LIMIT 1"
    );
    query_one(conn, &sql, [employee_id]).await
}

/// The employee's most recently updated non-cancelled entry.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn latest(
    conn: &libsql::Connection,
    employee_id: &str,
) -> Result<Option<TimeEntry>, DatabaseError> {
    let sql = format!(
        "SELECT {SELECT_COLS} FROM time_entries
         WHERE employee_id = ?1 AND status != 'cancelled'
         ORDER BY updated_at DESC, created_at DESC
         LIMIT 1"
    );
    query_one(conn, &sql, [employee_id]).await
}

/// # Errors
///
/// Returns `DatabaseError` if the INSERT fails (including the open-shift
/// and clock-order constraints).
pub async fn insert(conn: &libsql::Connection, entry: &TimeEntry) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO time_entries (id, employee_id, clock_in, clock_out, status, location, notes,
                                   is_correction, original_entry_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        libsql::params![
            entry.id.as_str(),
            entry.employee_id.as_str(),
            optional_timestamp(entry.clock_in.as_ref()),
            optional_timestamp(entry.clock_out.as_ref()),
            entry.status.as_str(),
            entry.location.as_deref(),
            entry.notes.as_deref(),
            i64::from(entry.is_correction),
            entry.original_entry_id.as_deref(),
            format_timestamp(&entry.created_at),
            format_timestamp(&entry.updated_at)
        ],
    )
    .await?;
    Ok(())
}

/// Apply an update with dynamic SET clauses and bump `updated_at`.
///
/// # Errors
///
/// Returns `DatabaseError::NoResult` if no row matched, or `DatabaseError`
/// if the UPDATE fails (including the open-shift and clock-order constraints).
pub async fn update(
    conn: &libsql::Connection,
    id: &str,
    update: &TimeEntryUpdate,
    now: DateTime<Utc>,
) -> Result<(), DatabaseError> {
    let mut sets = Vec::new();
    let mut params: Vec<libsql::Value> = Vec::new();

    if let Some(ref clock_in) = update.clock_in {
        params.push(libsql::Value::Text(format_timestamp(clock_in)));
        sets.push(format!("clock_in = ?{}", params.len()));
    }
    if let Some(ref clock_out) = update.clock_out {
        params.push(text_or_null(optional_timestamp(clock_out.as_ref())));
        sets.push(format!("clock_out = ?{}", params.len()));
    }
    if let Some(status) = update.status {
        params.push(libsql::Value::Text(status.as_str().to_string()));
        sets.push(format!("status = ?{}", params.len()));
    }
    if let Some(ref location) = update.location {
        params.push(text_or_null(location.clone()));
        sets.push(format!("location = ?{}", params.len()));
    }
    if let Some(ref notes) = update.notes {
        params.push(text_or_null(notes.clone()));
        sets.push(format!("notes = ?{}", params.len()));
    }

    params.push(libsql::Value::Text(format_timestamp(&now)));
    sets.push(format!("updated_at = ?{}", params.len()));

    params.push(libsql::Value::Text(id.to_string()));
    let sql = format!(
        "UPDATE time_entries SET {} WHERE id = ?{}",
        sets.join(", "),
        params.len()
    );

    let changed = conn.execute(&sql, libsql::params_from_iter(params)).await?;
    if changed == 0 {
        return Err(DatabaseError::NoResult);
    }
    Ok(())
}

fn text_or_null(value: Option<String>) -> libsql::Value {
    value.map_or(libsql::Value::Null, libsql::Value::Text)
}

impl ShiftService {
    /// Get a time entry by ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the entry does not exist.
    pub async fn get_time_entry(&self, id: &str) -> Result<TimeEntry, DatabaseError> {
        find(self.db().conn(), id).await?.ok_or(DatabaseError::NoResult)
    }

    /// The employee's open shift, if any.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn open_shift(&self, employee_id: &str) -> Result<Option<TimeEntry>, DatabaseError> {
        open_shift(self.db().conn(), employee_id).await
    }

    /// List an employee's entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_entries(
        &self,
        employee_id: &str,
        limit: u32,
    ) -> Result<Vec<TimeEntry>, DatabaseError> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM time_entries WHERE employee_id = ?1
             ORDER BY created_at DESC, rowid DESC LIMIT ?2"
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params![employee_id, limit])
            .await?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_entry(&row)?);
        }
        Ok(entries)
    }
}
