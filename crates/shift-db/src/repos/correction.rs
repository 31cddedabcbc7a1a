//! Correction request repository.

use chrono::{DateTime, Utc};
use serde::Serialize;
use shift_core::clock::format_timestamp;
use shift_core::entities::CorrectionRequest;
use shift_core::enums::CorrectionStatus;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, optional_timestamp, parse_datetime, parse_enum, parse_optional_datetime};
use crate::service::ShiftService;

const SELECT_COLS: &str = "cr.id, cr.time_entry_id, cr.employee_id, cr.correction_type, \
     cr.original_time, cr.requested_time, cr.reason, cr.status, cr.approved_by, cr.approved_at, \
     cr.review_note, cr.created_at";

/// A pending request joined with what a reviewer needs to decide on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingCorrection {
    #[serde(flatten)]
    pub request: CorrectionRequest,
    pub employee_name: String,
    pub department: String,
    pub entry_clock_in: Option<DateTime<Utc>>,
    pub entry_clock_out: Option<DateTime<Utc>>,
}

fn row_to_correction(row: &libsql::Row) -> Result<CorrectionRequest, DatabaseError> {
    Ok(CorrectionRequest {
        id: row.get::<String>(0)?,
        time_entry_id: row.get::<String>(1)?,
        employee_id: row.get::<String>(2)?,
        correction_type: parse_enum(&row.get::<String>(3)?)?,
        original_time: parse_optional_datetime(get_opt_string(row, 4)?.as_deref())?,
        requested_time: parse_optional_datetime(get_opt_string(row, 5)?.as_deref())?,
        reason: row.get::<String>(6)?,
        status: parse_enum(&row.get::<String>(7)?)?,
        approved_by: get_opt_string(row, 8)?,
        approved_at: parse_optional_datetime(get_opt_string(row, 9)?.as_deref())?,
        review_note: get_opt_string(row, 10)?,
        created_at: parse_datetime(&row.get::<String>(11)?)?,
    })
}

/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn find(
    conn: &libsql::Connection,
    id: &str,
) -> Result<Option<CorrectionRequest>, DatabaseError> {
    let sql = format!("SELECT {SELECT_COLS} FROM correction_requests cr WHERE cr.id = ?1");
    let mut rows = conn.query(&sql, [id]).await?;
    rows.next().await?.map(|row| row_to_correction(&row)).transpose()
}

/// The pending request for an entry, if one exists.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn pending_for_entry(
    conn: &libsql::Connection,
    time_entry_id: &str,
) -> Result<Option<CorrectionRequest>, DatabaseError> {
    let sql = format!(
        "SELECT {SELECT_COLS} FROM correction_requests cr
         WHERE cr.time_entry_id = ?1 AND cr.status = 'pending'"
    );
    let mut rows = conn.query(&sql, [time_entry_id]).await?;
    rows.next().await?.map(|row| row_to_correction(&row)).transpose()
}

/// # Errors
///
/// Returns `DatabaseError` if the INSERT fails (including the one-pending
/// constraint).
pub async fn insert(
    conn: &libsql::Connection,
    request: &CorrectionRequest,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO correction_requests (id, time_entry_id, employee_id, correction_type,
                                          original_time, requested_time, reason, status,
                                          approved_by, approved_at, review_note, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        libsql::params![
            request.id.as_str(),
            request.time_entry_id.as_str(),
            request.employee_id.as_str(),
            request.correction_type.as_str(),
            optional_timestamp(request.original_time.as_ref()),
            optional_timestamp(request.requested_time.as_ref()),
            request.reason.as_str(),
            request.status.as_str(),
            request.approved_by.as_deref(),
            optional_timestamp(request.approved_at.as_ref()),
            request.review_note.as_deref(),
            format_timestamp(&request.created_at)
        ],
    )
    .await?;
    Ok(())
}

/// Move a pending request to `status`, recording the reviewer.
///
/// Returns `false` if the request was not pending (or does not exist).
///
/// # Errors
///
/// Returns `DatabaseError` if the UPDATE fails.
pub async fn close(
    conn: &libsql::Connection,
    id: &str,
    status: CorrectionStatus,
    reviewer: &str,
    at: DateTime<Utc>,
    review_note: Option<&str>,
) -> Result<bool, DatabaseError> {
    let changed = conn
        .execute(
            "UPDATE correction_requests
             SET status = ?1, approved_by = ?2, approved_at = ?3, review_note = ?4
             WHERE id = ?5 AND status = 'pending'",
            libsql::params![
                status.as_str(),
                reviewer,
                format_timestamp(&at),
                review_note,
                id
            ],
        )
        .await?;
    Ok(changed == 1)
}

impl ShiftService {
    /// Get a correction request by ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the request does not exist.
    pub async fn get_correction(&self, id: &str) -> Result<CorrectionRequest, DatabaseError> {
        find(self.db().conn(), id).await?.ok_or(DatabaseError::NoResult)
    }

    /// Pending requests, oldest first, optionally limited to one department.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_pending_corrections(
        &self,
        department: Option<&str>,
        limit: u32,
    ) -> Result<Vec<PendingCorrection>, DatabaseError> {
        let base = format!(
            "SELECT {SELECT_COLS}, e.name, e.department, te.clock_in, te.clock_out
             FROM correction_requests cr
             JOIN employees e ON e.id = cr.employee_id
             JOIN time_entries te ON te.id = cr.time_entry_id
             WHERE cr.status = 'pending'"
        );
        let mut rows = match department {
            Some(department) => {
                let sql = format!("{base} AND e.department = ?1 ORDER BY cr.created_at, cr.rowid LIMIT ?2");
                self.db()
                    .conn()
                    .query(&sql, libsql::params![department, limit])
                    .await?
            }
            None => {
                let sql = format!("{base} ORDER BY cr.created_at, cr.rowid LIMIT ?1");
                self.db().conn().query(&sql, [limit]).await?
            }
        };

        let mut pending = Vec::new();
        while let Some(row) = rows.next().await? {
            pending.push(PendingCorrection {
                request: row_to_correction(&row)?,
                employee_name: row.get::<String>(12)?,
                department: row.get::<String>(13)?,
                entry_clock_in: parse_optional_datetime(get_opt_string(&row, 14)?.as_deref())?,
                entry_clock_out: parse_optional_datetime(get_opt_string(&row, 15)?.as_deref())?,
            });
        }
        Ok(pending)
    }

    /// An employee's correction requests in any status, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn correction_history(
        &self,
        employee_id: &str,
        limit: u32,
    ) -> Result<Vec<CorrectionRequest>, DatabaseError> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM correction_requests cr
             WHERE cr.employee_id = ?1
             ORDER BY cr.created_at DESC, cr.rowid DESC LIMIT ?2"
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params![employee_id, limit])
            .await?;

        let mut requests = Vec::new();
        while let Some(row) = rows.next().await? {
            requests.push(row_to_correction(&row)?);
        }
        Ok(requests)
    }
}
