//! Audit log repository.
//!
//! Append-only entries recording every mutation, written inside the caller's
//! transaction. Supports dynamic filtering and JSONL export.

use std::path::Path;

use chrono::{DateTime, Utc};
use shift_core::clock::format_timestamp;
use shift_core::entities::AuditLogEntry;
use shift_core::enums::{AuditAction, AuditTable};
use shift_core::ids::PREFIX_AUDIT;

use crate::error::DatabaseError;
use crate::helpers::{generate_id, get_opt_string, parse_datetime, parse_enum, parse_optional_json};
use crate::service::ShiftService;

/// One mutation to record.
#[derive(Debug, Clone)]
pub struct AuditRecord<'a> {
    pub table: AuditTable,
    pub record_id: &'a str,
    pub action: AuditAction,
    pub old_values: Option<serde_json::Value>,
    pub new_values: Option<serde_json::Value>,
    pub user_id: &'a str,
}

/// Filter criteria for audit queries.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub table: Option<AuditTable>,
    pub record_id: Option<String>,
    pub action: Option<AuditAction>,
    pub user_id: Option<String>,
    pub limit: Option<u32>,
}

const SELECT_COLS: &str =
    "id, table_name, record_id, action, old_values, new_values, user_id, timestamp";

fn row_to_audit(row: &libsql::Row) -> Result<AuditLogEntry, DatabaseError> {
    Ok(AuditLogEntry {
        id: row.get::<String>(0)?,
        table_name: parse_enum(&row.get::<String>(1)?)?,
        record_id: row.get::<String>(2)?,
        action: parse_enum(&row.get::<String>(3)?)?,
        old_values: parse_optional_json(get_opt_string(row, 4)?.as_deref())?,
        new_values: parse_optional_json(get_opt_string(row, 5)?.as_deref())?,
        user_id: row.get::<String>(6)?,
        timestamp: parse_datetime(&row.get::<String>(7)?)?,
    })
}

/// Append one audit entry stamped with `at`.
///
/// # Errors
///
/// Returns `DatabaseError` if the INSERT fails; the enclosing unit of work
/// then rolls back the mutation being audited.
pub async fn record(
    conn: &libsql::Connection,
    entry: AuditRecord<'_>,
    at: DateTime<Utc>,
) -> Result<AuditLogEntry, DatabaseError> {
    let id = generate_id(conn, PREFIX_AUDIT).await?;
    let old_json = entry.old_values.as_ref().map(ToString::to_string);
    let new_json = entry.new_values.as_ref().map(ToString::to_string);

    conn.execute(
        "INSERT INTO audit_logs (id, table_name, record_id, action, old_values, new_values, user_id, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        libsql::params![
            id.as_str(),
            entry.table.as_str(),
            entry.record_id,
            entry.action.as_str(),
            old_json.as_deref(),
            new_json.as_deref(),
            entry.user_id,
            format_timestamp(&at)
        ],
    )
    .await?;

    Ok(AuditLogEntry {
        id,
        table_name: entry.table,
        record_id: entry.record_id.to_string(),
        action: entry.action,
        old_values: entry.old_values,
        new_values: entry.new_values,
        user_id: entry.user_id.to_string(),
        timestamp: at,
    })
}

/// Query audit entries, newest first.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn query(
    conn: &libsql::Connection,
    filter: &AuditFilter,
) -> Result<Vec<AuditLogEntry>, DatabaseError> {
    let mut conditions = Vec::new();
    let mut params: Vec<libsql::Value> = Vec::new();

    if let Some(ref table) = filter.table {
        params.push(libsql::Value::Text(table.as_str().to_string()));
        conditions.push(format!("table_name = ?{}", params.len()));
    }
    if let Some(ref record_id) = filter.record_id {
        params.push(libsql::Value::Text(record_id.clone()));
        conditions.push(format!("record_id = ?{}", params.len()));
    }
    if let Some(ref action) = filter.action {
        params.push(libsql::Value::Text(action.as_str().to_string()));
        conditions.push(format!("action = ?{}", params.len()));
    }
    if let Some(ref user_id) = filter.user_id {
        params.push(libsql::Value::Text(user_id.clone()));
        conditions.push(format!("user_id = ?{}", params.len()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    let limit_clause = filter
        .limit
        .map_or_else(String::new, |limit| format!("LIMIT {limit}"));

    let sql = format!(
        "SELECT {SELECT_COLS} FROM audit_logs {where_clause}
         ORDER BY timestamp DESC, rowid DESC {limit_clause}"
    );

    let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
    let mut entries = Vec::new();
    while let Some(row) = rows.next().await? {
        entries.push(row_to_audit(&row)?);
    }
    Ok(entries)
}

impl ShiftService {
    /// Query audit entries with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn query_audit(&self, filter: &AuditFilter) -> Result<Vec<AuditLogEntry>, DatabaseError> {
        query(self.db().conn(), filter).await
    }

    /// Write matching audit entries to `path` as JSON lines, oldest first.
    ///
    /// Replaces any existing file. Returns the number of entries written.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query or the file write fails.
    pub async fn export_audit_jsonl(
        &self,
        path: &Path,
        filter: &AuditFilter,
    ) -> Result<usize, DatabaseError> {
        let mut entries = self.query_audit(filter).await?;
        entries.reverse();
        serde_jsonlines::write_json_lines(path, &entries)
            .map_err(|e| DatabaseError::Other(e.into()))?;
        tracing::info!(path = %path.display(), count = entries.len(), "exported audit log");
        Ok(entries.len())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::ShiftDb;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, minute, 0).unwrap()
    }

    async fn seed(db: &ShiftDb) {
        record(
            db.conn(),
            AuditRecord {
                table: AuditTable::TimeEntries,
                record_id: "ent-1",
                action: AuditAction::Insert,
                old_values: None,
                new_values: Some(json!({"status": "active"})),
                user_id: "emp-1",
            },
            at(0),
        )
        .await
        .unwrap();
        record(
            db.conn(),
            AuditRecord {
                table: AuditTable::TimeEntries,
                record_id: "ent-1",
                action: AuditAction::Update,
                old_values: Some(json!({"status": "active"})),
                new_values: Some(json!({"status": "completed"})),
                user_id: "emp-1",
            },
            at(5),
        )
        .await
        .unwrap();
        record(
            db.conn(),
            AuditRecord {
                table: AuditTable::CorrectionRequests,
                record_id: "cor-1",
                action: AuditAction::Insert,
                old_values: None,
                new_values: Some(json!({"status": "pending"})),
                user_id: "emp-2",
            },
            at(10),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn query_is_newest_first_and_filterable() {
        let db = ShiftDb::open_local(":memory:").await.unwrap();
        seed(&db).await;

        let all = query(db.conn(), &AuditFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].record_id, "cor-1");
        assert_eq!(all[2].action, AuditAction::Insert);

        let filter = AuditFilter {
            record_id: Some("ent-1".into()),
            action: Some(AuditAction::Update),
            ..AuditFilter::default()
        };
        let updates = query(db.conn(), &filter).await.unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].old_values, Some(json!({"status": "active"})));
        assert_eq!(updates[0].new_values, Some(json!({"status": "completed"})));

        let by_user = AuditFilter {
            user_id: Some("emp-2".into()),
            limit: Some(10),
            ..AuditFilter::default()
        };
        assert_eq!(query(db.conn(), &by_user).await.unwrap().len(), 1);

        let limited = AuditFilter {
            table: Some(AuditTable::TimeEntries),
            limit: Some(1),
            ..AuditFilter::default()
        };
        let latest = query(db.conn(), &limited).await.unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].timestamp, at(5));
    }
}
