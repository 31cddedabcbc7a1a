//! Employee repository.

use shift_core::clock::format_timestamp;
use shift_core::entities::Employee;
use shift_core::enums::{AuditAction, AuditTable};
use shift_core::ids::PREFIX_EMPLOYEE;

use crate::error::{DatabaseError, ShiftError};
use crate::helpers::{generate_id, parse_datetime};
use crate::repos::audit::{self, AuditRecord};
use crate::service::ShiftService;

const SELECT_COLS: &str = "id, name, department, created_at";

fn row_to_employee(row: &libsql::Row) -> Result<Employee, DatabaseError> {
    Ok(Employee {
        id: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        department: row.get::<String>(2)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn find(conn: &libsql::Connection, id: &str) -> Result<Option<Employee>, DatabaseError> {
    let sql = format!("SELECT {SELECT_COLS} FROM employees WHERE id = ?1");
    let mut rows = conn.query(&sql, [id]).await?;
    rows.next().await?.map(|row| row_to_employee(&row)).transpose()
}

/// # Errors
///
/// Returns `DatabaseError` if the INSERT fails.
pub async fn insert(conn: &libsql::Connection, employee: &Employee) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO employees (id, name, department, created_at) VALUES (?1, ?2, ?3, ?4)",
        libsql::params![
            employee.id.as_str(),
            employee.name.as_str(),
            employee.department.as_str(),
            format_timestamp(&employee.created_at)
        ],
    )
    .await?;
    Ok(())
}

impl ShiftService {
    /// Register a new employee. The INSERT is audited with the new id as actor.
    ///
    /// # Errors
    ///
    /// Returns `ShiftError::Core` for a blank name or department, or
    /// `ShiftError::Database` if the INSERT fails.
    pub async fn register_employee(
        &self,
        name: &str,
        department: &str,
    ) -> Result<Employee, ShiftError> {
        if name.trim().is_empty() || department.trim().is_empty() {
            return Err(shift_core::errors::CoreError::Validation(
                "employee name and department must not be empty".into(),
            )
            .into());
        }

        let now = self.now();
        let uow = self.db().begin().await?;
        let result = async {
            let employee = Employee {
                id: generate_id(&uow, PREFIX_EMPLOYEE).await?,
                name: name.trim().to_string(),
                department: department.trim().to_string(),
                created_at: now,
            };
            insert(&uow, &employee).await?;
            audit::record(
                &uow,
                AuditRecord {
                    table: AuditTable::Employees,
                    record_id: &employee.id,
                    action: AuditAction::Insert,
                    old_values: None,
                    new_values: Some(serde_json::json!({
                        "name": employee.name,
                        "department": employee.department,
                    })),
                    user_id: &employee.id,
                },
                now,
            )
            .await?;
            Ok::<_, ShiftError>(employee)
        }
        .await;
        let employee = uow.finish(result).await?;

        tracing::info!(employee_id = %employee.id, department = %employee.department, "registered employee");
        Ok(employee)
    }

    /// Get an employee by ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the employee does not exist.
    pub async fn get_employee(&self, id: &str) -> Result<Employee, DatabaseError> {
        find(self.db().conn(), id)
            .await?
            .ok_or(DatabaseError::NoResult)
    }

    /// List employees, optionally filtered by department, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_employees(
        &self,
        department: Option<&str>,
        limit: u32,
    ) -> Result<Vec<Employee>, DatabaseError> {
        let mut rows = match department {
            Some(department) => {
                let sql = format!(
                    "SELECT {SELECT_COLS} FROM employees WHERE department = ?1
                     ORDER BY name, id LIMIT ?2"
                );
                self.db()
                    .conn()
                    .query(&sql, libsql::params![department, limit])
                    .await?
            }
            None => {
                let sql = format!("SELECT {SELECT_COLS} FROM employees ORDER BY name, id LIMIT ?1");
                self.db().conn().query(&sql, [limit]).await?
            }
        };

        let mut employees = Vec::new();
        while let Some(row) = rows.next().await? {
            employees.push(row_to_employee(&row)?);
        }
        Ok(employees)
    }
}
