use chrono::Utc;
use sqlx::{PgConnection, PgPool};

use crate::error::AppError;
use crate::models::employee::Employee;

const EMPLOYEE_COLUMNS: &str = "emp_code, full_name, email, role, reporting_manager_emp_code, \
     is_active, created_at, updated_at";

#[derive(Debug, Default, Clone, Copy)]
pub struct EmployeeRepository;

impl EmployeeRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn find_by_code(
        &self,
        db: &PgPool,
        emp_code: &str,
    ) -> Result<Option<Employee>, AppError> {
        let query = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE emp_code = $1");
        Ok(sqlx::query_as::<_, Employee>(&query)
            .bind(emp_code)
            .fetch_optional(db)
            .await?)
    }

    pub async fn find_active(
        &self,
        db: &PgPool,
        emp_code: &str,
    ) -> Result<Option<Employee>, AppError> {
        Ok(self
            .find_by_code(db, emp_code)
            .await?
            .filter(|employee| employee.is_active))
    }

    /// Reads the reporting manager straight from the row; never cached.
    pub async fn reporting_manager_of(
        &self,
        db: &PgPool,
        emp_code: &str,
    ) -> Result<Option<String>, AppError> {
        let row = sqlx::query_as::<_, (Option<String>,)>(
            "SELECT reporting_manager_emp_code FROM employees WHERE emp_code = $1",
        )
        .bind(emp_code)
        .fetch_optional(db)
        .await?;

        match row {
            Some((manager,)) => Ok(manager.filter(|code| !code.trim().is_empty())),
            None => Err(AppError::NotFound(format!("Employee {} not found", emp_code))),
        }
    }

    /// Row lock that serializes one employee's submissions until commit.
    pub async fn lock_for_submission(
        &self,
        conn: &mut PgConnection,
        emp_code: &str,
    ) -> Result<(), AppError> {
        sqlx::query_scalar::<_, String>(
            "SELECT emp_code FROM employees WHERE emp_code = $1 FOR NO KEY UPDATE",
        )
        .bind(emp_code)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", emp_code)))?;
        Ok(())
    }

    pub async fn set_reporting_manager(
        &self,
        db: &PgPool,
        emp_code: &str,
        manager_code: &str,
    ) -> Result<Employee, AppError> {
        let query = format!(
            "UPDATE employees SET reporting_manager_emp_code = $1, updated_at = $2 \
             WHERE emp_code = $3 RETURNING {EMPLOYEE_COLUMNS}"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(manager_code)
            .bind(Utc::now())
            .bind(emp_code)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", emp_code)))
    }
}
