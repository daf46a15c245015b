use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::overtime_request::OvertimeRequest;
use crate::models::request::RequestStatus;
use crate::types::OvertimeRequestId;

const OVERTIME_COLUMNS: &str = "id, emp_code, manager_code, work_date, hours, reason, status, \
     decided_by, decided_at, decision_comment, created_at, updated_at";

#[derive(Debug, Default, Clone, Copy)]
pub struct OvertimeRequestRepository;

impl OvertimeRequestRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create(
        &self,
        db: &PgPool,
        item: &OvertimeRequest,
    ) -> Result<OvertimeRequest, AppError> {
        let query = format!(
            "INSERT INTO overtime_requests ({OVERTIME_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {OVERTIME_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, OvertimeRequest>(&query)
            .bind(item.id)
            .bind(&item.emp_code)
            .bind(&item.manager_code)
            .bind(item.work_date)
            .bind(item.hours)
            .bind(&item.reason)
            .bind(item.status.db_value())
            .bind(&item.decided_by)
            .bind(item.decided_at)
            .bind(&item.decision_comment)
            .bind(item.created_at)
            .bind(item.updated_at)
            .fetch_one(db)
            .await?)
    }

    pub async fn find_by_id(
        &self,
        db: &PgPool,
        id: OvertimeRequestId,
    ) -> Result<OvertimeRequest, AppError> {
        let query = format!("SELECT {OVERTIME_COLUMNS} FROM overtime_requests WHERE id = $1");
        sqlx::query_as::<_, OvertimeRequest>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Overtime request not found".into()))
    }

    pub async fn list_by_employee(
        &self,
        db: &PgPool,
        emp_code: &str,
    ) -> Result<Vec<OvertimeRequest>, AppError> {
        let query = format!(
            "SELECT {OVERTIME_COLUMNS} FROM overtime_requests WHERE emp_code = $1 \
             ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, OvertimeRequest>(&query)
            .bind(emp_code)
            .fetch_all(db)
            .await?)
    }

    /// Pending overtime of employees currently reporting to `manager_code`.
    pub async fn list_pending_for_manager(
        &self,
        db: &PgPool,
        manager_code: &str,
    ) -> Result<Vec<OvertimeRequest>, AppError> {
        let query = "SELECT o.id, o.emp_code, o.manager_code, o.work_date, o.hours, o.reason, \
                o.status, o.decided_by, o.decided_at, o.decision_comment, o.created_at, o.updated_at \
            FROM overtime_requests o \
            JOIN employees e ON e.emp_code = o.emp_code \
            WHERE o.status = 'pending' AND e.reporting_manager_emp_code = $1 \
            ORDER BY o.created_at ASC";
        Ok(sqlx::query_as::<_, OvertimeRequest>(query)
            .bind(manager_code)
            .fetch_all(db)
            .await?)
    }

    /// Records the manager's decision on a still-pending request.
    pub async fn decide(
        &self,
        db: &PgPool,
        id: OvertimeRequestId,
        to: RequestStatus,
        manager_code: &str,
        comment: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<OvertimeRequest, AppError> {
        let query = format!(
            "UPDATE overtime_requests \
             SET status = $1, decided_by = $2, decided_at = $3, decision_comment = $4, updated_at = $3 \
             WHERE id = $5 AND status = 'pending' \
             RETURNING {OVERTIME_COLUMNS}"
        );
        sqlx::query_as::<_, OvertimeRequest>(&query)
            .bind(to.db_value())
            .bind(manager_code)
            .bind(at)
            .bind(comment)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::Conflict("Request not found or already processed".into()))
    }
}
