//! Leave requests and leave balances.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgConnection, PgPool};

use crate::error::AppError;
use crate::models::leave_request::{LeaveBalance, LeaveRequest, LeaveType};
use crate::models::request::RequestStatus;
use crate::repositories::common::status_values;
use crate::types::LeaveRequestId;

const LEAVE_COLUMNS: &str = "id, emp_code, leave_type, start_date, end_date, partial_mode, \
     leave_days, reason, status, approved_by, approved_at, created_at, updated_at";

#[derive(Debug, Default, Clone, Copy)]
pub struct LeaveRequestRepository;

impl LeaveRequestRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create(
        &self,
        conn: &mut PgConnection,
        item: &LeaveRequest,
    ) -> Result<LeaveRequest, AppError> {
        let query = format!(
            "INSERT INTO leave_requests ({LEAVE_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {LEAVE_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, LeaveRequest>(&query)
            .bind(item.id)
            .bind(&item.emp_code)
            .bind(item.leave_type.db_value())
            .bind(item.start_date)
            .bind(item.end_date)
            .bind(item.partial_mode.db_value())
            .bind(item.leave_days)
            .bind(&item.reason)
            .bind(item.status.db_value())
            .bind(&item.approved_by)
            .bind(item.approved_at)
            .bind(item.created_at)
            .bind(item.updated_at)
            .fetch_one(conn)
            .await?)
    }

    pub async fn find_for_update(
        &self,
        conn: &mut PgConnection,
        id: LeaveRequestId,
    ) -> Result<LeaveRequest, AppError> {
        let query = format!("SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, LeaveRequest>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Leave request not found".into()))
    }

    /// True when an open or approved leave of `emp_code` intersects the range.
    pub async fn has_overlap(
        &self,
        conn: &mut PgConnection,
        emp_code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<bool, AppError> {
        let statuses = status_values(&[
            RequestStatus::Pending,
            RequestStatus::ManagerApproved,
            RequestStatus::Approved,
        ]);
        let (exists,) = sqlx::query_as::<_, (bool,)>(
            "SELECT EXISTS ( \
                SELECT 1 FROM leave_requests \
                WHERE emp_code = $1 AND start_date <= $3 AND end_date >= $2 \
                  AND status = ANY($4) \
            )",
        )
        .bind(emp_code)
        .bind(start_date)
        .bind(end_date)
        .bind(&statuses)
        .fetch_one(conn)
        .await?;
        Ok(exists)
    }

    /// Conditional status move; `Conflict` when the row is no longer in one of `from`.
    pub async fn update_status(
        &self,
        conn: &mut PgConnection,
        id: LeaveRequestId,
        from: &[RequestStatus],
        to: RequestStatus,
        at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let affected = sqlx::query(
            "UPDATE leave_requests SET status = $1, updated_at = $2 \
             WHERE id = $3 AND status = ANY($4)",
        )
        .bind(to.db_value())
        .bind(at)
        .bind(id)
        .bind(status_values(from))
        .execute(conn)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(AppError::Conflict(
                "Leave request not found or already processed".into(),
            ));
        }
        Ok(())
    }

    pub async fn approve(
        &self,
        conn: &mut PgConnection,
        id: LeaveRequestId,
        approver_code: &str,
        at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let affected = sqlx::query(
            "UPDATE leave_requests \
             SET status = 'approved', approved_by = $1, approved_at = $2, updated_at = $2 \
             WHERE id = $3 AND status = 'manager_approved'",
        )
        .bind(approver_code)
        .bind(at)
        .bind(id)
        .execute(conn)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(AppError::Conflict(
                "Leave request not found or already processed".into(),
            ));
        }
        Ok(())
    }
}

const BALANCE_COLUMNS: &str = "emp_code, leave_type, year, balance, updated_at";

#[derive(Debug, Default, Clone, Copy)]
pub struct LeaveBalanceRepository;

impl LeaveBalanceRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn find(
        &self,
        conn: &mut PgConnection,
        emp_code: &str,
        leave_type: LeaveType,
        year: i32,
    ) -> Result<Option<LeaveBalance>, AppError> {
        let query = format!(
            "SELECT {BALANCE_COLUMNS} FROM leave_balances \
             WHERE emp_code = $1 AND leave_type = $2 AND year = $3"
        );
        Ok(sqlx::query_as::<_, LeaveBalance>(&query)
            .bind(emp_code)
            .bind(leave_type.db_value())
            .bind(year)
            .fetch_optional(conn)
            .await?)
    }

    pub async fn list_for_employee(
        &self,
        db: &PgPool,
        emp_code: &str,
    ) -> Result<Vec<LeaveBalance>, AppError> {
        let query = format!(
            "SELECT {BALANCE_COLUMNS} FROM leave_balances WHERE emp_code = $1 \
             ORDER BY year DESC, leave_type ASC"
        );
        Ok(sqlx::query_as::<_, LeaveBalance>(&query)
            .bind(emp_code)
            .fetch_all(db)
            .await?)
    }

    pub async fn upsert(
        &self,
        db: &PgPool,
        emp_code: &str,
        leave_type: LeaveType,
        year: i32,
        balance: f64,
    ) -> Result<LeaveBalance, AppError> {
        let query = format!(
            "INSERT INTO leave_balances (emp_code, leave_type, year, balance, updated_at) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (emp_code, leave_type, year) \
             DO UPDATE SET balance = EXCLUDED.balance, updated_at = EXCLUDED.updated_at \
             RETURNING {BALANCE_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, LeaveBalance>(&query)
            .bind(emp_code)
            .bind(leave_type.db_value())
            .bind(year)
            .bind(balance)
            .bind(Utc::now())
            .fetch_one(db)
            .await?)
    }

    /// Subtracts `days` only if the balance still covers it.
    pub async fn debit(
        &self,
        conn: &mut PgConnection,
        emp_code: &str,
        leave_type: LeaveType,
        year: i32,
        days: f64,
    ) -> Result<(), AppError> {
        let affected = sqlx::query(
            "UPDATE leave_balances SET balance = balance - $1, updated_at = $2 \
             WHERE emp_code = $3 AND leave_type = $4 AND year = $5 AND balance >= $1",
        )
        .bind(days)
        .bind(Utc::now())
        .bind(emp_code)
        .bind(leave_type.db_value())
        .bind(year)
        .execute(conn)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(AppError::Conflict(
                "Leave balance no longer covers this request".into(),
            ));
        }
        Ok(())
    }
}
