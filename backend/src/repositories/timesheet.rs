//! Timesheet weeks and their edit requests.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgConnection, PgPool};

use crate::error::{conflict_on_unique_violation, AppError};
use crate::models::request::RequestStatus;
use crate::models::timesheet::{TimesheetEditRequest, TimesheetStatus, TimesheetWeek};
use crate::repositories::common::status_values;
use crate::types::{TimesheetEditRequestId, TimesheetWeekId};

const WEEK_COLUMNS: &str = "id, emp_code, week_start, total_hours, notes, status, locked, \
     submitted_at, approved_by, approved_at, created_at, updated_at";

const EDIT_COLUMNS: &str =
    "id, week_id, emp_code, reason, status, decided_by, decided_at, created_at, updated_at";

#[derive(Debug, Default, Clone, Copy)]
pub struct TimesheetRepository;

impl TimesheetRepository {
    pub fn new() -> Self {
        Self
    }

    /// Creates or updates a draft week. Locked or already submitted weeks are a `Conflict`.
    pub async fn save_draft(
        &self,
        db: &PgPool,
        emp_code: &str,
        week_start: NaiveDate,
        total_hours: f64,
        notes: Option<&str>,
    ) -> Result<TimesheetWeek, AppError> {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO timesheet_weeks (id, emp_code, week_start, total_hours, notes, status, locked, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, 'draft', FALSE, $6, $6) \
             ON CONFLICT (emp_code, week_start) DO UPDATE \
             SET total_hours = EXCLUDED.total_hours, notes = EXCLUDED.notes, \
                 status = 'draft', updated_at = EXCLUDED.updated_at \
             WHERE timesheet_weeks.locked = FALSE \
               AND timesheet_weeks.status IN ('draft', 'rejected') \
             RETURNING {WEEK_COLUMNS}"
        );
        sqlx::query_as::<_, TimesheetWeek>(&query)
            .bind(TimesheetWeekId::new())
            .bind(emp_code)
            .bind(week_start)
            .bind(total_hours)
            .bind(notes)
            .bind(now)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::Conflict("Timesheet week is locked".into()))
    }

    pub async fn find_by_week(
        &self,
        db: &PgPool,
        emp_code: &str,
        week_start: NaiveDate,
    ) -> Result<Option<TimesheetWeek>, AppError> {
        let query = format!(
            "SELECT {WEEK_COLUMNS} FROM timesheet_weeks WHERE emp_code = $1 AND week_start = $2"
        );
        Ok(sqlx::query_as::<_, TimesheetWeek>(&query)
            .bind(emp_code)
            .bind(week_start)
            .fetch_optional(db)
            .await?)
    }

    pub async fn find_by_week_for_update(
        &self,
        conn: &mut PgConnection,
        emp_code: &str,
        week_start: NaiveDate,
    ) -> Result<TimesheetWeek, AppError> {
        let query = format!(
            "SELECT {WEEK_COLUMNS} FROM timesheet_weeks \
             WHERE emp_code = $1 AND week_start = $2 FOR UPDATE"
        );
        sqlx::query_as::<_, TimesheetWeek>(&query)
            .bind(emp_code)
            .bind(week_start)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Timesheet week not found".into()))
    }

    pub async fn find_for_update(
        &self,
        conn: &mut PgConnection,
        id: TimesheetWeekId,
    ) -> Result<TimesheetWeek, AppError> {
        let query = format!("SELECT {WEEK_COLUMNS} FROM timesheet_weeks WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, TimesheetWeek>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Timesheet week not found".into()))
    }

    pub async fn list_by_employee(
        &self,
        db: &PgPool,
        emp_code: &str,
    ) -> Result<Vec<TimesheetWeek>, AppError> {
        let query = format!(
            "SELECT {WEEK_COLUMNS} FROM timesheet_weeks WHERE emp_code = $1 ORDER BY week_start DESC"
        );
        Ok(sqlx::query_as::<_, TimesheetWeek>(&query)
            .bind(emp_code)
            .fetch_all(db)
            .await?)
    }

    pub async fn submit(
        &self,
        conn: &mut PgConnection,
        id: TimesheetWeekId,
        at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let affected = sqlx::query(
            "UPDATE timesheet_weeks \
             SET status = 'submitted', locked = TRUE, submitted_at = $1, updated_at = $1 \
             WHERE id = $2 AND locked = FALSE AND status IN ('draft', 'rejected')",
        )
        .bind(at)
        .bind(id)
        .execute(conn)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(AppError::Conflict(
                "Timesheet week is locked or already submitted".into(),
            ));
        }
        Ok(())
    }

    /// Conditional status move that leaves the lock flag alone.
    pub async fn update_status(
        &self,
        conn: &mut PgConnection,
        id: TimesheetWeekId,
        from: TimesheetStatus,
        to: TimesheetStatus,
        at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let affected = sqlx::query(
            "UPDATE timesheet_weeks SET status = $1, updated_at = $2 WHERE id = $3 AND status = $4",
        )
        .bind(to.db_value())
        .bind(at)
        .bind(id)
        .bind(from.db_value())
        .execute(conn)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(AppError::Conflict(
                "Timesheet week not found or already processed".into(),
            ));
        }
        Ok(())
    }

    /// A rejected submission unlocks the week so it can be corrected and resubmitted.
    pub async fn reopen(
        &self,
        conn: &mut PgConnection,
        id: TimesheetWeekId,
        at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let affected = sqlx::query(
            "UPDATE timesheet_weeks SET status = 'rejected', locked = FALSE, updated_at = $1 \
             WHERE id = $2 AND status IN ('submitted', 'manager_approved')",
        )
        .bind(at)
        .bind(id)
        .execute(conn)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(AppError::Conflict(
                "Timesheet week not found or already processed".into(),
            ));
        }
        Ok(())
    }

    /// Final sign-off of a submitted week: approved and locked.
    pub async fn finalize_submission(
        &self,
        conn: &mut PgConnection,
        id: TimesheetWeekId,
        approver_code: &str,
        at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let affected = sqlx::query(
            "UPDATE timesheet_weeks \
             SET status = 'approved', locked = TRUE, approved_by = $1, approved_at = $2, updated_at = $2 \
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
                "Timesheet week not found or already approved".into(),
            ));
        }
        Ok(())
    }

    /// Re-confirms an approved week after an edit request is finalized.
    pub async fn lock_approved(
        &self,
        conn: &mut PgConnection,
        id: TimesheetWeekId,
        approver_code: &str,
        at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let affected = sqlx::query(
            "UPDATE timesheet_weeks \
             SET status = 'approved', locked = TRUE, approved_by = $1, approved_at = $2, updated_at = $2 \
             WHERE id = $3 AND status = 'approved'",
        )
        .bind(approver_code)
        .bind(at)
        .bind(id)
        .execute(conn)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(AppError::Conflict(
                "Timesheet week not found or no longer approved".into(),
            ));
        }
        Ok(())
    }

    pub async fn create_edit_request(
        &self,
        conn: &mut PgConnection,
        item: &TimesheetEditRequest,
    ) -> Result<TimesheetEditRequest, AppError> {
        let query = format!(
            "INSERT INTO timesheet_edit_requests ({EDIT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {EDIT_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, TimesheetEditRequest>(&query)
            .bind(item.id)
            .bind(item.week_id)
            .bind(&item.emp_code)
            .bind(&item.reason)
            .bind(item.status.db_value())
            .bind(&item.decided_by)
            .bind(item.decided_at)
            .bind(item.created_at)
            .bind(item.updated_at)
            .fetch_one(conn)
            .await
            .map_err(|err| {
                conflict_on_unique_violation(err, "An edit request for this week is already awaiting approval")
            })?)
    }

    pub async fn find_edit_request_for_update(
        &self,
        conn: &mut PgConnection,
        id: TimesheetEditRequestId,
    ) -> Result<TimesheetEditRequest, AppError> {
        let query = format!(
            "SELECT {EDIT_COLUMNS} FROM timesheet_edit_requests WHERE id = $1 FOR UPDATE"
        );
        sqlx::query_as::<_, TimesheetEditRequest>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Timesheet edit request not found".into()))
    }

    pub async fn has_open_edit_request(
        &self,
        conn: &mut PgConnection,
        week_id: TimesheetWeekId,
    ) -> Result<bool, AppError> {
        let (exists,) = sqlx::query_as::<_, (bool,)>(
            "SELECT EXISTS ( \
                SELECT 1 FROM timesheet_edit_requests WHERE week_id = $1 AND status = ANY($2) \
            )",
        )
        .bind(week_id)
        .bind(status_values(&[
            RequestStatus::Pending,
            RequestStatus::ManagerApproved,
        ]))
        .fetch_one(conn)
        .await?;
        Ok(exists)
    }

    pub async fn update_edit_request_status(
        &self,
        conn: &mut PgConnection,
        id: TimesheetEditRequestId,
        from: &[RequestStatus],
        to: RequestStatus,
        decided_by: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let affected = sqlx::query(
            "UPDATE timesheet_edit_requests \
             SET status = $1, decided_by = COALESCE($2, decided_by), \
                 decided_at = CASE WHEN $2 IS NULL THEN decided_at ELSE $3 END, updated_at = $3 \
             WHERE id = $4 AND status = ANY($5)",
        )
        .bind(to.db_value())
        .bind(decided_by)
        .bind(at)
        .bind(id)
        .bind(status_values(from))
        .execute(conn)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(AppError::Conflict(
                "Timesheet edit request not found or already processed".into(),
            ));
        }
        Ok(())
    }
}
