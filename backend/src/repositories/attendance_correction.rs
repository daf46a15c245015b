use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgConnection, PgPool};

use crate::error::{conflict_on_unique_violation, AppError};
use crate::models::attendance_correction::AttendanceCorrection;
use crate::models::request::RequestStatus;
use crate::repositories::common::status_values;
use crate::types::AttendanceCorrectionId;

const CORRECTION_COLUMNS: &str = "id, emp_code, attendance_date, correction_type, corrected_in, \
     corrected_out, reason, status, approved_by, approved_at, created_at, updated_at";

#[derive(Debug, Default, Clone, Copy)]
pub struct AttendanceCorrectionRepository;

impl AttendanceCorrectionRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create(
        &self,
        conn: &mut PgConnection,
        item: &AttendanceCorrection,
    ) -> Result<AttendanceCorrection, AppError> {
        let query = format!(
            "INSERT INTO attendance_corrections ({CORRECTION_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {CORRECTION_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, AttendanceCorrection>(&query)
            .bind(item.id)
            .bind(&item.emp_code)
            .bind(item.attendance_date)
            .bind(item.correction_type.db_value())
            .bind(item.corrected_in)
            .bind(item.corrected_out)
            .bind(&item.reason)
            .bind(item.status.db_value())
            .bind(&item.approved_by)
            .bind(item.approved_at)
            .bind(item.created_at)
            .bind(item.updated_at)
            .fetch_one(conn)
            .await
            .map_err(|err| {
                conflict_on_unique_violation(err, "A correction for this date is already awaiting approval")
            })?)
    }

    pub async fn find_for_update(
        &self,
        conn: &mut PgConnection,
        id: AttendanceCorrectionId,
    ) -> Result<AttendanceCorrection, AppError> {
        let query = format!(
            "SELECT {CORRECTION_COLUMNS} FROM attendance_corrections WHERE id = $1 FOR UPDATE"
        );
        sqlx::query_as::<_, AttendanceCorrection>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Attendance correction not found".into()))
    }

    pub async fn list_by_employee(
        &self,
        db: &PgPool,
        emp_code: &str,
    ) -> Result<Vec<AttendanceCorrection>, AppError> {
        let query = format!(
            "SELECT {CORRECTION_COLUMNS} FROM attendance_corrections \
             WHERE emp_code = $1 ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, AttendanceCorrection>(&query)
            .bind(emp_code)
            .fetch_all(db)
            .await?)
    }

    /// True when a correction for the same day is still awaiting a decision.
    pub async fn has_open_for_date(
        &self,
        conn: &mut PgConnection,
        emp_code: &str,
        date: NaiveDate,
    ) -> Result<bool, AppError> {
        let (exists,) = sqlx::query_as::<_, (bool,)>(
            "SELECT EXISTS ( \
                SELECT 1 FROM attendance_corrections \
                WHERE emp_code = $1 AND attendance_date = $2 AND status = ANY($3) \
            )",
        )
        .bind(emp_code)
        .bind(date)
        .bind(status_values(&[
            RequestStatus::Pending,
            RequestStatus::ManagerApproved,
        ]))
        .fetch_one(conn)
        .await?;
        Ok(exists)
    }

    pub async fn update_status(
        &self,
        conn: &mut PgConnection,
        id: AttendanceCorrectionId,
        from: &[RequestStatus],
        to: RequestStatus,
        at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let affected = sqlx::query(
            "UPDATE attendance_corrections SET status = $1, updated_at = $2 \
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
                "Attendance correction not found or already processed".into(),
            ));
        }
        Ok(())
    }

    pub async fn approve(
        &self,
        conn: &mut PgConnection,
        id: AttendanceCorrectionId,
        approver_code: &str,
        at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let affected = sqlx::query(
            "UPDATE attendance_corrections \
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
                "Attendance correction not found or already processed".into(),
            ));
        }
        Ok(())
    }
}
