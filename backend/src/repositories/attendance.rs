//! Attendance rows written by approved leave and corrections.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::error::AppError;
use crate::models::attendance::{Attendance, AttendanceStatus};
use crate::types::AttendanceId;

const ATTENDANCE_COLUMNS: &str =
    "id, emp_code, date, in_time, out_time, status, correction_locked, created_at, updated_at";

#[derive(Debug, Default, Clone, Copy)]
pub struct AttendanceRepository;

impl AttendanceRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn find_by_employee_and_date(
        &self,
        db: &PgPool,
        emp_code: &str,
        date: NaiveDate,
    ) -> Result<Option<Attendance>, AppError> {
        let query = format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE emp_code = $1 AND date = $2"
        );
        Ok(sqlx::query_as::<_, Attendance>(&query)
            .bind(emp_code)
            .bind(date)
            .fetch_optional(db)
            .await?)
    }

    pub async fn find_for_update(
        &self,
        conn: &mut PgConnection,
        emp_code: &str,
        date: NaiveDate,
    ) -> Result<Option<Attendance>, AppError> {
        let query = format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance \
             WHERE emp_code = $1 AND date = $2 FOR UPDATE"
        );
        Ok(sqlx::query_as::<_, Attendance>(&query)
            .bind(emp_code)
            .bind(date)
            .fetch_optional(conn)
            .await?)
    }

    /// Marks `date` as a leave day. Rows locked by an applied correction keep
    /// their values; the return value says whether a row was written.
    pub async fn upsert_leave_day(
        &self,
        conn: &mut PgConnection,
        emp_code: &str,
        date: NaiveDate,
        status: AttendanceStatus,
        at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let affected = sqlx::query(
            "INSERT INTO attendance (id, emp_code, date, in_time, out_time, status, correction_locked, created_at, updated_at) \
             VALUES ($1, $2, $3, NULL, NULL, $4, FALSE, $5, $5) \
             ON CONFLICT (emp_code, date) DO UPDATE \
             SET status = EXCLUDED.status, updated_at = EXCLUDED.updated_at \
             WHERE attendance.correction_locked = FALSE",
        )
        .bind(AttendanceId::new())
        .bind(emp_code)
        .bind(date)
        .bind(status.db_value())
        .bind(at)
        .execute(conn)
        .await?
        .rows_affected();
        Ok(affected > 0)
    }

    /// Writes corrected punches and locks the row. `Conflict` if it is already locked.
    pub async fn apply_correction(
        &self,
        conn: &mut PgConnection,
        emp_code: &str,
        date: NaiveDate,
        in_time: Option<NaiveTime>,
        out_time: Option<NaiveTime>,
        status: AttendanceStatus,
        at: DateTime<Utc>,
    ) -> Result<Attendance, AppError> {
        let query = format!(
            "INSERT INTO attendance (id, emp_code, date, in_time, out_time, status, correction_locked, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, TRUE, $7, $7) \
             ON CONFLICT (emp_code, date) DO UPDATE \
             SET in_time = COALESCE(EXCLUDED.in_time, attendance.in_time), \
                 out_time = COALESCE(EXCLUDED.out_time, attendance.out_time), \
                 status = EXCLUDED.status, \
                 correction_locked = TRUE, \
                 updated_at = EXCLUDED.updated_at \
             WHERE attendance.correction_locked = FALSE \
             RETURNING {ATTENDANCE_COLUMNS}"
        );
        sqlx::query_as::<_, Attendance>(&query)
            .bind(AttendanceId::new())
            .bind(emp_code)
            .bind(date)
            .bind(in_time)
            .bind(out_time)
            .bind(status.db_value())
            .bind(at)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| {
                AppError::Conflict("Attendance record is already correction-locked".into())
            })
    }
}
