use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::error::{conflict_on_unique_violation, AppError};
use crate::models::offboarding::OffboardingRequest;
use crate::models::request::RequestStatus;
use crate::repositories::common::status_values;
use crate::types::OffboardingRequestId;

const OFFBOARDING_COLUMNS: &str = "id, emp_code, resignation_date, requested_lwd, \
     notice_period_days, reason, status, hr_emp_code, approved_at, created_at, updated_at";

#[derive(Debug, Default, Clone, Copy)]
pub struct OffboardingRepository;

impl OffboardingRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create(
        &self,
        conn: &mut PgConnection,
        item: &OffboardingRequest,
    ) -> Result<OffboardingRequest, AppError> {
        let query = format!(
            "INSERT INTO offboarding_requests ({OFFBOARDING_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {OFFBOARDING_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, OffboardingRequest>(&query)
            .bind(item.id)
            .bind(&item.emp_code)
            .bind(item.resignation_date)
            .bind(item.requested_lwd)
            .bind(item.notice_period_days)
            .bind(&item.reason)
            .bind(item.status.db_value())
            .bind(&item.hr_emp_code)
            .bind(item.approved_at)
            .bind(item.created_at)
            .bind(item.updated_at)
            .fetch_one(conn)
            .await
            .map_err(|err| {
                conflict_on_unique_violation(err, "An offboarding request is already in progress")
            })?)
    }

    pub async fn find_by_id(
        &self,
        db: &PgPool,
        id: OffboardingRequestId,
    ) -> Result<OffboardingRequest, AppError> {
        let query = format!("SELECT {OFFBOARDING_COLUMNS} FROM offboarding_requests WHERE id = $1");
        sqlx::query_as::<_, OffboardingRequest>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Offboarding request not found".into()))
    }

    pub async fn has_open_for_employee(
        &self,
        conn: &mut PgConnection,
        emp_code: &str,
    ) -> Result<bool, AppError> {
        let (exists,) = sqlx::query_as::<_, (bool,)>(
            "SELECT EXISTS ( \
                SELECT 1 FROM offboarding_requests WHERE emp_code = $1 AND status = ANY($2) \
            )",
        )
        .bind(emp_code)
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
        id: OffboardingRequestId,
        from: &[RequestStatus],
        to: RequestStatus,
        at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let affected = sqlx::query(
            "UPDATE offboarding_requests SET status = $1, updated_at = $2 \
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
                "Offboarding request not found or already processed".into(),
            ));
        }
        Ok(())
    }

    /// Final HR decision: approved and assigned to the deciding HR/admin.
    pub async fn approve(
        &self,
        conn: &mut PgConnection,
        id: OffboardingRequestId,
        hr_emp_code: &str,
        at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let affected = sqlx::query(
            "UPDATE offboarding_requests \
             SET status = 'approved', hr_emp_code = $1, approved_at = $2, updated_at = $2 \
             WHERE id = $3 AND status = 'manager_approved'",
        )
        .bind(hr_emp_code)
        .bind(at)
        .bind(id)
        .execute(conn)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(AppError::Conflict(
                "Offboarding request not found or already processed".into(),
            ));
        }
        Ok(())
    }
}
