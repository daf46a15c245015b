use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::request::RequestStatus;
use crate::types::OffboardingRequestId;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OffboardingRequest {
    #[schema(value_type = String)]
    pub id: OffboardingRequestId,
    pub emp_code: String,
    pub resignation_date: NaiveDate,
    /// Requested last working day.
    pub requested_lwd: NaiveDate,
    pub notice_period_days: i32,
    pub reason: String,
    pub status: RequestStatus,
    /// HR/admin who finalized the exit.
    pub hr_emp_code: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOffboardingRequest {
    /// Defaults to today in the configured time zone.
    pub resignation_date: Option<NaiveDate>,
    pub requested_lwd: NaiveDate,
    #[validate(custom(function = "crate::validation::rules::validate_reason"))]
    pub reason: String,
}

impl OffboardingRequest {
    pub fn new(
        emp_code: String,
        resignation_date: NaiveDate,
        requested_lwd: NaiveDate,
        reason: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: OffboardingRequestId::new(),
            emp_code,
            resignation_date,
            requested_lwd,
            notice_period_days: (requested_lwd - resignation_date).num_days() as i32,
            reason,
            status: RequestStatus::Pending,
            hr_emp_code: None,
            approved_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}
