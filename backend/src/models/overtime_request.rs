use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::request::RequestStatus;
use crate::types::OvertimeRequestId;

/// Overtime only needs the reporting manager's sign-off, so it stays outside
/// the two-stage approval ledger.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OvertimeRequest {
    #[schema(value_type = String)]
    pub id: OvertimeRequestId,
    pub emp_code: String,
    /// Manager the request was routed to at submission.
    pub manager_code: String,
    pub work_date: NaiveDate,
    pub hours: f64,
    pub reason: Option<String>,
    pub status: RequestStatus,
    pub decided_by: Option<String>,
    pub decided_at: Option<DateTime<Utc>>,
    pub decision_comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOvertimeRequest {
    pub work_date: NaiveDate,
    #[validate(custom(function = "crate::validation::rules::validate_overtime_hours"))]
    pub hours: f64,
    #[validate(custom(function = "crate::validation::rules::validate_reason"))]
    pub reason: Option<String>,
}

impl OvertimeRequest {
    pub fn new(emp_code: String, manager_code: String, payload: &CreateOvertimeRequest) -> Self {
        let now = Utc::now();
        Self {
            id: OvertimeRequestId::new(),
            emp_code,
            manager_code,
            work_date: payload.work_date,
            hours: payload.hours,
            reason: payload.reason.clone(),
            status: RequestStatus::Pending,
            decided_by: None,
            decided_at: None,
            decision_comment: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn payload(hours: f64) -> CreateOvertimeRequest {
        CreateOvertimeRequest {
            work_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            hours,
            reason: Some("release night".into()),
        }
    }

    #[test]
    fn hours_must_be_positive_and_at_most_a_day() {
        assert!(payload(0.0).validate().is_err());
        assert!(payload(24.5).validate().is_err());
        assert!(payload(2.5).validate().is_ok());
        assert!(payload(24.0).validate().is_ok());
    }
}
