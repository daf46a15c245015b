use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::request::RequestStatus;
use crate::types::{TimesheetEditRequestId, TimesheetWeekId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TimesheetWeek {
    #[schema(value_type = String)]
    pub id: TimesheetWeekId,
    pub emp_code: String,
    /// Always a Monday.
    pub week_start: NaiveDate,
    pub total_hours: f64,
    pub notes: Option<String>,
    pub status: TimesheetStatus,
    pub locked: bool,
    pub submitted_at: Option<DateTime<Utc>>,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TimesheetStatus {
    Draft,
    Submitted,
    ManagerApproved,
    Approved,
    Rejected,
}

impl TimesheetStatus {
    pub fn db_value(&self) -> &'static str {
        match self {
            TimesheetStatus::Draft => "draft",
            TimesheetStatus::Submitted => "submitted",
            TimesheetStatus::ManagerApproved => "manager_approved",
            TimesheetStatus::Approved => "approved",
            TimesheetStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SaveTimesheetWeekPayload {
    #[validate(range(min = 0.0, max = 168.0))]
    pub total_hours: f64,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TimesheetEditRequest {
    #[schema(value_type = String)]
    pub id: TimesheetEditRequestId,
    #[schema(value_type = String)]
    pub week_id: TimesheetWeekId,
    pub emp_code: String,
    pub reason: String,
    pub status: RequestStatus,
    pub decided_by: Option<String>,
    pub decided_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimesheetEditRequest {
    pub fn new(week_id: TimesheetWeekId, emp_code: String, reason: String) -> Self {
        let now = Utc::now();
        Self {
            id: TimesheetEditRequestId::new(),
            week_id,
            emp_code,
            reason,
            status: RequestStatus::Pending,
            decided_by: None,
            decided_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTimesheetEditRequest {
    #[validate(custom(function = "crate::validation::rules::validate_reason"))]
    pub reason: String,
}
