use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::request::RequestStatus;
use crate::types::LeaveRequestId;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeaveRequest {
    #[schema(value_type = String)]
    pub id: LeaveRequestId,
    pub emp_code: String,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub partial_mode: PartialMode,
    /// Fixed at submission; finalization debits exactly this amount.
    pub leave_days: f64,
    pub reason: Option<String>,
    pub status: RequestStatus,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "TEXT", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum LeaveType {
    /// Sick leave
    Sl,
    /// Casual leave
    Cl,
    /// Annual leave
    Al,
    /// Other leave
    Ol,
}

impl LeaveType {
    pub fn db_value(&self) -> &'static str {
        match self {
            LeaveType::Sl => "SL",
            LeaveType::Cl => "CL",
            LeaveType::Al => "AL",
            LeaveType::Ol => "OL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema, Default)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PartialMode {
    #[default]
    Full,
    Half,
}

impl PartialMode {
    pub fn db_value(&self) -> &'static str {
        match self {
            PartialMode::Full => "full",
            PartialMode::Half => "half",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateLeaveRequest {
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub partial_mode: PartialMode,
    #[validate(custom(function = "crate::validation::rules::validate_reason"))]
    pub reason: Option<String>,
}

/// Days charged against the balance: half a day for a half-day leave, otherwise
/// every calendar day in the inclusive range.
pub fn leave_days(start: NaiveDate, end: NaiveDate, mode: PartialMode) -> Result<f64, String> {
    if end < start {
        return Err("end_date must be on or after start_date".into());
    }
    match mode {
        PartialMode::Half if start != end => {
            Err("Half-day leave must start and end on the same date".into())
        }
        PartialMode::Half => Ok(0.5),
        PartialMode::Full => Ok(((end - start).num_days() + 1) as f64),
    }
}

impl LeaveRequest {
    pub fn new(
        emp_code: String,
        payload: &CreateLeaveRequest,
        leave_days: f64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: LeaveRequestId::new(),
            emp_code,
            leave_type: payload.leave_type,
            start_date: payload.start_date,
            end_date: payload.end_date,
            partial_mode: payload.partial_mode,
            leave_days,
            reason: payload.reason.clone(),
            status: RequestStatus::Pending,
            approved_by: None,
            approved_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeaveBalance {
    pub emp_code: String,
    pub leave_type: LeaveType,
    pub year: i32,
    pub balance: f64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpsertLeaveBalancePayload {
    #[validate(length(min = 1, max = 64))]
    pub emp_code: String,
    pub leave_type: LeaveType,
    #[validate(range(min = 2000, max = 2100))]
    pub year: i32,
    #[validate(range(min = 0.0, max = 366.0))]
    pub balance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn leave_type_uses_short_codes() {
        let lt: LeaveType = serde_json::from_str("\"CL\"").unwrap();
        assert_eq!(lt, LeaveType::Cl);
        assert_eq!(serde_json::to_value(LeaveType::Al).unwrap(), serde_json::json!("AL"));
    }

    #[test]
    fn full_day_leave_counts_calendar_days() {
        assert_eq!(leave_days(date(2024, 12, 25), date(2024, 12, 25), PartialMode::Full), Ok(1.0));
        // weekends and holidays inside the range are still counted
        assert_eq!(leave_days(date(2024, 6, 7), date(2024, 6, 10), PartialMode::Full), Ok(4.0));
    }

    #[test]
    fn half_day_leave_is_half_and_single_date_only() {
        assert_eq!(leave_days(date(2024, 6, 3), date(2024, 6, 3), PartialMode::Half), Ok(0.5));
        assert!(leave_days(date(2024, 6, 3), date(2024, 6, 4), PartialMode::Half).is_err());
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(leave_days(date(2024, 6, 4), date(2024, 6, 3), PartialMode::Full).is_err());
    }

    #[test]
    fn partial_mode_defaults_to_full_when_omitted() {
        let payload: CreateLeaveRequest = serde_json::from_value(serde_json::json!({
            "leave_type": "SL",
            "start_date": "2024-06-03",
            "end_date": "2024-06-03"
        }))
        .unwrap();
        assert_eq!(payload.partial_mode, PartialMode::Full);
    }
}
