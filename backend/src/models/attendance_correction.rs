use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{attendance::AttendanceStatus, request::RequestStatus};
use crate::types::AttendanceCorrectionId;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AttendanceCorrection {
    #[schema(value_type = String)]
    pub id: AttendanceCorrectionId,
    pub emp_code: String,
    pub attendance_date: NaiveDate,
    pub correction_type: CorrectionType,
    #[schema(value_type = Option<String>)]
    pub corrected_in: Option<NaiveTime>,
    #[schema(value_type = Option<String>)]
    pub corrected_out: Option<NaiveTime>,
    pub reason: String,
    pub status: RequestStatus,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "TEXT", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CorrectionType {
    MissingPunch,
    WrongPunch,
    HalfDay,
    Wfh,
}

impl CorrectionType {
    pub fn db_value(&self) -> &'static str {
        match self {
            CorrectionType::MissingPunch => "MISSING_PUNCH",
            CorrectionType::WrongPunch => "WRONG_PUNCH",
            CorrectionType::HalfDay => "HALF_DAY",
            CorrectionType::Wfh => "WFH",
        }
    }

    /// Attendance status written when the correction is finalized.
    pub fn resulting_status(&self) -> AttendanceStatus {
        match self {
            CorrectionType::MissingPunch | CorrectionType::WrongPunch => AttendanceStatus::Present,
            CorrectionType::HalfDay => AttendanceStatus::HalfDay,
            CorrectionType::Wfh => AttendanceStatus::Wfh,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateAttendanceCorrection {
    pub attendance_date: NaiveDate,
    pub correction_type: CorrectionType,
    #[schema(value_type = Option<String>, example = "09:30:00")]
    pub corrected_in: Option<NaiveTime>,
    #[schema(value_type = Option<String>, example = "13:30:00")]
    pub corrected_out: Option<NaiveTime>,
    #[validate(custom(function = "crate::validation::rules::validate_reason"))]
    pub reason: String,
}

impl CreateAttendanceCorrection {
    /// Per-type punch rules. Returns a message suitable for a 400 response.
    pub fn check_times(&self) -> Result<(), String> {
        let (corrected_in, corrected_out) = (self.corrected_in, self.corrected_out);
        match self.correction_type {
            CorrectionType::MissingPunch if corrected_in.is_none() => {
                return Err("MISSING_PUNCH requires corrected_in".into());
            }
            CorrectionType::WrongPunch if corrected_in.is_none() && corrected_out.is_none() => {
                return Err("WRONG_PUNCH requires corrected_in or corrected_out".into());
            }
            CorrectionType::HalfDay if corrected_in.is_none() || corrected_out.is_none() => {
                return Err("HALF_DAY requires both corrected_in and corrected_out".into());
            }
            CorrectionType::Wfh if corrected_in.is_some() || corrected_out.is_some() => {
                return Err("WFH corrections do not carry punch times".into());
            }
            _ => {}
        }

        if let (Some(start), Some(end)) = (corrected_in, corrected_out) {
            if start >= end {
                return Err("corrected_in must be before corrected_out".into());
            }
        }
        Ok(())
    }
}

impl AttendanceCorrection {
    pub fn new(emp_code: String, payload: &CreateAttendanceCorrection) -> Self {
        let now = Utc::now();
        Self {
            id: AttendanceCorrectionId::new(),
            emp_code,
            attendance_date: payload.attendance_date,
            correction_type: payload.correction_type,
            corrected_in: payload.corrected_in,
            corrected_out: payload.corrected_out,
            reason: payload.reason.trim().to_string(),
            status: RequestStatus::Pending,
            approved_by: None,
            approved_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}
