use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::types::AttendanceId;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Attendance {
    #[schema(value_type = String)]
    pub id: AttendanceId,
    pub emp_code: String,
    pub date: NaiveDate,
    #[schema(value_type = Option<String>)]
    pub in_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>)]
    pub out_time: Option<NaiveTime>,
    pub status: AttendanceStatus,
    /// Set once an approved correction has been applied; the row is final afterwards.
    pub correction_locked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "TEXT", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Leave,
    HalfDay,
    Wfh,
}

impl AttendanceStatus {
    pub fn db_value(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "PRESENT",
            AttendanceStatus::Absent => "ABSENT",
            AttendanceStatus::Leave => "LEAVE",
            AttendanceStatus::HalfDay => "HALF_DAY",
            AttendanceStatus::Wfh => "WFH",
        }
    }
}
