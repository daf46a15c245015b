use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::types::HolidayId;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Holiday {
    #[schema(value_type = String)]
    pub id: HolidayId,
    pub holiday_date: NaiveDate,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Holiday {
    pub fn new(holiday_date: NaiveDate, name: String, description: Option<String>) -> Self {
        Self {
            id: HolidayId::new(),
            holiday_date,
            name,
            description,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WeeklyOff {
    /// 0 = Monday .. 6 = Sunday.
    pub weekday: i16,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateHolidayPayload {
    pub holiday_date: NaiveDate,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct WeeklyOffPayload {
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct HolidayCalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HolidayCalendarEntryResponse {
    pub date: NaiveDate,
    pub reason: String,
}
