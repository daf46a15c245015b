use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Datelike;

use crate::{
    error::AppError,
    models::holiday::{HolidayCalendarEntryResponse, HolidayCalendarQuery},
    state::AppState,
    utils::time::today_local,
};

/// Public holidays and weekly offs of one month; defaults to the current month.
pub async fn holiday_calendar(
    State(state): State<AppState>,
    Query(query): Query<HolidayCalendarQuery>,
) -> Result<Json<Vec<HolidayCalendarEntryResponse>>, AppError> {
    let today = today_local(&state.config.time_zone);
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());
    if !(1..=12).contains(&month) {
        return Err(AppError::BadRequest("month must be between 1 and 12".into()));
    }

    let entries = state
        .holidays
        .list_month(year, month)
        .await?
        .into_iter()
        .map(|entry| HolidayCalendarEntryResponse {
            date: entry.date,
            reason: entry.reason.label().to_string(),
        })
        .collect();
    Ok(Json(entries))
}
