use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        employee::Employee,
        holiday::{CreateHolidayPayload, Holiday, WeeklyOff, WeeklyOffPayload},
        MessageResponse,
    },
    repositories::holiday::{HolidayRepository, WeeklyOffRepository},
    state::AppState,
    types::HolidayId,
};

pub async fn list_holidays(State(state): State<AppState>) -> Result<Json<Vec<Holiday>>, AppError> {
    Ok(Json(HolidayRepository::new().find_all(&state.pool).await?))
}

pub async fn create_holiday(
    State(state): State<AppState>,
    Extension(admin): Extension<Employee>,
    Json(payload): Json<CreateHolidayPayload>,
) -> Result<(StatusCode, Json<Holiday>), AppError> {
    payload.validate()?;
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }
    let description = payload
        .description
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    let holiday = Holiday::new(payload.holiday_date, name.to_string(), description);
    let created = HolidayRepository::new().create(&state.pool, &holiday).await?;
    tracing::info!(
        holiday_id = %created.id,
        holiday_date = %created.holiday_date,
        actor = %admin.emp_code,
        "holiday created"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn delete_holiday(
    State(state): State<AppState>,
    Extension(admin): Extension<Employee>,
    Path(id): Path<HolidayId>,
) -> Result<Json<MessageResponse>, AppError> {
    HolidayRepository::new().delete(&state.pool, id).await?;
    tracing::info!(holiday_id = %id, actor = %admin.emp_code, "holiday deleted");
    Ok(Json(MessageResponse::new("Holiday deleted")))
}

pub async fn list_weekly_offs(
    State(state): State<AppState>,
) -> Result<Json<Vec<WeeklyOff>>, AppError> {
    Ok(Json(WeeklyOffRepository::new().list(&state.pool).await?))
}

/// `weekday` is Monday-based: 0 = Monday .. 6 = Sunday.
pub async fn set_weekly_off(
    State(state): State<AppState>,
    Extension(admin): Extension<Employee>,
    Path(weekday): Path<i16>,
    Json(payload): Json<WeeklyOffPayload>,
) -> Result<Json<WeeklyOff>, AppError> {
    if !(0..=6).contains(&weekday) {
        return Err(AppError::BadRequest(
            "weekday must be between 0 (Monday) and 6 (Sunday)".into(),
        ));
    }
    let updated = WeeklyOffRepository::new()
        .set(&state.pool, weekday, payload.is_active)
        .await?;
    tracing::info!(
        weekday,
        is_active = updated.is_active,
        actor = %admin.emp_code,
        "weekly off updated"
    );
    Ok(Json(updated))
}
