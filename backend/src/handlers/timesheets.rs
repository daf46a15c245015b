use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        approval_request::ApprovalActionResponse,
        employee::Employee,
        timesheet::{CreateTimesheetEditRequest, SaveTimesheetWeekPayload, TimesheetWeek},
    },
    repositories::timesheet::TimesheetRepository,
    services::approval_effects::Submission,
    state::AppState,
    validation::rules::validate_week_start,
};

pub async fn list_my_timesheets(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
) -> Result<Json<Vec<TimesheetWeek>>, AppError> {
    let weeks = TimesheetRepository::new()
        .list_by_employee(&state.pool, &employee.emp_code)
        .await?;
    Ok(Json(weeks))
}

/// Creates or overwrites the draft for a week. Submitted or locked weeks are refused.
pub async fn save_timesheet_week(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
    Path(week_start): Path<NaiveDate>,
    Json(payload): Json<SaveTimesheetWeekPayload>,
) -> Result<Json<TimesheetWeek>, AppError> {
    if validate_week_start(&week_start).is_err() {
        return Err(AppError::BadRequest("week_start must be a Monday".into()));
    }
    payload.validate()?;

    let notes = payload
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty());
    let week = TimesheetRepository::new()
        .save_draft(
            &state.pool,
            &employee.emp_code,
            week_start,
            payload.total_hours,
            notes,
        )
        .await?;
    Ok(Json(week))
}

pub async fn submit_timesheet_week(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
    Path(week_start): Path<NaiveDate>,
) -> Result<(StatusCode, Json<ApprovalActionResponse>), AppError> {
    let request = state
        .workflow
        .submit(&employee.emp_code, Submission::Timesheet { week_start })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApprovalActionResponse::new(
            "Timesheet submitted for manager approval",
            request,
        )),
    ))
}

pub async fn request_timesheet_edit(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
    Path(week_start): Path<NaiveDate>,
    Json(payload): Json<CreateTimesheetEditRequest>,
) -> Result<(StatusCode, Json<ApprovalActionResponse>), AppError> {
    let request = state
        .workflow
        .submit(
            &employee.emp_code,
            Submission::TimesheetEdit {
                week_start,
                reason: payload.reason,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApprovalActionResponse::new(
            "Timesheet edit request submitted for manager approval",
            request,
        )),
    ))
}
