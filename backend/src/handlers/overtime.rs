use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppError,
    models::{
        approval_request::DecisionPayload,
        employee::Employee,
        overtime_request::{CreateOvertimeRequest, OvertimeRequest},
    },
    state::AppState,
    types::OvertimeRequestId,
};

pub async fn create_overtime_request(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
    Json(payload): Json<CreateOvertimeRequest>,
) -> Result<(StatusCode, Json<OvertimeRequest>), AppError> {
    let created = state.overtime.submit(&employee.emp_code, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn my_overtime_requests(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
) -> Result<Json<Vec<OvertimeRequest>>, AppError> {
    Ok(Json(state.overtime.list_mine(&employee.emp_code).await?))
}

pub async fn manager_overtime_queue(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
) -> Result<Json<Vec<OvertimeRequest>>, AppError> {
    Ok(Json(
        state.overtime.list_for_manager(&employee.emp_code).await?,
    ))
}

pub async fn approve_overtime(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
    Path(id): Path<OvertimeRequestId>,
    payload: Option<Json<DecisionPayload>>,
) -> Result<Json<OvertimeRequest>, AppError> {
    let payload = payload.map(|Json(body)| body).unwrap_or_default();
    let updated = state
        .overtime
        .decide(id, &employee.emp_code, true, payload.reason.as_deref())
        .await?;
    Ok(Json(updated))
}

pub async fn reject_overtime(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
    Path(id): Path<OvertimeRequestId>,
    Json(payload): Json<DecisionPayload>,
) -> Result<Json<OvertimeRequest>, AppError> {
    let updated = state
        .overtime
        .decide(id, &employee.emp_code, false, payload.reason.as_deref())
        .await?;
    Ok(Json(updated))
}
