use axum::{
    extract::{Extension, Path, State},
    Json,
};

use crate::{
    error::AppError,
    models::{
        approval_request::{ApprovalActionResponse, ApprovalRequest, DecisionPayload},
        employee::Employee,
    },
    state::AppState,
    types::ApprovalRequestId,
};

pub async fn my_approval_requests(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
) -> Result<Json<Vec<ApprovalRequest>>, AppError> {
    Ok(Json(state.workflow.list_mine(&employee.emp_code).await?))
}

/// Requests waiting on the caller as the requester's current reporting manager.
pub async fn manager_queue(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
) -> Result<Json<Vec<ApprovalRequest>>, AppError> {
    Ok(Json(
        state.workflow.list_for_manager(&employee.emp_code).await?,
    ))
}

pub async fn manager_approve(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
    Path(request_id): Path<ApprovalRequestId>,
    payload: Option<Json<DecisionPayload>>,
) -> Result<Json<ApprovalActionResponse>, AppError> {
    let payload = payload.map(|Json(body)| body).unwrap_or_default();
    let request = state
        .workflow
        .manager_decide(
            request_id,
            &employee.emp_code,
            true,
            payload.reason.as_deref(),
        )
        .await?;
    Ok(Json(ApprovalActionResponse::new(
        "Request approved by manager",
        request,
    )))
}

pub async fn manager_reject(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
    Path(request_id): Path<ApprovalRequestId>,
    payload: Option<Json<DecisionPayload>>,
) -> Result<Json<ApprovalActionResponse>, AppError> {
    let payload = payload.map(|Json(body)| body).unwrap_or_default();
    let request = state
        .workflow
        .manager_decide(
            request_id,
            &employee.emp_code,
            false,
            payload.reason.as_deref(),
        )
        .await?;
    Ok(Json(ApprovalActionResponse::new(
        "Request rejected by manager",
        request,
    )))
}
