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

/// The final-stage queue: every `MANAGER_APPROVED` request.
pub async fn admin_queue(
    State(state): State<AppState>,
) -> Result<Json<Vec<ApprovalRequest>>, AppError> {
    Ok(Json(state.workflow.list_for_admin().await?))
}

pub async fn approval_detail(
    State(state): State<AppState>,
    Path(request_id): Path<ApprovalRequestId>,
) -> Result<Json<ApprovalRequest>, AppError> {
    Ok(Json(state.workflow.find(request_id).await?))
}

pub async fn finalize_approval(
    State(state): State<AppState>,
    Extension(admin): Extension<Employee>,
    Path(request_id): Path<ApprovalRequestId>,
) -> Result<Json<ApprovalActionResponse>, AppError> {
    let request = state
        .workflow
        .admin_finalize(request_id, &admin.emp_code)
        .await?;
    Ok(Json(ApprovalActionResponse::new(
        "Request finally approved",
        request,
    )))
}

pub async fn reject_approval(
    State(state): State<AppState>,
    Extension(admin): Extension<Employee>,
    Path(request_id): Path<ApprovalRequestId>,
    payload: Option<Json<DecisionPayload>>,
) -> Result<Json<ApprovalActionResponse>, AppError> {
    let payload = payload.map(|Json(body)| body).unwrap_or_default();
    let request = state
        .workflow
        .admin_reject(request_id, &admin.emp_code, payload.reason.as_deref())
        .await?;
    Ok(Json(ApprovalActionResponse::new(
        "Request rejected at final approval",
        request,
    )))
}
