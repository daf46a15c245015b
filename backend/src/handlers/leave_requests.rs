use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppError,
    models::{
        approval_request::ApprovalActionResponse,
        employee::Employee,
        leave_request::{CreateLeaveRequest, LeaveBalance},
    },
    repositories::leave_request::LeaveBalanceRepository,
    services::approval_effects::Submission,
    state::AppState,
};

pub async fn create_leave_request(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
    Json(payload): Json<CreateLeaveRequest>,
) -> Result<(StatusCode, Json<ApprovalActionResponse>), AppError> {
    let request = state
        .workflow
        .submit(&employee.emp_code, Submission::Leave(payload))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApprovalActionResponse::new(
            "Leave request submitted for manager approval",
            request,
        )),
    ))
}

pub async fn my_leave_balances(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
) -> Result<Json<Vec<LeaveBalance>>, AppError> {
    let balances = LeaveBalanceRepository::new()
        .list_for_employee(&state.pool, &employee.emp_code)
        .await?;
    Ok(Json(balances))
}
