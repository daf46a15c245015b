use axum::{
    extract::{Extension, State},
    Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        employee::Employee,
        leave_request::{LeaveBalance, UpsertLeaveBalancePayload},
    },
    repositories::{leave_request::LeaveBalanceRepository, EmployeeRepository},
    state::AppState,
};

pub async fn upsert_leave_balance(
    State(state): State<AppState>,
    Extension(admin): Extension<Employee>,
    Json(payload): Json<UpsertLeaveBalancePayload>,
) -> Result<Json<LeaveBalance>, AppError> {
    payload.validate()?;
    EmployeeRepository::new()
        .find_by_code(&state.pool, &payload.emp_code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", payload.emp_code)))?;

    let balance = LeaveBalanceRepository::new()
        .upsert(
            &state.pool,
            &payload.emp_code,
            payload.leave_type,
            payload.year,
            payload.balance,
        )
        .await?;

    tracing::info!(
        emp_code = %balance.emp_code,
        leave_type = balance.leave_type.db_value(),
        year = balance.year,
        balance = balance.balance,
        actor = %admin.emp_code,
        "leave balance set"
    );
    Ok(Json(balance))
}
