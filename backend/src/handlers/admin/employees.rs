use axum::{
    extract::{Extension, Path, State},
    Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::employee::{AssignReportingManagerPayload, Employee},
    repositories::EmployeeRepository,
    state::AppState,
};

/// Open requests follow the new assignment; the previous manager loses access.
pub async fn assign_reporting_manager(
    State(state): State<AppState>,
    Extension(admin): Extension<Employee>,
    Path(emp_code): Path<String>,
    Json(payload): Json<AssignReportingManagerPayload>,
) -> Result<Json<Employee>, AppError> {
    payload.validate()?;
    let manager_code = payload.reporting_manager_emp_code.trim();
    if manager_code == emp_code {
        return Err(AppError::BadRequest(
            "An employee cannot report to themselves".into(),
        ));
    }

    let repo = EmployeeRepository::new();
    repo.find_active(&state.pool, manager_code)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest(format!("Manager {} is not an active employee", manager_code))
        })?;
    let updated = repo
        .set_reporting_manager(&state.pool, &emp_code, manager_code)
        .await?;

    tracing::info!(
        emp_code = %updated.emp_code,
        manager = %manager_code,
        actor = %admin.emp_code,
        "reporting manager assigned"
    );
    Ok(Json(updated))
}
