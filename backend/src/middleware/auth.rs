//! Caller identity.
//!
//! Authentication happens upstream; requests reach this service with the
//! resolved employee code in `x-emp-code`. The middleware loads the active
//! employee and stores it as a request extension.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    error::AppError, models::employee::Employee, repositories::EmployeeRepository,
    state::AppState,
};

pub const EMP_CODE_HEADER: &str = "x-emp-code";

pub async fn identify(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let emp_code = caller_code(&request)?;
    let employee = resolve_employee(&state, &emp_code).await?;
    tracing::Span::current().record("emp_code", employee.emp_code.as_str());
    request.extensions_mut().insert(employee);
    Ok(next.run(request).await)
}

/// Identity plus the admin/HR role required by the final approval stage.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let emp_code = caller_code(&request)?;
    let employee = resolve_employee(&state, &emp_code).await?;
    if !employee.can_finalize() {
        return Err(AppError::Forbidden("Admin or HR role required".into()));
    }
    tracing::Span::current().record("emp_code", employee.emp_code.as_str());
    request.extensions_mut().insert(employee);
    Ok(next.run(request).await)
}

fn caller_code(request: &Request) -> Result<String, AppError> {
    request
        .headers()
        .get(EMP_CODE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::Unauthorized("Missing caller identity".into()))
}

async fn resolve_employee(state: &AppState, emp_code: &str) -> Result<Employee, AppError> {
    EmployeeRepository::new()
        .find_active(&state.pool, emp_code)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Unknown or inactive employee".into()))
}
