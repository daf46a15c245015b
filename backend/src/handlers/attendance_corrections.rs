use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppError,
    models::{
        approval_request::ApprovalActionResponse, attendance_correction::CreateAttendanceCorrection,
        employee::Employee,
    },
    services::approval_effects::Submission,
    state::AppState,
};

pub async fn create_attendance_correction(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
    Json(payload): Json<CreateAttendanceCorrection>,
) -> Result<(StatusCode, Json<ApprovalActionResponse>), AppError> {
    let request = state
        .workflow
        .submit(&employee.emp_code, Submission::AttendanceCorrection(payload))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApprovalActionResponse::new(
            "Attendance correction submitted for manager approval",
            request,
        )),
    ))
}
