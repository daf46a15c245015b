use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppError,
    models::{
        approval_request::ApprovalActionResponse, employee::Employee,
        offboarding::CreateOffboardingRequest,
    },
    services::approval_effects::Submission,
    state::AppState,
    utils::time::today_local,
};

pub async fn create_offboarding_request(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
    Json(payload): Json<CreateOffboardingRequest>,
) -> Result<(StatusCode, Json<ApprovalActionResponse>), AppError> {
    let resignation_date = payload
        .resignation_date
        .unwrap_or_else(|| today_local(&state.config.time_zone));
    let request = state
        .workflow
        .submit(
            &employee.emp_code,
            Submission::Offboarding {
                resignation_date,
                requested_lwd: payload.requested_lwd,
                reason: payload.reason,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApprovalActionResponse::new(
            "Offboarding request submitted for manager approval",
            request,
        )),
    ))
}
