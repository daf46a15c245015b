use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppError,
    models::approval_request::{ApprovalRequest, ApprovalStatus, RequestType},
    repositories::ApprovalListFilters,
    state::AppState,
    utils::{csv::write_csv, time},
};

use super::common::parse_optional_date;

const EXPORT_HEADER: [&str; 11] = [
    "id",
    "request_type",
    "entity_id",
    "requester_code",
    "approver_code",
    "final_approver_code",
    "status",
    "requester_reason",
    "approver_reason",
    "final_reason",
    "created_at",
];

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ApprovalExportQuery {
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub request_type: Option<String>,
    pub requester_code: Option<String>,
    pub from: Option<String>, // YYYY-MM-DD
    pub to: Option<String>,   // YYYY-MM-DD
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApprovalExportResponse {
    pub csv_data: String,
    pub filename: String,
    pub row_count: usize,
}

pub async fn export_approvals(
    State(state): State<AppState>,
    Query(query): Query<ApprovalExportQuery>,
) -> Result<Json<ApprovalExportResponse>, AppError> {
    let filters = export_filters(&query, &state.config.time_zone)?;
    let requests = state.workflow.list_filtered(&filters).await?;
    let row_count = requests.len();

    let csv_data = tokio::task::spawn_blocking(move || {
        let rows: Vec<Vec<String>> = requests.iter().map(export_row).collect();
        write_csv(&EXPORT_HEADER, &rows)
    })
    .await
    .map_err(|e| AppError::InternalServerError(e.into()))??;

    Ok(Json(ApprovalExportResponse {
        csv_data,
        filename: format!(
            "approval_requests_{}.csv",
            time::now_in_timezone(&state.config.time_zone).format("%Y%m%d_%H%M%S")
        ),
        row_count,
    }))
}

/// `from`/`to` are calendar days in the deployment time zone.
fn export_filters(query: &ApprovalExportQuery, tz: &Tz) -> Result<ApprovalListFilters, AppError> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<ApprovalStatus>)
        .transpose()
        .map_err(AppError::BadRequest)?;
    let request_type = query
        .request_type
        .as_deref()
        .map(str::parse::<RequestType>)
        .transpose()
        .map_err(AppError::BadRequest)?;
    let from = parse_optional_date(query.from.as_deref())
        .map_err(|msg| AppError::BadRequest(msg.into()))?;
    let to = parse_optional_date(query.to.as_deref())
        .map_err(|msg| AppError::BadRequest(msg.into()))?;
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(AppError::BadRequest(
                "`from` must be on or before `to`".into(),
            ));
        }
    }

    Ok(ApprovalListFilters {
        status,
        request_type,
        requester_code: query
            .requester_code
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string),
        from: from.map(|date| day_start(tz, date)),
        to: to.map(|date| day_end(tz, date)),
    })
}

fn day_start(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let local = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        // Midnight skipped by a DST jump.
        LocalResult::None => tz
            .from_local_datetime(&(local + chrono::Duration::hours(1)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&local)),
    }
}

fn day_end(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    match date.succ_opt() {
        Some(next) => day_start(tz, next) - chrono::Duration::microseconds(1),
        None => DateTime::<Utc>::MAX_UTC,
    }
}

fn export_row(request: &ApprovalRequest) -> Vec<String> {
    vec![
        request.id.to_string(),
        request.request_type.to_string(),
        request.entity_id.clone(),
        request.requester_code.clone(),
        request.approver_code.clone().unwrap_or_default(),
        request.final_approver_code.clone().unwrap_or_default(),
        request.status.to_string(),
        request.requester_reason.clone().unwrap_or_default(),
        request.approver_reason.clone().unwrap_or_default(),
        request.final_reason.clone().unwrap_or_default(),
        request.created_at.to_rfc3339(),
    ]
}
