use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::AppError,
    models::{employee::Employee, notification::Notification, MessageResponse},
    repositories::notification::NotificationRepository,
    state::AppState,
    types::NotificationId,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct NotificationListQuery {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

pub async fn my_notifications(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
    Query(query): Query<NotificationListQuery>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = query.offset.unwrap_or(0).max(0);
    let items = NotificationRepository::new()
        .list_for_employee(
            &state.pool,
            &employee.emp_code,
            query.unread_only,
            limit,
            offset,
        )
        .await?;
    Ok(Json(items))
}

pub async fn mark_notification_read(
    State(state): State<AppState>,
    Extension(employee): Extension<Employee>,
    Path(id): Path<NotificationId>,
) -> Result<Json<MessageResponse>, AppError> {
    NotificationRepository::new()
        .mark_read(&state.pool, id, &employee.emp_code)
        .await?;
    Ok(Json(MessageResponse::new("Notification marked as read")))
}
