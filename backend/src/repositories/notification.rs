use chrono::Utc;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::notification::{Notification, NotificationMeta};
use crate::types::NotificationId;

const NOTIFICATION_COLUMNS: &str =
    "id, emp_code, message, is_read, sender_role, action, reference_id, created_at";

#[derive(Debug, Default, Clone, Copy)]
pub struct NotificationRepository;

impl NotificationRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn insert(
        &self,
        db: &PgPool,
        emp_code: &str,
        message: &str,
        meta: &NotificationMeta,
    ) -> Result<Notification, AppError> {
        let query = format!(
            "INSERT INTO notifications ({NOTIFICATION_COLUMNS}) \
             VALUES ($1, $2, $3, FALSE, $4, $5, $6, $7) \
             RETURNING {NOTIFICATION_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Notification>(&query)
            .bind(NotificationId::new())
            .bind(emp_code)
            .bind(message)
            .bind(meta.sender_role.map(|role| role.as_str()))
            .bind(&meta.action)
            .bind(&meta.reference_id)
            .bind(Utc::now())
            .fetch_one(db)
            .await?)
    }

    pub async fn list_for_employee(
        &self,
        db: &PgPool,
        emp_code: &str,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, AppError> {
        let query = format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications \
             WHERE emp_code = $1 AND ($2 = FALSE OR is_read = FALSE) \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4"
        );
        Ok(sqlx::query_as::<_, Notification>(&query)
            .bind(emp_code)
            .bind(unread_only)
            .bind(limit)
            .bind(offset)
            .fetch_all(db)
            .await?)
    }

    pub async fn mark_read(
        &self,
        db: &PgPool,
        id: NotificationId,
        emp_code: &str,
    ) -> Result<(), AppError> {
        let affected = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 AND emp_code = $2",
        )
        .bind(id)
        .bind(emp_code)
        .execute(db)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(AppError::NotFound("Notification not found".into()));
        }
        Ok(())
    }
}
