//! Notification emitter.
//!
//! Messages are written after the transition they describe has committed.
//! Delivery failures are logged and never surface to the caller.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::notification::NotificationMeta;
use crate::repositories::notification::NotificationRepository;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(
        &self,
        recipient_code: &str,
        message: &str,
        meta: &NotificationMeta,
    ) -> Result<(), AppError>;
}

/// Stores notifications in the `notifications` inbox table.
#[derive(Debug, Clone)]
pub struct PgNotificationSink {
    pool: PgPool,
    repo: NotificationRepository,
}

impl PgNotificationSink {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            repo: NotificationRepository::new(),
        }
    }
}

#[async_trait]
impl NotificationSink for PgNotificationSink {
    async fn notify(
        &self,
        recipient_code: &str,
        message: &str,
        meta: &NotificationMeta,
    ) -> Result<(), AppError> {
        self.repo
            .insert(&self.pool, recipient_code, message, meta)
            .await
            .map(|_| ())
    }
}

/// Best-effort delivery.
pub async fn emit(
    sink: &dyn NotificationSink,
    recipient_code: &str,
    message: &str,
    meta: &NotificationMeta,
) {
    if let Err(err) = sink.notify(recipient_code, message, meta).await {
        tracing::warn!(
            recipient = %recipient_code,
            action = %meta.action,
            error = %err,
            "failed to deliver notification"
        );
    }
}
