use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::employee::Role;
use crate::types::{ApprovalRequestId, NotificationId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Notification {
    #[schema(value_type = String)]
    pub id: NotificationId,
    pub emp_code: String,
    pub message: String,
    pub is_read: bool,
    pub sender_role: Option<String>,
    pub action: String,
    /// Ledger entry (or overtime request) the message refers to.
    pub reference_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Routing metadata stored next to the message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMeta {
    pub sender_role: Option<Role>,
    pub action: String,
    pub reference_id: Option<String>,
}

impl NotificationMeta {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            sender_role: None,
            action: action.into(),
            reference_id: None,
        }
    }

    pub fn from_role(mut self, role: Role) -> Self {
        self.sender_role = Some(role);
        self
    }

    pub fn for_request(mut self, id: ApprovalRequestId) -> Self {
        self.reference_id = Some(id.to_string());
        self
    }

    pub fn for_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference_id = Some(reference.into());
        self
    }
}
