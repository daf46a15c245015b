//! Data models shared across database access and API handlers.

use serde::Serialize;
use utoipa::ToSchema;

pub mod approval_request;
pub mod attendance;
pub mod attendance_correction;
pub mod employee;
pub mod holiday;
pub mod leave_request;
pub mod notification;
pub mod offboarding;
pub mod overtime_request;
pub mod request;
pub mod timesheet;

/// Plain `{ "message": ... }` acknowledgement.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
