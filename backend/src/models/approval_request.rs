//! The approval ledger: one row per human decision chain over a domain record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::types::ApprovalRequestId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "TEXT", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestType {
    Leave,
    AttendanceCorrection,
    Timesheet,
    TimesheetEdit,
    Offboarding,
}

impl RequestType {
    pub fn db_value(&self) -> &'static str {
        match self {
            RequestType::Leave => "LEAVE",
            RequestType::AttendanceCorrection => "ATTENDANCE_CORRECTION",
            RequestType::Timesheet => "TIMESHEET",
            RequestType::TimesheetEdit => "TIMESHEET_EDIT",
            RequestType::Offboarding => "OFFBOARDING",
        }
    }

    /// Human readable label used in notification messages.
    pub fn label(&self) -> &'static str {
        match self {
            RequestType::Leave => "leave",
            RequestType::AttendanceCorrection => "attendance correction",
            RequestType::Timesheet => "timesheet",
            RequestType::TimesheetEdit => "timesheet edit",
            RequestType::Offboarding => "offboarding",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.db_value())
    }
}

impl FromStr for RequestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LEAVE" => Ok(RequestType::Leave),
            "ATTENDANCE_CORRECTION" => Ok(RequestType::AttendanceCorrection),
            "TIMESHEET" => Ok(RequestType::Timesheet),
            "TIMESHEET_EDIT" => Ok(RequestType::TimesheetEdit),
            "OFFBOARDING" => Ok(RequestType::Offboarding),
            other => Err(format!("unknown request type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "TEXT", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    PendingManager,
    ManagerApproved,
    ManagerRejected,
    AdminApproved,
    AdminRejected,
}

/// Which side of the chain records a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalStage {
    Manager,
    Final,
}

impl ApprovalStatus {
    pub fn db_value(&self) -> &'static str {
        match self {
            ApprovalStatus::PendingManager => "PENDING_MANAGER",
            ApprovalStatus::ManagerApproved => "MANAGER_APPROVED",
            ApprovalStatus::ManagerRejected => "MANAGER_REJECTED",
            ApprovalStatus::AdminApproved => "ADMIN_APPROVED",
            ApprovalStatus::AdminRejected => "ADMIN_REJECTED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ApprovalStatus::ManagerRejected
                | ApprovalStatus::AdminApproved
                | ApprovalStatus::AdminRejected
        )
    }

    /// The stage whose actor and reason columns a transition into `self` writes.
    /// `PendingManager` is never a transition target.
    pub fn stage(&self) -> ApprovalStage {
        match self {
            ApprovalStatus::PendingManager
            | ApprovalStatus::ManagerApproved
            | ApprovalStatus::ManagerRejected => ApprovalStage::Manager,
            ApprovalStatus::AdminApproved | ApprovalStatus::AdminRejected => ApprovalStage::Final,
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.db_value())
    }
}

impl FromStr for ApprovalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING_MANAGER" => Ok(ApprovalStatus::PendingManager),
            "MANAGER_APPROVED" => Ok(ApprovalStatus::ManagerApproved),
            "MANAGER_REJECTED" => Ok(ApprovalStatus::ManagerRejected),
            "ADMIN_APPROVED" => Ok(ApprovalStatus::AdminApproved),
            "ADMIN_REJECTED" => Ok(ApprovalStatus::AdminRejected),
            other => Err(format!("unknown approval status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ApprovalRequest {
    #[schema(value_type = String)]
    pub id: ApprovalRequestId,
    pub request_type: RequestType,
    /// Id of the governed domain record; a relation, not ownership.
    pub entity_id: String,
    pub requester_code: String,
    pub approver_code: Option<String>,
    pub final_approver_code: Option<String>,
    pub status: ApprovalStatus,
    pub requester_reason: Option<String>,
    pub approver_reason: Option<String>,
    pub final_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub manager_acted_at: Option<DateTime<Utc>>,
    pub final_acted_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl ApprovalRequest {
    pub fn new(
        request_type: RequestType,
        entity_id: String,
        requester_code: String,
        approver_code: String,
        requester_reason: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ApprovalRequestId::new(),
            request_type,
            entity_id,
            requester_code,
            approver_code: Some(approver_code),
            final_approver_code: None,
            status: ApprovalStatus::PendingManager,
            requester_reason,
            approver_reason: None,
            final_reason: None,
            created_at: now,
            manager_acted_at: None,
            final_acted_at: None,
            updated_at: now,
        }
    }

    pub fn is_open(&self) -> bool {
        !self.status.is_terminal()
    }
}

/// Body returned by every transition endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApprovalActionResponse {
    pub message: String,
    pub request: ApprovalRequest,
}

impl ApprovalActionResponse {
    pub fn new(message: impl Into<String>, request: ApprovalRequest) -> Self {
        Self {
            message: message.into(),
            request,
        }
    }
}

/// Optional reason on a manager approval, mandatory on any rejection.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct DecisionPayload {
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_are_rejections_and_final_approval() {
        assert!(!ApprovalStatus::PendingManager.is_terminal());
        assert!(!ApprovalStatus::ManagerApproved.is_terminal());
        assert!(ApprovalStatus::ManagerRejected.is_terminal());
        assert!(ApprovalStatus::AdminApproved.is_terminal());
        assert!(ApprovalStatus::AdminRejected.is_terminal());
    }

    #[test]
    fn transition_targets_map_to_their_stage() {
        assert_eq!(ApprovalStatus::ManagerApproved.stage(), ApprovalStage::Manager);
        assert_eq!(ApprovalStatus::ManagerRejected.stage(), ApprovalStage::Manager);
        assert_eq!(ApprovalStatus::AdminApproved.stage(), ApprovalStage::Final);
        assert_eq!(ApprovalStatus::AdminRejected.stage(), ApprovalStage::Final);
    }

    #[test]
    fn request_type_uses_screaming_snake_case_on_the_wire() {
        let parsed: RequestType = serde_json::from_str("\"TIMESHEET_EDIT\"").unwrap();
        assert_eq!(parsed, RequestType::TimesheetEdit);
        assert_eq!(
            serde_json::to_value(RequestType::AttendanceCorrection).unwrap(),
            serde_json::json!("ATTENDANCE_CORRECTION")
        );
        assert_eq!("leave".parse::<RequestType>(), Ok(RequestType::Leave));
    }

    #[test]
    fn new_request_starts_pending_with_routed_manager() {
        let request = ApprovalRequest::new(
            RequestType::Leave,
            "entity".into(),
            "E1".into(),
            "M1".into(),
            Some("family event".into()),
        );
        assert_eq!(request.status, ApprovalStatus::PendingManager);
        assert_eq!(request.approver_code.as_deref(), Some("M1"));
        assert!(request.is_open());
    }
}
