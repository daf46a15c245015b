//! Shared status enum for the domain records governed by approval requests.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema, Default)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
/// Status carried by leave requests, corrections, edit requests, offboarding and overtime.
///
/// It mirrors the ledger without being identical to it: both rejection stages
/// collapse into `Rejected`.
pub enum RequestStatus {
    #[default]
    Pending,
    ManagerApproved,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn db_value(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::ManagerApproved => "manager_approved",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_status_serde_snake_case() {
        let status: RequestStatus = serde_json::from_str("\"manager_approved\"").unwrap();
        assert_eq!(status, RequestStatus::ManagerApproved);
        assert_eq!(
            serde_json::to_value(RequestStatus::Rejected).unwrap(),
            serde_json::json!("rejected")
        );
    }

    #[test]
    fn db_value_matches_serde_representation() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::ManagerApproved,
            RequestStatus::Approved,
            RequestStatus::Rejected,
        ] {
            assert_eq!(
                serde_json::to_value(status).unwrap(),
                serde_json::json!(status.db_value())
            );
        }
    }
}
