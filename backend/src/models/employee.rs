//! Employee directory records and role metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Employee {
    pub emp_code: String,
    pub full_name: String,
    pub email: Option<String>,
    pub role: Role,
    /// First-stage approver for this employee's requests.
    pub reporting_manager_emp_code: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    pub fn can_finalize(&self) -> bool {
        self.role.can_finalize()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema, Default)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Employee,
    Manager,
    Hr,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Manager => "manager",
            Role::Hr => "hr",
            Role::Admin => "admin",
        }
    }

    /// Admin and HR sign off the second stage.
    pub fn can_finalize(&self) -> bool {
        matches!(self, Role::Hr | Role::Admin)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AssignReportingManagerPayload {
    #[validate(length(min = 1, max = 64))]
    pub reporting_manager_emp_code: String,
}
