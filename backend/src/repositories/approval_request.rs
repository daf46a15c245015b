//! Approval ledger repository.
//!
//! Every status change goes through [`ApprovalRequestRepository::transition`],
//! which only updates a row still in the expected pre-state. A zero row count
//! means another caller won the race and surfaces as `AppError::Conflict`.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use crate::error::{conflict_on_unique_violation, AppError};
use crate::models::approval_request::{ApprovalRequest, ApprovalStage, ApprovalStatus, RequestType};
use crate::repositories::common::push_clause;
use crate::types::ApprovalRequestId;

const APPROVAL_COLUMNS: &str = "id, request_type, entity_id, requester_code, approver_code, \
     final_approver_code, status, requester_reason, approver_reason, final_reason, \
     created_at, manager_acted_at, final_acted_at, updated_at";

/// A decision to record on the ledger.
#[derive(Debug, Clone, Copy)]
pub struct Transition<'a> {
    pub to: ApprovalStatus,
    pub actor_code: &'a str,
    pub reason: Option<&'a str>,
    pub at: DateTime<Utc>,
}

/// Filters for the admin ledger export.
#[derive(Debug, Clone, Default)]
pub struct ApprovalListFilters {
    pub status: Option<ApprovalStatus>,
    pub request_type: Option<RequestType>,
    pub requester_code: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ApprovalRequestRepository;

impl ApprovalRequestRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create(
        &self,
        conn: &mut PgConnection,
        request: &ApprovalRequest,
    ) -> Result<ApprovalRequest, AppError> {
        let query = format!(
            "INSERT INTO approval_requests ({APPROVAL_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {APPROVAL_COLUMNS}"
        );
        sqlx::query_as::<_, ApprovalRequest>(&query)
            .bind(request.id)
            .bind(request.request_type.db_value())
            .bind(&request.entity_id)
            .bind(&request.requester_code)
            .bind(&request.approver_code)
            .bind(&request.final_approver_code)
            .bind(request.status.db_value())
            .bind(&request.requester_reason)
            .bind(&request.approver_reason)
            .bind(&request.final_reason)
            .bind(request.created_at)
            .bind(request.manager_acted_at)
            .bind(request.final_acted_at)
            .bind(request.updated_at)
            .fetch_one(conn)
            .await
            .map_err(|e| {
                conflict_on_unique_violation(e, "An open approval request already exists for this record")
            })
    }

    pub async fn find_by_id(
        &self,
        db: &PgPool,
        id: ApprovalRequestId,
    ) -> Result<ApprovalRequest, AppError> {
        let query = format!("SELECT {APPROVAL_COLUMNS} FROM approval_requests WHERE id = $1");
        sqlx::query_as::<_, ApprovalRequest>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Approval request not found".into()))
    }

    /// The non-terminal request governing `entity_id`, if any.
    pub async fn find_open_request(
        &self,
        conn: &mut PgConnection,
        request_type: RequestType,
        entity_id: &str,
    ) -> Result<Option<ApprovalRequest>, AppError> {
        let query = format!(
            "SELECT {APPROVAL_COLUMNS} FROM approval_requests \
             WHERE request_type = $1 AND entity_id = $2 \
               AND status IN ('PENDING_MANAGER', 'MANAGER_APPROVED')"
        );
        Ok(sqlx::query_as::<_, ApprovalRequest>(&query)
            .bind(request_type.db_value())
            .bind(entity_id)
            .fetch_optional(conn)
            .await?)
    }

    /// Moves `id` from `expected` to `transition.to`, recording the actor and
    /// reason on the stage the target status belongs to.
    pub async fn transition(
        &self,
        conn: &mut PgConnection,
        id: ApprovalRequestId,
        expected: ApprovalStatus,
        transition: Transition<'_>,
    ) -> Result<ApprovalRequest, AppError> {
        let set_clause = match transition.to.stage() {
            ApprovalStage::Manager => {
                "approver_code = $2, approver_reason = $3, manager_acted_at = $4"
            }
            ApprovalStage::Final => {
                "final_approver_code = $2, final_reason = $3, final_acted_at = $4"
            }
        };
        let query = format!(
            "UPDATE approval_requests \
             SET status = $1, {set_clause}, updated_at = $4 \
             WHERE id = $5 AND status = $6 \
             RETURNING {APPROVAL_COLUMNS}"
        );

        sqlx::query_as::<_, ApprovalRequest>(&query)
            .bind(transition.to.db_value())
            .bind(transition.actor_code)
            .bind(transition.reason)
            .bind(transition.at)
            .bind(id)
            .bind(expected.db_value())
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| AppError::Conflict("Request not found or already processed".into()))
    }

    /// All requests raised by `requester_code`, newest first.
    pub async fn list_by_requester(
        &self,
        db: &PgPool,
        requester_code: &str,
    ) -> Result<Vec<ApprovalRequest>, AppError> {
        let query = format!(
            "SELECT {APPROVAL_COLUMNS} FROM approval_requests \
             WHERE requester_code = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        Ok(sqlx::query_as::<_, ApprovalRequest>(&query)
            .bind(requester_code)
            .fetch_all(db)
            .await?)
    }

    /// Pending requests whose requester currently reports to `manager_code`.
    pub async fn list_pending_for_manager(
        &self,
        db: &PgPool,
        manager_code: &str,
    ) -> Result<Vec<ApprovalRequest>, AppError> {
        let query = "SELECT ar.id, ar.request_type, ar.entity_id, ar.requester_code, ar.approver_code, \
                ar.final_approver_code, ar.status, ar.requester_reason, ar.approver_reason, \
                ar.final_reason, ar.created_at, ar.manager_acted_at, ar.final_acted_at, ar.updated_at \
            FROM approval_requests ar \
            JOIN employees e ON e.emp_code = ar.requester_code \
            WHERE ar.status = 'PENDING_MANAGER' \
              AND e.reporting_manager_emp_code = $1 \
            ORDER BY ar.created_at ASC";
        Ok(sqlx::query_as::<_, ApprovalRequest>(query)
            .bind(manager_code)
            .fetch_all(db)
            .await?)
    }

    /// The finalization queue, oldest manager decision first.
    pub async fn list_awaiting_final(&self, db: &PgPool) -> Result<Vec<ApprovalRequest>, AppError> {
        let query = format!(
            "SELECT {APPROVAL_COLUMNS} FROM approval_requests \
             WHERE status = 'MANAGER_APPROVED' \
             ORDER BY manager_acted_at ASC NULLS LAST, created_at ASC"
        );
        Ok(sqlx::query_as::<_, ApprovalRequest>(&query)
            .fetch_all(db)
            .await?)
    }

    pub async fn list_filtered(
        &self,
        db: &PgPool,
        filters: &ApprovalListFilters,
    ) -> Result<Vec<ApprovalRequest>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {APPROVAL_COLUMNS} FROM approval_requests"
        ));
        let mut has_clause = false;

        if let Some(status) = filters.status {
            push_clause(&mut builder, &mut has_clause);
            builder.push("status = ").push_bind(status.db_value());
        }
        if let Some(request_type) = filters.request_type {
            push_clause(&mut builder, &mut has_clause);
            builder
                .push("request_type = ")
                .push_bind(request_type.db_value());
        }
        if let Some(requester_code) = filters.requester_code.as_deref() {
            push_clause(&mut builder, &mut has_clause);
            builder
                .push("requester_code = ")
                .push_bind(requester_code.to_string());
        }
        if let Some(from) = filters.from {
            push_clause(&mut builder, &mut has_clause);
            builder.push("created_at >= ").push_bind(from);
        }
        if let Some(to) = filters.to {
            push_clause(&mut builder, &mut has_clause);
            builder.push("created_at <= ").push_bind(to);
        }
        builder.push(" ORDER BY created_at DESC");

        Ok(builder
            .build_query_as::<ApprovalRequest>()
            .fetch_all(db)
            .await?)
    }
}
