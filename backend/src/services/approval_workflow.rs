//! Two-stage approval engine.
//!
//! `PENDING_MANAGER -> MANAGER_APPROVED | MANAGER_REJECTED`, then
//! `MANAGER_APPROVED -> ADMIN_APPROVED | ADMIN_REJECTED`. Each transition is a
//! conditional ledger update committed in the same transaction as its domain
//! effect; notifications go out after the commit.

use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::approval_request::{ApprovalRequest, ApprovalStatus};
use crate::models::employee::Role;
use crate::models::notification::NotificationMeta;
use crate::repositories::approval_request::{
    ApprovalListFilters, ApprovalRequestRepository, Transition,
};
use crate::repositories::transaction;
use crate::services::approval_effects::{self, Submission};
use crate::services::employee_directory::EmployeeDirectory;
use crate::services::holiday::HolidayService;
use crate::services::notification::{emit, NotificationSink};
use crate::types::ApprovalRequestId;
use crate::validation::rules::{required_reason, validate_reason};

#[derive(Clone)]
pub struct ApprovalWorkflow {
    pool: PgPool,
    directory: Arc<dyn EmployeeDirectory>,
    notifier: Arc<dyn NotificationSink>,
    holidays: HolidayService,
    ledger: ApprovalRequestRepository,
}

impl ApprovalWorkflow {
    pub fn new(
        pool: PgPool,
        directory: Arc<dyn EmployeeDirectory>,
        notifier: Arc<dyn NotificationSink>,
        holidays: HolidayService,
    ) -> Self {
        Self {
            pool,
            directory,
            notifier,
            holidays,
            ledger: ApprovalRequestRepository::new(),
        }
    }

    /// Creates the domain record and its ledger entry, routed to the
    /// requester's current reporting manager.
    pub async fn submit(
        &self,
        requester_code: &str,
        submission: Submission,
    ) -> Result<ApprovalRequest, AppError> {
        let manager_code = self
            .directory
            .reporting_manager_of(requester_code)
            .await?
            .ok_or_else(|| AppError::Configuration("Reporting manager not assigned".into()))?;
        submission.validate()?;

        let request_type = submission.request_type();
        let now = Utc::now();
        let mut tx = transaction::begin(&self.pool).await?;

        let entity_id =
            approval_effects::create_entity(&mut tx, requester_code, &submission, now).await?;
        if self
            .ledger
            .find_open_request(&mut tx, request_type, &entity_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "An open approval request already exists for this record".into(),
            ));
        }
        let request = ApprovalRequest::new(
            request_type,
            entity_id,
            requester_code.to_string(),
            manager_code.clone(),
            submission.requester_reason(),
        );
        let created = self.ledger.create(&mut tx, &request).await?;
        transaction::commit(tx).await?;

        tracing::info!(
            request_id = %created.id,
            request_type = %created.request_type,
            emp_code = %requester_code,
            approver = %manager_code,
            status = %created.status,
            "approval request submitted"
        );

        emit(
            self.notifier.as_ref(),
            &manager_code,
            &format!(
                "New {} request from {} awaits your approval",
                request_type.label(),
                requester_code
            ),
            &NotificationMeta::new("submitted")
                .from_role(Role::Employee)
                .for_request(created.id),
        )
        .await;

        Ok(created)
    }

    /// First-stage decision by the requester's current reporting manager.
    pub async fn manager_decide(
        &self,
        request_id: ApprovalRequestId,
        manager_code: &str,
        approve: bool,
        reason: Option<&str>,
    ) -> Result<ApprovalRequest, AppError> {
        let reason = decision_reason(approve, reason)?;

        let request = self.ledger.find_by_id(&self.pool, request_id).await?;
        if request.status != ApprovalStatus::PendingManager {
            return Err(AppError::Conflict(
                "Request is not awaiting manager approval".into(),
            ));
        }
        let current_manager = self
            .directory
            .reporting_manager_of(&request.requester_code)
            .await?;
        if current_manager.as_deref() != Some(manager_code) {
            tracing::warn!(
                request_id = %request.id,
                actor = %manager_code,
                requester = %request.requester_code,
                "manager decision refused: not the current reporting manager"
            );
            return Err(AppError::Forbidden(
                "Only the requester's current reporting manager can act on this request".into(),
            ));
        }

        let to = if approve {
            ApprovalStatus::ManagerApproved
        } else {
            ApprovalStatus::ManagerRejected
        };
        let now = Utc::now();
        let mut tx = transaction::begin(&self.pool).await?;
        let updated = self
            .ledger
            .transition(
                &mut tx,
                request.id,
                ApprovalStatus::PendingManager,
                Transition {
                    to,
                    actor_code: manager_code,
                    reason,
                    at: now,
                },
            )
            .await?;
        if approve {
            approval_effects::apply_manager_approval(&mut tx, &updated, now).await?;
        } else {
            approval_effects::apply_rejection(
                &mut tx,
                &updated,
                ApprovalStatus::PendingManager,
                manager_code,
                now,
            )
            .await?;
        }
        transaction::commit(tx).await?;

        tracing::info!(
            request_id = %updated.id,
            request_type = %updated.request_type,
            emp_code = %updated.requester_code,
            actor = %manager_code,
            status = %updated.status,
            "manager decision recorded"
        );

        let label = updated.request_type.label();
        let message = match reason {
            Some(reason) if !approve => {
                format!("Your {} request was rejected by your manager: {}", label, reason)
            }
            _ => format!(
                "Your {} request was approved by your manager and awaits final approval",
                label
            ),
        };
        let action = if approve {
            "manager_approved"
        } else {
            "manager_rejected"
        };
        emit(
            self.notifier.as_ref(),
            &updated.requester_code,
            &message,
            &NotificationMeta::new(action)
                .from_role(Role::Manager)
                .for_request(updated.id),
        )
        .await;

        Ok(updated)
    }

    /// Second-stage approval; applies the domain side effect.
    pub async fn admin_finalize(
        &self,
        request_id: ApprovalRequestId,
        admin_code: &str,
    ) -> Result<ApprovalRequest, AppError> {
        let role = self.require_finalizer(admin_code).await?;
        let request = self.awaiting_final(request_id, admin_code).await?;

        let now = Utc::now();
        let mut tx = transaction::begin(&self.pool).await?;
        let updated = self
            .ledger
            .transition(
                &mut tx,
                request.id,
                ApprovalStatus::ManagerApproved,
                Transition {
                    to: ApprovalStatus::AdminApproved,
                    actor_code: admin_code,
                    reason: None,
                    at: now,
                },
            )
            .await?;
        approval_effects::apply_finalization(&mut tx, &updated, admin_code, &self.holidays, now)
            .await?;
        transaction::commit(tx).await?;

        tracing::info!(
            request_id = %updated.id,
            request_type = %updated.request_type,
            emp_code = %updated.requester_code,
            actor = %admin_code,
            status = %updated.status,
            "approval request finalized"
        );

        emit(
            self.notifier.as_ref(),
            &updated.requester_code,
            &format!(
                "Your {} request has been approved",
                updated.request_type.label()
            ),
            &NotificationMeta::new("admin_approved")
                .from_role(role)
                .for_request(updated.id),
        )
        .await;

        Ok(updated)
    }

    /// Second-stage rejection; rolls the domain record back without side effects.
    pub async fn admin_reject(
        &self,
        request_id: ApprovalRequestId,
        admin_code: &str,
        reason: Option<&str>,
    ) -> Result<ApprovalRequest, AppError> {
        let role = self.require_finalizer(admin_code).await?;
        let reason = decision_reason(false, reason)?;
        let request = self.awaiting_final(request_id, admin_code).await?;

        let now = Utc::now();
        let mut tx = transaction::begin(&self.pool).await?;
        let updated = self
            .ledger
            .transition(
                &mut tx,
                request.id,
                ApprovalStatus::ManagerApproved,
                Transition {
                    to: ApprovalStatus::AdminRejected,
                    actor_code: admin_code,
                    reason,
                    at: now,
                },
            )
            .await?;
        approval_effects::apply_rejection(
            &mut tx,
            &updated,
            ApprovalStatus::ManagerApproved,
            admin_code,
            now,
        )
        .await?;
        transaction::commit(tx).await?;

        tracing::info!(
            request_id = %updated.id,
            request_type = %updated.request_type,
            emp_code = %updated.requester_code,
            actor = %admin_code,
            status = %updated.status,
            "approval request rejected at final stage"
        );

        emit(
            self.notifier.as_ref(),
            &updated.requester_code,
            &format!(
                "Your {} request was rejected: {}",
                updated.request_type.label(),
                reason.unwrap_or_default()
            ),
            &NotificationMeta::new("admin_rejected")
                .from_role(role)
                .for_request(updated.id),
        )
        .await;

        Ok(updated)
    }

    pub async fn find(&self, request_id: ApprovalRequestId) -> Result<ApprovalRequest, AppError> {
        self.ledger.find_by_id(&self.pool, request_id).await
    }

    pub async fn list_mine(&self, requester_code: &str) -> Result<Vec<ApprovalRequest>, AppError> {
        self.ledger.list_by_requester(&self.pool, requester_code).await
    }

    pub async fn list_for_manager(
        &self,
        manager_code: &str,
    ) -> Result<Vec<ApprovalRequest>, AppError> {
        self.ledger
            .list_pending_for_manager(&self.pool, manager_code)
            .await
    }

    pub async fn list_for_admin(&self) -> Result<Vec<ApprovalRequest>, AppError> {
        self.ledger.list_awaiting_final(&self.pool).await
    }

    pub async fn list_filtered(
        &self,
        filters: &ApprovalListFilters,
    ) -> Result<Vec<ApprovalRequest>, AppError> {
        self.ledger.list_filtered(&self.pool, filters).await
    }

    async fn require_finalizer(&self, admin_code: &str) -> Result<Role, AppError> {
        let role = self.directory.role_of(admin_code).await?;
        if !role.can_finalize() {
            return Err(AppError::Forbidden(
                "Only admin or HR can act on the final stage".into(),
            ));
        }
        Ok(role)
    }

    async fn awaiting_final(
        &self,
        request_id: ApprovalRequestId,
        admin_code: &str,
    ) -> Result<ApprovalRequest, AppError> {
        let request = self.ledger.find_by_id(&self.pool, request_id).await?;
        if request.status != ApprovalStatus::ManagerApproved {
            return Err(AppError::Conflict(
                "Request is not awaiting final approval".into(),
            ));
        }
        if request.requester_code == admin_code {
            return Err(AppError::Forbidden(
                "You cannot decide on your own request".into(),
            ));
        }
        Ok(request)
    }
}

/// Rejections need a non-blank reason; an approval reason is optional but
/// still length-checked.
fn decision_reason(approve: bool, reason: Option<&str>) -> Result<Option<&str>, AppError> {
    let trimmed = reason.map(str::trim).filter(|value| !value.is_empty());
    if let Some(value) = trimmed {
        validate_reason(value).map_err(|_| {
            AppError::BadRequest("reason must be at most 500 characters".into())
        })?;
    }
    if approve {
        return Ok(trimmed);
    }
    required_reason(trimmed)
        .map(Some)
        .ok_or_else(|| AppError::BadRequest("A reason is required to reject a request".into()))
}
