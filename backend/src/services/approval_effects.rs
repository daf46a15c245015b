//! Per-type domain effects of the approval chain.
//!
//! Every function here runs on the caller's transaction. The ledger row is
//! written by [`crate::services::approval_workflow`]; these functions only
//! touch the domain tables the request governs.

use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use sqlx::PgConnection;
use validator::Validate;

use crate::error::AppError;
use crate::models::approval_request::{ApprovalRequest, ApprovalStatus, RequestType};
use crate::models::attendance::AttendanceStatus;
use crate::models::attendance_correction::{AttendanceCorrection, CreateAttendanceCorrection};
use crate::models::leave_request::{leave_days, CreateLeaveRequest, LeaveRequest, PartialMode};
use crate::models::offboarding::OffboardingRequest;
use crate::models::request::RequestStatus;
use crate::models::timesheet::{TimesheetEditRequest, TimesheetStatus};
use crate::repositories::attendance::AttendanceRepository;
use crate::repositories::attendance_correction::AttendanceCorrectionRepository;
use crate::repositories::employee::EmployeeRepository;
use crate::repositories::leave_request::{LeaveBalanceRepository, LeaveRequestRepository};
use crate::repositories::offboarding::OffboardingRepository;
use crate::repositories::timesheet::TimesheetRepository;
use crate::services::holiday::HolidayService;
use crate::utils::time::dates_inclusive;
use crate::validation::rules::{validate_reason, validate_week_start};

/// What an employee asks the chain to approve.
#[derive(Debug, Clone)]
pub enum Submission {
    Leave(CreateLeaveRequest),
    AttendanceCorrection(CreateAttendanceCorrection),
    Timesheet {
        week_start: NaiveDate,
    },
    TimesheetEdit {
        week_start: NaiveDate,
        reason: String,
    },
    Offboarding {
        resignation_date: NaiveDate,
        requested_lwd: NaiveDate,
        reason: String,
    },
}

impl Submission {
    pub fn request_type(&self) -> RequestType {
        match self {
            Submission::Leave(_) => RequestType::Leave,
            Submission::AttendanceCorrection(_) => RequestType::AttendanceCorrection,
            Submission::Timesheet { .. } => RequestType::Timesheet,
            Submission::TimesheetEdit { .. } => RequestType::TimesheetEdit,
            Submission::Offboarding { .. } => RequestType::Offboarding,
        }
    }

    /// Free text copied onto the ledger row.
    pub fn requester_reason(&self) -> Option<String> {
        let reason = match self {
            Submission::Leave(payload) => payload.reason.as_deref(),
            Submission::AttendanceCorrection(payload) => Some(payload.reason.as_str()),
            Submission::Timesheet { .. } => None,
            Submission::TimesheetEdit { reason, .. } | Submission::Offboarding { reason, .. } => {
                Some(reason.as_str())
            }
        };
        reason
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    /// Payload rules that need no database access.
    pub fn validate(&self) -> Result<(), AppError> {
        match self {
            Submission::Leave(payload) => {
                payload.validate()?;
                leave_days(payload.start_date, payload.end_date, payload.partial_mode)
                    .map(|_| ())
                    .map_err(AppError::BadRequest)
            }
            Submission::AttendanceCorrection(payload) => {
                payload.validate()?;
                payload.check_times().map_err(AppError::BadRequest)
            }
            Submission::Timesheet { week_start } => check_week_start(week_start),
            Submission::TimesheetEdit { week_start, reason } => {
                check_week_start(week_start)?;
                check_reason(reason)
            }
            Submission::Offboarding {
                resignation_date,
                requested_lwd,
                reason,
            } => {
                check_reason(reason)?;
                if requested_lwd < resignation_date {
                    return Err(AppError::BadRequest(
                        "requested_lwd must be on or after resignation_date".into(),
                    ));
                }
                Ok(())
            }
        }
    }
}

fn check_week_start(week_start: &NaiveDate) -> Result<(), AppError> {
    validate_week_start(week_start)
        .map_err(|_| AppError::BadRequest("week_start must be a Monday".into()))
}

fn check_reason(reason: &str) -> Result<(), AppError> {
    validate_reason(reason).map_err(|_| {
        AppError::BadRequest("reason is required and must be at most 500 characters".into())
    })
}

fn entity_id<T: FromStr>(request: &ApprovalRequest) -> Result<T, AppError> {
    request.entity_id.parse::<T>().map_err(|_| {
        AppError::InternalServerError(anyhow::anyhow!(
            "approval request {} references malformed entity id {}",
            request.id,
            request.entity_id
        ))
    })
}

/// Checks the per-type preconditions and creates (or transitions) the domain
/// row. Returns the id stored as the ledger's `entity_id`.
///
/// The requester's employee row stays locked until the caller commits, so
/// overlap and open-request checks see every earlier submission.
pub async fn create_entity(
    conn: &mut PgConnection,
    requester_code: &str,
    submission: &Submission,
    now: DateTime<Utc>,
) -> Result<String, AppError> {
    EmployeeRepository::new()
        .lock_for_submission(&mut *conn, requester_code)
        .await?;
    match submission {
        Submission::Leave(payload) => {
            let days = leave_days(payload.start_date, payload.end_date, payload.partial_mode)
                .map_err(AppError::BadRequest)?;
            let year = payload.start_date.year();
            let balance = LeaveBalanceRepository::new()
                .find(&mut *conn, requester_code, payload.leave_type, year)
                .await?
                .ok_or_else(|| {
                    AppError::BadRequest(format!(
                        "No {} leave balance for {}",
                        payload.leave_type.db_value(),
                        year
                    ))
                })?;
            if balance.balance < days {
                return Err(AppError::BadRequest(format!(
                    "Insufficient leave balance: {} day(s) requested, {} available",
                    days, balance.balance
                )));
            }

            let leave_repo = LeaveRequestRepository::new();
            if leave_repo
                .has_overlap(&mut *conn, requester_code, payload.start_date, payload.end_date)
                .await?
            {
                return Err(AppError::Conflict(
                    "Leave overlaps an existing leave request".into(),
                ));
            }
            let leave = LeaveRequest::new(requester_code.to_string(), payload, days);
            let created = leave_repo.create(&mut *conn, &leave).await?;
            Ok(created.id.to_string())
        }
        Submission::AttendanceCorrection(payload) => {
            let existing = AttendanceRepository::new()
                .find_for_update(&mut *conn, requester_code, payload.attendance_date)
                .await?;
            if existing.is_some_and(|row| row.correction_locked) {
                return Err(AppError::Conflict(
                    "Attendance for this date is already corrected and locked".into(),
                ));
            }

            let correction_repo = AttendanceCorrectionRepository::new();
            if correction_repo
                .has_open_for_date(&mut *conn, requester_code, payload.attendance_date)
                .await?
            {
                return Err(AppError::Conflict(
                    "A correction for this date is already awaiting approval".into(),
                ));
            }
            let correction = AttendanceCorrection::new(requester_code.to_string(), payload);
            let created = correction_repo.create(&mut *conn, &correction).await?;
            Ok(created.id.to_string())
        }
        Submission::Timesheet { week_start } => {
            let repo = TimesheetRepository::new();
            let week = repo
                .find_by_week_for_update(&mut *conn, requester_code, *week_start)
                .await?;
            repo.submit(&mut *conn, week.id, now).await?;
            Ok(week.id.to_string())
        }
        Submission::TimesheetEdit { week_start, reason } => {
            let repo = TimesheetRepository::new();
            let week = repo
                .find_by_week_for_update(&mut *conn, requester_code, *week_start)
                .await?;
            if !week.locked {
                return Err(AppError::Conflict(
                    "Timesheet week is not locked and can be edited directly".into(),
                ));
            }
            if week.status != TimesheetStatus::Approved {
                return Err(AppError::Conflict(
                    "Timesheet week is still awaiting approval of its submission".into(),
                ));
            }
            if repo.has_open_edit_request(&mut *conn, week.id).await? {
                return Err(AppError::Conflict(
                    "An edit request for this week is already awaiting approval".into(),
                ));
            }
            let edit = TimesheetEditRequest::new(
                week.id,
                requester_code.to_string(),
                reason.trim().to_string(),
            );
            let created = repo.create_edit_request(&mut *conn, &edit).await?;
            Ok(created.id.to_string())
        }
        Submission::Offboarding {
            resignation_date,
            requested_lwd,
            reason,
        } => {
            let repo = OffboardingRepository::new();
            if repo.has_open_for_employee(&mut *conn, requester_code).await? {
                return Err(AppError::Conflict(
                    "An offboarding request is already in progress".into(),
                ));
            }
            let offboarding = OffboardingRequest::new(
                requester_code.to_string(),
                *resignation_date,
                *requested_lwd,
                reason.trim().to_string(),
            );
            let created = repo.create(&mut *conn, &offboarding).await?;
            Ok(created.id.to_string())
        }
    }
}

/// Mirrors a manager approval onto the domain row. No side effect is applied.
pub async fn apply_manager_approval(
    conn: &mut PgConnection,
    request: &ApprovalRequest,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    let pending = [RequestStatus::Pending];
    let to = RequestStatus::ManagerApproved;
    match request.request_type {
        RequestType::Leave => {
            LeaveRequestRepository::new()
                .update_status(conn, entity_id(request)?, &pending, to, now)
                .await
        }
        RequestType::AttendanceCorrection => {
            AttendanceCorrectionRepository::new()
                .update_status(conn, entity_id(request)?, &pending, to, now)
                .await
        }
        RequestType::Timesheet => {
            TimesheetRepository::new()
                .update_status(
                    conn,
                    entity_id(request)?,
                    TimesheetStatus::Submitted,
                    TimesheetStatus::ManagerApproved,
                    now,
                )
                .await
        }
        RequestType::TimesheetEdit => {
            TimesheetRepository::new()
                .update_edit_request_status(conn, entity_id(request)?, &pending, to, None, now)
                .await
        }
        RequestType::Offboarding => {
            OffboardingRepository::new()
                .update_status(conn, entity_id(request)?, &pending, to, now)
                .await
        }
    }
}

/// Rolls the domain row back to `REJECTED`. `rejected_from` is the ledger
/// status the request held before the rejection.
pub async fn apply_rejection(
    conn: &mut PgConnection,
    request: &ApprovalRequest,
    rejected_from: ApprovalStatus,
    actor_code: &str,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    let from = match rejected_from {
        ApprovalStatus::PendingManager => [RequestStatus::Pending],
        _ => [RequestStatus::ManagerApproved],
    };
    let to = RequestStatus::Rejected;
    match request.request_type {
        RequestType::Leave => {
            LeaveRequestRepository::new()
                .update_status(conn, entity_id(request)?, &from, to, now)
                .await
        }
        RequestType::AttendanceCorrection => {
            AttendanceCorrectionRepository::new()
                .update_status(conn, entity_id(request)?, &from, to, now)
                .await
        }
        RequestType::Timesheet => {
            TimesheetRepository::new()
                .reopen(conn, entity_id(request)?, now)
                .await
        }
        // The week keeps its lock; only the edit request is closed.
        RequestType::TimesheetEdit => {
            TimesheetRepository::new()
                .update_edit_request_status(
                    conn,
                    entity_id(request)?,
                    &from,
                    to,
                    Some(actor_code),
                    now,
                )
                .await
        }
        RequestType::Offboarding => {
            OffboardingRepository::new()
                .update_status(conn, entity_id(request)?, &from, to, now)
                .await
        }
    }
}

/// Applies the admin-stage side effect and marks the domain row approved.
pub async fn apply_finalization(
    conn: &mut PgConnection,
    request: &ApprovalRequest,
    admin_code: &str,
    holidays: &HolidayService,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    match request.request_type {
        RequestType::Leave => finalize_leave(conn, request, admin_code, holidays, now).await,
        RequestType::AttendanceCorrection => {
            let repo = AttendanceCorrectionRepository::new();
            let correction = repo.find_for_update(&mut *conn, entity_id(request)?).await?;
            AttendanceRepository::new()
                .apply_correction(
                    &mut *conn,
                    &correction.emp_code,
                    correction.attendance_date,
                    correction.corrected_in,
                    correction.corrected_out,
                    correction.correction_type.resulting_status(),
                    now,
                )
                .await?;
            repo.approve(conn, correction.id, admin_code, now).await
        }
        RequestType::Timesheet => {
            TimesheetRepository::new()
                .finalize_submission(conn, entity_id(request)?, admin_code, now)
                .await
        }
        RequestType::TimesheetEdit => {
            let repo = TimesheetRepository::new();
            let edit = repo
                .find_edit_request_for_update(&mut *conn, entity_id(request)?)
                .await?;
            repo.update_edit_request_status(
                &mut *conn,
                edit.id,
                &[RequestStatus::ManagerApproved],
                RequestStatus::Approved,
                Some(admin_code),
                now,
            )
            .await?;
            repo.lock_approved(conn, edit.week_id, admin_code, now).await
        }
        RequestType::Offboarding => {
            OffboardingRepository::new()
                .approve(conn, entity_id(request)?, admin_code, now)
                .await
        }
    }
}

async fn finalize_leave(
    conn: &mut PgConnection,
    request: &ApprovalRequest,
    admin_code: &str,
    holidays: &HolidayService,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    let leave_repo = LeaveRequestRepository::new();
    let leave = leave_repo
        .find_for_update(&mut *conn, entity_id(request)?)
        .await?;

    let non_working = holidays
        .non_working_days(leave.start_date, leave.end_date)
        .await?;
    let day_status = match leave.partial_mode {
        PartialMode::Half => AttendanceStatus::HalfDay,
        PartialMode::Full => AttendanceStatus::Leave,
    };

    let attendance_repo = AttendanceRepository::new();
    let mut written = 0usize;
    for date in dates_inclusive(leave.start_date, leave.end_date) {
        if non_working.contains(&date) {
            continue;
        }
        if attendance_repo
            .upsert_leave_day(&mut *conn, &leave.emp_code, date, day_status, now)
            .await?
        {
            written += 1;
        }
    }

    LeaveBalanceRepository::new()
        .debit(
            &mut *conn,
            &leave.emp_code,
            leave.leave_type,
            leave.start_date.year(),
            leave.leave_days,
        )
        .await?;
    leave_repo.approve(conn, leave.id, admin_code, now).await?;

    tracing::debug!(
        leave_id = %leave.id,
        emp_code = %leave.emp_code,
        attendance_rows = written,
        skipped_non_working = non_working.len(),
        "leave applied to attendance"
    );
    Ok(())
}
