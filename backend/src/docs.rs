#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use axum::Json;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};

use crate::{
    handlers::{admin::ApprovalExportResponse, NotificationListQuery},
    middleware::auth::EMP_CODE_HEADER,
    models::{
        approval_request::{
            ApprovalActionResponse, ApprovalRequest, ApprovalStatus, DecisionPayload, RequestType,
        },
        attendance_correction::{CorrectionType, CreateAttendanceCorrection},
        employee::{AssignReportingManagerPayload, Employee, Role},
        holiday::{
            CreateHolidayPayload, Holiday, HolidayCalendarEntryResponse, HolidayCalendarQuery,
            WeeklyOff, WeeklyOffPayload,
        },
        leave_request::{
            CreateLeaveRequest, LeaveBalance, LeaveType, PartialMode, UpsertLeaveBalancePayload,
        },
        notification::Notification,
        offboarding::CreateOffboardingRequest,
        overtime_request::{CreateOvertimeRequest, OvertimeRequest},
        request::RequestStatus,
        timesheet::{
            CreateTimesheetEditRequest, SaveTimesheetWeekPayload, TimesheetStatus, TimesheetWeek,
        },
        MessageResponse,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        create_leave_request_doc,
        my_leave_balances_doc,
        create_attendance_correction_doc,
        list_my_timesheets_doc,
        save_timesheet_week_doc,
        submit_timesheet_week_doc,
        request_timesheet_edit_doc,
        create_offboarding_request_doc,
        my_approval_requests_doc,
        manager_queue_doc,
        manager_approve_doc,
        manager_reject_doc,
        my_notifications_doc,
        mark_notification_read_doc,
        create_overtime_request_doc,
        my_overtime_requests_doc,
        manager_overtime_queue_doc,
        approve_overtime_doc,
        reject_overtime_doc,
        holiday_calendar_doc,
        admin_queue_doc,
        approval_detail_doc,
        finalize_approval_doc,
        reject_approval_doc,
        export_approvals_doc,
        admin_list_holidays_doc,
        admin_create_holiday_doc,
        admin_delete_holiday_doc,
        admin_list_weekly_offs_doc,
        admin_set_weekly_off_doc,
        assign_reporting_manager_doc,
        upsert_leave_balance_doc
    ),
    components(
        schemas(
            // approval ledger
            ApprovalRequest,
            ApprovalStatus,
            RequestType,
            ApprovalActionResponse,
            DecisionPayload,
            ApprovalExportResponse,
            MessageResponse,
            // submissions
            CreateLeaveRequest,
            LeaveType,
            PartialMode,
            LeaveBalance,
            UpsertLeaveBalancePayload,
            CreateAttendanceCorrection,
            CorrectionType,
            TimesheetWeek,
            TimesheetStatus,
            SaveTimesheetWeekPayload,
            CreateTimesheetEditRequest,
            CreateOffboardingRequest,
            CreateOvertimeRequest,
            OvertimeRequest,
            RequestStatus,
            // directory, calendar, inbox
            Employee,
            Role,
            AssignReportingManagerPayload,
            Holiday,
            WeeklyOff,
            WeeklyOffPayload,
            CreateHolidayPayload,
            HolidayCalendarEntryResponse,
            Notification
        )
    ),
    modifiers(&CallerIdentity),
    tags(
        (name = "Requests", description = "Submitting leave, corrections, timesheets and offboarding"),
        (name = "Approvals", description = "Two-stage approval chain"),
        (name = "Overtime", description = "Single-stage overtime approvals"),
        (name = "Notifications", description = "Per-employee inbox"),
        (name = "Calendar", description = "Public holidays and weekly offs"),
        (name = "Admin", description = "Final approval and HR administration")
    ),
    security(("EmpCode" = []))
)]
pub struct ApiDoc;

struct CallerIdentity;

impl Modify for CallerIdentity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "EmpCode",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(EMP_CODE_HEADER))),
        );
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[utoipa::path(
    post,
    path = "/api/leave-requests",
    request_body = CreateLeaveRequest,
    responses(
        (status = 201, description = "Submitted to the reporting manager", body = ApprovalActionResponse),
        (status = 400, description = "Invalid range, insufficient balance or no reporting manager"),
        (status = 409, description = "Overlapping leave")
    ),
    tag = "Requests"
)]
fn create_leave_request_doc() {}

#[utoipa::path(
    get,
    path = "/api/leave-balances/me",
    responses((status = 200, body = [LeaveBalance])),
    tag = "Requests"
)]
fn my_leave_balances_doc() {}

#[utoipa::path(
    post,
    path = "/api/attendance-corrections",
    request_body = CreateAttendanceCorrection,
    responses(
        (status = 201, body = ApprovalActionResponse),
        (status = 409, description = "Day already corrected or correction pending")
    ),
    tag = "Requests"
)]
fn create_attendance_correction_doc() {}

#[utoipa::path(
    get,
    path = "/api/timesheets/me",
    responses((status = 200, body = [TimesheetWeek])),
    tag = "Requests"
)]
fn list_my_timesheets_doc() {}

#[utoipa::path(
    put,
    path = "/api/timesheets/{week_start}",
    params(("week_start" = String, Path, description = "Monday of the week, YYYY-MM-DD")),
    request_body = SaveTimesheetWeekPayload,
    responses(
        (status = 200, body = TimesheetWeek),
        (status = 409, description = "Week is locked or already submitted")
    ),
    tag = "Requests"
)]
fn save_timesheet_week_doc() {}

#[utoipa::path(
    post,
    path = "/api/timesheets/{week_start}/submit",
    params(("week_start" = String, Path, description = "Monday of the week, YYYY-MM-DD")),
    responses((status = 201, body = ApprovalActionResponse)),
    tag = "Requests"
)]
fn submit_timesheet_week_doc() {}

#[utoipa::path(
    post,
    path = "/api/timesheets/{week_start}/edit-request",
    params(("week_start" = String, Path, description = "Monday of the week, YYYY-MM-DD")),
    request_body = CreateTimesheetEditRequest,
    responses(
        (status = 201, body = ApprovalActionResponse),
        (status = 409, description = "Week is not locked or an edit request is open")
    ),
    tag = "Requests"
)]
fn request_timesheet_edit_doc() {}

#[utoipa::path(
    post,
    path = "/api/offboarding",
    request_body = CreateOffboardingRequest,
    responses((status = 201, body = ApprovalActionResponse)),
    tag = "Requests"
)]
fn create_offboarding_request_doc() {}

#[utoipa::path(
    get,
    path = "/api/approvals/me",
    responses((status = 200, description = "Own requests, newest first", body = [ApprovalRequest])),
    tag = "Approvals"
)]
fn my_approval_requests_doc() {}

#[utoipa::path(
    get,
    path = "/api/manager/approvals",
    responses((status = 200, description = "Requests awaiting the caller", body = [ApprovalRequest])),
    tag = "Approvals"
)]
fn manager_queue_doc() {}

#[utoipa::path(
    post,
    path = "/api/manager/approvals/{id}/approve",
    params(("id" = String, Path, description = "Approval request id")),
    request_body(content = DecisionPayload, description = "Optional comment"),
    responses(
        (status = 200, body = ApprovalActionResponse),
        (status = 403, description = "Caller is not the current reporting manager"),
        (status = 409, description = "Request already decided")
    ),
    tag = "Approvals"
)]
fn manager_approve_doc() {}

#[utoipa::path(
    post,
    path = "/api/manager/approvals/{id}/reject",
    params(("id" = String, Path, description = "Approval request id")),
    request_body = DecisionPayload,
    responses(
        (status = 200, body = ApprovalActionResponse),
        (status = 400, description = "Reason missing"),
        (status = 403, description = "Caller is not the current reporting manager"),
        (status = 409, description = "Request already decided")
    ),
    tag = "Approvals"
)]
fn manager_reject_doc() {}

#[utoipa::path(
    get,
    path = "/api/notifications/me",
    params(NotificationListQuery),
    responses((status = 200, body = [Notification])),
    tag = "Notifications"
)]
fn my_notifications_doc() {}

#[utoipa::path(
    put,
    path = "/api/notifications/{id}/read",
    params(("id" = String, Path, description = "Notification id")),
    responses((status = 200, body = MessageResponse), (status = 404)),
    tag = "Notifications"
)]
fn mark_notification_read_doc() {}

#[utoipa::path(
    post,
    path = "/api/overtime",
    request_body = CreateOvertimeRequest,
    responses((status = 201, body = OvertimeRequest)),
    tag = "Overtime"
)]
fn create_overtime_request_doc() {}

#[utoipa::path(
    get,
    path = "/api/overtime/me",
    responses((status = 200, body = [OvertimeRequest])),
    tag = "Overtime"
)]
fn my_overtime_requests_doc() {}

#[utoipa::path(
    get,
    path = "/api/manager/overtime",
    responses((status = 200, body = [OvertimeRequest])),
    tag = "Overtime"
)]
fn manager_overtime_queue_doc() {}

#[utoipa::path(
    post,
    path = "/api/manager/overtime/{id}/approve",
    params(("id" = String, Path, description = "Overtime request id")),
    request_body(content = DecisionPayload, description = "Optional comment"),
    responses((status = 200, body = OvertimeRequest)),
    tag = "Overtime"
)]
fn approve_overtime_doc() {}

#[utoipa::path(
    post,
    path = "/api/manager/overtime/{id}/reject",
    params(("id" = String, Path, description = "Overtime request id")),
    request_body = DecisionPayload,
    responses((status = 200, body = OvertimeRequest)),
    tag = "Overtime"
)]
fn reject_overtime_doc() {}

#[utoipa::path(
    get,
    path = "/api/holidays",
    params(HolidayCalendarQuery),
    responses((status = 200, body = [HolidayCalendarEntryResponse])),
    tag = "Calendar"
)]
fn holiday_calendar_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/approvals",
    responses((status = 200, description = "MANAGER_APPROVED queue", body = [ApprovalRequest])),
    tag = "Admin"
)]
fn admin_queue_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/approvals/{id}",
    params(("id" = String, Path, description = "Approval request id")),
    responses((status = 200, body = ApprovalRequest), (status = 404)),
    tag = "Admin"
)]
fn approval_detail_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/approvals/{id}/finalize",
    params(("id" = String, Path, description = "Approval request id")),
    responses(
        (status = 200, body = ApprovalActionResponse),
        (status = 409, description = "Not awaiting final approval")
    ),
    tag = "Admin"
)]
fn finalize_approval_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/approvals/{id}/reject",
    params(("id" = String, Path, description = "Approval request id")),
    request_body = DecisionPayload,
    responses((status = 200, body = ApprovalActionResponse)),
    tag = "Admin"
)]
fn reject_approval_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/approvals/export",
    params(
        ("status" = Option<String>, Query, description = "Ledger status"),
        ("type" = Option<String>, Query, description = "Request type"),
        ("requester_code" = Option<String>, Query),
        ("from" = Option<String>, Query, description = "YYYY-MM-DD"),
        ("to" = Option<String>, Query, description = "YYYY-MM-DD")
    ),
    responses((status = 200, body = ApprovalExportResponse)),
    tag = "Admin"
)]
fn export_approvals_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/holidays",
    responses((status = 200, body = [Holiday])),
    tag = "Admin"
)]
fn admin_list_holidays_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/holidays",
    request_body = CreateHolidayPayload,
    responses((status = 201, body = Holiday), (status = 409)),
    tag = "Admin"
)]
fn admin_create_holiday_doc() {}

#[utoipa::path(
    delete,
    path = "/api/admin/holidays/{id}",
    params(("id" = String, Path, description = "Holiday id")),
    responses((status = 200, body = MessageResponse), (status = 404)),
    tag = "Admin"
)]
fn admin_delete_holiday_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/weekly-offs",
    responses((status = 200, body = [WeeklyOff])),
    tag = "Admin"
)]
fn admin_list_weekly_offs_doc() {}

#[utoipa::path(
    put,
    path = "/api/admin/weekly-offs/{weekday}",
    params(("weekday" = i16, Path, description = "0 = Monday .. 6 = Sunday")),
    request_body = WeeklyOffPayload,
    responses((status = 200, body = WeeklyOff)),
    tag = "Admin"
)]
fn admin_set_weekly_off_doc() {}

#[utoipa::path(
    put,
    path = "/api/admin/employees/{emp_code}/reporting-manager",
    params(("emp_code" = String, Path)),
    request_body = AssignReportingManagerPayload,
    responses((status = 200, body = Employee)),
    tag = "Admin"
)]
fn assign_reporting_manager_doc() {}

#[utoipa::path(
    put,
    path = "/api/admin/leave-balances",
    request_body = UpsertLeaveBalancePayload,
    responses((status = 200, body = LeaveBalance)),
    tag = "Admin"
)]
fn upsert_leave_balance_doc() {}
