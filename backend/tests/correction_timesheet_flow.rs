use chrono::NaiveTime;
use hrms_backend::{
    error::AppError,
    models::{
        approval_request::{ApprovalStatus, RequestType},
        attendance::AttendanceStatus,
        attendance_correction::{CorrectionType, CreateAttendanceCorrection},
        timesheet::TimesheetStatus,
    },
    repositories::{attendance::AttendanceRepository, timesheet::TimesheetRepository},
    services::approval_effects::Submission,
};
use sqlx::PgPool;

mod support;

use support::{
    date, notifications_for, seed_attendance, seed_reporting_chain, seed_timesheet_week,
    test_state, time,
};

fn correction(
    day: chrono::NaiveDate,
    correction_type: CorrectionType,
    corrected_in: Option<NaiveTime>,
    corrected_out: Option<NaiveTime>,
    reason: &str,
) -> Submission {
    Submission::AttendanceCorrection(CreateAttendanceCorrection {
        attendance_date: day,
        correction_type,
        corrected_in,
        corrected_out,
        reason: reason.into(),
    })
}

async fn attendance_row(
    pool: &PgPool,
    emp_code: &str,
    day: chrono::NaiveDate,
) -> Option<(Option<NaiveTime>, Option<NaiveTime>, AttendanceStatus, bool)> {
    AttendanceRepository::new()
        .find_by_employee_and_date(pool, emp_code, day)
        .await
        .expect("read attendance")
        .map(|row| (row.in_time, row.out_time, row.status, row.correction_locked))
}

async fn week_state(
    pool: &PgPool,
    emp_code: &str,
    week_start: chrono::NaiveDate,
) -> (TimesheetStatus, bool) {
    let week = TimesheetRepository::new()
        .find_by_week(pool, emp_code, week_start)
        .await
        .expect("read timesheet week")
        .expect("timesheet week exists");
    (week.status, week.locked)
}

#[sqlx::test(migrations = "./migrations")]
async fn half_day_correction_is_applied_and_locked_after_final_approval(pool: PgPool) {
    let (employee, manager, admin) = seed_reporting_chain(&pool).await;
    let day = date(2024, 6, 3);
    seed_attendance(
        &pool,
        "E1",
        day,
        Some(time(10, 15)),
        None,
        AttendanceStatus::Present,
        false,
    )
    .await;
    let state = test_state(pool.clone());

    let submitted = state
        .workflow
        .submit(
            &employee.emp_code,
            correction(
                day,
                CorrectionType::HalfDay,
                Some(time(9, 30)),
                Some(time(13, 30)),
                "Doctor visit",
            ),
        )
        .await
        .expect("submit correction");
    assert_eq!(submitted.status, ApprovalStatus::PendingManager);
    assert_eq!(submitted.request_type, RequestType::AttendanceCorrection);
    assert_eq!(submitted.requester_reason.as_deref(), Some("Doctor visit"));

    let approved = state
        .workflow
        .manager_decide(submitted.id, &manager.emp_code, true, None)
        .await
        .expect("manager approve");
    assert_eq!(approved.status, ApprovalStatus::ManagerApproved);
    // Nothing touches attendance before the final stage.
    assert_eq!(
        attendance_row(&pool, "E1", day).await,
        Some((Some(time(10, 15)), None, AttendanceStatus::Present, false))
    );

    let finalized = state
        .workflow
        .admin_finalize(submitted.id, &admin.emp_code)
        .await
        .expect("admin finalize");
    assert_eq!(finalized.status, ApprovalStatus::AdminApproved);
    assert_eq!(
        attendance_row(&pool, "E1", day).await,
        Some((
            Some(time(9, 30)),
            Some(time(13, 30)),
            AttendanceStatus::HalfDay,
            true
        ))
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn correction_without_existing_attendance_creates_the_row(pool: PgPool) {
    let (employee, manager, admin) = seed_reporting_chain(&pool).await;
    let day = date(2024, 6, 4);
    let state = test_state(pool.clone());

    let submitted = state
        .workflow
        .submit(
            &employee.emp_code,
            correction(
                day,
                CorrectionType::MissingPunch,
                Some(time(9, 0)),
                Some(time(18, 0)),
                "Forgot to punch",
            ),
        )
        .await
        .expect("submit correction");
    state
        .workflow
        .manager_decide(submitted.id, &manager.emp_code, true, None)
        .await
        .expect("manager approve");
    state
        .workflow
        .admin_finalize(submitted.id, &admin.emp_code)
        .await
        .expect("admin finalize");

    assert_eq!(
        attendance_row(&pool, "E1", day).await,
        Some((Some(time(9, 0)), Some(time(18, 0)), AttendanceStatus::Present, true))
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn locked_or_pending_days_refuse_new_corrections(pool: PgPool) {
    let (employee, _manager, _admin) = seed_reporting_chain(&pool).await;
    let locked_day = date(2024, 6, 5);
    seed_attendance(
        &pool,
        "E1",
        locked_day,
        Some(time(9, 0)),
        Some(time(18, 0)),
        AttendanceStatus::Present,
        true,
    )
    .await;
    let state = test_state(pool.clone());

    let err = state
        .workflow
        .submit(
            &employee.emp_code,
            correction(locked_day, CorrectionType::Wfh, None, None, "Worked from home"),
        )
        .await
        .expect_err("locked day");
    assert!(matches!(err, AppError::Conflict(_)));

    let open_day = date(2024, 6, 6);
    state
        .workflow
        .submit(
            &employee.emp_code,
            correction(open_day, CorrectionType::Wfh, None, None, "Worked from home"),
        )
        .await
        .expect("first correction");
    let err = state
        .workflow
        .submit(
            &employee.emp_code,
            correction(
                open_day,
                CorrectionType::WrongPunch,
                Some(time(8, 0)),
                None,
                "Actually came in",
            ),
        )
        .await
        .expect_err("second correction for the same day");
    assert!(matches!(err, AppError::Conflict(_)));
}

#[sqlx::test(migrations = "./migrations")]
async fn correction_payload_rules_are_enforced(pool: PgPool) {
    let (employee, _manager, _admin) = seed_reporting_chain(&pool).await;
    let state = test_state(pool.clone());

    let err = state
        .workflow
        .submit(
            &employee.emp_code,
            correction(
                date(2024, 6, 3),
                CorrectionType::HalfDay,
                Some(time(13, 30)),
                Some(time(9, 30)),
                "Doctor visit",
            ),
        )
        .await
        .expect_err("inverted punches");
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = state
        .workflow
        .submit(
            &employee.emp_code,
            correction(date(2024, 6, 3), CorrectionType::MissingPunch, None, None, "  "),
        )
        .await
        .expect_err("blank reason");
    assert!(matches!(err, AppError::Validation(_) | AppError::BadRequest(_)));
}

#[sqlx::test(migrations = "./migrations")]
async fn timesheet_submission_locks_the_week_once_finalized(pool: PgPool) {
    let (employee, manager, admin) = seed_reporting_chain(&pool).await;
    let week_start = date(2024, 6, 3);
    let week_id =
        seed_timesheet_week(&pool, "E1", week_start, TimesheetStatus::Draft, false).await;
    let state = test_state(pool.clone());

    let submitted = state
        .workflow
        .submit(&employee.emp_code, Submission::Timesheet { week_start })
        .await
        .expect("submit timesheet");
    assert_eq!(submitted.entity_id, week_id.to_string());
    assert_eq!(
        week_state(&pool, "E1", week_start).await,
        (TimesheetStatus::Submitted, true)
    );

    state
        .workflow
        .manager_decide(submitted.id, &manager.emp_code, true, None)
        .await
        .expect("manager approve");
    assert_eq!(
        week_state(&pool, "E1", week_start).await,
        (TimesheetStatus::ManagerApproved, true)
    );

    state
        .workflow
        .admin_finalize(submitted.id, &admin.emp_code)
        .await
        .expect("admin finalize");
    assert_eq!(week_state(&pool, "E1", week_start).await, (TimesheetStatus::Approved, true));
}

#[sqlx::test(migrations = "./migrations")]
async fn rejected_timesheet_reopens_for_editing(pool: PgPool) {
    let (employee, manager, _admin) = seed_reporting_chain(&pool).await;
    let week_start = date(2024, 6, 10);
    seed_timesheet_week(&pool, "E1", week_start, TimesheetStatus::Draft, false).await;
    let state = test_state(pool.clone());

    let submitted = state
        .workflow
        .submit(&employee.emp_code, Submission::Timesheet { week_start })
        .await
        .expect("submit timesheet");
    state
        .workflow
        .manager_decide(
            submitted.id,
            &manager.emp_code,
            false,
            Some("Project codes missing"),
        )
        .await
        .expect("manager reject");

    assert_eq!(week_state(&pool, "E1", week_start).await, (TimesheetStatus::Rejected, false));

    // The reopened week can be submitted again under a new request.
    let resubmitted = state
        .workflow
        .submit(&employee.emp_code, Submission::Timesheet { week_start })
        .await
        .expect("resubmit timesheet");
    assert_ne!(resubmitted.id, submitted.id);
    assert_eq!(resubmitted.entity_id, submitted.entity_id);
}

#[sqlx::test(migrations = "./migrations")]
async fn timesheet_edit_rejection_keeps_week_locked_and_notifies_reason(pool: PgPool) {
    let (employee, manager, _admin) = seed_reporting_chain(&pool).await;
    let week_start = date(2024, 5, 27);
    seed_timesheet_week(&pool, "E1", week_start, TimesheetStatus::Approved, true).await;
    let state = test_state(pool.clone());

    let submitted = state
        .workflow
        .submit(
            &employee.emp_code,
            Submission::TimesheetEdit {
                week_start,
                reason: "Missed Friday hours".into(),
            },
        )
        .await
        .expect("submit edit request");
    assert_eq!(submitted.request_type, RequestType::TimesheetEdit);

    let rejected = state
        .workflow
        .manager_decide(
            submitted.id,
            &manager.emp_code,
            false,
            Some("insufficient justification"),
        )
        .await
        .expect("manager reject");
    assert_eq!(rejected.status, ApprovalStatus::ManagerRejected);

    assert_eq!(week_state(&pool, "E1", week_start).await, (TimesheetStatus::Approved, true));
    let edit_status = sqlx::query_scalar::<_, String>(
        "SELECT status FROM timesheet_edit_requests WHERE id = $1",
    )
    .bind(&submitted.entity_id)
    .fetch_one(&pool)
    .await
    .expect("read edit request");
    assert_eq!(edit_status, "rejected");

    let inbox = notifications_for(&pool, "E1").await;
    assert_eq!(inbox.len(), 1);
    assert!(inbox[0].contains("insufficient justification"));
}

#[sqlx::test(migrations = "./migrations")]
async fn timesheet_edit_requires_a_locked_week(pool: PgPool) {
    let (employee, manager, admin) = seed_reporting_chain(&pool).await;
    let draft_week = date(2024, 6, 17);
    seed_timesheet_week(&pool, "E1", draft_week, TimesheetStatus::Draft, false).await;
    let locked_week = date(2024, 6, 24);
    seed_timesheet_week(&pool, "E1", locked_week, TimesheetStatus::Approved, true).await;
    let state = test_state(pool.clone());

    let err = state
        .workflow
        .submit(
            &employee.emp_code,
            Submission::TimesheetEdit {
                week_start: draft_week,
                reason: "Typo".into(),
            },
        )
        .await
        .expect_err("draft weeks are edited directly");
    assert!(matches!(err, AppError::Conflict(_)));

    let submitted = state
        .workflow
        .submit(
            &employee.emp_code,
            Submission::TimesheetEdit {
                week_start: locked_week,
                reason: "Client billed wrong project".into(),
            },
        )
        .await
        .expect("submit edit request");
    let err = state
        .workflow
        .submit(
            &employee.emp_code,
            Submission::TimesheetEdit {
                week_start: locked_week,
                reason: "Second try".into(),
            },
        )
        .await
        .expect_err("one open edit request per week");
    assert!(matches!(err, AppError::Conflict(_)));

    state
        .workflow
        .manager_decide(submitted.id, &manager.emp_code, true, None)
        .await
        .expect("manager approve");
    state
        .workflow
        .admin_finalize(submitted.id, &admin.emp_code)
        .await
        .expect("admin finalize");
    assert_eq!(week_state(&pool, "E1", locked_week).await, (TimesheetStatus::Approved, true));
}

#[sqlx::test(migrations = "./migrations")]
async fn timesheet_edit_waits_for_the_week_to_be_approved(pool: PgPool) {
    let (employee, manager, admin) = seed_reporting_chain(&pool).await;
    let week_start = date(2024, 7, 1);
    seed_timesheet_week(&pool, "E1", week_start, TimesheetStatus::Draft, false).await;
    let state = test_state(pool.clone());

    let submission = state
        .workflow
        .submit(&employee.emp_code, Submission::Timesheet { week_start })
        .await
        .expect("submit timesheet");

    let err = state
        .workflow
        .submit(
            &employee.emp_code,
            Submission::TimesheetEdit {
                week_start,
                reason: "Forgot Thursday".into(),
            },
        )
        .await
        .expect_err("week still pending its own approval");
    assert!(matches!(err, AppError::Conflict(_)));

    // The submission itself keeps moving through the chain.
    state
        .workflow
        .manager_decide(submission.id, &manager.emp_code, true, None)
        .await
        .expect("manager approve timesheet");
    let finalized = state
        .workflow
        .admin_finalize(submission.id, &admin.emp_code)
        .await
        .expect("admin finalize timesheet");
    assert_eq!(finalized.status, ApprovalStatus::AdminApproved);
    assert_eq!(week_state(&pool, "E1", week_start).await, (TimesheetStatus::Approved, true));

    let edit = state
        .workflow
        .submit(
            &employee.emp_code,
            Submission::TimesheetEdit {
                week_start,
                reason: "Forgot Thursday".into(),
            },
        )
        .await
        .expect("edit after approval");
    assert_eq!(edit.status, ApprovalStatus::PendingManager);
}
