use hrms_backend::{
    error::AppError,
    models::{
        approval_request::ApprovalStatus,
        attendance::AttendanceStatus,
        leave_request::{CreateLeaveRequest, LeaveType, PartialMode},
    },
    services::approval_effects::Submission,
};
use sqlx::PgPool;

mod support;

use support::{
    date, leave_balance, notifications_for, seed_holiday, seed_leave_balance,
    seed_reporting_chain, seed_weekly_off, test_state,
};

fn leave(
    leave_type: LeaveType,
    start: chrono::NaiveDate,
    end: chrono::NaiveDate,
    partial_mode: PartialMode,
) -> Submission {
    Submission::Leave(CreateLeaveRequest {
        leave_type,
        start_date: start,
        end_date: end,
        partial_mode,
        reason: Some("family function".into()),
    })
}

async fn attendance_rows(pool: &PgPool, emp_code: &str) -> Vec<(chrono::NaiveDate, String)> {
    sqlx::query_as::<_, (chrono::NaiveDate, String)>(
        "SELECT date, status FROM attendance WHERE emp_code = $1 ORDER BY date",
    )
    .bind(emp_code)
    .fetch_all(pool)
    .await
    .expect("read attendance")
}

async fn leave_status(pool: &PgPool, id: &str) -> String {
    sqlx::query_scalar::<_, String>("SELECT status FROM leave_requests WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("read leave status")
}

#[sqlx::test(migrations = "./migrations")]
async fn single_weekday_leave_produces_one_leave_row(pool: PgPool) {
    let (employee, manager, admin) = seed_reporting_chain(&pool).await;
    seed_leave_balance(&pool, "E1", LeaveType::Cl, 2024, 5.0).await;
    let state = test_state(pool.clone());
    let monday = date(2024, 6, 3);

    let submitted = state
        .workflow
        .submit(
            &employee.emp_code,
            leave(LeaveType::Cl, monday, monday, PartialMode::Full),
        )
        .await
        .expect("submit leave");
    assert_eq!(submitted.status, ApprovalStatus::PendingManager);
    assert_eq!(submitted.approver_code.as_deref(), Some("M1"));

    let approved = state
        .workflow
        .manager_decide(submitted.id, &manager.emp_code, true, None)
        .await
        .expect("manager approve");
    assert_eq!(approved.status, ApprovalStatus::ManagerApproved);
    assert!(attendance_rows(&pool, "E1").await.is_empty());

    let finalized = state
        .workflow
        .admin_finalize(submitted.id, &admin.emp_code)
        .await
        .expect("admin finalize");
    assert_eq!(finalized.status, ApprovalStatus::AdminApproved);
    assert_eq!(finalized.final_approver_code.as_deref(), Some("A1"));

    assert_eq!(
        attendance_rows(&pool, "E1").await,
        vec![(monday, AttendanceStatus::Leave.db_value().to_string())]
    );
    assert_eq!(leave_status(&pool, &submitted.entity_id).await, "approved");
    assert_eq!(leave_balance(&pool, "E1", LeaveType::Cl, 2024).await, 4.0);

    let inbox = notifications_for(&pool, "E1").await;
    assert_eq!(inbox.len(), 2);
    assert!(inbox[1].contains("approved"));
    assert_eq!(notifications_for(&pool, "M1").await.len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn leave_on_a_holiday_writes_no_attendance_but_debits_balance(pool: PgPool) {
    let (employee, manager, admin) = seed_reporting_chain(&pool).await;
    seed_leave_balance(&pool, "E1", LeaveType::Al, 2024, 10.0).await;
    let christmas = date(2024, 12, 25);
    seed_holiday(&pool, christmas, "Christmas").await;
    let state = test_state(pool.clone());

    let submitted = state
        .workflow
        .submit(
            &employee.emp_code,
            leave(LeaveType::Al, christmas, christmas, PartialMode::Full),
        )
        .await
        .expect("submit leave");
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

    assert!(attendance_rows(&pool, "E1").await.is_empty());
    assert_eq!(leave_balance(&pool, "E1", LeaveType::Al, 2024).await, 9.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn leave_range_skips_weekly_offs_and_holidays(pool: PgPool) {
    let (employee, manager, admin) = seed_reporting_chain(&pool).await;
    seed_leave_balance(&pool, "E1", LeaveType::Al, 2024, 10.0).await;
    // Saturday and Sunday off; Tuesday 2024-08-13 is a public holiday.
    seed_weekly_off(&pool, 5).await;
    seed_weekly_off(&pool, 6).await;
    seed_holiday(&pool, date(2024, 8, 13), "Founders day").await;
    let state = test_state(pool.clone());

    let submitted = state
        .workflow
        .submit(
            &employee.emp_code,
            leave(LeaveType::Al, date(2024, 8, 9), date(2024, 8, 13), PartialMode::Full),
        )
        .await
        .expect("submit leave");
    state
        .workflow
        .manager_decide(submitted.id, &manager.emp_code, true, Some("enjoy"))
        .await
        .expect("manager approve");
    state
        .workflow
        .admin_finalize(submitted.id, &admin.emp_code)
        .await
        .expect("admin finalize");

    let days: Vec<_> = attendance_rows(&pool, "E1")
        .await
        .into_iter()
        .map(|(day, _)| day)
        .collect();
    assert_eq!(days, vec![date(2024, 8, 9), date(2024, 8, 12)]);
    assert_eq!(leave_balance(&pool, "E1", LeaveType::Al, 2024).await, 5.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn half_day_leave_marks_half_day_and_debits_half(pool: PgPool) {
    let (employee, manager, admin) = seed_reporting_chain(&pool).await;
    seed_leave_balance(&pool, "E1", LeaveType::Sl, 2024, 2.0).await;
    let state = test_state(pool.clone());
    let day = date(2024, 6, 4);

    let submitted = state
        .workflow
        .submit(&employee.emp_code, leave(LeaveType::Sl, day, day, PartialMode::Half))
        .await
        .expect("submit leave");
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
        attendance_rows(&pool, "E1").await,
        vec![(day, AttendanceStatus::HalfDay.db_value().to_string())]
    );
    assert_eq!(leave_balance(&pool, "E1", LeaveType::Sl, 2024).await, 1.5);
}

#[sqlx::test(migrations = "./migrations")]
async fn second_finalize_conflicts_and_applies_effect_once(pool: PgPool) {
    let (employee, manager, admin) = seed_reporting_chain(&pool).await;
    seed_leave_balance(&pool, "E1", LeaveType::Cl, 2024, 3.0).await;
    let state = test_state(pool.clone());
    let day = date(2024, 6, 5);

    let submitted = state
        .workflow
        .submit(&employee.emp_code, leave(LeaveType::Cl, day, day, PartialMode::Full))
        .await
        .expect("submit leave");
    state
        .workflow
        .manager_decide(submitted.id, &manager.emp_code, true, None)
        .await
        .expect("manager approve");
    state
        .workflow
        .admin_finalize(submitted.id, &admin.emp_code)
        .await
        .expect("first finalize");

    let err = state
        .workflow
        .admin_finalize(submitted.id, &admin.emp_code)
        .await
        .expect_err("second finalize must fail");
    assert!(matches!(err, AppError::Conflict(_)));

    assert_eq!(attendance_rows(&pool, "E1").await.len(), 1);
    assert_eq!(leave_balance(&pool, "E1", LeaveType::Cl, 2024).await, 2.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn concurrent_finalize_lets_exactly_one_win(pool: PgPool) {
    let (employee, manager, admin) = seed_reporting_chain(&pool).await;
    seed_leave_balance(&pool, "E1", LeaveType::Cl, 2024, 3.0).await;
    let state = test_state(pool.clone());
    let day = date(2024, 6, 6);

    let submitted = state
        .workflow
        .submit(&employee.emp_code, leave(LeaveType::Cl, day, day, PartialMode::Full))
        .await
        .expect("submit leave");
    state
        .workflow
        .manager_decide(submitted.id, &manager.emp_code, true, None)
        .await
        .expect("manager approve");

    let (first, second) = tokio::join!(
        state.workflow.admin_finalize(submitted.id, &admin.emp_code),
        state.workflow.admin_finalize(submitted.id, &admin.emp_code),
    );
    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|result| result.is_ok()).count(), 1);
    assert!(outcomes
        .iter()
        .any(|result| matches!(result, Err(AppError::Conflict(_)))));

    assert_eq!(attendance_rows(&pool, "E1").await.len(), 1);
    assert_eq!(leave_balance(&pool, "E1", LeaveType::Cl, 2024).await, 2.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn manager_rejection_never_applies_the_final_effect(pool: PgPool) {
    let (employee, manager, admin) = seed_reporting_chain(&pool).await;
    seed_leave_balance(&pool, "E1", LeaveType::Cl, 2024, 3.0).await;
    let state = test_state(pool.clone());
    let day = date(2024, 6, 7);

    let submitted = state
        .workflow
        .submit(&employee.emp_code, leave(LeaveType::Cl, day, day, PartialMode::Full))
        .await
        .expect("submit leave");
    let rejected = state
        .workflow
        .manager_decide(submitted.id, &manager.emp_code, false, Some("team offsite"))
        .await
        .expect("manager reject");
    assert_eq!(rejected.status, ApprovalStatus::ManagerRejected);
    assert_eq!(rejected.approver_reason.as_deref(), Some("team offsite"));

    let err = state
        .workflow
        .admin_finalize(submitted.id, &admin.emp_code)
        .await
        .expect_err("finalize after rejection");
    assert!(matches!(err, AppError::Conflict(_)));

    assert!(attendance_rows(&pool, "E1").await.is_empty());
    assert_eq!(leave_status(&pool, &submitted.entity_id).await, "rejected");
    assert_eq!(leave_balance(&pool, "E1", LeaveType::Cl, 2024).await, 3.0);
    let inbox = notifications_for(&pool, "E1").await;
    assert!(inbox.iter().any(|message| message.contains("team offsite")));
}

#[sqlx::test(migrations = "./migrations")]
async fn admin_rejection_keeps_balance_and_attendance(pool: PgPool) {
    let (employee, manager, admin) = seed_reporting_chain(&pool).await;
    seed_leave_balance(&pool, "E1", LeaveType::Cl, 2024, 3.0).await;
    let state = test_state(pool.clone());
    let day = date(2024, 6, 10);

    let submitted = state
        .workflow
        .submit(&employee.emp_code, leave(LeaveType::Cl, day, day, PartialMode::Full))
        .await
        .expect("submit leave");
    state
        .workflow
        .manager_decide(submitted.id, &manager.emp_code, true, None)
        .await
        .expect("manager approve");

    let err = state
        .workflow
        .admin_reject(submitted.id, &admin.emp_code, None)
        .await
        .expect_err("reason required");
    assert!(matches!(err, AppError::BadRequest(_)));

    let rejected = state
        .workflow
        .admin_reject(submitted.id, &admin.emp_code, Some("quarter close"))
        .await
        .expect("admin reject");
    assert_eq!(rejected.status, ApprovalStatus::AdminRejected);
    assert_eq!(rejected.final_reason.as_deref(), Some("quarter close"));

    assert!(attendance_rows(&pool, "E1").await.is_empty());
    assert_eq!(leave_status(&pool, &submitted.entity_id).await, "rejected");
    assert_eq!(leave_balance(&pool, "E1", LeaveType::Cl, 2024).await, 3.0);
    let inbox = notifications_for(&pool, "E1").await;
    assert!(inbox.last().is_some_and(|message| message.contains("quarter close")));
}

#[sqlx::test(migrations = "./migrations")]
async fn leave_submission_checks_balance_and_overlap(pool: PgPool) {
    let (employee, _manager, _admin) = seed_reporting_chain(&pool).await;
    seed_leave_balance(&pool, "E1", LeaveType::Cl, 2024, 2.0).await;
    let state = test_state(pool.clone());

    let err = state
        .workflow
        .submit(
            &employee.emp_code,
            leave(LeaveType::Cl, date(2024, 6, 3), date(2024, 6, 5), PartialMode::Full),
        )
        .await
        .expect_err("three days exceed the balance");
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = state
        .workflow
        .submit(
            &employee.emp_code,
            leave(LeaveType::Sl, date(2024, 6, 3), date(2024, 6, 3), PartialMode::Full),
        )
        .await
        .expect_err("no SL balance seeded");
    assert!(matches!(err, AppError::BadRequest(_)));

    state
        .workflow
        .submit(
            &employee.emp_code,
            leave(LeaveType::Cl, date(2024, 6, 3), date(2024, 6, 4), PartialMode::Full),
        )
        .await
        .expect("first leave");
    let err = state
        .workflow
        .submit(
            &employee.emp_code,
            leave(LeaveType::Cl, date(2024, 6, 4), date(2024, 6, 4), PartialMode::Full),
        )
        .await
        .expect_err("overlapping leave");
    assert!(matches!(err, AppError::Conflict(_)));

    // Nothing from the refused submissions reached the ledger.
    assert_eq!(state.workflow.list_mine("E1").await.unwrap().len(), 1);
}
