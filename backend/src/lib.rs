//! HR approval workflow backend: leave, attendance corrections, timesheets and
//! offboarding routed through a reporting-manager then admin/HR approval chain.

use axum::{
    http::{HeaderValue, Method},
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
pub mod types;
pub mod utils;
pub mod validation;

use config::Config;
use state::AppState;

/// Every route of the service with its identity layers and the shared
/// tracing stack.
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/docs/openapi.json", get(docs::openapi_json))
        .route("/api/holidays", get(handlers::holidays::holiday_calendar));

    let employee_routes = Router::new()
        .route(
            "/api/leave-requests",
            post(handlers::leave_requests::create_leave_request),
        )
        .route(
            "/api/leave-balances/me",
            get(handlers::leave_requests::my_leave_balances),
        )
        .route(
            "/api/attendance-corrections",
            post(handlers::attendance_corrections::create_attendance_correction),
        )
        .route(
            "/api/timesheets/me",
            get(handlers::timesheets::list_my_timesheets),
        )
        .route(
            "/api/timesheets/{week_start}",
            put(handlers::timesheets::save_timesheet_week),
        )
        .route(
            "/api/timesheets/{week_start}/submit",
            post(handlers::timesheets::submit_timesheet_week),
        )
        .route(
            "/api/timesheets/{week_start}/edit-request",
            post(handlers::timesheets::request_timesheet_edit),
        )
        .route(
            "/api/offboarding",
            post(handlers::offboarding::create_offboarding_request),
        )
        .route(
            "/api/approvals/me",
            get(handlers::approvals::my_approval_requests),
        )
        .route(
            "/api/manager/approvals",
            get(handlers::approvals::manager_queue),
        )
        .route(
            "/api/manager/approvals/{id}/approve",
            post(handlers::approvals::manager_approve),
        )
        .route(
            "/api/manager/approvals/{id}/reject",
            post(handlers::approvals::manager_reject),
        )
        .route(
            "/api/notifications/me",
            get(handlers::notifications::my_notifications),
        )
        .route(
            "/api/notifications/{id}/read",
            put(handlers::notifications::mark_notification_read),
        )
        .route(
            "/api/overtime",
            post(handlers::overtime::create_overtime_request),
        )
        .route(
            "/api/overtime/me",
            get(handlers::overtime::my_overtime_requests),
        )
        .route(
            "/api/manager/overtime",
            get(handlers::overtime::manager_overtime_queue),
        )
        .route(
            "/api/manager/overtime/{id}/approve",
            post(handlers::overtime::approve_overtime),
        )
        .route(
            "/api/manager/overtime/{id}/reject",
            post(handlers::overtime::reject_overtime),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::identify,
        ));

    let admin_routes = Router::new()
        .route("/api/admin/approvals", get(handlers::admin::admin_queue))
        .route(
            "/api/admin/approvals/export",
            get(handlers::admin::export_approvals),
        )
        .route(
            "/api/admin/approvals/{id}",
            get(handlers::admin::approval_detail),
        )
        .route(
            "/api/admin/approvals/{id}/finalize",
            post(handlers::admin::finalize_approval),
        )
        .route(
            "/api/admin/approvals/{id}/reject",
            post(handlers::admin::reject_approval),
        )
        .route(
            "/api/admin/holidays",
            get(handlers::admin::list_holidays).post(handlers::admin::create_holiday),
        )
        .route(
            "/api/admin/holidays/{id}",
            delete(handlers::admin::delete_holiday),
        )
        .route(
            "/api/admin/weekly-offs",
            get(handlers::admin::list_weekly_offs),
        )
        .route(
            "/api/admin/weekly-offs/{weekday}",
            put(handlers::admin::set_weekly_off),
        )
        .route(
            "/api/admin/employees/{emp_code}/reporting-manager",
            put(handlers::admin::assign_reporting_manager),
        )
        .route(
            "/api/admin/leave-balances",
            put(handlers::admin::upsert_leave_balance),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_admin,
        ));

    let cors = cors_layer(&state.config);

    Router::new()
        .merge(public_routes)
        .merge(employee_routes)
        .merge(admin_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn(middleware::request_id))
                .layer(cors)
                .layer(axum_middleware::from_fn(middleware::log_error_responses)),
        )
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allow_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(24 * 60 * 60))
}
