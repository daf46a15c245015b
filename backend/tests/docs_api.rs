use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use hrms_backend::docs;
use serde_json::Value;
use tower::ServiceExt;
use utoipa::OpenApi;

#[test]
fn openapi_lists_workflow_paths_and_caller_scheme() {
    let openapi = docs::ApiDoc::openapi();
    let json = serde_json::to_value(&openapi).expect("serialize openapi");

    let paths = json
        .get("paths")
        .and_then(|v| v.as_object())
        .expect("paths object");
    for path in [
        "/api/leave-requests",
        "/api/attendance-corrections",
        "/api/timesheets/{week_start}/submit",
        "/api/timesheets/{week_start}/edit-request",
        "/api/offboarding",
        "/api/manager/approvals/{id}/approve",
        "/api/admin/approvals/{id}/finalize",
        "/api/admin/approvals/{id}/reject",
        "/api/notifications/me",
    ] {
        assert!(paths.contains_key(path), "missing {path}");
    }

    let scheme = json
        .pointer("/components/securitySchemes/EmpCode")
        .expect("EmpCode scheme");
    assert_eq!(scheme.get("type").and_then(Value::as_str), Some("apiKey"));
    assert_eq!(scheme.get("in").and_then(Value::as_str), Some("header"));
    assert_eq!(
        scheme.get("name").and_then(Value::as_str),
        Some("x-emp-code")
    );
}

#[tokio::test]
async fn openapi_json_route_serves_document() {
    let app = Router::new().route("/api/docs/openapi.json", get(docs::openapi_json));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/docs/openapi.json")
                .body(Body::empty())
                .expect("build openapi request"),
        )
        .await
        .expect("call openapi route");

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json: Value = serde_json::from_slice(&body).expect("parse openapi json");
    assert!(json
        .pointer("/components/schemas/ApprovalRequest")
        .is_some());
}
