use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_LENGTH, Request},
    middleware::Next,
    response::Response,
};
use serde_json::Value;
use std::time::Instant;

const MAX_BUFFERED_BODY_BYTES: usize = 64 * 1024;

/// Logs every 4xx/5xx response with the `code` of the JSON error body, so
/// workflow refusals (`CONFLICT`, `FORBIDDEN`, ...) are searchable. The body is
/// buffered and forwarded unchanged.
pub async fn log_error_responses(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = Instant::now();

    let response = next.run(req).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let latency_ms = start.elapsed().as_millis() as u64;
    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_BUFFERED_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(status = status.as_u16(), %method, %uri, error = ?err, "failed to read error response body");
            parts.headers.remove(CONTENT_LENGTH);
            return Response::from_parts(parts, Body::empty());
        }
    };

    let code = error_code(&bytes).unwrap_or_default();
    if status.is_server_error() {
        tracing::error!(status = status.as_u16(), %method, %uri, latency_ms, code, "request failed");
    } else {
        tracing::warn!(status = status.as_u16(), %method, %uri, latency_ms, code, "request refused");
    }

    Response::from_parts(parts, Body::from(bytes))
}

fn error_code(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<Value>(body)
        .ok()?
        .get("code")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_reads_json_error_body() {
        let body = br#"{"error":"Request not found or already processed","code":"CONFLICT"}"#;
        assert_eq!(error_code(body), Some("CONFLICT".to_string()));
    }

    #[test]
    fn error_code_ignores_non_json_bodies() {
        assert_eq!(error_code(b"plain text"), None);
    }
}
