use axum::http::StatusCode;

/// Handler for `GET /healthz`, the liveness check.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Handler for `GET /readyz`, the readiness check. Override per service as needed.
pub async fn readyz() -> StatusCode {
    StatusCode::OK
}
