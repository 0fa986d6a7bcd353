//! Admin endpoints: /healthcheck

use axum::http::StatusCode;

/// Health check endpoint
///
/// GET /healthcheck
///
/// Returns 200 once the catalog is loaded and the server is accepting
/// traffic (the listener only binds after the load phase).
pub async fn healthcheck() -> StatusCode {
    StatusCode::OK
}
