//! HTTP route handlers and router configuration

mod admin;
mod filter;
mod group;

use crate::state::AppState;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the main application router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/accounts/filter/", get(filter::filter))
        .route("/accounts/group/", get(group::group))
        .route("/healthcheck", get(admin::healthcheck))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
