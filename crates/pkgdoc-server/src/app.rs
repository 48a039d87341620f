//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let [csp, nosniff, frame] = security::header_layers();
    Router::new()
        .route("/", get(handlers::index::get_index))
        .route("/{*import_path}", get(handlers::package::get_package))
        .layer(ServiceBuilder::new().layer(csp).layer(nosniff).layer(frame))
        .with_state(state)
}
