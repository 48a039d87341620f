//! Package documentation pages.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;

use crate::error::ServerError;
use crate::package::{NotFoundPage, PackagePage};
use crate::state::AppState;

/// Handle GET /{*import_path}.
pub(crate) async fn get_package(
    Path(import_path): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ServerError> {
    let import_path = import_path.trim_end_matches('/');

    let response = match state.packages.get(import_path)? {
        Some(doc) => state.dispatcher.render(
            "package.html",
            StatusCode::OK,
            &PackagePage { pkg: &doc },
        )?,
        None => {
            tracing::debug!(import_path, "Package not found");
            state.dispatcher.render(
                "notfound.html",
                StatusCode::NOT_FOUND,
                &NotFoundPage { import_path },
            )?
        }
    };
    Ok(response)
}
