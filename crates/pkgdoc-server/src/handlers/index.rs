//! Package index page.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;

use crate::error::ServerError;
use crate::package::IndexPage;
use crate::state::AppState;

/// Handle GET /.
pub(crate) async fn get_index(
    State(state): State<Arc<AppState>>,
) -> Result<Response, ServerError> {
    let page = IndexPage {
        packages: state.packages.list()?,
    };
    Ok(state
        .dispatcher
        .render("index.html", StatusCode::OK, &page)?)
}
