//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::package::PackageError;
use crate::render::RenderError;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// Loading a package document failed.
    #[error(transparent)]
    Package(#[from] PackageError),

    /// Rendering a page failed.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Package(PackageError::InvalidPath(_)) => StatusCode::BAD_REQUEST,
            Self::Package(_) | Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Rejected request");
        }

        (status, self.to_string()).into_response()
    }
}
