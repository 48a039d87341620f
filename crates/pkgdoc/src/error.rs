//! CLI error types.

use pkgdoc_config::ConfigError;
use pkgdoc_server::RenderError;
use pkgdoc_templates::TemplateError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Templates(#[from] TemplateError),

    #[error("{0}")]
    Render(#[from] RenderError),

    #[error("invalid package document {path}: {source}")]
    Document {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Server(String),
}
