//! Render dispatcher.
//!
//! Picks the template set for each render (shared, or freshly built from disk
//! in development mode), renders the page completely and only then builds the
//! HTTP response.

use std::sync::Arc;

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use pkgdoc_templates::{TemplateError, TemplateSet, TemplateSource};
use serde::Serialize;

/// Content type of every rendered page.
const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Whether templates are reloaded from disk on every render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DevMode {
    /// Always reload.
    Enabled,
    /// Always use the set built at startup.
    Disabled,
    /// Reload while the named environment variable is truthy.
    ///
    /// The variable is read on every render, so toggling it takes effect
    /// without a restart.
    FromEnv(String),
}

impl DevMode {
    /// Whether development mode is in effect right now.
    #[must_use]
    pub fn is_active(&self) -> bool {
        match self {
            Self::Enabled => true,
            Self::Disabled => false,
            Self::FromEnv(var) => std::env::var(var).is_ok_and(|value| is_truthy(&value)),
        }
    }
}

fn is_truthy(value: &str) -> bool {
    ["1", "true", "yes"]
        .iter()
        .any(|t| value.trim().eq_ignore_ascii_case(t))
}

/// Render failure. Nothing has been written to the client when this is returned.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Rebuilding the template set in development mode failed.
    #[error("failed to reload templates: {0}")]
    Reload(#[source] TemplateError),
    /// The template failed to render.
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Renders named templates into complete HTML responses.
pub struct Dispatcher {
    source: TemplateSource,
    shared: Arc<TemplateSet>,
    dev_mode: DevMode,
}

impl Dispatcher {
    /// Build the shared template set once.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial template set cannot be built.
    pub fn new(source: TemplateSource, dev_mode: DevMode) -> Result<Self, TemplateError> {
        let shared = Arc::new(TemplateSet::build(&source)?);
        Ok(Self {
            source,
            shared,
            dev_mode,
        })
    }

    /// Template set to render with: a fresh private build in development mode,
    /// the shared one otherwise.
    fn templates(&self) -> Result<Arc<TemplateSet>, RenderError> {
        if self.dev_mode.is_active() {
            tracing::debug!(dir = %self.source.dir.display(), "Reloading templates");
            let set = TemplateSet::build(&self.source).map_err(RenderError::Reload)?;
            return Ok(Arc::new(set));
        }
        Ok(Arc::clone(&self.shared))
    }

    /// Render `name` with `data` into a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the templates cannot be reloaded or rendering fails.
    pub fn render_to_string<S: Serialize>(
        &self,
        name: &str,
        data: &S,
    ) -> Result<String, RenderError> {
        Ok(self.templates()?.render(name, data)?)
    }

    /// Render `name` with `data` into an HTML response with the given status.
    ///
    /// The body is rendered in full before the response is built, so a
    /// failing template never produces a partial page.
    ///
    /// # Errors
    ///
    /// Returns an error if the templates cannot be reloaded or rendering fails.
    pub fn render<S: Serialize>(
        &self,
        name: &str,
        status: StatusCode,
        data: &S,
    ) -> Result<Response, RenderError> {
        let body = self.render_to_string(name, data)?;
        Ok((
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static(HTML_CONTENT_TYPE))],
            body,
        )
            .into_response())
    }

    /// Names of the templates in the shared set.
    #[must_use]
    pub fn template_names(&self) -> &[String] {
        self.shared.names()
    }
}
