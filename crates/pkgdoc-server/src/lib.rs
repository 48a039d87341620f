//! HTTP server for pkgdoc.
//!
//! Serves package documentation pages rendered from a template directory:
//!
//! - `GET /` renders `index.html` with every package in the data directory
//! - `GET /{import_path}` renders `package.html`, or `notfound.html` with a 404
//!
//! Package documents are JSON files in the data directory, named after their
//! import path (see [`PackageStore`]). Templates are rendered through a
//! [`Dispatcher`], which reloads them from disk on every request while
//! development mode is active.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use pkgdoc_server::{DevMode, ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         templates_dir: PathBuf::from("templates"),
//!         data_dir: PathBuf::from("data"),
//!         dev_mode: DevMode::FromEnv("PKGDOC_DEV".to_owned()),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod package;
mod render;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use pkgdoc_render::ServicePrefixes;
use pkgdoc_templates::TemplateSource;
use state::AppState;

pub use package::{
    IndexPage, Item, NotFoundPage, PackageDoc, PackageError, PackagePage, PackageStore,
    PackageSummary,
};
pub use render::{DevMode, Dispatcher, RenderError};

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Template directory.
    pub templates_dir: PathBuf,
    /// Template glob relative to `templates_dir`.
    pub template_pattern: String,
    /// Hosting services whose packages declarations link to.
    pub services: Vec<String>,
    /// Package document directory.
    pub data_dir: PathBuf,
    /// Template reloading.
    pub dev_mode: DevMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            templates_dir: PathBuf::from("templates"),
            template_pattern: pkgdoc_templates::DEFAULT_PATTERN.to_owned(),
            services: ServicePrefixes::default().prefixes().to_vec(),
            data_dir: PathBuf::from("data"),
            dev_mode: DevMode::FromEnv(pkgdoc_config::DEFAULT_DEV_ENV.to_owned()),
        }
    }
}

impl ServerConfig {
    /// Template source described by this configuration.
    #[must_use]
    pub fn template_source(&self) -> TemplateSource {
        TemplateSource::new(&self.templates_dir)
            .with_pattern(&self.template_pattern)
            .with_services(ServicePrefixes::new(self.services.clone()))
    }
}

/// Run the server.
///
/// Templates are compiled before the listener is bound, so a broken template
/// directory fails startup instead of the first request.
///
/// # Errors
///
/// Returns an error if the templates cannot be loaded or the server fails to
/// start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let dispatcher = Dispatcher::new(config.template_source(), config.dev_mode.clone())?;
    tracing::info!(
        templates = dispatcher.template_names().len(),
        dev_mode = ?config.dev_mode,
        "Templates ready"
    );

    let state = Arc::new(AppState {
        dispatcher,
        packages: PackageStore::new(&config.data_dir),
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from pkgdoc config.
#[must_use]
pub fn server_config_from_config(config: &pkgdoc_config::Config) -> ServerConfig {
    let templates = &config.templates_resolved;
    let dev_mode = match templates.dev_mode {
        Some(true) => DevMode::Enabled,
        Some(false) => DevMode::Disabled,
        None => DevMode::FromEnv(templates.dev_env.clone()),
    };

    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        templates_dir: templates.dir.clone(),
        template_pattern: templates.pattern.clone(),
        services: config.links.services.clone(),
        data_dir: config.data_resolved.dir.clone(),
        dev_mode,
    }
}
