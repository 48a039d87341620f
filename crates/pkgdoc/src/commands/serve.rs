//! `pkgdoc serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use pkgdoc_config::{CliSettings, Config};
use pkgdoc_server::{DevMode, run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover pkgdoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Template directory (overrides config).
    #[arg(short, long)]
    templates: Option<PathBuf>,

    /// Package document directory (overrides config).
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Reload templates from disk on every request.
    #[arg(long)]
    dev: bool,

    /// Never reload templates, even if the development variable is set.
    #[arg(long, conflicts_with = "dev")]
    no_dev: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        // Resolve flags before moving into CliSettings
        let dev_mode = self.resolve_dev_mode();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            templates_dir: self.templates,
            data_dir: self.data,
            dev_mode,
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let server_config = server_config_from_config(&config);

        output.info(&format!(
            "Starting server on {}:{}",
            server_config.host, server_config.port
        ));
        output.setting(
            "Templates",
            server_config
                .templates_dir
                .join(&server_config.template_pattern)
                .display(),
        );
        output.setting("Package data", server_config.data_dir.display());
        match &server_config.dev_mode {
            DevMode::Enabled => {
                output.warning("Development mode: templates reload on every request");
            }
            DevMode::Disabled => output.setting("Development mode", "disabled"),
            DevMode::FromEnv(var) => {
                output.setting("Development mode", format_args!("while ${var} is set"));
            }
        }
        if !server_config.data_dir.is_dir() {
            output.warning("Package data directory does not exist");
        }

        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }

    /// Resolve `dev_mode` from --dev/--no-dev flags.
    fn resolve_dev_mode(&self) -> Option<bool> {
        if self.dev {
            Some(true)
        } else if self.no_dev {
            Some(false)
        } else {
            None
        }
    }
}
