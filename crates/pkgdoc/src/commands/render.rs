//! `pkgdoc render` command implementation.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use pkgdoc_config::{CliSettings, Config};
use pkgdoc_server::{DevMode, Dispatcher, PackageDoc, PackagePage, server_config_from_config};

use crate::error::CliError;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Package document (JSON) to render.
    document: PathBuf,

    /// Template to render the document with.
    #[arg(long, default_value = "package.html")]
    template: String,

    /// Path to configuration file (default: auto-discover pkgdoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Template directory (overrides config).
    #[arg(short, long)]
    templates: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command, writing the page to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, loading the document or rendering fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            templates_dir: self.templates,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let html = render_document(&config, &self.document, &self.template)?;

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(html.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

/// Render the package document at `path` with the named template.
fn render_document(config: &Config, path: &Path, template: &str) -> Result<String, CliError> {
    let content = std::fs::read_to_string(path)?;
    let doc: PackageDoc =
        serde_json::from_str(&content).map_err(|source| CliError::Document {
            path: path.display().to_string(),
            source,
        })?;

    let server_config = server_config_from_config(config);
    let dispatcher = Dispatcher::new(server_config.template_source(), DevMode::Disabled)?;
    tracing::info!(template, import_path = %doc.import_path, "Rendering package");

    Ok(dispatcher.render_to_string(template, &PackagePage { pkg: &doc })?)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    fn project() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("tpl")).unwrap();
        fs::write(
            dir.path().join("tpl/package.html"),
            "<h1>{{ pkg.name }}</h1>{{ comment(pkg.doc) }}",
        )
        .unwrap();
        fs::write(dir.path().join("tpl/cmd.html"), "{{ commandName(pkg) }}").unwrap();
        fs::write(dir.path().join("pkgdoc.toml"), "[templates]\ndir = \"tpl\"\n").unwrap();
        fs::write(
            dir.path().join("doc.json"),
            r#"{"import_path": "example.com/cmd/tool", "name": "main", "doc": "Tool runs."}"#,
        )
        .unwrap();

        let config = Config::load(Some(dir.path().join("pkgdoc.toml").as_path()), None).unwrap();
        (dir, config)
    }

    #[test]
    fn test_render_document_default_template() {
        let (dir, config) = project();
        let html =
            render_document(&config, &dir.path().join("doc.json"), "package.html").unwrap();
        assert_eq!(html, "<h1>main</h1><p>\nTool runs.</p>\n");
    }

    #[test]
    fn test_render_document_other_template() {
        let (dir, config) = project();
        let html = render_document(&config, &dir.path().join("doc.json"), "cmd.html").unwrap();
        assert_eq!(html, "tool");
    }

    #[test]
    fn test_render_document_invalid_json() {
        let (dir, config) = project();
        fs::write(dir.path().join("bad.json"), "{}").unwrap();

        let err = render_document(&config, &dir.path().join("bad.json"), "package.html")
            .unwrap_err();
        assert!(matches!(err, CliError::Document { .. }));
    }

    #[test]
    fn test_render_document_unknown_template() {
        let (dir, config) = project();
        let err = render_document(&config, &dir.path().join("doc.json"), "missing.html")
            .unwrap_err();
        assert!(matches!(err, CliError::Render(_)));
    }
}
