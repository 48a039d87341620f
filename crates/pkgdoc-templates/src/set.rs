//! Template set loading and rendering.

use std::path::{Path, PathBuf};

use minijinja::Environment;
use pkgdoc_render::ServicePrefixes;
use serde::Serialize;

use crate::functions;

/// Glob used when none is configured.
pub const DEFAULT_PATTERN: &str = "*.html";

/// Where templates come from and how helpers are configured.
#[derive(Clone, Debug)]
pub struct TemplateSource {
    /// Directory containing the template files.
    pub dir: PathBuf,
    /// Glob pattern relative to `dir`.
    pub pattern: String,
    /// Hosting services whose packages `decl` links to.
    pub services: ServicePrefixes,
}

impl TemplateSource {
    /// Source for `*.html` files in `dir` with the default services.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            pattern: DEFAULT_PATTERN.to_owned(),
            services: ServicePrefixes::default(),
        }
    }

    /// Override the glob pattern.
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    /// Override the linked hosting services.
    #[must_use]
    pub fn with_services(mut self, services: ServicePrefixes) -> Self {
        self.services = services;
        self
    }
}

/// Template loading or rendering error.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// The glob pattern is invalid.
    #[error("invalid template pattern {pattern}: {source}")]
    Pattern {
        /// Full pattern including the directory.
        pattern: String,
        /// Underlying glob error.
        #[source]
        source: glob::PatternError,
    },
    /// The pattern matched no files.
    #[error("template pattern {0} matches no files")]
    NoTemplates(String),
    /// A template file could not be read.
    #[error("failed to read template {}: {source}", path.display())]
    Io {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A template has a syntax error.
    #[error("failed to parse template {name}: {source}")]
    Parse {
        /// Template name.
        name: String,
        /// Underlying template error.
        #[source]
        source: minijinja::Error,
    },
    /// Rendering a template failed.
    #[error("failed to execute template {name}: {source}")]
    Execution {
        /// Template name.
        name: String,
        /// Underlying template error.
        #[source]
        source: minijinja::Error,
    },
}

/// A compiled bundle of named templates.
pub struct TemplateSet {
    env: Environment<'static>,
    names: Vec<String>,
}

impl TemplateSet {
    /// Load every template matching the source glob.
    ///
    /// Helper functions are registered before any template is parsed. Each
    /// template is named by its path relative to the source directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is invalid or matches nothing, or if
    /// any matched file cannot be read or parsed.
    pub fn build(source: &TemplateSource) -> Result<Self, TemplateError> {
        let mut env = Environment::new();
        functions::register(&mut env, source.services.clone());

        // The directory is literal; only the configured pattern is a glob.
        let dir = glob::Pattern::escape(&source.dir.to_string_lossy());
        let pattern = format!("{dir}/{}", source.pattern);
        let paths = glob::glob(&pattern).map_err(|source| TemplateError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;

        let mut names = Vec::new();
        for entry in paths {
            let path = entry.map_err(|err| TemplateError::Io {
                path: err.path().to_path_buf(),
                source: err.into_error(),
            })?;
            if !path.is_file() {
                continue;
            }
            let name = template_name(&source.dir, &path);
            let content =
                std::fs::read_to_string(&path).map_err(|source| TemplateError::Io {
                    path: path.clone(),
                    source,
                })?;
            env.add_template_owned(name.clone(), content)
                .map_err(|source| TemplateError::Parse {
                    name: name.clone(),
                    source,
                })?;
            tracing::debug!(template = %name, "Parsed template");
            names.push(name);
        }

        if names.is_empty() {
            return Err(TemplateError::NoTemplates(pattern));
        }

        tracing::info!(pattern = %pattern, count = names.len(), "Loaded templates");
        Ok(Self { env, names })
    }

    /// Render the named template with `data` as context.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Execution`] if the template does not exist or
    /// fails at runtime, including errors raised by helper functions.
    pub fn render<S: Serialize>(&self, name: &str, data: S) -> Result<String, TemplateError> {
        let execution = |source| TemplateError::Execution {
            name: name.to_owned(),
            source,
        };
        let template = self.env.get_template(name).map_err(execution)?;
        template.render(data).map_err(execution)
    }

    /// Names of all loaded templates, in load order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether a template with this name was loaded.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

/// Template name: path relative to the template directory, `/`-separated.
fn template_name(dir: &Path, path: &Path) -> String {
    path.strip_prefix(dir)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
