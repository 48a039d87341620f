//! `pkgdoc.toml` loading.
//!
//! A config file is looked up in the working directory and then in each parent
//! directory. Relative paths in it are resolved against the directory holding
//! the file, and [`CliSettings`] passed to [`Config::load`] win over anything
//! the file says.
//!
//! `server.host`, `templates.dir` and `data.dir` may reference environment
//! variables as `${VAR}` (must be set) or `${VAR:-fallback}`.
//!
//! ```toml
//! [server]
//! port = 6060
//!
//! [templates]
//! dir = "${PKGDOC_THEME:-templates}"
//! pattern = "**/*.html"
//! dev_env = "PKGDOC_DEV"
//!
//! [data]
//! dir = "packages"
//!
//! [links]
//! services = ["github.com/", "git.example.com/"]
//! ```

mod expand;

use std::path::{Path, PathBuf};

use pkgdoc_render::ServicePrefixes;
use serde::Deserialize;

/// Command-line overrides. `None` keeps the configured value.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub templates_dir: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    /// Force development mode on or off.
    pub dev_mode: Option<bool>,
}

const CONFIG_FILENAME: &str = "pkgdoc.toml";

/// Environment variable consulted when `templates.dev_mode` is not set.
pub const DEFAULT_DEV_ENV: &str = "PKGDOC_DEV";

const DEFAULT_PATTERN: &str = "*.html";

/// Loaded configuration.
///
/// The `templates` and `data` tables are kept as written; their usable form is
/// in `templates_resolved` and `data_resolved`.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    templates: TemplatesConfigRaw,
    data: DataConfigRaw,
    pub links: LinksConfig,

    #[serde(skip)]
    pub templates_resolved: TemplatesConfig,
    #[serde(skip)]
    pub data_resolved: DataConfig,
    /// File the configuration came from, if any.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// `[server]` table.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TemplatesConfigRaw {
    dir: Option<String>,
    pattern: Option<String>,
    dev_mode: Option<bool>,
    dev_env: Option<String>,
}

/// `[templates]` table with `dir` resolved.
#[derive(Debug)]
pub struct TemplatesConfig {
    pub dir: PathBuf,
    /// Glob relative to `dir`.
    pub pattern: String,
    /// Fixed development mode; `None` defers to `dev_env` on every render.
    pub dev_mode: Option<bool>,
    /// Environment variable that enables development mode.
    pub dev_env: String,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("templates"),
            pattern: DEFAULT_PATTERN.to_owned(),
            dev_mode: None,
            dev_env: DEFAULT_DEV_ENV.to_owned(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DataConfigRaw {
    dir: Option<String>,
}

/// `[data]` table with `dir` resolved.
#[derive(Debug, Default)]
pub struct DataConfig {
    /// Directory of package documents (`<import path>.json`).
    pub dir: PathBuf,
}

/// `[links]` table.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    /// Import path prefixes of hosting services whose packages are linked.
    pub services: Vec<String>,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            services: ServicePrefixes::DEFAULT.map(str::to_owned).to_vec(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file {} does not exist", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid TOML in config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Validation(String),
    /// A `${VAR}` reference could not be expanded.
    #[error("cannot expand {field}: {message}")]
    EnvVar { field: String, message: String },
}

impl Config {
    /// Load `config_path`, or the nearest `pkgdoc.toml`, or defaults rooted at
    /// the working directory when there is none. `cli_settings` are applied
    /// last.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `config_path` does not exist, or if the
    /// file cannot be read, parsed, expanded or validated.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let path = match config_path {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_owned())),
            Some(path) => Some(path.to_owned()),
            None => Self::discover_config(),
        };

        let mut config = match path {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default_with_cwd(),
        };
        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        let CliSettings {
            host,
            port,
            templates_dir,
            data_dir,
            dev_mode,
        } = settings;

        if let Some(host) = host {
            self.server.host.clone_from(host);
        }
        self.server.port = port.unwrap_or(self.server.port);
        if let Some(dir) = templates_dir {
            self.templates_resolved.dir.clone_from(dir);
        }
        if let Some(dir) = data_dir {
            self.data_resolved.dir.clone_from(dir);
        }
        if dev_mode.is_some() {
            self.templates_resolved.dev_mode = *dev_mode;
        }
    }

    /// Nearest `pkgdoc.toml` in the working directory or its ancestors.
    fn discover_config() -> Option<PathBuf> {
        let cwd = std::env::current_dir().ok()?;
        cwd.ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.is_file())
    }

    fn default_with_cwd() -> Self {
        Self::default_with_base(&std::env::current_dir().unwrap_or_default())
    }

    fn default_with_base(base: &Path) -> Self {
        let mut config = Self {
            server: ServerConfig::default(),
            templates: TemplatesConfigRaw::default(),
            data: DataConfigRaw::default(),
            links: LinksConfig::default(),
            templates_resolved: TemplatesConfig::default(),
            data_resolved: DataConfig::default(),
            config_path: None,
        };
        config.resolve_paths(base);
        config
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(&std::fs::read_to_string(path)?)?;

        // Expansion may produce relative paths, so it runs before resolution.
        config.expand_env_vars()?;
        config.resolve_paths(path.parent().unwrap_or(Path::new(".")));
        config.config_path = Some(path.to_owned());
        config.validate()?;

        Ok(config)
    }

    /// Check values that would only fail later, at bind or render time.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("server.host", self.server.host.as_str()),
            ("templates.pattern", self.templates_resolved.pattern.as_str()),
            ("templates.dev_env", self.templates_resolved.dev_env.as_str()),
        ];
        if let Some((key, _)) = required.iter().find(|(_, value)| value.is_empty()) {
            return Err(ConfigError::Validation(format!("{key} cannot be empty")));
        }

        // Port 0 would bind a random port nobody can find.
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        if self.links.services.iter().any(String::is_empty) {
            return Err(ConfigError::Validation(
                "links.services entries cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        for (slot, field) in [
            (&mut self.templates.dir, "templates.dir"),
            (&mut self.data.dir, "data.dir"),
        ] {
            if let Some(dir) = slot {
                *dir = expand::expand_env(dir, field)?;
            }
        }
        Ok(())
    }

    /// Fill the resolved tables, joining relative directories onto `base`.
    fn resolve_paths(&mut self, base: &Path) {
        let templates = &self.templates;
        self.templates_resolved = TemplatesConfig {
            dir: base.join(templates.dir.as_deref().unwrap_or("templates")),
            pattern: templates
                .pattern
                .clone()
                .unwrap_or_else(|| DEFAULT_PATTERN.to_owned()),
            dev_mode: templates.dev_mode,
            dev_env: templates
                .dev_env
                .clone()
                .unwrap_or_else(|| DEFAULT_DEV_ENV.to_owned()),
        };
        self.data_resolved = DataConfig {
            dir: base.join(self.data.dir.as_deref().unwrap_or("data")),
        };
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(toml: &str) -> Config {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn test_defaults_rooted_at_base() {
        let config = Config::default_with_base(Path::new("/srv/docs"));

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(
            config.templates_resolved.dir,
            PathBuf::from("/srv/docs/templates")
        );
        assert_eq!(config.templates_resolved.pattern, "*.html");
        assert_eq!(config.templates_resolved.dev_mode, None);
        assert_eq!(config.templates_resolved.dev_env, "PKGDOC_DEV");
        assert_eq!(config.data_resolved.dir, PathBuf::from("/srv/docs/data"));
        assert_eq!(config.links.services, ServicePrefixes::default().prefixes());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_keeps_defaults() {
        let config = parse("");
        assert_eq!(config.server.port, 8080);
        assert!(config.links.services.contains(&"github.com/".to_owned()));
    }

    #[test]
    fn test_tables_parsed() {
        let config = parse(
            r#"
[server]
host = "0.0.0.0"
port = 6060

[links]
services = ["git.example.com/"]
"#,
        );
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 6060);
        assert_eq!(config.links.services, ["git.example.com/"]);
    }

    #[test]
    fn test_resolve_paths() {
        let mut config = parse(
            r#"
[templates]
dir = "site/templates"
pattern = "**/*.tmpl"
dev_mode = true
dev_env = "DOCS_DEV"

[data]
dir = "packages"
"#,
        );
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.templates_resolved.dir,
            PathBuf::from("/project/site/templates")
        );
        assert_eq!(config.templates_resolved.pattern, "**/*.tmpl");
        assert_eq!(config.templates_resolved.dev_mode, Some(true));
        assert_eq!(config.templates_resolved.dev_env, "DOCS_DEV");
        assert_eq!(config.data_resolved.dir, PathBuf::from("/project/packages"));
    }

    #[test]
    fn test_absolute_dirs_not_joined() {
        let mut config = parse("[templates]\ndir = \"/opt/theme\"\n");
        config.resolve_paths(Path::new("/project"));
        assert_eq!(config.templates_resolved.dir, PathBuf::from("/opt/theme"));
    }

    #[test]
    fn test_cli_settings_override_only_given_fields() {
        let mut config = Config::default_with_base(Path::new("/srv"));
        config.apply_cli_settings(&CliSettings {
            port: Some(9000),
            data_dir: Some(PathBuf::from("/custom/data")),
            dev_mode: Some(false),
            ..CliSettings::default()
        });

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.templates_resolved.dir, PathBuf::from("/srv/templates"));
        assert_eq!(config.data_resolved.dir, PathBuf::from("/custom/data"));
        assert_eq!(config.templates_resolved.dev_mode, Some(false));
    }

    #[test]
    fn test_cli_settings_host_and_templates() {
        let mut config = Config::default_with_base(Path::new("/srv"));
        config.apply_cli_settings(&CliSettings {
            host: Some("0.0.0.0".to_owned()),
            templates_dir: Some(PathBuf::from("/custom/templates")),
            ..CliSettings::default()
        });

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(
            config.templates_resolved.dir,
            PathBuf::from("/custom/templates")
        );
        assert_eq!(config.templates_resolved.dev_mode, None);
    }

    #[test]
    fn test_env_expansion_in_dirs() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("TEST_PKGDOC_TEMPLATES", "/srv/templates");
            std::env::remove_var("TEST_PKGDOC_DATA");
        }

        let mut config = parse(
            r#"
[templates]
dir = "${TEST_PKGDOC_TEMPLATES}"

[data]
dir = "${TEST_PKGDOC_DATA:-pkgs}"
"#,
        );
        config.expand_env_vars().unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.templates_resolved.dir,
            PathBuf::from("/srv/templates")
        );
        assert_eq!(config.data_resolved.dir, PathBuf::from("/project/pkgs"));

        unsafe {
            std::env::remove_var("TEST_PKGDOC_TEMPLATES");
        }
    }

    #[test]
    fn test_env_expansion_missing_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MISSING_VAR_PKGDOC_TEST");
        }

        let mut config = parse("[server]\nhost = \"${MISSING_VAR_PKGDOC_TEST}\"\n");
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let msg = err.to_string();
        assert!(msg.contains("MISSING_VAR_PKGDOC_TEST"), "{msg}");
        assert!(msg.contains("server.host"), "{msg}");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        type Breakage = fn(&mut Config);
        let cases: [(&str, Breakage); 5] = [
            ("server.host", |c| c.server.host.clear()),
            ("server.port", |c| c.server.port = 0),
            ("templates.pattern", |c| c.templates_resolved.pattern.clear()),
            ("templates.dev_env", |c| c.templates_resolved.dev_env.clear()),
            ("links.services", |c| c.links.services.push(String::new())),
        ];

        for (key, breakage) in cases {
            let mut config = Config::default_with_base(Path::new("/srv"));
            breakage(&mut config);
            let err = config.validate().unwrap_err();
            assert!(matches!(err, ConfigError::Validation(_)), "{key}: {err:?}");
            assert!(err.to_string().contains(key), "{key}: {err}");
        }
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pkgdoc.toml");
        fs::write(&path, "[server]\nport = 7070\n\n[data]\ndir = \"pkgs\"\n").unwrap();

        let config = Config::load(Some(path.as_path()), None).unwrap();

        assert_eq!(config.server.port, 7070);
        assert_eq!(config.data_resolved.dir, dir.path().join("pkgs"));
        assert_eq!(config.templates_resolved.dir, dir.path().join("templates"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pkgdoc.toml");
        fs::write(&path, "[server]\nport = 0\n").unwrap();

        let err = Config::load(Some(path.as_path()), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/pkgdoc.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
