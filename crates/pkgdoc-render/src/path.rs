//! Import path formatting helpers.

use serde::{Deserialize, Serialize};

use crate::escape::escape_html;

/// Escaped import paths longer than this get zero-width break opportunities.
const LONG_PATH_LEN: usize = 45;

/// Zero-width space entity inserted after `/` in long import paths.
const ZERO_WIDTH_SPACE: &str = "&#8203;";

/// The parts of a package document the path helpers need.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct PackageRef {
    /// Full import path, e.g. `github.com/user/repo/sub`.
    #[serde(alias = "ImportPath")]
    pub import_path: String,
    /// Prefix of the import path identifying the hosting repository.
    /// Empty for standard packages.
    #[serde(default, alias = "ProjectRoot")]
    pub project_root: String,
}

/// Format an import path as HTML, allowing long paths to wrap after `/`.
///
/// # Examples
///
/// ```
/// use pkgdoc_render::import_path_html;
///
/// assert_eq!(import_path_html("net/http"), "net/http");
/// ```
#[must_use]
pub fn import_path_html(import_path: &str) -> String {
    let escaped = escape_html(import_path);
    if escaped.len() > LONG_PATH_LEN {
        escaped.replace('/', &format!("/{ZERO_WIDTH_SPACE}"))
    } else {
        escaped
    }
}

/// Escaped last `/`-separated segment of an import path.
#[must_use]
pub fn command_name(import_path: &str) -> String {
    let name = import_path
        .rsplit_once('/')
        .map_or(import_path, |(_, name)| name);
    escape_html(name)
}

/// Format `import_path` relative to `parent`, escaped.
///
/// The prefix is only stripped at a segment boundary; otherwise the full path
/// is returned.
#[must_use]
pub fn relative_path(import_path: &str, parent: Option<&str>) -> String {
    let relative = parent
        .filter(|p| !p.is_empty())
        .and_then(|p| import_path.strip_prefix(p))
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(import_path);
    escape_html(relative)
}
