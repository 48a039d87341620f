//! Import path breadcrumbs.

use crate::escape::escape_html_into;

/// Link prepended to breadcrumbs of standard (unscoped) packages.
pub const HOME_LINK: &str = "<a href=\"/-/go\" title=\"Standard Packages\">☆</a> ";

/// Render an import path as a trail of links to its parent paths.
///
/// Every segment except the last links to the cumulative prefix ending at
/// that segment. The last segment is the current package and stays plain
/// text. Packages without a project root are standard packages and get
/// [`HOME_LINK`] in front. When the project root covers the whole import
/// path, the path is emitted unlinked.
///
/// # Examples
///
/// ```
/// use pkgdoc_render::breadcrumbs;
///
/// assert_eq!(
///     breadcrumbs("github.com/user/repo", "github.com/user/repo"),
///     "github.com/user/repo"
/// );
/// ```
#[must_use]
pub fn breadcrumbs(import_path: &str, project_root: &str) -> String {
    let mut html = String::with_capacity(import_path.len() * 4);

    if project_root.is_empty() {
        html.push_str(HOME_LINK);
    } else if project_root.len() >= import_path.len() {
        escape_html_into(&mut html, import_path);
        return html;
    }

    // Cursor at the start of the current segment.
    let mut start = 0;
    while let Some(len) = import_path[start..].find('/') {
        let end = start + len;
        html.push_str("<a href=\"/");
        escape_html_into(&mut html, &import_path[..end]);
        html.push_str("\">");
        escape_html_into(&mut html, &import_path[start..end]);
        html.push_str("</a>/");
        start = end + 1;
    }
    escape_html_into(&mut html, &import_path[start..]);

    html
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_project_package() {
        assert_eq!(
            breadcrumbs("github.com/user/repo/sub", "github.com/user/repo"),
            "<a href=\"/github.com\">github.com</a>/\
             <a href=\"/github.com/user\">user</a>/\
             <a href=\"/github.com/user/repo\">repo</a>/\
             sub"
        );
    }

    #[test]
    fn test_standard_package_without_slash() {
        let html = breadcrumbs("fmt", "");
        assert!(html.starts_with(HOME_LINK));
        assert_eq!(html, format!("{HOME_LINK}fmt"));
    }

    #[test]
    fn test_standard_package_nested() {
        assert_eq!(
            breadcrumbs("net/http/httptest", ""),
            format!(
                "{HOME_LINK}<a href=\"/net\">net</a>/<a href=\"/net/http\">http</a>/httptest"
            )
        );
    }

    #[test]
    fn test_path_equal_to_root_is_unlinked() {
        assert_eq!(
            breadcrumbs("launchpad.net/goyaml", "launchpad.net/goyaml"),
            "launchpad.net/goyaml"
        );
    }

    #[test]
    fn test_root_longer_than_path_is_unlinked() {
        assert_eq!(breadcrumbs("a/b", "a/b/c"), "a/b");
    }

    #[test]
    fn test_segments_are_escaped() {
        assert_eq!(
            breadcrumbs("example.com/a&b/<pkg>", "example.com/a&b"),
            "<a href=\"/example.com\">example.com</a>/\
             <a href=\"/example.com/a&amp;b\">a&amp;b</a>/\
             &lt;pkg&gt;"
        );
    }

    #[test]
    fn test_degenerate_paths_do_not_panic() {
        assert_eq!(breadcrumbs("", ""), HOME_LINK);
        assert_eq!(breadcrumbs("", "x"), "");
        assert_eq!(
            breadcrumbs("a/", ""),
            format!("{HOME_LINK}<a href=\"/a\">a</a>/")
        );
        assert_eq!(breadcrumbs("/a", "x"), "<a href=\"/\"></a>/a");
    }
}
