//! Template registry for pkgdoc.
//!
//! Loads every template matching a glob in a directory into a single
//! [`minijinja`] environment, with the documentation helpers from
//! `pkgdoc-render` registered as template functions:
//!
//! | Function | Helper |
//! |---|---|
//! | `comment(text)` | doc comment to HTML |
//! | `decl(declaration)` | declaration with cross-reference links |
//! | `breadcrumbs(package)` | import path breadcrumbs |
//! | `relativeTime(t)` | "3 hours ago" (RFC 3339 string or Unix seconds) |
//! | `importPath(path)` | import path with break opportunities |
//! | `relativePath(path, parent)` | path relative to a parent path |
//! | `commandName(package)` | last import path segment |
//! | `map(k1, v1, ...)` | ad-hoc mapping |
//! | `equal(a, b)` | structural equality |
//!
//! A [`TemplateSet`] is immutable once built. Share it behind an `Arc` and
//! build a new one to pick up changes on disk.
//!
//! # Example
//!
//! ```no_run
//! use pkgdoc_templates::{TemplateSet, TemplateSource};
//!
//! let set = TemplateSet::build(&TemplateSource::new("templates"))?;
//! let html = set.render("package.html", serde_json::json!({"name": "fmt"}))?;
//! # Ok::<(), pkgdoc_templates::TemplateError>(())
//! ```

mod functions;
mod set;

pub use functions::{MapError, build_map};
pub use set::{DEFAULT_PATTERN, TemplateError, TemplateSet, TemplateSource};
