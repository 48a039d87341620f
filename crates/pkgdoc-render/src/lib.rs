//! HTML transforms for package documentation.
//!
//! Every function in this crate is a pure text transform that turns untrusted
//! documentation metadata into escaped, link-annotated markup:
//!
//! - [`comment_html`]: doc comment to HTML, with demoted headings and RFC links
//! - [`annotate_decl`]: declaration source with cross-reference links spliced in
//! - [`breadcrumbs`]: clickable import path segments
//! - [`relative_age`]: coarse "N minutes ago" strings
//!
//! # Example
//!
//! ```
//! use pkgdoc_render::{Annotation, Declaration, ServicePrefixes, annotate_decl};
//!
//! let decl = Declaration {
//!     text: "func Dump(w io.Writer)".to_owned(),
//!     annotations: vec![Annotation {
//!         import_path: "io".to_owned(),
//!         pos: 12,
//!         end: 21,
//!         name: "Writer".to_owned(),
//!     }],
//! };
//! // "io" is not a supported service, so the span stays plain text.
//! let html = annotate_decl(&decl, &ServicePrefixes::default()).unwrap();
//! assert_eq!(html, "func Dump(w io.Writer)");
//! ```

mod breadcrumbs;
mod comment;
mod decl;
mod escape;
mod path;
mod time;

pub use breadcrumbs::{HOME_LINK, breadcrumbs};
pub use comment::{comment_html, doc_to_html};
pub use decl::{Annotation, AnnotationError, Declaration, LinkTargets, ServicePrefixes, annotate_decl};
pub use escape::{escape_html, escape_html_into};
pub use path::{PackageRef, command_name, import_path_html, relative_path};
pub use time::{format_elapsed, relative_age, relative_age_at};
