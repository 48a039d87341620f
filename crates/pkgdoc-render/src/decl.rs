//! Declaration annotation.
//!
//! Splices cross-reference links into the literal source text of a
//! declaration. Annotations carry byte offsets into that text; the annotator
//! walks them with a single forward cursor and escapes everything it copies.

use serde::{Deserialize, Serialize};

use crate::escape::escape_html_into;

/// A package-level declaration: literal source plus cross-reference spans.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct Declaration {
    /// Declaration source text.
    #[serde(alias = "Text")]
    pub text: String,
    /// Cross-reference spans, ordered by position.
    #[serde(default, alias = "Annotations")]
    pub annotations: Vec<Annotation>,
}

/// A byte range in [`Declaration::text`] naming an identifier.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct Annotation {
    /// Import path of the package defining the identifier. Empty for
    /// references into the same package.
    #[serde(default, alias = "ImportPath")]
    pub import_path: String,
    /// Start offset (inclusive).
    #[serde(alias = "Pos")]
    pub pos: usize,
    /// End offset (exclusive).
    #[serde(alias = "End")]
    pub end: usize,
    /// Identifier used as the link fragment.
    #[serde(alias = "Name")]
    pub name: String,
}

/// Annotation spans that violate the declaration contract.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AnnotationError {
    /// Span ends before it starts.
    #[error("annotation {index} has start {pos} after end {end}")]
    Inverted {
        /// Index of the offending annotation.
        index: usize,
        /// Start offset.
        pos: usize,
        /// End offset.
        end: usize,
    },
    /// Span extends past the end of the text.
    #[error("annotation {index} ends at {end}, past text length {len}")]
    OutOfBounds {
        /// Index of the offending annotation.
        index: usize,
        /// End offset.
        end: usize,
        /// Text length in bytes.
        len: usize,
    },
    /// Span starts before the previous one ended.
    #[error("annotation {index} starts at {pos}, overlapping previous span ending at {previous_end}")]
    Overlapping {
        /// Index of the offending annotation.
        index: usize,
        /// Start offset.
        pos: usize,
        /// End of the preceding span.
        previous_end: usize,
    },
    /// Offset falls inside a multi-byte character.
    #[error("annotation {index} offset {offset} is not on a character boundary")]
    NotCharBoundary {
        /// Index of the offending annotation.
        index: usize,
        /// Offending offset.
        offset: usize,
    },
}

/// Decides which cross-package references can be linked.
pub trait LinkTargets {
    /// Whether documentation for `import_path` is served by this site.
    fn is_supported(&self, import_path: &str) -> bool;
}

/// [`LinkTargets`] matching import paths against hosting-service prefixes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServicePrefixes {
    prefixes: Vec<String>,
}

impl ServicePrefixes {
    /// Hosting services linked when nothing else is configured.
    pub const DEFAULT: [&'static str; 4] = [
        "github.com/",
        "bitbucket.org/",
        "code.google.com/p/",
        "launchpad.net/",
    ];

    /// Create a matcher for the given prefixes.
    #[must_use]
    pub fn new(prefixes: Vec<String>) -> Self {
        Self { prefixes }
    }

    /// Configured prefixes.
    #[must_use]
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}

impl Default for ServicePrefixes {
    fn default() -> Self {
        Self::new(Self::DEFAULT.iter().map(|p| (*p).to_owned()).collect())
    }
}

impl LinkTargets for ServicePrefixes {
    fn is_supported(&self, import_path: &str) -> bool {
        self.prefixes.iter().any(|p| import_path.starts_with(p.as_str()))
    }
}

impl<F: Fn(&str) -> bool> LinkTargets for F {
    fn is_supported(&self, import_path: &str) -> bool {
        self(import_path)
    }
}

/// Format a declaration as HTML with links for resolvable annotations.
///
/// Same-package references link to `#Name`; references into supported
/// packages link to `/import/path#Name`. All other spans are copied verbatim.
/// With the anchor tags removed, the output is exactly
/// [`escape_html`](crate::escape_html) of the declaration text.
///
/// # Errors
///
/// Returns [`AnnotationError`] if any span is out of range, inverted,
/// overlapping its predecessor, or splits a character.
pub fn annotate_decl<T: LinkTargets + ?Sized>(
    decl: &Declaration,
    targets: &T,
) -> Result<String, AnnotationError> {
    validate(decl)?;

    let text = decl.text.as_str();
    let mut html = String::with_capacity(text.len() + text.len() / 2);
    let mut last = 0;

    for a in &decl.annotations {
        let link = a.import_path.is_empty() || targets.is_supported(&a.import_path);
        if !link {
            continue;
        }
        escape_html_into(&mut html, &text[last..a.pos]);
        html.push_str("<a href=\"");
        if !a.import_path.is_empty() {
            html.push('/');
            escape_html_into(&mut html, &a.import_path);
        }
        html.push('#');
        escape_html_into(&mut html, &a.name);
        html.push_str("\">");
        escape_html_into(&mut html, &text[a.pos..a.end]);
        html.push_str("</a>");
        last = a.end;
    }
    escape_html_into(&mut html, &text[last..]);

    Ok(html)
}

/// Check every span against the text before any slicing happens.
fn validate(decl: &Declaration) -> Result<(), AnnotationError> {
    let text = decl.text.as_str();
    let mut previous_end = 0;
    for (index, a) in decl.annotations.iter().enumerate() {
        if a.pos > a.end {
            return Err(AnnotationError::Inverted {
                index,
                pos: a.pos,
                end: a.end,
            });
        }
        if a.end > text.len() {
            return Err(AnnotationError::OutOfBounds {
                index,
                end: a.end,
                len: text.len(),
            });
        }
        if a.pos < previous_end {
            return Err(AnnotationError::Overlapping {
                index,
                pos: a.pos,
                previous_end,
            });
        }
        for offset in [a.pos, a.end] {
            if !text.is_char_boundary(offset) {
                return Err(AnnotationError::NotCharBoundary { index, offset });
            }
        }
        previous_end = a.end;
    }
    Ok(())
}
