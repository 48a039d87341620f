//! HTML escaping.
//!
//! Uses the same entity table as Go's `html/template` so rendered pages stay
//! byte-compatible with documentation produced by the upstream toolchain.

/// Escape HTML special characters.
///
/// # Examples
///
/// ```
/// use pkgdoc_render::escape_html;
///
/// assert_eq!(escape_html("a < b && c"), "a &lt; b &amp;&amp; c");
/// assert_eq!(escape_html(r#"say "hi""#), "say &#34;hi&#34;");
/// ```
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    escape_html_into(&mut result, s);
    result
}

/// Escape HTML special characters, appending to `out`.
pub fn escape_html_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            '\0' => out.push('\u{FFFD}'),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a&b"), "a&amp;b");
        assert_eq!(escape_html("\"hello\""), "&#34;hello&#34;");
        assert_eq!(escape_html("it's"), "it&#39;s");
    }

    #[test]
    fn test_escape_nul_replaced() {
        assert_eq!(escape_html("a\0b"), "a\u{FFFD}b");
    }

    #[test]
    fn test_escape_plain_text_unchanged() {
        assert_eq!(escape_html("func Foo() ☆"), "func Foo() ☆");
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn test_escape_into_appends() {
        let mut out = String::from("<b>");
        escape_html_into(&mut out, "1 > 0");
        assert_eq!(out, "<b>1 &gt; 0");
    }
}
