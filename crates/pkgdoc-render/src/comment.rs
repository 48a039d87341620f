//! Doc comment rendering.
//!
//! Comments follow the plain-text conventions of Go doc comments:
//!
//! - blank lines separate paragraphs
//! - indented runs of lines are preformatted blocks
//! - a lone capitalised line without punctuation, set off by blank lines, is a
//!   section heading
//!
//! All literal text is escaped. URLs become links; identifiers do not.

use std::sync::LazyLock;

use regex::Regex;

use crate::escape::{escape_html, escape_html_into};

/// URLs recognised inside paragraph text.
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:https?|ftp)://[a-zA-Z0-9_@\-]+(?:[.:][a-zA-Z0-9_@\-]+)*(?:[.,:;?!]*[a-zA-Z0-9$'()*+&#=@~_/\-\[\]%])*",
    )
    .unwrap()
});

/// RFC references, matched on already-escaped HTML.
static RFC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"RFC[\t\n\x0C\r ]+([0-9]{3,4})").unwrap());

/// Replacement wrapping an RFC reference in a link to the IETF document.
const RFC_LINK: &str = r#"<a href="https://tools.ietf.org/html/rfc${1}">${0}</a>"#;

/// Characters that disqualify a line from being a heading.
const HEADING_PUNCTUATION: &[char] = &[
    ',', '.', ';', ':', '!', '?', '+', '*', '/', '=', '(', ')', '[', ']', '{', '}', '_', '^',
    '°', '&', '§', '~', '%', '#', '@', '<', '"', '>', '\\',
];

/// Format a doc comment as HTML for embedding in a package page.
///
/// Section headings are demoted from `<h3>` to `<h4>` and RFC references
/// link to the IETF text.
///
/// # Examples
///
/// ```
/// use pkgdoc_render::comment_html;
///
/// assert_eq!(
///     comment_html("Implements RFC 2616."),
///     "<p>\nImplements <a href=\"https://tools.ietf.org/html/rfc2616\">RFC 2616</a>.</p>\n"
/// );
/// ```
#[must_use]
pub fn comment_html(comment: &str) -> String {
    let html = doc_to_html(comment)
        .replace("<h3 ", "<h4 ")
        .replace("</h3>", "</h4>");
    RFC_RE.replace_all(&html, RFC_LINK).into_owned()
}

/// Format a doc comment as HTML with `<h3>` section headings.
#[must_use]
pub fn doc_to_html(text: &str) -> String {
    let mut html = String::with_capacity(text.len() * 2);
    for block in blocks(text) {
        match block {
            Block::Paragraph(lines) => {
                html.push_str("<p>\n");
                for line in lines {
                    emphasize(&mut html, line);
                }
                html.push_str("</p>\n");
            }
            Block::Heading(line) => {
                html.push_str("<h3 id=\"");
                html.push_str(&anchor_id(line));
                html.push_str("\">");
                comment_escape(&mut html, line, true);
                html.push_str("</h3>\n");
            }
            Block::Pre(lines) => {
                html.push_str("<pre>");
                for line in lines {
                    comment_escape(&mut html, line, false);
                }
                html.push_str("</pre>\n");
            }
        }
    }
    html
}

#[derive(Debug, PartialEq, Eq)]
enum Block<'a> {
    Paragraph(Vec<&'a str>),
    Heading(&'a str),
    Pre(Vec<&'a str>),
}

/// Split comment text into paragraphs, headings and preformatted blocks.
fn blocks(text: &str) -> Vec<Block<'_>> {
    let mut lines: Vec<&str> = text.split_inclusive('\n').collect();
    unindent(&mut lines);

    let mut out = Vec::new();
    let mut para: Vec<&str> = Vec::new();
    let mut last_was_blank = false;
    let mut last_was_heading = false;

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];

        if is_blank(line) {
            close_paragraph(&mut out, &mut para);
            i += 1;
            last_was_blank = true;
            continue;
        }

        if indent_len(line) > 0 {
            close_paragraph(&mut out, &mut para);
            let mut j = i + 1;
            while j < lines.len() && (is_blank(lines[j]) || indent_len(lines[j]) > 0) {
                j += 1;
            }
            while j > i && is_blank(lines[j - 1]) {
                j -= 1;
            }
            let mut pre = lines[i..j].to_vec();
            unindent(&mut pre);
            out.push(Block::Pre(pre));
            i = j;
            last_was_heading = false;
            continue;
        }

        if last_was_blank
            && !last_was_heading
            && i + 2 < lines.len()
            && is_blank(lines[i + 1])
            && !is_blank(lines[i + 2])
            && indent_len(lines[i + 2]) == 0
            && let Some(head) = heading(line)
        {
            close_paragraph(&mut out, &mut para);
            out.push(Block::Heading(head));
            i += 2;
            last_was_heading = true;
            continue;
        }

        last_was_blank = false;
        last_was_heading = false;
        para.push(line);
        i += 1;
    }
    close_paragraph(&mut out, &mut para);
    out
}

fn close_paragraph<'a>(out: &mut Vec<Block<'a>>, para: &mut Vec<&'a str>) {
    if !para.is_empty() {
        out.push(Block::Paragraph(std::mem::take(para)));
    }
}

/// Whitespace-only lines count as blank, so they separate paragraphs and
/// never start a preformatted block. Go's formatter only treats empty lines
/// this way.
fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn indent_len(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

/// Remove the longest whitespace prefix shared by all non-blank lines.
fn unindent(lines: &mut [&str]) {
    let mut prefix: Option<&str> = None;
    for line in lines.iter().filter(|l| !is_blank(l)) {
        let indent = &line[..indent_len(line)];
        prefix = Some(match prefix {
            None => indent,
            Some(p) => common_prefix(p, indent),
        });
    }
    let n = prefix.map_or(0, str::len);
    if n == 0 {
        return;
    }
    for line in lines.iter_mut() {
        let s = *line;
        if !is_blank(s) {
            *line = &s[n..];
        }
    }
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let n = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    &a[..n]
}

/// Return the trimmed line if it qualifies as a section heading.
fn heading(line: &str) -> Option<&str> {
    let line = line.trim();
    let first = line.chars().next()?;
    if !first.is_alphabetic() || !first.is_uppercase() {
        return None;
    }
    let last = line.chars().next_back()?;
    if !last.is_alphabetic() && !last.is_numeric() {
        return None;
    }
    if line.contains(HEADING_PUNCTUATION) {
        return None;
    }
    // Apostrophes are only allowed in a possessive "'s".
    let mut rest = line;
    while let Some(i) = rest.find('\'') {
        let after = &rest[i + 1..];
        let Some(tail) = after.strip_prefix('s') else {
            return None;
        };
        if !tail.is_empty() && !tail.starts_with(' ') {
            return None;
        }
        rest = tail;
    }
    Some(line)
}

/// Anchor id for a heading: `hdr-` plus the text with non-alphanumerics as `_`.
fn anchor_id(line: &str) -> String {
    let mut id = String::with_capacity(line.len() + 4);
    id.push_str("hdr-");
    id.extend(
        line.chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' }),
    );
    id
}

/// Escape paragraph text, linking URLs.
fn emphasize(out: &mut String, line: &str) {
    let mut last = 0;
    for m in URL_RE.find_iter(line) {
        comment_escape(out, &line[last..m.start()], true);
        let url = escape_html(m.as_str());
        out.push_str("<a href=\"");
        out.push_str(&url);
        out.push_str("\">");
        out.push_str(&url);
        out.push_str("</a>");
        last = m.end();
    }
    comment_escape(out, &line[last..], true);
}

/// Escape text; with `nice`, turn ``` `` ``` and `''` into curly quotes.
fn comment_escape(out: &mut String, text: &str, nice: bool) {
    if !nice {
        escape_html_into(out, text);
        return;
    }
    let bytes = text.as_bytes();
    let mut last = 0;
    let mut i = 0;
    while i + 1 < bytes.len() {
        let ch = bytes[i];
        if ch == bytes[i + 1] && (ch == b'`' || ch == b'\'') {
            escape_html_into(out, &text[last..i]);
            out.push_str(if ch == b'`' { "&ldquo;" } else { "&rdquo;" });
            i += 2;
            last = i;
        } else {
            i += 1;
        }
    }
    escape_html_into(out, &text[last..]);
}
