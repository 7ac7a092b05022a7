//! Line classification for the styled text mode.
//!
//! Each line of free text is classified by the first rule that matches:
//!
//! 1. **Heading** - all-uppercase (more than two characters) or ending with `:`.
//! 2. **Bold lead-in** - contains `:` or `(` outside a URL and is not
//!    all-uppercase. The lead runs through the delimiter and the text after it
//!    up to a sentence period (included), a newline, another delimiter, or the
//!    start of a URL. A `(` lead-in also ends after its closing `)`.
//! 3. **Hyperlink** - contains an `http://` or `https://` token.
//! 4. **Plain** - everything else.
//!
//! URLs are kept verbatim and marked as links wherever they appear outside a
//! heading, so the rest of a bold lead-in line still gets link styling.
//!
//! # Example
//!
//! ```
//! use chatdoc::core::styling::{LineKind, classify_line};
//!
//! let line = classify_line("NOTE: see link http://example.com");
//! assert_eq!(line.kind, LineKind::BoldLeadIn);
//! assert_eq!(line.spans[0].text, "NOTE: see link");
//! assert!(line.spans[0].bold);
//! assert!(line.spans.last().unwrap().link);
//! ```

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("URL pattern is valid"));

/// Which rule classified a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// Bold, larger, extra spacing after.
    Heading,
    /// Bold leading run, remainder in normal weight.
    BoldLeadIn,
    /// Contains at least one URL rendered as a link.
    Hyperlink,
    /// Normal paragraph.
    Plain,
}

/// A run of text with uniform styling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
    /// The text is a URL, drawn underlined in blue.
    pub link: bool,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            link: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            link: false,
        }
    }

    pub fn link(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            link: true,
        }
    }
}

/// A classified line split into styled spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledLine {
    pub kind: LineKind,
    pub spans: Vec<Span>,
}

impl StyledLine {
    /// An unstyled line holding `text` as a single span.
    pub fn plain(text: &str) -> Self {
        Self {
            kind: LineKind::Plain,
            spans: vec![Span::plain(text)],
        }
    }

    /// A line whose text is entirely bold (plain-mode titles).
    pub fn bold(text: &str) -> Self {
        Self {
            kind: LineKind::Plain,
            spans: vec![Span::bold(text)],
        }
    }

    /// Concatenated text of all spans.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Classifies a single line of free text.
pub fn classify_line(text: &str) -> StyledLine {
    let text = text.trim();

    if is_heading(text) {
        return StyledLine {
            kind: LineKind::Heading,
            spans: vec![Span::bold(text)],
        };
    }

    let urls = url_ranges(text);

    if !is_all_uppercase(text) {
        if let Some((lead, rest)) = split_lead_in(text, &urls) {
            let mut spans = vec![Span::bold(lead)];
            if !rest.is_empty() {
                spans.push(Span::plain(" "));
                spans.extend(link_spans(rest));
            }
            return StyledLine {
                kind: LineKind::BoldLeadIn,
                spans,
            };
        }
    }

    if !urls.is_empty() {
        return StyledLine {
            kind: LineKind::Hyperlink,
            spans: link_spans(text),
        };
    }

    StyledLine::plain(text)
}

/// Returns `true` if `text` has cased letters and none of them is lowercase.
pub fn is_all_uppercase(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}

fn is_heading(text: &str) -> bool {
    (is_all_uppercase(text) && text.chars().count() > 2) || text.ends_with(':')
}

fn url_ranges(text: &str) -> Vec<Range<usize>> {
    URL_PATTERN.find_iter(text).map(|m| m.range()).collect()
}

fn in_url(urls: &[Range<usize>], index: usize) -> bool {
    urls.iter().any(|r| r.contains(&index))
}

/// Splits a bold lead-in line into its bold lead and the trimmed remainder.
fn split_lead_in<'a>(text: &'a str, urls: &[Range<usize>]) -> Option<(&'a str, &'a str)> {
    let (delim_at, delim) = text
        .char_indices()
        .find(|&(i, c)| (c == ':' || c == '(') && !in_url(urls, i))?;

    let mut end = text.len();
    let mut chars = text[delim_at + 1..].char_indices().peekable();
    while let Some((offset, c)) = chars.next() {
        let i = delim_at + 1 + offset;
        if urls.iter().any(|r| r.start == i) || c == '\n' || c == ':' || c == '(' {
            end = i;
            break;
        }
        if delim == '(' && c == ')' {
            end = i + 1;
            break;
        }
        if c == '.' && chars.peek().is_none_or(|&(_, next)| next.is_whitespace()) {
            end = i + 1;
            break;
        }
    }

    let lead = text[..end].trim_end();
    let rest = text[end..].trim();
    Some((lead, rest))
}

/// Splits `text` into plain and link spans.
pub fn link_spans(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut last = 0;
    for m in URL_PATTERN.find_iter(text) {
        if m.start() > last {
            spans.push(Span::plain(&text[last..m.start()]));
        }
        spans.push(Span::link(m.as_str()));
        last = m.end();
    }
    if last < text.len() || spans.is_empty() {
        spans.push(Span::plain(&text[last..]));
    }
    spans
}
