//! # technews-html
//!
//! Small text helpers shared by the parsers and the feed collector: turning
//! HTML (or entity-encoded HTML) into plain text, escaping text for display,
//! and length limiting.

use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

static CONTROL_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x00-\x1F\x7F-\x{9F}]").expect("control character pattern is valid")
});

/// Parses `html` as a fragment and returns its text nodes joined by a space.
///
/// Character references are decoded as part of parsing.
pub fn strip_tags(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    fragment
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapses every run of whitespace into a single space and trims the ends.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// Converts a feed title or description into a single line of plain text.
///
/// Feeds frequently ship HTML that has itself been entity-encoded
/// (`&lt;p&gt;...`), so markup is stripped twice: the first pass decodes the
/// entities, the second removes the tags they revealed.
pub fn clean_html_text(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    let decoded = strip_tags(text);
    let stripped = strip_tags(&decoded);
    let collapsed = normalize_whitespace(&stripped);
    CONTROL_CHARS_RE
        .replace_all(&collapsed, "")
        .trim()
        .to_string()
}

/// Returns the concatenated, whitespace-normalized text of an element.
pub fn element_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

/// Escapes the five HTML-significant characters so `text` can be placed in
/// element content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Keeps the first `limit` characters of `text`, appending `...` when
/// anything was cut.
pub fn truncate_with_ellipsis(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}
