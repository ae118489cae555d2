//! Parser for the `Title: / Content: / Citation: [n]` answer convention.

use super::{RawSegment, SegmentParser};
use crate::citations::CitationRegistry;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

const TITLE_MARKER: &str = "Title:";
const CONTENT_MARKER: &str = "Content:";
const CITATION_MARKER: &str = "Citation:";

static CITATION_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\s*(-?\d+)\s*\]").expect("citation pattern is valid"));

/// Delimited-text strategy. Every `Title:` marker opens a new block; text
/// before the first marker is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelimitedText;

impl SegmentParser for DelimitedText {
    fn segments(&self, raw: &str, registry: &CitationRegistry) -> Vec<RawSegment> {
        let starts: Vec<usize> = raw.match_indices(TITLE_MARKER).map(|(i, _)| i).collect();

        starts
            .iter()
            .enumerate()
            .filter_map(|(n, &start)| {
                let end = starts.get(n + 1).copied().unwrap_or(raw.len());
                let segment = parse_block(&raw[start..end], registry);
                if segment.is_none() {
                    debug!(block = n, "Dropping block without a Content: marker");
                }
                segment
            })
            .collect()
    }
}

fn parse_block(block: &str, registry: &CitationRegistry) -> Option<RawSegment> {
    let after_title = block.strip_prefix(TITLE_MARKER)?;
    let content_pos = after_title.find(CONTENT_MARKER)?;
    let title = clean_field(&after_title[..content_pos]);

    let rest = &after_title[content_pos + CONTENT_MARKER.len()..];
    let (body, citation_part) = match rest.find(CITATION_MARKER) {
        Some(pos) => (&rest[..pos], Some(&rest[pos + CITATION_MARKER.len()..])),
        None => (rest, None),
    };

    let citation_index = citation_part
        .and_then(|part| CITATION_NUMBER_RE.captures(part))
        .and_then(|caps| caps[1].parse::<i64>().ok());
    let source_url = citation_index
        .map(|n| registry.resolve(n).to_string())
        .unwrap_or_default();

    Some(RawSegment {
        title,
        body: clean_field(body),
        citation_index,
        source_url,
        source_name: None,
    })
}

/// Trims whitespace and the markdown emphasis models like to wrap labels in
/// (`**Title:** ...`).
fn clean_field(text: &str) -> String {
    text.trim_matches(|c: char| c.is_whitespace() || c == '*')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> CitationRegistry {
        CitationRegistry::new(vec![
            "http://one.example".to_string(),
            "http://two.example".to_string(),
        ])
    }

    #[test]
    fn test_single_block() {
        let segments =
            DelimitedText.segments("Title: X\nContent: Y\nCitation: [1]", &registry());
        assert_eq!(
            segments,
            vec![RawSegment {
                title: "X".to_string(),
                body: "Y".to_string(),
                citation_index: Some(1),
                source_url: "http://one.example".to_string(),
                source_name: None,
            }]
        );
    }

    #[test]
    fn test_leading_noise_is_ignored() {
        let raw = "Here are the stories you asked for:\n\nTitle: A\nContent: B";
        let segments = DelimitedText.segments(raw, &registry());
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].title, "A");
        assert_eq!(segments[0].body, "B");
        assert_eq!(segments[0].citation_index, None);
        assert_eq!(segments[0].source_url, "");
    }

    #[test]
    fn test_block_without_content_is_dropped() {
        let raw = "Title: Lonely heading\n\nTitle: Real\nContent: Story\nCitation: [2]";
        let segments = DelimitedText.segments(raw, &registry());
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].title, "Real");
        assert_eq!(segments[0].source_url, "http://two.example");
    }

    #[test]
    fn test_markdown_emphasis_is_trimmed() {
        let raw = "**Title:** Hiring rebounds\n**Content:** Startups add jobs.\n**Citation:** [2]\n";
        let segments = DelimitedText.segments(raw, &registry());
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].title, "Hiring rebounds");
        assert_eq!(segments[0].body, "Startups add jobs.");
        assert_eq!(segments[0].citation_index, Some(2));
    }

    #[test]
    fn test_citation_without_number() {
        let raw = "Title: A\nContent: B\nCitation: none given";
        let segments = DelimitedText.segments(raw, &registry());
        assert_eq!(segments[0].citation_index, None);
        assert_eq!(segments[0].source_url, "");
    }

    #[test]
    fn test_out_of_range_citations_resolve_empty() {
        let raw = "Title: A\nContent: B\nCitation: [9]\nTitle: C\nContent: D\nCitation: [0]\nTitle: E\nContent: F\nCitation: [-1]";
        let segments = DelimitedText.segments(raw, &registry());
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].citation_index, Some(9));
        assert!(segments.iter().all(|s| s.source_url.is_empty()));
    }

    #[test]
    fn test_multiline_body() {
        let raw = "Title: A\nContent: line one\nline two\n\nCitation: [1]";
        let segments = DelimitedText.segments(raw, &registry());
        assert_eq!(segments[0].body, "line one\nline two");
    }
}
