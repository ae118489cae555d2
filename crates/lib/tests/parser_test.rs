//! # Record Parser Tests
//!
//! End-to-end checks of the parse + normalize pipeline for both response
//! formats, through the public `RecordParser` API.

use chrono::{TimeZone, Utc};
use technews::{
    constants::{METADATA_CITATIONS, UNKNOWN_SOURCE},
    CitationRegistry, ContentKind, MarkupSchema, Normalizer, RecordParser, ResponseFormat,
};
use technews_test_utils::{init_tracing, sample_delimited_response, sample_markup_response};

fn delimited() -> RecordParser {
    RecordParser::for_format(ResponseFormat::DelimitedText, &MarkupSchema::default())
}

fn markup() -> RecordParser {
    RecordParser::for_format(ResponseFormat::EmbeddedMarkup, &MarkupSchema::default())
}

/// `Title: X / Content: Y / Citation: [1]` with one registered source.
#[test]
fn test_delimited_single_story_resolves_citation() {
    let registry = CitationRegistry::new(vec!["http://s.example".to_string()]);
    let normalizer = Normalizer::new(ContentKind::AiApiResponse);

    let items = delimited().parse("Title: X\nContent: Y\nCitation: [1]", &registry, &normalizer);

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title(), "X");
    assert_eq!(items[0].body(), "Y");
    assert_eq!(items[0].source_url(), "http://s.example");
    assert_eq!(items[0].source_name(), "s.example");
    assert_eq!(items[0].citation_index(), Some(1));
    assert_eq!(items[0].kind(), ContentKind::AiApiResponse);
    assert!(items[0].is_active());
}

/// N well-formed blocks produce N items in input order.
#[test]
fn test_delimited_preserves_count_and_order() {
    let (content, citations) = sample_delimited_response();
    let registry = CitationRegistry::new(citations);
    let items = delimited().parse(&content, &registry, &Normalizer::new(ContentKind::AiGenerated));

    let titles: Vec<&str> = items.iter().map(|i| i.title()).collect();
    assert_eq!(
        titles,
        vec![
            "Chip plant adds 1,500 jobs",
            "Layoffs slow across big tech",
            "Bootcamp grads see record placement",
        ]
    );
    let sources: Vec<&str> = items.iter().map(|i| i.source_name()).collect();
    assert_eq!(sources, vec!["reuters.com", "techcrunch.com", "theverge.com"]);
}

#[test]
fn test_delimited_many_generated_blocks() {
    let raw: String = (1..=25)
        .map(|n| format!("Title: Story {n}\nContent: Body {n}\nCitation: [{n}]\n\n"))
        .collect();
    let registry = CitationRegistry::new((1..=10).map(|n| format!("https://s{n}.example")).collect());

    let items = delimited().parse(&raw, &registry, &Normalizer::new(ContentKind::AiGenerated));

    assert_eq!(items.len(), 25);
    for (n, item) in (1..=25).zip(&items) {
        assert_eq!(item.title(), format!("Story {n}"));
        assert_eq!(item.body(), format!("Body {n}"));
        if n <= 10 {
            assert_eq!(item.source_url(), format!("https://s{n}.example"));
        } else {
            assert_eq!(item.source_url(), "");
            assert_eq!(item.source_name(), UNKNOWN_SOURCE);
        }
    }
}

#[test]
fn test_delimited_noise_only_input() {
    let registry = CitationRegistry::default();
    let normalizer = Normalizer::new(ContentKind::AiGenerated);
    assert!(delimited()
        .parse("I could not find any stories.", &registry, &normalizer)
        .is_empty());
    assert!(delimited().parse("", &registry, &normalizer).is_empty());
}

#[test]
fn test_parsing_is_repeatable() {
    let (content, citations) = sample_delimited_response();
    let registry = CitationRegistry::new(citations);
    let published = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    let normalizer = Normalizer::new(ContentKind::AiGenerated).with_published_at(published);

    let first = delimited().parse(&content, &registry, &normalizer);
    let second = delimited().parse(&content, &registry, &normalizer);
    assert_eq!(first, second);
}

#[test]
fn test_delimited_escapes_quotes_and_records_provenance() {
    let registry = CitationRegistry::new(vec!["https://a.example".to_string()]);
    let normalizer = Normalizer::new(ContentKind::AiApiResponse).with_metadata("model", "grok");
    let raw = "Title: The \"AI\" hiring boom\nContent: It's real.\nCitation: [1]";

    let items = delimited().parse(raw, &registry, &normalizer);

    assert_eq!(items[0].title(), r#"The \"AI\" hiring boom"#);
    assert_eq!(items[0].body(), r"It\'s real.");
    assert_eq!(items[0].metadata()["model"], "grok");
    assert_eq!(
        items[0].metadata()[METADATA_CITATIONS],
        serde_json::json!(["https://a.example"])
    );
}

/// An item without a source element gets an empty URL and an unknown source.
#[test]
fn test_markup_item_without_source() {
    init_tracing();
    let raw = r#"<div class="news-item"><h3>Quiet launch</h3><p>No link given.</p></div>"#;

    let items = markup().parse(
        raw,
        &CitationRegistry::default(),
        &Normalizer::new(ContentKind::AiGenerated),
    );

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title(), "Quiet launch");
    assert_eq!(items[0].source_url(), "");
    assert_eq!(items[0].source_name(), UNKNOWN_SOURCE);
    assert!(items[0].metadata().is_empty());
}

#[test]
fn test_markup_sample_response() {
    let items = markup().parse(
        &sample_markup_response(),
        &CitationRegistry::default(),
        &Normalizer::new(ContentKind::AiGenerated),
    );

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title(), "Open-source maintainers get funding");
    assert_eq!(items[0].source_name(), "github.blog");
    assert_eq!(items[1].source_url(), "https://news.ycombinator.com/item?id=42");
    assert_eq!(items[1].source_name(), "news.ycombinator.com");
}

#[test]
fn test_markup_format_ignores_delimited_text() {
    let items = markup().parse(
        "Title: X\nContent: Y",
        &CitationRegistry::default(),
        &Normalizer::new(ContentKind::AiGenerated),
    );
    assert!(items.is_empty());
}
