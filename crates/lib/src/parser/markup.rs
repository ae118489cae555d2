//! Parser for answers returned as an HTML fragment of story elements.

use super::{RawSegment, SegmentParser};
use crate::{citations::CitationRegistry, constants::UNTITLED, normalizer::derive_source_name};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use technews_html::element_text;
use tracing::warn;

/// CSS selectors describing where the parts of a story live in the markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupSchema {
    /// Marker selector of an item element.
    pub item: String,
    /// Heading sub-element holding the title.
    pub heading: String,
    /// Paragraph sub-element holding the body.
    pub paragraph: String,
    /// Sub-element holding the source URL.
    pub source: String,
}

impl Default for MarkupSchema {
    fn default() -> Self {
        Self {
            item: ".news-item".to_string(),
            heading: "h1, h2, h3, h4, h5, h6".to_string(),
            paragraph: "p:not(.source)".to_string(),
            source: ".source".to_string(),
        }
    }
}

struct CompiledSchema {
    item: Selector,
    heading: Selector,
    paragraph: Selector,
    source: Selector,
}

impl MarkupSchema {
    fn compile(&self) -> Result<CompiledSchema, String> {
        let parse = |selector: &str| {
            Selector::parse(selector).map_err(|e| format!("invalid selector '{selector}': {e:?}"))
        };
        Ok(CompiledSchema {
            item: parse(&self.item)?,
            heading: parse(&self.heading)?,
            paragraph: parse(&self.paragraph)?,
            source: parse(&self.source)?,
        })
    }
}

/// Embedded-markup strategy.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedMarkup {
    schema: MarkupSchema,
}

impl EmbeddedMarkup {
    pub fn new(schema: MarkupSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &MarkupSchema {
        &self.schema
    }
}

impl SegmentParser for EmbeddedMarkup {
    fn segments(&self, raw: &str, _registry: &CitationRegistry) -> Vec<RawSegment> {
        let compiled = match self.schema.compile() {
            Ok(compiled) => compiled,
            Err(e) => {
                warn!("Markup schema rejected, no items parsed: {e}");
                return Vec::new();
            }
        };

        let fragment = Html::parse_fragment(raw);
        fragment
            .select(&compiled.item)
            .filter_map(|item| parse_item(item, &compiled))
            .collect()
    }
}

fn parse_item(item: ElementRef<'_>, schema: &CompiledSchema) -> Option<RawSegment> {
    let heading = item.select(&schema.heading).next();
    let paragraph = item.select(&schema.paragraph).next();
    if heading.is_none() && paragraph.is_none() {
        return None;
    }

    let title = heading
        .map(element_text)
        .unwrap_or_else(|| UNTITLED.to_string());
    let body = paragraph.map(element_text).unwrap_or_default();
    let source_url = item
        .select(&schema.source)
        .next()
        .map(|source| {
            let text = element_text(source);
            if text.is_empty() {
                source.value().attr("href").unwrap_or_default().trim().to_string()
            } else {
                text
            }
        })
        .unwrap_or_default();
    let source_name = derive_source_name(&source_url);

    Some(RawSegment {
        title,
        body,
        citation_index: None,
        source_url,
        source_name: Some(source_name),
    })
}
