//! # Record Parser
//!
//! Turns one raw model response into content items. Two formats are
//! supported and the caller decides which one a response is in:
//!
//! - [`DelimitedText`]: `Title: ... Content: ... Citation: [n]` blocks, with the
//!   cited URLs supplied separately through a [`CitationRegistry`].
//! - [`EmbeddedMarkup`]: an HTML fragment of item elements carrying a heading,
//!   a paragraph and a source element.
//!
//! Both strategies are best-effort: anything that does not have the expected
//! shape is dropped rather than reported, since the upstream model is not
//! guaranteed to follow the requested format.

pub mod delimited;
pub mod markup;

pub use delimited::DelimitedText;
pub use markup::{EmbeddedMarkup, MarkupSchema};

use crate::{citations::CitationRegistry, normalizer::Normalizer, types::ContentItem};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A record as cut out of the raw text, before escaping and defaulting.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RawSegment {
    pub title: String,
    pub body: String,
    /// The 1-based citation number as written by the model.
    pub citation_index: Option<i64>,
    pub source_url: String,
    /// Set when the strategy derives the name itself; the normalizer fills it otherwise.
    pub source_name: Option<String>,
}

/// The capability shared by both strategies.
pub(crate) trait SegmentParser {
    /// Splits `raw` into segments, in input order. Must not touch any state
    /// beyond its arguments.
    fn segments(&self, raw: &str, registry: &CitationRegistry) -> Vec<RawSegment>;
}

/// The format the upstream model was asked to answer in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    DelimitedText,
    EmbeddedMarkup,
}

/// A parsing strategy selected by the caller.
#[derive(Debug, Clone)]
pub enum RecordParser {
    DelimitedText(DelimitedText),
    EmbeddedMarkup(EmbeddedMarkup),
}

impl RecordParser {
    /// Builds the parser for `format`. The markup schema is only used by the
    /// embedded-markup strategy.
    pub fn for_format(format: ResponseFormat, schema: &MarkupSchema) -> Self {
        match format {
            ResponseFormat::DelimitedText => RecordParser::DelimitedText(DelimitedText),
            ResponseFormat::EmbeddedMarkup => {
                RecordParser::EmbeddedMarkup(EmbeddedMarkup::new(schema.clone()))
            }
        }
    }

    pub fn format(&self) -> ResponseFormat {
        match self {
            RecordParser::DelimitedText(_) => ResponseFormat::DelimitedText,
            RecordParser::EmbeddedMarkup(_) => ResponseFormat::EmbeddedMarkup,
        }
    }

    /// Parses `raw` and normalizes every segment found, preserving input order.
    pub fn parse(
        &self,
        raw: &str,
        registry: &CitationRegistry,
        normalizer: &Normalizer,
    ) -> Vec<ContentItem> {
        let segments = match self {
            RecordParser::DelimitedText(parser) => parser.segments(raw, registry),
            RecordParser::EmbeddedMarkup(parser) => parser.segments(raw, registry),
        };
        debug!(
            format = ?self.format(),
            segments = segments.len(),
            "Parsed model response"
        );
        segments
            .into_iter()
            .map(|segment| normalizer.normalize(segment, registry))
            .collect()
    }
}
