//! # Normalizer
//!
//! Completes parser output into [`ContentItem`]s: escapes quote characters,
//! derives the source name, defaults the publication time and records
//! provenance in the metadata. Normalization never fails; missing pieces fall
//! back to `"Untitled"`, `""` or `"Unknown"`.

use crate::{
    citations::CitationRegistry,
    constants::{METADATA_CITATIONS, METADATA_CITATION_INDEX, UNKNOWN_SOURCE, UNTITLED},
    parser::RawSegment,
    types::{ContentItem, ContentKind},
};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::warn;
use url::Url;

/// Settings applied to every record of one parse cycle.
#[derive(Debug, Clone)]
pub struct Normalizer {
    kind: ContentKind,
    published_at: Option<DateTime<Utc>>,
    extra_metadata: Map<String, Value>,
}

impl Normalizer {
    pub fn new(kind: ContentKind) -> Self {
        Self {
            kind,
            published_at: None,
            extra_metadata: Map::new(),
        }
    }

    /// Uses an explicit publication time instead of the current time.
    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    /// Adds a passthrough metadata entry, e.g. the id of the model that answered.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra_metadata.insert(key.into(), value.into());
        self
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub(crate) fn normalize(&self, segment: RawSegment, registry: &CitationRegistry) -> ContentItem {
        let mut metadata = self.extra_metadata.clone();
        if let Some(index) = segment.citation_index {
            metadata.insert(METADATA_CITATION_INDEX.to_string(), Value::from(index));
        }
        if !registry.is_empty() {
            metadata.insert(
                METADATA_CITATIONS.to_string(),
                Value::from(registry.urls().to_vec()),
            );
        }

        let source_name = segment
            .source_name
            .unwrap_or_else(|| derive_source_name(&segment.source_url));
        self.build(segment.title, segment.body, segment.source_url, source_name, None, metadata)
    }

    /// Builds an item from fields that did not come out of a model response,
    /// such as feed entries. The same escaping and defaulting rules apply;
    /// `published_at` overrides the normalizer's own setting when present.
    pub fn normalize_fields(
        &self,
        title: &str,
        body: &str,
        source_url: &str,
        source_name: Option<&str>,
        published_at: Option<DateTime<Utc>>,
    ) -> ContentItem {
        let source_name = match source_name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => derive_source_name(source_url),
        };
        self.build(
            title.to_string(),
            body.to_string(),
            source_url.to_string(),
            source_name,
            published_at,
            self.extra_metadata.clone(),
        )
    }

    fn build(
        &self,
        title: String,
        body: String,
        source_url: String,
        source_name: String,
        published_at: Option<DateTime<Utc>>,
        metadata: Map<String, Value>,
    ) -> ContentItem {
        let title = if title.trim().is_empty() {
            UNTITLED.to_string()
        } else {
            escape_quotes(&title)
        };
        let published_at = published_at
            .or(self.published_at)
            .unwrap_or_else(Utc::now);

        ContentItem::from_parts(
            title,
            escape_quotes(&body),
            source_url.trim().to_string(),
            source_name,
            self.kind,
            published_at,
            metadata,
        )
    }
}

/// Backslash-escapes `\`, `"` and `'` so the text can be embedded in a quoted
/// attribute value.
///
/// A backslash already followed by one of those characters is treated as an
/// existing escape and copied unchanged, which makes the function idempotent.
pub fn escape_quotes(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.peek() {
                Some(&next) if matches!(next, '\\' | '"' | '\'') => {
                    escaped.push('\\');
                    escaped.push(next);
                    chars.next();
                }
                _ => escaped.push_str("\\\\"),
            },
            '"' | '\'' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Derives a display name from a source URL: its host without a leading `www.`.
///
/// An empty URL yields `"Unknown"` quietly; a URL that cannot be parsed, or has
/// no host, also yields `"Unknown"` and logs a warning.
pub fn derive_source_name(source_url: &str) -> String {
    let source_url = source_url.trim();
    if source_url.is_empty() {
        return UNKNOWN_SOURCE.to_string();
    }
    match Url::parse(source_url) {
        Ok(url) => match url.host_str() {
            Some(host) => host.strip_prefix("www.").unwrap_or(host).to_string(),
            None => {
                warn!(source_url, "Source URL has no host");
                UNKNOWN_SOURCE.to_string()
            }
        },
        Err(e) => {
            warn!(source_url, error = %e, "Could not parse source URL");
            UNKNOWN_SOURCE.to_string()
        }
    }
}
