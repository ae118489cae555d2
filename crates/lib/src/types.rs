//! # Content Types
//!
//! The canonical record produced by the parsing pipeline and sent to the
//! persistence collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Where a content item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Reddit,
    Rss,
    AiGenerated,
    AiApiResponse,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentKind::Reddit => "reddit",
            ContentKind::Rss => "rss",
            ContentKind::AiGenerated => "ai_generated",
            ContentKind::AiApiResponse => "ai_api_response",
        };
        f.write_str(name)
    }
}

/// A normalized content record.
///
/// Instances are only built by the [`Normalizer`](crate::normalizer::Normalizer)
/// and are never mutated afterwards; the field accessors are the whole API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentItem {
    title: String,
    body: String,
    source_url: String,
    source_name: String,
    kind: ContentKind,
    published_at: DateTime<Utc>,
    active: bool,
    metadata: Map<String, Value>,
}

impl ContentItem {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        title: String,
        body: String,
        source_url: String,
        source_name: String,
        kind: ContentKind,
        published_at: DateTime<Utc>,
        metadata: Map<String, Value>,
    ) -> Self {
        Self {
            title,
            body,
            source_url,
            source_name,
            kind,
            published_at,
            active: true,
            metadata,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    /// The 1-based citation number the record was resolved from, if any.
    pub fn citation_index(&self) -> Option<i64> {
        self.metadata
            .get(crate::constants::METADATA_CITATION_INDEX)
            .and_then(Value::as_i64)
    }
}
