//! # Citation Registry
//!
//! Model responses in the delimited format refer to their sources by number
//! (`Citation: [2]`) and ship the actual URLs as a separate ordered list. The
//! registry keeps that list and resolves the numbers.

use serde::{Deserialize, Serialize};

/// Ordered source URLs of one model response. Citation `n` maps to entry `n - 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CitationRegistry {
    urls: Vec<String>,
}

impl CitationRegistry {
    pub fn new(urls: Vec<String>) -> Self {
        Self { urls }
    }

    /// Resolves a 1-based citation number. Numbers without an entry, including
    /// zero and negatives, resolve to an empty string.
    pub fn resolve(&self, citation: i64) -> &str {
        usize::try_from(citation)
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|idx| self.urls.get(idx))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Replaces the whole list; entries of the previous response are not kept.
    pub fn replace(&mut self, urls: Vec<String>) {
        self.urls = urls;
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

impl From<Vec<String>> for CitationRegistry {
    fn from(urls: Vec<String>) -> Self {
        Self::new(urls)
    }
}
