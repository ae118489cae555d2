//! # Model Responses
//!
//! The payload handed over by the "ask a model" collaborator. The preferred
//! shape is `{ "content": ..., "citations": [...] }`, but the OpenAI-compatible
//! `choices[0].message.content` shape and the older `answer` key are accepted
//! too. A payload with an `error` key carries nothing to parse.

use crate::citations::CitationRegistry;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Deserialize, Debug, Default)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct Choice {
    #[serde(default)]
    message: ChoiceMessage,
}

#[derive(Deserialize, Debug, Default)]
struct RawModelResponse {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    citations: Vec<String>,
    #[serde(default)]
    error: Option<Value>,
}

/// A model answer as seen by the parsing pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawModelResponse")]
pub struct ModelResponse {
    pub content: Option<String>,
    pub citations: Vec<String>,
    pub error: Option<String>,
}

impl From<RawModelResponse> for ModelResponse {
    fn from(raw: RawModelResponse) -> Self {
        let content = raw
            .content
            .or_else(|| {
                raw.choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.message.content)
            })
            .or(raw.answer);
        let error = raw.error.and_then(|error| match error {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        });
        Self {
            content,
            citations: raw.citations,
            error,
        }
    }
}

impl ModelResponse {
    /// A successful response with citations.
    pub fn new(content: impl Into<String>, citations: Vec<String>) -> Self {
        Self {
            content: Some(content.into()),
            citations,
            error: None,
        }
    }

    /// A failed response.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// The text to parse and the citations that go with it, or `None` when the
    /// collaborator reported an error or returned no content.
    pub fn parse_input(self) -> Option<(String, CitationRegistry)> {
        if self.error.is_some() {
            return None;
        }
        self.content
            .map(|content| (content, CitationRegistry::new(self.citations)))
    }
}
