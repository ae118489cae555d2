use super::{is_truthy, ContentStore};
use crate::{constants::DEFAULT_STORE_TIMEOUT, errors::StoreError, types::ContentItem};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde_json::Value;
use std::fmt::Debug;
use std::time::Duration;
use tracing::{debug, warn};

/// A store reached over HTTP: the item is POSTed as JSON and the response is
/// read as `{ "data": ... }` or `{ "error": ... }`.
#[derive(Clone)]
pub struct HttpContentStore {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
}

impl Debug for HttpContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpContentStore")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl HttpContentStore {
    /// Creates a new `HttpContentStore`.
    ///
    /// When an API key is given it is sent both as an `apikey` header and as a
    /// bearer token, which is what hosted REST-over-Postgres stores expect.
    pub fn new(api_url: String, api_key: Option<String>) -> Result<Self, StoreError> {
        Self::with_timeout(api_url, api_key, DEFAULT_STORE_TIMEOUT)
    }

    /// Like [`HttpContentStore::new`], with a custom per-request timeout. A
    /// request that runs over it fails with [`StoreError::Request`].
    pub fn with_timeout(
        api_url: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::ClientBuild(e.to_string()))?;
        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }
}

#[async_trait]
impl ContentStore for HttpContentStore {
    async fn create_record(&self, item: &ContentItem) -> Result<Value, StoreError> {
        debug!(api_url = %self.api_url, title = item.title(), "--> Creating record");

        let mut request_builder = self.client.post(&self.api_url).json(item);
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            request_builder = request_builder.header("apikey", key).bearer_auth(key);
        }

        let response = request_builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Content store returned an error status");
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| StoreError::Deserialization(e.to_string()))?;
        interpret_response(value)
    }
}

/// Splits a decoded store response into its data payload or its error.
fn interpret_response(value: Value) -> Result<Value, StoreError> {
    let Value::Object(mut fields) = value else {
        return Ok(value);
    };

    if let Some(error) = fields.get("error").filter(|e| is_truthy(e)) {
        let message = match error {
            Value::String(s) => s.clone(),
            Value::Object(obj) => obj
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string()),
            other => other.to_string(),
        };
        return Err(StoreError::Rejected(message));
    }

    match fields.remove("data") {
        Some(data) => Ok(data),
        None => Ok(Value::Object(fields)),
    }
}
