use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use technews::{ContentItem, ContentStore, StoreError};

// --- Logging ---

/// Installs a compact subscriber driven by `RUST_LOG`. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .try_init();
}

// --- Mock Content Store ---

/// An in-memory `ContentStore` that records every call.
///
/// Responses are consumed in the order they were queued; once the queue is
/// empty every call succeeds with a generated id. Only successful calls end up
/// in `stored_records`.
#[derive(Clone, Debug, Default)]
pub struct MockContentStore {
    responses: Arc<Mutex<VecDeque<Result<Value, StoreError>>>>,
    calls: Arc<Mutex<Vec<Value>>>,
    stored: Arc<Mutex<Vec<Value>>>,
    latency: Duration,
}

impl MockContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every call, which keeps a submission in flight long enough to
    /// race a second one against it.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Queues the result of the next unanswered call.
    pub fn push_response(&self, response: Result<Value, StoreError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Queues a `{ "error": message }` rejection.
    pub fn push_rejection(&self, message: &str) {
        self.push_response(Err(StoreError::Rejected(message.to_string())));
    }

    /// Every payload the store was asked to create, in call order.
    pub fn get_calls(&self) -> Vec<Value> {
        self.calls.lock().unwrap().clone()
    }

    /// Payloads of the calls that succeeded.
    pub fn stored_records(&self) -> Vec<Value> {
        self.stored.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentStore for MockContentStore {
    async fn create_record(&self, item: &ContentItem) -> Result<Value, StoreError> {
        let payload = serde_json::to_value(item)
            .map_err(|e| StoreError::Deserialization(e.to_string()))?;
        let call_number = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(payload.clone());
            calls.len()
        };

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(json!([{ "id": call_number }])));
        if response.is_ok() {
            self.stored.lock().unwrap().push(payload);
        }
        response
    }
}

// --- Fixtures ---

/// A delimited-text answer with three stories and the citations it refers to.
pub fn sample_delimited_response() -> (String, Vec<String>) {
    let content = "Here is some good tech news from the last 7 days:\n\n\
        Title: Chip plant adds 1,500 jobs\n\
        Content: A new fab in Ohio starts hiring technicians.\n\
        Citation: [1]\n\n\
        Title: Layoffs slow across big tech\n\
        Content: Announced cuts fell for the third month in a row.\n\
        Citation: [2]\n\n\
        Title: Bootcamp grads see record placement\n\
        Content: Placement rates topped 80% this quarter.\n\
        Citation: [3]\n";
    let citations = vec![
        "https://www.reuters.com/tech/chip-plant".to_string(),
        "https://techcrunch.com/layoffs-slow".to_string(),
        "https://www.theverge.com/bootcamps".to_string(),
    ];
    (content.to_string(), citations)
}

/// An embedded-markup answer with two complete stories.
pub fn sample_markup_response() -> String {
    r#"
    <div class="news-item">
        <h3>Open-source maintainers get funding</h3>
        <p>A foundation pledged grants for critical projects.</p>
        <p class="source">https://www.github.blog/funding</p>
    </div>
    <div class="news-item">
        <h3>Remote hiring climbs</h3>
        <p>Fully remote listings rose again in March.</p>
        <p class="source">https://news.ycombinator.com/item?id=42</p>
    </div>
    "#
    .to_string()
}

/// An RSS 2.0 document with the given channel title and `(title, link,
/// description, pub_date)` items.
pub fn sample_rss_feed(channel_title: &str, items: &[(&str, &str, &str, Option<&str>)]) -> String {
    let items: String = items
        .iter()
        .map(|(title, link, description, pub_date)| {
            let pub_date = pub_date
                .map(|d| format!("<pubDate>{d}</pubDate>"))
                .unwrap_or_default();
            format!(
                "<item><title>{title}</title><link>{link}</link><description>{description}</description>{pub_date}</item>"
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
<channel>
    <title>{channel_title}</title>
    <link>http://localhost/feed</link>
    <description>Test feed</description>
    {items}
</channel>
</rss>"#
    )
}
