//! # `technews-rss`: Feed Collector
//!
//! Fetches a fixed set of tech news RSS feeds, cleans their entries into
//! [`FeedStory`] values and merges them into one list, newest first. Feeds are
//! fetched concurrently; a feed that cannot be fetched or parsed is logged and
//! skipped so the others still come through.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use rss::{Channel, Item};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use technews::{ContentItem, ContentKind, Normalizer};
use technews_html::{clean_html_text, truncate_with_ellipsis};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Shown when an entry carries no usable description.
pub const MISSING_DESCRIPTION: &str = "Click to read more...";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Custom error types for the feed collection process.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("Failed to fetch RSS feed: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("Failed to parse RSS feed: {0}")]
    Parse(#[from] rss::Error),
}

/// Which feeds to read and how much of them to keep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub urls: Vec<String>,
    /// Entries taken from each feed, in feed order.
    pub per_feed_limit: usize,
    /// Stories kept after merging all feeds.
    pub max_stories: usize,
    /// Characters of description kept before truncating with `...`.
    pub description_limit: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            urls: vec![
                "https://news.ycombinator.com/rss".to_string(),
                "https://techcrunch.com/feed/".to_string(),
                "https://www.techmeme.com/feed.xml".to_string(),
            ],
            per_feed_limit: 20,
            max_stories: 100,
            description_limit: 300,
        }
    }
}

/// One cleaned feed entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedStory {
    pub title: String,
    pub description: String,
    pub url: String,
    /// The cleaned title of the feed the entry came from.
    pub source: String,
    pub published: Option<DateTime<Utc>>,
}

impl FeedStory {
    /// Converts the story into a content record of kind `rss`. The feed title
    /// is used as the source name.
    pub fn into_content_item(self) -> ContentItem {
        Normalizer::new(ContentKind::Rss).normalize_fields(
            &self.title,
            &self.description,
            &self.url,
            Some(&self.source),
            self.published,
        )
    }
}

/// Fetches and merges the configured feeds.
#[derive(Debug, Clone)]
pub struct FeedCollector {
    client: reqwest::Client,
    config: FeedConfig,
}

impl FeedCollector {
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(FeedError::ClientBuild)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Collects stories from every configured feed.
    pub async fn collect(&self) -> Vec<FeedStory> {
        let fetches = self.config.urls.iter().map(|url| async move {
            match self.fetch_channel(url).await {
                Ok(channel) => self.stories_from(&channel),
                Err(e) => {
                    warn!(feed_url = %url, error = %e, "Skipping feed");
                    Vec::new()
                }
            }
        });

        let mut stories: Vec<FeedStory> = join_all(fetches).await.into_iter().flatten().collect();
        sort_newest_first(&mut stories);
        stories.truncate(self.config.max_stories);

        info!(
            feeds = self.config.urls.len(),
            stories = stories.len(),
            "Collected RSS stories"
        );
        stories
    }

    async fn fetch_channel(&self, url: &str) -> Result<Channel, FeedError> {
        debug!(feed_url = url, "Fetching RSS feed");
        let content = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(Channel::read_from(&content[..])?)
    }

    fn stories_from(&self, channel: &Channel) -> Vec<FeedStory> {
        if channel.items().is_empty() {
            info!(feed = channel.title(), "RSS feed has no items");
            return Vec::new();
        }
        let source = clean_html_text(channel.title());
        channel
            .items()
            .iter()
            .take(self.config.per_feed_limit)
            .map(|item| self.story_from(item, &source))
            .collect()
    }

    fn story_from(&self, item: &Item, source: &str) -> FeedStory {
        let description = [item.description(), item.content()]
            .into_iter()
            .flatten()
            .map(clean_html_text)
            .find(|text| !text.is_empty())
            .unwrap_or_else(|| MISSING_DESCRIPTION.to_string());

        FeedStory {
            title: clean_html_text(item.title().unwrap_or_default()),
            description: truncate_with_ellipsis(&description, self.config.description_limit),
            url: item.link().unwrap_or_default().trim().to_string(),
            source: source.to_string(),
            published: item.pub_date().and_then(parse_pub_date),
        }
    }
}

fn parse_pub_date(value: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc2822(value.trim()) {
        Ok(date) => Some(date.with_timezone(&Utc)),
        Err(e) => {
            debug!(pub_date = value, error = %e, "Ignoring unparseable pubDate");
            None
        }
    }
}

/// Newest first; undated stories keep their relative order at the end.
fn sort_newest_first(stories: &mut [FeedStory]) {
    stories.sort_by(|a, b| b.published.cmp(&a.published));
}
