//! # Application State
//!
//! The shared state handed to every handler: the loaded configuration, the
//! feed collector and the board of the current session.

use crate::config::AppConfig;
use std::sync::Arc;
use technews::{ContentBoard, ContentStore, HttpContentStore};
use technews_rss::FeedCollector;
use tokio::sync::Mutex;

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub collector: Arc<FeedCollector>,
    /// The items of the latest parsed response with their preview and
    /// submission controls.
    pub board: Arc<Mutex<ContentBoard>>,
}

/// Builds the shared application state, persisting to the configured HTTP
/// store.
pub fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let store = HttpContentStore::with_timeout(
        config.store.api_url.clone(),
        config.store.api_key.clone(),
        config.store.timeout(),
    )?;
    build_app_state_with_store(config, Arc::new(store))
}

/// Builds the shared application state around an already constructed store.
pub fn build_app_state_with_store(
    config: AppConfig,
    store: Arc<dyn ContentStore>,
) -> anyhow::Result<AppState> {
    let collector = FeedCollector::new(config.feeds.clone())?;
    let board = ContentBoard::new(store)
        .with_markup_schema(config.markup.clone())
        .with_reset_after(config.submission.reset_after());

    Ok(AppState {
        config: Arc::new(config),
        collector: Arc::new(collector),
        board: Arc::new(Mutex::new(board)),
    })
}
