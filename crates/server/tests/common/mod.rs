//! # Common Test Utilities
//!
//! `TestApp` spawns the real router on a random port, backed by a
//! `MockContentStore` and a `wiremock` server that can serve RSS feeds.

// Not every test file uses every helper.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use reqwest::Client;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use technews_rss::FeedConfig;
use technews_server::{
    config::{AppConfig, StoreConfig, SubmissionConfig},
    router::create_router,
    state::build_app_state_with_store,
};
use technews_test_utils::{init_tracing, MockContentStore};
use tokio::{net::TcpListener, task::JoinHandle};
use wiremock::MockServer;

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub store: MockContentStore,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the server reading feeds from the given paths on the mock server.
    pub async fn spawn(feed_paths: &[&str]) -> Result<Self> {
        Self::spawn_with(feed_paths, MockContentStore::new(), Duration::from_secs(60)).await
    }

    pub async fn spawn_with(
        feed_paths: &[&str],
        store: MockContentStore,
        reset_after: Duration,
    ) -> Result<Self> {
        init_tracing();

        let mock_server = MockServer::start().await;
        let config = AppConfig {
            port: 0,
            feeds: FeedConfig {
                urls: feed_paths
                    .iter()
                    .map(|path| format!("{}{path}", mock_server.uri()))
                    .collect(),
                ..FeedConfig::default()
            },
            store: StoreConfig::default(),
            submission: SubmissionConfig {
                reset_after_ms: u64::try_from(reset_after.as_millis())?,
            },
            markup: Default::default(),
        };
        let app_state = build_app_state_with_store(config, Arc::new(store.clone()))?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = create_router(app_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            store,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.address)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
