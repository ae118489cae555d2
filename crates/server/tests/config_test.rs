//! # Configuration Tests
//!
//! Checks the layering of defaults, the YAML file (with `${VAR}`
//! substitution) and environment overrides.

use std::env;
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;
use technews_server::config::{get_config, ConfigError};
use tempfile::NamedTempFile;

// Environment variables are process-global, so tests touching them run one
// at a time.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env_vars() {
    for var in [
        "PORT",
        "TECHNEWS_PORT",
        "TECHNEWS_STORE__API_URL",
        "TECHNEWS_STORE__API_KEY",
        "TECHNEWS_STORE__TIMEOUT_MS",
        "TECHNEWS_SUBMISSION__RESET_AFTER_MS",
        "TECHNEWS_FEEDS__URLS",
        "TECHNEWS_TEST_STORE_KEY",
    ] {
        env::remove_var(var);
    }
}

fn yaml_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_get_config_defaults() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env_vars();
    let file = yaml_file("{}\n");

    let config = get_config(file.path().to_str()).expect("Configuration should load");

    assert_eq!(config.port, 5002);
    assert_eq!(config.feeds.urls.len(), 3);
    assert_eq!(config.feeds.per_feed_limit, 20);
    assert_eq!(config.feeds.max_stories, 100);
    assert_eq!(config.feeds.description_limit, 300);
    assert_eq!(config.submission.reset_after(), Duration::from_secs(2));
    assert_eq!(config.markup.item, ".news-item");
    assert!(config.store.api_key.is_none());
    assert_eq!(config.store.timeout(), Duration::from_secs(15));
}

#[test]
fn test_yaml_file_with_substitution() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env_vars();
    env::set_var("TECHNEWS_TEST_STORE_KEY", "from-env");
    let file = yaml_file(
        r#"
port: 7070
feeds:
  urls:
    - "https://example.com/feed.xml"
  max_stories: 10
store:
  api_url: "https://db.example/rest/v1/content"
  api_key: "${TECHNEWS_TEST_STORE_KEY}"
markup:
  item: "article"
"#,
    );

    let config = get_config(file.path().to_str()).expect("Configuration should load");

    assert_eq!(config.port, 7070);
    assert_eq!(config.feeds.urls, vec!["https://example.com/feed.xml".to_string()]);
    assert_eq!(config.feeds.max_stories, 10);
    assert_eq!(config.feeds.per_feed_limit, 20);
    assert_eq!(config.store.api_url, "https://db.example/rest/v1/content");
    assert_eq!(config.store.api_key.as_deref(), Some("from-env"));
    assert_eq!(config.markup.item, "article");
    assert_eq!(config.markup.source, ".source");
    clear_env_vars();
}

#[test]
fn test_environment_overrides() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env_vars();
    env::set_var("PORT", "9999");
    env::set_var("TECHNEWS_SUBMISSION__RESET_AFTER_MS", "500");
    env::set_var("TECHNEWS_STORE__TIMEOUT_MS", "2500");
    env::set_var("TECHNEWS_STORE__API_URL", "http://localhost:4000/content");
    env::set_var(
        "TECHNEWS_FEEDS__URLS",
        "http://a.example/rss,http://b.example/rss",
    );
    let file = yaml_file("port: 7070\n");

    let config = get_config(file.path().to_str()).expect("Configuration should load");

    assert_eq!(config.port, 9999);
    assert_eq!(config.submission.reset_after(), Duration::from_millis(500));
    assert_eq!(config.store.api_url, "http://localhost:4000/content");
    assert_eq!(config.store.timeout(), Duration::from_millis(2500));
    assert_eq!(
        config.feeds.urls,
        vec![
            "http://a.example/rss".to_string(),
            "http://b.example/rss".to_string()
        ]
    );
    clear_env_vars();
}

#[test]
fn test_missing_override_file() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env_vars();

    let result = get_config(Some("/definitely/not/here/config.yml"));

    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}
