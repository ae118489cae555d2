use super::{handlers, state::AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/api/rss-feed", get(handlers::rss_feed_handler))
        .route("/api/parse", post(handlers::parse_handler))
        .route("/api/items", get(handlers::list_items_handler))
        .route(
            "/api/items/{index}/preview",
            post(handlers::open_preview_handler),
        )
        .route(
            "/api/items/{index}/submit",
            post(handlers::submit_item_handler),
        )
        .route(
            "/api/preview",
            get(handlers::preview_handler).delete(handlers::close_preview_handler),
        )
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
