//! # Route Handlers
//!
//! The root and health endpoints, the RSS feed endpoint, and the endpoints
//! that load a model response onto the board and drive the preview and
//! submission controls of its items.

use super::{errors::AppError, state::AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use technews::{
    BoundItem, ContentItem, ContentKind, ModelResponse, Normalizer, PreviewModal, ResponseFormat,
    SubmissionController, SubmitOutcome,
};
use tracing::info;

// --- API Payloads ---

/// The request body for `/api/parse`.
#[derive(Deserialize)]
pub struct ParseRequest {
    /// The format the model was asked to answer in.
    pub format: ResponseFormat,
    /// The payload returned by the model-query collaborator.
    pub response: ModelResponse,
    #[serde(default)]
    pub kind: Option<ContentKind>,
    /// Id of the model that answered, kept in each item's metadata.
    #[serde(default)]
    pub model: Option<String>,
}

/// One item on the board, with the current state of its submission control.
#[derive(Serialize, Debug)]
pub struct BoardItem {
    pub index: usize,
    pub item: ContentItem,
    pub label: String,
    pub enabled: bool,
}

impl BoardItem {
    fn from_bound(index: usize, bound: &BoundItem) -> Self {
        Self {
            index,
            item: bound.item.as_ref().clone(),
            label: bound.submission.label().to_string(),
            enabled: bound.submission.is_enabled(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct BoardResponse {
    pub items: Vec<BoardItem>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PreviewResponse {
    pub visible: bool,
    pub scroll_locked: bool,
    pub body: Option<String>,
}

impl From<PreviewModal> for PreviewResponse {
    fn from(modal: PreviewModal) -> Self {
        Self {
            visible: modal.is_visible(),
            scroll_locked: modal.is_scroll_locked(),
            body: modal.body().map(str::to_string),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmitResponse {
    Ignored { label: String },
    Succeeded { label: String, data: Value },
    Failed { label: String, error: String },
}

// --- Handlers ---

/// The handler for the root (`/`) endpoint.
pub async fn root() -> &'static str {
    "technews server is running."
}

/// The handler for the health check (`/health`) endpoint.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Collects the configured feeds and returns their stories as content items.
pub async fn rss_feed_handler(State(app_state): State<AppState>) -> Json<Vec<ContentItem>> {
    let items: Vec<ContentItem> = app_state
        .collector
        .collect()
        .await
        .into_iter()
        .map(|story| story.into_content_item())
        .collect();
    info!("Serving {} RSS items", items.len());
    Json(items)
}

/// Parses a model response and replaces the board with the result. A response
/// carrying an error leaves an empty board.
pub async fn parse_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<ParseRequest>,
) -> Json<BoardResponse> {
    info!(format = ?payload.format, model = ?payload.model, "Received parse request");

    let mut normalizer = Normalizer::new(payload.kind.unwrap_or(ContentKind::AiApiResponse));
    if let Some(model) = payload.model {
        normalizer = normalizer.with_metadata("model", model);
    }

    let mut board = app_state.board.lock().await;
    let items = board
        .load_response(payload.response, payload.format, &normalizer)
        .iter()
        .enumerate()
        .map(|(index, bound)| BoardItem::from_bound(index, bound))
        .collect();
    Json(BoardResponse { items })
}

/// Lists the items currently on the board.
pub async fn list_items_handler(State(app_state): State<AppState>) -> Json<BoardResponse> {
    let board = app_state.board.lock().await;
    let items = board
        .items()
        .iter()
        .enumerate()
        .map(|(index, bound)| BoardItem::from_bound(index, bound))
        .collect();
    Json(BoardResponse { items })
}

/// Opens the shared preview on one item.
pub async fn open_preview_handler(
    State(app_state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<PreviewResponse>, AppError> {
    let board = app_state.board.lock().await;
    let bound = board
        .items()
        .get(index)
        .ok_or_else(|| item_not_found(index))?;
    bound.preview.open();
    Ok(Json(board.modal().snapshot().into()))
}

/// The current state of the shared preview.
pub async fn preview_handler(State(app_state): State<AppState>) -> Json<PreviewResponse> {
    let board = app_state.board.lock().await;
    Json(board.modal().snapshot().into())
}

/// Closes the shared preview.
pub async fn close_preview_handler(State(app_state): State<AppState>) -> Json<PreviewResponse> {
    let board = app_state.board.lock().await;
    let modal = board.modal();
    modal.hide();
    Json(modal.snapshot().into())
}

/// Submits one item to the content store through its controller. Repeated
/// submissions while one is in flight or its outcome is displayed are
/// reported as ignored.
pub async fn submit_item_handler(
    State(app_state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<SubmitResponse>, AppError> {
    // Do not hold the board lock across the store call.
    let controller: SubmissionController = {
        let board = app_state.board.lock().await;
        board
            .items()
            .get(index)
            .ok_or_else(|| item_not_found(index))?
            .submission
            .clone()
    };

    let outcome = controller.submit().await;
    let label = controller.label().to_string();
    let response = match outcome {
        SubmitOutcome::Ignored => SubmitResponse::Ignored { label },
        SubmitOutcome::Succeeded(data) => SubmitResponse::Succeeded { label, data },
        SubmitOutcome::Failed(e) => SubmitResponse::Failed {
            label,
            error: e.to_string(),
        },
    };
    Ok(Json(response))
}

fn item_not_found(index: usize) -> AppError {
    AppError::NotFound(format!("No item at index {index}"))
}
