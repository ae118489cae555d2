//! # Content Board
//!
//! The list of items currently on screen. The board owns the per-page context
//! the pipeline needs: the citation registry of the latest model response, the
//! preview overlay host, and the store that submissions go to. Loading a new
//! response replaces the previous list and its controllers entirely.

use crate::{
    citations::CitationRegistry,
    constants::DEFAULT_RESET_AFTER,
    modal::{ModalHandle, ModalHost},
    normalizer::Normalizer,
    parser::{MarkupSchema, RecordParser, ResponseFormat},
    providers::{model::ModelResponse, store::ContentStore},
    submission::SubmissionController,
    types::ContentItem,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Opens the shared overlay on one item.
#[derive(Debug, Clone)]
pub struct PreviewTrigger {
    item: Arc<ContentItem>,
    host: Arc<ModalHost>,
}

impl PreviewTrigger {
    /// Shows the item in the shared overlay, building the overlay on the first
    /// open of the session.
    pub fn open(&self) {
        self.host.get().show(&self.item);
    }
}

/// An item on the board with its two controls.
#[derive(Debug, Clone)]
pub struct BoundItem {
    pub item: Arc<ContentItem>,
    pub preview: PreviewTrigger,
    pub submission: SubmissionController,
}

/// The rendered list plus the context shared by its items.
#[derive(Debug)]
pub struct ContentBoard {
    registry: CitationRegistry,
    modal_host: Arc<ModalHost>,
    store: Arc<dyn ContentStore>,
    markup_schema: MarkupSchema,
    reset_after: Duration,
    items: Vec<BoundItem>,
}

impl ContentBoard {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self {
            registry: CitationRegistry::default(),
            modal_host: Arc::new(ModalHost::new()),
            store,
            markup_schema: MarkupSchema::default(),
            reset_after: DEFAULT_RESET_AFTER,
            items: Vec::new(),
        }
    }

    pub fn with_markup_schema(mut self, schema: MarkupSchema) -> Self {
        self.markup_schema = schema;
        self
    }

    pub fn with_reset_after(mut self, reset_after: Duration) -> Self {
        self.reset_after = reset_after;
        self
    }

    /// Parses a model response in the format the caller asked the model for and
    /// shows the result. The citation registry is replaced by the response's
    /// citations. A response carrying an error clears the board.
    pub fn load_response(
        &mut self,
        response: ModelResponse,
        format: ResponseFormat,
        normalizer: &Normalizer,
    ) -> &[BoundItem] {
        let Some((content, registry)) = response.parse_input() else {
            info!("Model response has nothing to parse; clearing board");
            self.registry = CitationRegistry::default();
            self.items.clear();
            return &self.items;
        };

        self.registry = registry;
        let parser = RecordParser::for_format(format, &self.markup_schema);
        let items = parser.parse(&content, &self.registry, normalizer);
        info!(
            format = ?format,
            citations = self.registry.len(),
            items = items.len(),
            "Loaded model response"
        );
        self.load_items(items)
    }

    /// Shows already-normalized items, e.g. from a feed.
    pub fn load_items(&mut self, items: Vec<ContentItem>) -> &[BoundItem] {
        self.items = items
            .into_iter()
            .map(|item| {
                let item = Arc::new(item);
                BoundItem {
                    preview: PreviewTrigger {
                        item: Arc::clone(&item),
                        host: Arc::clone(&self.modal_host),
                    },
                    submission: SubmissionController::new(
                        Arc::clone(&item),
                        Arc::clone(&self.store),
                    )
                    .with_reset_after(self.reset_after),
                    item,
                }
            })
            .collect();
        &self.items
    }

    pub fn items(&self) -> &[BoundItem] {
        &self.items
    }

    /// Removes every item; their controllers go with them.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn registry(&self) -> &CitationRegistry {
        &self.registry
    }

    /// The shared overlay.
    pub fn modal(&self) -> ModalHandle {
        self.modal_host.get()
    }

    /// Whether any preview has been opened yet.
    pub fn is_modal_initialized(&self) -> bool {
        self.modal_host.is_initialized()
    }
}
