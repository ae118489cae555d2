//! # Preview Modal
//!
//! One overlay per page session shows a read-only preview of a content item
//! before it is submitted. [`ModalHost`] is the only way to obtain it: the
//! overlay is built on first use and every later call hands out a handle to the
//! same instance.

use crate::types::ContentItem;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use technews_html::escape_html;
use tracing::debug;

/// User interactions the overlay reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalEvent {
    /// Click on the dimmed area around the content panel.
    BackdropClick,
    /// Click inside the content panel.
    PanelClick,
    /// Click on the close control.
    CloseClick,
    /// A key press, by its DOM key name (`"Escape"`, `"Enter"`, ...).
    KeyDown(String),
}

/// Observable state of the overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewModal {
    visible: bool,
    scroll_locked: bool,
    body: Option<String>,
}

impl PreviewModal {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether scrolling of the page behind the overlay is disabled.
    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    /// The rendered preview, if any item has been shown.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    fn show(&mut self, item: &ContentItem) {
        self.body = Some(render_preview(item));
        self.visible = true;
        self.scroll_locked = true;
    }

    fn hide(&mut self) {
        if !self.visible {
            return;
        }
        self.visible = false;
        self.scroll_locked = false;
    }
}

/// A shared reference to the single overlay.
#[derive(Debug, Clone)]
pub struct ModalHandle {
    inner: Arc<Mutex<PreviewModal>>,
}

impl ModalHandle {
    fn lock(&self) -> MutexGuard<'_, PreviewModal> {
        // The state is plain data, so a poisoned lock still holds a usable value.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces whatever is displayed with `item` and opens the overlay.
    pub fn show(&self, item: &ContentItem) {
        debug!(title = item.title(), "Showing preview");
        self.lock().show(item);
    }

    /// Closes the overlay. Does nothing when it is already closed.
    pub fn hide(&self) {
        self.lock().hide();
    }

    /// Applies a user interaction. Backdrop clicks, the close control and the
    /// Escape key close the overlay; everything else is ignored.
    pub fn handle(&self, event: &ModalEvent) {
        let closes = match event {
            ModalEvent::BackdropClick | ModalEvent::CloseClick => true,
            ModalEvent::KeyDown(key) => key == "Escape",
            ModalEvent::PanelClick => false,
        };
        if closes {
            self.hide();
        }
    }

    /// A copy of the current overlay state.
    pub fn snapshot(&self) -> PreviewModal {
        self.lock().clone()
    }

    /// Whether both handles point at the same overlay.
    pub fn same_instance(&self, other: &ModalHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Guarded factory for the overlay. At most one [`PreviewModal`] is ever
/// constructed per host, however many items ask for it.
#[derive(Debug, Default)]
pub struct ModalHost {
    modal: OnceLock<ModalHandle>,
}

impl ModalHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the overlay, building it on the first call.
    pub fn get(&self) -> ModalHandle {
        self.modal
            .get_or_init(|| {
                debug!("Constructing preview modal");
                ModalHandle {
                    inner: Arc::new(Mutex::new(PreviewModal::default())),
                }
            })
            .clone()
    }

    /// Whether the overlay has been built yet.
    pub fn is_initialized(&self) -> bool {
        self.modal.get().is_some()
    }
}

/// Renders the read-only field list shown inside the overlay.
fn render_preview(item: &ContentItem) -> String {
    let field = |label: &str, value: &str| {
        format!(
            "<div class=\"field\"><label>{label}</label><div class=\"value\">{}</div></div>",
            escape_html(value)
        )
    };

    let mut html = String::from("<div class=\"content-fields\">");
    html.push_str(&field("Title", item.title()));
    html.push_str(&field("Description", item.body()));
    html.push_str(&field("URL", item.source_url()));
    html.push_str(&field("Source", item.source_name()));
    html.push_str(&format!(
        "<div class=\"metadata\">Type: {} | Published: {}</div>",
        item.kind(),
        item.published_at().format("%Y-%m-%d")
    ));
    html.push_str("</div>");
    html
}
