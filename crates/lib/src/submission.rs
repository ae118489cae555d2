//! # Submission Controller
//!
//! Each rendered content item owns one controller. It moves through
//! `Idle -> Submitting -> Succeeded | Failed -> Idle`, issues exactly one
//! store call per accepted submission, and ignores submissions made while a
//! previous one is in flight or still showing its outcome.

use crate::{
    constants::{
        DEFAULT_RESET_AFTER, LABEL_FAILED, LABEL_IDLE, LABEL_SUBMITTING, LABEL_SUCCEEDED,
    },
    errors::StoreError,
    providers::store::ContentStore,
    types::ContentItem,
};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Where a single item's submission currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
    Succeeded,
    /// Holds the message shown next to the control.
    Failed(String),
}

impl SubmissionState {
    /// Text for the submission control.
    pub fn label(&self) -> &'static str {
        match self {
            SubmissionState::Idle => LABEL_IDLE,
            SubmissionState::Submitting => LABEL_SUBMITTING,
            SubmissionState::Succeeded => LABEL_SUCCEEDED,
            SubmissionState::Failed(_) => LABEL_FAILED,
        }
    }

    /// The control only accepts clicks while idle.
    pub fn is_enabled(&self) -> bool {
        matches!(self, SubmissionState::Idle)
    }
}

/// What a call to [`SubmissionController::submit`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The controller was not idle; nothing was sent.
    Ignored,
    /// The store accepted the record and returned this payload.
    Succeeded(Value),
    /// The store call failed.
    Failed(StoreError),
}

/// Single-flight submission of one content item.
#[derive(Debug, Clone)]
pub struct SubmissionController {
    item: Arc<ContentItem>,
    store: Arc<dyn ContentStore>,
    state: Arc<Mutex<SubmissionState>>,
    reset_after: Duration,
}

impl SubmissionController {
    pub fn new(item: Arc<ContentItem>, store: Arc<dyn ContentStore>) -> Self {
        Self {
            item,
            store,
            state: Arc::new(Mutex::new(SubmissionState::Idle)),
            reset_after: DEFAULT_RESET_AFTER,
        }
    }

    /// Changes how long the outcome stays visible before the control resets.
    pub fn with_reset_after(mut self, reset_after: Duration) -> Self {
        self.reset_after = reset_after;
        self
    }

    pub fn item(&self) -> &ContentItem {
        &self.item
    }

    pub fn state(&self) -> SubmissionState {
        self.lock().clone()
    }

    pub fn label(&self) -> &'static str {
        self.lock().label()
    }

    pub fn is_enabled(&self) -> bool {
        self.lock().is_enabled()
    }

    fn lock(&self) -> MutexGuard<'_, SubmissionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Persists the item unless a submission is already in progress or its
    /// outcome is still displayed.
    ///
    /// The `Idle -> Submitting` check and transition happen under one lock, so
    /// concurrent callers cannot both get through. Once the store call settles,
    /// the outcome is kept for the reset delay and the controller then returns
    /// to `Idle` on its own. There is no automatic retry.
    ///
    /// The store call runs on its own task: dropping the returned future
    /// detaches from the call without cancelling it, and the state still moves
    /// on to its outcome and back to `Idle`.
    pub async fn submit(&self) -> SubmitOutcome {
        {
            let mut state = self.lock();
            if *state != SubmissionState::Idle {
                debug!(title = self.item.title(), state = ?*state, "Ignoring submit");
                return SubmitOutcome::Ignored;
            }
            *state = SubmissionState::Submitting;
        }

        info!(title = self.item.title(), kind = %self.item.kind(), "Submitting content item");
        let item = Arc::clone(&self.item);
        let store = Arc::clone(&self.store);
        let state = Arc::clone(&self.state);
        let reset_after = self.reset_after;
        let task = tokio::spawn(async move {
            let (next, outcome) = match store.create_record(&item).await {
                Ok(data) => {
                    info!(title = item.title(), "Content item stored");
                    (SubmissionState::Succeeded, SubmitOutcome::Succeeded(data))
                }
                Err(e) => {
                    warn!(title = item.title(), error = %e, "Content item submission failed");
                    (
                        SubmissionState::Failed(e.to_string()),
                        SubmitOutcome::Failed(e),
                    )
                }
            };
            *state.lock().unwrap_or_else(PoisonError::into_inner) = next;
            schedule_reset(state, reset_after);
            outcome
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                // The store implementation panicked; the task never recorded an outcome.
                error!(title = self.item.title(), error = %e, "Submission task failed");
                let err = StoreError::Request(format!("submission task failed: {e}"));
                *self.lock() = SubmissionState::Failed(err.to_string());
                schedule_reset(Arc::clone(&self.state), self.reset_after);
                SubmitOutcome::Failed(err)
            }
        }
    }
}

/// Returns a finished controller to `Idle` once `delay` has passed.
fn schedule_reset(state: Arc<Mutex<SubmissionState>>, delay: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(
            *state,
            SubmissionState::Succeeded | SubmissionState::Failed(_)
        ) {
            *state = SubmissionState::Idle;
        }
    });
}
