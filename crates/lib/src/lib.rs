//! # technews
//!
//! Turns stories written by language models into canonical content records and
//! manages their preview and submission.
//!
//! A model is asked for tech news in one of two formats (see
//! [`parser::ResponseFormat`]); its answer is cut into records by the
//! [`parser::RecordParser`], completed by the [`normalizer::Normalizer`], and
//! placed on a [`board::ContentBoard`] where each item can be previewed in the
//! shared [`modal`] overlay and persisted through its
//! [`submission::SubmissionController`].

pub mod board;
pub mod citations;
pub mod constants;
pub mod errors;
pub mod modal;
pub mod normalizer;
pub mod parser;
pub mod providers;
pub mod submission;
pub mod types;

pub use board::{BoundItem, ContentBoard, PreviewTrigger};
pub use citations::CitationRegistry;
pub use errors::StoreError;
pub use modal::{ModalEvent, ModalHandle, ModalHost, PreviewModal};
pub use normalizer::Normalizer;
pub use parser::{MarkupSchema, RecordParser, ResponseFormat};
pub use providers::{
    model::ModelResponse,
    store::{http::HttpContentStore, ContentStore},
};
pub use submission::{SubmissionController, SubmissionState, SubmitOutcome};
pub use types::{ContentItem, ContentKind};
