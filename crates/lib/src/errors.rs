use thiserror::Error;

/// Errors raised while persisting a content item.
///
/// Every variant is a failed submission from the user's point of view; the
/// distinction only matters for logging and for the message shown inline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
    #[error("Failed to reach the content store: {0}")]
    Request(String),
    #[error("Content store returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Content store rejected the record: {0}")]
    Rejected(String),
    #[error("Failed to decode the content store response: {0}")]
    Deserialization(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Deserialization(err.to_string())
        } else {
            StoreError::Request(err.to_string())
        }
    }
}
