//! # Shared Constants
//!
//! Defaults and labels shared by the parsers, the normalizer and the
//! submission controls.

use std::time::Duration;

/// Title used when a record carries no usable heading.
pub const UNTITLED: &str = "Untitled";

/// Source name used when it cannot be derived from the source URL.
pub const UNKNOWN_SOURCE: &str = "Unknown";

/// How long a finished submission shows its outcome before it can be retried.
pub const DEFAULT_RESET_AFTER: Duration = Duration::from_secs(2);

/// Metadata key holding the 1-based citation number of a record.
pub const METADATA_CITATION_INDEX: &str = "citation_index";

/// Metadata key holding the citation registry snapshot used to resolve a record.
pub const METADATA_CITATIONS: &str = "citations";

/// Labels shown on the submission control for each state.
pub const LABEL_IDLE: &str = "Add to Database";
pub const LABEL_SUBMITTING: &str = "Adding...";
pub const LABEL_SUCCEEDED: &str = "Added!";
pub const LABEL_FAILED: &str = "Failed - Retry";

/// Upper bound on a single content store request, connect through body.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(15);
