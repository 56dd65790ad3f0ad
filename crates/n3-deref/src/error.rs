//! Dereferencing errors (spec.md §6.2, §7: "log:semantics that cannot
//! dereference its argument fails rather than aborting the run" — this type
//! is what a failed dereference carries up to the caller that decides
//! whether to treat it as a builtin failure or propagate it).

use thiserror::Error;

/// A dereferencing failure.
#[derive(Debug, Error)]
pub enum DerefError {
    /// Reading a `file://` or bare-path IRI failed.
    #[error("failed to read {0}: {1}")]
    Io(String, String),
    /// The HTTP(S) request failed, or returned a non-success status.
    #[error("failed to fetch {0}: {1}")]
    Http(String, String),
    /// The response body could not be decompressed or was not valid UTF-8.
    #[error("failed to decode response body from {0}: {1}")]
    Decode(String, String),
}

/// Result type for dereferencing operations.
pub type DerefResult<T> = Result<T, DerefError>;
