use model::FilterId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store has no filter with this id.
    #[error("Filter not found: {0}")]
    NotFound(FilterId),

    /// Another filter already uses this label.
    #[error("Filter name already exists: {0}")]
    DuplicateLabel(String),

    /// The store refused the request.
    #[error("Request rejected by the filter store: {0}")]
    Rejected(String),

    /// Non-success status not covered above.
    #[error("Filter store returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Network or protocol failure.
    #[error("Filter store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode filter store response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Invalid filter store configuration: {0}")]
    Config(String),

    #[error("Retry attempts exhausted: {0}")]
    RetriesExhausted(String),
}

impl StoreError {
    /// Transport failures and server-side errors may succeed on retry;
    /// client errors will not.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Transport(err) => !err.is_builder() && !err.is_decode(),
            StoreError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Query request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Query executor returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode query results: {0}")]
    Decode(#[source] serde_json::Error),
}
