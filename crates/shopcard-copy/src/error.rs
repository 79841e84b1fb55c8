use shopcard_core::StorageError;
use thiserror::Error;

/// Errors returned while obtaining AI-written copy.
#[derive(Debug, Error)]
pub enum CopyError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {endpoint}")]
    UnexpectedStatus { status: u16, endpoint: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The model answered but produced no usable text.
    #[error("description model returned no text")]
    EmptyResponse,

    #[error("AI request limiter closed")]
    LimiterClosed,

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}
