use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("index API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("vector dimension mismatch: collection is {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("unexpected index response: {0}")]
    InvalidResponse(String),

    #[error("index not configured: {0}")]
    NotConfigured(String),
}
