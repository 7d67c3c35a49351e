//! Content API errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Content API returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Cursor does not point at the content API: {0}")]
    ForeignCursor(String),

    #[error("Repository has no master ref")]
    MissingRef,
}

pub type Result<T> = std::result::Result<T, ApiError>;
