//! Failure taxonomy for calls against the demo API

use thiserror::Error;

/// Why a request to the demo API produced nothing usable
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never completed (connection refused, timeout, reset)
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// A body arrived but was not the JSON we expected
    #[error("malformed response from {path}: {reason}")]
    Malformed { path: String, reason: String },

    /// Non-success status whose body was not JSON
    #[error("API error ({status}) from {path}: {body}")]
    Status {
        path: String,
        status: u16,
        body: String,
    },

    /// The server answered with `success: false`
    #[error("{0}")]
    Rejected(String),

    /// The path could not be joined onto the base URL
    #[error("invalid path {path}: {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: url::ParseError,
    },
}

impl FetchError {
    /// Short label used for metrics and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport { .. } => "transport",
            FetchError::Malformed { .. } => "malformed",
            FetchError::Status { .. } => "status",
            FetchError::Rejected(_) => "rejected",
            FetchError::InvalidPath { .. } => "invalid_path",
        }
    }
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;
