//! Failures surfaced by the client. The `Display` text is what lands in the status line.

use reqwest::StatusCode;
use thiserror::Error;

/// Result type for backend and session operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Please enter a YouTube URL")]
    EmptyUrl,

    #[error("Fetch video info first")]
    NotReady,

    /// `error` field reported by `/info`
    #[error("{0}")]
    Service(String),

    #[error("{0}")]
    Malformed(String),

    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// Status is kept for logs; the message stays generic.
    #[error("Download failed")]
    DownloadFailed { status: StatusCode },

    #[error("could not save file: {0}")]
    Save(#[from] std::io::Error),
}

impl ClientError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}
