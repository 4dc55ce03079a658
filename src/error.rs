//! Errors raised while building or sending an upload.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    /// The server answered with a non-success status.
    #[error("Upload rejected {status}: {message}")]
    Rejected {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Failed to read file: {0}")]
    File(#[from] std::io::Error),
}

impl UploadError {
    /// Text shown to the user for this failure.
    ///
    /// A rejection carries the server's own explanation in its body, which is
    /// passed through untouched. Anything else is described locally.
    pub fn server_message(&self) -> String {
        match self {
            UploadError::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
