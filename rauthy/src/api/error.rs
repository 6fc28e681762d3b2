use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Failed to encode request {method} {path}: {message}")]
    Encode {
        method: String,
        path: String,
        message: String,
    },

    #[error("Failed to execute request {method} {path} (HTTP {status}): {body}")]
    Api {
        method: String,
        path: String,
        status: u16,
        body: String,
    },

    #[error("Failed to decode JSON response {method} {path}: {message}")]
    Decode {
        method: String,
        path: String,
        message: String,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("Request cancelled")]
    Cancelled,
}

impl ApiError {
    /// True when the object does not exist remotely
    pub fn is_not_found(&self) -> bool {
        match self {
            ApiError::NotFound(_) => true,
            ApiError::Api { status, .. } => *status == 404,
            _ => false,
        }
    }
}
