//! Errors raised while reading, writing or encoding values

#[derive(Debug, thiserror::Error)]
pub enum TfplugError {
    #[error("failed to encode value: {0}")]
    EncodingError(String),

    #[error("failed to decode value: {0}")]
    DecodingError(String),

    #[error("expected {expected}, found {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("attribute '{0}' not found")]
    AttributeNotFound(String),

    #[error("invalid attribute path: {0}")]
    InvalidPath(String),
}

pub type Result<T> = std::result::Result<T, TfplugError>;
