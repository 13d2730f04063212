use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdaptiveError {
    #[error("Label not found: {0}")]
    LabelNotFound(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Malformed fingerprint for label '{label}': {reason}")]
    MalformedFingerprint { label: String, reason: String },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Anyhow error: {0}")]
    AnyhowError(String),
}

pub type Result<T> = std::result::Result<T, AdaptiveError>;

// Convert anyhow::Error to AdaptiveError
impl From<anyhow::Error> for AdaptiveError {
    fn from(err: anyhow::Error) -> Self {
        AdaptiveError::AnyhowError(err.to_string())
    }
}

// A SQLite failure is a persistence failure; the prior record stays intact.
impl From<rusqlite::Error> for AdaptiveError {
    fn from(err: rusqlite::Error) -> Self {
        AdaptiveError::StoreUnavailable(err.to_string())
    }
}
