use thiserror::Error;

/// Errors raised while converting state records to or from their persisted form
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Persisted state has no KEY field")]
    MissingKey,
    #[error("Failed to decode key: {0}")]
    KeyDecode(String),
    #[error("Failed to encode key: {0}")]
    KeyEncode(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
