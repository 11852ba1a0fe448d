use thiserror::Error;

use crate::types::IntentToken;

/// Top-level error type for the Praxis platform.
#[derive(Error, Debug)]
pub enum PraxisError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// An execution was recorded against a token with no declared intent.
    /// This is a caller programming error, never swallowed into a dangling record.
    #[error("No declared intent for token {0}")]
    UnknownIntent(IntentToken),

    #[error("Storage error: {source}")]
    Storage {
        backend: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
