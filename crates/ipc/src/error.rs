//! Error types for paint protocol encoding and decoding.

/// Errors raised while encoding, decoding or validating protocol messages.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    #[error("Failed to (de)serialize message: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid message format: {0}")]
    InvalidFormat(String),

    #[error("Flat coordinate list has {0} values, expected a multiple of 3")]
    RaggedCoordinates(usize),
}
