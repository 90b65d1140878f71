/// Convenience result type used across the crate.
pub type CakeResult<T> = Result<T, CakeError>;

/// Everything that can go wrong outside the happy path.
///
/// None of these are fatal to a session: the store falls back to the default
/// layout and the page keeps working without a microphone.
#[derive(thiserror::Error, Debug)]
pub enum CakeError {
    /// The key-value store refused a read or write.
    #[error("storage error: {0}")]
    Storage(String),

    /// Persisted JSON could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Microphone access was denied or the stream could not be wired up.
    #[error("microphone error: {0}")]
    Microphone(String),

    /// The browser lacks a capability we need.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl CakeError {
    /// Build a [`CakeError::Storage`] value.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Build a [`CakeError::Microphone`] value.
    pub fn microphone(msg: impl Into<String>) -> Self {
        Self::Microphone(msg.into())
    }

    /// Build a [`CakeError::Unsupported`] value.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }
}
