use thiserror::Error;

/// Everything a handler can fail with. Each variant maps onto the wire
/// error shape `{code, message, details: null}`; nothing here is allowed to
/// escape as a panic.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("{0}")]
    InvalidArguments(String),

    #[error("External storage is unavailable")]
    StorageUnavailable,

    /// Image decode failure, carrying the codec's message.
    #[error("{0}")]
    Decode(String),

    /// The share image could not be fetched or decoded.
    #[error("Loaded image failed")]
    ImageLoad,

    #[error("Cannot show share dialog")]
    ShareUnavailable,

    #[error("Share cancelled")]
    Cancelled,

    /// Platform call failure, carrying the underlying message.
    #[error("{0}")]
    Platform(String),
}

impl BridgeError {
    /// Wire error code. The shell only distinguishes user cancellation from
    /// everything else.
    pub fn code(&self) -> &'static str {
        match self {
            BridgeError::Cancelled => "cancelled",
            _ => "error",
        }
    }
}
