//! Error types shared across Overcut crates.

/// Top-level error type for Overcut operations.
///
/// `Precondition` and `Transport` are always surfaced to the caller;
/// validation problems in overlay timing are clamped at the store and
/// never reach this type, and protocol violations in the job status
/// stream are logged and dropped rather than raised.
#[derive(Debug, thiserror::Error)]
pub enum OvercutError {
    #[error("Precondition failed: {message}")]
    Precondition { message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Session error: {message}")]
    Session { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using OvercutError.
pub type OvercutResult<T> = Result<T, OvercutError>;

impl OvercutError {
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition {
            message: msg.into(),
        }
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport {
            message: msg.into(),
        }
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode {
            message: msg.into(),
        }
    }

    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this error should abort a status-polling loop immediately
    /// instead of being retried as a transient fault.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition { .. })
    }
}
