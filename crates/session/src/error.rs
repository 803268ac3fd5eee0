use thiserror::Error;

/// Errors raised at the session boundary
#[derive(Debug, Error)]
pub enum SessionError {
    /// A frame could not be decoded
    #[error("invalid frame at line {line}: {reason}")]
    Decode { line: usize, reason: String },

    /// An outbound action could not be encoded
    #[error("failed to encode action: {0}")]
    Encode(#[from] serde_json::Error),

    /// The agent process could not be started
    #[error("failed to spawn agent '{program}': {source}")]
    Spawn { program: String, source: std::io::Error },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The other end of the session channel is gone
    #[error("session channel closed")]
    ChannelClosed,
}

impl From<SessionError> for parley_core::Error {
    fn from(err: SessionError) -> Self {
        parley_core::Error::Session(err.to_string())
    }
}
