use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for parley-core
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the Parley client
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error for file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Session transport errors surfaced to the binary
    #[error("session error: {0}")]
    Session(String),

    /// Parse/serialization errors
    #[error("parse error: {0}")]
    Parse(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(String),

    /// Unknown transport kind
    #[error("invalid transport: {0}")]
    InvalidTransport(String),

    /// Unknown log format
    #[error("invalid log format: {0}")]
    InvalidLogFormat(String),

    /// Process transport configured without a command
    #[error("session.command must not be empty for the process transport")]
    MissingCommand,

    /// Replay transport configured without a file
    #[error("session.replay_file is required for the replay transport")]
    MissingReplayFile,

    /// Replay file does not exist
    #[error("replay file not found: {0}")]
    ReplayFileNotFound(PathBuf),

    /// Throttle interval must be positive
    #[error("scroll.throttle_ms must be greater than zero")]
    ZeroThrottle,

    /// Home directory could not be resolved
    #[error("could not determine home directory")]
    NoHomeDir,
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::TomlParse(err.to_string())
    }
}
