pub mod config;
pub mod error;
pub mod logging;

pub use config::{Config, FileLoggingConfig, ScrollConfig, SessionConfig, TransportKind};
pub use error::{ConfigError, Error, Result};
pub use logging::{LogFormat, init_logging, redact};
