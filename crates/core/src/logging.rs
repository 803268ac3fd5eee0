//! Logging bootstrap built on the tracing ecosystem.
//!
//! # Environment Variables
//!
//! - `PARLEY_LOG`: Filter directive (like `RUST_LOG`), e.g., `parley_ui=debug`
//! - `PARLEY_LOG_FORMAT`: Output format for stderr: `pretty`, `json`, `compact`
//! - `PARLEY_LOG_DIR`: Directory for file logs (default `~/.parley/logs/`)
//!
//! # Configuration
//!
//! Logging is configured via the `[logging]` section in `config.toml`:
//!
//! ```toml
//! [logging]
//! level = "warn"
//! format = "compact"
//!
//! [logging.file]
//! enabled = true
//! level = "debug"
//! ```
//!
//! While the terminal view owns the screen, stderr output would tear the frame, so the
//! binary turns stderr off with [`LoggingConfig::without_stderr`] and relies on the file layer.

use crate::config::{FileLoggingConfig, LoggingConfig as ConfigLoggingConfig};
use crate::error::{ConfigError, Error};
use std::env;
use std::io;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log output format for stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Pretty, human-readable output with colors
    Pretty,
    /// JSON output (one line per event)
    Json,
    /// Compact, single-line output
    #[default]
    Compact,
}

impl LogFormat {
    /// All available log formats.
    pub const VALUES: &[LogFormat] = &[LogFormat::Pretty, LogFormat::Json, LogFormat::Compact];

    /// Parse a log format from a string.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            "compact" => Some(LogFormat::Compact),
            _ => None,
        }
    }

    /// Get the string representation of this format.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
            LogFormat::Compact => "compact",
        }
    }
}

/// Logging configuration wrapper that bridges config and logging modules.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default filter directive for stderr output.
    pub level: String,
    /// Output format for stderr. `None` means detect from the terminal.
    pub format: Option<LogFormat>,
    /// File logging configuration (optional).
    pub file: Option<FileLoggingConfig>,
    /// Whether to attach the stderr layer at all.
    pub stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_string(), format: None, file: None, stderr: true }
    }
}

impl From<ConfigLoggingConfig> for LoggingConfig {
    fn from(config: ConfigLoggingConfig) -> Self {
        Self {
            level: config.level,
            format: LogFormat::parse_str(&config.format),
            file: if config.file.enabled { Some(config.file) } else { None },
            stderr: true,
        }
    }
}

impl LoggingConfig {
    /// Create a new logging config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log level.
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Enable file logging.
    pub fn with_file_logging(mut self, config: FileLoggingConfig) -> Self {
        self.file = Some(config);
        self
    }

    /// Drop the stderr layer (used while the terminal view is active).
    pub fn without_stderr(mut self) -> Self {
        self.stderr = false;
        self
    }

    /// Build an EnvFilter from this config and environment variables.
    fn build_env_filter(&self) -> EnvFilter {
        let filter = env::var("PARLEY_LOG")
            .ok()
            .or_else(|| env::var("RUST_LOG").ok())
            .unwrap_or_else(|| self.level.clone());

        EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("warn"))
    }

    /// Detect if stderr is a TTY for pretty formatting.
    fn is_tty() -> bool {
        atty::is(atty::Stream::Stderr)
    }

    /// Determine the appropriate format for stderr output.
    fn detect_format(&self) -> LogFormat {
        if let Ok(fmt_str) = env::var("PARLEY_LOG_FORMAT")
            && let Some(fmt) = LogFormat::parse_str(&fmt_str)
        {
            return fmt;
        }

        if let Some(format) = self.format {
            return format;
        }

        if Self::is_tty() { LogFormat::Pretty } else { LogFormat::Compact }
    }

    /// Get the log directory path.
    pub fn log_dir() -> Result<PathBuf, Error> {
        if let Ok(custom_dir) = env::var("PARLEY_LOG_DIR") {
            return Ok(PathBuf::from(custom_dir));
        }

        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".parley").join("logs"))
    }
}

/// Initialize the global tracing subscriber.
///
/// Returns the worker guard of the non-blocking file writer when file logging is enabled;
/// the caller must keep it alive for the lifetime of the process or buffered lines are lost.
pub fn init_logging(config: Option<LoggingConfig>) -> Result<Option<WorkerGuard>, Error> {
    let config = config.unwrap_or_default();
    let format = config.detect_format();

    let stderr_layer = if config.stderr {
        let layer = match format {
            LogFormat::Pretty => fmt::layer().pretty().with_writer(io::stderr).with_ansi(true).boxed(),
            LogFormat::Json => fmt::layer().json().with_writer(io::stderr).boxed(),
            LogFormat::Compact => fmt::layer().compact().with_writer(io::stderr).boxed(),
        };
        Some(layer.with_filter(config.build_env_filter()))
    } else {
        None
    };

    let (file_layer, guard) = match &config.file {
        Some(file_config) => {
            let log_dir = LoggingConfig::log_dir()?;
            std::fs::create_dir_all(&log_dir)?;

            let file_appender = tracing_appender::rolling::daily(log_dir, "parley.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let filter = EnvFilter::try_new(&file_config.level).unwrap_or_else(|_| EnvFilter::new("debug"));
            let layer = fmt::layer().json().with_writer(non_blocking).with_filter(filter);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    Registry::default()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Other(format!("failed to install tracing subscriber: {}", e)))?;

    Ok(guard)
}

/// Truncate long payloads (tool results, arguments) before they reach a log line.
pub fn redact(content: &str, max_chars: usize) -> String {
    let total = content.chars().count();
    if total <= max_chars {
        return content.to_string();
    }

    let mut truncated = content.chars().take(max_chars).collect::<String>();
    truncated.push_str(&format!("... ({} total chars)", total));
    truncated
}
