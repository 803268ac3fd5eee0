use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// How the client reaches the agent session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransportKind {
    /// Spawn the agent as a child process and speak JSONL over stdio (default)
    #[default]
    Process,
    /// Play back a recorded JSONL frame file
    Replay,
}

impl TransportKind {
    pub const VALUES: &[TransportKind] = &[TransportKind::Process, TransportKind::Replay];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Process => "process",
            TransportKind::Replay => "replay",
        }
    }
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TransportKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "process" => Ok(TransportKind::Process),
            "replay" => Ok(TransportKind::Replay),
            _ => Err(ConfigError::InvalidTransport(s.to_string()).into()),
        }
    }
}

/// `[session]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Transport used to reach the agent
    pub transport: TransportKind,
    /// Agent program and arguments for the process transport
    pub command: Vec<String>,
    /// Working directory for the agent process (defaults to the current directory)
    pub cwd: Option<PathBuf>,
    /// Recording played by the replay transport
    pub replay_file: Option<PathBuf>,
    /// Delay between replayed frames
    pub replay_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::default(),
            command: Vec::new(),
            cwd: None,
            replay_file: None,
            replay_delay_ms: 30,
        }
    }
}

/// `[scroll]` section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollConfig {
    /// Rows from the bottom within which the view counts as "at bottom"
    pub bottom_threshold: u32,
    /// Minimum interval between scroll-to-bottom executions
    pub throttle_ms: u64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self { bottom_threshold: 3, throttle_ms: 80 }
    }
}

/// `[logging.file]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileLoggingConfig {
    pub enabled: bool,
    pub level: String,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self { enabled: false, level: "debug".to_string() }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive for stderr
    pub level: String,
    /// `pretty`, `json` or `compact`
    pub format: String,
    pub file: FileLoggingConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_string(), format: "compact".to_string(), file: FileLoggingConfig::default() }
    }
}

/// Root configuration structure for config.toml
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub session: SessionConfig,
    pub scroll: ScrollConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml_str).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Default config location: `~/.parley/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".parley").join("config.toml"))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.scroll.throttle_ms == 0 {
            return Err(ConfigError::ZeroThrottle.into());
        }

        if crate::logging::LogFormat::parse_str(&self.logging.format).is_none() {
            return Err(ConfigError::InvalidLogFormat(self.logging.format.clone()).into());
        }

        match self.session.transport {
            TransportKind::Process => {
                if self.session.command.iter().all(|part| part.trim().is_empty()) {
                    return Err(ConfigError::MissingCommand.into());
                }
            }
            TransportKind::Replay => match &self.session.replay_file {
                None => return Err(ConfigError::MissingReplayFile.into()),
                Some(path) if !path.exists() => {
                    return Err(ConfigError::ReplayFileNotFound(path.clone()).into());
                }
                Some(_) => {}
            },
        }

        Ok(())
    }

    /// Get example configuration (as a string)
    pub fn example() -> &'static str {
        r#"# Parley Configuration Example
# Copy this file to ~/.parley/config.toml and customize as needed

[session]
# Transport: "process" (spawn the agent, JSONL over stdio) or "replay"
transport = "process"
# Agent program and arguments
command = ["python", "-m", "agent"]
# Working directory for the agent (optional)
# cwd = "/path/to/project"
# Recording for the replay transport
# replay_file = "/path/to/session.jsonl"
replay_delay_ms = 30

[scroll]
# Rows from the bottom that still count as "following"
bottom_threshold = 3
# Minimum interval between autoscroll writes
throttle_ms = 80

[logging]
level = "warn"
# Output format: "pretty", "json" or "compact"
format = "compact"

[logging.file]
enabled = false
level = "debug"
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::str::FromStr;

    #[test]
    fn test_transport_kind_values() {
        assert_eq!(TransportKind::Process.as_str(), "process");
        assert_eq!(TransportKind::Replay.as_str(), "replay");
        assert_eq!(TransportKind::VALUES.len(), 2);
    }

    #[test]
    fn test_transport_kind_from_str() {
        assert_eq!(TransportKind::from_str("PROCESS").unwrap(), TransportKind::Process);
        assert_eq!(TransportKind::from_str("replay").unwrap(), TransportKind::Replay);
        assert!(TransportKind::from_str("socket").is_err());
    }

    #[test]
    fn test_scroll_defaults() {
        let scroll = ScrollConfig::default();
        assert_eq!(scroll.bottom_threshold, 3);
        assert_eq!(scroll.throttle_ms, 80);
    }

    #[test]
    fn test_config_from_toml_str() {
        let toml = r#"
[session]
transport = "process"
command = ["agent", "--stdio"]

[scroll]
bottom_threshold = 10
throttle_ms = 120

[logging]
level = "info"
format = "json"
"#;

        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.session.transport, TransportKind::Process);
        assert_eq!(config.session.command, vec!["agent".to_string(), "--stdio".to_string()]);
        assert_eq!(config.session.replay_delay_ms, 30);
        assert_eq!(config.scroll.bottom_threshold, 10);
        assert_eq!(config.scroll.throttle_ms, 120);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.file.enabled);
    }

    #[test]
    fn test_config_scroll_section_optional() {
        let toml = r#"
[session]
command = ["agent"]
"#;
        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.scroll, ScrollConfig::default());
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        let toml = r#"
[session]
command = ["agent"]
colour = "blue"
"#;
        let result = Config::from_toml_str(toml);
        assert!(result.unwrap_err().to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_config_validation_missing_command() {
        let result = Config::from_toml_str("[session]\ntransport = \"process\"\n");
        assert!(result.unwrap_err().to_string().contains("session.command"));
    }

    #[test]
    fn test_config_validation_zero_throttle() {
        let toml = r#"
[session]
command = ["agent"]

[scroll]
throttle_ms = 0
"#;
        let result = Config::from_toml_str(toml);
        assert!(result.unwrap_err().to_string().contains("throttle_ms"));
    }

    #[test]
    fn test_config_validation_bad_log_format() {
        let toml = r#"
[session]
command = ["agent"]

[logging]
format = "sparkly"
"#;
        let result = Config::from_toml_str(toml);
        assert!(result.unwrap_err().to_string().contains("invalid log format: sparkly"));
    }

    #[test]
    fn test_config_replay_requires_file() {
        let result = Config::from_toml_str("[session]\ntransport = \"replay\"\n");
        assert!(result.unwrap_err().to_string().contains("replay_file is required"));

        let result = Config::from_toml_str(
            "[session]\ntransport = \"replay\"\nreplay_file = \"/definitely/not/here.jsonl\"\n",
        );
        assert!(result.unwrap_err().to_string().contains("replay file not found"));
    }

    #[test]
    fn test_config_replay_with_existing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{\"event\":\"begin_final_summary\"}}").unwrap();

        let toml = format!(
            "[session]\ntransport = \"replay\"\nreplay_file = {:?}\nreplay_delay_ms = 0\n",
            file.path().display().to_string()
        );
        let config = Config::from_toml_str(&toml).unwrap();
        assert_eq!(config.session.transport, TransportKind::Replay);
        assert_eq!(config.session.replay_file.as_deref(), Some(file.path()));
        assert_eq!(config.session.replay_delay_ms, 0);
    }

    #[test]
    fn test_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[session]\ncommand = [\"agent\"]\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.session.command, vec!["agent".to_string()]);
    }

    #[test]
    fn test_config_example_parses() {
        let config = Config::from_toml_str(Config::example()).unwrap();
        assert_eq!(config.session.command, vec!["python", "-m", "agent"]);
        assert_eq!(config.scroll, ScrollConfig::default());
    }
}
