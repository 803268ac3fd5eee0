use parley_session::SessionInfo;
use serde_json::Value;
use std::collections::BTreeMap;

/// Connection to the agent session as the UI sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    Disconnected,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Disconnected => "disconnected",
        }
    }

    pub fn is_connected(&self) -> bool {
        *self == ConnectionStatus::Connected
    }
}

/// Session introspection results, outside the transcript
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub status: ConnectionStatus,
    pub pwd: Option<String>,
    /// `None` until the keys have been fetched once
    pub memory_keys: Option<Vec<String>>,
    pub memory_values: BTreeMap<String, Value>,
    /// Short status shown in the footer
    pub notice: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_info(&mut self, info: SessionInfo) {
        match info {
            SessionInfo::Pwd { pwd } => {
                self.notice = Some(format!("pwd: {}", pwd));
                self.pwd = Some(pwd);
            }
            SessionInfo::SessionMemoryKeys { keys } => {
                self.notice = Some(format!("{} memory key(s)", keys.len()));
                self.memory_values.retain(|key, _| keys.contains(key));
                self.memory_keys = Some(keys);
            }
            SessionInfo::SessionMemoryValue { key, value } => {
                self.notice = Some(format!("memory[{}] = {}", key, value));
                self.memory_values.insert(key, value);
            }
        }
    }

    pub fn set_status(&mut self, status: ConnectionStatus) {
        self.status = status;
        self.notice = Some(status.as_str().to_string());
    }
}
