//! Wire vocabulary shared with the agent session.
//!
//! Every frame is a JSON object tagged by its `"event"` name with the payload fields beside it,
//! e.g. `{"event":"token","type":"content","text":"Hel"}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool and approval arguments: a mapping of string keys to arbitrary values
pub type ToolArgs = serde_json::Map<String, Value>;

/// Which field of the assistant entry a token belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Private/explanatory text
    Reasoning,
    /// User-visible answer text
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoStatus {
    Open,
    Closed,
}

/// One row of the agent's todo list snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    #[serde(alias = "itemNumber")]
    pub item_number: i64,
    pub text: String,
    pub status: TodoStatus,
}

impl TodoItem {
    pub fn is_closed(&self) -> bool {
        self.status == TodoStatus::Closed
    }
}

/// Events that mutate the transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TranscriptEvent {
    /// Incremental reasoning or content text
    Token {
        #[serde(rename = "type")]
        kind: TokenKind,
        text: String,
    },
    /// The agent starts a throwaway draft
    BeginInterimStream,
    /// The agent starts the real answer
    BeginFinalSummary,
    ToolCall {
        id: String,
        name: String,
        #[serde(default)]
        args: ToolArgs,
    },
    ToolResult {
        id: String,
        result: String,
    },
    /// The response is complete; `content`, when present, is the final answer
    MessageDone {
        #[serde(default)]
        content: Option<String>,
    },
    /// The agent failed; the message is shown in place of the answer
    Error {
        message: String,
    },
    ReportImpossible {
        reason: String,
    },
    TodoListUpdate {
        items: Vec<TodoItem>,
    },
    ApprovalRequest {
        id: String,
        tool_name: String,
        #[serde(default)]
        args: ToolArgs,
    },
    ApprovalResolved {
        id: String,
        approved: bool,
    },
}

impl TranscriptEvent {
    /// Wire name of this event
    pub fn name(&self) -> &'static str {
        match self {
            TranscriptEvent::Token { .. } => "token",
            TranscriptEvent::BeginInterimStream => "begin_interim_stream",
            TranscriptEvent::BeginFinalSummary => "begin_final_summary",
            TranscriptEvent::ToolCall { .. } => "tool_call",
            TranscriptEvent::ToolResult { .. } => "tool_result",
            TranscriptEvent::MessageDone { .. } => "message_done",
            TranscriptEvent::Error { .. } => "error",
            TranscriptEvent::ReportImpossible { .. } => "report_impossible",
            TranscriptEvent::TodoListUpdate { .. } => "todo_list_update",
            TranscriptEvent::ApprovalRequest { .. } => "approval_request",
            TranscriptEvent::ApprovalResolved { .. } => "approval_resolved",
        }
    }

    /// Whether this event ends the assistant's response
    pub fn is_terminal(&self) -> bool {
        matches!(self, TranscriptEvent::MessageDone { .. } | TranscriptEvent::Error { .. })
    }
}

/// Replies to the read-only session introspection actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionInfo {
    Pwd { pwd: String },
    SessionMemoryKeys { keys: Vec<String> },
    SessionMemoryValue { key: String, value: Value },
}

impl SessionInfo {
    /// Wire names handled by this enum rather than [`TranscriptEvent`]
    pub const EVENT_NAMES: &[&str] = &["pwd", "session_memory_keys", "session_memory_value"];
}

/// A decoded inbound frame
#[derive(Debug, Clone, PartialEq)]
pub enum InboundFrame {
    Transcript(TranscriptEvent),
    Info(SessionInfo),
}

/// Everything the client receives from a session, including lifecycle signals raised by the
/// transport itself
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Connected,
    Disconnected,
    Transcript(TranscriptEvent),
    Info(SessionInfo),
}

impl From<InboundFrame> for SessionEvent {
    fn from(frame: InboundFrame) -> Self {
        match frame {
            InboundFrame::Transcript(event) => SessionEvent::Transcript(event),
            InboundFrame::Info(info) => SessionEvent::Info(info),
        }
    }
}

impl From<TranscriptEvent> for SessionEvent {
    fn from(event: TranscriptEvent) -> Self {
        SessionEvent::Transcript(event)
    }
}

impl From<SessionInfo> for SessionEvent {
    fn from(info: SessionInfo) -> Self {
        SessionEvent::Info(info)
    }
}

/// Actions the client sends to the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClientAction {
    UserMessage { text: String },
    ApprovalResponse { id: String, approved: bool },
    GetSessionMemoryKeys,
    GetSessionMemoryValue { key: String },
    GetPwd,
}

impl ClientAction {
    pub fn name(&self) -> &'static str {
        match self {
            ClientAction::UserMessage { .. } => "user_message",
            ClientAction::ApprovalResponse { .. } => "approval_response",
            ClientAction::GetSessionMemoryKeys => "get_session_memory_keys",
            ClientAction::GetSessionMemoryValue { .. } => "get_session_memory_value",
            ClientAction::GetPwd => "get_pwd",
        }
    }
}
