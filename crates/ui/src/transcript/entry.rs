use super::lifecycle::StreamingState;
use chrono::{DateTime, Utc};
use parley_session::{TodoItem, ToolArgs};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier of a turn, assigned at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnId(Uuid);

impl TurnId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TurnId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The user's side of a turn; immutable once created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMessage {
    pub id: String,
    pub text: String,
}

/// A tool invocation and, once it arrives, its correlated result
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallEntry {
    pub id: String,
    pub name: String,
    pub args: ToolArgs,
    pub result: Option<String>,
}

impl ToolCallEntry {
    pub fn is_pending(&self) -> bool {
        self.result.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalOutcome {
    pub approved: bool,
}

/// A pending or answered approval request
#[derive(Debug, Clone, PartialEq)]
pub struct ApprovalItem {
    pub id: String,
    pub tool_name: String,
    pub args: ToolArgs,
    pub resolved: Option<ApprovalOutcome>,
}

impl ApprovalItem {
    pub fn is_pending(&self) -> bool {
        self.resolved.is_none()
    }
}

/// The agent's in-progress or completed response
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssistantEntry {
    pub reasoning: String,
    pub content: String,
    pub tool_calls: Vec<ToolCallEntry>,
    pub streaming_state: StreamingState,
    /// Characters received while the draft stream was running; never shown as content
    pub interim_char_count: usize,
}

impl AssistantEntry {
    pub fn is_done(&self) -> bool {
        self.streaming_state.is_done()
    }

    /// Nothing visible has arrived yet
    pub fn is_blank(&self) -> bool {
        self.reasoning.is_empty() && self.content.is_empty() && self.tool_calls.is_empty()
    }

    pub fn tool_call(&self, id: &str) -> Option<&ToolCallEntry> {
        self.tool_calls.iter().find(|call| call.id == id)
    }

    pub(super) fn tool_call_mut(&mut self, id: &str) -> Option<&mut ToolCallEntry> {
        self.tool_calls.iter_mut().find(|call| call.id == id)
    }
}

/// One user message and the agent's response to it
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub id: TurnId,
    pub created_at: DateTime<Utc>,
    pub user: UserMessage,
    pub assistant: AssistantEntry,
    /// Latest todo snapshot; replaced wholesale on every update
    pub todo_items: Vec<TodoItem>,
    pub approval_item: Option<ApprovalItem>,
    pub impossible: Option<String>,
}

impl Turn {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: TurnId::new(),
            created_at: Utc::now(),
            user: UserMessage { id: Uuid::new_v4().to_string(), text: text.into() },
            assistant: AssistantEntry::default(),
            todo_items: Vec::new(),
            approval_item: None,
            impossible: None,
        }
    }

    /// Unresolved approval awaiting the user's answer, if any
    pub fn pending_approval(&self) -> Option<&ApprovalItem> {
        self.approval_item.as_ref().filter(|item| item.is_pending())
    }

    /// `(closed, total)` for the current todo snapshot
    pub fn todo_progress(&self) -> (usize, usize) {
        let closed = self.todo_items.iter().filter(|item| item.is_closed()).count();
        (closed, self.todo_items.len())
    }
}
