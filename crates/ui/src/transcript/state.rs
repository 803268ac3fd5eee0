use super::entry::{ApprovalItem, ApprovalOutcome, ToolCallEntry, Turn, TurnId};
use super::lifecycle::{StreamTransition, TokenRoute};
use parley_session::{TokenKind, TranscriptEvent};

/// Whether [`Transcript::apply`] changed anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Changed,
    Ignored,
}

impl Applied {
    pub fn changed(self) -> bool {
        self == Applied::Changed
    }
}

/// Transcript holds the ordered, append-only sequence of turns
///
/// Inbound events never carry a turn id. They are folded into the *active* turn, which is
/// set by [`Transcript::begin_turn`] and cleared when that turn's response reaches `Done`.
/// With no active turn every event is a silent no-op, so earlier turns are immutable history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    turns: Vec<Turn>,
    active: Option<TurnId>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new turn for a user message and make it the active turn
    ///
    /// A turn that was still streaming is sealed as history.
    pub fn begin_turn(&mut self, text: impl Into<String>) -> TurnId {
        if let Some(previous) = self.active.take() {
            tracing::debug!(turn = %previous, "sealing unfinished turn");
        }

        let turn = Turn::new(text);
        let id = turn.id;
        self.turns.push(turn);
        self.active = Some(id);
        id
    }

    /// Fold one inbound event into the active turn
    ///
    /// Total over its input: precondition violations (no active turn, unknown tool call id,
    /// mismatched approval id) leave the transcript untouched and return `Applied::Ignored`.
    pub fn apply(&mut self, event: TranscriptEvent) -> Applied {
        let name = event.name();
        let Some(turn) = self.active_turn_mut() else {
            tracing::debug!(event = name, "no active turn, dropping event");
            return Applied::Ignored;
        };

        let applied = fold_event(turn, event);
        let finished = turn.assistant.is_done();
        let turn_id = turn.id;

        if applied == Applied::Ignored {
            tracing::debug!(event = name, turn = %turn_id, "event did not match active turn");
        }
        if finished {
            tracing::debug!(turn = %turn_id, "turn finished");
            self.active = None;
        }

        applied
    }

    /// Ordered snapshot of all turns
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last_turn(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn active_turn_id(&self) -> Option<TurnId> {
        self.active
    }

    /// The turn currently receiving events
    pub fn active_turn(&self) -> Option<&Turn> {
        let id = self.active?;
        self.turns.iter().rev().find(|turn| turn.id == id)
    }

    /// Whether a response is still streaming
    pub fn is_streaming(&self) -> bool {
        self.active.is_some()
    }

    /// User messages in order, for input history
    pub fn user_messages(&self) -> Vec<String> {
        self.turns
            .iter()
            .map(|turn| turn.user.text.clone())
            .filter(|text| !text.trim().is_empty())
            .collect()
    }

    fn active_turn_mut(&mut self) -> Option<&mut Turn> {
        let id = self.active?;
        self.turns.iter_mut().rev().find(|turn| turn.id == id)
    }
}

fn fold_event(turn: &mut Turn, event: TranscriptEvent) -> Applied {
    let assistant = &mut turn.assistant;

    match event {
        TranscriptEvent::Token { kind, text } => match assistant.streaming_state.route_token(kind) {
            TokenRoute::Append if !text.is_empty() => {
                match kind {
                    TokenKind::Reasoning => assistant.reasoning.push_str(&text),
                    TokenKind::Content => assistant.content.push_str(&text),
                }
                Applied::Changed
            }
            TokenRoute::CountOnly if !text.is_empty() => {
                assistant.interim_char_count += text.chars().count();
                Applied::Changed
            }
            _ => Applied::Ignored,
        },
        TranscriptEvent::BeginInterimStream => transition(turn, StreamTransition::BeginInterim),
        TranscriptEvent::BeginFinalSummary => transition(turn, StreamTransition::BeginFinal),
        TranscriptEvent::ToolCall { id, name, args } => {
            assistant.tool_calls.push(ToolCallEntry { id, name, args, result: None });
            Applied::Changed
        }
        TranscriptEvent::ToolResult { id, result } => match assistant.tool_call_mut(&id) {
            Some(call) => {
                call.result = Some(result);
                Applied::Changed
            }
            None => Applied::Ignored,
        },
        TranscriptEvent::MessageDone { content } => {
            assistant.streaming_state = assistant.streaming_state.on(StreamTransition::Finish);
            if let Some(content) = content {
                assistant.content = content;
            }
            Applied::Changed
        }
        TranscriptEvent::Error { message } => {
            tracing::warn!(error = %message, "agent reported an error");
            assistant.streaming_state = assistant.streaming_state.on(StreamTransition::Finish);
            assistant.content = format!("⚠ {}", message);
            Applied::Changed
        }
        TranscriptEvent::ReportImpossible { reason } => {
            if turn.impossible.is_some() {
                return Applied::Ignored;
            }
            turn.impossible = Some(reason);
            Applied::Changed
        }
        TranscriptEvent::TodoListUpdate { items } => {
            turn.todo_items = items;
            Applied::Changed
        }
        TranscriptEvent::ApprovalRequest { id, tool_name, args } => {
            turn.approval_item = Some(ApprovalItem { id, tool_name, args, resolved: None });
            Applied::Changed
        }
        TranscriptEvent::ApprovalResolved { id, approved } => match turn.approval_item.as_mut() {
            Some(item) if item.id == id && item.resolved.is_none() => {
                item.resolved = Some(ApprovalOutcome { approved });
                Applied::Changed
            }
            _ => Applied::Ignored,
        },
    }
}

fn transition(turn: &mut Turn, transition: StreamTransition) -> Applied {
    let assistant = &mut turn.assistant;
    let next = assistant.streaming_state.on(transition);
    if next == assistant.streaming_state {
        return Applied::Ignored;
    }
    assistant.streaming_state = next;
    Applied::Changed
}
