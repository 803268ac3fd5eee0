mod entry;
mod layout;
mod lifecycle;
mod renderer;
mod state;

pub use entry::{ApprovalItem, ApprovalOutcome, AssistantEntry, ToolCallEntry, Turn, TurnId, UserMessage};
pub use layout::TranscriptLayout;
pub use lifecycle::{StreamTransition, StreamingState, TokenRoute};
pub use renderer::TranscriptRenderer;
pub use state::{Applied, Transcript};
