//! Session boundary for Parley: the wire protocol, JSONL framing and transports.

pub mod codec;
pub mod error;
pub mod protocol;
pub mod transport;

pub use codec::FrameCodec;
pub use error::SessionError;
pub use protocol::{
    ClientAction, InboundFrame, SessionEvent, SessionInfo, TodoItem, TodoStatus, TokenKind, ToolArgs, TranscriptEvent,
};
pub use transport::{ProcessTransport, RemoteSession, ReplayTransport, SessionHandle, Transport};
