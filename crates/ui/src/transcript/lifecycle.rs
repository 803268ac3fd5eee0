//! Streaming sub-state machine of an assistant entry.
//!
//! ```text
//! Normal --begin_interim_stream--> Interim --begin_final_summary--> Normal
//!   any  --message_done | error--> Done
//! ```
//!
//! `Done` is terminal. The machine is per turn and starts in `Normal`.

use parley_session::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamingState {
    /// Tokens are appended as they arrive
    #[default]
    Normal,
    /// A draft is streaming; content tokens are only counted
    Interim,
    /// The response is complete
    Done,
}

/// Inputs that move the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamTransition {
    BeginInterim,
    BeginFinal,
    Finish,
}

/// What to do with an incoming token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRoute {
    /// Append to the field matching the token kind
    Append,
    /// Count toward `interim_char_count` without exposing the text
    CountOnly,
    /// Drop it; the entry is complete
    Discard,
}

impl StreamingState {
    /// Next state for `transition`. `Done` absorbs every input.
    pub fn on(self, transition: StreamTransition) -> StreamingState {
        match (self, transition) {
            (StreamingState::Done, _) => StreamingState::Done,
            (_, StreamTransition::Finish) => StreamingState::Done,
            (_, StreamTransition::BeginInterim) => StreamingState::Interim,
            (_, StreamTransition::BeginFinal) => StreamingState::Normal,
        }
    }

    pub fn route_token(self, kind: TokenKind) -> TokenRoute {
        match (self, kind) {
            (StreamingState::Done, _) => TokenRoute::Discard,
            (StreamingState::Interim, TokenKind::Content) => TokenRoute::CountOnly,
            _ => TokenRoute::Append,
        }
    }

    pub fn is_done(self) -> bool {
        self == StreamingState::Done
    }

    pub fn is_streaming(self) -> bool {
        !self.is_done()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StreamingState::Normal => "normal",
            StreamingState::Interim => "interim",
            StreamingState::Done => "done",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_normal() {
        assert_eq!(StreamingState::default(), StreamingState::Normal);
    }

    #[test]
    fn test_interim_round_trip() {
        let state = StreamingState::Normal.on(StreamTransition::BeginInterim);
        assert_eq!(state, StreamingState::Interim);
        assert_eq!(state.on(StreamTransition::BeginFinal), StreamingState::Normal);
    }

    #[test]
    fn test_self_transitions_are_idempotent() {
        assert_eq!(
            StreamingState::Interim.on(StreamTransition::BeginInterim),
            StreamingState::Interim
        );
        assert_eq!(StreamingState::Normal.on(StreamTransition::BeginFinal), StreamingState::Normal);
    }

    #[test]
    fn test_finish_from_any_state() {
        for state in [StreamingState::Normal, StreamingState::Interim, StreamingState::Done] {
            assert_eq!(state.on(StreamTransition::Finish), StreamingState::Done);
        }
    }

    #[test]
    fn test_done_is_terminal() {
        for transition in [StreamTransition::BeginInterim, StreamTransition::BeginFinal, StreamTransition::Finish] {
            assert_eq!(StreamingState::Done.on(transition), StreamingState::Done);
        }
    }

    #[test]
    fn test_token_routing() {
        assert_eq!(StreamingState::Normal.route_token(TokenKind::Content), TokenRoute::Append);
        assert_eq!(StreamingState::Normal.route_token(TokenKind::Reasoning), TokenRoute::Append);
        assert_eq!(StreamingState::Interim.route_token(TokenKind::Content), TokenRoute::CountOnly);
        assert_eq!(StreamingState::Interim.route_token(TokenKind::Reasoning), TokenRoute::Append);
        assert_eq!(StreamingState::Done.route_token(TokenKind::Content), TokenRoute::Discard);
        assert_eq!(StreamingState::Done.route_token(TokenKind::Reasoning), TokenRoute::Discard);
    }

    #[test]
    fn test_is_streaming() {
        assert!(StreamingState::Normal.is_streaming());
        assert!(StreamingState::Interim.is_streaming());
        assert!(!StreamingState::Done.is_streaming());
    }
}
