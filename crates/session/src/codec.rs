use crate::error::SessionError;
use crate::protocol::{ClientAction, InboundFrame, SessionInfo, TranscriptEvent};
use serde::Deserialize;
use serde_json::Value;

/// Newline-delimited JSON framing for the session transport
///
/// Tracks the line number so decode failures point at the offending frame.
#[derive(Debug, Default)]
pub struct FrameCodec {
    line: usize,
}

impl FrameCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lines seen so far
    pub fn lines_read(&self) -> usize {
        self.line
    }

    /// Decode one line. Blank lines yield `Ok(None)`.
    pub fn decode_line(&mut self, line: &str) -> Result<Option<InboundFrame>, SessionError> {
        self.line += 1;

        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let value: Value = serde_json::from_str(trimmed).map_err(|e| self.decode_error(e.to_string()))?;
        let name = value
            .get("event")
            .and_then(Value::as_str)
            .ok_or_else(|| self.decode_error("missing \"event\" name".to_string()))?;

        let frame = if SessionInfo::EVENT_NAMES.contains(&name) {
            SessionInfo::deserialize(&value).map(InboundFrame::Info)
        } else {
            TranscriptEvent::deserialize(&value).map(InboundFrame::Transcript)
        };

        frame.map(Some).map_err(|e| self.decode_error(e.to_string()))
    }

    /// Encode an outbound action as a single line, including the trailing newline
    pub fn encode(&self, action: &ClientAction) -> Result<String, SessionError> {
        let mut line = serde_json::to_string(action)?;
        line.push('\n');
        Ok(line)
    }

    fn decode_error(&self, reason: String) -> SessionError {
        SessionError::Decode { line: self.line, reason }
    }
}
