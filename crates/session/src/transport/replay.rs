use super::{Transport, pause};
use crate::codec::FrameCodec;
use crate::error::SessionError;
use crate::protocol::{ClientAction, InboundFrame, SessionEvent, TranscriptEvent};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Plays a recorded JSONL session as a scripted agent
///
/// Each outbound `user_message` plays the next recorded response: frames are emitted in order,
/// `delay` apart, up to and including the next `message_done` or `error`. Other actions are
/// logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct ReplayTransport {
    path: PathBuf,
    delay: Duration,
}

impl ReplayTransport {
    pub fn new(path: impl Into<PathBuf>, delay: Duration) -> Self {
        Self { path: path.into(), delay }
    }

    async fn load_frames(&self) -> Result<Vec<InboundFrame>, SessionError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let mut codec = FrameCodec::new();
        let mut frames = Vec::new();

        for line in content.lines() {
            match codec.decode_line(line) {
                Ok(Some(frame)) => frames.push(frame),
                Ok(None) => {}
                Err(e) => tracing::warn!(path = %self.path.display(), error = %e, "skipping undecodable frame"),
            }
        }

        Ok(frames)
    }
}

fn ends_response(frame: &InboundFrame) -> bool {
    matches!(frame, InboundFrame::Transcript(event) if event.is_terminal())
}

#[async_trait]
impl Transport for ReplayTransport {
    fn name(&self) -> &str {
        "replay"
    }

    async fn run(
        self: Box<Self>, events: mpsc::UnboundedSender<SessionEvent>,
        mut actions: mpsc::UnboundedReceiver<ClientAction>, cancel: CancellationToken,
    ) -> Result<(), SessionError> {
        let frames = self.load_frames().await?;
        tracing::info!(path = %self.path.display(), frames = frames.len(), "replay loaded");

        if events.send(SessionEvent::Connected).is_err() {
            return Ok(());
        }

        let mut remaining = frames.into_iter().peekable();

        loop {
            let action = tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                action = actions.recv() => action,
            };

            match action {
                Some(ClientAction::UserMessage { .. }) => {
                    if remaining.peek().is_none() {
                        let message = "replay has no more recorded responses".to_string();
                        let exhausted = TranscriptEvent::Error { message };
                        if events.send(exhausted.into()).is_err() {
                            return Ok(());
                        }
                        continue;
                    }

                    for frame in remaining.by_ref() {
                        if !pause(self.delay, &cancel).await {
                            return Ok(());
                        }
                        let last = ends_response(&frame);
                        if events.send(frame.into()).is_err() {
                            return Ok(());
                        }
                        if last {
                            break;
                        }
                    }
                }
                Some(other) => tracing::info!(action = other.name(), "replay ignoring action"),
                None => return Ok(()),
            }
        }
    }
}
