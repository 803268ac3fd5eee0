//! Transports move frames between the client and an agent session.
//!
//! A transport runs on its own task and talks to the app only through channels: it pushes
//! [`SessionEvent`]s and drains [`ClientAction`]s. [`SessionHandle::spawn`] owns that wiring and
//! guarantees a single `Disconnected` once the transport stops, whatever the reason.

mod process;
mod replay;

pub use process::ProcessTransport;
pub use replay::ReplayTransport;

use crate::codec::FrameCodec;
use crate::error::SessionError;
use crate::protocol::{ClientAction, SessionEvent};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A connection to an agent session
#[async_trait]
pub trait Transport: Send + 'static {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Run until the session ends, the action channel closes, or `cancel` fires.
    ///
    /// Implementations send `Connected` once the session is reachable; the caller sends
    /// `Disconnected`.
    async fn run(
        self: Box<Self>, events: mpsc::UnboundedSender<SessionEvent>, actions: mpsc::UnboundedReceiver<ClientAction>,
        cancel: CancellationToken,
    ) -> Result<(), SessionError>;
}

/// The app's end of a running session
pub struct SessionHandle {
    events: mpsc::UnboundedReceiver<SessionEvent>,
    actions: mpsc::UnboundedSender<ClientAction>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

/// The agent's end of an in-memory session, for tests and embedding
pub struct RemoteSession {
    pub events: mpsc::UnboundedSender<SessionEvent>,
    pub actions: mpsc::UnboundedReceiver<ClientAction>,
}

impl RemoteSession {
    /// Push an event to the client, ignoring a closed channel
    pub fn emit(&self, event: impl Into<SessionEvent>) {
        let _ = self.events.send(event.into());
    }

    /// Drain every action sent so far
    pub fn drain_actions(&mut self) -> Vec<ClientAction> {
        let mut drained = Vec::new();
        while let Ok(action) = self.actions.try_recv() {
            drained.push(action);
        }
        drained
    }
}

impl SessionHandle {
    /// Start `transport` on a new task
    pub fn spawn(transport: Box<dyn Transport>, cancel: CancellationToken) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let name = transport.name().to_string();
        let task_cancel = cancel.clone();

        let task = tokio::spawn(async move {
            tracing::info!(transport = %name, "session transport starting");
            match transport.run(event_tx.clone(), action_rx, task_cancel).await {
                Ok(()) => tracing::info!(transport = %name, "session transport finished"),
                Err(e) => tracing::error!(transport = %name, error = %e, "session transport failed"),
            }
            let _ = event_tx.send(SessionEvent::Disconnected);
        });

        Self { events: event_rx, actions: action_tx, cancel, task: Some(task) }
    }

    /// Build a handle wired to an in-memory remote end; no task is spawned
    pub fn in_memory() -> (Self, RemoteSession) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let handle = Self { events: event_rx, actions: action_tx, cancel: CancellationToken::new(), task: None };
        (handle, RemoteSession { events: event_tx, actions: action_rx })
    }

    /// Wait for the next event; `None` once the transport is gone
    pub async fn recv(&mut self) -> Option<SessionEvent> {
        self.events.recv().await
    }

    /// Take an already-queued event without waiting
    pub fn try_recv(&mut self) -> Option<SessionEvent> {
        self.events.try_recv().ok()
    }

    /// Queue an action for the agent
    pub fn send(&self, action: ClientAction) -> Result<(), SessionError> {
        self.actions.send(action).map_err(|_| SessionError::ChannelClosed)
    }

    /// Ask the transport to stop
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Stop the transport and wait for its task to finish
    pub async fn join(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            tracing::warn!(error = %e, "session transport task panicked");
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Decode a line and forward it. Returns `false` once the app has stopped listening.
pub(crate) fn forward_line(codec: &mut FrameCodec, line: &str, events: &mpsc::UnboundedSender<SessionEvent>) -> bool {
    match codec.decode_line(line) {
        Ok(Some(frame)) => events.send(frame.into()).is_ok(),
        Ok(None) => true,
        Err(e) => {
            tracing::warn!(error = %e, "skipping undecodable frame");
            true
        }
    }
}

/// Sleep for `delay` unless cancelled first. Returns `false` on cancellation.
pub(crate) async fn pause(delay: Duration, cancel: &CancellationToken) -> bool {
    if delay.is_zero() {
        return !cancel.is_cancelled();
    }
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(delay) => true,
    }
}
