mod event_loop;
mod keybinds;
mod rendering;

use crate::scroll::ScrollController;
use crate::state::{ConnectionStatus, InputState, SessionState, Viewport};
use crate::transcript::{Applied, Transcript, TranscriptLayout};

use parley_core::Config;
use parley_session::{ClientAction, SessionEvent, SessionHandle};
use std::time::Instant;

/// Rows reserved for the header, footer and input box
const CHROME_ROWS: u16 = 5;

/// Main TUI application
///
/// Owns the transcript, the autoscroll controller and the app's end of the agent session.
/// Every inbound event and key press is handled to completion before the next one, so
/// nothing here needs locking.
pub struct App {
    transcript: Transcript,
    scroll: ScrollController,
    viewport: Viewport,
    layout: TranscriptLayout,
    layout_width: u16,
    pub input: InputState,
    pub session_state: SessionState,
    session: SessionHandle,
    session_open: bool,
    pub should_exit: bool,
}

impl App {
    pub fn new(session: SessionHandle, config: &Config) -> Self {
        Self {
            transcript: Transcript::new(),
            scroll: ScrollController::from(&config.scroll),
            viewport: Viewport::new(),
            layout: TranscriptLayout::new(),
            layout_width: 80,
            input: InputState::new(),
            session_state: SessionState::new(),
            session,
            session_open: true,
            should_exit: false,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn scroll(&self) -> &ScrollController {
        &self.scroll
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn status(&self) -> ConnectionStatus {
        self.session_state.status
    }

    /// A response is still streaming into the last turn
    pub fn is_busy(&self) -> bool {
        self.transcript.is_streaming()
    }

    /// Messages are accepted only while connected and idle
    pub fn can_send(&self) -> bool {
        self.status().is_connected() && !self.is_busy()
    }

    /// Run the TUI until the user quits
    pub async fn run(&mut self) -> std::io::Result<()> {
        event_loop::run(self).await
    }

    /// Draw the whole screen
    pub fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        rendering::draw(self, frame);
    }

    /// Fold one event from the agent session into the UI
    pub fn handle_session_event(&mut self, event: SessionEvent, now: Instant) {
        match event {
            SessionEvent::Connected => {
                tracing::info!("agent session connected");
                self.session_state.set_status(ConnectionStatus::Connected);
            }
            SessionEvent::Disconnected => {
                tracing::info!("agent session disconnected");
                self.session_state.set_status(ConnectionStatus::Disconnected);
            }
            SessionEvent::Transcript(event) => {
                if self.transcript.apply(event) == Applied::Changed {
                    self.relayout();
                    self.scroll.request_scroll_to_bottom(now, &mut self.viewport);
                }
            }
            SessionEvent::Info(info) => self.session_state.apply_info(info),
        }
    }

    /// Wait for the next session event and handle it
    ///
    /// Returns `false` once the session channel has closed. Cancel safe: nothing is lost if
    /// the future is dropped while waiting.
    pub async fn pump_session(&mut self) -> bool {
        match self.session.recv().await {
            Some(event) => {
                self.handle_session_event(event, Instant::now());
                true
            }
            None => {
                tracing::debug!("session channel closed");
                self.session_open = false;
                false
            }
        }
    }

    pub fn is_session_open(&self) -> bool {
        self.session_open
    }

    /// Start a turn and send it to the agent
    ///
    /// Blank input, a busy agent, or a missing connection leave everything untouched and
    /// return `false`.
    pub fn send_user_message(&mut self, text: &str, now: Instant) -> bool {
        let text = text.trim();
        if text.is_empty() || !self.can_send() {
            tracing::debug!(busy = self.is_busy(), status = self.status().as_str(), "not sending message");
            return false;
        }

        let turn = self.transcript.begin_turn(text);
        tracing::debug!(turn = %turn, chars = text.chars().count(), "sending user message");
        self.input.add_to_history(text.to_string());
        self.scroll.force_engage();
        self.relayout();
        self.scroll.request_scroll_to_bottom(now, &mut self.viewport);

        self.send_action(ClientAction::UserMessage { text: text.to_string() })
    }

    /// Answer the pending approval in the current turn
    ///
    /// The transcript changes only when the agent echoes `approval_resolved`.
    pub fn respond_to_approval(&mut self, approved: bool) -> bool {
        let Some(id) = self.pending_approval_id() else {
            return false;
        };
        tracing::debug!(approval = %id, approved, "answering approval request");
        self.send_action(ClientAction::ApprovalResponse { id, approved })
    }

    /// Id of the approval the active turn is waiting on
    ///
    /// A turn that finished with the request unanswered no longer takes a response.
    pub fn pending_approval_id(&self) -> Option<String> {
        self.transcript.active_turn()?.pending_approval().map(|item| item.id.clone())
    }

    pub fn request_pwd(&mut self) -> bool {
        self.send_action(ClientAction::GetPwd)
    }

    pub fn request_memory_keys(&mut self) -> bool {
        self.send_action(ClientAction::GetSessionMemoryKeys)
    }

    pub fn request_memory_value(&mut self, key: &str) -> bool {
        self.send_action(ClientAction::GetSessionMemoryValue { key: key.to_string() })
    }

    /// Move the view up at the user's request; this disengages autoscroll
    pub fn scroll_up(&mut self, rows: u32) {
        self.viewport.scroll_up(rows);
        self.scroll.observe(self.viewport_metrics());
    }

    pub fn scroll_down(&mut self, rows: u32) {
        self.viewport.scroll_down(rows);
        self.scroll.observe(self.viewport_metrics());
    }

    /// Run a due trailing scroll
    pub fn tick(&mut self, now: Instant) -> bool {
        self.scroll.poll(now, &mut self.viewport)
    }

    /// When [`App::tick`] next has work
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scroll.next_deadline()
    }

    /// Adopt a new terminal size
    pub fn resize(&mut self, width: u16, height: u16, now: Instant) {
        self.layout_width = width;
        self.viewport.resize(self.viewport.content_height(), u32::from(height.saturating_sub(CHROME_ROWS)));
        self.relayout();
        self.scroll.request_scroll_to_bottom(now, &mut self.viewport);
    }

    /// Stop the session and cancel pending scroll work
    pub fn shutdown(&mut self) {
        self.scroll.teardown();
        self.session.shutdown();
    }

    fn viewport_metrics(&self) -> crate::scroll::ScrollMetrics {
        crate::scroll::ScrollTarget::metrics(&self.viewport)
    }

    /// Re-wrap what changed and update content height
    fn relayout(&mut self) {
        self.layout.update(&self.transcript, usize::from(self.layout_width));
        self.viewport.resize(self.layout.height(), self.viewport.height());
    }

    fn send_action(&mut self, action: ClientAction) -> bool {
        let name = action.name();
        match self.session.send(action) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(action = name, error = %e, "failed to send action");
                self.session_state.set_status(ConnectionStatus::Disconnected);
                false
            }
        }
    }
}
