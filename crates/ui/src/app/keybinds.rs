use super::App;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use std::time::Instant;

const MOUSE_SCROLL_ROWS: u32 = 3;

/// What a key press asks the app to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Submit,
    Approve,
    Deny,
    ScrollUp(u32),
    ScrollDown(u32),
    Exit,
}

/// Slash commands typed into the composer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Pwd,
    MemoryKeys,
    MemoryValue(String),
    Quit,
    Unknown(String),
}

impl SlashCommand {
    /// Parse `input` if it is a slash command
    pub fn parse(input: &str) -> Option<Self> {
        let rest = input.trim().strip_prefix('/')?;
        let mut parts = rest.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default();
        let arg = parts.next().map(str::trim).filter(|arg| !arg.is_empty());

        let command = match (name, arg) {
            ("pwd", _) => SlashCommand::Pwd,
            ("memory" | "mem", None) => SlashCommand::MemoryKeys,
            ("memory" | "mem", Some(key)) => SlashCommand::MemoryValue(key.to_string()),
            ("quit" | "exit", _) => SlashCommand::Quit,
            (other, _) => SlashCommand::Unknown(other.to_string()),
        };
        Some(command)
    }
}

/// Map a key press to an action, editing the composer in place for plain typing
pub fn map_key(event: KeyEvent, app: &mut App) -> Option<KeyAction> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let page = app.viewport().height().saturating_sub(1).max(1);
    let approval_pending = app.pending_approval_id().is_some() && app.input.is_empty();

    match event.code {
        KeyCode::Char('c') | KeyCode::Char('d') if ctrl => return Some(KeyAction::Exit),
        KeyCode::Esc => return Some(KeyAction::Exit),
        KeyCode::Char('y') | KeyCode::Char('Y') if approval_pending => return Some(KeyAction::Approve),
        KeyCode::Char('n') | KeyCode::Char('N') if approval_pending => return Some(KeyAction::Deny),
        KeyCode::Enter => return Some(KeyAction::Submit),
        KeyCode::PageUp => return Some(KeyAction::ScrollUp(page)),
        KeyCode::PageDown => return Some(KeyAction::ScrollDown(page)),
        KeyCode::Up if ctrl => return Some(KeyAction::ScrollUp(1)),
        KeyCode::Down if ctrl => return Some(KeyAction::ScrollDown(1)),
        KeyCode::Up => app.input.navigate_up(),
        KeyCode::Down => app.input.navigate_down(),
        KeyCode::Backspace => app.input.backspace(),
        KeyCode::Delete => app.input.delete(),
        KeyCode::Left => app.input.move_left(),
        KeyCode::Right => app.input.move_right(),
        KeyCode::Home => app.input.move_home(),
        KeyCode::End => app.input.move_end(),
        KeyCode::Char(c) if !ctrl => {
            app.input.reset_history_navigation();
            app.input.insert_char(c);
        }
        _ => {}
    }
    None
}

/// Handle one terminal event
pub fn handle_terminal_event(app: &mut App, event: Event, now: Instant) {
    let action = match event {
        Event::Key(key) => map_key(key, app),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollUp => Some(KeyAction::ScrollUp(MOUSE_SCROLL_ROWS)),
            MouseEventKind::ScrollDown => Some(KeyAction::ScrollDown(MOUSE_SCROLL_ROWS)),
            _ => None,
        },
        Event::Paste(text) => {
            app.input.insert_str(&text);
            None
        }
        Event::Resize(width, height) => {
            app.resize(width, height, now);
            None
        }
        _ => None,
    };

    if let Some(action) = action {
        dispatch(app, action, now);
    }
}

fn dispatch(app: &mut App, action: KeyAction, now: Instant) {
    match action {
        KeyAction::Submit => submit(app, now),
        KeyAction::Approve => {
            app.respond_to_approval(true);
        }
        KeyAction::Deny => {
            app.respond_to_approval(false);
        }
        KeyAction::ScrollUp(rows) => app.scroll_up(rows),
        KeyAction::ScrollDown(rows) => app.scroll_down(rows),
        KeyAction::Exit => app.should_exit = true,
    }
}

fn submit(app: &mut App, now: Instant) {
    if let Some(command) = SlashCommand::parse(&app.input.buffer) {
        app.input.clear();
        run_command(app, command);
        return;
    }

    if !app.can_send() {
        let reason = if app.is_busy() { "agent is still responding" } else { "not connected" };
        app.session_state.notice = Some(reason.to_string());
        return;
    }

    let text = app.input.buffer.clone();
    if app.send_user_message(&text, now) {
        app.input.take();
    }
}

fn run_command(app: &mut App, command: SlashCommand) {
    match command {
        SlashCommand::Pwd => {
            app.request_pwd();
        }
        SlashCommand::MemoryKeys => {
            app.request_memory_keys();
        }
        SlashCommand::MemoryValue(key) => {
            app.request_memory_value(&key);
        }
        SlashCommand::Quit => app.should_exit = true,
        SlashCommand::Unknown(name) => {
            app.session_state.notice = Some(format!("unknown command: /{}", name));
        }
    }
}
