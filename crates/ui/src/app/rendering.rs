use super::App;
use crate::theme::Theme;
use crate::transcript::TranscriptRenderer;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Screen regions, top to bottom
pub struct AppLayout {
    pub header: Rect,
    pub transcript: Rect,
    pub footer: Rect,
    pub input: Rect,
}

impl AppLayout {
    pub fn calculate(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1), Constraint::Length(1), Constraint::Length(3)])
            .split(area);
        Self { header: chunks[0], transcript: chunks[1], footer: chunks[2], input: chunks[3] }
    }
}

pub fn draw(app: &App, frame: &mut Frame<'_>) {
    let layout = AppLayout::calculate(frame.area());
    frame.render_widget(Block::default().style(Theme::base()), frame.area());

    render_header(app, frame, layout.header);
    let visible = app.layout.visible(app.viewport.offset(), layout.transcript.height);
    TranscriptRenderer::render(frame, layout.transcript, visible);
    render_footer(app, frame, layout.footer);
    render_input(app, frame, layout.input);
}

fn render_header(app: &App, frame: &mut Frame<'_>, area: Rect) {
    let mut spans = vec![
        Span::styled(" parley ", Theme::assistant_label()),
        Span::styled("· ", Theme::muted()),
        Theme::connection_span(app.status()),
    ];
    if let Some(pwd) = &app.session_state.pwd {
        spans.push(Span::styled(format!(" · {}", pwd), Theme::muted()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).style(Theme::panel()), area);
}

fn render_footer(app: &App, frame: &mut Frame<'_>, area: Rect) {
    let mut spans = Vec::new();
    if app.is_busy() {
        spans.push(Span::styled(" ● responding ", Theme::warning()));
    }
    if !app.scroll.is_engaged() {
        spans.push(Span::styled(" ↓ autoscroll paused ", Theme::muted()));
    }
    if let Some(position) = app.input.history_position() {
        spans.push(Span::styled(format!(" history {} ", position), Theme::muted()));
    }
    if let Some(notice) = &app.session_state.notice {
        spans.push(Span::styled(format!(" {} ", notice), Theme::muted()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).style(Theme::base()), area);
}

fn render_input(app: &App, frame: &mut Frame<'_>, area: Rect) {
    let title = if app.pending_approval_id().is_some() && app.input.is_empty() {
        " approve? y/n "
    } else {
        " message "
    };
    let block = Block::default().borders(Borders::ALL).border_style(Theme::border()).title(title);
    let inner = block.inner(area);
    frame.render_widget(Paragraph::new(app.input.buffer.as_str()).style(Theme::panel()).block(block), area);

    let before_cursor: String = app.input.buffer.chars().take(app.input.cursor).collect();
    let cursor_x = unicode_width::UnicodeWidthStr::width(before_cursor.as_str());
    let cursor_x = u16::try_from(cursor_x).unwrap_or(u16::MAX).min(inner.width.saturating_sub(1));
    frame.set_cursor_position((inner.x + cursor_x, inner.y));
}
