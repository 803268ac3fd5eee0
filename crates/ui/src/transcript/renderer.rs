use super::{ApprovalItem, AssistantEntry, StreamingState, ToolCallEntry, Transcript, Turn};
use crate::theme::Theme;
use parley_session::{TodoItem, ToolArgs};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::Paragraph,
};

const TOOL_RESULT_PREVIEW: usize = 240;
const TOOL_ARGS_PREVIEW: usize = 120;

/// Lays out the transcript as pre-wrapped lines
///
/// Wrapping happens here rather than in the paragraph widget so the line count is known
/// before drawing, which the viewport needs to compute scroll metrics.
pub struct TranscriptRenderer<'a> {
    transcript: &'a Transcript,
    width: usize,
}

impl<'a> TranscriptRenderer<'a> {
    pub fn new(transcript: &'a Transcript, width: usize) -> Self {
        Self { transcript, width: width.max(8) }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for index in 0..self.transcript.len() {
            self.push_turn(index, &mut lines);
        }
        lines
    }

    /// Append the rows of the turn at `index`, with the separator above it
    pub fn push_turn(&self, index: usize, lines: &mut Vec<Line<'static>>) {
        let Some(turn) = self.transcript.turns().get(index) else {
            return;
        };
        if index > 0 {
            lines.push(Line::default());
        }
        self.render_turn(turn, lines);
    }

    /// The transcript without styling, one rendered row per line
    pub fn plain_text(&self) -> String {
        self.lines()
            .iter()
            .map(|line| line.spans.iter().map(|span| span.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Draw the rows already cut to the visible window
    pub fn render(frame: &mut Frame<'_>, area: Rect, visible: Vec<Line<'static>>) {
        let paragraph = Paragraph::new(Text::from(visible)).style(Theme::base());
        frame.render_widget(paragraph, area);
    }

    fn render_turn(&self, turn: &Turn, lines: &mut Vec<Line<'static>>) {
        let live = self.transcript.active_turn_id() == Some(turn.id);

        lines.push(Line::from(Span::styled("● You", Theme::user_label())));
        self.push_wrapped(&turn.user.text, "┃ ", Style::default().fg(Theme::FG), lines);

        lines.push(Line::default());
        self.render_assistant(&turn.assistant, live, lines);

        if !turn.todo_items.is_empty() {
            self.render_todos(turn, lines);
        }
        if let Some(item) = &turn.approval_item {
            self.render_approval(item, live, lines);
        }
        if let Some(reason) = &turn.impossible {
            self.push_wrapped(&format!("✗ Cannot complete: {}", reason), "", Theme::warning(), lines);
        }
    }

    fn render_assistant(&self, assistant: &AssistantEntry, live: bool, lines: &mut Vec<Line<'static>>) {
        let marker = Style::default().fg(Theme::streaming_color(assistant.streaming_state));
        let mut header = vec![Span::styled("◆ ", marker), Span::styled("Assistant", Theme::assistant_label())];
        match assistant.streaming_state {
            // sealed by a newer turn before it finished
            StreamingState::Normal | StreamingState::Interim if !live => {
                header.push(Span::styled("  interrupted", Theme::muted()));
            }
            StreamingState::Normal if assistant.is_blank() => {
                header.push(Span::styled("  thinking…", Theme::muted()));
            }
            StreamingState::Normal => header.push(Span::styled("  …", Theme::muted())),
            StreamingState::Interim => {
                header.push(Span::styled(
                    format!("  drafting ({} chars)", assistant.interim_char_count),
                    Style::default().fg(Theme::PURPLE),
                ));
            }
            StreamingState::Done => {}
        }
        lines.push(Line::from(header));

        if !assistant.reasoning.is_empty() {
            self.push_wrapped(&assistant.reasoning, "  ", Theme::reasoning(), lines);
        }
        for call in &assistant.tool_calls {
            self.render_tool_call(call, lines);
        }
        if !assistant.content.is_empty() {
            let style =
                if assistant.content.starts_with('⚠') { Theme::error() } else { Style::default().fg(Theme::FG) };
            self.push_wrapped(&assistant.content, "", style, lines);
        }
    }

    fn render_tool_call(&self, call: &ToolCallEntry, lines: &mut Vec<Line<'static>>) {
        let header = format!("⚙ {}({})", call.name, format_args_preview(&call.args));
        self.push_wrapped(&header, "  ", Theme::tool(), lines);
        match &call.result {
            Some(result) => {
                let preview = parley_core::redact(result, TOOL_RESULT_PREVIEW);
                self.push_wrapped(&preview, "    ↳ ", Theme::muted(), lines);
            }
            None => lines.push(Line::from(Span::styled("    ↳ running…", Theme::muted()))),
        }
    }

    fn render_todos(&self, turn: &Turn, lines: &mut Vec<Line<'static>>) {
        let (closed, total) = turn.todo_progress();
        lines.push(Line::from(Span::styled(format!("Todo {}/{}", closed, total), Theme::assistant_label())));
        for item in &turn.todo_items {
            self.push_wrapped(&format_todo(item), "  ", todo_style(item), lines);
        }
    }

    fn render_approval(&self, item: &ApprovalItem, live: bool, lines: &mut Vec<Line<'static>>) {
        let request = format!("? Allow {}({})", item.tool_name, format_args_preview(&item.args));
        self.push_wrapped(&request, "", Theme::warning(), lines);

        let (label, style) = match item.resolved {
            None if live => ("  [y] approve  [n] deny", Theme::warning()),
            None => ("  – expired", Theme::muted()),
            Some(outcome) if outcome.approved => ("  ✓ approved", Style::default().fg(Theme::GREEN)),
            Some(_) => ("  ✗ denied", Theme::error()),
        };
        lines.push(Line::from(Span::styled(label, style)));
    }

    fn push_wrapped(&self, text: &str, prefix: &str, style: Style, lines: &mut Vec<Line<'static>>) {
        let prefix_width = unicode_width::UnicodeWidthStr::width(prefix);
        let available = self.width.saturating_sub(prefix_width).max(1);

        for source_line in text.lines() {
            if source_line.trim().is_empty() {
                lines.push(Line::from(Span::styled(prefix.to_string(), style)));
                continue;
            }
            for wrapped in textwrap::wrap(source_line, available) {
                lines.push(Line::from(vec![
                    Span::styled(prefix.to_string(), style),
                    Span::styled(wrapped.into_owned(), style),
                ]));
            }
        }
    }
}

fn format_args_preview(args: &ToolArgs) -> String {
    if args.is_empty() {
        return String::new();
    }
    let rendered = serde_json::Value::Object(args.clone()).to_string();
    parley_core::redact(&rendered, TOOL_ARGS_PREVIEW)
}

fn format_todo(item: &TodoItem) -> String {
    let mark = if item.is_closed() { "x" } else { " " };
    format!("[{}] {}. {}", mark, item.item_number, item.text)
}

fn todo_style(item: &TodoItem) -> Style {
    if item.is_closed() { Theme::muted() } else { Style::default().fg(Theme::FG) }
}
