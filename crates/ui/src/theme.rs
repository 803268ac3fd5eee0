use crate::state::ConnectionStatus;
use crate::transcript::StreamingState;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

/// Iceberg-based palette for the Parley TUI
///
/// See https://github.com/cocopon/iceberg.vim
#[derive(Debug, Clone, Copy)]
pub struct Theme;

impl Theme {
    pub const BG: Color = Color::Rgb(22, 24, 33);
    pub const FG: Color = Color::Rgb(198, 200, 209);
    /// Panels, footer and input
    pub const PANEL_BG: Color = Color::Rgb(30, 33, 50);
    pub const BLUE: Color = Color::Rgb(132, 160, 198);
    pub const CYAN: Color = Color::Rgb(137, 184, 194);
    pub const PURPLE: Color = Color::Rgb(160, 147, 199);
    pub const GREEN: Color = Color::Rgb(180, 190, 130);
    pub const YELLOW: Color = Color::Rgb(226, 164, 120);
    pub const RED: Color = Color::Rgb(226, 120, 120);
    pub const MUTED: Color = Color::Rgb(107, 112, 137);
    pub const BORDER: Color = Color::Rgb(60, 65, 90);

    pub fn base() -> Style {
        Style::default().fg(Self::FG).bg(Self::BG)
    }

    pub fn muted() -> Style {
        Style::default().fg(Self::MUTED).bg(Self::BG)
    }

    pub fn panel() -> Style {
        Style::default().fg(Self::FG).bg(Self::PANEL_BG)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    pub fn user_label() -> Style {
        Style::default().fg(Self::BLUE).add_modifier(Modifier::BOLD)
    }

    pub fn assistant_label() -> Style {
        Style::default().fg(Self::CYAN).add_modifier(Modifier::BOLD)
    }

    /// Reasoning is shown dimmed and italic
    pub fn reasoning() -> Style {
        Style::default().fg(Self::MUTED).add_modifier(Modifier::ITALIC)
    }

    pub fn tool() -> Style {
        Style::default().fg(Self::PURPLE)
    }

    pub fn warning() -> Style {
        Style::default().fg(Self::YELLOW)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::RED)
    }

    pub fn connection_color(status: ConnectionStatus) -> Color {
        match status {
            ConnectionStatus::Connecting => Self::YELLOW,
            ConnectionStatus::Connected => Self::GREEN,
            ConnectionStatus::Disconnected => Self::RED,
        }
    }

    pub fn connection_span(status: ConnectionStatus) -> Span<'static> {
        Span::styled(status.as_str(), Style::default().fg(Self::connection_color(status)))
    }

    pub fn streaming_color(state: StreamingState) -> Color {
        match state {
            StreamingState::Normal => Self::CYAN,
            StreamingState::Interim => Self::PURPLE,
            StreamingState::Done => Self::MUTED,
        }
    }
}
