use super::{Transcript, TranscriptRenderer};
use ratatui::text::Line;

/// Wrapped transcript rows, cached per finished turn
///
/// A turn that is no longer active never changes again, so its rows are wrapped once per
/// width. Only the active turn is re-wrapped when an event lands.
#[derive(Debug, Default)]
pub struct TranscriptLayout {
    width: usize,
    sealed_turns: usize,
    sealed: Vec<Line<'static>>,
    live: Vec<Line<'static>>,
}

impl TranscriptLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the rows up to date with `transcript` at `width` columns
    pub fn update(&mut self, transcript: &Transcript, width: usize) {
        let renderer = TranscriptRenderer::new(transcript, width);
        let sealed_turns =
            if transcript.is_streaming() { transcript.len().saturating_sub(1) } else { transcript.len() };

        if renderer.width() != self.width || sealed_turns < self.sealed_turns {
            tracing::trace!(width = renderer.width(), "rewrapping transcript");
            self.width = renderer.width();
            self.sealed_turns = 0;
            self.sealed.clear();
        }

        for index in self.sealed_turns..sealed_turns {
            renderer.push_turn(index, &mut self.sealed);
        }
        self.sealed_turns = sealed_turns;

        self.live.clear();
        for index in sealed_turns..transcript.len() {
            renderer.push_turn(index, &mut self.live);
        }
    }

    pub fn height(&self) -> u32 {
        u32::try_from(self.sealed.len() + self.live.len()).unwrap_or(u32::MAX)
    }

    /// Up to `rows` rows starting at row `offset`
    pub fn visible(&self, offset: u32, rows: u16) -> Vec<Line<'static>> {
        let start = usize::try_from(offset).unwrap_or(usize::MAX);
        self.sealed.iter().chain(&self.live).skip(start).take(usize::from(rows)).cloned().collect()
    }
}
