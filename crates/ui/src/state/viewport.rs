use crate::scroll::{ScrollMetrics, ScrollTarget};

/// Vertical window onto the rendered transcript, in rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    offset: u32,
    content_height: u32,
    height: u32,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn content_height(&self) -> u32 {
        self.content_height
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn max_offset(&self) -> u32 {
        self.content_height.saturating_sub(self.height)
    }

    /// Record the size of the latest layout; the offset is clamped to fit
    pub fn resize(&mut self, content_height: u32, height: u32) {
        self.content_height = content_height;
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn scroll_up(&mut self, rows: u32) {
        self.offset = self.offset.saturating_sub(rows);
    }

    pub fn scroll_down(&mut self, rows: u32) {
        self.offset = self.offset.saturating_add(rows).min(self.max_offset());
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
    }
}

impl ScrollTarget for Viewport {
    fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics::new(self.offset, self.content_height, self.height)
    }

    fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }
}
