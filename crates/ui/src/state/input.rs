/// State for the message composer
///
/// `cursor` counts characters, not bytes.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current input buffer
    pub buffer: String,
    /// Cursor position in characters
    pub cursor: usize,
    /// Sent messages, oldest first
    pub message_history: Vec<String>,
    /// Current position in history (None = new message)
    pub history_index: Option<usize>,
    /// Draft kept aside while browsing history
    pub temp_buffer: Option<String>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.buffer.char_indices().nth(char_pos).map(|(idx, _)| idx).unwrap_or(self.buffer.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let idx = self.byte_index(self.cursor);
        self.buffer.insert(idx, c);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, text: &str) {
        let idx = self.byte_index(self.cursor);
        self.buffer.insert_str(idx, text);
        self.cursor += text.chars().count();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let idx = self.byte_index(self.cursor);
            self.buffer.remove(idx);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let idx = self.byte_index(self.cursor);
            self.buffer.remove(idx);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.reset_history_navigation();
    }

    pub fn take(&mut self) -> String {
        let buffer = std::mem::take(&mut self.buffer);
        self.cursor = 0;
        self.reset_history_navigation();
        buffer
    }

    /// Record a sent message; consecutive duplicates are collapsed
    pub fn add_to_history(&mut self, message: String) {
        if self.message_history.last() == Some(&message) {
            return;
        }
        self.message_history.push(message);
        self.reset_history_navigation();
    }

    /// Navigate up in history (older messages)
    pub fn navigate_up(&mut self) {
        if self.message_history.is_empty() {
            return;
        }

        if self.history_index.is_none() && !self.buffer.is_empty() {
            self.temp_buffer = Some(self.buffer.clone());
        }

        let new_index = match self.history_index {
            None => self.message_history.len() - 1,
            Some(idx) => idx.saturating_sub(1),
        };

        if let Some(message) = self.message_history.get(new_index) {
            self.buffer = message.clone();
            self.move_end();
            self.history_index = Some(new_index);
        }
    }

    /// Navigate down in history (newer messages), restoring the draft at the end
    pub fn navigate_down(&mut self) {
        let Some(idx) = self.history_index else {
            return;
        };

        if idx + 1 >= self.message_history.len() {
            self.buffer = self.temp_buffer.take().unwrap_or_default();
            self.history_index = None;
        } else {
            self.buffer = self.message_history[idx + 1].clone();
            self.history_index = Some(idx + 1);
        }
        self.move_end();
    }

    pub fn reset_history_navigation(&mut self) {
        self.history_index = None;
        self.temp_buffer = None;
    }

    pub fn is_navigating_history(&self) -> bool {
        self.history_index.is_some()
    }

    /// "3/5" style indicator while browsing history
    pub fn history_position(&self) -> Option<String> {
        self.history_index.map(|idx| format!("{}/{}", idx + 1, self.message_history.len()))
    }
}
