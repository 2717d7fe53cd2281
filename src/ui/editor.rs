use crate::ui::input_metrics::clamp_to_char_boundary_left;

/// Single-line-ish compose buffer with a byte cursor kept on char boundaries.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn prev_boundary(&self, idx: usize) -> usize {
        let idx = clamp_to_char_boundary_left(&self.text, idx);
        self.text[..idx]
            .char_indices()
            .next_back()
            .map(|(start, _)| start)
            .unwrap_or(0)
    }

    fn next_boundary(&self, idx: usize) -> usize {
        let idx = clamp_to_char_boundary_left(&self.text, idx);
        match self.text[idx..].chars().next() {
            Some(ch) => idx + ch.len_utf8(),
            None => self.text.len(),
        }
    }

    pub fn insert_str(&mut self, value: &str) {
        let cursor = clamp_to_char_boundary_left(&self.text, self.cursor);
        self.text.insert_str(cursor, value);
        self.cursor = cursor + value.len();
    }

    pub fn backspace(&mut self) {
        let end = clamp_to_char_boundary_left(&self.text, self.cursor);
        if end == 0 {
            return;
        }
        let start = self.prev_boundary(end);
        self.text.replace_range(start..end, "");
        self.cursor = start;
    }

    pub fn delete(&mut self) {
        let start = clamp_to_char_boundary_left(&self.text, self.cursor);
        if start >= self.text.len() {
            return;
        }
        let end = self.next_boundary(start);
        self.text.replace_range(start..end, "");
        self.cursor = start;
    }

    pub fn move_left(&mut self) {
        self.cursor = self.prev_boundary(self.cursor);
    }

    pub fn move_right(&mut self) {
        self.cursor = self.next_boundary(self.cursor);
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Take the trimmed buffer contents, leaving the buffer empty. Blank input
    /// is discarded and yields nothing.
    pub fn submit(&mut self) -> Option<String> {
        let value = self.text.trim().to_string();
        self.text.clear();
        self.cursor = 0;
        (!value.is_empty()).then_some(value)
    }
}
