//! Input field handling for the terminal user interface.

/// A single-line text field with cursor position management.
///
/// Focus is tracked by the owning screen, not the field itself; a field only
/// knows its contents and where the cursor sits.
#[derive(Clone, Default)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
}

impl InputField {
    /// Create a new empty input field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an input field with initial text, cursor at the end.
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.len(),
        }
    }

    /// Insert a character at the current cursor position.
    pub fn handle_char(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.value[..self.cursor]
                .chars()
                .next_back()
                .map(char::len_utf8)
                .unwrap_or(0);
            self.cursor -= prev;
            self.value.remove(self.cursor);
        }
    }

    /// Delete the character at the cursor position.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.value.len() {
            self.value.remove(self.cursor);
        }
    }

    /// Move cursor one character to the left.
    pub fn move_cursor_left(&mut self) {
        if self.cursor > 0 {
            let prev = self.value[..self.cursor]
                .chars()
                .next_back()
                .map(char::len_utf8)
                .unwrap_or(0);
            self.cursor -= prev;
        }
    }

    /// Move cursor one character to the right.
    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.value.len() {
            let next = self.value[self.cursor..]
                .chars()
                .next()
                .map(char::len_utf8)
                .unwrap_or(0);
            self.cursor += next;
        }
    }

    /// Take the current value out of the field, leaving it empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }
}
