//! Window size entry field.

/// Longest entry accepted; anything longer is clamped to the maximum
/// window anyway.
const MAX_DIGITS: usize = 6;

/// Digits typed for a new chart window size.
#[derive(Clone, Debug, Default)]
pub struct SizeInput {
    /// The digits typed so far.
    pub content: String,
    /// Cursor position (character index).
    pub cursor: usize,
}

impl SizeInput {
    /// Creates an empty entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a digit at the cursor. Anything else is ignored.
    pub fn insert(&mut self, c: char) {
        if !c.is_ascii_digit() || self.content.len() >= MAX_DIGITS {
            return;
        }
        self.content.insert(self.cursor, c);
        self.cursor += 1;
    }

    /// Deletes the digit before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.content.remove(self.cursor);
        }
    }

    /// Deletes the digit at the cursor (delete).
    pub fn delete(&mut self) {
        if self.cursor < self.content.len() {
            self.content.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.content.len() {
            self.cursor += 1;
        }
    }

    /// The entered size, or `None` if nothing was typed.
    pub fn value(&self) -> Option<usize> {
        self.content.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> SizeInput {
        let mut input = SizeInput::new();
        text.chars().for_each(|c| input.insert(c));
        input
    }

    #[test]
    fn accepts_digits_only() {
        let input = typed("2a0-0");
        assert_eq!(input.as_str(), "200");
        assert_eq!(input.value(), Some(200));
    }

    #[test]
    fn empty_entry_has_no_value() {
        assert_eq!(SizeInput::new().value(), None);
    }

    #[test]
    fn length_is_capped() {
        let input = typed("123456789");
        assert_eq!(input.as_str(), "123456");
    }

    #[test]
    fn edits_at_cursor() {
        let mut input = typed("150");
        input.move_left();
        input.backspace();
        assert_eq!(input.as_str(), "10");

        input.insert('2');
        assert_eq!(input.as_str(), "120");

        input.delete();
        input.move_right();
        assert_eq!(input.as_str(), "12");
        assert_eq!(input.cursor, 2);
    }
}
