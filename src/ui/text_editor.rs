//! Append-only text buffer rendered by the shell; the [`TextSink`] the gamepad writes into.

use crate::mapping::sink::{CursorColor, TextSink};
use tracing::debug;

#[derive(Clone, Debug, Default)]
pub struct TextEditor {
    text: String,
    cursor_preview: Option<char>,
    cursor_color: CursorColor,
}

impl TextEditor {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Cell the cursor sits in, as (column, row)
    pub fn cursor_cell(&self) -> (usize, usize) {
        let row = self.text.matches('\n').count();
        let column = self
            .text
            .rsplit('\n')
            .next()
            .map(|line| line.chars().count())
            .unwrap_or(0);
        (column, row)
    }

    pub fn cursor_preview(&self) -> Option<char> {
        self.cursor_preview
    }

    pub fn cursor_color(&self) -> CursorColor {
        self.cursor_color
    }
}

impl TextSink for TextEditor {
    fn put_char(&mut self, ch: char) {
        self.text.push(ch);
    }

    fn backspace(&mut self) {
        if self.text.pop().is_none() {
            debug!("Backspace on empty text");
        }
    }

    fn delete_line(&mut self) {
        let cut = self.text.rfind('\n').unwrap_or(0);
        self.text.truncate(cut);
    }

    fn set_cursor_preview(&mut self, ch: Option<char>) {
        self.cursor_preview = ch;
    }

    fn set_cursor_color(&mut self, color: CursorColor) {
        self.cursor_color = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ab\ncd", "ab")]
    #[case("ab\n", "ab")]
    #[case("ab", "")]
    #[case("", "")]
    #[case("a\nb\nc", "a\nb")]
    fn delete_line_drops_last_segment(#[case] before: &str, #[case] after: &str) {
        let mut editor = TextEditor::new(before);
        editor.delete_line();
        assert_eq!(editor.text(), after);
    }

    #[test]
    fn cursor_follows_last_line() {
        let mut editor = TextEditor::new("Hello, Galaxy!\n");
        assert_eq!(editor.cursor_cell(), (0, 1));

        for ch in "héllo".chars() {
            editor.put_char(ch);
        }
        assert_eq!(editor.cursor_cell(), (5, 1));

        editor.backspace();
        assert_eq!(editor.text(), "Hello, Galaxy!\nhéll");
    }

    #[test]
    fn backspace_on_empty_is_harmless() {
        let mut editor = TextEditor::default();
        editor.backspace();
        assert_eq!(editor.text(), "");
        assert_eq!(editor.cursor_cell(), (0, 0));
    }

    #[test]
    fn stores_cursor_feedback() {
        let mut editor = TextEditor::default();
        editor.set_cursor_preview(Some('q'));
        editor.set_cursor_color(CursorColor::ActionLayer);
        assert_eq!(editor.cursor_preview(), Some('q'));
        assert_eq!(editor.cursor_color(), CursorColor::ActionLayer);

        editor.set_text("x");
        editor.clear();
        assert_eq!(editor.text(), "");
    }
}
