//! Outbound boundary of the text input: everything it commits goes through [`TextSink`].

/// Cursor tint reflecting the active modifier layer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorColor {
    #[default]
    Default,
    SymbolLayer,
    ActionLayer,
}

/// Text widget driven by the cyclic input controller
pub trait TextSink {
    fn put_char(&mut self, ch: char);

    fn backspace(&mut self);

    fn delete_line(&mut self);

    /// Candidate shown at the cursor while cycling; `None` clears it
    fn set_cursor_preview(&mut self, ch: Option<char>);

    fn set_cursor_color(&mut self, color: CursorColor);
}
