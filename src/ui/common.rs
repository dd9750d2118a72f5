//! # Shared UI palette
//!
//! Color constants for the shell's dark backdrop, plus the mapping from the
//! text input's [`CursorColor`] to concrete egui colors.

use crate::mapping::sink::CursorColor;
use eframe::egui::{Color32, Frame};

/// Centralized color palette for the Starpad dark theme.
///
/// Uses associated constants so every widget draws from one place.
pub struct UiColors;

impl UiColors {
    /// Backdrop behind the editor (RGB: 0, 0, 0)
    pub const BACKDROP: Color32 = Color32::BLACK;

    /// Committed text (RGB: 200, 200, 200)
    pub const TEXT: Color32 = Color32::from_rgb(200, 200, 200);

    /// Status bar text (RGB: 128, 128, 128)
    pub const STATUS: Color32 = Color32::from_rgb(128, 128, 128);

    /// Cursor and preview on the letter layer (RGB: 255, 105, 180) - Pink
    pub const CURSOR_DEFAULT: Color32 = Color32::from_rgb(255, 105, 180);

    /// Cursor on the digit/punctuation layer (RGB: 50, 200, 20) - Green
    pub const CURSOR_SYMBOLS: Color32 = Color32::from_rgb(50, 200, 20);

    /// Cursor on the action layer (RGB: 200, 50, 20) - Red
    pub const CURSOR_ACTIONS: Color32 = Color32::from_rgb(200, 50, 20);

    pub const MENU_ENTRY: Color32 = Color32::from_rgb(128, 128, 128);

    pub const MENU_SELECTED: Color32 = Color32::from_rgb(230, 230, 230);
}

pub fn cursor_color32(color: CursorColor) -> Color32 {
    match color {
        CursorColor::Default => UiColors::CURSOR_DEFAULT,
        CursorColor::SymbolLayer => UiColors::CURSOR_SYMBOLS,
        CursorColor::ActionLayer => UiColors::CURSOR_ACTIONS,
    }
}

/// Borderless frame filled with the backdrop color
pub fn backdrop_frame() -> Frame {
    Frame::new().fill(UiColors::BACKDROP).inner_margin(18)
}
