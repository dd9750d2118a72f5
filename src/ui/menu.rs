use crate::controller::gamepad_state::{ButtonEdge, ButtonSymbol};
use crate::ui::common::UiColors;
use eframe::egui::{self, Align2, RichText};
use std::fmt;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuEntry {
    NewFile,
    Open,
    Save,
    SaveAs,
    About,
    Quit,
}

impl MenuEntry {
    pub const ALL: [MenuEntry; 6] = [
        MenuEntry::NewFile,
        MenuEntry::Open,
        MenuEntry::Save,
        MenuEntry::SaveAs,
        MenuEntry::About,
        MenuEntry::Quit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuEntry::NewFile => "New File",
            MenuEntry::Open => "Open...",
            MenuEntry::Save => "Save",
            MenuEntry::SaveAs => "Save As...",
            MenuEntry::About => "About",
            MenuEntry::Quit => "Quit",
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            MenuEntry::NewFile => "Create a new file",
            MenuEntry::Open => "Open a file",
            MenuEntry::Save => "Save the current file",
            MenuEntry::SaveAs => "Save the current file with a new name",
            MenuEntry::About => "Show information about this program",
            MenuEntry::Quit => "Exit the program",
        }
    }
}

impl fmt::Display for MenuEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Popup menu navigated with the D-pad; A chooses, B cancels
#[derive(Debug, Default)]
pub struct Menu {
    active: bool,
    selection: usize,
    chosen: Option<MenuEntry>,
}

impl Menu {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn toggle(&mut self) {
        self.active = !self.active;
        debug!("Menu active: {}", self.active);
    }

    pub fn selected(&self) -> MenuEntry {
        MenuEntry::ALL[self.selection]
    }

    /// Returns the chosen entry once
    pub fn take_chosen(&mut self) -> Option<MenuEntry> {
        self.chosen.take()
    }

    pub fn on_button_edge(&mut self, edge: ButtonEdge) {
        if !edge.pressed {
            return;
        }
        let len = MenuEntry::ALL.len();
        match edge.button {
            ButtonSymbol::DPadUp => self.selection = (self.selection + len - 1) % len,
            ButtonSymbol::DPadDown => self.selection = (self.selection + 1) % len,
            ButtonSymbol::A => {
                self.chosen = Some(self.selected());
                self.active = false;
                debug!("Chosen: {}", self.selected());
            }
            ButtonSymbol::B => self.active = false,
            other => debug!("Menu ignores {:?}", other),
        }
    }

    pub fn render(&self, ctx: &egui::Context, font_size: f32) {
        egui::Window::new("Starpad Menu")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                for (i, entry) in MenuEntry::ALL.iter().enumerate() {
                    let color = if i == self.selection {
                        UiColors::MENU_SELECTED
                    } else {
                        UiColors::MENU_ENTRY
                    };
                    ui.label(
                        RichText::new(entry.label())
                            .monospace()
                            .size(font_size)
                            .color(color),
                    );
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(button: ButtonSymbol) -> ButtonEdge {
        ButtonEdge { button, pressed: true }
    }

    #[test]
    fn selection_wraps_both_ways() {
        let mut menu = Menu::default();
        menu.on_button_edge(press(ButtonSymbol::DPadUp));
        assert_eq!(menu.selected(), MenuEntry::Quit);
        menu.on_button_edge(press(ButtonSymbol::DPadDown));
        assert_eq!(menu.selected(), MenuEntry::NewFile);
    }

    #[test]
    fn choosing_closes_and_reports_once() {
        let mut menu = Menu::default();
        menu.toggle();
        menu.on_button_edge(press(ButtonSymbol::DPadDown));
        menu.on_button_edge(press(ButtonSymbol::DPadDown));
        menu.on_button_edge(ButtonEdge { button: ButtonSymbol::A, pressed: false });
        assert!(menu.is_active());

        menu.on_button_edge(press(ButtonSymbol::A));
        assert!(!menu.is_active());
        assert_eq!(menu.take_chosen(), Some(MenuEntry::Save));
        assert_eq!(menu.take_chosen(), None);
    }

    #[test]
    fn cancel_closes_without_choice() {
        let mut menu = Menu::default();
        menu.toggle();
        menu.on_button_edge(press(ButtonSymbol::B));
        assert!(!menu.is_active());
        assert_eq!(menu.take_chosen(), None);
    }
}
