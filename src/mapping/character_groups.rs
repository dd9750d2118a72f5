//! Static button-to-character tables for the cyclic text input
//!
//! Three mutually exclusive layers are selected by trigger state:
//!
//! | Trigger held | Layer                         | Buttons produce          |
//! |--------------|-------------------------------|--------------------------|
//! | none         | [`ModifierLayer::Letters`]    | letter groups            |
//! | left         | [`ModifierLayer::Symbols`]    | digit/punctuation groups |
//! | right        | [`ModifierLayer::Actions`]    | edit actions             |
//!
//! Lookups are total: an unbound `(layer, button)` pair yields `None`.

use crate::controller::gamepad_state::{ButtonSymbol, GamepadState};
use std::fmt;

/// Button that toggles uppercase and, when held through a commit, locks it
pub const CAPS_BUTTON: ButtonSymbol = ButtonSymbol::LeftShoulder;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModifierLayer {
    Letters,
    Symbols,
    Actions,
}

impl ModifierLayer {
    /// Right trigger wins over left trigger
    pub fn from_triggers(left_held: bool, right_held: bool) -> Self {
        if right_held {
            ModifierLayer::Actions
        } else if left_held {
            ModifierLayer::Symbols
        } else {
            ModifierLayer::Letters
        }
    }

    pub fn active(gamepad: &GamepadState) -> Self {
        Self::from_triggers(
            gamepad.is_pressed(ButtonSymbol::LeftTrigger),
            gamepad.is_pressed(ButtonSymbol::RightTrigger),
        )
    }
}

/// Ordered candidates cycled through by repeated presses of one button
#[derive(Debug, PartialEq, Eq)]
pub struct CharacterGroup {
    chars: &'static [char],
}

impl CharacterGroup {
    pub const fn new(chars: &'static [char]) -> Self {
        assert!(!chars.is_empty(), "character group must not be empty");
        Self { chars }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn chars(&self) -> &'static [char] {
        self.chars
    }

    /// Candidate at `index`, wrapping around the group length
    pub fn candidate(&self, index: usize) -> char {
        self.chars[index % self.chars.len()]
    }

    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.chars.len()
    }

    /// All candidates concatenated, e.g. `abc`
    pub fn legend(&self) -> String {
        self.chars.iter().collect()
    }
}

/// Edits issued directly under the action layer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditAction {
    Newline,
    Space,
    Backspace,
    DeleteLine,
}

impl EditAction {
    pub fn legend(self) -> &'static str {
        match self {
            EditAction::Newline => "enter",
            EditAction::Space => "space",
            EditAction::Backspace => "bksp",
            EditAction::DeleteLine => "delln",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Binding {
    Group(&'static CharacterGroup),
    Action(EditAction),
}

impl Binding {
    pub fn legend(&self) -> String {
        match self {
            Binding::Group(group) => group.legend(),
            Binding::Action(action) => action.legend().to_string(),
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.legend())
    }
}

static LETTERS: [(ButtonSymbol, CharacterGroup); 8] = [
    (ButtonSymbol::A, CharacterGroup::new(&['a', 'b', 'c'])),
    (ButtonSymbol::X, CharacterGroup::new(&['d', 'e', 'f'])),
    (ButtonSymbol::Y, CharacterGroup::new(&['g', 'h', 'i'])),
    (ButtonSymbol::B, CharacterGroup::new(&['j', 'k', 'l'])),
    (ButtonSymbol::DPadDown, CharacterGroup::new(&['m', 'n', 'o'])),
    (ButtonSymbol::DPadLeft, CharacterGroup::new(&['p', 'q', 'r', 's'])),
    (ButtonSymbol::DPadUp, CharacterGroup::new(&['t', 'u', 'v'])),
    (ButtonSymbol::DPadRight, CharacterGroup::new(&['w', 'x', 'y', 'z'])),
];

static SYMBOLS: [(ButtonSymbol, CharacterGroup); 8] = [
    (ButtonSymbol::A, CharacterGroup::new(&['1', '2', '3'])),
    (ButtonSymbol::X, CharacterGroup::new(&['4', '5', '6'])),
    (ButtonSymbol::Y, CharacterGroup::new(&['7', '8', '9'])),
    (ButtonSymbol::B, CharacterGroup::new(&['0'])),
    (
        ButtonSymbol::DPadLeft,
        CharacterGroup::new(&['(', '[', '{', '<', '"', '\'']),
    ),
    (
        ButtonSymbol::DPadDown,
        CharacterGroup::new(&['.', ',', '?', '!', '_', ':', ';', '|']),
    ),
    (
        ButtonSymbol::DPadRight,
        CharacterGroup::new(&[')', ']', '}', '>', '"', '\'']),
    ),
    (
        ButtonSymbol::DPadUp,
        CharacterGroup::new(&['-', '=', '+', '*', '/', '^', '~', '#', '%', '@']),
    ),
];

static ACTIONS: [(ButtonSymbol, EditAction); 4] = [
    (ButtonSymbol::A, EditAction::Newline),
    (ButtonSymbol::X, EditAction::Space),
    (ButtonSymbol::B, EditAction::Backspace),
    (ButtonSymbol::Y, EditAction::DeleteLine),
];

/// What `button` does under `layer`, if anything
pub fn binding(layer: ModifierLayer, button: ButtonSymbol) -> Option<Binding> {
    match layer {
        ModifierLayer::Letters => group_for(&LETTERS, button),
        ModifierLayer::Symbols => group_for(&SYMBOLS, button),
        ModifierLayer::Actions => ACTIONS
            .iter()
            .find(|(bound, _)| *bound == button)
            .map(|(_, action)| Binding::Action(*action)),
    }
}

fn group_for(
    table: &'static [(ButtonSymbol, CharacterGroup)],
    button: ButtonSymbol,
) -> Option<Binding> {
    table
        .iter()
        .find(|(bound, _)| *bound == button)
        .map(|(_, group)| Binding::Group(group))
}

/// Bound buttons of `layer` in display order
pub fn bindings(layer: ModifierLayer) -> Vec<(ButtonSymbol, Binding)> {
    match layer {
        ModifierLayer::Letters => LETTERS
            .iter()
            .map(|(button, group)| (*button, Binding::Group(group)))
            .collect(),
        ModifierLayer::Symbols => SYMBOLS
            .iter()
            .map(|(button, group)| (*button, Binding::Group(group)))
            .collect(),
        ModifierLayer::Actions => ACTIONS
            .iter()
            .map(|(button, action)| (*button, Binding::Action(*action)))
            .collect(),
    }
}

/// Short on-screen label used in the status line
pub fn button_label(button: ButtonSymbol) -> &'static str {
    match button {
        ButtonSymbol::A => "A",
        ButtonSymbol::B => "B",
        ButtonSymbol::X => "X",
        ButtonSymbol::Y => "Y",
        ButtonSymbol::DPadUp => "UP",
        ButtonSymbol::DPadDown => "DN",
        ButtonSymbol::DPadLeft => "LT",
        ButtonSymbol::DPadRight => "RT",
        ButtonSymbol::LeftShoulder => "L1",
        ButtonSymbol::RightShoulder => "R1",
        ButtonSymbol::LeftTrigger => "L2",
        ButtonSymbol::RightTrigger => "R2",
        ButtonSymbol::LeftStick => "L3",
        ButtonSymbol::RightStick => "R3",
        ButtonSymbol::Start => "START",
        ButtonSymbol::Back => "BACK",
        ButtonSymbol::Guide => "GUIDE",
    }
}
