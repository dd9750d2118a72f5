//! Multi-tap text entry driven by gamepad button edges
//!
//! Repeated presses of one button cycle through that button's
//! [`CharacterGroup`]; the selected candidate is committed ("flushed") when a
//! different group is pressed, an edit action runs, the modifier layer
//! changes, or [`COMMIT_TIMEOUT`] passes without further cycling.
//!
//! # State machine
//!
//! ```text
//!            cycle-press                 same group: advance
//!   Idle ───────────────────► Cycling ◄──────────────┐
//!    ▲                          │  │                  │
//!    │   flush (group switch,   │  └──────────────────┘
//!    └── action, layer switch, ─┘
//!        timeout)
//! ```
//!
//! The caps button ([`CAPS_BUTTON`]) toggles uppercase. Holding it through a
//! flush turns on caps-lock, which lasts until the button is released.

use crate::controller::gamepad_state::{ButtonEdge, ButtonEdgeListener, ButtonSymbol, GamepadState};
use crate::mapping::character_groups::{
    self, binding, Binding, CharacterGroup, EditAction, ModifierLayer, CAPS_BUTTON,
};
use crate::mapping::sink::{CursorColor, TextSink};
use std::time::Duration;
use tracing::{debug, info};

/// Time without cycling after which the pending candidate is committed
pub const COMMIT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Position inside the group currently being cycled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Cycle {
    layer: ModifierLayer,
    button: ButtonSymbol,
    group: &'static CharacterGroup,
    index: usize,
}

impl Cycle {
    fn candidate(&self) -> char {
        self.group.candidate(self.index)
    }
}

/// Mutable part of the controller
#[derive(Clone, Debug, Default)]
pub struct CyclicInputSession {
    pending: Option<Cycle>,
    elapsed_since_cycle: Duration,
    uppercase: bool,
    caps_lock: bool,
}

impl CyclicInputSession {
    pub fn pending_char(&self) -> Option<char> {
        self.pending.map(|cycle| cycle.candidate())
    }

    pub fn elapsed_since_cycle(&self) -> Duration {
        self.elapsed_since_cycle
    }

    pub fn uppercase(&self) -> bool {
        self.uppercase
    }

    pub fn caps_lock(&self) -> bool {
        self.caps_lock
    }
}

/// Cyclic text input bound to one [`TextSink`]
#[derive(Debug)]
pub struct TextInputController<S: TextSink> {
    sink: S,
    session: CyclicInputSession,
}

impl<S: TextSink> TextInputController<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            session: CyclicInputSession::default(),
        }
    }

    pub fn session(&self) -> &CyclicInputSession {
        &self.session
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Unbinds the sink. A pending candidate is discarded, not committed.
    pub fn detach(self) -> S {
        if let Some(ch) = self.session.pending_char() {
            debug!("Discarding pending '{}' on detach", ch);
        }
        self.sink
    }

    /// Per-frame tick; commits the pending candidate once [`COMMIT_TIMEOUT`] has passed.
    pub fn update(&mut self, elapsed: Duration, gamepad: &GamepadState) {
        if self.session.pending.is_none() {
            return;
        }
        self.session.elapsed_since_cycle += elapsed;
        if self.session.elapsed_since_cycle >= COMMIT_TIMEOUT {
            debug!(
                "Commit timeout after {:?}",
                self.session.elapsed_since_cycle
            );
            self.flush(gamepad);
        }
    }

    fn on_press(&mut self, button: ButtonSymbol, gamepad: &GamepadState) {
        if button == CAPS_BUTTON {
            self.toggle_uppercase();
            return;
        }
        if button.is_trigger() {
            self.switch_layer(button, true, gamepad);
            return;
        }

        let layer = ModifierLayer::active(gamepad);
        match binding(layer, button) {
            Some(Binding::Group(group)) => self.cycle(layer, button, group, gamepad),
            Some(Binding::Action(action)) => self.apply_action(action, gamepad),
            None => debug!("No binding for {:?} under {:?}", button, layer),
        }
    }

    fn on_release(&mut self, button: ButtonSymbol, gamepad: &GamepadState) {
        if button == CAPS_BUTTON {
            if self.session.caps_lock {
                debug!("Caps-lock released");
                self.session.caps_lock = false;
                self.session.uppercase = false;
                self.refresh_preview();
            }
            return;
        }
        if button.is_trigger() {
            self.switch_layer(button, false, gamepad);
        }
    }

    fn cycle(
        &mut self,
        layer: ModifierLayer,
        button: ButtonSymbol,
        group: &'static CharacterGroup,
        gamepad: &GamepadState,
    ) {
        let next = match self.session.pending {
            Some(cycle) if cycle.layer == layer && cycle.button == button => Cycle {
                index: group.next_index(cycle.index),
                ..cycle
            },
            Some(_) => {
                self.flush(gamepad);
                Cycle { layer, button, group, index: 0 }
            }
            None => Cycle { layer, button, group, index: 0 },
        };

        debug!("Cycling {:?}: '{}'", button, next.candidate());
        self.session.pending = Some(next);
        self.session.elapsed_since_cycle = Duration::ZERO;
        self.refresh_preview();
    }

    fn apply_action(&mut self, action: EditAction, gamepad: &GamepadState) {
        self.flush(gamepad);
        debug!("Edit action {:?}", action);
        match action {
            EditAction::Newline => self.sink.put_char('\n'),
            EditAction::Space => self.sink.put_char(' '),
            EditAction::Backspace => self.sink.backspace(),
            EditAction::DeleteLine => self.sink.delete_line(),
        }
    }

    fn switch_layer(&mut self, trigger: ButtonSymbol, pressed: bool, gamepad: &GamepadState) {
        let left = gamepad.is_pressed(ButtonSymbol::LeftTrigger);
        let right = gamepad.is_pressed(ButtonSymbol::RightTrigger);
        let before = match trigger {
            ButtonSymbol::LeftTrigger => ModifierLayer::from_triggers(!pressed, right),
            _ => ModifierLayer::from_triggers(left, !pressed),
        };
        let after = ModifierLayer::from_triggers(left, right);

        if before != after {
            debug!("Layer switch {:?} -> {:?}", before, after);
            self.flush(gamepad);
        }
        self.sink.set_cursor_color(cursor_color(after));
    }

    fn toggle_uppercase(&mut self) {
        self.session.uppercase = !self.session.uppercase;
        self.session.elapsed_since_cycle = Duration::ZERO;
        debug!("Uppercase: {}", self.session.uppercase);
        self.refresh_preview();
    }

    /// Commits the pending candidate, if any. The only path that calls `put_char` for cycled input.
    fn flush(&mut self, gamepad: &GamepadState) {
        let Some(cycle) = self.session.pending.take() else {
            return;
        };

        let ch = self.apply_case(cycle.candidate());
        info!("Committing '{}'", ch.escape_debug());
        self.sink.put_char(ch);
        self.sink.set_cursor_preview(None);
        self.session.elapsed_since_cycle = Duration::ZERO;

        if gamepad.is_pressed(CAPS_BUTTON) {
            self.session.caps_lock = true;
        } else if !self.session.caps_lock {
            self.session.uppercase = false;
        }
    }

    fn refresh_preview(&mut self) {
        if let Some(cycle) = self.session.pending {
            let ch = self.apply_case(cycle.candidate());
            self.sink.set_cursor_preview(Some(ch));
        }
    }

    fn apply_case(&self, ch: char) -> char {
        if self.session.uppercase {
            ch.to_ascii_uppercase()
        } else {
            ch
        }
    }

    /// Hint line for the host to render each frame.
    ///
    /// Idle: every bound button of the active layer with its legend.
    /// Cycling: the active group with the selected candidate bracketed.
    pub fn status_line(&self, gamepad: &GamepadState) -> String {
        let line = match self.session.pending {
            Some(cycle) => cycle
                .group
                .chars()
                .iter()
                .enumerate()
                .map(|(i, ch)| {
                    if i == cycle.index {
                        format!("[{}]", ch)
                    } else {
                        ch.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(" "),
            None => character_groups::bindings(ModifierLayer::active(gamepad))
                .iter()
                .map(|(button, binding)| {
                    format!("{}:{}", character_groups::button_label(*button), binding)
                })
                .collect::<Vec<_>>()
                .join(" "),
        };

        if self.session.uppercase {
            line.to_ascii_uppercase()
        } else {
            line
        }
    }
}

impl<S: TextSink> ButtonEdgeListener for TextInputController<S> {
    fn on_button_edge(&mut self, edge: ButtonEdge, gamepad: &GamepadState) {
        if edge.pressed {
            self.on_press(edge.button, gamepad);
        } else {
            self.on_release(edge.button, gamepad);
        }
    }
}

pub fn cursor_color(layer: ModifierLayer) -> CursorColor {
    match layer {
        ModifierLayer::Letters => CursorColor::Default,
        ModifierLayer::Symbols => CursorColor::SymbolLayer,
        ModifierLayer::Actions => CursorColor::ActionLayer,
    }
}
