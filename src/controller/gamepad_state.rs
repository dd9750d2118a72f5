//! Controller state tracker
//!
//! Normalizes the inbound event stream into a queryable snapshot of held
//! buttons and axis samples. Trigger axes are additionally turned into
//! discrete [`ButtonSymbol::LeftTrigger`] / [`ButtonSymbol::RightTrigger`]
//! edges by threshold crossing, so downstream consumers only ever deal with
//! button edges.
//!
//! ```text
//! InputEvent ──► GamepadState::handle_event ──► ButtonEdgeListener
//!                (state bits, axis samples)      (only on transitions)
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, info};

/// Raw button code as delivered by the platform layer (SDL game controller numbering).
pub type ButtonCode = u8;

/// Raw axis code as delivered by the platform layer (SDL game controller numbering).
pub type AxisCode = u8;

/// Logical buttons known to the tracker
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ButtonSymbol {
    A,
    B,
    X,
    Y,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
    LeftShoulder,
    RightShoulder,
    /// Synthesized from the left trigger axis
    LeftTrigger,
    /// Synthesized from the right trigger axis
    RightTrigger,
    LeftStick,
    RightStick,
    Start,
    Back,
    Guide,
}

impl ButtonSymbol {
    pub const ALL: [ButtonSymbol; 17] = [
        ButtonSymbol::A,
        ButtonSymbol::B,
        ButtonSymbol::X,
        ButtonSymbol::Y,
        ButtonSymbol::DPadUp,
        ButtonSymbol::DPadDown,
        ButtonSymbol::DPadLeft,
        ButtonSymbol::DPadRight,
        ButtonSymbol::LeftShoulder,
        ButtonSymbol::RightShoulder,
        ButtonSymbol::LeftTrigger,
        ButtonSymbol::RightTrigger,
        ButtonSymbol::LeftStick,
        ButtonSymbol::RightStick,
        ButtonSymbol::Start,
        ButtonSymbol::Back,
        ButtonSymbol::Guide,
    ];

    /// Maps a raw platform code to a logical button.
    ///
    /// Triggers have no raw button code; they only exist as synthesized edges.
    pub fn from_code(code: ButtonCode) -> Option<Self> {
        match code {
            0 => Some(ButtonSymbol::A),
            1 => Some(ButtonSymbol::B),
            2 => Some(ButtonSymbol::X),
            3 => Some(ButtonSymbol::Y),
            4 => Some(ButtonSymbol::Back),
            5 => Some(ButtonSymbol::Guide),
            6 => Some(ButtonSymbol::Start),
            7 => Some(ButtonSymbol::LeftStick),
            8 => Some(ButtonSymbol::RightStick),
            9 => Some(ButtonSymbol::LeftShoulder),
            10 => Some(ButtonSymbol::RightShoulder),
            11 => Some(ButtonSymbol::DPadUp),
            12 => Some(ButtonSymbol::DPadDown),
            13 => Some(ButtonSymbol::DPadLeft),
            14 => Some(ButtonSymbol::DPadRight),
            _ => None,
        }
    }

    /// Inverse of [`ButtonSymbol::from_code`]
    pub fn code(self) -> Option<ButtonCode> {
        match self {
            ButtonSymbol::A => Some(0),
            ButtonSymbol::B => Some(1),
            ButtonSymbol::X => Some(2),
            ButtonSymbol::Y => Some(3),
            ButtonSymbol::Back => Some(4),
            ButtonSymbol::Guide => Some(5),
            ButtonSymbol::Start => Some(6),
            ButtonSymbol::LeftStick => Some(7),
            ButtonSymbol::RightStick => Some(8),
            ButtonSymbol::LeftShoulder => Some(9),
            ButtonSymbol::RightShoulder => Some(10),
            ButtonSymbol::DPadUp => Some(11),
            ButtonSymbol::DPadDown => Some(12),
            ButtonSymbol::DPadLeft => Some(13),
            ButtonSymbol::DPadRight => Some(14),
            ButtonSymbol::LeftTrigger | ButtonSymbol::RightTrigger => None,
        }
    }

    pub fn is_trigger(self) -> bool {
        matches!(self, ButtonSymbol::LeftTrigger | ButtonSymbol::RightTrigger)
    }
}

/// Analog channels, each carrying a signed 16-bit sample
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisChannel {
    LeftX,
    LeftY,
    RightX,
    RightY,
    TriggerLeft,
    TriggerRight,
}

impl AxisChannel {
    pub const ALL: [AxisChannel; 6] = [
        AxisChannel::LeftX,
        AxisChannel::LeftY,
        AxisChannel::RightX,
        AxisChannel::RightY,
        AxisChannel::TriggerLeft,
        AxisChannel::TriggerRight,
    ];

    pub fn from_code(code: AxisCode) -> Option<Self> {
        match code {
            0 => Some(AxisChannel::LeftX),
            1 => Some(AxisChannel::LeftY),
            2 => Some(AxisChannel::RightX),
            3 => Some(AxisChannel::RightY),
            4 => Some(AxisChannel::TriggerLeft),
            5 => Some(AxisChannel::TriggerRight),
            _ => None,
        }
    }

    pub fn code(self) -> AxisCode {
        match self {
            AxisChannel::LeftX => 0,
            AxisChannel::LeftY => 1,
            AxisChannel::RightX => 2,
            AxisChannel::RightY => 3,
            AxisChannel::TriggerLeft => 4,
            AxisChannel::TriggerRight => 5,
        }
    }

    /// The synthetic button driven by this channel, if it is a trigger
    pub fn trigger_button(self) -> Option<ButtonSymbol> {
        match self {
            AxisChannel::TriggerLeft => Some(ButtonSymbol::LeftTrigger),
            AxisChannel::TriggerRight => Some(ButtonSymbol::RightTrigger),
            _ => None,
        }
    }
}

/// Inbound event from the platform input layer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    ButtonDown { code: ButtonCode, repeat: bool },
    ButtonUp { code: ButtonCode },
    AxisMotion { code: AxisCode, value: i16 },
    DeviceAdded { id: usize },
    DeviceRemoved { id: usize },
    DeviceRemapped { id: usize },
}

/// A press or release of a logical button
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonEdge {
    pub button: ButtonSymbol,
    pub pressed: bool,
}

impl fmt::Display for ButtonEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.pressed { "pressed" } else { "released" };
        write!(f, "{:?} {}", self.button, state)
    }
}

/// Receives button edges from [`GamepadState::handle_event`].
///
/// The tracker has already applied the edge when the listener runs, so
/// `gamepad` reflects the post-edge state.
pub trait ButtonEdgeListener {
    fn on_button_edge(&mut self, edge: ButtonEdge, gamepad: &GamepadState);
}

impl ButtonEdgeListener for Vec<ButtonEdge> {
    fn on_button_edge(&mut self, edge: ButtonEdge, _gamepad: &GamepadState) {
        self.push(edge);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GamepadError {
    #[error("Unknown button code: {0}")]
    UnknownButton(ButtonCode),
}

/// Snapshot of the controller, mutated only through [`GamepadState::handle_event`]
#[derive(Clone, Debug)]
pub struct GamepadState {
    buttons: HashMap<ButtonSymbol, bool>,
    axes: HashMap<AxisChannel, i16>,
    trigger_threshold: i16,
}

impl Default for GamepadState {
    fn default() -> Self {
        Self::new()
    }
}

impl GamepadState {
    /// Half of the positive axis range
    pub const TRIGGER_THRESHOLD: i16 = i16::MAX / 2;

    pub fn new() -> Self {
        Self {
            buttons: ButtonSymbol::ALL.iter().map(|b| (*b, false)).collect(),
            axes: AxisChannel::ALL.iter().map(|a| (*a, 0)).collect(),
            trigger_threshold: Self::TRIGGER_THRESHOLD,
        }
    }

    /// Applies one inbound event and notifies `listener` of every resulting edge.
    pub fn handle_event(&mut self, event: &InputEvent, listener: &mut dyn ButtonEdgeListener) {
        match *event {
            InputEvent::ButtonDown { code, repeat } => {
                let Some(button) = ButtonSymbol::from_code(code) else {
                    debug!("Ignoring press of unknown button code {}", code);
                    return;
                };
                if repeat {
                    debug!("Ignoring repeated press of {:?}", button);
                    return;
                }
                self.set_button(button, true, listener);
            }
            InputEvent::ButtonUp { code } => {
                let Some(button) = ButtonSymbol::from_code(code) else {
                    debug!("Ignoring release of unknown button code {}", code);
                    return;
                };
                debug_assert!(
                    self.is_pressed(button),
                    "release of {:?} which is not held",
                    button
                );
                self.set_button(button, false, listener);
            }
            InputEvent::AxisMotion { code, value } => {
                let Some(channel) = AxisChannel::from_code(code) else {
                    debug!("Ignoring motion on unknown axis code {}", code);
                    return;
                };
                let previous = self.axes.insert(channel, value).unwrap_or(0);

                if let Some(button) = channel.trigger_button() {
                    let was_down = previous >= self.trigger_threshold;
                    let is_down = value >= self.trigger_threshold;
                    if was_down != is_down {
                        self.set_button(button, is_down, listener);
                    }
                }
            }
            InputEvent::DeviceAdded { id } => info!("Controller {} added", id),
            InputEvent::DeviceRemoved { id } => info!("Controller {} removed", id),
            InputEvent::DeviceRemapped { id } => info!("Controller {} remapped", id),
        }
    }

    fn set_button(
        &mut self,
        button: ButtonSymbol,
        pressed: bool,
        listener: &mut dyn ButtonEdgeListener,
    ) {
        let previous = self.buttons.insert(button, pressed).unwrap_or(false);
        if previous == pressed {
            debug!("No transition for {:?} (still {})", button, pressed);
            return;
        }

        let edge = ButtonEdge { button, pressed };
        debug!("Button edge: {}", edge);
        listener.on_button_edge(edge, &*self);
    }

    pub fn is_pressed(&self, button: ButtonSymbol) -> bool {
        self.buttons.get(&button).copied().unwrap_or(false)
    }

    /// Like [`GamepadState::is_pressed`], addressed by raw platform code
    pub fn is_pressed_code(&self, code: ButtonCode) -> Result<bool, GamepadError> {
        ButtonSymbol::from_code(code)
            .map(|button| self.is_pressed(button))
            .ok_or(GamepadError::UnknownButton(code))
    }

    pub fn buttons_pressed(&self) -> HashSet<ButtonSymbol> {
        self.buttons
            .iter()
            .filter(|(_, pressed)| **pressed)
            .map(|(button, _)| *button)
            .collect()
    }

    pub fn axis(&self, channel: AxisChannel) -> i16 {
        self.axes.get(&channel).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn down(button: ButtonSymbol) -> InputEvent {
        InputEvent::ButtonDown {
            code: button.code().unwrap(),
            repeat: false,
        }
    }

    fn up(button: ButtonSymbol) -> InputEvent {
        InputEvent::ButtonUp {
            code: button.code().unwrap(),
        }
    }

    fn axis(channel: AxisChannel, value: i16) -> InputEvent {
        InputEvent::AxisMotion {
            code: channel.code(),
            value,
        }
    }

    #[test]
    fn starts_with_everything_released() {
        let state = GamepadState::new();
        assert!(state.buttons_pressed().is_empty());
        for button in ButtonSymbol::ALL {
            assert!(!state.is_pressed(button));
        }
        for channel in AxisChannel::ALL {
            assert_eq!(state.axis(channel), 0);
        }
    }

    #[test]
    fn press_and_release_emit_one_edge_each() {
        let mut state = GamepadState::new();
        let mut edges: Vec<ButtonEdge> = Vec::new();

        state.handle_event(&down(ButtonSymbol::A), &mut edges);
        assert!(state.is_pressed(ButtonSymbol::A));
        state.handle_event(&up(ButtonSymbol::A), &mut edges);
        assert!(!state.is_pressed(ButtonSymbol::A));

        assert_eq!(
            edges,
            vec![
                ButtonEdge { button: ButtonSymbol::A, pressed: true },
                ButtonEdge { button: ButtonSymbol::A, pressed: false },
            ]
        );
    }

    #[test]
    fn repeated_presses_are_ignored() {
        let mut state = GamepadState::new();
        let mut edges: Vec<ButtonEdge> = Vec::new();

        state.handle_event(&down(ButtonSymbol::X), &mut edges);
        state.handle_event(
            &InputEvent::ButtonDown { code: 2, repeat: true },
            &mut edges,
        );
        // a second non-repeat press without release is not a transition either
        state.handle_event(&down(ButtonSymbol::X), &mut edges);

        assert_eq!(edges.len(), 1);
        assert!(state.is_pressed(ButtonSymbol::X));
    }

    #[test]
    fn unknown_codes_change_nothing() {
        let mut state = GamepadState::new();
        let mut edges: Vec<ButtonEdge> = Vec::new();

        state.handle_event(&InputEvent::ButtonDown { code: 200, repeat: false }, &mut edges);
        state.handle_event(&InputEvent::ButtonUp { code: 200 }, &mut edges);
        state.handle_event(&InputEvent::AxisMotion { code: 42, value: 30000 }, &mut edges);

        assert!(edges.is_empty());
        assert!(state.buttons_pressed().is_empty());
        assert_eq!(state.buttons.len(), ButtonSymbol::ALL.len());
        assert_eq!(state.axes.len(), AxisChannel::ALL.len());
    }

    #[test]
    fn device_events_have_no_effect() {
        let mut state = GamepadState::new();
        let mut edges: Vec<ButtonEdge> = Vec::new();
        state.handle_event(&down(ButtonSymbol::B), &mut edges);

        state.handle_event(&InputEvent::DeviceAdded { id: 1 }, &mut edges);
        state.handle_event(&InputEvent::DeviceRemapped { id: 1 }, &mut edges);
        state.handle_event(&InputEvent::DeviceRemoved { id: 1 }, &mut edges);

        assert_eq!(edges.len(), 1);
        assert!(state.is_pressed(ButtonSymbol::B));
    }

    #[test]
    fn stable_trigger_sample_emits_a_single_press() {
        let mut state = GamepadState::new();
        let mut edges: Vec<ButtonEdge> = Vec::new();

        for _ in 0..5 {
            state.handle_event(&axis(AxisChannel::TriggerRight, 30000), &mut edges);
        }
        assert_eq!(
            edges,
            vec![ButtonEdge { button: ButtonSymbol::RightTrigger, pressed: true }]
        );
        assert!(state.is_pressed(ButtonSymbol::RightTrigger));
        assert_eq!(state.axis(AxisChannel::TriggerRight), 30000);

        for value in [1000, 500, 0] {
            state.handle_event(&axis(AxisChannel::TriggerRight, value), &mut edges);
        }
        assert_eq!(edges.len(), 2);
        assert_eq!(
            edges[1],
            ButtonEdge { button: ButtonSymbol::RightTrigger, pressed: false }
        );
        assert!(!state.is_pressed(ButtonSymbol::RightTrigger));
    }

    #[rstest]
    #[case(GamepadState::TRIGGER_THRESHOLD - 1, false)]
    #[case(GamepadState::TRIGGER_THRESHOLD, true)]
    #[case(i16::MAX, true)]
    fn trigger_threshold_is_inclusive(#[case] value: i16, #[case] pressed: bool) {
        let mut state = GamepadState::new();
        let mut edges: Vec<ButtonEdge> = Vec::new();
        state.handle_event(&axis(AxisChannel::TriggerLeft, value), &mut edges);
        assert_eq!(state.is_pressed(ButtonSymbol::LeftTrigger), pressed);
        assert_eq!(edges.len(), usize::from(pressed));
    }

    #[test]
    fn stick_motion_never_produces_edges() {
        let mut state = GamepadState::new();
        let mut edges: Vec<ButtonEdge> = Vec::new();
        state.handle_event(&axis(AxisChannel::LeftX, i16::MAX), &mut edges);
        state.handle_event(&axis(AxisChannel::RightY, i16::MIN), &mut edges);
        assert!(edges.is_empty());
        assert_eq!(state.axis(AxisChannel::RightY), i16::MIN);
    }

    #[test]
    fn buttons_pressed_lists_held_buttons() {
        let mut state = GamepadState::new();
        let mut edges: Vec<ButtonEdge> = Vec::new();
        state.handle_event(&down(ButtonSymbol::Y), &mut edges);
        state.handle_event(&down(ButtonSymbol::LeftShoulder), &mut edges);
        state.handle_event(&axis(AxisChannel::TriggerLeft, i16::MAX), &mut edges);

        let expected: HashSet<_> = [
            ButtonSymbol::Y,
            ButtonSymbol::LeftShoulder,
            ButtonSymbol::LeftTrigger,
        ]
        .into_iter()
        .collect();
        assert_eq!(state.buttons_pressed(), expected);
    }

    #[test]
    fn code_based_lookup_rejects_unknown_codes() {
        let mut state = GamepadState::new();
        state.handle_event(&down(ButtonSymbol::Start), &mut Vec::<ButtonEdge>::new());

        assert!(state.is_pressed_code(6).unwrap());
        assert!(!state.is_pressed_code(0).unwrap());
        assert!(matches!(
            state.is_pressed_code(99),
            Err(GamepadError::UnknownButton(99))
        ));
    }

    #[test]
    fn listener_sees_post_edge_state() {
        struct Probe(Vec<bool>);
        impl ButtonEdgeListener for Probe {
            fn on_button_edge(&mut self, edge: ButtonEdge, gamepad: &GamepadState) {
                self.0.push(gamepad.is_pressed(edge.button));
            }
        }

        let mut state = GamepadState::new();
        let mut probe = Probe(Vec::new());
        state.handle_event(&down(ButtonSymbol::DPadUp), &mut probe);
        state.handle_event(&up(ButtonSymbol::DPadUp), &mut probe);
        assert_eq!(probe.0, vec![true, false]);
    }

    #[test]
    fn codes_round_trip_for_physical_buttons() {
        for button in ButtonSymbol::ALL {
            match button.code() {
                Some(code) => assert_eq!(ButtonSymbol::from_code(code), Some(button)),
                None => assert!(button.is_trigger()),
            }
        }
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "not held")]
    fn release_of_released_button_asserts_in_debug() {
        let mut state = GamepadState::new();
        state.handle_event(&up(ButtonSymbol::B), &mut Vec::<ButtonEdge>::new());
    }
}
