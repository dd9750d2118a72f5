use crate::controller::gamepad_state::{AxisChannel, ButtonCode, ButtonSymbol, InputEvent};
use gilrs::{Axis, Button, Event, EventType, Gamepad, GamepadId, Gilrs};
use statum::{machine, state};
use tracing::{debug, error, info, warn};

// Codes outside the tracked set, forwarded so the tracker can log and drop them
const CODE_MISC: ButtonCode = 15;
const CODE_PADDLE: ButtonCode = 16;
const CODE_UNKNOWN: ButtonCode = ButtonCode::MAX;

// Collector settings
#[derive(Clone, Debug)]
pub struct CollectorSettings {
    pub joystick_deadzone: f32,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            joystick_deadzone: 0.05,
        }
    }
}

// Collector errors
#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    #[error("Failed to initialize collector: {0}")]
    InitializationError(String),
}

#[state]
#[derive(Debug, Clone)]
pub enum CollectionState {
    Initializing,
    Collecting,
}

/// Polls gilrs and converts its events into [`InputEvent`]s
#[machine]
pub struct EventCollector<S: CollectionState> {
    // Gilrs context
    gilrs: Gilrs,

    // Gamepad whose events are forwarded; others are skipped
    active_gamepad: Option<GamepadId>,

    settings: CollectorSettings,
}

impl EventCollector<Initializing> {
    pub fn create(settings: Option<CollectorSettings>) -> Result<Self, CollectorError> {
        let settings = settings.unwrap_or_default();
        debug!("Creating Event Collector with settings: {:?}", settings);

        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(CollectorError::InitializationError(e.to_string()));
            }
        };

        Ok(Self::new(gilrs, None, settings))
    }

    /// Picks the first connected gamepad and transitions to Collecting
    pub fn initialize(mut self) -> EventCollector<Collecting> {
        let gamepads: Vec<(GamepadId, Gamepad<'_>)> = self.gilrs.gamepads().collect();

        if gamepads.is_empty() {
            warn!("No gamepad connected, waiting for one to appear");
        } else {
            info!("Found {} gamepads:", gamepads.len());
            for (idx, (id, gamepad)) in gamepads.iter().enumerate() {
                info!("  [{}] ID: {}, Name: {}", idx, id, gamepad.name());
            }
            let (id, gamepad) = &gamepads[0];
            info!("Selected gamepad: {} ({})", gamepad.name(), id);
            self.active_gamepad = Some(*id);
        }

        info!("Event Collector initialized, transitioning to Collecting state");
        self.transition()
    }
}

impl EventCollector<Collecting> {
    /// Drains every queued gilrs event, in arrival order
    pub fn drain(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();

        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            match (self.active_gamepad, &event) {
                (None, EventType::Connected) => {
                    info!("Adopting newly connected gamepad {}", id);
                    self.active_gamepad = Some(id);
                }
                (Some(active_id), _) if active_id != id => {
                    debug!("Skipping event from non-active gamepad: {:?}", id);
                    continue;
                }
                (Some(_), EventType::Disconnected) => {
                    warn!("Active gamepad {} disconnected", id);
                    self.active_gamepad = None;
                }
                _ => {}
            }

            if let Some(input_event) = convert_gilrs_event(id, event, &self.settings) {
                events.push(input_event);
            }
        }

        events
    }
}

/// Converts one gilrs event; `None` when the event carries nothing the tracker consumes
pub fn convert_gilrs_event(
    id: GamepadId,
    event: EventType,
    settings: &CollectorSettings,
) -> Option<InputEvent> {
    match event {
        EventType::ButtonPressed(Button::LeftTrigger2 | Button::RightTrigger2, _)
        | EventType::ButtonReleased(Button::LeftTrigger2 | Button::RightTrigger2, _) => {
            // analog value arrives through ButtonChanged
            None
        }
        EventType::ButtonPressed(button, _) => Some(InputEvent::ButtonDown {
            code: button_code(button),
            repeat: false,
        }),
        EventType::ButtonRepeated(button, _) => Some(InputEvent::ButtonDown {
            code: button_code(button),
            repeat: true,
        }),
        EventType::ButtonReleased(button, _) => Some(InputEvent::ButtonUp {
            code: button_code(button),
        }),
        EventType::ButtonChanged(Button::LeftTrigger2, value, _) => Some(InputEvent::AxisMotion {
            code: AxisChannel::TriggerLeft.code(),
            value: axis_sample(value),
        }),
        EventType::ButtonChanged(Button::RightTrigger2, value, _) => {
            Some(InputEvent::AxisMotion {
                code: AxisChannel::TriggerRight.code(),
                value: axis_sample(value),
            })
        }
        EventType::AxisChanged(axis, value, _) => {
            let deadzone = settings.joystick_deadzone;
            let (channel, value) = match axis {
                Axis::LeftStickX => (AxisChannel::LeftX, apply_deadzone(value, deadzone)),
                // gilrs reports up as positive, the inbound convention is down-positive
                Axis::LeftStickY => (AxisChannel::LeftY, -apply_deadzone(value, deadzone)),
                Axis::RightStickX => (AxisChannel::RightX, apply_deadzone(value, deadzone)),
                Axis::RightStickY => (AxisChannel::RightY, -apply_deadzone(value, deadzone)),
                Axis::LeftZ => (AxisChannel::TriggerLeft, value),
                Axis::RightZ => (AxisChannel::TriggerRight, value),
                _ => {
                    debug!("Ignoring unsupported axis: {:?}", axis);
                    return None;
                }
            };
            Some(InputEvent::AxisMotion {
                code: channel.code(),
                value: axis_sample(value),
            })
        }
        EventType::Connected => Some(InputEvent::DeviceAdded { id: id.into() }),
        EventType::Disconnected => Some(InputEvent::DeviceRemoved { id: id.into() }),
        _ => {
            debug!("Unhandled event type: {:?}", event);
            None
        }
    }
}

fn button_code(button: Button) -> ButtonCode {
    let symbol = match button {
        Button::South => ButtonSymbol::A,
        Button::East => ButtonSymbol::B,
        Button::West => ButtonSymbol::X,
        Button::North => ButtonSymbol::Y,
        Button::Select => ButtonSymbol::Back,
        Button::Mode => ButtonSymbol::Guide,
        Button::Start => ButtonSymbol::Start,
        Button::LeftThumb => ButtonSymbol::LeftStick,
        Button::RightThumb => ButtonSymbol::RightStick,
        Button::LeftTrigger => ButtonSymbol::LeftShoulder,
        Button::RightTrigger => ButtonSymbol::RightShoulder,
        Button::DPadUp => ButtonSymbol::DPadUp,
        Button::DPadDown => ButtonSymbol::DPadDown,
        Button::DPadLeft => ButtonSymbol::DPadLeft,
        Button::DPadRight => ButtonSymbol::DPadRight,
        Button::C => return CODE_MISC,
        Button::Z => return CODE_PADDLE,
        _ => return CODE_UNKNOWN,
    };
    symbol.code().unwrap_or(CODE_UNKNOWN)
}

/// Scales a gilrs value in -1.0..=1.0 to the signed 16-bit sample range
fn axis_sample(value: f32) -> i16 {
    (value.clamp(-1.0, 1.0) * f32::from(i16::MAX)).round() as i16
}

// Helper function to apply deadzone to analog stick values
fn apply_deadzone(value: f32, deadzone: f32) -> f32 {
    if value.abs() < deadzone {
        0.0
    } else {
        // Rescale the value to the range outside the deadzone
        let sign = if value < 0.0 { -1.0 } else { 1.0 };
        sign * (value.abs() - deadzone) / (1.0 - deadzone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_buttons_follow_positional_layout() {
        assert_eq!(button_code(Button::South), 0);
        assert_eq!(button_code(Button::East), 1);
        assert_eq!(button_code(Button::West), 2);
        assert_eq!(button_code(Button::North), 3);
        assert_eq!(
            ButtonSymbol::from_code(button_code(Button::LeftTrigger)),
            Some(ButtonSymbol::LeftShoulder)
        );
    }

    #[test]
    fn extra_buttons_map_to_untracked_codes() {
        for button in [Button::C, Button::Z, Button::Unknown] {
            assert_eq!(ButtonSymbol::from_code(button_code(button)), None);
        }
    }

    #[test]
    fn axis_samples_cover_signed_range() {
        assert_eq!(axis_sample(0.0), 0);
        assert_eq!(axis_sample(1.0), i16::MAX);
        assert_eq!(axis_sample(-1.0), -i16::MAX);
        assert_eq!(axis_sample(7.5), i16::MAX);
        assert_eq!(axis_sample(0.5), 16384);
    }

    #[test]
    fn deadzone_zeroes_small_values_and_rescales_the_rest() {
        assert_eq!(apply_deadzone(0.04, 0.05), 0.0);
        assert_eq!(apply_deadzone(1.0, 0.05), 1.0);
        assert_eq!(apply_deadzone(-1.0, 0.05), -1.0);
        assert!((apply_deadzone(0.525, 0.05) - 0.5).abs() < 1e-6);
    }
}
