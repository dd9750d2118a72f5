//! Controller subsystem for gamepad input handling
//!
//! Implements a two-stage pipeline, both stages running on the frame thread:
//!
//! 1. [`event_collector`] - Raw gamepad input collection via gilrs
//! 2. [`gamepad_state`] - State tracking and button edge detection
//!
//! # Architecture
//!
//! ```text
//! Gamepad ──► Collector ──► GamepadState ──► ButtonEdgeListener
//!             (InputEvent)  (held buttons,    (edges only)
//!                            trigger edges)
//! ```

pub mod event_collector;
pub mod gamepad_state;

pub use event_collector::{CollectorError, CollectorSettings, EventCollector};
pub use gamepad_state::{
    AxisChannel, ButtonEdge, ButtonEdgeListener, ButtonSymbol, GamepadError, GamepadState,
    InputEvent,
};
