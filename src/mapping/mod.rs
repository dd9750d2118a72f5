//! Turns controller button edges into text.
//!
//! [`cyclic_input::TextInputController`] runs the multi-tap state machine
//! over the static tables in [`character_groups`] and writes every commit
//! through the [`sink::TextSink`] boundary.

pub mod character_groups;
pub mod cyclic_input;
pub mod sink;

pub use character_groups::{Binding, CharacterGroup, EditAction, ModifierLayer};
pub use cyclic_input::{CyclicInputSession, TextInputController, COMMIT_TIMEOUT};
pub use sink::{CursorColor, TextSink};
