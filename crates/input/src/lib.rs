//! Input: raw device events mapped to an `InputState` snapshot plus discrete actions.
//!
//! # Invariants
//! - Gameplay code reads `InputState` and `Action`, never raw events.
//! - Held-key state only changes on key and pointer events, never on ticks.

pub mod action;
pub mod state;

pub use action::{Action, InputEvent, LogicalKey};
pub use state::InputState;
