//! Game Loop: one session from model loading to the endless running phase.
//!
//! # Invariants
//! - `Loading -> Running` is the only phase transition and happens at most once.
//! - A failed load is terminal: the fatal error is shown once and gameplay never starts.
//! - Each tick reads one input snapshot taken at tick start.

mod clock;
mod session;

pub use clock::FrameClock;
pub use session::{GameSession, Phase, TickReport};
