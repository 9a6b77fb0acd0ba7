//! Game Kernel: authoritative game state and the per-tick gameplay rules.
//!
//! # Invariants
//! - The player's height stays within the configured bounds after every mutation.
//! - The active enemy count never exceeds the configured cap.
//! - All random draws come from a caller-supplied RNG, so seeded runs replay exactly.
//! - All state mutations flow through explicit operations and are logged as events.

pub mod camera;
pub mod entity;
pub mod motion;
pub mod spawn;
pub mod world;

pub use camera::{CameraPose, CameraRig, CameraState};
pub use entity::{Entity, EntityKind};
pub use motion::MotionController;
pub use spawn::{EnemySpawn, SpawnController, SpawnState};
pub use world::{GameEvent, GameState};
