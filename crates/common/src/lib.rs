//! Shared types and configuration used by every skyrun crate.
//!
//! # Invariants
//! - Entity ids are never reused within a session.
//! - A validated `GameConfig` has ordered ranges and finite values only.

pub mod config;
pub mod types;

pub use config::{
    CameraConfig, ConfigError, EnemyConfig, GameConfig, ModelManifest, PlayerConfig, WorldConfig,
};
pub use types::{EntityId, Transform};
