//! Rendering Adapter: renderer-agnostic interface between the game and a drawing backend.
//!
//! # Invariants
//! - Renderer cannot mutate game state; it only sees the synced `SceneGraph`.
//! - Scene nodes are derived from entities every tick, never the other way round.
//!
//! A debug text renderer implements the trait for headless runs and tests.
//! Swap in a GPU backend without changing the session.

mod renderer;
mod scene;

pub use renderer::{DebugTextRenderer, Projection, RenderView, Renderer};
pub use scene::{
    DirectionalLight, Fog, Ground, NodeKind, SceneEnvironment, SceneGraph, SceneNode, SyncStats,
};
