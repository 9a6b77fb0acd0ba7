use glam::Vec2;
use skyrun_common::PlayerConfig;
use skyrun_input::InputState;

use crate::entity::Entity;

/// Moves the player from input and the enemies from their own speed.
#[derive(Debug, Clone)]
pub struct MotionController {
    rotation_speed: f32,
    drag_sensitivity: Vec2,
    min_y: f32,
    max_y: f32,
}

impl MotionController {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            rotation_speed: config.rotation_speed,
            drag_sensitivity: Vec2::new(config.drag_sensitivity_x, config.drag_sensitivity_y),
            min_y: config.min_y,
            max_y: config.max_y,
        }
    }

    /// Per-tick player update: yaw from the held rotation keys.
    ///
    /// Left and right held together cancel out exactly.
    pub fn advance_player(&self, player: &mut Entity, input: &InputState, dt: f32) {
        player.rotation_y += input.rotation_axis() * self.rotation_speed * dt;
    }

    /// Per-event drag: screen-space translation, Y inverted and clamped.
    ///
    /// The delta is not rotated by the player's yaw.
    pub fn apply_drag(&self, player: &mut Entity, delta: Vec2) {
        player.position.x += delta.x * self.drag_sensitivity.x;
        player.position.y -= delta.y * self.drag_sensitivity.y;
        player.position.y = self.clamp_y(player.position.y);
    }

    /// Move every enemy forward along +Z by its own speed.
    pub fn advance_enemies<'a>(&self, enemies: impl IntoIterator<Item = &'a mut Entity>, dt: f32) {
        for enemy in enemies {
            if let Some(speed) = enemy.speed() {
                enemy.position.z += speed * dt;
            }
        }
    }

    pub fn clamp_y(&self, y: f32) -> f32 {
        y.clamp(self.min_y, self.max_y)
    }
}
