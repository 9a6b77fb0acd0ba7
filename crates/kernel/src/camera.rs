use glam::{Quat, Vec3};
use skyrun_common::CameraConfig;

/// Camera position and the point it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

/// Zoomable follow offset. The offset length is the zoom distance.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraState {
    offset: Vec3,
    min_zoom: f32,
    max_zoom: f32,
    wheel_scale: f32,
}

impl CameraState {
    /// A non-zero configured offset outside the zoom range is rescaled into it.
    pub fn new(config: &CameraConfig) -> Self {
        let mut state = Self {
            offset: config.offset,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            wheel_scale: config.wheel_scale,
        };
        if let Some(dir) = state.offset.try_normalize() {
            state.offset = dir * state.clamp_zoom(state.offset.length());
        }
        state
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    pub fn zoom_distance(&self) -> f32 {
        self.offset.length()
    }

    /// Apply a wheel delta. Direction is kept, distance is clamped.
    ///
    /// Returns false when the offset has no direction to rescale along.
    pub fn apply_wheel(&mut self, delta: f32) -> bool {
        let Some(dir) = self.offset.try_normalize() else {
            tracing::warn!("zoom ignored: camera offset has zero length");
            return false;
        };
        if !delta.is_finite() {
            return false;
        }
        let distance = self.clamp_zoom(self.offset.length() + delta * self.wheel_scale);
        self.offset = dir * distance;
        tracing::trace!(distance, "camera zoom");
        true
    }

    fn clamp_zoom(&self, distance: f32) -> f32 {
        distance.clamp(self.min_zoom, self.max_zoom)
    }
}

/// Places the camera behind the player, turning with the player's yaw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    look_at_height: f32,
}

impl CameraRig {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            look_at_height: config.look_at_height,
        }
    }

    pub fn compute_pose(&self, player_position: Vec3, player_yaw: f32, offset: Vec3) -> CameraPose {
        let rotated = Quat::from_rotation_y(player_yaw) * offset;
        CameraPose {
            position: player_position + rotated,
            look_at: player_position + Vec3::Y * self.look_at_height,
        }
    }
}
