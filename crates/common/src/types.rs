use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Unique identifier for an entity in a game session.
///
/// Ids are handed out sequentially by the owning `GameState`, so a seeded
/// session always produces the same ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// The id that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Build a transform that only rotates about +Y and scales uniformly.
    pub fn from_yaw(position: Vec3, yaw: f32, scale: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_rotation_y(yaw),
            scale: Vec3::splat(scale),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_ids_are_sequential() {
        let a = EntityId(0);
        let b = a.next();
        assert_ne!(a, b);
        assert!(a < b);
        assert_eq!(b.to_string(), "#1");
    }

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn from_yaw_rotates_about_y_only() {
        let t = Transform::from_yaw(Vec3::new(1.0, 2.0, 3.0), std::f32::consts::FRAC_PI_2, 4.0);
        let forward = t.rotation * Vec3::Z;
        assert!(forward.abs_diff_eq(Vec3::X, 1e-6));
        assert_eq!(t.scale, Vec3::splat(4.0));
        assert_eq!(t.position.y, 2.0);
    }
}
