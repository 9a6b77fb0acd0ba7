use glam::Vec3;
use skyrun_common::{EntityId, Transform};

use crate::spawn::EnemySpawn;

/// What an entity is, plus the behaviour data that only that kind carries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityKind {
    Player,
    /// An enemy cloned from the archetype at `archetype`, moving +Z at `speed` units/s.
    Enemy { archetype: usize, speed: f32 },
}

/// Plain gameplay record for the player or an enemy.
///
/// Rendering never owns this; the scene adapter copies it into renderer nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub position: Vec3,
    /// Yaw in radians about +Y.
    pub rotation_y: f32,
    pub scale: f32,
    pub kind: EntityKind,
}

impl Entity {
    pub fn player(id: EntityId, position: Vec3, scale: f32) -> Self {
        Self {
            id,
            position,
            rotation_y: 0.0,
            scale,
            kind: EntityKind::Player,
        }
    }

    pub fn enemy(id: EntityId, spawn: &EnemySpawn) -> Self {
        Self {
            id,
            position: spawn.position,
            rotation_y: 0.0,
            scale: spawn.scale,
            kind: EntityKind::Enemy {
                archetype: spawn.archetype,
                speed: spawn.speed,
            },
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, EntityKind::Player)
    }

    /// Forward speed, for enemies only.
    pub fn speed(&self) -> Option<f32> {
        match self.kind {
            EntityKind::Enemy { speed, .. } => Some(speed),
            EntityKind::Player => None,
        }
    }

    /// Archetype index, for enemies only.
    pub fn archetype(&self) -> Option<usize> {
        match self.kind {
            EntityKind::Enemy { archetype, .. } => Some(archetype),
            EntityKind::Player => None,
        }
    }

    pub fn transform(&self) -> Transform {
        Transform::from_yaw(self.position, self.rotation_y, self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_has_no_speed() {
        let p = Entity::player(EntityId(0), Vec3::new(0.0, 0.5, 0.0), 4.0);
        assert!(p.is_player());
        assert_eq!(p.speed(), None);
        assert_eq!(p.archetype(), None);
        assert_eq!(p.transform().scale, Vec3::splat(4.0));
    }

    #[test]
    fn enemy_copies_spawn_parameters() {
        let spawn = EnemySpawn {
            archetype: 2,
            scale: 3.5,
            position: Vec3::new(-4.0, 3.0, -80.0),
            speed: 8.0,
        };
        let e = Entity::enemy(EntityId(7), &spawn);
        assert!(!e.is_player());
        assert_eq!(e.speed(), Some(8.0));
        assert_eq!(e.archetype(), Some(2));
        assert_eq!(e.position, spawn.position);
        assert_eq!(e.scale, 3.5);
    }
}
