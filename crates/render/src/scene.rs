use glam::{Vec2, Vec3};
use skyrun_assets::{LoadedModels, ModelTemplate};
use skyrun_common::{EntityId, Transform};
use skyrun_kernel::{Entity, EntityKind, GameState};
use std::collections::BTreeMap;

/// Linear fog between two distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: u32,
    pub near: f32,
    pub far: f32,
}

/// Shadow-casting sun light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: u32,
    pub intensity: f32,
    pub position: Vec3,
    pub shadow_map_size: u32,
}

/// Scrolling checker-textured ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ground {
    pub width: f32,
    pub length: f32,
    /// How many times the texture tiles across the plane.
    pub texture_repeat: Vec2,
    pub colors: [u32; 2],
}

/// Static scene setup, handed to the renderer once before the first frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneEnvironment {
    pub background: u32,
    pub fog: Fog,
    pub ambient_color: u32,
    pub ambient_intensity: f32,
    pub sun: DirectionalLight,
    pub ground: Ground,
}

impl Default for SceneEnvironment {
    fn default() -> Self {
        Self {
            background: 0x87ceeb,
            fog: Fog {
                color: 0x87ceeb,
                near: 30.0,
                far: 80.0,
            },
            ambient_color: 0xffffff,
            ambient_intensity: 0.5,
            sun: DirectionalLight {
                color: 0xffffff,
                intensity: 0.8,
                position: Vec3::new(5.0, 10.0, 7.0),
                shadow_map_size: 1024,
            },
            ground: Ground {
                width: 60.0,
                length: 150.0,
                texture_repeat: Vec2::new(15.0, 30.0),
                colors: [0xaaaaaa, 0xbbbbbb],
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Player,
    Enemy,
}

/// A renderer-owned node: a cloned model prototype plus its current transform.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub kind: NodeKind,
    pub model: ModelTemplate,
    pub transform: Transform,
}

/// What one `sync` call changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub added: usize,
    pub removed: usize,
}

/// Mirror of the game state in renderer terms.
///
/// Entities stay plain data in the kernel; `sync` copies them into nodes,
/// cloning the model template when a node first appears and dropping nodes
/// whose entity is gone.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: BTreeMap<EntityId, SceneNode>,
    ground_offset: f32,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &BTreeMap<EntityId, SceneNode> {
        &self.nodes
    }

    pub fn node(&self, id: EntityId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ground texture scroll, in texture repeats.
    pub fn ground_offset(&self) -> f32 {
        self.ground_offset
    }

    /// Bring the nodes in line with `state`.
    pub fn sync(&mut self, state: &GameState, models: &LoadedModels) -> SyncStats {
        let mut stats = SyncStats::default();

        let before = self.nodes.len();
        self.nodes.retain(|id, node| match node.kind {
            NodeKind::Player => state.player().is_some_and(|p| p.id == *id),
            NodeKind::Enemy => state.enemies().contains_key(id),
        });
        stats.removed = before - self.nodes.len();

        let entities = state.player().into_iter().chain(state.enemies().values());
        for entity in entities {
            if let Some(node) = self.nodes.get_mut(&entity.id) {
                node.transform = entity.transform();
                continue;
            }
            let Some(node) = Self::instantiate(entity, models) else {
                tracing::warn!(id = %entity.id, "no model for entity; not drawn");
                continue;
            };
            self.nodes.insert(entity.id, node);
            stats.added += 1;
        }

        self.ground_offset = state.ground_offset();
        stats
    }

    fn instantiate(entity: &Entity, models: &LoadedModels) -> Option<SceneNode> {
        let (kind, template) = match entity.kind {
            EntityKind::Player => (NodeKind::Player, &models.player),
            EntityKind::Enemy { archetype, .. } => {
                (NodeKind::Enemy, models.enemies.get(archetype)?)
            }
        };
        Some(SceneNode {
            kind,
            model: template.clone(),
            transform: entity.transform(),
        })
    }
}
