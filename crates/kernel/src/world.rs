use glam::Vec3;
use skyrun_common::EntityId;
use std::collections::BTreeMap;

use crate::camera::CameraState;
use crate::entity::Entity;
use crate::spawn::EnemySpawn;

/// An event record produced by every lifecycle mutation of the game state.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// The player was created.
    PlayerSpawned { id: EntityId, position: Vec3 },
    /// An enemy entered the active set.
    EnemySpawned {
        id: EntityId,
        archetype: usize,
        position: Vec3,
    },
    /// An enemy left the active set, with the z it had when removed.
    EnemyDespawned { id: EntityId, z: f32 },
    /// The game advanced one tick.
    Stepped { tick: u64 },
}

/// The authoritative game state for one session.
///
/// Holds the player singleton, the active enemy set and the camera offset.
/// Enemies are only inserted through `spawn_enemy` and only removed through
/// `despawn_enemy` / `despawn_beyond`. BTreeMap keeps iteration deterministic.
#[derive(Debug, Clone)]
pub struct GameState {
    player: Option<Entity>,
    enemies: BTreeMap<EntityId, Entity>,
    camera: CameraState,
    /// Ground texture scroll in texture repeats, kept in [0, 1).
    ground_offset: f32,
    tick: u64,
    play_time: f64,
    next_id: EntityId,
    /// Events since the last drain. The session drains it every tick.
    event_log: Vec<GameEvent>,
}

impl GameState {
    pub fn new(camera: CameraState) -> Self {
        Self {
            player: None,
            enemies: BTreeMap::new(),
            camera,
            ground_offset: 0.0,
            tick: 0,
            play_time: 0.0,
            next_id: EntityId(0),
            event_log: Vec::new(),
        }
    }

    /// Number of completed gameplay ticks.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Seconds of gameplay simulated so far.
    pub fn play_time(&self) -> f64 {
        self.play_time
    }

    pub fn player(&self) -> Option<&Entity> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.player.as_mut()
    }

    /// Create the player. The player is a singleton: a second call returns
    /// the existing id and leaves the player untouched.
    pub fn spawn_player(&mut self, position: Vec3, scale: f32) -> EntityId {
        if let Some(player) = &self.player {
            return player.id;
        }
        let id = self.allocate_id();
        self.player = Some(Entity::player(id, position, scale));
        self.event_log.push(GameEvent::PlayerSpawned { id, position });
        id
    }

    /// Read-only access to the active enemies.
    pub fn enemies(&self) -> &BTreeMap<EntityId, Entity> {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.enemies.values_mut()
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    /// Insert a new enemy into the active set.
    pub fn spawn_enemy(&mut self, spawn: &EnemySpawn) -> EntityId {
        let id = self.allocate_id();
        self.enemies.insert(id, Entity::enemy(id, spawn));
        self.event_log.push(GameEvent::EnemySpawned {
            id,
            archetype: spawn.archetype,
            position: spawn.position,
        });
        id
    }

    /// Remove an enemy. Returns it if it was active.
    pub fn despawn_enemy(&mut self, id: EntityId) -> Option<Entity> {
        let removed = self.enemies.remove(&id);
        if let Some(ref e) = removed {
            self.event_log.push(GameEvent::EnemyDespawned {
                id,
                z: e.position.z,
            });
        }
        removed
    }

    /// Remove every enemy whose z is strictly past `despawn_z`.
    pub fn despawn_beyond(&mut self, despawn_z: f32) -> Vec<EntityId> {
        let expired: Vec<EntityId> = self
            .enemies
            .values()
            .filter(|e| e.position.z > despawn_z)
            .map(|e| e.id)
            .collect();
        for id in &expired {
            self.despawn_enemy(*id);
        }
        expired
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut CameraState {
        &mut self.camera
    }

    /// Scroll the ground texture. The texture repeats, so the offset wraps.
    pub fn scroll_ground(&mut self, amount: f32) {
        self.ground_offset = (self.ground_offset + amount).rem_euclid(1.0);
    }

    pub fn ground_offset(&self) -> f32 {
        self.ground_offset
    }

    /// Close out one gameplay tick of `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        self.tick += 1;
        self.play_time += f64::from(dt);
        self.event_log.push(GameEvent::Stepped { tick: self.tick });
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[GameEvent] {
        &self.event_log
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id = id.next();
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyrun_common::CameraConfig;

    fn state() -> GameState {
        GameState::new(CameraState::new(&CameraConfig::default()))
    }

    fn spawn_at(z: f32) -> EnemySpawn {
        EnemySpawn {
            archetype: 0,
            scale: 3.0,
            position: Vec3::new(0.0, 1.0, z),
            speed: 8.0,
        }
    }

    #[test]
    fn state_starts_empty() {
        let s = state();
        assert_eq!(s.tick(), 0);
        assert_eq!(s.enemy_count(), 0);
        assert!(s.player().is_none());
    }

    #[test]
    fn player_is_a_singleton() {
        let mut s = state();
        let a = s.spawn_player(Vec3::new(0.0, 0.5, 0.0), 4.0);
        let b = s.spawn_player(Vec3::new(9.0, 9.0, 9.0), 1.0);
        assert_eq!(a, b);
        assert_eq!(s.player().unwrap().position, Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(s.events().len(), 1);
    }

    #[test]
    fn ids_are_never_reused() {
        let mut s = state();
        let a = s.spawn_enemy(&spawn_at(-80.0));
        s.despawn_enemy(a);
        let b = s.spawn_enemy(&spawn_at(-80.0));
        assert_ne!(a, b);
    }

    #[test]
    fn despawn_beyond_removes_only_crossed_enemies() {
        let mut s = state();
        let keep = s.spawn_enemy(&spawn_at(15.0));
        let gone = s.spawn_enemy(&spawn_at(15.01));
        let removed = s.despawn_beyond(15.0);
        assert_eq!(removed, vec![gone]);
        assert!(s.enemies().contains_key(&keep));
        assert_eq!(s.enemy_count(), 1);
        assert!(matches!(
            s.events().last(),
            Some(GameEvent::EnemyDespawned { id, .. }) if *id == gone
        ));
    }

    #[test]
    fn despawn_unknown_is_none() {
        let mut s = state();
        assert!(s.despawn_enemy(EntityId(42)).is_none());
        assert!(s.events().is_empty());
    }

    #[test]
    fn ground_offset_wraps() {
        let mut s = state();
        for _ in 0..10 {
            s.scroll_ground(0.35);
            assert!((0.0..1.0).contains(&s.ground_offset()));
        }
        assert!((s.ground_offset() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn step_tracks_tick_and_play_time() {
        let mut s = state();
        s.step(0.5);
        s.step(0.25);
        assert_eq!(s.tick(), 2);
        assert!((s.play_time() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn drain_events_clears_log() {
        let mut s = state();
        s.spawn_enemy(&spawn_at(-80.0));
        s.step(0.1);
        let events = s.drain_events();
        assert_eq!(events.len(), 2);
        assert!(s.events().is_empty());
    }
}
