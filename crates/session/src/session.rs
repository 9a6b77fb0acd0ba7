use glam::Vec3;
use rand::Rng;
use skyrun_assets::{AssetLoader, LoadError, LoadedModels, load_models};
use skyrun_common::{ConfigError, EntityId, GameConfig};
use skyrun_input::{Action, InputEvent, InputState};
use skyrun_kernel::{
    CameraPose, CameraRig, CameraState, GameEvent, GameState, MotionController, SpawnController,
};
use skyrun_render::{RenderView, Renderer, SceneEnvironment, SceneGraph};
use std::time::{Duration, Instant};

/// Session phase. There is no way back to `Loading` and no end state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Running { started_at: Instant },
}

/// What a single tick did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub spawned: Option<EntityId>,
    pub despawned: Vec<EntityId>,
    pub rendered: bool,
    /// Events logged since the previous running tick, drained from the state.
    pub events: Vec<GameEvent>,
}

/// One game session: owns the game state, the controllers, the renderer and
/// the random source.
///
/// Input handlers and ticks run on the same thread and take `&mut self`, so
/// they interleave but never overlap.
pub struct GameSession<R: Renderer, G: Rng> {
    config: GameConfig,
    phase: Phase,
    state: GameState,
    input: InputState,
    spawner: SpawnController,
    motion: MotionController,
    rig: CameraRig,
    camera_pose: Option<CameraPose>,
    models: Option<LoadedModels>,
    scene: SceneGraph,
    renderer: R,
    rng: G,
    fatal: Option<LoadError>,
}

impl<R: Renderer, G: Rng> GameSession<R, G> {
    /// Create a session in the `Loading` phase and hand the static scene to the renderer.
    ///
    /// The config is validated first; an invalid config never reaches the renderer.
    pub fn new(config: GameConfig, mut renderer: R, mut rng: G) -> Result<Self, ConfigError> {
        config.validate()?;
        renderer.configure(&SceneEnvironment::default());
        let spawner = SpawnController::new(&config.enemies, &config.player, &mut rng);
        Ok(Self {
            phase: Phase::Loading,
            state: GameState::new(CameraState::new(&config.camera)),
            input: InputState::new(),
            spawner,
            motion: MotionController::new(&config.player),
            rig: CameraRig::new(&config.camera),
            camera_pose: None,
            models: None,
            scene: SceneGraph::new(),
            renderer,
            rng,
            fatal: None,
            config,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    /// Wall-clock time since the session started running.
    pub fn running_for(&self) -> Option<Duration> {
        match self.phase {
            Phase::Running { started_at } => Some(started_at.elapsed()),
            Phase::Loading => None,
        }
    }

    /// The load failure that stopped this session, if any.
    pub fn fatal_error(&self) -> Option<&LoadError> {
        self.fatal.as_ref()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn input(&self) -> InputState {
        self.input
    }

    pub fn spawner(&self) -> &SpawnController {
        &self.spawner
    }

    /// Mutable access to the spawn cadence, for scripted scenarios.
    pub fn spawner_mut(&mut self) -> &mut SpawnController {
        &mut self.spawner
    }

    /// Camera pose computed by the most recent running tick.
    pub fn camera_pose(&self) -> Option<CameraPose> {
        self.camera_pose
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Load every model in the config's manifest and finish the loading phase.
    pub async fn load<L: AssetLoader>(&mut self, loader: &L) -> Result<(), LoadError> {
        if self.is_running() {
            return Ok(());
        }
        if let Some(err) = &self.fatal {
            return Err(err.clone());
        }
        let result = load_models(loader, &self.config.models).await;
        self.finish_loading(result)
    }

    /// Complete the loading phase with the joint load result.
    ///
    /// Success creates the player and enters `Running`. Failure shows a fatal
    /// error once and leaves the session in `Loading` for good; later calls
    /// return the same error without reporting it again.
    pub fn finish_loading(
        &mut self,
        result: Result<LoadedModels, LoadError>,
    ) -> Result<(), LoadError> {
        if self.is_running() {
            tracing::warn!("loading already finished; result ignored");
            return Ok(());
        }
        if let Some(err) = &self.fatal {
            return Err(err.clone());
        }

        match result {
            Ok(models) => {
                let p = &self.config.player;
                let id = self
                    .state
                    .spawn_player(Vec3::new(0.0, p.min_y, 0.0), p.scale);
                tracing::info!(
                    player = %id,
                    archetypes = models.enemies.len(),
                    "models loaded; session running"
                );
                self.models = Some(models);
                self.phase = Phase::Running {
                    started_at: Instant::now(),
                };
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "model loading failed; session will not start");
                self.renderer.show_fatal_error(&format!(
                    "Failed to load models ({err}). Check the model paths and files, then restart."
                ));
                self.fatal = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Apply one input event. Held state updates immediately; drags and zooms
    /// take effect now, not on the next tick.
    pub fn handle_input(&mut self, event: &InputEvent) {
        let Some(action) = self.input.apply(event) else {
            return;
        };
        match action {
            Action::Drag(delta) => {
                if let Some(player) = self.state.player_mut() {
                    self.motion.apply_drag(player, delta);
                }
            }
            Action::Zoom(delta) => {
                self.state.camera_mut().apply_wheel(delta);
            }
            Action::Resize { width, height } => self.renderer.resize(width, height),
        }
    }

    /// Run one tick of `dt` seconds.
    ///
    /// While loading this does nothing. Negative or non-finite deltas count as zero.
    pub fn tick(&mut self, dt: f32) -> TickReport {
        let mut report = TickReport::default();
        if !self.is_running() {
            return report;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let _span = tracing::info_span!("tick", tick = self.state.tick() + 1).entered();
        let input = self.input;

        self.state
            .scroll_ground(self.config.world.ground_scroll_speed * dt);

        let archetypes = self.models.as_ref().map_or(0, |m| m.enemies.len());
        if let Some(spawn) =
            self.spawner
                .try_spawn(self.state.enemy_count(), dt, archetypes, &mut self.rng)
        {
            let id = self.state.spawn_enemy(&spawn);
            tracing::debug!(
                enemy = %id,
                archetype = spawn.archetype,
                x = spawn.position.x,
                y = spawn.position.y,
                speed = spawn.speed,
                "enemy spawned"
            );
            report.spawned = Some(id);
        }

        self.motion.advance_enemies(self.state.enemies_mut(), dt);
        report.despawned = self.state.despawn_beyond(self.config.enemies.despawn_z);
        for id in &report.despawned {
            tracing::debug!(enemy = %id, "enemy despawned");
        }

        let offset = self.state.camera().offset();
        if let Some(player) = self.state.player_mut() {
            self.motion.advance_player(player, &input, dt);
            let pose = self
                .rig
                .compute_pose(player.position, player.rotation_y, offset);
            self.camera_pose = Some(pose);
        }

        self.state.step(dt);

        if let Some(models) = &self.models {
            self.scene.sync(&self.state, models);
        }
        let view = self.camera_pose.map(RenderView::from).unwrap_or_default();
        self.renderer.render(&self.scene, &view);
        report.rendered = true;
        report.events = self.state.drain_events();

        tracing::trace!(
            enemies = self.state.enemy_count(),
            spawned = report.spawned.is_some(),
            despawned = report.despawned.len(),
            "tick complete"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use skyrun_assets::MemoryLoader;
    use skyrun_common::ModelManifest;
    use skyrun_input::LogicalKey;
    use skyrun_kernel::SpawnState;
    use skyrun_render::DebugTextRenderer;
    use std::collections::BTreeMap;

    type Session = GameSession<DebugTextRenderer, StdRng>;

    fn loader() -> MemoryLoader {
        let manifest = ModelManifest::default();
        manifest
            .enemies
            .iter()
            .fold(MemoryLoader::new().with_placeholder(manifest.player.clone()), |l, p| {
                l.with_placeholder(p.clone())
            })
    }

    fn session_with(config: GameConfig, seed: u64) -> Session {
        GameSession::new(config, DebugTextRenderer::new(), StdRng::seed_from_u64(seed)).unwrap()
    }

    fn running(config: GameConfig, seed: u64) -> Session {
        let mut s = session_with(config, seed);
        pollster::block_on(s.load(&loader())).unwrap();
        s
    }

    #[test]
    fn loading_ticks_do_nothing() {
        let mut s = session_with(GameConfig::default(), 1);
        assert_eq!(s.phase(), Phase::Loading);
        for _ in 0..10 {
            assert_eq!(s.tick(0.5), TickReport::default());
        }
        assert_eq!(s.state().tick(), 0);
        assert_eq!(s.renderer().frames(), 0);
        assert!(s.renderer().environment().is_some());
    }

    #[test]
    fn successful_load_starts_running_with_player() {
        let mut s = running(GameConfig::default(), 1);
        assert!(s.is_running());
        assert!(s.running_for().is_some());
        let player = s.state().player().unwrap();
        assert_eq!(player.position, Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(player.scale, 4.0);

        let report = s.tick(0.016);
        assert!(report.rendered);
        assert_eq!(s.renderer().frames(), 1);
        assert!(s.renderer().last_frame().contains("player"));
    }

    #[test]
    fn one_failed_load_is_fatal_and_reported_once() {
        let config = GameConfig {
            models: ModelManifest {
                player: "player.glb".into(),
                enemies: vec!["enemy.glb".into()],
            },
            ..GameConfig::default()
        };
        let loader = MemoryLoader::new()
            .with_placeholder("player.glb")
            .with_failure("enemy.glb", "truncated");
        let mut s = session_with(config, 1);

        assert!(pollster::block_on(s.load(&loader)).is_err());
        assert!(pollster::block_on(s.load(&loader)).is_err());
        let again = s.finish_loading(Ok(LoadedModels {
            player: skyrun_assets::ModelTemplate::placeholder("player.glb"),
            enemies: Vec::new(),
        }));
        assert!(again.is_err());

        for _ in 0..5 {
            s.tick(0.1);
        }
        assert_eq!(s.phase(), Phase::Loading);
        assert!(s.fatal_error().is_some());
        assert_eq!(s.renderer().fatal_errors().len(), 1);
        assert_eq!(s.renderer().frames(), 0);
        assert!(s.state().player().is_none());
    }

    #[test]
    fn scripted_spawn_happens_on_third_tick() {
        let mut s = running(GameConfig::default(), 2);
        s.spawner_mut().set_state(SpawnState {
            timer: 0.0,
            next_interval: 1.0,
        });

        assert!(s.tick(0.4).spawned.is_none());
        assert!(s.tick(0.4).spawned.is_none());
        let report = s.tick(0.4);
        assert!(report.spawned.is_some());
        assert_eq!(s.spawner().state().timer, 0.0);
        assert_eq!(s.state().enemy_count(), 1);
    }

    #[test]
    fn enemy_count_never_exceeds_cap() {
        let mut config = GameConfig::default();
        config.enemies.max_enemies = 3;
        config.enemies.interval_min = 0.0;
        config.enemies.interval_max = 0.0;
        let mut s = running(config, 3);
        let mut peak = 0;
        for _ in 0..300 {
            s.tick(0.05);
            assert!(s.state().enemy_count() <= 3);
            peak = peak.max(s.state().enemy_count());
        }
        assert_eq!(peak, 3);
    }

    #[test]
    fn enemies_advance_monotonically_and_despawn_on_crossing() {
        let mut config = GameConfig::default();
        config.enemies.interval_min = 0.1;
        config.enemies.interval_max = 0.3;
        let despawn_z = config.enemies.despawn_z;
        let mut s = running(config, 4);

        let mut last: BTreeMap<EntityId, f32> = BTreeMap::new();
        let mut despawned_total = 0;
        for _ in 0..2000 {
            let report = s.tick(0.05);
            for (id, enemy) in s.state().enemies() {
                assert!(enemy.position.z <= despawn_z);
                if let Some(prev) = last.get(id) {
                    assert!(enemy.position.z > *prev);
                }
            }
            for id in &report.despawned {
                assert!(last.contains_key(id) || report.spawned == Some(*id));
            }
            despawned_total += report.despawned.len();
            last = s
                .state()
                .enemies()
                .iter()
                .map(|(id, e)| (*id, e.position.z))
                .collect();
        }
        assert!(despawned_total > 0);
    }

    #[test]
    fn drag_before_load_is_ignored() {
        let mut s = session_with(GameConfig::default(), 5);
        s.handle_input(&InputEvent::PointerDown);
        s.handle_input(&InputEvent::PointerMove { dx: 50.0, dy: -50.0 });
        assert!(s.state().player().is_none());
        assert!(s.input().dragging);
    }

    #[test]
    fn drag_is_event_driven_and_clamped() {
        let mut s = running(GameConfig::default(), 5);
        s.handle_input(&InputEvent::PointerDown);
        s.handle_input(&InputEvent::PointerMove {
            dx: 100.0,
            dy: -100_000.0,
        });
        let after_drag = s.state().player().unwrap().position;
        assert!((after_drag.x - 1.2).abs() < 1e-5);
        assert_eq!(after_drag.y, 12.0);

        for _ in 0..10 {
            s.tick(0.016);
        }
        assert_eq!(s.state().player().unwrap().position, after_drag);

        s.handle_input(&InputEvent::PointerUp);
        s.handle_input(&InputEvent::PointerMove { dx: 100.0, dy: 0.0 });
        assert_eq!(s.state().player().unwrap().position, after_drag);
    }

    #[test]
    fn held_key_rotates_player_and_camera_follows() {
        let mut s = running(GameConfig::default(), 6);
        s.handle_input(&InputEvent::KeyDown(LogicalKey::RotateLeft));
        for _ in 0..10 {
            s.tick(0.1);
        }
        let speed = s.config().player.rotation_speed;
        let player = s.state().player().unwrap().clone();
        assert!((player.rotation_y - speed).abs() < 1e-4);

        let pose = s.camera_pose().unwrap();
        let offset = s.state().camera().offset();
        let expected = CameraRig::new(&s.config().camera).compute_pose(
            player.position,
            player.rotation_y,
            offset,
        );
        assert_eq!(pose, expected);
        assert_eq!(pose.look_at, player.position + Vec3::Y);

        s.handle_input(&InputEvent::KeyDown(LogicalKey::RotateRight));
        s.tick(0.5);
        assert!((s.state().player().unwrap().rotation_y - player.rotation_y).abs() < 1e-6);
    }

    #[test]
    fn wheel_zooms_and_resize_reaches_renderer() {
        let mut s = running(GameConfig::default(), 7);
        s.handle_input(&InputEvent::Wheel(100.0));
        let expected = Vec3::new(0.0, 4.0, 8.0).length() + 1.0;
        assert!((s.state().camera().zoom_distance() - expected).abs() < 1e-4);

        for _ in 0..100 {
            s.handle_input(&InputEvent::Wheel(1000.0));
        }
        assert!((s.state().camera().zoom_distance() - 20.0).abs() < 1e-4);

        s.handle_input(&InputEvent::Resize {
            width: 1920,
            height: 1080,
        });
        assert_eq!(s.renderer().size(), (1920, 1080));
    }

    #[test]
    fn same_seed_replays_identically() {
        let mut a = running(GameConfig::default(), 42);
        let mut b = running(GameConfig::default(), 42);
        for _ in 0..500 {
            assert_eq!(a.tick(0.033), b.tick(0.033));
        }
        let za: Vec<f32> = a.state().enemies().values().map(|e| e.position.z).collect();
        let zb: Vec<f32> = b.state().enemies().values().map(|e| e.position.z).collect();
        assert_eq!(za, zb);
        assert_eq!(a.state().ground_offset(), b.state().ground_offset());
    }

    #[test]
    fn scene_mirrors_state_after_tick() {
        let mut s = running(GameConfig::default(), 8);
        for _ in 0..200 {
            s.tick(0.05);
            assert_eq!(s.scene().len(), s.state().enemy_count() + 1);
        }
    }

    #[test]
    fn event_log_is_drained_every_tick() {
        let mut s = running(GameConfig::default(), 9);
        let first = s.tick(1.0 / 60.0);
        assert!(matches!(first.events[0], GameEvent::PlayerSpawned { .. }));

        let mut spawned = 0;
        for _ in 0..20_000 {
            let report = s.tick(1.0 / 60.0);
            assert!(matches!(report.events.last(), Some(GameEvent::Stepped { .. })));
            spawned += report
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::EnemySpawned { .. }))
                .count();
            assert!(s.state().events().is_empty());
        }
        assert!(spawned > 0);
    }

    #[test]
    fn inverted_spawn_interval_is_rejected() {
        let mut config = GameConfig::default();
        config.enemies.interval_min = 2.0;
        config.enemies.interval_max = 1.0;
        let result = GameSession::new(config, DebugTextRenderer::new(), StdRng::seed_from_u64(1));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
