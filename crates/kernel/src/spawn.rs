use glam::Vec3;
use rand::Rng;
use skyrun_common::{EnemyConfig, PlayerConfig};

/// Parameters for a new enemy, drawn by the spawn controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemySpawn {
    pub archetype: usize,
    pub scale: f32,
    pub position: Vec3,
    pub speed: f32,
}

/// Spawn cadence: time since the last spawn and the threshold for the next one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnState {
    pub timer: f32,
    pub next_interval: f32,
}

/// Decides when, where and what enemy to create.
///
/// The controller never sees the enemy collection itself, only its size.
#[derive(Debug, Clone)]
pub struct SpawnController {
    config: EnemyConfig,
    min_y: f32,
    max_y: f32,
    state: SpawnState,
}

impl SpawnController {
    /// Create a controller with a freshly drawn first interval.
    pub fn new<R: Rng>(enemies: &EnemyConfig, player: &PlayerConfig, rng: &mut R) -> Self {
        let mut controller = Self {
            config: enemies.clone(),
            min_y: player.min_y,
            max_y: player.max_y,
            state: SpawnState {
                timer: 0.0,
                next_interval: 0.0,
            },
        };
        controller.state.next_interval = controller.draw_interval(rng);
        controller
    }

    pub fn state(&self) -> SpawnState {
        self.state
    }

    /// Replace the spawn cadence, e.g. to script a deterministic scenario.
    pub fn set_state(&mut self, state: SpawnState) {
        self.state = state;
    }

    pub fn max_enemies(&self) -> usize {
        self.config.max_enemies
    }

    /// Accumulate `dt` and spawn if the cap allows and the interval has elapsed.
    ///
    /// The timer keeps accumulating while the cap is reached, so a spawn
    /// happens as soon as a slot frees up. With no archetypes this is a no-op
    /// that leaves the cadence untouched apart from the accumulation.
    pub fn try_spawn<R: Rng>(
        &mut self,
        active_count: usize,
        dt: f32,
        archetype_count: usize,
        rng: &mut R,
    ) -> Option<EnemySpawn> {
        self.state.timer += dt;

        if active_count >= self.config.max_enemies || self.state.timer <= self.state.next_interval {
            return None;
        }
        if archetype_count == 0 {
            tracing::trace!("spawn skipped: no archetypes loaded");
            return None;
        }

        let c = &self.config;
        let spawn = EnemySpawn {
            archetype: rng.gen_range(0..archetype_count),
            scale: rng.gen_range(c.scale_min..=c.scale_max),
            position: Vec3::new(
                rng.gen_range(-c.spawn_x_extent..=c.spawn_x_extent),
                rng.gen_range(self.min_y..=self.max_y),
                c.spawn_z,
            ),
            speed: rng.gen_range(c.speed_min..=c.speed_max),
        };

        self.state.timer = 0.0;
        self.state.next_interval = self.draw_interval(rng);
        tracing::trace!(next_interval = self.state.next_interval, "spawn timer reset");
        Some(spawn)
    }

    fn draw_interval<R: Rng>(&self, rng: &mut R) -> f32 {
        rng.gen_range(self.config.interval_min..=self.config.interval_max)
    }
}
