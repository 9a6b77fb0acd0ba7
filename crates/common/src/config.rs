use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a `GameConfig`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Player tuning: bounds, rotation rate and drag sensitivity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub scale: f32,
    pub min_y: f32,
    pub max_y: f32,
    /// Yaw change in radians per second while a rotate key is held.
    pub rotation_speed: f32,
    pub drag_sensitivity_x: f32,
    pub drag_sensitivity_y: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            scale: 4.0,
            min_y: 0.5,
            max_y: 12.0,
            rotation_speed: std::f32::consts::PI * 0.6,
            drag_sensitivity_x: 0.012,
            drag_sensitivity_y: 0.012,
        }
    }
}

/// Enemy spawning and lifetime tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub max_enemies: usize,
    pub spawn_z: f32,
    pub despawn_z: f32,
    /// Spawn X is drawn from `[-spawn_x_extent, spawn_x_extent]`.
    pub spawn_x_extent: f32,
    pub scale_min: f32,
    pub scale_max: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    pub interval_min: f32,
    pub interval_max: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            max_enemies: 20,
            spawn_z: -80.0,
            despawn_z: 15.0,
            spawn_x_extent: 20.0,
            scale_min: 3.0,
            scale_max: 3.8,
            speed_min: 7.0,
            speed_max: 10.0,
            interval_min: 0.5,
            interval_max: 2.0,
        }
    }
}

/// Follow camera tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Offset from the player in the player's local (yaw) frame.
    pub offset: Vec3,
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Distance change per unit of wheel delta.
    pub wheel_scale: f32,
    pub look_at_height: f32,
    pub fov_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 4.0, 8.0),
            min_zoom: 3.0,
            max_zoom: 20.0,
            wheel_scale: 0.01,
            look_at_height: 1.0,
            fov_degrees: 75.0,
        }
    }
}

/// Cosmetic world settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub ground_scroll_speed: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            ground_scroll_speed: 2.5,
        }
    }
}

/// Paths of the models that must load before the game can start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelManifest {
    pub player: String,
    pub enemies: Vec<String>,
}

impl Default for ModelManifest {
    fn default() -> Self {
        Self {
            player: "models/player.glb".into(),
            enemies: vec![
                "models/enemy1.glb".into(),
                "models/enemy2.glb".into(),
                "models/enemy3.glb".into(),
            ],
        }
    }
}

/// Every tuning constant of a session. `Default` is the stock game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player: PlayerConfig,
    pub enemies: EnemyConfig,
    pub camera: CameraConfig,
    pub world: WorldConfig,
    pub models: ModelManifest,
}

impl GameConfig {
    /// Parse a config from YAML. Missing fields fall back to defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&data)
    }

    /// Serialize to YAML (used to dump the effective config).
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.player;
        let e = &self.enemies;
        let c = &self.camera;

        let finite = [
            p.scale,
            p.min_y,
            p.max_y,
            p.rotation_speed,
            p.drag_sensitivity_x,
            p.drag_sensitivity_y,
            e.spawn_z,
            e.despawn_z,
            e.spawn_x_extent,
            e.scale_min,
            e.scale_max,
            e.speed_min,
            e.speed_max,
            e.interval_min,
            e.interval_max,
            c.offset.x,
            c.offset.y,
            c.offset.z,
            c.min_zoom,
            c.max_zoom,
            c.wheel_scale,
            c.look_at_height,
            c.fov_degrees,
            self.world.ground_scroll_speed,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::Invalid("all values must be finite".into()));
        }

        ordered("player.min_y", p.min_y, "player.max_y", p.max_y)?;
        ordered("enemies.scale_min", e.scale_min, "enemies.scale_max", e.scale_max)?;
        ordered("enemies.speed_min", e.speed_min, "enemies.speed_max", e.speed_max)?;
        ordered(
            "enemies.interval_min",
            e.interval_min,
            "enemies.interval_max",
            e.interval_max,
        )?;
        ordered("camera.min_zoom", c.min_zoom, "camera.max_zoom", c.max_zoom)?;
        ordered("enemies.spawn_z", e.spawn_z, "enemies.despawn_z", e.despawn_z)?;

        if e.max_enemies == 0 {
            return Err(ConfigError::Invalid("enemies.max_enemies must be at least 1".into()));
        }
        if e.speed_min <= 0.0 {
            return Err(ConfigError::Invalid("enemies.speed_min must be positive".into()));
        }
        if e.interval_min < 0.0 || e.spawn_x_extent < 0.0 || c.min_zoom <= 0.0 {
            return Err(ConfigError::Invalid(
                "interval, spawn extent and zoom bounds must not be negative".into(),
            ));
        }
        Ok(())
    }
}

fn ordered(lo_name: &str, lo: f32, hi_name: &str, hi: f32) -> Result<(), ConfigError> {
    if lo > hi {
        return Err(ConfigError::Invalid(format!(
            "{lo_name} ({lo}) must not exceed {hi_name} ({hi})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.enemies.max_enemies, 20);
        assert_eq!(config.camera.offset, Vec3::new(0.0, 4.0, 8.0));
        assert_eq!(config.models.enemies.len(), 3);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "enemies:\n  max_enemies: 5\nplayer:\n  max_y: 6.0\n";
        let config = GameConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.enemies.max_enemies, 5);
        assert_eq!(config.enemies.spawn_z, -80.0);
        assert_eq!(config.player.max_y, 6.0);
        assert_eq!(config.player.min_y, 0.5);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let yaml = "camera:\n  min_zoom: 30.0\n";
        let err = GameConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("camera.min_zoom"));
    }

    #[test]
    fn zero_enemy_cap_is_rejected() {
        let yaml = "enemies:\n  max_enemies: 0\n";
        assert!(GameConfig::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let err = GameConfig::from_yaml_str("player: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn yaml_round_trip_through_file() {
        let config = GameConfig::default();
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(config.to_yaml().unwrap().as_bytes()).unwrap();

        let loaded = GameConfig::load(tmp.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = GameConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
