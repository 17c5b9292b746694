//! Game configuration
//!
//! Defaults match the tuned values of the shipped game. Any section or field
//! missing from a config file falls back to its default.

use serde::{Deserialize, Serialize};
use sim_engine::config::{Config, ConfigError};
use sim_engine::foundation::math::Vec2;
use std::path::Path;

/// Game configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Session timing and lives
    pub session: SessionConfig,

    /// Asteroid sizes, scoring and lifetime
    pub asteroid: AsteroidConfig,

    /// Spawn wave settings
    pub spawner: SpawnerConfig,

    /// Ship control and bullets
    pub player: PlayerConfig,
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Simulation ticks per second
    pub tick_rate: f32,

    /// Lives at the start of every game
    pub starting_lives: u32,

    /// Seconds before the ship respawns after a hit
    pub respawn_delay: f32,

    /// Seconds the ship ignores asteroids after spawning
    pub invulnerability_delay: f32,

    /// Seconds between PlayAgain and the new game starting
    pub game_reset_delay: f32,

    /// Seed for all randomness; `None` seeds from entropy
    pub rng_seed: Option<u64>,
}

/// Asteroid configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsteroidConfig {
    /// Points for a size 1.0 kill; actual award is `floor(points / size)`
    pub points_per_kill: u32,

    /// Impulse magnitude applied along the trajectory
    pub speed: f32,

    /// Seconds before an asteroid despawns on its own
    pub max_lifetime: f32,

    /// Smallest randomized size, also the split threshold
    pub min_sprite_size: f32,

    /// Largest randomized size
    pub max_sprite_size: f32,

    /// Child size as a fraction of the parent
    pub min_split_factor: f32,

    /// Children produced per split
    pub split_count: usize,

    /// Mass per unit of size, reported to the physics host
    pub density: f32,
}

/// Spawner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Seconds between waves
    pub spawn_rate: f32,

    /// Asteroids per wave
    pub spawn_amount: u32,

    /// Distance from the origin where asteroids appear
    pub spawn_radius: f32,

    /// Max deviation in degrees from a heading straight at the origin
    pub trajectory_variance: f32,

    /// Center of the spawn ring
    pub origin: Vec2,
}

/// Player configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Force applied while thrusting
    pub thrust_force: f32,

    /// Torque applied while turning
    pub turn_torque: f32,

    /// Impulse magnitude given to bullets
    pub bullet_speed: f32,

    /// Seconds before a bullet despawns on its own
    pub bullet_lifetime: f32,

    /// Where the ship (re)spawns
    pub spawn_position: Vec2,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            starting_lives: 3,
            respawn_delay: 3.0,
            invulnerability_delay: 3.0,
            game_reset_delay: 5.0,
            rng_seed: None,
        }
    }
}

impl Default for AsteroidConfig {
    fn default() -> Self {
        Self {
            points_per_kill: 100,
            speed: 50.0,
            max_lifetime: 30.0,
            min_sprite_size: 0.5,
            max_sprite_size: 1.5,
            min_split_factor: 0.5,
            split_count: 2,
            density: 4.0,
        }
    }
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            spawn_rate: 2.0,
            spawn_amount: 1,
            spawn_radius: 15.0,
            trajectory_variance: 15.0,
            origin: Vec2::zeros(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            thrust_force: 1.0,
            turn_torque: 1.0,
            bullet_speed: 500.0,
            bullet_lifetime: 5.0,
            spawn_position: Vec2::zeros(),
        }
    }
}

fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")))
    }
}

fn non_negative(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{name} must not be negative, got {value}")))
    }
}

impl Config for GameConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("session.tick_rate", self.session.tick_rate)?;
        non_negative("session.respawn_delay", self.session.respawn_delay)?;
        non_negative("session.invulnerability_delay", self.session.invulnerability_delay)?;
        non_negative("session.game_reset_delay", self.session.game_reset_delay)?;

        let asteroid = &self.asteroid;
        positive("asteroid.min_sprite_size", asteroid.min_sprite_size)?;
        positive("asteroid.max_lifetime", asteroid.max_lifetime)?;
        positive("asteroid.density", asteroid.density)?;
        non_negative("asteroid.speed", asteroid.speed)?;
        if asteroid.max_sprite_size < asteroid.min_sprite_size || !asteroid.max_sprite_size.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "asteroid.max_sprite_size ({}) must be at least min_sprite_size ({})",
                asteroid.max_sprite_size, asteroid.min_sprite_size
            )));
        }
        if !(asteroid.min_split_factor > 0.0 && asteroid.min_split_factor < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "asteroid.min_split_factor must be in (0, 1), got {}",
                asteroid.min_split_factor
            )));
        }

        positive("spawner.spawn_rate", self.spawner.spawn_rate)?;
        positive("spawner.spawn_radius", self.spawner.spawn_radius)?;
        non_negative("spawner.trajectory_variance", self.spawner.trajectory_variance)?;

        non_negative("player.bullet_speed", self.player.bullet_speed)?;
        positive("player.bullet_lifetime", self.player.bullet_lifetime)?;
        Ok(())
    }
}

impl GameConfig {
    /// Load configuration from file or return default if it is missing or invalid
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from_file(path) {
            Ok(config) => {
                log::info!("Loaded game config from {}", path.display());
                config
            }
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to load {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_engine::config::ConfigFormat;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let toml = r#"
            [asteroid]
            points_per_kill = 250

            [session]
            rng_seed = 42
        "#;
        let config = GameConfig::from_str_as(toml, ConfigFormat::Toml).unwrap();
        assert_eq!(config.asteroid.points_per_kill, 250);
        assert_eq!(config.asteroid.split_count, 2);
        assert_eq!(config.session.rng_seed, Some(42));
        assert_eq!(config.spawner, SpawnerConfig::default());
    }

    #[test]
    fn test_rejects_inverted_sizes() {
        let mut config = GameConfig::default();
        config.asteroid.max_sprite_size = 0.1;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_split_factor_out_of_range() {
        let mut config = GameConfig::default();
        config.asteroid.min_split_factor = 1.0;
        assert!(config.validate().is_err());
        config.asteroid.min_split_factor = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_spawn_rate() {
        let mut config = GameConfig::default();
        config.spawner.spawn_rate = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("asteroids.toml");
        let mut config = GameConfig::default();
        config.session.starting_lives = 5;
        config.spawner.origin = Vec2::new(1.0, -2.0);

        config.save_to_file(&path).unwrap();
        assert_eq!(GameConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = GameConfig::load_or_default(dir.path().join("nope.toml"));
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_load_or_default_on_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[spawner]\nspawn_rate = -1.0\n").unwrap();
        assert_eq!(GameConfig::load_or_default(&path), GameConfig::default());
    }
}
