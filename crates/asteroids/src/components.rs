//! Game-specific state carried per entity

use sim_engine::ecs::EntityId;
use sim_engine::foundation::math::Vec2;

/// Asteroid state
#[derive(Debug, Clone, PartialEq)]
pub struct AsteroidState {
    /// Entity id
    pub id: EntityId,

    /// Size (scale); always positive
    pub size: f32,

    /// Unit direction of travel
    pub trajectory: Vec2,

    /// Seconds until the asteroid despawns on its own
    pub remaining_lifetime: f32,
}

impl AsteroidState {
    /// Mass reported to the physics host
    pub fn mass(&self, density: f32) -> f32 {
        self.size * density
    }

    /// One-off impulse that sets the asteroid drifting
    pub fn impulse(&self, speed: f32) -> Vec2 {
        self.trajectory * speed
    }

    /// Whether a hit splits this asteroid rather than destroying it
    ///
    /// The threshold is half the current size regardless of the split
    /// factor, which bounds fragmentation.
    pub fn can_split(&self, min_sprite_size: f32) -> bool {
        self.size * 0.5 > min_sprite_size
    }

    /// Points for destroying this asteroid: `floor(points_per_kill / size)`
    pub fn kill_points(&self, points_per_kill: u32) -> u32 {
        let points = (points_per_kill as f32 / self.size).floor();
        if points.is_finite() && points > 0.0 {
            points.min(u32::MAX as f32) as u32
        } else {
            0
        }
    }
}

/// Bullet state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulletState {
    /// Entity id
    pub id: EntityId,

    /// Seconds until the bullet despawns on its own
    pub remaining_lifetime: f32,
}

/// Player ship state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerState {
    /// Entity id (stable for the whole session)
    pub id: EntityId,

    /// Whether the ship is in play
    pub alive: bool,

    /// Whether asteroid contacts are currently ignored
    pub invulnerable: bool,
}

impl PlayerState {
    /// Whether an asteroid contact should hurt the ship
    pub fn is_vulnerable(&self) -> bool {
        self.alive && !self.invulnerable
    }
}

/// Per-tick ship controls sent by the host
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlayerInput {
    /// Thrust forward this tick
    pub thrust: bool,

    /// Turn direction: positive is counter-clockwise, zero for none
    pub turn: f32,

    /// Fire one bullet along this heading (unit-length not required)
    pub fire: Option<Vec2>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn asteroid(size: f32) -> AsteroidState {
        AsteroidState {
            id: EntityId::default(),
            size,
            trajectory: Vec2::new(0.0, 1.0),
            remaining_lifetime: 30.0,
        }
    }

    #[test]
    fn test_kill_points_scale_with_size() {
        assert_eq!(asteroid(2.0).kill_points(100), 50);
        assert_eq!(asteroid(1.0).kill_points(100), 100);
        assert_eq!(asteroid(0.75).kill_points(100), 133);
        assert_eq!(asteroid(3.0).kill_points(100), 33);
    }

    #[test]
    fn test_kill_points_never_overflow() {
        assert_eq!(asteroid(1e-30).kill_points(u32::MAX), u32::MAX);
    }

    #[test]
    fn test_can_split_uses_half_size() {
        assert!(asteroid(1.2).can_split(0.5));
        assert!(!asteroid(1.0).can_split(0.5));
        assert!(!asteroid(0.8).can_split(0.5));
    }

    #[test]
    fn test_mass_and_impulse() {
        let a = asteroid(1.5);
        assert_relative_eq!(a.mass(4.0), 6.0);
        assert_relative_eq!(a.impulse(50.0), Vec2::new(0.0, 50.0));
    }

    #[test]
    fn test_player_vulnerability() {
        let mut player = PlayerState {
            id: EntityId::default(),
            alive: true,
            invulnerable: true,
        };
        assert!(!player.is_vulnerable());
        player.invulnerable = false;
        assert!(player.is_vulnerable());
        player.alive = false;
        assert!(!player.is_vulnerable());
    }
}
