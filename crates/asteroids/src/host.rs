//! Interface to the physics/rendering host
//!
//! The host reports contacts and positions in; the core answers with an
//! ordered list of [`HostCommand`]s the host applies to its own objects.

use crate::components::AsteroidState;
use crate::config::AsteroidConfig;
use sim_engine::ecs::EntityId;
use sim_engine::foundation::math::Vec2;

/// Contact between two entities reported by the collision layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    /// First entity
    pub a: EntityId,
    /// Second entity
    pub b: EntityId,
}

impl Contact {
    /// Create a contact event
    pub fn new(a: EntityId, b: EntityId) -> Self {
        Self { a, b }
    }
}

/// Requests for the host
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    /// Create an asteroid object
    SpawnAsteroid {
        /// Entity id
        id: EntityId,
        /// Spawn position
        position: Vec2,
        /// Scale
        size: f32,
        /// Rigid body mass
        mass: f32,
        /// One-off impulse
        impulse: Vec2,
        /// Sprite rotation in degrees
        rotation: f32,
    },
    /// Create a bullet object
    SpawnBullet {
        /// Entity id
        id: EntityId,
        /// Spawn position
        position: Vec2,
        /// One-off impulse
        impulse: Vec2,
    },
    /// Destroy an object
    Despawn {
        /// Entity id
        id: EntityId,
    },
    /// Zero linear and angular velocity and hide the ship
    StopPlayer {
        /// Player id
        id: EntityId,
    },
    /// Show the ship again at a position
    RespawnPlayer {
        /// Player id
        id: EntityId,
        /// Respawn position
        position: Vec2,
    },
    /// Switch ship collisions on or off
    SetPlayerCollisions {
        /// Player id
        id: EntityId,
        /// Whether asteroids can hit the ship
        enabled: bool,
    },
    /// Push the ship forward
    ApplyThrust {
        /// Player id
        id: EntityId,
        /// Force magnitude
        force: f32,
    },
    /// Turn the ship
    ApplyTorque {
        /// Player id
        id: EntityId,
        /// Signed torque
        torque: f32,
    },
}

/// Ordered buffer of commands waiting for the host
#[derive(Debug, Default)]
pub struct HostOutbox {
    commands: Vec<HostCommand>,
}

impl HostOutbox {
    /// Create an empty outbox
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a command
    pub fn push(&mut self, command: HostCommand) {
        log::trace!("Host command: {command:?}");
        self.commands.push(command);
    }

    /// Queue creation of an asteroid
    pub fn spawn_asteroid(&mut self, asteroid: &AsteroidState, position: Vec2, rotation: f32, config: &AsteroidConfig) {
        self.push(HostCommand::SpawnAsteroid {
            id: asteroid.id,
            position,
            size: asteroid.size,
            mass: asteroid.mass(config.density),
            impulse: asteroid.impulse(config.speed),
            rotation,
        });
    }

    /// Queue destruction of an object
    pub fn despawn(&mut self, id: EntityId) {
        self.push(HostCommand::Despawn { id });
    }

    /// Take every queued command, oldest first
    pub fn drain(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Peek at queued commands
    pub fn pending(&self) -> &[HostCommand] {
        &self.commands
    }

    /// Number of queued commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_engine::ecs::{EntityKind, EntityRegistry};

    #[test]
    fn test_outbox_preserves_order_and_drains() {
        let mut registry = EntityRegistry::new();
        let a = registry.spawn(EntityKind::Asteroid, Vec2::zeros(), Vec2::zeros());
        let b = registry.spawn(EntityKind::Bullet, Vec2::zeros(), Vec2::zeros());

        let mut outbox = HostOutbox::new();
        outbox.despawn(a);
        outbox.despawn(b);
        assert_eq!(outbox.len(), 2);

        let drained = outbox.drain();
        assert_eq!(
            drained,
            vec![HostCommand::Despawn { id: a }, HostCommand::Despawn { id: b }]
        );
        assert!(outbox.is_empty());
    }

    #[test]
    fn test_spawn_asteroid_reports_mass_and_impulse() {
        let mut registry = EntityRegistry::new();
        let id = registry.spawn(EntityKind::Asteroid, Vec2::zeros(), Vec2::zeros());
        let asteroid = AsteroidState {
            id,
            size: 2.0,
            trajectory: Vec2::new(1.0, 0.0),
            remaining_lifetime: 30.0,
        };
        let config = AsteroidConfig::default();

        let mut outbox = HostOutbox::new();
        outbox.spawn_asteroid(&asteroid, Vec2::new(3.0, 4.0), 90.0, &config);

        assert_eq!(
            outbox.pending(),
            &[HostCommand::SpawnAsteroid {
                id,
                position: Vec2::new(3.0, 4.0),
                size: 2.0,
                mass: 8.0,
                impulse: Vec2::new(50.0, 0.0),
                rotation: 90.0,
            }]
        );
    }
}
