//! Asteroid population
//!
//! Tracks every live asteroid by id and owns the spawn, split and destroy
//! rules. Every entity created or removed here is mirrored as a
//! [`HostCommand`](crate::host::HostCommand) so the host can keep its
//! visual objects in sync.

use crate::components::AsteroidState;
use crate::config::AsteroidConfig;
use crate::error::SimError;
use crate::host::HostOutbox;
use rand::rngs::StdRng;
use rand::Rng;
use sim_engine::ecs::{EntityId, EntityKind, EntityRegistry};
use sim_engine::foundation::math::{utils, Vec2};
use slotmap::SecondaryMap;

/// Live asteroids keyed by entity id
#[derive(Debug)]
pub struct AsteroidPopulation {
    config: AsteroidConfig,
    asteroids: SecondaryMap<EntityId, AsteroidState>,
    rng: StdRng,
}

impl AsteroidPopulation {
    /// Create an empty population
    pub fn new(config: AsteroidConfig, rng: StdRng) -> Self {
        Self {
            config,
            asteroids: SecondaryMap::new(),
            rng,
        }
    }

    /// Spawn an asteroid at `origin`
    ///
    /// `size` of `None` (or zero) draws uniformly from
    /// `[min_sprite_size, max_sprite_size]`. A negative size is reported and
    /// replaced by the same random draw. The trajectory is the normalized
    /// hint; a zero hint is rejected.
    pub fn spawn(
        &mut self,
        entities: &mut EntityRegistry,
        outbox: &mut HostOutbox,
        origin: Vec2,
        size: Option<f32>,
        trajectory_hint: Vec2,
    ) -> Result<AsteroidState, SimError> {
        let trajectory =
            utils::normalize_direction(trajectory_hint).ok_or(SimError::InvalidTrajectory)?;
        let size = self.resolve_size(size);
        Ok(self.insert(entities, outbox, origin, size, trajectory))
    }

    /// Split an asteroid into `split_count` smaller ones
    ///
    /// Children are `size * min_split_factor` big, scattered within a disk
    /// of that radius around the parent and sent off in random directions.
    /// The parent is removed. An asteroid too small to split is destroyed
    /// and yields no children; an unknown id yields nothing.
    pub fn split(
        &mut self,
        entities: &mut EntityRegistry,
        outbox: &mut HostOutbox,
        id: EntityId,
    ) -> Vec<AsteroidState> {
        let Some(parent) = self.asteroids.get(id).cloned() else {
            log::debug!("Split ignored, {:?}", SimError::UnknownEntity(id));
            return Vec::new();
        };

        if !parent.can_split(self.config.min_sprite_size) {
            log::debug!("Asteroid {id:?} (size {}) too small to split, destroying", parent.size);
            self.destroy(entities, outbox, id);
            return Vec::new();
        }

        let center = entities.position(id).unwrap_or_else(Vec2::zeros);
        self.destroy(entities, outbox, id);

        let child_size = parent.size * self.config.min_split_factor;
        let mut children = Vec::with_capacity(self.config.split_count);
        for _ in 0..self.config.split_count {
            let position = center + utils::random_in_disk(&mut self.rng, child_size);
            let trajectory = utils::random_unit_vector(&mut self.rng);
            children.push(self.insert(entities, outbox, position, child_size, trajectory));
        }

        log::debug!(
            "Split asteroid {id:?} (size {}) into {} of size {child_size}",
            parent.size,
            children.len()
        );
        children
    }

    /// Remove an asteroid
    ///
    /// Unknown ids are a no-op, which covers an asteroid hit twice in the
    /// same tick.
    pub fn destroy(
        &mut self,
        entities: &mut EntityRegistry,
        outbox: &mut HostOutbox,
        id: EntityId,
    ) -> Option<AsteroidState> {
        let removed = self.asteroids.remove(id)?;
        entities.despawn(id);
        outbox.despawn(id);
        Some(removed)
    }

    /// Count down lifetimes by `dt` seconds and destroy the expired
    pub fn expire_lifetimes(
        &mut self,
        entities: &mut EntityRegistry,
        outbox: &mut HostOutbox,
        dt: f32,
    ) -> Vec<EntityId> {
        let mut expired = Vec::new();
        for (id, asteroid) in &mut self.asteroids {
            asteroid.remaining_lifetime -= dt;
            if asteroid.remaining_lifetime <= 0.0 {
                expired.push(id);
            }
        }

        for &id in &expired {
            self.destroy(entities, outbox, id);
        }
        if !expired.is_empty() {
            log::trace!("{} asteroid(s) reached the end of their lifetime", expired.len());
        }
        expired
    }

    /// Destroy every asteroid, returning how many were removed
    pub fn clear(&mut self, entities: &mut EntityRegistry, outbox: &mut HostOutbox) -> usize {
        let ids: Vec<EntityId> = self.asteroids.keys().collect();
        for &id in &ids {
            self.destroy(entities, outbox, id);
        }
        ids.len()
    }

    /// Look up an asteroid
    pub fn get(&self, id: EntityId) -> Option<&AsteroidState> {
        self.asteroids.get(id)
    }

    /// Whether the asteroid is alive
    pub fn contains(&self, id: EntityId) -> bool {
        self.asteroids.contains_key(id)
    }

    /// Number of live asteroids
    pub fn len(&self) -> usize {
        self.asteroids.len()
    }

    /// Whether no asteroids are alive
    pub fn is_empty(&self) -> bool {
        self.asteroids.is_empty()
    }

    /// Iterate over live asteroids
    pub fn iter(&self) -> impl Iterator<Item = &AsteroidState> {
        self.asteroids.values()
    }

    /// Asteroid tuning
    pub fn config(&self) -> &AsteroidConfig {
        &self.config
    }

    fn resolve_size(&mut self, requested: Option<f32>) -> f32 {
        match requested {
            Some(size) if size.is_finite() && size > 0.0 => size,
            None => self.random_size(),
            Some(size) if size == 0.0 => self.random_size(),
            Some(size) => {
                log::warn!("{}; using a random size", SimError::InvalidSize(size));
                self.random_size()
            }
        }
    }

    fn random_size(&mut self) -> f32 {
        let min = self.config.min_sprite_size;
        let max = self.config.max_sprite_size;
        if max > min {
            self.rng.gen_range(min..=max)
        } else {
            min
        }
    }

    fn insert(
        &mut self,
        entities: &mut EntityRegistry,
        outbox: &mut HostOutbox,
        position: Vec2,
        size: f32,
        trajectory: Vec2,
    ) -> AsteroidState {
        let velocity_seed = trajectory * self.config.speed;
        let id = entities.spawn(EntityKind::Asteroid, position, velocity_seed);
        let asteroid = AsteroidState {
            id,
            size,
            trajectory,
            remaining_lifetime: self.config.max_lifetime,
        };

        let rotation = self.rng.gen_range(0.0..360.0);
        outbox.spawn_asteroid(&asteroid, position, rotation, &self.config);
        self.asteroids.insert(id, asteroid.clone());
        log::debug!("Spawned asteroid {id:?} size {size:.2} at ({:.2}, {:.2})", position.x, position.y);
        asteroid
    }
}
