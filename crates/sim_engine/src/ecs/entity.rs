//! Entity implementation

use crate::foundation::math::Vec2;
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Entity identifier
    ///
    /// Generational: once an entity is despawned its id never matches a
    /// later entity, so late events referencing it resolve to nothing.
    pub struct EntityId;
}

/// What an entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Asteroid rock
    Asteroid,
    /// Player projectile
    Bullet,
    /// Player ship
    Player,
}

/// Per-entity data the core tracks
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    /// Entity kind
    pub kind: EntityKind,

    /// Last known position
    pub position: Vec2,

    /// Initial velocity requested from the host
    pub velocity_seed: Vec2,
}

/// Arena of live entities keyed by [`EntityId`]
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: SlotMap<EntityId, EntityRecord>,
}

impl EntityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new entity
    pub fn spawn(&mut self, kind: EntityKind, position: Vec2, velocity_seed: Vec2) -> EntityId {
        self.entities.insert(EntityRecord {
            kind,
            position,
            velocity_seed,
        })
    }

    /// Remove an entity, returning its record if it was alive
    pub fn despawn(&mut self, id: EntityId) -> Option<EntityRecord> {
        self.entities.remove(id)
    }

    /// Whether the id refers to a live entity
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Kind of a live entity
    pub fn kind(&self, id: EntityId) -> Option<EntityKind> {
        self.entities.get(id).map(|record| record.kind)
    }

    /// Last known position of a live entity
    pub fn position(&self, id: EntityId) -> Option<Vec2> {
        self.entities.get(id).map(|record| record.position)
    }

    /// Record a new position reported by the host
    ///
    /// Returns `false` if the entity no longer exists.
    pub fn set_position(&mut self, id: EntityId, position: Vec2) -> bool {
        match self.entities.get_mut(id) {
            Some(record) => {
                record.position = position;
                true
            }
            None => false,
        }
    }

    /// Borrow a record
    pub fn get(&self, id: EntityId) -> Option<&EntityRecord> {
        self.entities.get(id)
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether no entities are alive
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of live entities of one kind
    pub fn count_of(&self, kind: EntityKind) -> usize {
        self.entities.values().filter(|record| record.kind == kind).count()
    }

    /// Iterate over live entities
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &EntityRecord)> {
        self.entities.iter()
    }
}
