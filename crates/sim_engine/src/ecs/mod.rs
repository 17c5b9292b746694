//! Entity bookkeeping
//!
//! The core never owns host objects. It refers to them by [`EntityId`] and
//! keeps a small record per entity in the [`EntityRegistry`].

mod entity;

pub use entity::{EntityId, EntityKind, EntityRecord, EntityRegistry};
