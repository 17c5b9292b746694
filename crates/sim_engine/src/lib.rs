//! # Sim Engine
//!
//! Engine-independent building blocks for fixed-step 2D game simulations.
//!
//! The host (physics, rendering, audio, UI) stays outside this crate. What
//! lives here is the bookkeeping a game core needs to talk to that host
//! without owning any of its objects:
//!
//! - **Entities**: generational ids handed out by [`ecs::EntityRegistry`]
//! - **Events**: a synchronous, typed observer bus ([`events::EventBus`])
//! - **Scheduling**: a task queue keyed by due tick ([`events::TaskQueue`])
//! - **Time**: a pause-friendly fixed-step clock ([`foundation::time::SimClock`])
//! - **Config**: TOML/RON loading through the [`config::Config`] trait
//!
//! ## Quick Start
//!
//! ```rust
//! use sim_engine::prelude::*;
//!
//! let mut registry = EntityRegistry::new();
//! let id = registry.spawn(EntityKind::Asteroid, Vec2::new(1.0, 0.0), Vec2::zeros());
//!
//! let mut clock = SimClock::new(60.0);
//! let mut tasks = TaskQueue::new();
//! tasks.schedule(clock.ticks_after(0.5), "despawn");
//!
//! for _ in 0..30 {
//!     clock.advance();
//! }
//! assert_eq!(tasks.drain_due(clock.tick()), vec!["despawn"]);
//! assert!(registry.despawn(id).is_some());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod ecs;
pub mod events;
pub mod foundation;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        ecs::{EntityId, EntityKind, EntityRecord, EntityRegistry},
        events::{Event, EventBus, EventHandler, TaskId, TaskQueue},
        foundation::{
            math::{Vec2, Point2},
            time::SimClock,
        },
    };
}
