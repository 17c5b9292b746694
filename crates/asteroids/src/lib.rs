//! # Asteroids
//!
//! Simulation core for an Asteroids-style game. The physics and rendering
//! host owns the actual bodies; this crate decides what happens to them.
//!
//! Per fixed step the host hands [`Session::tick`] the contacts its collision
//! layer found and gets back [`HostCommand`]s to apply (spawn, despawn,
//! respawn, impulses). Score, lives, state changes, explosions and sound cues
//! go out to observers through the [`GameEvent`] bus.
//!
//! ```rust
//! use asteroids::{GameConfig, Session, SessionState};
//!
//! let mut config = GameConfig::default();
//! config.session.rng_seed = Some(7);
//! let mut session = Session::new(config).unwrap();
//! session.start();
//!
//! for _ in 0..120 {
//!     session.tick(&[]);
//! }
//! assert_eq!(session.state(), SessionState::Active);
//! assert_eq!(session.population().len(), 1);
//! assert!(!session.drain_host_commands().is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

pub mod collision;
pub mod components;
pub mod config;
pub mod error;
pub mod events;
pub mod host;
pub mod ledger;
pub mod player;
pub mod population;
pub mod session;
pub mod spawner;

#[cfg(test)]
mod tests;

pub use collision::{CollisionResolver, ContactOutcome};
pub use components::{AsteroidState, BulletState, PlayerInput, PlayerState};
pub use config::GameConfig;
pub use error::SimError;
pub use events::{AudioCue, GameEvent, GameEventBus, GameEventKind, UiCommand};
pub use host::{Contact, HostCommand, HostOutbox};
pub use ledger::ScoreLivesLedger;
pub use player::PlayerController;
pub use population::AsteroidPopulation;
pub use session::{Session, SessionState, SessionTask};
pub use spawner::SpawnScheduler;
