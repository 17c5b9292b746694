//! Simulation errors
//!
//! None of these are fatal. Each is absorbed where it happens and the
//! offending operation is dropped so the game stays playable.

use sim_engine::ecs::EntityId;
use thiserror::Error;

/// Errors raised by simulation operations
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SimError {
    /// A direction with no length (or non-finite) was requested
    #[error("Invalid trajectory: direction must be a non-zero finite vector")]
    InvalidTrajectory,

    /// An operation referenced an id that is not alive
    #[error("Unknown entity: {0:?}")]
    UnknownEntity(EntityId),

    /// A negative or non-finite size was requested
    #[error("Invalid asteroid size: {0}")]
    InvalidSize(f32),
}
