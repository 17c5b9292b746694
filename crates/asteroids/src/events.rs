//! Notifications for the UI, audio and effects collaborators, and the
//! commands the UI sends back

use crate::session::SessionState;
use sim_engine::events::{Event, EventBus};
use sim_engine::foundation::math::Vec2;

/// Fire-and-forget sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// Asteroid or ship destroyed
    Explosion,
    /// Bullet fired
    Laser,
    /// Ship thrusting
    Thruster,
}

/// Events raised by the simulation core
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Score changed; carries the new score
    ScoreChanged(u32),
    /// Lives changed; carries the new lives
    LivesChanged(u32),
    /// Last life lost; the UI should show the game over display
    GameOverPending,
    /// Session moved between states
    StateChanged {
        /// Previous state
        from: SessionState,
        /// New state
        to: SessionState,
    },
    /// Play an explosion effect here
    ExplosionAt(Vec2),
    /// Play a sound
    AudioCue(AudioCue),
}

/// Routing key for [`GameEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameEventKind {
    /// [`GameEvent::ScoreChanged`]
    ScoreChanged,
    /// [`GameEvent::LivesChanged`]
    LivesChanged,
    /// [`GameEvent::GameOverPending`]
    GameOverPending,
    /// [`GameEvent::StateChanged`]
    StateChanged,
    /// [`GameEvent::ExplosionAt`]
    ExplosionAt,
    /// [`GameEvent::AudioCue`]
    AudioCue,
}

impl Event for GameEvent {
    type Kind = GameEventKind;

    fn kind(&self) -> GameEventKind {
        match self {
            Self::ScoreChanged(_) => GameEventKind::ScoreChanged,
            Self::LivesChanged(_) => GameEventKind::LivesChanged,
            Self::GameOverPending => GameEventKind::GameOverPending,
            Self::StateChanged { .. } => GameEventKind::StateChanged,
            Self::ExplosionAt(_) => GameEventKind::ExplosionAt,
            Self::AudioCue(_) => GameEventKind::AudioCue,
        }
    }
}

/// Bus carrying [`GameEvent`]s
pub type GameEventBus = EventBus<GameEvent>;

/// Commands sent by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    /// Start a new game after the reset delay
    PlayAgain,
    /// Pause (`true`) or resume (`false`)
    Pause(bool),
    /// The game over display is showing
    AcknowledgeGameOver,
    /// Leave the game
    QuitGame,
}
