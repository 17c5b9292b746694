//! Headless asteroids runner
//!
//! Stands in for the physics host: fires at the first asteroid it knows
//! about, reports a hit a few ticks later, and lets asteroids ram the ship
//! now and then, until the game ends or the time limit runs out.
//!
//! Usage: `asteroids [config.toml|config.ron] [seconds]`

use asteroids::{Contact, GameConfig, GameEvent, GameEventKind, HostCommand, PlayerInput, Session, SessionState, UiCommand};
use sim_engine::ecs::EntityId;
use sim_engine::foundation::logging;
use sim_engine::foundation::math::Vec2;
use std::collections::VecDeque;

const DEFAULT_CONFIG_PATH: &str = "config/asteroids.toml";
const DEFAULT_RUN_SECONDS: f32 = 120.0;
const BULLET_FLIGHT_TICKS: u64 = 6;
const RAM_INTERVAL_TICKS: u64 = 900;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let seconds = match args.next() {
        Some(arg) => arg.parse::<f32>()?,
        None => DEFAULT_RUN_SECONDS,
    };

    let config = GameConfig::load_or_default(&config_path);
    let mut session = Session::new(config)?;
    session.subscribe(
        GameEventKind::ScoreChanged,
        Box::new(|event: &GameEvent| {
            if let GameEvent::ScoreChanged(score) = event {
                log::info!("Score: {score}");
            }
            false
        }),
    );
    session.subscribe(
        GameEventKind::LivesChanged,
        Box::new(|event: &GameEvent| {
            if let GameEvent::LivesChanged(lives) = event {
                log::info!("Lives: {lives}");
            }
            false
        }),
    );

    let total_ticks = session.clock().seconds_to_ticks(seconds);
    session.start();

    let mut host = ScriptedHost::default();
    host.apply(session.drain_host_commands());

    while session.clock().tick() < total_ticks {
        let now = session.clock().tick();

        if session.state() == SessionState::GameOverPending {
            session.handle_command(UiCommand::AcknowledgeGameOver);
            log::info!("Final score: {}", session.score());
            break;
        }

        if let Some(target) = host.asteroids.first().copied() {
            if host.in_flight.is_empty() {
                let ship = session
                    .entities()
                    .position(session.player().id())
                    .unwrap_or_else(Vec2::zeros);
                let heading = session
                    .entities()
                    .position(target)
                    .map_or_else(|| Vec2::new(0.0, 1.0), |p| p - ship);
                session.apply_input(PlayerInput {
                    fire: Some(heading),
                    ..PlayerInput::default()
                });
                host.apply(session.drain_host_commands());
            }
        }

        let contacts = host.contacts(now, session.player().id());
        session.tick(&contacts);
        host.apply(session.drain_host_commands());
    }

    log::info!(
        "Stopped after {} tick(s): score {}, lives {}, state {:?}",
        session.clock().tick(),
        session.score(),
        session.lives(),
        session.state()
    );
    session.handle_command(UiCommand::QuitGame);
    Ok(())
}

/// Minimal host bookkeeping: which objects exist and which shots land
#[derive(Default)]
struct ScriptedHost {
    asteroids: Vec<EntityId>,
    in_flight: VecDeque<(EntityId, u64)>,
    player_visible: bool,
    ticks_seen: u64,
}

impl ScriptedHost {
    fn apply(&mut self, commands: Vec<HostCommand>) {
        for command in commands {
            match command {
                HostCommand::SpawnAsteroid { id, .. } => self.asteroids.push(id),
                HostCommand::SpawnBullet { id, .. } => self.in_flight.push_back((id, self.ticks_seen)),
                HostCommand::Despawn { id } => {
                    self.asteroids.retain(|&a| a != id);
                    self.in_flight.retain(|&(b, _)| b != id);
                }
                HostCommand::StopPlayer { .. } => self.player_visible = false,
                HostCommand::RespawnPlayer { .. } => self.player_visible = true,
                HostCommand::SetPlayerCollisions { .. }
                | HostCommand::ApplyThrust { .. }
                | HostCommand::ApplyTorque { .. } => {}
            }
        }
    }

    fn contacts(&mut self, now: u64, player: EntityId) -> Vec<Contact> {
        self.ticks_seen = now;
        let mut contacts = Vec::new();

        if let (Some(&(bullet, fired)), Some(&asteroid)) = (self.in_flight.front(), self.asteroids.first()) {
            if now.saturating_sub(fired) >= BULLET_FLIGHT_TICKS {
                contacts.push(Contact::new(bullet, asteroid));
            }
        }

        if self.player_visible && now > 0 && now % RAM_INTERVAL_TICKS == 0 {
            if let Some(&asteroid) = self.asteroids.last() {
                contacts.push(Contact::new(asteroid, player));
            }
        }
        contacts
    }
}
