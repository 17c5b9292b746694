//! Game session state machine
//!
//! The [`Session`] owns and wires every component. The host drives it:
//!
//! 1. [`Session::new`] validates the config and builds the components.
//! 2. Observers subscribe through [`Session::subscribe`].
//! 3. [`Session::start`] publishes the initial score/lives, shows the ship
//!    and starts the spawner.
//! 4. Each frame the host calls [`Session::tick`] with that frame's
//!    contacts and applies [`Session::drain_host_commands`].
//! 5. [`Session::shutdown`] tears everything down.
//!
//! ```text
//!   Active --(lives reach 0)--> GameOverPending --(ack)--> GameOver
//!     ^  |                                                   |
//!     |  +--(pause)--> Paused --(pause)--> Active            |
//!     +------------(PlayAgain, after game_reset_delay)-------+
//! ```

use crate::collision::{CollisionResolver, ContactOutcome, ResolveContext};
use crate::components::{AsteroidState, PlayerInput};
use crate::config::GameConfig;
use crate::error::SimError;
use crate::events::{GameEvent, GameEventBus, GameEventKind, UiCommand};
use crate::host::{Contact, HostCommand, HostOutbox};
use crate::ledger::ScoreLivesLedger;
use crate::player::PlayerController;
use crate::population::AsteroidPopulation;
use crate::spawner::SpawnScheduler;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sim_engine::config::{Config, ConfigError};
use sim_engine::ecs::{EntityId, EntityRegistry};
use sim_engine::events::{EventHandler, TaskId, TaskQueue};
use sim_engine::foundation::math::Vec2;
use sim_engine::foundation::time::SimClock;

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Game running
    Active,
    /// Frozen by the player
    Paused,
    /// Last life lost, waiting for the UI to show the game over display
    GameOverPending,
    /// Game over display showing, waiting for PlayAgain
    GameOver,
}

/// Timed work queued on the session clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTask {
    /// Spawner timer
    SpawnWave,
    /// Bring the ship back after a hit
    RespawnPlayer,
    /// End the post-spawn invulnerability window
    EnablePlayerCollisions,
    /// Start a fresh game
    ResetGame,
}

/// One game run across Active/Paused/GameOver cycles
pub struct Session {
    config: GameConfig,
    state: SessionState,
    clock: SimClock,
    tasks: TaskQueue<SessionTask>,
    entities: EntityRegistry,
    population: AsteroidPopulation,
    player: PlayerController,
    ledger: ScoreLivesLedger,
    spawner: SpawnScheduler,
    resolver: CollisionResolver,
    outbox: HostOutbox,
    events: GameEventBus,
    pending_respawn: Option<TaskId>,
    pending_invulnerability: Option<TaskId>,
    pending_reset: Option<TaskId>,
    game_over_announced: bool,
    started: bool,
    running: bool,
}

impl Session {
    /// Build a session from a validated config
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let (population_rng, spawner_rng) = match config.session.rng_seed {
            Some(seed) => (StdRng::seed_from_u64(seed), StdRng::seed_from_u64(seed.wrapping_add(1))),
            None => (StdRng::from_entropy(), StdRng::from_entropy()),
        };

        let mut entities = EntityRegistry::new();
        let player = PlayerController::new(&mut entities, config.player.clone());

        Ok(Self {
            state: SessionState::Active,
            clock: SimClock::new(config.session.tick_rate),
            tasks: TaskQueue::new(),
            population: AsteroidPopulation::new(config.asteroid.clone(), population_rng),
            player,
            ledger: ScoreLivesLedger::new(config.session.starting_lives),
            spawner: SpawnScheduler::new(config.spawner.clone(), spawner_rng),
            resolver: CollisionResolver::new(config.asteroid.points_per_kill),
            outbox: HostOutbox::new(),
            events: GameEventBus::new(),
            entities,
            pending_respawn: None,
            pending_invulnerability: None,
            pending_reset: None,
            game_over_announced: false,
            started: false,
            running: true,
            config,
        })
    }

    /// Register an observer for one kind of event
    pub fn subscribe(&mut self, kind: GameEventKind, handler: Box<dyn EventHandler<GameEvent>>) {
        self.events.register_handler(kind, handler);
    }

    /// Register an observer for every event
    pub fn subscribe_all(&mut self, handler: Box<dyn EventHandler<GameEvent>>) {
        self.events.register_catch_all(handler);
    }

    /// Begin the first game
    ///
    /// Calling it again does nothing.
    pub fn start(&mut self) {
        if self.started || !self.running {
            return;
        }
        self.started = true;
        log::info!(
            "Session started: {} lives, {} Hz",
            self.config.session.starting_lives,
            self.clock.tick_rate()
        );
        self.ledger.reset(self.config.session.starting_lives, &mut self.events);
        self.respawn_player();
        self.spawner.start(&self.clock, &mut self.tasks);
    }

    /// Advance the simulation one fixed step
    ///
    /// Due timers run first, then lifetimes expire, then contacts are
    /// resolved in the order given. While paused nothing moves and the
    /// contacts are dropped. Returns the outcome of every contact resolved.
    pub fn tick(&mut self, contacts: &[Contact]) -> Vec<ContactOutcome> {
        if !self.running || !self.started || self.state == SessionState::Paused {
            return Vec::new();
        }

        let now = self.clock.advance();
        self.run_due_tasks(now);

        let dt = self.clock.delta_time();
        self.population.expire_lifetimes(&mut self.entities, &mut self.outbox, dt);
        self.player.expire_bullets(&mut self.entities, &mut self.outbox, dt);

        let mut outcomes = Vec::new();
        for &contact in contacts {
            // A hit that ends the game stops the rest of this tick's contacts.
            if self.state != SessionState::Active {
                log::trace!("Dropping contact while {:?}: {contact:?}", self.state);
                continue;
            }
            let outcome = self.resolver.resolve(
                contact,
                &mut ResolveContext {
                    entities: &mut self.entities,
                    population: &mut self.population,
                    player: &mut self.player,
                    ledger: &mut self.ledger,
                    outbox: &mut self.outbox,
                    events: &mut self.events,
                },
            );
            if let ContactOutcome::PlayerHit { remaining_lives } = outcome {
                self.on_player_hit(remaining_lives);
            }
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Apply this tick's ship controls
    pub fn apply_input(&mut self, input: PlayerInput) {
        if !self.running || self.state != SessionState::Active {
            return;
        }
        self.player
            .apply_input(&mut self.entities, &mut self.outbox, &mut self.events, input);
    }

    /// Spawn an asteroid outside the spawner's schedule
    ///
    /// `size` follows [`AsteroidPopulation::spawn`].
    pub fn spawn_asteroid(
        &mut self,
        position: Vec2,
        size: Option<f32>,
        trajectory_hint: Vec2,
    ) -> Result<AsteroidState, SimError> {
        self.population
            .spawn(&mut self.entities, &mut self.outbox, position, size, trajectory_hint)
    }

    /// Handle a command from the UI
    pub fn handle_command(&mut self, command: UiCommand) {
        if !self.running {
            return;
        }
        match command {
            UiCommand::PlayAgain => self.play_again(),
            UiCommand::Pause(pause) => self.set_paused(pause),
            UiCommand::AcknowledgeGameOver => {
                if self.state == SessionState::GameOverPending {
                    self.transition(SessionState::GameOver);
                }
            }
            UiCommand::QuitGame => {
                log::info!("Quit requested");
                self.shutdown();
            }
        }
    }

    /// Flip between Active and Paused
    pub fn toggle_pause(&mut self) {
        match self.state {
            SessionState::Active => self.set_paused(true),
            SessionState::Paused => self.set_paused(false),
            SessionState::GameOverPending | SessionState::GameOver => {}
        }
    }

    /// Record a position reported by the host
    ///
    /// Returns `false` for unknown ids.
    pub fn sync_position(&mut self, id: EntityId, position: Vec2) -> bool {
        self.entities.set_position(id, position)
    }

    /// Take every command queued for the host, oldest first
    pub fn drain_host_commands(&mut self) -> Vec<HostCommand> {
        self.outbox.drain()
    }

    /// Tear everything down; further ticks and commands are ignored
    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        self.spawner.stop(&mut self.tasks);
        self.tasks.clear();
        self.population.clear(&mut self.entities, &mut self.outbox);
        self.player.clear_bullets(&mut self.entities, &mut self.outbox);
        let player = self.player.id();
        if self.entities.despawn(player).is_some() {
            self.outbox.despawn(player);
        }
        self.events.clear_handlers();
        self.running = false;
        log::info!("Session shut down at tick {} with score {}", self.clock.tick(), self.ledger.score());
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the session still accepts ticks
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current score
    pub fn score(&self) -> u32 {
        self.ledger.score()
    }

    /// Lives left
    pub fn lives(&self) -> u32 {
        self.ledger.lives()
    }

    /// Score and lives
    pub fn ledger(&self) -> &ScoreLivesLedger {
        &self.ledger
    }

    /// Live asteroids
    pub fn population(&self) -> &AsteroidPopulation {
        &self.population
    }

    /// Ship and bullets
    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    /// All live entities
    pub fn entities(&self) -> &EntityRegistry {
        &self.entities
    }

    /// Spawn scheduler
    pub fn spawner(&self) -> &SpawnScheduler {
        &self.spawner
    }

    /// Simulation clock
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Session configuration
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Whether a PlayAgain reset is counting down
    pub fn reset_pending(&self) -> bool {
        self.pending_reset.is_some()
    }

    fn run_due_tasks(&mut self, now: u64) {
        for (id, task) in self.tasks.drain_due_with_ids(now) {
            match task {
                SessionTask::SpawnWave => {
                    self.spawner.fire(
                        id,
                        &self.clock,
                        &mut self.tasks,
                        &mut self.population,
                        &mut self.entities,
                        &mut self.outbox,
                    );
                }
                SessionTask::RespawnPlayer => {
                    self.pending_respawn = None;
                    self.respawn_player();
                }
                SessionTask::EnablePlayerCollisions => {
                    self.pending_invulnerability = None;
                    self.player.enable_collisions(&mut self.outbox);
                }
                SessionTask::ResetGame => {
                    self.pending_reset = None;
                    self.reset_game();
                }
            }
        }
    }

    fn on_player_hit(&mut self, remaining_lives: u32) {
        if remaining_lives > 0 {
            let due = self.clock.ticks_after(self.config.session.respawn_delay);
            self.pending_respawn = Some(self.tasks.schedule(due, SessionTask::RespawnPlayer));
        } else {
            self.enter_game_over_pending();
        }
    }

    fn enter_game_over_pending(&mut self) {
        if self.game_over_announced {
            return;
        }
        self.game_over_announced = true;
        self.spawner.stop(&mut self.tasks);
        self.cancel_player_tasks();
        log::info!("Game over with score {}", self.ledger.score());
        self.transition(SessionState::GameOverPending);
        self.events.publish(&GameEvent::GameOverPending);
    }

    fn play_again(&mut self) {
        if self.state != SessionState::GameOver {
            log::debug!("PlayAgain ignored while {:?}", self.state);
            return;
        }
        if self.pending_reset.is_some() {
            return;
        }
        let due = self.clock.ticks_after(self.config.session.game_reset_delay);
        self.pending_reset = Some(self.tasks.schedule(due, SessionTask::ResetGame));
        log::info!("New game in {}s", self.config.session.game_reset_delay);
    }

    fn reset_game(&mut self) {
        let cleared = self.population.clear(&mut self.entities, &mut self.outbox);
        self.player.clear_bullets(&mut self.entities, &mut self.outbox);
        self.ledger.reset(self.config.session.starting_lives, &mut self.events);
        self.cancel_player_tasks();
        self.respawn_player();
        self.spawner.start(&self.clock, &mut self.tasks);
        self.game_over_announced = false;
        log::info!("Game reset, cleared {cleared} asteroid(s)");
        self.transition(SessionState::Active);
    }

    fn respawn_player(&mut self) {
        self.player.respawn(&mut self.entities, &mut self.outbox);
        let due = self.clock.ticks_after(self.config.session.invulnerability_delay);
        self.pending_invulnerability = Some(self.tasks.schedule(due, SessionTask::EnablePlayerCollisions));
    }

    fn cancel_player_tasks(&mut self) {
        if let Some(id) = self.pending_respawn.take() {
            self.tasks.cancel(id);
        }
        if let Some(id) = self.pending_invulnerability.take() {
            self.tasks.cancel(id);
        }
    }

    fn set_paused(&mut self, pause: bool) {
        match (self.state, pause) {
            (SessionState::Active, true) => self.transition(SessionState::Paused),
            (SessionState::Paused, false) => self.transition(SessionState::Active),
            _ => log::debug!("Pause({pause}) ignored while {:?}", self.state),
        }
    }

    fn transition(&mut self, to: SessionState) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        log::info!("Session {from:?} -> {to:?}");
        self.events.publish(&GameEvent::StateChanged { from, to });
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("tick", &self.clock.tick())
            .field("score", &self.ledger.score())
            .field("lives", &self.ledger.lives())
            .field("asteroids", &self.population.len())
            .field("running", &self.running)
            .finish_non_exhaustive()
    }
}
