//! Spawn scheduler
//!
//! Sends a wave of asteroids in from a ring around the origin every
//! `spawn_rate` seconds. The repeating timer is a single pending entry in
//! the session task queue that re-arms itself each time it fires.

use crate::components::AsteroidState;
use crate::config::SpawnerConfig;
use crate::host::HostOutbox;
use crate::population::AsteroidPopulation;
use crate::session::SessionTask;
use rand::rngs::StdRng;
use rand::Rng;
use sim_engine::ecs::EntityRegistry;
use sim_engine::events::{TaskId, TaskQueue};
use sim_engine::foundation::math::{utils, Vec2};
use sim_engine::foundation::time::SimClock;

/// Where and which way one asteroid of a wave goes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPlan {
    /// Point on the spawn ring
    pub position: Vec2,
    /// Heading roughly toward the origin
    pub trajectory_hint: Vec2,
}

/// Periodic asteroid spawner
#[derive(Debug)]
pub struct SpawnScheduler {
    config: SpawnerConfig,
    rng: StdRng,
    pending: Option<TaskId>,
    waves: u64,
}

impl SpawnScheduler {
    /// Create a stopped scheduler
    pub fn new(config: SpawnerConfig, rng: StdRng) -> Self {
        Self {
            config,
            rng,
            pending: None,
            waves: 0,
        }
    }

    /// Arm the timer; the first wave comes one period from now
    ///
    /// Returns `false` if it was already running.
    pub fn start(&mut self, clock: &SimClock, tasks: &mut TaskQueue<SessionTask>) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.arm(clock, tasks);
        log::debug!("Spawner started, every {}s", self.config.spawn_rate);
        true
    }

    /// Cancel the pending wave
    ///
    /// Returns `false` if it was not running.
    pub fn stop(&mut self, tasks: &mut TaskQueue<SessionTask>) -> bool {
        let Some(id) = self.pending.take() else {
            return false;
        };
        tasks.cancel(id);
        log::debug!("Spawner stopped");
        true
    }

    /// Whether a wave is scheduled
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Waves fired since creation
    pub fn waves_fired(&self) -> u64 {
        self.waves
    }

    /// Handle the timer firing: spawn a wave and re-arm
    ///
    /// A task id that is not the current pending one (left over from
    /// before a stop) spawns nothing.
    pub fn fire(
        &mut self,
        task: TaskId,
        clock: &SimClock,
        tasks: &mut TaskQueue<SessionTask>,
        population: &mut AsteroidPopulation,
        entities: &mut EntityRegistry,
        outbox: &mut HostOutbox,
    ) -> Vec<AsteroidState> {
        if self.pending != Some(task) {
            log::debug!("Ignoring stale spawn timer {task:?}");
            return Vec::new();
        }
        self.arm(clock, tasks);
        self.waves += 1;

        let mut spawned = Vec::new();
        for plan in self.plan_wave() {
            match population.spawn(entities, outbox, plan.position, None, plan.trajectory_hint) {
                Ok(asteroid) => spawned.push(asteroid),
                Err(e) => log::warn!("Wave spawn discarded: {e}"),
            }
        }
        log::trace!("Wave {} spawned {} asteroid(s)", self.waves, spawned.len());
        spawned
    }

    /// Pick positions and headings for one wave
    pub fn plan_wave(&mut self) -> Vec<SpawnPlan> {
        (0..self.config.spawn_amount)
            .map(|_| {
                let outward = utils::random_unit_vector(&mut self.rng);
                let variance = self.config.trajectory_variance;
                let deviation = if variance > 0.0 {
                    self.rng.gen_range(-variance..=variance)
                } else {
                    0.0
                };
                SpawnPlan {
                    position: self.config.origin + outward * self.config.spawn_radius,
                    trajectory_hint: utils::rotate_degrees(-outward, deviation),
                }
            })
            .collect()
    }

    fn arm(&mut self, clock: &SimClock, tasks: &mut TaskQueue<SessionTask>) {
        let due = clock.ticks_after(self.config.spawn_rate);
        self.pending = Some(tasks.schedule(due, SessionTask::SpawnWave));
    }
}
