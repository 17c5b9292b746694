//! Player ship and its bullets
//!
//! The ship keeps one entity id for the whole session. Dying hides it,
//! respawning shows it again with a short window of invulnerability.

use crate::components::{BulletState, PlayerInput, PlayerState};
use crate::config::PlayerConfig;
use crate::error::SimError;
use crate::events::{AudioCue, GameEvent, GameEventBus};
use crate::host::{HostCommand, HostOutbox};
use sim_engine::ecs::{EntityId, EntityKind, EntityRegistry};
use sim_engine::foundation::math::{utils, Vec2};
use slotmap::SecondaryMap;

/// Ship state plus bullets in flight
#[derive(Debug)]
pub struct PlayerController {
    config: PlayerConfig,
    state: PlayerState,
    bullets: SecondaryMap<EntityId, BulletState>,
}

impl PlayerController {
    /// Register the ship entity; it stays hidden until the first respawn
    pub fn new(entities: &mut EntityRegistry, config: PlayerConfig) -> Self {
        let id = entities.spawn(EntityKind::Player, config.spawn_position, Vec2::zeros());
        Self {
            config,
            state: PlayerState {
                id,
                alive: false,
                invulnerable: true,
            },
            bullets: SecondaryMap::new(),
        }
    }

    /// Current ship state
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Ship entity id
    pub fn id(&self) -> EntityId {
        self.state.id
    }

    /// Take the ship out of play after a hit
    pub fn kill(&mut self, outbox: &mut HostOutbox) {
        self.state.alive = false;
        outbox.push(HostCommand::StopPlayer { id: self.state.id });
    }

    /// Put the ship back at its spawn point with collisions off
    pub fn respawn(&mut self, entities: &mut EntityRegistry, outbox: &mut HostOutbox) {
        let id = self.state.id;
        let position = self.config.spawn_position;
        if !entities.set_position(id, position) {
            // Only possible after shutdown removed the ship.
            log::warn!("Respawn ignored, {}", SimError::UnknownEntity(id));
            return;
        }
        self.state.alive = true;
        self.state.invulnerable = true;
        outbox.push(HostCommand::RespawnPlayer { id, position });
        outbox.push(HostCommand::SetPlayerCollisions { id, enabled: false });
        log::debug!("Player respawned at ({:.1}, {:.1})", position.x, position.y);
    }

    /// End the invulnerability window
    pub fn enable_collisions(&mut self, outbox: &mut HostOutbox) {
        if !self.state.alive || !self.state.invulnerable {
            return;
        }
        self.state.invulnerable = false;
        outbox.push(HostCommand::SetPlayerCollisions {
            id: self.state.id,
            enabled: true,
        });
    }

    /// Apply one tick of controls
    ///
    /// Does nothing while the ship is out of play.
    pub fn apply_input(
        &mut self,
        entities: &mut EntityRegistry,
        outbox: &mut HostOutbox,
        events: &mut GameEventBus,
        input: PlayerInput,
    ) {
        if !self.state.alive {
            return;
        }
        let id = self.state.id;

        if input.thrust {
            outbox.push(HostCommand::ApplyThrust {
                id,
                force: self.config.thrust_force,
            });
            events.publish(&GameEvent::AudioCue(AudioCue::Thruster));
        }

        if input.turn != 0.0 && input.turn.is_finite() {
            outbox.push(HostCommand::ApplyTorque {
                id,
                torque: input.turn.clamp(-1.0, 1.0) * self.config.turn_torque,
            });
        }

        if let Some(heading) = input.fire {
            match self.fire(entities, outbox, heading) {
                Ok(_) => events.publish(&GameEvent::AudioCue(AudioCue::Laser)),
                Err(e) => log::warn!("Shot discarded: {e}"),
            }
        }
    }

    /// Fire a bullet from the ship's position along `heading`
    pub fn fire(
        &mut self,
        entities: &mut EntityRegistry,
        outbox: &mut HostOutbox,
        heading: Vec2,
    ) -> Result<EntityId, SimError> {
        let direction = utils::normalize_direction(heading).ok_or(SimError::InvalidTrajectory)?;
        let position = entities
            .position(self.state.id)
            .ok_or(SimError::UnknownEntity(self.state.id))?;
        let impulse = direction * self.config.bullet_speed;

        let id = entities.spawn(EntityKind::Bullet, position, impulse);
        self.bullets.insert(
            id,
            BulletState {
                id,
                remaining_lifetime: self.config.bullet_lifetime,
            },
        );
        outbox.push(HostCommand::SpawnBullet {
            id,
            position,
            impulse,
        });
        Ok(id)
    }

    /// Remove a bullet; unknown ids are a no-op
    pub fn remove_bullet(
        &mut self,
        entities: &mut EntityRegistry,
        outbox: &mut HostOutbox,
        id: EntityId,
    ) -> bool {
        if self.bullets.remove(id).is_none() {
            return false;
        }
        entities.despawn(id);
        outbox.despawn(id);
        true
    }

    /// Count down bullet lifetimes by `dt` seconds and remove the expired
    pub fn expire_bullets(
        &mut self,
        entities: &mut EntityRegistry,
        outbox: &mut HostOutbox,
        dt: f32,
    ) -> Vec<EntityId> {
        let mut expired = Vec::new();
        for (id, bullet) in &mut self.bullets {
            bullet.remaining_lifetime -= dt;
            if bullet.remaining_lifetime <= 0.0 {
                expired.push(id);
            }
        }
        for &id in &expired {
            self.remove_bullet(entities, outbox, id);
        }
        expired
    }

    /// Remove every bullet in flight
    pub fn clear_bullets(&mut self, entities: &mut EntityRegistry, outbox: &mut HostOutbox) -> usize {
        let ids: Vec<EntityId> = self.bullets.keys().collect();
        for &id in &ids {
            self.remove_bullet(entities, outbox, id);
        }
        ids.len()
    }

    /// Whether a bullet is in flight
    pub fn has_bullet(&self, id: EntityId) -> bool {
        self.bullets.contains_key(id)
    }

    /// Look up a bullet in flight
    pub fn bullet(&self, id: EntityId) -> Option<&BulletState> {
        self.bullets.get(id)
    }

    /// Number of bullets in flight
    pub fn bullet_count(&self) -> usize {
        self.bullets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::GameEventKind;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn setup() -> (EntityRegistry, HostOutbox, PlayerController) {
        let mut entities = EntityRegistry::new();
        let player = PlayerController::new(&mut entities, PlayerConfig::default());
        (entities, HostOutbox::new(), player)
    }

    #[test]
    fn test_new_player_starts_hidden() {
        let (entities, _, player) = setup();
        assert!(!player.state().alive);
        assert_eq!(entities.kind(player.id()), Some(EntityKind::Player));
    }

    #[test]
    fn test_respawn_then_enable_collisions() {
        let (mut entities, mut outbox, mut player) = setup();
        entities.set_position(player.id(), Vec2::new(5.0, 5.0));

        player.respawn(&mut entities, &mut outbox);
        assert!(player.state().alive);
        assert!(player.state().invulnerable);
        assert_eq!(entities.position(player.id()), Some(Vec2::zeros()));

        player.enable_collisions(&mut outbox);
        assert!(player.state().is_vulnerable());
        assert_eq!(
            outbox.drain(),
            vec![
                HostCommand::RespawnPlayer { id: player.id(), position: Vec2::zeros() },
                HostCommand::SetPlayerCollisions { id: player.id(), enabled: false },
                HostCommand::SetPlayerCollisions { id: player.id(), enabled: true },
            ]
        );
    }

    #[test]
    fn test_enable_collisions_ignored_while_dead() {
        let (_, mut outbox, mut player) = setup();
        player.enable_collisions(&mut outbox);
        assert!(player.state().invulnerable);
        assert!(outbox.is_empty());
    }

    #[test]
    fn test_fire_and_expire_bullet() {
        let (mut entities, mut outbox, mut player) = setup();
        let id = player.fire(&mut entities, &mut outbox, Vec2::new(0.0, 2.0)).unwrap();

        assert!(player.has_bullet(id));
        assert_eq!(entities.kind(id), Some(EntityKind::Bullet));
        assert!(player.expire_bullets(&mut entities, &mut outbox, 4.0).is_empty());
        assert_eq!(player.expire_bullets(&mut entities, &mut outbox, 1.0), vec![id]);
        assert!(!entities.contains(id));
        assert_eq!(player.bullet_count(), 0);
    }

    #[test]
    fn test_fire_rejects_zero_heading() {
        let (mut entities, mut outbox, mut player) = setup();
        assert_eq!(
            player.fire(&mut entities, &mut outbox, Vec2::zeros()),
            Err(SimError::InvalidTrajectory)
        );
        assert_eq!(player.bullet_count(), 0);
    }

    #[test]
    fn test_apply_input_emits_cues_only_when_alive() {
        let (mut entities, mut outbox, mut player) = setup();
        let cues = Rc::new(RefCell::new(Vec::new()));
        let mut events = GameEventBus::new();
        let log = Rc::clone(&cues);
        events.register_handler(
            GameEventKind::AudioCue,
            Box::new(move |event: &GameEvent| {
                log.borrow_mut().push(event.clone());
                false
            }),
        );
        let input = PlayerInput {
            thrust: true,
            turn: -3.0,
            fire: Some(Vec2::new(1.0, 0.0)),
        };

        player.apply_input(&mut entities, &mut outbox, &mut events, input);
        assert!(cues.borrow().is_empty());

        player.respawn(&mut entities, &mut outbox);
        outbox.drain();
        player.apply_input(&mut entities, &mut outbox, &mut events, input);

        assert_eq!(
            *cues.borrow(),
            vec![
                GameEvent::AudioCue(AudioCue::Thruster),
                GameEvent::AudioCue(AudioCue::Laser)
            ]
        );
        let commands = outbox.drain();
        assert!(commands.contains(&HostCommand::ApplyTorque { id: player.id(), torque: -1.0 }));
        assert_eq!(player.bullet_count(), 1);
    }

    #[test]
    fn test_clear_bullets() {
        let (mut entities, mut outbox, mut player) = setup();
        for _ in 0..3 {
            player.fire(&mut entities, &mut outbox, Vec2::new(1.0, 1.0)).unwrap();
        }
        assert_eq!(player.clear_bullets(&mut entities, &mut outbox), 3);
        assert_eq!(entities.count_of(EntityKind::Bullet), 0);
    }
}
