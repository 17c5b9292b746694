//! Collision resolver
//!
//! Turns contact events reported by the host's collision layer into game
//! outcomes. Only two pairings matter: bullet/asteroid and asteroid/player.
//! Everything else, including contacts naming entities that are already
//! gone, is dropped without error.

use crate::events::{AudioCue, GameEvent, GameEventBus};
use crate::host::{Contact, HostOutbox};
use crate::ledger::ScoreLivesLedger;
use crate::player::PlayerController;
use crate::population::AsteroidPopulation;
use sim_engine::ecs::{EntityId, EntityKind, EntityRegistry};
use sim_engine::foundation::math::Vec2;

/// What a contact did
#[derive(Debug, Clone, PartialEq)]
pub enum ContactOutcome {
    /// A bullet hit an asteroid
    AsteroidDestroyed {
        /// Asteroid that was hit
        asteroid: EntityId,
        /// Bullet that hit it
        bullet: EntityId,
        /// Points awarded
        points: u32,
        /// Fragments created by the split (empty if destroyed outright)
        children: Vec<EntityId>,
    },
    /// An asteroid hit the vulnerable ship
    PlayerHit {
        /// Lives left after the hit
        remaining_lives: u32,
    },
    /// Nothing happened
    Ignored,
}

/// Everything a contact may touch, borrowed for one resolution
pub struct ResolveContext<'a> {
    /// Entity registry
    pub entities: &'a mut EntityRegistry,
    /// Asteroids
    pub population: &'a mut AsteroidPopulation,
    /// Ship and bullets
    pub player: &'a mut PlayerController,
    /// Score and lives
    pub ledger: &'a mut ScoreLivesLedger,
    /// Commands for the host
    pub outbox: &'a mut HostOutbox,
    /// Observers
    pub events: &'a mut GameEventBus,
}

/// Decides the outcome of each contact
#[derive(Debug, Clone)]
pub struct CollisionResolver {
    points_per_kill: u32,
}

impl CollisionResolver {
    /// Create a resolver awarding `points_per_kill / size` per asteroid
    pub fn new(points_per_kill: u32) -> Self {
        Self { points_per_kill }
    }

    /// Resolve one contact
    pub fn resolve(&self, contact: Contact, ctx: &mut ResolveContext<'_>) -> ContactOutcome {
        let kinds = (ctx.entities.kind(contact.a), ctx.entities.kind(contact.b));
        let (Some(kind_a), Some(kind_b)) = kinds else {
            log::debug!("Dropping contact with stale entity: {contact:?}");
            return ContactOutcome::Ignored;
        };

        match (kind_a, kind_b) {
            (EntityKind::Bullet, EntityKind::Asteroid) => self.bullet_hits_asteroid(contact.a, contact.b, ctx),
            (EntityKind::Asteroid, EntityKind::Bullet) => self.bullet_hits_asteroid(contact.b, contact.a, ctx),
            (EntityKind::Asteroid, EntityKind::Player) | (EntityKind::Player, EntityKind::Asteroid) => {
                Self::asteroid_hits_player(ctx)
            }
            _ => {
                log::trace!("Ignoring {kind_a:?}/{kind_b:?} contact");
                ContactOutcome::Ignored
            }
        }
    }

    fn bullet_hits_asteroid(
        &self,
        bullet: EntityId,
        asteroid_id: EntityId,
        ctx: &mut ResolveContext<'_>,
    ) -> ContactOutcome {
        let Some(asteroid) = ctx.population.get(asteroid_id).cloned() else {
            return ContactOutcome::Ignored;
        };
        let position = ctx.entities.position(asteroid_id).unwrap_or_else(Vec2::zeros);

        ctx.player.remove_bullet(ctx.entities, ctx.outbox, bullet);
        ctx.events.publish(&GameEvent::AudioCue(AudioCue::Explosion));

        let children = if asteroid.can_split(ctx.population.config().min_sprite_size) {
            ctx.population
                .split(ctx.entities, ctx.outbox, asteroid_id)
                .into_iter()
                .map(|child| child.id)
                .collect()
        } else {
            ctx.population.destroy(ctx.entities, ctx.outbox, asteroid_id);
            Vec::new()
        };

        // Scored on the size that was hit, so fragments are worth more.
        let points = asteroid.kill_points(self.points_per_kill);
        ctx.ledger.add_score(points, ctx.events);
        ctx.events.publish(&GameEvent::ExplosionAt(position));

        log::debug!(
            "Bullet {bullet:?} hit asteroid {asteroid_id:?} (size {:.2}): +{points}, {} fragment(s)",
            asteroid.size,
            children.len()
        );
        ContactOutcome::AsteroidDestroyed {
            asteroid: asteroid_id,
            bullet,
            points,
            children,
        }
    }

    fn asteroid_hits_player(ctx: &mut ResolveContext<'_>) -> ContactOutcome {
        let player = ctx.player.state();
        if !player.is_vulnerable() {
            log::trace!("Ship not vulnerable, ignoring asteroid contact");
            return ContactOutcome::Ignored;
        }
        let position = ctx.entities.position(player.id).unwrap_or_else(Vec2::zeros);

        ctx.player.kill(ctx.outbox);
        ctx.events.publish(&GameEvent::AudioCue(AudioCue::Explosion));
        ctx.events.publish(&GameEvent::ExplosionAt(position));
        let remaining_lives = ctx.ledger.lose_life(ctx.events);

        log::info!("Ship destroyed, {remaining_lives} live(s) left");
        ContactOutcome::PlayerHit { remaining_lives }
    }
}
