//! Score and lives bookkeeping
//!
//! Every mutation finishes before its change event is published, so
//! observers never see a half-updated ledger.

use crate::events::{GameEvent, GameEventBus};

/// Score and remaining lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreLivesLedger {
    score: u32,
    lives: u32,
    initial_lives: u32,
}

impl ScoreLivesLedger {
    /// Create a ledger with zero score and `initial_lives`
    pub fn new(initial_lives: u32) -> Self {
        Self {
            score: 0,
            lives: initial_lives,
            initial_lives,
        }
    }

    /// Current score
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Lives left
    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Lives granted by the last reset
    pub fn initial_lives(&self) -> u32 {
        self.initial_lives
    }

    /// Add points; the score saturates rather than wrapping
    pub fn add_score(&mut self, points: u32, events: &mut GameEventBus) {
        self.score = self.score.saturating_add(points);
        events.publish(&GameEvent::ScoreChanged(self.score));
    }

    /// Take one life (never below zero) and return how many are left
    pub fn lose_life(&mut self, events: &mut GameEventBus) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        events.publish(&GameEvent::LivesChanged(self.lives));
        self.lives
    }

    /// Zero the score and restore `initial_lives`
    pub fn reset(&mut self, initial_lives: u32, events: &mut GameEventBus) {
        self.score = 0;
        self.lives = initial_lives;
        self.initial_lives = initial_lives;
        events.publish(&GameEvent::ScoreChanged(self.score));
        events.publish(&GameEvent::LivesChanged(self.lives));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_bus() -> (GameEventBus, Rc<RefCell<Vec<GameEvent>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = GameEventBus::new();
        let sink = Rc::clone(&log);
        bus.register_catch_all(Box::new(move |event: &GameEvent| {
            sink.borrow_mut().push(event.clone());
            false
        }));
        (bus, log)
    }

    #[test]
    fn test_add_score_accumulates_and_notifies() {
        let (mut bus, log) = recording_bus();
        let mut ledger = ScoreLivesLedger::new(3);

        ledger.add_score(50, &mut bus);
        ledger.add_score(100, &mut bus);

        assert_eq!(ledger.score(), 150);
        assert_eq!(
            *log.borrow(),
            vec![GameEvent::ScoreChanged(50), GameEvent::ScoreChanged(150)]
        );
    }

    #[test]
    fn test_score_saturates() {
        let (mut bus, _) = recording_bus();
        let mut ledger = ScoreLivesLedger::new(3);
        ledger.add_score(u32::MAX - 1, &mut bus);
        ledger.add_score(10, &mut bus);
        assert_eq!(ledger.score(), u32::MAX);
    }

    #[test]
    fn test_lose_life_floors_at_zero() {
        let (mut bus, log) = recording_bus();
        let mut ledger = ScoreLivesLedger::new(2);

        assert_eq!(ledger.lose_life(&mut bus), 1);
        assert_eq!(ledger.lose_life(&mut bus), 0);
        assert_eq!(ledger.lose_life(&mut bus), 0);
        assert_eq!(
            *log.borrow(),
            vec![
                GameEvent::LivesChanged(1),
                GameEvent::LivesChanged(0),
                GameEvent::LivesChanged(0)
            ]
        );
    }

    #[test]
    fn test_reset_restores_initial_values() {
        let (mut bus, log) = recording_bus();
        let mut ledger = ScoreLivesLedger::new(3);
        ledger.add_score(300, &mut bus);
        ledger.lose_life(&mut bus);
        log.borrow_mut().clear();

        ledger.reset(3, &mut bus);

        assert_eq!(ledger.score(), 0);
        assert_eq!(ledger.lives(), 3);
        assert_eq!(
            *log.borrow(),
            vec![GameEvent::ScoreChanged(0), GameEvent::LivesChanged(3)]
        );
    }

    #[test]
    fn test_observer_sees_updated_value() {
        let mut bus = GameEventBus::new();
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        bus.register_catch_all(Box::new(move |event: &GameEvent| {
            if let GameEvent::ScoreChanged(score) = event {
                *sink.borrow_mut() = Some(*score);
            }
            false
        }));

        let mut ledger = ScoreLivesLedger::new(1);
        ledger.add_score(42, &mut bus);
        assert_eq!(*seen.borrow(), Some(ledger.score()));
    }
}
