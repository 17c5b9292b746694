//! Event system following Game Engine Architecture Ch 16.8
//! Key principles:
//! - Typed events with a kind used for routing
//! - Handler returns bool (true = consumed, stops forwarding)
//! - Registration system (only notify interested handlers)
//! - Deferred delivery lives in [`TaskQueue`], keyed by due tick

mod schedule;

pub use schedule::{TaskId, TaskQueue};

use std::collections::HashMap;
use std::hash::Hash;

/// An event routed by kind
pub trait Event {
    /// Routing key
    type Kind: Copy + Eq + Hash;

    /// Kind of this event
    fn kind(&self) -> Self::Kind;
}

/// Event handler trait
/// Returns true if event was consumed (stops forwarding)
/// Returns false to allow forwarding to other handlers
pub trait EventHandler<E> {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, event: &E) -> bool;
}

impl<E, F> EventHandler<E> for F
where
    F: FnMut(&E) -> bool,
{
    fn on_event(&mut self, event: &E) -> bool {
        self(event)
    }
}

/// Synchronous observer list
///
/// `publish` runs every interested handler before returning, so observers
/// always see state as it was when the event was raised.
pub struct EventBus<E: Event> {
    handlers: HashMap<E::Kind, Vec<Box<dyn EventHandler<E>>>>,
    catch_all: Vec<Box<dyn EventHandler<E>>>,
    published: u64,
}

impl<E: Event> EventBus<E> {
    /// Create an empty bus
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            catch_all: Vec::new(),
            published: 0,
        }
    }

    /// Register a handler for a specific event kind
    /// Only handlers registered for this kind will be notified
    pub fn register_handler(&mut self, kind: E::Kind, handler: Box<dyn EventHandler<E>>) {
        self.handlers.entry(kind).or_default().push(handler);
    }

    /// Register a handler that sees every event after the kind-specific ones
    pub fn register_catch_all(&mut self, handler: Box<dyn EventHandler<E>>) {
        self.catch_all.push(handler);
    }

    /// Dispatch an event to registered handlers
    /// Stops on first handler that returns true (consumed)
    pub fn publish(&mut self, event: &E) {
        self.published += 1;
        if let Some(handlers) = self.handlers.get_mut(&event.kind()) {
            for handler in handlers.iter_mut() {
                if handler.on_event(event) {
                    return;
                }
            }
        }
        for handler in &mut self.catch_all {
            if handler.on_event(event) {
                return;
            }
        }
    }

    /// Number of events published so far
    pub fn published_count(&self) -> u64 {
        self.published
    }

    /// Number of registered handlers
    pub fn handler_count(&self) -> usize {
        self.handlers.values().map(Vec::len).sum::<usize>() + self.catch_all.len()
    }

    /// Drop every handler
    pub fn clear_handlers(&mut self) {
        self.handlers.clear();
        self.catch_all.clear();
    }
}

impl<E: Event> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> std::fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.handler_count())
            .field("published", &self.published)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Ping {
        Score(u32),
        Lives(u32),
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum PingKind {
        Score,
        Lives,
    }

    impl Event for Ping {
        type Kind = PingKind;

        fn kind(&self) -> PingKind {
            match self {
                Ping::Score(_) => PingKind::Score,
                Ping::Lives(_) => PingKind::Lives,
            }
        }
    }

    fn recorder(log: &Rc<RefCell<Vec<Ping>>>, consume: bool) -> Box<dyn EventHandler<Ping>> {
        let log = Rc::clone(log);
        Box::new(move |event: &Ping| {
            log.borrow_mut().push(event.clone());
            consume
        })
    }

    #[test]
    fn test_only_interested_handlers_notified() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        bus.register_handler(PingKind::Score, recorder(&log, false));

        bus.publish(&Ping::Lives(2));
        bus.publish(&Ping::Score(10));

        assert_eq!(*log.borrow(), vec![Ping::Score(10)]);
        assert_eq!(bus.published_count(), 2);
    }

    #[test]
    fn test_consumed_event_stops_forwarding() {
        let first = Rc::new(RefCell::new(Vec::new()));
        let second = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        bus.register_handler(PingKind::Score, recorder(&first, true));
        bus.register_handler(PingKind::Score, recorder(&second, false));

        bus.publish(&Ping::Score(1));

        assert_eq!(first.borrow().len(), 1);
        assert!(second.borrow().is_empty());
    }

    #[test]
    fn test_catch_all_sees_everything_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        bus.register_catch_all(recorder(&log, false));

        bus.publish(&Ping::Score(1));
        bus.publish(&Ping::Lives(3));
        bus.publish(&Ping::Score(2));

        assert_eq!(
            *log.borrow(),
            vec![Ping::Score(1), Ping::Lives(3), Ping::Score(2)]
        );
    }

    #[test]
    fn test_clear_handlers() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        bus.register_catch_all(recorder(&log, false));
        assert_eq!(bus.handler_count(), 1);

        bus.clear_handlers();
        bus.publish(&Ping::Score(1));
        assert!(log.borrow().is_empty());
    }
}
