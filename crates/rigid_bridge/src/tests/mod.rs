//! Scenario tests driving a full world over the headless engine

mod builder;
mod world;

use std::cell::RefCell;
use std::rc::Rc;

use crate::foundation::logging;
use crate::native::{CallLog, HeadlessEngine, SharedEngine, TracingEngine};
use crate::physics::{CollisionListener, CollisionPair, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Event {
    New(u64, u64),
    Lost(u64, u64),
}

/// Listener recording every event; clones share the same record
#[derive(Debug, Clone, Default)]
pub(crate) struct EventLog {
    events: Rc<RefCell<Vec<Event>>>,
}

impl EventLog {
    /// Events received since the previous call
    pub(crate) fn take(&self) -> Vec<Event> {
        self.events.borrow_mut().drain(..).collect()
    }
}

impl CollisionListener for EventLog {
    fn new_collision(&mut self, pair: &CollisionPair) {
        let event = Event::New(pair.entity_a.value(), pair.entity_b.value());
        self.events.borrow_mut().push(event);
    }

    fn lost_collision(&mut self, pair: &CollisionPair) {
        let event = Event::Lost(pair.entity_a.value(), pair.entity_b.value());
        self.events.borrow_mut().push(event);
    }
}

/// World over a headless engine, with every native call recorded
pub(crate) fn traced_world() -> (World, CallLog) {
    logging::try_init();
    let engine = TracingEngine::new(HeadlessEngine::new());
    let calls = engine.call_log();
    (World::new(engine), calls)
}

/// World over a headless engine the test can still inspect
pub(crate) fn shared_world() -> (World, SharedEngine<HeadlessEngine>) {
    logging::try_init();
    let engine = SharedEngine::new(HeadlessEngine::new());
    (World::new(engine.clone()), engine)
}
