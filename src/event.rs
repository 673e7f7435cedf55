//! Synchronous publish/subscribe plumbing between the board and its entities.
//!
//! Entities never hold references to the board or to each other. They are
//! named by [`EntityId`] and the board drains the queue after every publish,
//! so each event is handled within the tick that produced it.

use std::collections::{BTreeSet, VecDeque};

use crate::entity::EntityId;

/// Notifications exchanged between the arbiter and registered entities.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Event {
    /// `mover` advanced one cell; published by the mover.
    Moved { mover: EntityId },
    /// `target` now overlaps `other`; published by the board, delivered to `target`.
    Collided { target: EntityId, other: EntityId },
    /// `eater` consumed `eaten`; published by the eater.
    Eaten { eater: EntityId, eaten: EntityId },
}

impl Event {
    /// Entity that published the event, or `None` when the board did.
    #[must_use]
    pub fn publisher(self) -> Option<EntityId> {
        match self {
            Self::Moved { mover } => Some(mover),
            Self::Collided { .. } => None,
            Self::Eaten { eater, .. } => Some(eater),
        }
    }
}

/// FIFO event queue with a subscription list.
///
/// Events published by an entity that is not subscribed are dropped, which
/// is how a removed entity stops taking part in the protocol.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    subscribers: BTreeSet<EntityId>,
    queue: VecDeque<Event>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, id: EntityId) {
        self.subscribers.insert(id);
    }

    /// Removes `id` and discards queued events that mention it.
    pub fn unsubscribe(&mut self, id: EntityId) {
        self.subscribers.remove(&id);
        self.queue.retain(|event| !mentions(*event, id));
    }

    #[must_use]
    pub fn is_subscribed(&self, id: EntityId) -> bool {
        self.subscribers.contains(&id)
    }

    /// Queues `event`; returns false if its publisher is not subscribed.
    pub fn publish(&mut self, event: Event) -> bool {
        if let Some(publisher) = event.publisher() {
            if !self.is_subscribed(publisher) {
                log::trace!("dropping {event:?} from unsubscribed entity");
                return false;
            }
        }

        self.queue.push_back(event);
        true
    }

    /// Takes the oldest pending event.
    pub fn next_event(&mut self) -> Option<Event> {
        self.queue.pop_front()
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }
}

fn mentions(event: Event, id: EntityId) -> bool {
    match event {
        Event::Moved { mover } => mover == id,
        Event::Collided { target, other } => target == id || other == id,
        Event::Eaten { eater, eaten } => eater == id || eaten == id,
    }
}
