//! Domain events and the per-session bus that delivers them.
//!
//! Every [`Game`](super::Game) publishes to exactly one [`EventBus`]. Observers
//! register on that bus and are called synchronously, in registration order,
//! from inside the engine call that caused the event.
//!
//! While a publish is being dispatched the bus ignores `subscribe`,
//! `unsubscribe` and `publish` calls made from within observers. They are
//! dropped, not queued.

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

use super::{
    entities::Card,
    player::{PlayerId, PlayerView},
};

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum GameEvent {
    CardPlayed {
        player_id: PlayerId,
        card: Card,
        said_uno: bool,
    },
    CardDrawn {
        player_id: PlayerId,
    },
    GameOver {
        winner: PlayerView,
    },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CardPlayed {
                player_id,
                card,
                said_uno: true,
            } => write!(f, "{player_id} played {card} and said UNO"),
            Self::CardPlayed {
                player_id, card, ..
            } => write!(f, "{player_id} played {card}"),
            Self::CardDrawn { player_id } => write!(f, "{player_id} drew a card"),
            Self::GameOver { winner } => write!(f, "{} won the game", winner.name),
        }
    }
}

/// A [`GameEvent`] stamped with the moment it happened.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct DomainEvent {
    pub occurred_at: DateTime<Utc>,
    pub kind: GameEvent,
}

impl DomainEvent {
    #[must_use]
    pub fn new(kind: GameEvent) -> Self {
        Self {
            occurred_at: Utc::now(),
            kind,
        }
    }
}

impl From<GameEvent> for DomainEvent {
    fn from(kind: GameEvent) -> Self {
        Self::new(kind)
    }
}

pub trait EventSubscriber {
    fn handle_event(&self, event: &DomainEvent);
}

impl<F> EventSubscriber for F
where
    F: Fn(&DomainEvent),
{
    fn handle_event(&self, event: &DomainEvent) {
        self(event);
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SubscriptionId(u64);

/// Clears the publishing flag when dropped, including while unwinding out of
/// a panicking observer.
struct PublishGuard<'a>(&'a Cell<bool>);

impl<'a> PublishGuard<'a> {
    fn engage(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for PublishGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

#[derive(Default)]
pub struct EventBus {
    subscribers: RefCell<Vec<(SubscriptionId, Rc<dyn EventSubscriber>)>>,
    publishing: Cell<bool>,
    next_id: Cell<u64>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.len())
            .field("publishing", &self.publishing.get())
            .finish()
    }
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. Returns `None` if called mid-publish, in which
    /// case nothing was registered.
    pub fn subscribe(&self, subscriber: Rc<dyn EventSubscriber>) -> Option<SubscriptionId> {
        if self.publishing.get() {
            return None;
        }
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.subscribers.borrow_mut().push((id, subscriber));
        Some(id)
    }

    /// Remove an observer. Returns whether one was removed; always `false`
    /// mid-publish.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        if self.publishing.get() {
            return false;
        }
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(subscribed, _)| *subscribed != id);
        subscribers.len() != before
    }

    pub fn publish(&self, event: DomainEvent) {
        if self.publishing.get() {
            return;
        }
        let _guard = PublishGuard::engage(&self.publishing);
        // Observers get a snapshot, so none of them can hold a borrow of the
        // list while another runs.
        let subscribers: Vec<_> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, subscriber)| Rc::clone(subscriber))
            .collect();
        for subscriber in subscribers {
            subscriber.handle_event(&event);
        }
    }

    /// Drop every observer and clear the publishing flag.
    pub fn reset(&self) {
        self.subscribers.borrow_mut().clear();
        self.publishing.set(false);
    }

    #[must_use]
    pub fn is_publishing(&self) -> bool {
        self.publishing.get()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.borrow().is_empty()
    }
}

/// Keeps a copy of every event it receives.
#[derive(Debug, Default)]
pub struct EventRecorder {
    events: RefCell<Vec<DomainEvent>>,
}

impl EventRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.borrow().clone()
    }

    #[must_use]
    pub fn kinds(&self) -> Vec<GameEvent> {
        self.events
            .borrow()
            .iter()
            .map(|event| event.kind.clone())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl EventSubscriber for EventRecorder {
    fn handle_event(&self, event: &DomainEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

/// Writes every event to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct EventLogger;

impl EventSubscriber for EventLogger {
    fn handle_event(&self, event: &DomainEvent) {
        info!("[{}] {}", event.occurred_at.format("%H:%M:%S%.3f"), event.kind);
    }
}
