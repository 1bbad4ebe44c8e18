//! Deterministic in-process publish/subscribe bus.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::error::{BusError, Result};
use crate::event::EventEnvelope;

/// A subscription topic.
///
/// Topics form an explicit subscription table: a subscriber is invoked for
/// an event when at least one of its topics matches the envelope. There is
/// no predicate matching; routing is decided from the envelope's type names
/// alone, which keeps delivery deterministic and testable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Topic {
    /// Matches every event.
    All,

    /// Matches events originating from the named aggregate type.
    AggregateType(String),

    /// Matches events of the named event type.
    EventType(String),
}

impl Topic {
    /// Creates an aggregate-type topic.
    pub fn aggregate(name: impl Into<String>) -> Self {
        Topic::AggregateType(name.into())
    }

    /// Creates an event-type topic.
    pub fn event(name: impl Into<String>) -> Self {
        Topic::EventType(name.into())
    }

    /// Returns true if this topic matches the given envelope.
    pub fn matches(&self, envelope: &EventEnvelope) -> bool {
        match self {
            Topic::All => true,
            Topic::AggregateType(name) => envelope.aggregate_type == *name,
            Topic::EventType(name) => envelope.event_type == *name,
        }
    }
}

/// Identifier handed out by [`EventBus::subscribe`].
///
/// Delivery order during a publish follows ascending subscriber IDs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SubscriberId(u64);

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "subscriber-{}", self.0)
    }
}

type Handler = Arc<dyn Fn(&EventEnvelope) -> Result<()> + Send + Sync>;

struct Registration {
    topics: Vec<Topic>,
    handler: Handler,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    subscribers: BTreeMap<SubscriberId, Registration>,
}

/// Synchronous in-process event bus.
///
/// The bus is an explicit value injected wherever aggregates or services are
/// constructed; there is no process-wide registry. Fan-out is synchronous:
/// `publish` invokes every matching subscriber before returning, and a
/// subscriber failure aborts the fan-out and propagates to the publisher.
/// A subscriber registered under several overlapping topics still receives
/// each event at most once per publish.
#[derive(Default)]
pub struct EventBus {
    inner: Mutex<Inner>,
}

impl EventBus {
    /// Creates a new bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under a topic and returns its subscriber ID.
    pub fn subscribe<F>(&self, topic: Topic, handler: F) -> SubscriberId
    where
        F: Fn(&EventEnvelope) -> Result<()> + Send + Sync + 'static,
    {
        let mut inner = self.lock();
        let id = SubscriberId(inner.next_id);
        inner.next_id += 1;
        inner.subscribers.insert(
            id,
            Registration {
                topics: vec![topic],
                handler: Arc::new(handler),
            },
        );
        id
    }

    /// Adds an additional topic to an existing subscriber.
    ///
    /// Returns false if the subscriber is unknown. Overlapping topics do not
    /// cause duplicate delivery.
    pub fn add_topic(&self, subscriber: SubscriberId, topic: Topic) -> bool {
        let mut inner = self.lock();
        match inner.subscribers.get_mut(&subscriber) {
            Some(registration) => {
                if !registration.topics.contains(&topic) {
                    registration.topics.push(topic);
                }
                true
            }
            None => false,
        }
    }

    /// Removes a topic from a subscriber.
    ///
    /// The subscriber is dropped entirely once its last topic is removed.
    /// Returns false if the subscriber or topic was not registered.
    pub fn unsubscribe(&self, subscriber: SubscriberId, topic: &Topic) -> bool {
        let mut inner = self.lock();
        let Some(registration) = inner.subscribers.get_mut(&subscriber) else {
            return false;
        };
        let before = registration.topics.len();
        registration.topics.retain(|t| t != topic);
        let removed = registration.topics.len() < before;
        if registration.topics.is_empty() {
            inner.subscribers.remove(&subscriber);
        }
        removed
    }

    /// Removes a subscriber and all of its topics.
    pub fn remove_subscriber(&self, subscriber: SubscriberId) -> bool {
        self.lock().subscribers.remove(&subscriber).is_some()
    }

    /// Returns the number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    /// Publishes an event to every subscriber with at least one matching
    /// topic, each exactly once, in ascending subscriber-ID order.
    ///
    /// The first subscriber error aborts the fan-out and is returned to the
    /// caller.
    pub fn publish(&self, envelope: &EventEnvelope) -> Result<()> {
        let matching: Vec<(SubscriberId, Handler)> = {
            let inner = self.lock();
            inner
                .subscribers
                .iter()
                .filter(|(_, registration)| {
                    registration.topics.iter().any(|t| t.matches(envelope))
                })
                .map(|(id, registration)| (*id, Arc::clone(&registration.handler)))
                .collect()
        };

        tracing::trace!(
            event_type = %envelope.event_type,
            subscribers = matching.len(),
            "publishing event"
        );

        for (id, handler) in matching {
            handler(envelope).map_err(|error| {
                tracing::error!(subscriber = %id, %error, "subscriber failed");
                match error {
                    BusError::Subscriber { .. } => error,
                    other => BusError::Subscriber {
                        subscriber: id,
                        event_type: envelope.event_type.clone(),
                        message: other.to_string(),
                    },
                }
            })?;
        }

        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
