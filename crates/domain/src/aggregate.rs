//! Core aggregate kernel: entity lifecycle, typed event records, and the
//! replay dispatch every aggregate variant goes through.

use chrono::{DateTime, Utc};
use common::AggregateId;
use event_bus::{EventBus, EventEnvelope, EventId, Version};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::{ConsistencyError, DomainError};

/// Trait for domain events.
///
/// Domain events represent facts that have happened in the domain.
/// They are immutable and should be named in past tense.
pub trait DomainEvent: Serialize + DeserializeOwned + Send + Sync + Clone {
    /// Returns the event type name.
    ///
    /// This is used for envelope routing and bus topic matching.
    fn event_type(&self) -> &'static str;
}

/// A typed event together with the metadata the kernel validates against.
///
/// The originator id and version identify the aggregate — and the exact
/// version of it — the event was built from. They are the sole
/// optimistic-concurrency mechanism: a record stamped against a stale
/// version is rejected at apply time with a consistency error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord<E> {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// The aggregate this event originated from.
    pub originator_id: AggregateId,

    /// The version of the aggregate when the event was built.
    pub originator_version: Version,

    /// When the event was created (UTC, defaulted at construction).
    pub timestamp: DateTime<Utc>,

    /// The typed event payload.
    pub event: E,
}

impl<E> EventRecord<E> {
    /// Creates a record stamped with the originator's current id and version.
    pub fn new(originator_id: AggregateId, originator_version: Version, event: E) -> Self {
        Self {
            event_id: EventId::new(),
            originator_id,
            originator_version,
            timestamp: Utc::now(),
            event,
        }
    }
}

impl<E: DomainEvent> EventRecord<E> {
    /// Converts this record into the type-erased envelope carried on the bus.
    pub fn envelope(&self, aggregate_type: &'static str) -> Result<EventEnvelope, DomainError> {
        Ok(EventEnvelope::builder()
            .event_id(self.event_id)
            .event_type(self.event.event_type())
            .aggregate_type(aggregate_type)
            .originator_id(self.originator_id)
            .originator_version(self.originator_version)
            .timestamp(self.timestamp)
            .payload(&self.event)?
            .build())
    }
}

/// Identity, version and tombstone state shared by every aggregate.
///
/// Embedded by composition in each concrete variant rather than inherited.
/// The id is assigned once at creation and never reassigned; the version
/// starts at 0 and increments by exactly 1 per applied event; the tombstone
/// is permanent once set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCore {
    id: AggregateId,
    version: Version,
    discarded: bool,
}

impl EntityCore {
    /// Core for a freshly created aggregate: the Created event brings the
    /// version from 0 to 1.
    pub fn created<E>(record: &EventRecord<E>) -> Self {
        Self {
            id: record.originator_id,
            version: record.originator_version.next(),
            discarded: false,
        }
    }

    /// Core for a child entity constructed inside a parent's event, before
    /// it has received any events of its own.
    pub fn embedded(id: AggregateId) -> Self {
        Self {
            id,
            version: Version::initial(),
            discarded: false,
        }
    }

    /// The unique identifier of the entity.
    pub fn id(&self) -> AggregateId {
        self.id
    }

    /// The current version of the entity.
    pub fn version(&self) -> Version {
        self.version
    }

    /// True if this entity has been discarded.
    pub fn discarded(&self) -> bool {
        self.discarded
    }

    /// Increments the version by exactly 1.
    pub fn advance(&mut self) {
        self.version = self.version.next();
    }

    /// Marks this entity as discarded. The tombstone is permanent.
    pub fn tombstone(&mut self) {
        self.discarded = true;
    }

    /// Validates that an event record was stamped by this entity at its
    /// current version.
    pub fn validate_event_originator<E>(
        &self,
        record: &EventRecord<E>,
    ) -> Result<(), DomainError> {
        if record.originator_id != self.id {
            return Err(ConsistencyError::IdMismatch {
                event: record.originator_id,
                aggregate: self.id,
            }
            .into());
        }
        if record.originator_version != self.version {
            return Err(ConsistencyError::VersionMismatch {
                event: record.originator_version,
                aggregate: self.version,
            }
            .into());
        }
        Ok(())
    }
}

/// Trait for aggregates in the event-sourced catalogue.
///
/// All aggregate creation and mutation goes through [`Aggregate::apply`]:
/// a Created event constructs a fresh instance (state must be absent), every
/// other event mutates an existing one after the kernel has validated the
/// originator stamp. Either way the version increments by exactly 1.
pub trait Aggregate: Clone + Send + Sync + Sized {
    /// The type of events this aggregate produces and consumes.
    type Event: DomainEvent;

    /// Returns the aggregate type name, used for envelope routing.
    fn aggregate_type() -> &'static str;

    /// Returns the embedded entity core.
    fn entity(&self) -> &EntityCore;

    /// Returns the embedded entity core for mutation during apply.
    fn entity_mut(&mut self) -> &mut EntityCore;

    /// Replays an event against the aggregate, returning the next state.
    ///
    /// Must be exhaustive over `Self::Event` and must not have side effects.
    fn apply(state: Option<Self>, record: &EventRecord<Self::Event>) -> Result<Self, DomainError>;

    /// Returns the aggregate's unique identifier.
    fn id(&self) -> AggregateId {
        self.entity().id()
    }

    /// Returns the current version of the aggregate.
    fn version(&self) -> Version {
        self.entity().version()
    }

    /// True if this aggregate has been discarded.
    fn discarded(&self) -> bool {
        self.entity().discarded()
    }

    /// Fails with a discarded-entity error if this aggregate is tombstoned.
    fn check_not_discarded(&self) -> Result<(), DomainError> {
        if self.discarded() {
            return Err(DomainError::DiscardedEntity {
                aggregate_type: Self::aggregate_type(),
                id: self.id(),
            });
        }
        Ok(())
    }

    /// Command tail shared by every command method: stamp the event with the
    /// current id/version, apply it through the kernel, then publish it.
    fn emit(&mut self, bus: &EventBus, event: Self::Event) -> Result<(), DomainError> {
        let record = EventRecord::new(self.id(), self.version(), event);
        let next = Self::apply(Some(self.clone()), &record)?;
        *self = next;
        bus.publish(&record.envelope(Self::aggregate_type())?)?;
        metrics::counter!("domain_events_applied").increment(1);
        Ok(())
    }
}

/// Replays a single event against an optional aggregate state.
///
/// Thin entry point over [`Aggregate::apply`] for replaying stored history.
pub fn replay<A: Aggregate>(
    state: Option<A>,
    record: &EventRecord<A::Event>,
) -> Result<A, DomainError> {
    A::apply(state, record)
}

/// Constructs a new aggregate from a Created event and publishes it.
///
/// This is the only way aggregates come into existence; the `create_x`
/// factory functions all funnel through here.
pub fn create<A: Aggregate>(bus: &EventBus, event: A::Event) -> Result<A, DomainError> {
    let record = EventRecord::new(AggregateId::new(), Version::initial(), event);
    let aggregate = A::apply(None, &record)?;
    bus.publish(&record.envelope(A::aggregate_type())?)?;
    metrics::counter!("domain_events_applied").increment(1);
    tracing::debug!(
        aggregate_type = A::aggregate_type(),
        id = %aggregate.id(),
        "aggregate created"
    );
    Ok(aggregate)
}

/// Fails with a consistency error unless the state slot is empty.
///
/// Used by apply implementations when handling Created events.
pub fn require_new<A: Aggregate>(state: &Option<A>) -> Result<(), DomainError> {
    if state.is_some() {
        return Err(ConsistencyError::AlreadyCreated {
            aggregate_type: A::aggregate_type(),
        }
        .into());
    }
    Ok(())
}

/// Unwraps the existing aggregate and validates the record's originator
/// stamp against it.
///
/// Used by apply implementations for every non-Created event.
pub fn require_existing<A: Aggregate>(
    state: Option<A>,
    record: &EventRecord<A::Event>,
) -> Result<A, DomainError> {
    let aggregate = state.ok_or(ConsistencyError::MissingAggregate {
        aggregate_type: A::aggregate_type(),
        event_type: record.event.event_type(),
    })?;
    aggregate.entity().validate_event_originator(record)?;
    Ok(aggregate)
}
