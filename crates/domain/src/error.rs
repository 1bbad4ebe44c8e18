//! Domain error types.

use common::AggregateId;
use event_bus::{BusError, Version};
use thiserror::Error;

/// Internal consistency violations detected by the event kernel.
///
/// These indicate a programming error or a lost optimistic-concurrency race;
/// they are always fatal to the operation that raised them.
#[derive(Debug, Error)]
pub enum ConsistencyError {
    /// The event was stamped by a different aggregate than the one it is
    /// being applied to.
    #[error("event originator id mismatch: {event} != {aggregate}")]
    IdMismatch {
        event: AggregateId,
        aggregate: AggregateId,
    },

    /// The event was stamped against a stale aggregate version.
    #[error("event originator version mismatch: {event} != {aggregate}")]
    VersionMismatch { event: Version, aggregate: Version },

    /// A non-Created event was replayed with no aggregate to apply it to.
    #[error("{event_type} replayed without an existing {aggregate_type}")]
    MissingAggregate {
        aggregate_type: &'static str,
        event_type: &'static str,
    },

    /// A Created event was replayed onto an already-constructed aggregate.
    #[error("Created event applied to an existing {aggregate_type}")]
    AlreadyCreated { aggregate_type: &'static str },
}

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Event/aggregate id or version mismatch detected by the kernel.
    #[error("Consistency error: {0}")]
    Consistency(#[from] ConsistencyError),

    /// A command was issued against a tombstoned aggregate.
    #[error("Attempt to use discarded {aggregate_type} {id}")]
    DiscardedEntity {
        aggregate_type: &'static str,
        id: AggregateId,
    },

    /// An operation would violate a domain model constraint, such as adding
    /// an already-present child.
    #[error("Constraint error: {0}")]
    Constraint(String),

    /// Malformed input, such as an empty required field.
    #[error("Invalid value: {0}")]
    Validation(String),

    /// An event payload failed to serialize.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A bus subscriber failed while the event was being published.
    #[error("Event bus error: {0}")]
    Bus(#[from] BusError),
}
