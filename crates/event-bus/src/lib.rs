//! Event identity, envelopes, and the in-process event bus.
//!
//! This crate provides the shared event plumbing for the catalogue:
//! - [`EventId`] and [`Version`] value types
//! - [`EventEnvelope`] — the type-erased event record carried on the bus
//! - [`EventBus`] — a deterministic, synchronous publish/subscribe bus with
//!   an explicit topic subscription table

pub mod bus;
pub mod error;
pub mod event;

pub use bus::{EventBus, SubscriberId, Topic};
pub use common::AggregateId;
pub use error::{BusError, Result};
pub use event::{EventEnvelope, EventEnvelopeBuilder, EventId, Version};
