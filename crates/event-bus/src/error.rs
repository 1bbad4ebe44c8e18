use thiserror::Error;

use crate::bus::SubscriberId;

/// Errors that can occur when publishing events on the bus.
///
/// Delivery is synchronous and fail-fast: a subscriber failure aborts the
/// fan-out and propagates to the publisher unmodified.
#[derive(Debug, Error)]
pub enum BusError {
    /// A subscriber rejected or failed to handle a published event.
    #[error("Subscriber {subscriber} failed handling {event_type}: {message}")]
    Subscriber {
        subscriber: SubscriberId,
        event_type: String,
        message: String,
    },

    /// A handler-defined failure raised from inside a subscriber.
    #[error("Handler error: {0}")]
    Handler(String),

    /// A serialization/deserialization error occurred while building an
    /// envelope payload.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for bus operations.
pub type Result<T> = std::result::Result<T, BusError>;
