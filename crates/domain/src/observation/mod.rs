//! Observation aggregate: one measured value for an indicator, area and year.

pub mod aggregate;
pub mod events;

pub use aggregate::{Observation, create_observation};
pub use events::{ComputationKind, ObservationCreatedData, ObservationEvent};
