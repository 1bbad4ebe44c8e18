//! Domain layer of the indicator statistics catalogue.
//!
//! This crate provides the event-sourced core:
//! - The aggregate kernel: [`EntityCore`], the [`Aggregate`] trait, typed
//!   [`EventRecord`]s and the [`replay`] dispatch
//! - The aggregate variants: areas (Region/Country), the indicator
//!   catalogue (Indicator, Index/SubIndex/Component), Observation, Slice
//!   and DataSet
//!
//! All creation goes through `create_*` factory functions that emit a
//! Created event; all mutation goes through command methods that stamp,
//! apply, and publish typed events on an injected [`event_bus::EventBus`].

pub mod aggregate;
pub mod area;
pub mod data_set;
pub mod error;
pub mod indicator;
pub mod observation;
pub mod slice;

pub use aggregate::{Aggregate, DomainEvent, EntityCore, EventRecord, create, replay};
pub use area::{
    AreaCore, Country, CountryEvent, CountryProfile, Region, RegionEvent, create_country,
    create_region,
};
pub use data_set::{DataSet, DataSetCreatedData, DataSetEvent, create_data_set};
pub use error::{ConsistencyError, DomainError};
pub use indicator::{
    Component, ComponentEvent, Index, IndexEvent, Indicator, IndicatorCore, IndicatorEvent,
    IndicatorLevel, SubIndex, SubIndexEvent, create_component, create_index, create_indicator,
    create_sub_index,
};
pub use observation::{
    ComputationKind, Observation, ObservationCreatedData, ObservationEvent, create_observation,
};
pub use slice::{Slice, SliceEvent, create_slice};
