//! Observation domain events.

use common::{AggregateId, IndicatorCode};
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;

/// Events that can occur on an observation aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ObservationEvent {
    /// Observation was created.
    Created(ObservationCreatedData),

    /// Observation was discarded.
    Discarded,

    /// A derived computation (scored/normalized value) was attached.
    ComputationAdded(ComputationAddedData),

    /// The observation received its ordinal rank within its comparison set.
    Ranked(RankedData),

    /// The observation was linked to an area aggregate.
    AreaReferenced(AreaReferencedData),

    /// The observation was linked to an indicator aggregate.
    IndicatorReferenced(IndicatorReferencedData),
}

impl DomainEvent for ObservationEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ObservationEvent::Created(_) => "ObservationCreated",
            ObservationEvent::Discarded => "ObservationDiscarded",
            ObservationEvent::ComputationAdded(_) => "ComputationAdded",
            ObservationEvent::Ranked(_) => "Ranked",
            ObservationEvent::AreaReferenced(_) => "AreaReferenced",
            ObservationEvent::IndicatorReferenced(_) => "IndicatorReferenced",
        }
    }
}

/// Data for the ObservationCreated event.
///
/// `value` is `None` when no valid measurement is known for the
/// indicator/area/year triple. The unknown sentinel is never coerced to
/// zero: zero is a real measured value, absence is not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationCreatedData {
    /// Code of the measured indicator.
    pub indicator: IndicatorCode,

    /// Name of the measured indicator.
    pub indicator_name: String,

    /// ISO alpha-3 code of the observed area.
    pub area: String,

    /// Name of the observed area.
    pub area_name: String,

    /// Code of the area's continent.
    pub continent: Option<String>,

    /// Development classification of the area ("Developing"/"Emerging").
    pub area_type: Option<String>,

    /// Observation year.
    pub year: String,

    /// Measured value, or `None` when unknown.
    pub value: Option<f64>,

    /// Name of the data provider.
    pub provider_name: Option<String>,

    /// URL of the data provider.
    pub provider_url: Option<String>,

    /// Whether the provider allows republishing.
    pub republish: bool,

    /// Tendency against the previous year: -1 falling, 0 flat, 1 rising.
    pub tendency: i8,
}

/// Kind of a derived computation carried on an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComputationKind {
    /// Value rescaled onto the scoring scale.
    Scored,

    /// Value normalized against the comparison set.
    Normalized,
}

/// Data for the ComputationAdded event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationAddedData {
    /// Which derived field the computation fills.
    pub kind: ComputationKind,

    /// The computed value.
    pub value: f64,
}

/// Data for the Ranked event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedData {
    /// Ordinal position within the comparison set; lower is better.
    pub rank: i64,
}

/// Data for the AreaReferenced event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaReferencedData {
    /// Id of the referenced area aggregate.
    pub area_id: AggregateId,
}

/// Data for the IndicatorReferenced event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorReferencedData {
    /// Id of the referenced indicator aggregate.
    pub indicator_id: AggregateId,
}
