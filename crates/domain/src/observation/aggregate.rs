//! Observation aggregate implementation.

use common::{AggregateId, IndicatorCode};
use event_bus::EventBus;
use serde::{Deserialize, Serialize};

use crate::aggregate::{
    Aggregate, EntityCore, EventRecord, create, require_existing, require_new,
};
use crate::area::AreaAggregate;
use crate::error::DomainError;
use crate::indicator::IndicatorAggregate;

use super::events::{
    AreaReferencedData, ComputationAddedData, ComputationKind, IndicatorReferencedData,
    ObservationCreatedData, ObservationEvent, RankedData,
};

/// Observation aggregate root.
///
/// An immutable data snapshot from the analytics engine's point of view:
/// the engine only reads observations and copies them into derived
/// structures. Mutation happens exclusively through events, before the
/// observation reaches any analytics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    core: EntityCore,
    indicator: IndicatorCode,
    indicator_name: String,
    area: String,
    area_name: String,
    continent: Option<String>,
    area_type: Option<String>,
    year: String,
    value: Option<f64>,
    scored: Option<f64>,
    normalized: Option<f64>,
    rank: Option<i64>,
    provider_name: Option<String>,
    provider_url: Option<String>,
    republish: bool,
    tendency: i8,
    ref_area_id: Option<AggregateId>,
    ref_indicator_id: Option<AggregateId>,
}

impl Aggregate for Observation {
    type Event = ObservationEvent;

    fn aggregate_type() -> &'static str {
        "Observation"
    }

    fn entity(&self) -> &EntityCore {
        &self.core
    }

    fn entity_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn apply(state: Option<Self>, record: &EventRecord<Self::Event>) -> Result<Self, DomainError> {
        match &record.event {
            ObservationEvent::Created(data) => {
                require_new::<Self>(&state)?;
                Ok(Observation {
                    core: EntityCore::created(record),
                    indicator: data.indicator.clone(),
                    indicator_name: data.indicator_name.clone(),
                    area: data.area.clone(),
                    area_name: data.area_name.clone(),
                    continent: data.continent.clone(),
                    area_type: data.area_type.clone(),
                    year: data.year.clone(),
                    value: data.value,
                    scored: None,
                    normalized: None,
                    rank: None,
                    provider_name: data.provider_name.clone(),
                    provider_url: data.provider_url.clone(),
                    republish: data.republish,
                    tendency: data.tendency,
                    ref_area_id: None,
                    ref_indicator_id: None,
                })
            }
            ObservationEvent::Discarded => {
                let mut observation = require_existing::<Self>(state, record)?;
                observation.core.tombstone();
                observation.core.advance();
                Ok(observation)
            }
            ObservationEvent::ComputationAdded(data) => {
                let mut observation = require_existing::<Self>(state, record)?;
                match data.kind {
                    ComputationKind::Scored => observation.scored = Some(data.value),
                    ComputationKind::Normalized => observation.normalized = Some(data.value),
                }
                observation.core.advance();
                Ok(observation)
            }
            ObservationEvent::Ranked(data) => {
                let mut observation = require_existing::<Self>(state, record)?;
                observation.rank = Some(data.rank);
                observation.core.advance();
                Ok(observation)
            }
            ObservationEvent::AreaReferenced(data) => {
                let mut observation = require_existing::<Self>(state, record)?;
                observation.ref_area_id = Some(data.area_id);
                observation.core.advance();
                Ok(observation)
            }
            ObservationEvent::IndicatorReferenced(data) => {
                let mut observation = require_existing::<Self>(state, record)?;
                observation.ref_indicator_id = Some(data.indicator_id);
                observation.core.advance();
                Ok(observation)
            }
        }
    }
}

// Query methods
impl Observation {
    /// Code of the measured indicator.
    pub fn indicator(&self) -> &IndicatorCode {
        &self.indicator
    }

    /// Name of the measured indicator.
    pub fn indicator_name(&self) -> &str {
        &self.indicator_name
    }

    /// ISO alpha-3 code of the observed area.
    pub fn area(&self) -> &str {
        &self.area
    }

    /// Name of the observed area.
    pub fn area_name(&self) -> &str {
        &self.area_name
    }

    /// Code of the area's continent.
    pub fn continent(&self) -> Option<&str> {
        self.continent.as_deref()
    }

    /// Development classification of the area.
    pub fn area_type(&self) -> Option<&str> {
        self.area_type.as_deref()
    }

    /// Observation year.
    pub fn year(&self) -> &str {
        &self.year
    }

    /// Measured value; `None` when unknown. Never coerced to zero.
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// Scored value, once computed upstream.
    pub fn scored(&self) -> Option<f64> {
        self.scored
    }

    /// Normalized value, once computed upstream.
    pub fn normalized(&self) -> Option<f64> {
        self.normalized
    }

    /// Rank within the comparison set; lower is better.
    pub fn rank(&self) -> Option<i64> {
        self.rank
    }

    /// Name of the data provider.
    pub fn provider_name(&self) -> Option<&str> {
        self.provider_name.as_deref()
    }

    /// URL of the data provider.
    pub fn provider_url(&self) -> Option<&str> {
        self.provider_url.as_deref()
    }

    /// Whether the provider allows republishing.
    pub fn republish(&self) -> bool {
        self.republish
    }

    /// Tendency against the previous year.
    pub fn tendency(&self) -> i8 {
        self.tendency
    }

    /// Id of the referenced area aggregate, once linked.
    pub fn ref_area_id(&self) -> Option<AggregateId> {
        self.ref_area_id
    }

    /// Id of the referenced indicator aggregate, once linked.
    pub fn ref_indicator_id(&self) -> Option<AggregateId> {
        self.ref_indicator_id
    }
}

// Command methods
impl Observation {
    /// Discard this observation. Discarding twice is an error.
    pub fn discard(&mut self, bus: &EventBus) -> Result<(), DomainError> {
        self.check_not_discarded()?;
        self.emit(bus, ObservationEvent::Discarded)
    }

    /// Attaches a derived computation (scored or normalized value).
    pub fn add_computation(
        &mut self,
        bus: &EventBus,
        kind: ComputationKind,
        value: f64,
    ) -> Result<(), DomainError> {
        self.check_not_discarded()?;
        self.emit(
            bus,
            ObservationEvent::ComputationAdded(ComputationAddedData { kind, value }),
        )
    }

    /// Stamps the observation with its rank within the comparison set.
    pub fn set_rank(&mut self, bus: &EventBus, rank: i64) -> Result<(), DomainError> {
        self.check_not_discarded()?;
        if rank < 1 {
            return Err(DomainError::Validation(format!(
                "Observation rank must be positive, got {rank}"
            )));
        }
        self.emit(bus, ObservationEvent::Ranked(RankedData { rank }))
    }

    /// References an area (region or country) from this observation.
    ///
    /// Fails with a discarded-entity error if either side is tombstoned.
    pub fn reference_area<A: AreaAggregate>(
        &mut self,
        bus: &EventBus,
        area: &A,
    ) -> Result<(), DomainError> {
        self.check_not_discarded()?;
        if area.discarded() {
            return Err(DomainError::DiscardedEntity {
                aggregate_type: A::aggregate_type(),
                id: area.id(),
            });
        }
        self.emit(
            bus,
            ObservationEvent::AreaReferenced(AreaReferencedData { area_id: area.id() }),
        )
    }

    /// References an indicator catalogue node from this observation.
    ///
    /// Fails with a discarded-entity error if either side is tombstoned.
    pub fn reference_indicator<I: IndicatorAggregate>(
        &mut self,
        bus: &EventBus,
        indicator: &I,
    ) -> Result<(), DomainError> {
        self.check_not_discarded()?;
        if indicator.discarded() {
            return Err(DomainError::DiscardedEntity {
                aggregate_type: I::aggregate_type(),
                id: indicator.id(),
            });
        }
        self.emit(
            bus,
            ObservationEvent::IndicatorReferenced(IndicatorReferencedData {
                indicator_id: indicator.id(),
            }),
        )
    }
}

/// Creates a new observation, emitting and publishing its Created event.
pub fn create_observation(
    bus: &EventBus,
    data: ObservationCreatedData,
) -> Result<Observation, DomainError> {
    if data.area.is_empty() {
        return Err(DomainError::Validation(
            "Observation area cannot be empty".to_string(),
        ));
    }
    if data.year.is_empty() {
        return Err(DomainError::Validation(
            "Observation year cannot be empty".to_string(),
        ));
    }
    create(bus, ObservationEvent::Created(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::{AreaCore, create_region};
    use event_bus::Version;

    fn created_data(area: &str, year: &str, value: Option<f64>) -> ObservationCreatedData {
        ObservationCreatedData {
            indicator: IndicatorCode::new("INDEX"),
            indicator_name: "The Index".to_string(),
            area: area.to_string(),
            area_name: area.to_string(),
            continent: Some("EUR".to_string()),
            area_type: Some("Emerging".to_string()),
            year: year.to_string(),
            value,
            provider_name: Some("WF".to_string()),
            provider_url: None,
            republish: true,
            tendency: 1,
        }
    }

    #[test]
    fn create_observation_keeps_unknown_value() {
        let bus = EventBus::new();
        let observation = create_observation(&bus, created_data("ESP", "2013", None)).unwrap();
        assert_eq!(observation.value(), None);
        assert_eq!(observation.version(), Version::first());
    }

    #[test]
    fn computations_fill_derived_fields() {
        let bus = EventBus::new();
        let mut observation =
            create_observation(&bus, created_data("ESP", "2013", Some(54.321))).unwrap();

        observation
            .add_computation(&bus, ComputationKind::Scored, 71.5)
            .unwrap();
        observation
            .add_computation(&bus, ComputationKind::Normalized, 0.89)
            .unwrap();
        observation.set_rank(&bus, 4).unwrap();

        assert_eq!(observation.scored(), Some(71.5));
        assert_eq!(observation.normalized(), Some(0.89));
        assert_eq!(observation.rank(), Some(4));
        assert_eq!(observation.version(), Version::new(4));
    }

    #[test]
    fn rank_must_be_positive() {
        let bus = EventBus::new();
        let mut observation =
            create_observation(&bus, created_data("ESP", "2013", Some(1.0))).unwrap();
        let result = observation.set_rank(&bus, 0);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn reference_discarded_area_fails() {
        let bus = EventBus::new();
        let mut observation =
            create_observation(&bus, created_data("ESP", "2013", Some(1.0))).unwrap();
        let mut region = create_region(
            &bus,
            AreaCore {
                name: "Europe".to_string(),
                short_name: "Europe".to_string(),
                continent: None,
                iso3: "EUR".to_string(),
                iso2: None,
                iso_num: None,
            },
        )
        .unwrap();
        region.discard(&bus).unwrap();

        let result = observation.reference_area(&bus, &region);
        assert!(matches!(result, Err(DomainError::DiscardedEntity { .. })));
    }

    #[test]
    fn reference_area_links_by_id() {
        let bus = EventBus::new();
        let mut observation =
            create_observation(&bus, created_data("ESP", "2013", Some(1.0))).unwrap();
        let region = create_region(
            &bus,
            AreaCore {
                name: "Europe".to_string(),
                short_name: "Europe".to_string(),
                continent: None,
                iso3: "EUR".to_string(),
                iso2: None,
                iso_num: None,
            },
        )
        .unwrap();

        observation.reference_area(&bus, &region).unwrap();
        assert_eq!(observation.ref_area_id(), Some(region.id()));
    }

    #[test]
    fn empty_year_is_rejected() {
        let bus = EventBus::new();
        let result = create_observation(&bus, created_data("ESP", "", Some(1.0)));
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn commands_after_discard_fail() {
        let bus = EventBus::new();
        let mut observation =
            create_observation(&bus, created_data("ESP", "2013", Some(1.0))).unwrap();
        observation.discard(&bus).unwrap();

        let result = observation.add_computation(&bus, ComputationKind::Scored, 1.0);
        assert!(matches!(result, Err(DomainError::DiscardedEntity { .. })));
    }
}
