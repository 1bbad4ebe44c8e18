//! Slice aggregate: a cut of observations for one indicator and year.

use common::{AggregateId, IndicatorCode};
use event_bus::EventBus;
use serde::{Deserialize, Serialize};

use crate::aggregate::{
    Aggregate, DomainEvent, EntityCore, EventRecord, create, require_existing, require_new,
};
use crate::error::DomainError;
use crate::observation::Observation;

/// Events that can occur on a slice aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SliceEvent {
    /// Slice was created.
    Created(SliceCreatedData),

    /// Slice was discarded.
    Discarded,

    /// An observation was added to the slice.
    ObservationAdded(ObservationAddedData),
}

impl DomainEvent for SliceEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SliceEvent::Created(_) => "SliceCreated",
            SliceEvent::Discarded => "SliceDiscarded",
            SliceEvent::ObservationAdded(_) => "SliceObservationAdded",
        }
    }
}

/// Data for the SliceCreated event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliceCreatedData {
    /// Code of the indicator the slice cuts across.
    pub indicator: Option<IndicatorCode>,

    /// Year the slice covers.
    pub year: String,
}

/// Data for the SliceObservationAdded event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationAddedData {
    /// Id of the observation joining the slice.
    pub observation_id: AggregateId,
}

/// Slice aggregate root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slice {
    core: EntityCore,
    indicator: Option<IndicatorCode>,
    year: String,
    observation_ids: Vec<AggregateId>,
}

impl Aggregate for Slice {
    type Event = SliceEvent;

    fn aggregate_type() -> &'static str {
        "Slice"
    }

    fn entity(&self) -> &EntityCore {
        &self.core
    }

    fn entity_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn apply(state: Option<Self>, record: &EventRecord<Self::Event>) -> Result<Self, DomainError> {
        match &record.event {
            SliceEvent::Created(data) => {
                require_new::<Self>(&state)?;
                Ok(Slice {
                    core: EntityCore::created(record),
                    indicator: data.indicator.clone(),
                    year: data.year.clone(),
                    observation_ids: Vec::new(),
                })
            }
            SliceEvent::Discarded => {
                let mut slice = require_existing::<Self>(state, record)?;
                slice.core.tombstone();
                slice.core.advance();
                Ok(slice)
            }
            SliceEvent::ObservationAdded(data) => {
                let mut slice = require_existing::<Self>(state, record)?;
                slice.observation_ids.push(data.observation_id);
                slice.core.advance();
                Ok(slice)
            }
        }
    }
}

impl Slice {
    /// Code of the indicator the slice cuts across.
    pub fn indicator(&self) -> Option<&IndicatorCode> {
        self.indicator.as_ref()
    }

    /// Year the slice covers.
    pub fn year(&self) -> &str {
        &self.year
    }

    /// True if the given observation has been added to this slice.
    pub fn contains(&self, observation: &Observation) -> bool {
        self.observation_ids.contains(&observation.id())
    }

    /// Iterator over the ids of the observations in this slice.
    pub fn observation_ids(&self) -> impl Iterator<Item = &AggregateId> {
        self.observation_ids.iter()
    }

    /// Discard this slice. Discarding twice is an error.
    pub fn discard(&mut self, bus: &EventBus) -> Result<(), DomainError> {
        self.check_not_discarded()?;
        self.emit(bus, SliceEvent::Discarded)
    }

    /// Adds an observation to this slice.
    ///
    /// Fails with a constraint error if the observation is already present,
    /// or a discarded-entity error if either side is tombstoned.
    pub fn add_observation(
        &mut self,
        bus: &EventBus,
        observation: &Observation,
    ) -> Result<(), DomainError> {
        self.check_not_discarded()?;
        if observation.discarded() {
            return Err(DomainError::DiscardedEntity {
                aggregate_type: Observation::aggregate_type(),
                id: observation.id(),
            });
        }
        if self.contains(observation) {
            return Err(DomainError::Constraint(format!(
                "Observation {} is already added",
                observation.id()
            )));
        }
        self.emit(
            bus,
            SliceEvent::ObservationAdded(ObservationAddedData {
                observation_id: observation.id(),
            }),
        )
    }
}

/// Creates a new slice, emitting and publishing its Created event.
pub fn create_slice(
    bus: &EventBus,
    indicator: Option<IndicatorCode>,
    year: impl Into<String>,
) -> Result<Slice, DomainError> {
    let year = year.into();
    if year.is_empty() {
        return Err(DomainError::Validation(
            "Slice year cannot be empty".to_string(),
        ));
    }
    create(bus, SliceEvent::Created(SliceCreatedData { indicator, year }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::{ObservationCreatedData, create_observation};
    use event_bus::Version;

    fn observation(bus: &EventBus) -> Observation {
        create_observation(
            bus,
            ObservationCreatedData {
                indicator: IndicatorCode::new("INDEX"),
                indicator_name: "The Index".to_string(),
                area: "ESP".to_string(),
                area_name: "Spain".to_string(),
                continent: Some("EUR".to_string()),
                area_type: None,
                year: "2013".to_string(),
                value: Some(3.2),
                provider_name: None,
                provider_url: None,
                republish: true,
                tendency: 0,
            },
        )
        .unwrap()
    }

    #[test]
    fn add_observation_tracks_membership() {
        let bus = EventBus::new();
        let mut slice = create_slice(&bus, Some(IndicatorCode::new("INDEX")), "2013").unwrap();
        let obs = observation(&bus);

        slice.add_observation(&bus, &obs).unwrap();
        assert!(slice.contains(&obs));
        assert_eq!(slice.version(), Version::new(2));
    }

    #[test]
    fn duplicate_observation_is_a_constraint_error() {
        let bus = EventBus::new();
        let mut slice = create_slice(&bus, None, "2013").unwrap();
        let obs = observation(&bus);

        slice.add_observation(&bus, &obs).unwrap();
        let result = slice.add_observation(&bus, &obs);
        assert!(matches!(result, Err(DomainError::Constraint(_))));
    }

    #[test]
    fn discarded_observation_cannot_join() {
        let bus = EventBus::new();
        let mut slice = create_slice(&bus, None, "2013").unwrap();
        let mut obs = observation(&bus);
        obs.discard(&bus).unwrap();

        let result = slice.add_observation(&bus, &obs);
        assert!(matches!(result, Err(DomainError::DiscardedEntity { .. })));
    }

    #[test]
    fn empty_year_is_rejected() {
        let bus = EventBus::new();
        let result = create_slice(&bus, None, "");
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
