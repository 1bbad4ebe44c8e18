//! Country aggregate.

use event_bus::EventBus;
use serde::{Deserialize, Serialize};

use crate::aggregate::{
    Aggregate, EntityCore, EventRecord, create, require_existing, require_new,
};
use crate::error::DomainError;

use super::AreaCore;
use super::events::{CountryCreatedData, CountryEvent, CountryProfile, CountryRelatedData};

/// Country aggregate root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Country {
    core: EntityCore,
    info: AreaCore,
    income: Option<String>,
    development: Option<String>,
}

impl Aggregate for Country {
    type Event = CountryEvent;

    fn aggregate_type() -> &'static str {
        "Country"
    }

    fn entity(&self) -> &EntityCore {
        &self.core
    }

    fn entity_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn apply(state: Option<Self>, record: &EventRecord<Self::Event>) -> Result<Self, DomainError> {
        match &record.event {
            CountryEvent::Created(data) => {
                require_new::<Self>(&state)?;
                Ok(Country {
                    core: EntityCore::created(record),
                    info: data.profile.info.clone(),
                    income: data.profile.income.clone(),
                    development: data.profile.development.clone(),
                })
            }
            CountryEvent::Discarded => {
                let mut country = require_existing::<Self>(state, record)?;
                country.core.tombstone();
                country.core.advance();
                Ok(country)
            }
        }
    }
}

impl Country {
    /// Geographic identity of the country.
    pub fn info(&self) -> &AreaCore {
        &self.info
    }

    /// ISO 3166-1 alpha-3 code.
    pub fn iso3(&self) -> &str {
        &self.info.iso3
    }

    /// Full name.
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Income group classification.
    pub fn income(&self) -> Option<&str> {
        self.income.as_deref()
    }

    /// Development classification ("Developing" or "Emerging").
    pub fn development(&self) -> Option<&str> {
        self.development.as_deref()
    }

    /// Discard this country. After this call the country can no longer be
    /// used; discarding twice is an error.
    pub fn discard(&mut self, bus: &EventBus) -> Result<(), DomainError> {
        self.check_not_discarded()?;
        self.emit(bus, CountryEvent::Discarded)
    }

    /// Builds the country entity embedded in a region's CountryRelated
    /// event. The entity has its own id but no event history yet.
    pub(crate) fn from_related(data: &CountryRelatedData) -> Self {
        Country {
            core: EntityCore::embedded(data.country_id),
            info: data.profile.info.clone(),
            income: data.profile.income.clone(),
            development: data.profile.development.clone(),
        }
    }
}

pub(crate) fn validate_profile(profile: &CountryProfile) -> Result<(), DomainError> {
    if profile.info.iso3.is_empty() {
        return Err(DomainError::Validation(
            "Country iso3 cannot be empty".to_string(),
        ));
    }
    if profile.info.iso2.as_deref() == Some("") {
        return Err(DomainError::Validation(
            "Country iso2 cannot be empty".to_string(),
        ));
    }
    if profile.info.name.is_empty() {
        return Err(DomainError::Validation(
            "Country name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Creates a new country, emitting and publishing its Created event.
pub fn create_country(bus: &EventBus, profile: CountryProfile) -> Result<Country, DomainError> {
    validate_profile(&profile)?;
    create(bus, CountryEvent::Created(CountryCreatedData { profile }))
}
