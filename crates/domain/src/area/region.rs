//! Region aggregate: a grouping of countries (e.g. a continent).

use common::AggregateId;
use event_bus::EventBus;
use serde::{Deserialize, Serialize};

use crate::aggregate::{
    Aggregate, EntityCore, EventRecord, create, require_existing, require_new,
};
use crate::error::DomainError;

use super::AreaCore;
use super::country::Country;
use super::events::{CountryProfile, CountryRelatedData, RegionCreatedData, RegionEvent};

/// Region aggregate root.
///
/// Owns an ordered set of countries; countries join through the
/// [`Region::relate_country`] command, never by direct mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    core: EntityCore,
    info: AreaCore,
    countries: Vec<Country>,
}

impl Aggregate for Region {
    type Event = RegionEvent;

    fn aggregate_type() -> &'static str {
        "Region"
    }

    fn entity(&self) -> &EntityCore {
        &self.core
    }

    fn entity_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn apply(state: Option<Self>, record: &EventRecord<Self::Event>) -> Result<Self, DomainError> {
        match &record.event {
            RegionEvent::Created(data) => {
                require_new::<Self>(&state)?;
                Ok(Region {
                    core: EntityCore::created(record),
                    info: data.info.clone(),
                    countries: Vec::new(),
                })
            }
            RegionEvent::Discarded => {
                let mut region = require_existing::<Self>(state, record)?;
                region.core.tombstone();
                region.core.advance();
                Ok(region)
            }
            RegionEvent::CountryRelated(data) => {
                let mut region = require_existing::<Self>(state, record)?;
                region.countries.push(Country::from_related(data));
                region.core.advance();
                Ok(region)
            }
        }
    }
}

impl Region {
    /// Geographic identity of the region.
    pub fn info(&self) -> &AreaCore {
        &self.info
    }

    /// Region code (ISO-style alpha-3).
    pub fn iso3(&self) -> &str {
        &self.info.iso3
    }

    /// Full name.
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// The countries related to this region, in relation order.
    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    /// Obtains a country of this region by its iso3 code.
    ///
    /// Fails with a validation error when no such country is related, or
    /// with a discarded-entity error when the region is tombstoned.
    pub fn country_with_iso3(&self, iso3: &str) -> Result<&Country, DomainError> {
        self.check_not_discarded()?;
        self.countries
            .iter()
            .find(|country| country.iso3() == iso3)
            .ok_or_else(|| {
                DomainError::Validation(format!("No country with iso3 code '{iso3}'"))
            })
    }

    /// Discard this region. After this call the region can no longer be
    /// used; discarding twice is an error.
    pub fn discard(&mut self, bus: &EventBus) -> Result<(), DomainError> {
        self.check_not_discarded()?;
        self.emit(bus, RegionEvent::Discarded)
    }

    /// Relates a new country to this region and returns it.
    ///
    /// The country's `continent` reference is pointed back at this region
    /// regardless of what the profile carried.
    pub fn relate_country(
        &mut self,
        bus: &EventBus,
        mut profile: CountryProfile,
    ) -> Result<&Country, DomainError> {
        self.check_not_discarded()?;
        super::country::validate_profile(&profile)?;
        profile.info.continent = Some(self.info.iso3.clone());
        let iso3 = profile.info.iso3.clone();

        self.emit(
            bus,
            RegionEvent::CountryRelated(CountryRelatedData {
                country_id: AggregateId::new(),
                profile,
            }),
        )?;
        self.country_with_iso3(&iso3)
    }
}

/// Creates a new region, emitting and publishing its Created event.
pub fn create_region(bus: &EventBus, info: AreaCore) -> Result<Region, DomainError> {
    if info.iso3.is_empty() {
        return Err(DomainError::Validation(
            "Region iso3 cannot be empty".to_string(),
        ));
    }
    if info.name.is_empty() {
        return Err(DomainError::Validation(
            "Region name cannot be empty".to_string(),
        ));
    }
    create(bus, RegionEvent::Created(RegionCreatedData { info }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use event_bus::Version;

    fn region_info(iso3: &str, name: &str) -> AreaCore {
        AreaCore {
            name: name.to_string(),
            short_name: name.to_string(),
            continent: None,
            iso3: iso3.to_string(),
            iso2: None,
            iso_num: None,
        }
    }

    fn country_profile(iso3: &str, name: &str) -> CountryProfile {
        CountryProfile {
            info: AreaCore {
                name: name.to_string(),
                short_name: name.to_string(),
                continent: None,
                iso3: iso3.to_string(),
                iso2: None,
                iso_num: None,
            },
            income: None,
            development: Some("Developing".to_string()),
        }
    }

    #[test]
    fn relate_country_appends_and_returns_it() {
        let bus = EventBus::new();
        let mut region = create_region(&bus, region_info("EUR", "Europe")).unwrap();

        let country = region
            .relate_country(&bus, country_profile("ESP", "Spain"))
            .unwrap();
        assert_eq!(country.iso3(), "ESP");
        assert_eq!(country.info().continent.as_deref(), Some("EUR"));

        assert_eq!(region.countries().len(), 1);
        assert_eq!(region.version(), Version::new(2));
    }

    #[test]
    fn country_with_unknown_iso3_fails() {
        let bus = EventBus::new();
        let region = create_region(&bus, region_info("EUR", "Europe")).unwrap();
        let result = region.country_with_iso3("XXX");
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn relate_country_on_discarded_region_fails() {
        let bus = EventBus::new();
        let mut region = create_region(&bus, region_info("EUR", "Europe")).unwrap();
        region.discard(&bus).unwrap();

        let result = region.relate_country(&bus, country_profile("ESP", "Spain"));
        assert!(matches!(result, Err(DomainError::DiscardedEntity { .. })));
    }

    #[test]
    fn version_tracks_each_related_country() {
        let bus = EventBus::new();
        let mut region = create_region(&bus, region_info("AME", "America")).unwrap();
        for (iso3, name) in [("USA", "United States"), ("BRA", "Brazil"), ("PER", "Peru")] {
            region
                .relate_country(&bus, country_profile(iso3, name))
                .unwrap();
        }
        assert_eq!(region.version(), Version::new(4));
        assert_eq!(region.countries().len(), 3);
    }
}
