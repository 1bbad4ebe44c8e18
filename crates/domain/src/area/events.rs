//! Area domain events.

use common::AggregateId;
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;

use super::AreaCore;

/// The facts a country is built from, used both by the standalone country
/// factory and by [`super::Region::relate_country`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryProfile {
    /// Geographic identity of the country.
    pub info: AreaCore,

    /// Income group classification (e.g. "HIGH", "LMC").
    pub income: Option<String>,

    /// Development classification ("Developing" or "Emerging").
    pub development: Option<String>,
}

/// Events that can occur on a region aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum RegionEvent {
    /// Region was created.
    Created(RegionCreatedData),

    /// Region was discarded.
    Discarded,

    /// A country was related to the region.
    CountryRelated(CountryRelatedData),
}

impl DomainEvent for RegionEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RegionEvent::Created(_) => "RegionCreated",
            RegionEvent::Discarded => "RegionDiscarded",
            RegionEvent::CountryRelated(_) => "CountryRelated",
        }
    }
}

/// Data for the RegionCreated event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionCreatedData {
    /// Geographic identity of the region.
    pub info: AreaCore,
}

/// Data for the CountryRelated event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryRelatedData {
    /// Identity assigned to the new country entity.
    pub country_id: AggregateId,

    /// The country's profile; its `continent` points back at the region.
    pub profile: CountryProfile,
}

/// Events that can occur on a country aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CountryEvent {
    /// Country was created.
    Created(CountryCreatedData),

    /// Country was discarded.
    Discarded,
}

impl DomainEvent for CountryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CountryEvent::Created(_) => "CountryCreated",
            CountryEvent::Discarded => "CountryDiscarded",
        }
    }
}

/// Data for the CountryCreated event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryCreatedData {
    /// The country's profile.
    pub profile: CountryProfile,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> CountryProfile {
        CountryProfile {
            info: AreaCore {
                name: "Spain".to_string(),
                short_name: "Spain".to_string(),
                continent: Some("EUR".to_string()),
                iso3: "ESP".to_string(),
                iso2: Some("ES".to_string()),
                iso_num: Some("724".to_string()),
            },
            income: Some("HIGH".to_string()),
            development: Some("Emerging".to_string()),
        }
    }

    #[test]
    fn event_type_names() {
        let created = CountryEvent::Created(CountryCreatedData { profile: profile() });
        assert_eq!(created.event_type(), "CountryCreated");
        assert_eq!(CountryEvent::Discarded.event_type(), "CountryDiscarded");
        assert_eq!(RegionEvent::Discarded.event_type(), "RegionDiscarded");
    }

    #[test]
    fn region_event_serialization_roundtrip() {
        let event = RegionEvent::CountryRelated(CountryRelatedData {
            country_id: AggregateId::new(),
            profile: profile(),
        });
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("CountryRelated"));

        let back: RegionEvent = serde_json::from_str(&json).unwrap();
        match back {
            RegionEvent::CountryRelated(data) => {
                assert_eq!(data.profile.info.iso3, "ESP");
            }
            other => panic!("expected CountryRelated, got {other:?}"),
        }
    }
}
