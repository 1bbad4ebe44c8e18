//! Area hierarchy: regions (continents) and the countries they own.

pub mod country;
pub mod events;
pub mod region;

use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregate;

pub use country::{Country, create_country};
pub use events::{CountryEvent, CountryProfile, CountryRelatedData, RegionEvent};
pub use region::{Region, create_region};

/// Geographic identity shared by regions and countries.
///
/// Embedded by composition in each concrete variant. The `continent` field
/// is a code reference to the parent region — a weak name-keyed link, never
/// ownership — and is `None` for regions themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaCore {
    /// Full name of the area.
    pub name: String,

    /// Short display name, often the same as `name`.
    pub short_name: String,

    /// Code of the parent region, `None` for top-level regions.
    pub continent: Option<String>,

    /// ISO 3166-1 alpha-3 code.
    pub iso3: String,

    /// ISO 3166-1 alpha-2 code, when one exists.
    pub iso2: Option<String>,

    /// ISO 3166-1 numeric code, when one exists.
    pub iso_num: Option<String>,
}

/// Marker for aggregates an observation may reference as its area.
pub trait AreaAggregate: Aggregate {}

impl AreaAggregate for Region {}
impl AreaAggregate for Country {}
