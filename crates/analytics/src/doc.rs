//! Read-model documents consumed and produced by the analytics engine.
//!
//! Aggregates are never mutated here; they are copied into these documents
//! and every derived view works on the copies.

use domain::{Country, Observation, Region};
use serde::{Deserialize, Serialize};

/// Rounds a value to 2 decimal places, the precision every outward-facing
/// numeric field is published with.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Read-optimized snapshot of an observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationDoc {
    /// Normalized code of the measured indicator.
    pub indicator: String,

    /// Name of the measured indicator.
    pub indicator_name: String,

    /// ISO alpha-3 code of the observed area.
    pub area: String,

    /// Name of the observed area.
    pub area_name: String,

    /// Code of the area's continent.
    pub continent: Option<String>,

    /// Development classification ("Developing"/"Emerging").
    pub area_type: Option<String>,

    /// Observation year.
    pub year: String,

    /// Measured value; `None` when unknown. Never coerced to zero.
    pub value: Option<f64>,

    /// Scored value, computed upstream.
    pub scored: Option<f64>,

    /// Normalized value, computed upstream.
    pub normalized: Option<f64>,

    /// Rank within the comparison set; lower is better.
    pub rank: Option<i64>,

    /// True when the caller explicitly picked this observation's country.
    #[serde(default)]
    pub selected: bool,

    /// Whether the provider allows republishing.
    pub republish: bool,

    /// Name of the data provider.
    pub provider_name: Option<String>,

    /// URL of the data provider.
    pub provider_url: Option<String>,

    /// Tendency against the previous year.
    pub tendency: i8,
}

impl ObservationDoc {
    /// Country code of the observation (alias over the area code).
    pub fn code(&self) -> &str {
        &self.area
    }

    /// Rounds the value, scored and normalized fields to 2 decimals,
    /// leaving unknown values untouched.
    pub fn round_values(&mut self) {
        self.value = self.value.map(round2);
        self.scored = self.scored.map(round2);
        self.normalized = self.normalized.map(round2);
    }
}

impl From<&Observation> for ObservationDoc {
    fn from(observation: &Observation) -> Self {
        ObservationDoc {
            indicator: observation.indicator().as_str().to_string(),
            indicator_name: observation.indicator_name().to_string(),
            area: observation.area().to_string(),
            area_name: observation.area_name().to_string(),
            continent: observation.continent().map(str::to_string),
            area_type: observation.area_type().map(str::to_string),
            year: observation.year().to_string(),
            value: observation.value(),
            scored: observation.scored(),
            normalized: observation.normalized(),
            rank: observation.rank(),
            selected: false,
            republish: observation.republish(),
            provider_name: observation.provider_name().map(str::to_string),
            provider_url: observation.provider_url().map(str::to_string),
            tendency: observation.tendency(),
        }
    }
}

/// Read-optimized snapshot of a country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryDoc {
    /// ISO 3166-1 alpha-3 code.
    pub iso3: String,

    /// ISO 3166-1 alpha-2 code, when one exists.
    pub iso2: Option<String>,

    /// Full name.
    pub name: String,

    /// Code of the continent the country belongs to.
    pub continent: Option<String>,

    /// Income group classification.
    pub income: Option<String>,

    /// Development classification ("Developing"/"Emerging").
    pub area_type: Option<String>,
}

impl From<&Country> for CountryDoc {
    fn from(country: &Country) -> Self {
        CountryDoc {
            iso3: country.iso3().to_string(),
            iso2: country.info().iso2.clone(),
            name: country.name().to_string(),
            continent: country.info().continent.clone(),
            income: country.income().map(str::to_string),
            area_type: country.development().map(str::to_string),
        }
    }
}

/// Read-optimized snapshot of a continent/region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinentDoc {
    /// Region code (ISO-style alpha-3).
    pub iso3: String,

    /// Full name.
    pub name: String,
}

impl From<&Region> for ContinentDoc {
    fn from(region: &Region) -> Self {
        ContinentDoc {
            iso3: region.iso3().to_string(),
            name: region.name().to_string(),
        }
    }
}

/// Catalogue entry for an indicator: its code and display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorDoc {
    /// Normalized indicator code.
    pub code: String,

    /// Display name.
    pub name: String,
}
