//! Observation query and filter composition.

use common::IndicatorCode;
use serde::{Deserialize, Serialize};

use crate::doc::{CountryDoc, ObservationDoc};
use crate::error::{AnalyticsError, Result};
use crate::repository::CatalogueRepository;
use crate::year::expand_year_filter;

/// A composed observation query.
///
/// Every filter is optional and they combine with logical AND. The concrete
/// values are already resolved: indicator codes validated against the
/// catalogue, area segments resolved to country codes, year expressions
/// expanded to literal years.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationQuery {
    /// Restrict to these indicator codes.
    pub indicators: Option<Vec<String>>,

    /// Restrict to these country iso3 codes.
    pub areas: Option<Vec<String>>,

    /// Restrict to these years.
    pub years: Option<Vec<String>>,

    /// Restrict to one area-type classification, case-insensitively.
    pub area_type: Option<String>,
}

impl ObservationQuery {
    /// True when the observation passes every set filter.
    pub fn matches(&self, observation: &ObservationDoc) -> bool {
        if let Some(indicators) = &self.indicators
            && !indicators.contains(&observation.indicator)
        {
            return false;
        }
        if let Some(areas) = &self.areas
            && !areas.contains(&observation.area)
        {
            return false;
        }
        if let Some(years) = &self.years
            && !years.contains(&observation.year)
        {
            return false;
        }
        if let Some(area_type) = &self.area_type {
            let matched = observation
                .area_type
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case(area_type));
            if !matched {
                return false;
            }
        }
        true
    }
}

/// The country codes an area filter resolved to, with the continent each
/// code belongs to (used for region-scope resolution).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedAreas {
    /// Union of the matched country iso3 codes, in match order.
    pub countries: Vec<String>,

    /// Continent of each matched country, parallel to `countries`.
    pub continents: Vec<Option<String>>,
}

/// Composes raw filter strings into [`ObservationQuery`] values and runs
/// them against the observation store.
pub struct ObservationQueryEngine<C> {
    catalogue: C,
}

impl<C: CatalogueRepository> ObservationQueryEngine<C> {
    /// Creates an engine over the given storage collaborator.
    pub fn new(catalogue: C) -> Self {
        Self { catalogue }
    }

    /// Returns a reference to the underlying catalogue.
    pub fn catalogue(&self) -> &C {
        &self.catalogue
    }

    /// Composes raw filter strings into a concrete query.
    ///
    /// - `indicator`: comma-separated codes; each must exist in the
    ///   catalogue. The literal "ALL" (case-insensitive) lifts the
    ///   restriction.
    /// - `area`: comma-separated segments, each resolved against iso3,
    ///   iso2, name, continent and income in that order; segments union.
    /// - `year`: literals, inclusive ranges, or "LATEST".
    /// - `area_type`: matched case-insensitively.
    #[tracing::instrument(skip(self))]
    pub async fn compose(
        &self,
        indicator: Option<&str>,
        area: Option<&str>,
        year: Option<&str>,
        area_type: Option<&str>,
    ) -> Result<ObservationQuery> {
        let indicators = match indicator {
            None => None,
            Some(raw) => self.indicator_codes(raw).await?,
        };

        let areas = match area {
            None => None,
            Some(raw) if raw.trim().is_empty() || raw.trim().eq_ignore_ascii_case("ALL") => None,
            Some(raw) => Some(self.resolve_areas(raw).await?.countries),
        };

        let years = match year {
            None => None,
            Some(raw) => {
                let available = self.catalogue.distinct_years().await?;
                Some(expand_year_filter(raw, &available))
            }
        };

        Ok(ObservationQuery {
            indicators,
            areas,
            years,
            area_type: area_type.map(str::to_string),
        })
    }

    /// Composes a query and returns the matching observations, sorted
    /// ascending by rank.
    #[tracing::instrument(skip(self))]
    pub async fn find_observations(
        &self,
        indicator: Option<&str>,
        area: Option<&str>,
        year: Option<&str>,
        area_type: Option<&str>,
    ) -> Result<Vec<ObservationDoc>> {
        let query = self.compose(indicator, area, year, area_type).await?;
        let observations = self.catalogue.find_observations(&query).await?;
        metrics::counter!("analytics_observation_queries").increment(1);
        Ok(observations)
    }

    /// Resolves an area filter to the union of the country codes its
    /// segments name.
    ///
    /// Each segment resolves against, in order: country iso3, iso2, name,
    /// continent code, income group. A segment matching nothing fails the
    /// whole filter.
    pub async fn resolve_areas(&self, raw: &str) -> Result<ResolvedAreas> {
        let mut resolved = ResolvedAreas::default();

        for segment in raw.split(',') {
            let segment = segment.trim();
            let countries = self.resolve_segment(segment).await?;
            if countries.is_empty() {
                return Err(AnalyticsError::AreaRepository(format!(
                    "No area with code {segment}"
                )));
            }
            for country in countries {
                resolved.countries.push(country.iso3);
                resolved.continents.push(country.continent);
            }
        }

        Ok(resolved)
    }

    /// Validates a comma-separated indicator filter; "ALL" lifts the
    /// restriction entirely.
    async fn indicator_codes(&self, raw: &str) -> Result<Option<Vec<String>>> {
        if raw.trim().eq_ignore_ascii_case("ALL") {
            return Ok(None);
        }

        let mut codes = Vec::new();
        for segment in raw.split(',') {
            let code = IndicatorCode::new(segment);
            if !self.catalogue.indicator_exists(code.as_str()).await? {
                return Err(AnalyticsError::IndicatorRepository(format!(
                    "No indicator with code {code}"
                )));
            }
            codes.push(code.as_str().to_string());
        }
        Ok(Some(codes))
    }

    async fn resolve_segment(&self, segment: &str) -> Result<Vec<CountryDoc>> {
        let upper = segment.to_uppercase();

        let by_iso3 = self.catalogue.find_countries_by_iso3(&upper).await?;
        if !by_iso3.is_empty() {
            return Ok(by_iso3);
        }

        let by_iso2 = self.catalogue.find_countries_by_iso2(&upper).await?;
        if !by_iso2.is_empty() {
            return Ok(by_iso2);
        }

        // Names are matched as written, not uppercased.
        let by_name = self.catalogue.find_countries_by_name(segment).await?;
        if !by_name.is_empty() {
            return Ok(by_name);
        }

        let by_continent = self.catalogue.find_countries_by_continent(&upper).await?;
        if !by_continent.is_empty() {
            return Ok(by_continent);
        }

        self.catalogue.find_countries_by_income(&upper).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(indicator: &str, area: &str, year: &str, area_type: Option<&str>) -> ObservationDoc {
        ObservationDoc {
            indicator: indicator.to_string(),
            indicator_name: indicator.to_string(),
            area: area.to_string(),
            area_name: area.to_string(),
            continent: None,
            area_type: area_type.map(str::to_string),
            year: year.to_string(),
            value: Some(1.0),
            scored: None,
            normalized: None,
            rank: None,
            selected: false,
            republish: true,
            provider_name: None,
            provider_url: None,
            tendency: 0,
        }
    }

    #[test]
    fn empty_query_matches_everything() {
        let query = ObservationQuery::default();
        assert!(query.matches(&doc("INDEX", "ESP", "2013", None)));
    }

    #[test]
    fn filters_combine_with_and() {
        let query = ObservationQuery {
            indicators: Some(vec!["INDEX".to_string()]),
            areas: Some(vec!["ESP".to_string()]),
            years: Some(vec!["2013".to_string()]),
            area_type: None,
        };
        assert!(query.matches(&doc("INDEX", "ESP", "2013", None)));
        assert!(!query.matches(&doc("ACCESS", "ESP", "2013", None)));
        assert!(!query.matches(&doc("INDEX", "FRA", "2013", None)));
        assert!(!query.matches(&doc("INDEX", "ESP", "2012", None)));
    }

    #[test]
    fn area_type_matches_case_insensitively() {
        let query = ObservationQuery {
            area_type: Some("developing".to_string()),
            ..ObservationQuery::default()
        };
        assert!(query.matches(&doc("INDEX", "ESP", "2013", Some("Developing"))));
        assert!(!query.matches(&doc("INDEX", "ESP", "2013", Some("Emerging"))));
        assert!(!query.matches(&doc("INDEX", "ESP", "2013", None)));
    }
}
