//! Derived view structures shipped to downstream consumers.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::doc::{CountryDoc, ObservationDoc};
use crate::statistics::Statistics;

/// A set of observations together with its statistics.
#[derive(Debug, Clone, Serialize)]
pub struct Visualisation {
    /// The observations of the view.
    pub observations: Vec<ObservationDoc>,

    /// Statistics over those observations.
    pub statistics: Statistics,
}

impl Visualisation {
    /// Builds the view, computing the statistics over the observations.
    pub fn new(observations: Vec<ObservationDoc>) -> Self {
        let statistics = Statistics::from_observations(&observations);
        Self {
            observations,
            statistics,
        }
    }
}

/// Observations grouped per requested area code, each group with its own
/// statistics.
///
/// An observation belongs to a group when its area or its continent matches
/// the group's code; an empty code set produces the single "ALL" group over
/// everything.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct AreaGroupedView(pub BTreeMap<String, Visualisation>);

impl AreaGroupedView {
    /// Groups the observations by the requested area codes.
    pub fn group_by_area(area_codes: &[String], observations: &[ObservationDoc]) -> Self {
        let mut groups = BTreeMap::new();

        if area_codes.is_empty() {
            groups.insert("ALL".to_string(), Visualisation::new(observations.to_vec()));
            return Self(groups);
        }

        for code in area_codes {
            let group: Vec<ObservationDoc> = observations
                .iter()
                .filter(|obs| obs.area == *code || obs.continent.as_deref() == Some(code))
                .cloned()
                .collect();
            groups.insert(code.clone(), Visualisation::new(group));
        }

        Self(groups)
    }
}

/// The full comparison view for one indicator/area/year selection.
///
/// Field names are part of the outward contract and must stay stable for
/// downstream consumers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonView {
    /// Primary filtered/sorted observation list.
    pub observations: Vec<ObservationDoc>,

    /// The primary list keyed by country code.
    pub observations_by_country: BTreeMap<String, ObservationDoc>,

    /// Bounded, rank-spanning comparison bar set with `selected` flags.
    pub bars: Vec<ObservationDoc>,

    /// Regional or global companion line-chart series.
    pub second_visualisation: Vec<ObservationDoc>,

    /// Statistics over the primary set.
    pub statistics: Statistics,

    /// Statistics over the global ("ALL") set.
    pub global_statistics: Statistics,

    /// Per-country full time series, keyed by country code.
    pub by_country: BTreeMap<String, Vec<ObservationDoc>>,

    /// Years with data, most recent first.
    pub years: Vec<String>,

    /// Continent name per iso3 code.
    pub continents: BTreeMap<String, String>,

    /// Area documents of the countries in the bar set.
    pub countries: BTreeMap<String, CountryDoc>,

    /// Resolved comparison scope: "ALL" or a region code.
    pub region: String,

    /// Primary-indicator observations across the resolved region.
    pub full_observations: Vec<ObservationDoc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(area: &str, continent: &str, value: Option<f64>) -> ObservationDoc {
        ObservationDoc {
            indicator: "INDEX".to_string(),
            indicator_name: "The Index".to_string(),
            area: area.to_string(),
            area_name: area.to_string(),
            continent: Some(continent.to_string()),
            area_type: None,
            year: "2013".to_string(),
            value,
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
    fn empty_code_set_yields_single_all_group() {
        let observations = vec![doc("ESP", "EUR", Some(1.0)), doc("USA", "AME", Some(3.0))];
        let view = AreaGroupedView::group_by_area(&[], &observations);
        assert_eq!(view.0.len(), 1);
        let all = &view.0["ALL"];
        assert_eq!(all.observations.len(), 2);
        assert_eq!(all.statistics.average, 2.0);
    }

    #[test]
    fn groups_match_area_or_continent() {
        let observations = vec![
            doc("ESP", "EUR", Some(1.0)),
            doc("FRA", "EUR", Some(2.0)),
            doc("USA", "AME", Some(3.0)),
        ];
        let codes = vec!["ESP".to_string(), "EUR".to_string()];
        let view = AreaGroupedView::group_by_area(&codes, &observations);

        assert_eq!(view.0["ESP"].observations.len(), 1);
        // EUR matches by continent.
        assert_eq!(view.0["EUR"].observations.len(), 2);
    }

    #[test]
    fn comparison_view_serializes_with_contract_field_names() {
        let view = ComparisonView {
            observations: Vec::new(),
            observations_by_country: BTreeMap::new(),
            bars: Vec::new(),
            second_visualisation: Vec::new(),
            statistics: Statistics::from_observations(&[]),
            global_statistics: Statistics::from_observations(&[]),
            by_country: BTreeMap::new(),
            years: Vec::new(),
            continents: BTreeMap::new(),
            countries: BTreeMap::new(),
            region: "ALL".to_string(),
            full_observations: Vec::new(),
        };
        let json = serde_json::to_value(&view).unwrap();
        for field in [
            "observations",
            "observationsByCountry",
            "bars",
            "secondVisualisation",
            "statistics",
            "globalStatistics",
            "byCountry",
            "years",
            "continents",
            "countries",
            "region",
            "fullObservations",
        ] {
            assert!(json.get(field).is_some(), "missing field {field}");
        }
    }
}
