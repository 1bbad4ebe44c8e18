//! Comparison visualization selection.
//!
//! Builds a bounded bar set that always contrasts the caller's picks
//! against both the best and the worst performers of the relevant pool,
//! plus the companion views around it.

use std::collections::{BTreeMap, HashSet};

use crate::doc::ObservationDoc;
use crate::error::Result;
use crate::query::ObservationQueryEngine;
use crate::repository::CatalogueRepository;
use crate::statistics::Statistics;
use crate::view::ComparisonView;

/// Default cap on the number of bars in a comparison set.
pub const MAX_BARS: usize = 7;

/// Builds the bounded comparison bar set.
///
/// The explicit observations are flagged `selected` and seeded into the
/// output. The pool must be pre-sorted ascending by rank; remaining slots
/// alternate between its front (best remaining rank) and back (worst
/// remaining rank). An entry whose country is already present is skipped
/// but still consumes its turn, so a pool dense with duplicates drains
/// rather than stalls. A drained end stops while the other continues; the
/// loop ends when both ends are drained or the cap is reached.
///
/// The result is sorted ascending by rank (country code breaks ties) and
/// its numeric fields are rounded to 2 decimals.
pub fn select_bars(
    explicit: Vec<ObservationDoc>,
    pool: &[ObservationDoc],
    max_bars: usize,
) -> Vec<ObservationDoc> {
    let mut bars: Vec<ObservationDoc> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for mut observation in explicit {
        observation.selected = true;
        seen.insert(observation.area.clone());
        bars.push(observation);
    }

    let top = pool.len() as isize - 1;
    let mut index: usize = 0;
    let mut front: usize = 0;
    let mut back: usize = 0;
    let mut front_stopped = false;
    let mut back_stopped = false;

    while bars.len() < max_bars {
        if front_stopped && back_stopped {
            break;
        }

        if index % 2 == 0 {
            if front < pool.len() {
                let candidate = &pool[front];
                if seen.insert(candidate.area.clone()) {
                    bars.push(candidate.clone());
                }
                front += 1;
            } else {
                front_stopped = true;
            }
        } else {
            let pos = top - back as isize;
            if pos >= 0 && (pos as usize) < pool.len() {
                let candidate = &pool[pos as usize];
                if seen.insert(candidate.area.clone()) {
                    bars.push(candidate.clone());
                }
                back += 1;
            } else {
                back_stopped = true;
            }
        }

        index += 1;
    }

    sort_by_rank(&mut bars);
    for bar in &mut bars {
        bar.round_values();
    }
    bars
}

/// Rank-ascending sort with country code as the deterministic tie-break.
fn sort_by_rank(observations: &mut [ObservationDoc]) {
    observations.sort_by(|a, b| {
        let a_rank = a.rank.unwrap_or(i64::MAX);
        let b_rank = b.rank.unwrap_or(i64::MAX);
        a_rank.cmp(&b_rank).then_with(|| a.area.cmp(&b.area))
    });
}

/// Resolves the comparison scope implied by a selection.
///
/// When every selected country belongs to the same region, that region
/// scopes the companion query; any disagreement (or an empty selection)
/// widens the scope to "ALL".
pub fn resolve_region(continents: &[Option<String>]) -> String {
    let mut iter = continents.iter();
    let Some(first) = iter.next() else {
        return "ALL".to_string();
    };
    if first.is_some() && iter.all(|continent| continent == first) {
        first.clone().unwrap_or_else(|| "ALL".to_string())
    } else {
        "ALL".to_string()
    }
}

/// Assembles the full comparison view for one indicator/area/year
/// selection.
pub struct VisualizationSelector<C> {
    engine: ObservationQueryEngine<C>,
}

impl<C: CatalogueRepository> VisualizationSelector<C> {
    /// Creates a selector over the given storage collaborator.
    pub fn new(catalogue: C) -> Self {
        Self {
            engine: ObservationQueryEngine::new(catalogue),
        }
    }

    /// Returns the query engine the selector composes with.
    pub fn engine(&self) -> &ObservationQueryEngine<C> {
        &self.engine
    }

    /// Builds the comparison view.
    ///
    /// `area` is the caller's selection ("ALL", empty or absent for the
    /// global scope); `year` accepts the usual year filter expressions;
    /// `max_bars` caps the bar set (callers normally pass [`MAX_BARS`]).
    #[tracing::instrument(skip(self))]
    pub async fn build_comparison(
        &self,
        indicator: &str,
        area: Option<&str>,
        year: Option<&str>,
        max_bars: usize,
    ) -> Result<ComparisonView> {
        let catalogue = self.engine.catalogue();

        let mut observations = self
            .engine
            .find_observations(Some(indicator), area, year, None)
            .await?;
        for observation in &mut observations {
            observation.selected = true;
        }

        let global = self
            .engine
            .find_observations(Some(indicator), None, year, None)
            .await?;

        let region = match area {
            None => "ALL".to_string(),
            Some(raw) if raw.trim().is_empty() || raw.trim().eq_ignore_ascii_case("ALL") => {
                "ALL".to_string()
            }
            Some(raw) => {
                let resolved = self.engine.resolve_areas(raw).await?;
                resolve_region(&resolved.continents)
            }
        };
        let global_scope = region == "ALL";

        let bars = select_bars(observations.clone(), &global, max_bars);

        let full_observations = self
            .engine
            .find_observations(
                Some(indicator),
                if global_scope { None } else { Some(&region) },
                year,
                None,
            )
            .await?;

        // Distinct countries of the final bar set, in bar order.
        let mut bar_countries: Vec<String> = Vec::new();
        for bar in &bars {
            if !bar_countries.contains(&bar.area) {
                bar_countries.push(bar.area.clone());
            }
        }

        // Full time series per bar country, for multi-series charting.
        let mut by_country: BTreeMap<String, Vec<ObservationDoc>> = BTreeMap::new();
        for code in &bar_countries {
            let mut series = self
                .engine
                .find_observations(Some(indicator), Some(code), None, None)
                .await?;
            series.sort_by(|a, b| a.year.cmp(&b.year));
            by_country.insert(code.clone(), series);
        }

        let second_visualisation = self
            .companion_series(indicator, year, &bar_countries, global_scope)
            .await?;

        let mut countries = BTreeMap::new();
        for code in &bar_countries {
            if let Some(country) = catalogue.find_countries_by_iso3(code).await?.into_iter().next()
            {
                countries.insert(code.clone(), country);
            }
        }

        let continents = catalogue
            .find_continents()
            .await?
            .into_iter()
            .map(|continent| (continent.iso3, continent.name))
            .collect();

        let statistics = Statistics::from_observations(&observations);
        let global_statistics = Statistics::from_observations(&global);

        let observations_by_country = observations
            .iter()
            .map(|observation| (observation.area.clone(), observation.clone()))
            .collect();

        let years = catalogue.distinct_years().await?;

        metrics::counter!("analytics_comparisons_built").increment(1);

        Ok(ComparisonView {
            observations,
            observations_by_country,
            bars,
            second_visualisation,
            statistics,
            global_statistics,
            by_country,
            years,
            continents,
            countries,
            region,
            full_observations,
        })
    }

    /// The companion line-chart series for the countries of the bar set.
    ///
    /// In the global scope the series keeps the selection's year filter and
    /// each entry is tagged with its continent from the area hierarchy; in
    /// a regional scope the series spans all years.
    async fn companion_series(
        &self,
        indicator: &str,
        year: Option<&str>,
        bar_countries: &[String],
        global_scope: bool,
    ) -> Result<Vec<ObservationDoc>> {
        if bar_countries.is_empty() {
            return Ok(Vec::new());
        }
        let joined = bar_countries.join(",");

        if global_scope {
            let mut series = self
                .engine
                .find_observations(Some(indicator), Some(&joined), year, None)
                .await?;
            for observation in &mut series {
                if let Some(country) = self
                    .engine
                    .catalogue()
                    .find_countries_by_iso3(&observation.area)
                    .await?
                    .into_iter()
                    .next()
                {
                    observation.continent = country.continent;
                }
            }
            Ok(series)
        } else {
            self.engine
                .find_observations(Some(indicator), Some(&joined), None, None)
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(area: &str, rank: i64, value: f64) -> ObservationDoc {
        ObservationDoc {
            indicator: "INDEX".to_string(),
            indicator_name: "The Index".to_string(),
            area: area.to_string(),
            area_name: area.to_string(),
            continent: Some("EUR".to_string()),
            area_type: None,
            year: "2013".to_string(),
            value: Some(value),
            scored: None,
            normalized: None,
            rank: Some(rank),
            selected: false,
            republish: true,
            provider_name: None,
            provider_url: None,
            tendency: 0,
        }
    }

    fn pool(n: usize) -> Vec<ObservationDoc> {
        (0..n)
            .map(|i| doc(&format!("C{i:02}"), i as i64 + 1, i as f64 + 0.123))
            .collect()
    }

    #[test]
    fn caps_output_and_keeps_explicit_entries() {
        let explicit = vec![doc("ESP", 4, 4.0), doc("FRA", 6, 6.0)];
        let bars = select_bars(explicit, &pool(10), MAX_BARS);

        assert_eq!(bars.len(), 7);
        let selected: Vec<&str> = bars
            .iter()
            .filter(|bar| bar.selected)
            .map(|bar| bar.area.as_str())
            .collect();
        assert_eq!(selected, vec!["ESP", "FRA"]);
    }

    #[test]
    fn spans_both_ends_of_the_pool() {
        let explicit = vec![doc("ESP", 4, 4.0)];
        let bars = select_bars(explicit, &pool(10), MAX_BARS);

        let areas: Vec<&str> = bars.iter().map(|bar| bar.area.as_str()).collect();
        // Front end: best-ranked pool entries.
        assert!(areas.contains(&"C00"));
        // Back end: worst-ranked pool entries.
        assert!(areas.contains(&"C09"));
    }

    #[test]
    fn output_is_sorted_ascending_by_rank() {
        let explicit = vec![doc("ESP", 4, 4.0), doc("FRA", 6, 6.0)];
        let bars = select_bars(explicit, &pool(10), MAX_BARS);

        let ranks: Vec<i64> = bars.iter().filter_map(|bar| bar.rank).collect();
        let mut sorted = ranks.clone();
        sorted.sort();
        assert_eq!(ranks, sorted);
    }

    #[test]
    fn no_duplicate_countries() {
        // Explicit picks shadow their pool twins.
        let explicit = vec![doc("C00", 1, 0.123), doc("C09", 10, 9.123)];
        let bars = select_bars(explicit, &pool(10), MAX_BARS);

        let mut areas: Vec<&str> = bars.iter().map(|bar| bar.area.as_str()).collect();
        areas.sort();
        let before = areas.len();
        areas.dedup();
        assert_eq!(areas.len(), before);
        assert_eq!(bars.len(), 7);
    }

    #[test]
    fn small_pool_yields_fewer_bars() {
        let explicit = vec![doc("ESP", 4, 4.0)];
        let bars = select_bars(explicit, &pool(3), MAX_BARS);
        assert_eq!(bars.len(), 4);
    }

    #[test]
    fn empty_pool_returns_explicit_only() {
        let explicit = vec![doc("ESP", 4, 4.0)];
        let bars = select_bars(explicit, &[], MAX_BARS);
        assert_eq!(bars.len(), 1);
        assert!(bars[0].selected);
    }

    #[test]
    fn values_are_rounded_to_two_decimals() {
        let bars = select_bars(Vec::new(), &pool(3), MAX_BARS);
        assert!(bars.iter().all(|bar| {
            bar.value
                .is_some_and(|v| (v * 100.0 - (v * 100.0).round()).abs() < 1e-9)
        }));
        assert_eq!(bars[0].value, Some(0.12));
    }

    #[test]
    fn equal_ranks_tie_break_on_country_code() {
        let mut entries = vec![doc("BBB", 1, 1.0), doc("AAA", 1, 1.0), doc("CCC", 1, 1.0)];
        sort_by_rank(&mut entries);
        let areas: Vec<&str> = entries.iter().map(|e| e.area.as_str()).collect();
        assert_eq!(areas, vec!["AAA", "BBB", "CCC"]);
    }

    #[test]
    fn resolve_region_requires_unanimity() {
        let same = vec![Some("EUR".to_string()), Some("EUR".to_string())];
        assert_eq!(resolve_region(&same), "EUR");

        let mixed = vec![Some("EUR".to_string()), Some("AME".to_string())];
        assert_eq!(resolve_region(&mixed), "ALL");

        assert_eq!(resolve_region(&[]), "ALL");
        assert_eq!(resolve_region(&[None, None]), "ALL");
    }
}
