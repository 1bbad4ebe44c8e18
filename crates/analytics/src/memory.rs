//! In-memory catalogue implementation for testing.
//!
//! Implements every repository boundary trait over shared in-memory
//! collections, providing the same interface a document-store-backed
//! implementation would.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::doc::{ContinentDoc, CountryDoc, IndicatorDoc, ObservationDoc};
use crate::error::Result;
use crate::query::ObservationQuery;
use crate::ranking::Ranking;
use crate::repository::{
    AreaRepository, IndicatorRepository, ObservationRepository, RankingRepository,
};

/// In-memory storage collaborator for tests and benches.
#[derive(Clone, Default)]
pub struct InMemoryCatalogue {
    observations: Arc<RwLock<Vec<ObservationDoc>>>,
    countries: Arc<RwLock<Vec<CountryDoc>>>,
    continents: Arc<RwLock<Vec<ContinentDoc>>>,
    indicators: Arc<RwLock<Vec<IndicatorDoc>>>,
    rankings: Arc<RwLock<HashMap<String, Ranking>>>,
}

impl InMemoryCatalogue {
    /// Creates a new empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an observation document.
    pub async fn insert_observation(&self, observation: ObservationDoc) {
        self.observations.write().await.push(observation);
    }

    /// Inserts a country document.
    pub async fn insert_country(&self, country: CountryDoc) {
        self.countries.write().await.push(country);
    }

    /// Inserts a continent document.
    pub async fn insert_continent(&self, continent: ContinentDoc) {
        self.continents.write().await.push(continent);
    }

    /// Inserts an indicator catalogue entry.
    pub async fn insert_indicator(&self, indicator: IndicatorDoc) {
        self.indicators.write().await.push(indicator);
    }

    /// Returns the total number of observation documents.
    pub async fn observation_count(&self) -> usize {
        self.observations.read().await.len()
    }

    /// Clears every collection.
    pub async fn clear(&self) {
        self.observations.write().await.clear();
        self.countries.write().await.clear();
        self.continents.write().await.clear();
        self.indicators.write().await.clear();
        self.rankings.write().await.clear();
    }

    async fn countries_where<F>(&self, predicate: F) -> Vec<CountryDoc>
    where
        F: Fn(&CountryDoc) -> bool,
    {
        self.countries
            .read()
            .await
            .iter()
            .filter(|country| predicate(country))
            .cloned()
            .collect()
    }
}

/// Rank-ascending order with a deterministic country-code tie-break;
/// unranked observations sort last.
fn rank_order(a: &ObservationDoc, b: &ObservationDoc) -> std::cmp::Ordering {
    let a_rank = a.rank.unwrap_or(i64::MAX);
    let b_rank = b.rank.unwrap_or(i64::MAX);
    a_rank.cmp(&b_rank).then_with(|| a.area.cmp(&b.area))
}

#[async_trait]
impl ObservationRepository for InMemoryCatalogue {
    async fn find_observations(&self, query: &ObservationQuery) -> Result<Vec<ObservationDoc>> {
        let mut observations: Vec<ObservationDoc> = self
            .observations
            .read()
            .await
            .iter()
            .filter(|obs| query.matches(obs))
            .cloned()
            .collect();
        observations.sort_by(rank_order);
        Ok(observations)
    }

    async fn distinct_years(&self) -> Result<Vec<String>> {
        let mut years: Vec<String> = Vec::new();
        for observation in self.observations.read().await.iter() {
            if !years.contains(&observation.year) {
                years.push(observation.year.clone());
            }
        }
        years.sort_by(|a, b| b.cmp(a));
        Ok(years)
    }
}

#[async_trait]
impl AreaRepository for InMemoryCatalogue {
    async fn find_countries_by_iso3(&self, iso3: &str) -> Result<Vec<CountryDoc>> {
        Ok(self.countries_where(|c| c.iso3 == iso3).await)
    }

    async fn find_countries_by_iso2(&self, iso2: &str) -> Result<Vec<CountryDoc>> {
        Ok(self.countries_where(|c| c.iso2.as_deref() == Some(iso2)).await)
    }

    async fn find_countries_by_name(&self, name: &str) -> Result<Vec<CountryDoc>> {
        Ok(self.countries_where(|c| c.name == name).await)
    }

    async fn find_countries_by_continent(&self, continent: &str) -> Result<Vec<CountryDoc>> {
        Ok(self
            .countries_where(|c| c.continent.as_deref() == Some(continent))
            .await)
    }

    async fn find_countries_by_income(&self, income: &str) -> Result<Vec<CountryDoc>> {
        Ok(self.countries_where(|c| c.income.as_deref() == Some(income)).await)
    }

    async fn find_countries(&self) -> Result<Vec<CountryDoc>> {
        let mut countries = self.countries.read().await.clone();
        countries.sort_by(|a, b| a.iso3.cmp(&b.iso3));
        Ok(countries)
    }

    async fn find_continents(&self) -> Result<Vec<ContinentDoc>> {
        let mut continents = self.continents.read().await.clone();
        continents.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(continents)
    }
}

#[async_trait]
impl IndicatorRepository for InMemoryCatalogue {
    async fn indicator_exists(&self, code: &str) -> Result<bool> {
        Ok(self
            .indicators
            .read()
            .await
            .iter()
            .any(|indicator| indicator.code == code))
    }

    async fn find_indicator_by_code(&self, code: &str) -> Result<Option<IndicatorDoc>> {
        Ok(self
            .indicators
            .read()
            .await
            .iter()
            .find(|indicator| indicator.code == code)
            .cloned())
    }
}

#[async_trait]
impl RankingRepository for InMemoryCatalogue {
    async fn find_rankings(&self, year: &str) -> Result<Option<Ranking>> {
        Ok(self
            .rankings
            .read()
            .await
            .get(year)
            .cloned()
            .map(Ranking::sorted_by_rank))
    }

    async fn insert_ranking(&self, ranking: Ranking) -> Result<()> {
        self.rankings
            .write()
            .await
            .insert(ranking.year.clone(), ranking);
        Ok(())
    }
}
