//! Repository boundary traits for the storage collaborator.
//!
//! These traits are consumed, not implemented, by the analytics engine; the
//! real document store lives outside this workspace. The in-memory
//! catalogue ([`crate::InMemoryCatalogue`]) implements all of them for
//! tests and benches.

use async_trait::async_trait;

use crate::doc::{ContinentDoc, CountryDoc, IndicatorDoc, ObservationDoc};
use crate::error::Result;
use crate::query::ObservationQuery;
use crate::ranking::Ranking;

/// Query access to the observation store.
#[async_trait]
pub trait ObservationRepository: Send + Sync {
    /// Returns the observations matching a composed query, sorted ascending
    /// by their precomputed rank.
    async fn find_observations(&self, query: &ObservationQuery) -> Result<Vec<ObservationDoc>>;

    /// Returns the distinct years any observation exists for, most recent
    /// first.
    async fn distinct_years(&self) -> Result<Vec<String>>;
}

/// Query access to the area catalogue.
///
/// The `find_countries_by_*` methods back the area resolution order of the
/// query engine: iso3, then iso2, then name, then continent, then income.
#[async_trait]
pub trait AreaRepository: Send + Sync {
    /// Countries matching an ISO alpha-3 code.
    async fn find_countries_by_iso3(&self, iso3: &str) -> Result<Vec<CountryDoc>>;

    /// Countries matching an ISO alpha-2 code.
    async fn find_countries_by_iso2(&self, iso2: &str) -> Result<Vec<CountryDoc>>;

    /// Countries matching a full name.
    async fn find_countries_by_name(&self, name: &str) -> Result<Vec<CountryDoc>>;

    /// Countries belonging to a continent code.
    async fn find_countries_by_continent(&self, continent: &str) -> Result<Vec<CountryDoc>>;

    /// Countries in an income group.
    async fn find_countries_by_income(&self, income: &str) -> Result<Vec<CountryDoc>>;

    /// All countries, ordered by iso3.
    async fn find_countries(&self) -> Result<Vec<CountryDoc>>;

    /// All continents, ordered by name.
    async fn find_continents(&self) -> Result<Vec<ContinentDoc>>;
}

/// Query access to the indicator catalogue.
#[async_trait]
pub trait IndicatorRepository: Send + Sync {
    /// True if an indicator with the given normalized code exists.
    async fn indicator_exists(&self, code: &str) -> Result<bool>;

    /// The indicator with the given normalized code, when one exists.
    async fn find_indicator_by_code(&self, code: &str) -> Result<Option<IndicatorDoc>>;
}

/// Read/write access to the materialized ranking documents.
#[async_trait]
pub trait RankingRepository: Send + Sync {
    /// The ranking document of a year, rows sorted by rank, when one has
    /// been built.
    async fn find_rankings(&self, year: &str) -> Result<Option<Ranking>>;

    /// Stores a ranking document, replacing any previous document for the
    /// same year.
    async fn insert_ranking(&self, ranking: Ranking) -> Result<()>;
}

/// The full storage collaborator surface the analytics services consume.
pub trait CatalogueRepository:
    ObservationRepository + AreaRepository + IndicatorRepository + RankingRepository
{
}

impl<T> CatalogueRepository for T where
    T: ObservationRepository + AreaRepository + IndicatorRepository + RankingRepository
{
}
