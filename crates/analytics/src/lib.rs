//! Observation analytics for the indicator statistics catalogue.
//!
//! The read side of the system:
//! - [`Statistics`] — mean/median summaries with area-type bucketing
//! - [`RankingBuilder`] — materialized per-year ranking documents
//! - [`VisualizationSelector`] — bounded, rank-spanning comparison views
//! - [`ObservationQueryEngine`] — filter composition over the storage
//!   collaborator's boundary traits
//!
//! Everything here is a pure transformation over already-fetched
//! collections; the only async surface is the repository boundary.

pub mod doc;
pub mod error;
pub mod memory;
pub mod query;
pub mod ranking;
pub mod repository;
pub mod statistics;
pub mod view;
pub mod visualization;
pub mod year;

pub use doc::{ContinentDoc, CountryDoc, IndicatorDoc, ObservationDoc, round2};
pub use error::{AnalyticsError, Result};
pub use memory::InMemoryCatalogue;
pub use query::{ObservationQuery, ObservationQueryEngine, ResolvedAreas};
pub use ranking::{IndicatorRef, RANKING_GROUP_SIZE, Ranking, RankingBuilder, RankingValue};
pub use repository::{
    AreaRepository, CatalogueRepository, IndicatorRepository, ObservationRepository,
    RankingRepository,
};
pub use statistics::{DEVELOPING, EMERGING, Statistics};
pub use view::{AreaGroupedView, ComparisonView, Visualisation};
pub use visualization::{MAX_BARS, VisualizationSelector, resolve_region, select_bars};
