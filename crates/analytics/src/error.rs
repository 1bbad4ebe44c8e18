//! Analytics error types.

use thiserror::Error;

/// Errors that can occur while composing queries or building derived views.
///
/// Repository errors carry the storage collaborator's message and propagate
/// unmodified to the caller; there is no retry or recovery anywhere in this
/// layer.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// An area code failed to resolve against the area catalogue.
    #[error("Area error: {0}")]
    AreaRepository(String),

    /// An indicator code does not exist in the indicator catalogue.
    #[error("Indicator error: {0}")]
    IndicatorRepository(String),

    /// The observation store failed to answer a query.
    #[error("Observation error: {0}")]
    ObservationRepository(String),

    /// A ranking group did not contain exactly one record per ranked
    /// indicator.
    #[error("ranking group has {actual} observations, expected {expected}")]
    RankingGroupSize { expected: usize, actual: usize },

    /// No INDEX record with a precomputed rank was present in a ranking
    /// group. There is no fallback rank computation here.
    #[error("no INDEX rank found for {area} while building a ranking")]
    MissingIndexRank { area: String },

    /// A ranking group record carried neither a scored nor a raw value for
    /// one of the ranked indicators.
    #[error("no scored value of {indicator} for {area} while building a ranking")]
    MissingScore { indicator: String, area: String },

    /// A ranking build was attempted with no groups at all.
    #[error("cannot build a ranking from an empty list of groups")]
    EmptyRankingInput,
}

/// Result type for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;
