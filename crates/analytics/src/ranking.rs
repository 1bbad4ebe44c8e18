//! Per-year ranking document and its batch builder.

use std::collections::BTreeMap;

use common::INDEX_CODE;
use serde::{Deserialize, Serialize};

use crate::doc::{ObservationDoc, round2};
use crate::error::{AnalyticsError, Result};

/// Number of records a ranking group must hold: the INDEX indicator plus
/// its four subindexes.
pub const RANKING_GROUP_SIZE: usize = 5;

/// Code/name reference to one ranked indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorRef {
    /// Normalized indicator code.
    pub code: String,

    /// Display name.
    pub name: String,
}

/// One country row of a ranking document.
///
/// Serializes with one extra `<indicator_code>: number` field per ranked
/// indicator, flattened next to the fixed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingValue {
    /// ISO alpha-3 code of the country.
    pub area: String,

    /// Name of the country.
    pub name: String,

    /// Precomputed INDEX rank; lower is better.
    pub rank: i64,

    /// Score per indicator code, rounded to 2 decimals.
    #[serde(flatten)]
    pub scores: BTreeMap<String, f64>,
}

/// Materialized per-year ranking document.
///
/// A read-optimized artifact rebuilt wholesale: re-running the builder on
/// the same input replaces the document, nothing is patched incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    /// The year the ranking covers.
    pub year: String,

    /// The ranked indicators, in the order the first group carried them.
    pub indicators: Vec<IndicatorRef>,

    /// One row per country group.
    pub values: Vec<RankingValue>,
}

impl Ranking {
    /// Returns the document with its rows sorted by rank ascending, the
    /// order readers expect.
    pub fn sorted_by_rank(mut self) -> Self {
        self.values.sort_by(|a, b| a.rank.cmp(&b.rank));
        self
    }
}

/// Builds ranking documents from grouped per-country observations.
///
/// Callers assemble a full year's groups — each exactly
/// [`RANKING_GROUP_SIZE`] records for one country — and call
/// [`RankingBuilder::build`] once. The build is idempotent for a given
/// input.
#[derive(Debug, Default)]
pub struct RankingBuilder;

impl RankingBuilder {
    /// Builds the ranking document for one year of grouped observations.
    pub fn build(groups: &[Vec<ObservationDoc>]) -> Result<Ranking> {
        let first_group = groups.first().ok_or(AnalyticsError::EmptyRankingInput)?;
        let indicators = Self::indicator_refs(first_group)?;

        let year = first_group
            .first()
            .map(|record| record.year.clone())
            .unwrap_or_default();

        let values = groups
            .iter()
            .map(|group| Self::value_for_group(group, &indicators))
            .collect::<Result<Vec<_>>>()?;

        Ok(Ranking {
            year,
            indicators,
            values,
        })
    }

    /// Takes the indicator list from a group, preserving its input order.
    fn indicator_refs(group: &[ObservationDoc]) -> Result<Vec<IndicatorRef>> {
        Self::check_group_size(group)?;
        Ok(group
            .iter()
            .map(|record| IndicatorRef {
                code: record.indicator.clone(),
                name: record.indicator_name.clone(),
            })
            .collect())
    }

    /// Builds one country row out of a group.
    fn value_for_group(
        group: &[ObservationDoc],
        indicators: &[IndicatorRef],
    ) -> Result<RankingValue> {
        Self::check_group_size(group)?;
        let Some(head) = group.first() else {
            return Err(AnalyticsError::RankingGroupSize {
                expected: RANKING_GROUP_SIZE,
                actual: 0,
            });
        };

        let rank = Self::index_rank(group, &head.area_name)?;

        let mut scores = BTreeMap::new();
        for indicator in indicators {
            let score = Self::score_of(group, &indicator.code, &head.area_name)?;
            scores.insert(indicator.code.clone(), round2(score));
        }

        Ok(RankingValue {
            area: head.area.clone(),
            name: head.area_name.clone(),
            rank,
            scores,
        })
    }

    /// Reads the precomputed rank off the group's INDEX record.
    ///
    /// The rank must already exist upstream; there is no fallback
    /// computation here.
    fn index_rank(group: &[ObservationDoc], area_name: &str) -> Result<i64> {
        group
            .iter()
            .find(|record| record.indicator == INDEX_CODE)
            .and_then(|record| record.rank)
            .ok_or_else(|| AnalyticsError::MissingIndexRank {
                area: area_name.to_string(),
            })
    }

    /// The score of one indicator within a group: the scored field when
    /// present, the raw value otherwise.
    fn score_of(group: &[ObservationDoc], indicator_code: &str, area_name: &str) -> Result<f64> {
        group
            .iter()
            .find(|record| record.indicator == indicator_code)
            .and_then(|record| record.scored.or(record.value))
            .ok_or_else(|| AnalyticsError::MissingScore {
                indicator: indicator_code.to_string(),
                area: area_name.to_string(),
            })
    }

    fn check_group_size(group: &[ObservationDoc]) -> Result<()> {
        if group.len() != RANKING_GROUP_SIZE {
            return Err(AnalyticsError::RankingGroupSize {
                expected: RANKING_GROUP_SIZE,
                actual: group.len(),
            });
        }
        Ok(())
    }
}
