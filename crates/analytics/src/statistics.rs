//! Summary statistics over a set of observations.

use serde::{Deserialize, Serialize};

use crate::doc::ObservationDoc;

/// Area-type bucket for developing economies.
pub const DEVELOPING: &str = "Developing";

/// Area-type bucket for emerging economies.
pub const EMERGING: &str = "Emerging";

/// Mean/median summary of a set of observations, with area-type bucketing.
///
/// Observations with an unknown value never contribute to any statistic —
/// absence is not zero, and coercing it would shift every mean. A purely
/// derived view over its input: safe to reconstruct per request, no side
/// effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Arithmetic mean of known values; 0 for an empty set.
    pub average: f64,

    /// Median of known values; 0 for an empty set.
    pub median: f64,

    /// Mean over the "Developing" bucket.
    pub average_developing: f64,

    /// Median over the "Developing" bucket.
    pub median_developing: f64,

    /// Mean over the "Emerging" bucket.
    pub average_emerging: f64,

    /// Median over the "Emerging" bucket.
    pub median_emerging: f64,

    /// Largest known value; `None` on an empty set — callers must guard.
    pub max: Option<f64>,

    /// Smallest known value; `None` on an empty set — callers must guard.
    pub min: Option<f64>,
}

impl Statistics {
    /// Computes the statistics for a set of observations.
    pub fn from_observations(observations: &[ObservationDoc]) -> Self {
        let values = known_values(observations);
        let developing = known_values_of_type(observations, DEVELOPING);
        let emerging = known_values_of_type(observations, EMERGING);

        Statistics {
            average: mean(&values),
            median: median(values.clone()),
            average_developing: mean(&developing),
            median_developing: median(developing),
            average_emerging: mean(&emerging),
            median_emerging: median(emerging),
            max: values.iter().copied().reduce(f64::max),
            min: values.iter().copied().reduce(f64::min),
        }
    }
}

/// Known values of the observations, unknown sentinels filtered out.
fn known_values(observations: &[ObservationDoc]) -> Vec<f64> {
    observations.iter().filter_map(|obs| obs.value).collect()
}

/// Known values restricted to one area-type bucket.
fn known_values_of_type(observations: &[ObservationDoc], area_type: &str) -> Vec<f64> {
    observations
        .iter()
        .filter(|obs| obs.area_type.as_deref() == Some(area_type))
        .filter_map(|obs| obs.value)
        .collect()
}

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median; 0 for an empty vector. The even case averages the two central
/// elements.
pub fn median(mut values: Vec<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    let half = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[half - 1] + values[half]) / 2.0
    } else {
        values[half]
    }
}
