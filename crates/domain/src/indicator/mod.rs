//! Indicator catalogue: the Index → SubIndex → Component hierarchy and the
//! primary/secondary indicators beneath it.

pub mod events;
pub mod hierarchy;
pub mod indicator;

use common::IndicatorCode;
use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregate;

pub use events::{
    ComponentEvent, HierarchyCreatedData, IndexEvent, IndicatorEvent, SubIndexEvent,
};
pub use hierarchy::{Component, Index, SubIndex, create_component, create_index, create_sub_index};
pub use indicator::{Indicator, IndicatorLevel, create_indicator};

/// Descriptive identity shared by every node of the indicator catalogue.
///
/// Embedded by composition in indicators and in each hierarchy level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorCore {
    /// Normalized indicator code.
    pub code: IndicatorCode,

    /// Human-readable name.
    pub name: String,

    /// Free-form description.
    pub comment: Option<String>,

    /// Short notation used in exports.
    pub notation: Option<String>,
}

/// Marker for aggregates an observation may reference as its indicator.
pub trait IndicatorAggregate: Aggregate {}

impl IndicatorAggregate for Indicator {}
impl IndicatorAggregate for Index {}
impl IndicatorAggregate for SubIndex {}
impl IndicatorAggregate for Component {}
