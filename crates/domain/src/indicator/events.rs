//! Indicator catalogue events.

use common::{AggregateId, IndicatorCode};
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;

use super::IndicatorCore;
use super::indicator::IndicatorLevel;

/// Data shared by the Created events of all three hierarchy levels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyCreatedData {
    /// Descriptive identity of the node.
    pub info: IndicatorCore,

    /// Display ordering among siblings.
    pub order: Option<i32>,

    /// Display colour for charts.
    pub colour: Option<String>,
}

/// Data for child-membership events (SubIndexAdded and friends).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildAddedData {
    /// Id of the child aggregate being linked.
    pub child_id: AggregateId,
}

/// Events that can occur on an index aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum IndexEvent {
    /// Index was created.
    Created(HierarchyCreatedData),

    /// Index was discarded.
    Discarded,

    /// A subindex was added to the index.
    SubIndexAdded(ChildAddedData),
}

impl DomainEvent for IndexEvent {
    fn event_type(&self) -> &'static str {
        match self {
            IndexEvent::Created(_) => "IndexCreated",
            IndexEvent::Discarded => "IndexDiscarded",
            IndexEvent::SubIndexAdded(_) => "SubIndexAdded",
        }
    }
}

/// Events that can occur on a subindex aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SubIndexEvent {
    /// SubIndex was created.
    Created(HierarchyCreatedData),

    /// SubIndex was discarded.
    Discarded,

    /// A component was added to the subindex.
    ComponentAdded(ChildAddedData),
}

impl DomainEvent for SubIndexEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SubIndexEvent::Created(_) => "SubIndexCreated",
            SubIndexEvent::Discarded => "SubIndexDiscarded",
            SubIndexEvent::ComponentAdded(_) => "ComponentAdded",
        }
    }
}

/// Events that can occur on a component aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ComponentEvent {
    /// Component was created.
    Created(HierarchyCreatedData),

    /// Component was discarded.
    Discarded,

    /// An indicator was added to the component.
    IndicatorAdded(ChildAddedData),
}

impl DomainEvent for ComponentEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ComponentEvent::Created(_) => "ComponentCreated",
            ComponentEvent::Discarded => "ComponentDiscarded",
            ComponentEvent::IndicatorAdded(_) => "IndicatorAdded",
        }
    }
}

/// Events that can occur on a plain indicator aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum IndicatorEvent {
    /// Indicator was created.
    Created(IndicatorCreatedData),

    /// Indicator was discarded.
    Discarded,

    /// A providing organization was attached.
    OrganizationAdded(OrganizationAddedData),
}

impl DomainEvent for IndicatorEvent {
    fn event_type(&self) -> &'static str {
        match self {
            IndicatorEvent::Created(_) => "IndicatorCreated",
            IndicatorEvent::Discarded => "IndicatorDiscarded",
            IndicatorEvent::OrganizationAdded(_) => "OrganizationAdded",
        }
    }
}

/// Data for the IndicatorCreated event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorCreatedData {
    /// Descriptive identity of the indicator.
    pub info: IndicatorCore,

    /// Primary or secondary.
    pub level: IndicatorLevel,

    /// Code of the parent component or subindex. A name-keyed weak
    /// reference, never ownership.
    pub parent: Option<IndicatorCode>,

    /// Link to the data provider's page for the indicator.
    pub provider_link: Option<String>,

    /// Whether the provider allows republishing the values.
    pub republish: bool,
}

/// Data for the OrganizationAdded event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationAddedData {
    /// Name of the providing organization.
    pub organization: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_names() {
        let data = HierarchyCreatedData {
            info: IndicatorCore {
                code: IndicatorCode::new("index"),
                name: "The Index".to_string(),
                comment: None,
                notation: None,
            },
            order: Some(1),
            colour: Some("#005577".to_string()),
        };
        assert_eq!(IndexEvent::Created(data.clone()).event_type(), "IndexCreated");
        assert_eq!(
            SubIndexEvent::Created(data.clone()).event_type(),
            "SubIndexCreated"
        );
        assert_eq!(
            ComponentEvent::Created(data).event_type(),
            "ComponentCreated"
        );
        assert_eq!(
            IndexEvent::SubIndexAdded(ChildAddedData {
                child_id: AggregateId::new()
            })
            .event_type(),
            "SubIndexAdded"
        );
    }

    #[test]
    fn indicator_created_roundtrip() {
        let event = IndicatorEvent::Created(IndicatorCreatedData {
            info: IndicatorCore {
                code: IndicatorCode::new("Broadband subscribers"),
                name: "Broadband subscribers".to_string(),
                comment: None,
                notation: None,
            },
            level: IndicatorLevel::Primary,
            parent: Some(IndicatorCode::new("Communications Infrastructure")),
            provider_link: None,
            republish: true,
        });

        let json = serde_json::to_string(&event).unwrap();
        let back: IndicatorEvent = serde_json::from_str(&json).unwrap();
        match back {
            IndicatorEvent::Created(data) => {
                assert_eq!(data.info.code.as_str(), "BROADBAND_SUBSCRIBERS");
                assert_eq!(
                    data.parent.unwrap().as_str(),
                    "COMMUNICATIONS_INFRASTRUCTURE"
                );
            }
            other => panic!("expected Created, got {other:?}"),
        }
    }
}
