//! The three-level indicator hierarchy: Index → SubIndex → Component.
//!
//! Each level owns the ids of its children; the child aggregates themselves
//! live on their own. Linking an already-linked child is a constraint
//! violation, and a discarded child can never be linked.

use common::AggregateId;
use event_bus::EventBus;
use serde::{Deserialize, Serialize};

use crate::aggregate::{
    Aggregate, EntityCore, EventRecord, create, require_existing, require_new,
};
use crate::error::DomainError;

use super::IndicatorCore;
use super::events::{
    ChildAddedData, ComponentEvent, HierarchyCreatedData, IndexEvent, SubIndexEvent,
};
use super::indicator::Indicator;

/// Index aggregate root: the top of the indicator hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Index {
    core: EntityCore,
    info: IndicatorCore,
    order: Option<i32>,
    colour: Option<String>,
    sub_index_ids: Vec<AggregateId>,
}

impl Aggregate for Index {
    type Event = IndexEvent;

    fn aggregate_type() -> &'static str {
        "Index"
    }

    fn entity(&self) -> &EntityCore {
        &self.core
    }

    fn entity_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn apply(state: Option<Self>, record: &EventRecord<Self::Event>) -> Result<Self, DomainError> {
        match &record.event {
            IndexEvent::Created(data) => {
                require_new::<Self>(&state)?;
                Ok(Index {
                    core: EntityCore::created(record),
                    info: data.info.clone(),
                    order: data.order,
                    colour: data.colour.clone(),
                    sub_index_ids: Vec::new(),
                })
            }
            IndexEvent::Discarded => {
                let mut index = require_existing::<Self>(state, record)?;
                index.core.tombstone();
                index.core.advance();
                Ok(index)
            }
            IndexEvent::SubIndexAdded(data) => {
                let mut index = require_existing::<Self>(state, record)?;
                index.sub_index_ids.push(data.child_id);
                index.core.advance();
                Ok(index)
            }
        }
    }
}

impl Index {
    /// Descriptive identity of the index.
    pub fn info(&self) -> &IndicatorCore {
        &self.info
    }

    /// Display ordering among siblings.
    pub fn order(&self) -> Option<i32> {
        self.order
    }

    /// Display colour for charts.
    pub fn colour(&self) -> Option<&str> {
        self.colour.as_deref()
    }

    /// True if the given subindex has been added to this index.
    pub fn contains(&self, sub_index: &SubIndex) -> bool {
        self.sub_index_ids.contains(&sub_index.id())
    }

    /// Iterator over the ids of the subindexes in this index.
    pub fn sub_index_ids(&self) -> impl Iterator<Item = &AggregateId> {
        self.sub_index_ids.iter()
    }

    /// Discard this index. Discarding twice is an error.
    pub fn discard(&mut self, bus: &EventBus) -> Result<(), DomainError> {
        self.check_not_discarded()?;
        self.emit(bus, IndexEvent::Discarded)
    }

    /// Adds a subindex to this index.
    ///
    /// Fails with a constraint error if the subindex is already added, or a
    /// discarded-entity error if either side is tombstoned.
    pub fn add_sub_index(&mut self, bus: &EventBus, sub_index: &SubIndex) -> Result<(), DomainError> {
        self.check_not_discarded()?;
        if sub_index.discarded() {
            return Err(DomainError::DiscardedEntity {
                aggregate_type: SubIndex::aggregate_type(),
                id: sub_index.id(),
            });
        }
        if self.contains(sub_index) {
            return Err(DomainError::Constraint(format!(
                "SubIndex {} is already added",
                sub_index.info().code
            )));
        }
        self.emit(
            bus,
            IndexEvent::SubIndexAdded(ChildAddedData {
                child_id: sub_index.id(),
            }),
        )
    }
}

/// SubIndex aggregate root: groups components beneath the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubIndex {
    core: EntityCore,
    info: IndicatorCore,
    order: Option<i32>,
    colour: Option<String>,
    component_ids: Vec<AggregateId>,
}

impl Aggregate for SubIndex {
    type Event = SubIndexEvent;

    fn aggregate_type() -> &'static str {
        "SubIndex"
    }

    fn entity(&self) -> &EntityCore {
        &self.core
    }

    fn entity_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn apply(state: Option<Self>, record: &EventRecord<Self::Event>) -> Result<Self, DomainError> {
        match &record.event {
            SubIndexEvent::Created(data) => {
                require_new::<Self>(&state)?;
                Ok(SubIndex {
                    core: EntityCore::created(record),
                    info: data.info.clone(),
                    order: data.order,
                    colour: data.colour.clone(),
                    component_ids: Vec::new(),
                })
            }
            SubIndexEvent::Discarded => {
                let mut sub_index = require_existing::<Self>(state, record)?;
                sub_index.core.tombstone();
                sub_index.core.advance();
                Ok(sub_index)
            }
            SubIndexEvent::ComponentAdded(data) => {
                let mut sub_index = require_existing::<Self>(state, record)?;
                sub_index.component_ids.push(data.child_id);
                sub_index.core.advance();
                Ok(sub_index)
            }
        }
    }
}

impl SubIndex {
    /// Descriptive identity of the subindex.
    pub fn info(&self) -> &IndicatorCore {
        &self.info
    }

    /// Display ordering among siblings.
    pub fn order(&self) -> Option<i32> {
        self.order
    }

    /// Display colour for charts.
    pub fn colour(&self) -> Option<&str> {
        self.colour.as_deref()
    }

    /// True if the given component has been added to this subindex.
    pub fn contains(&self, component: &Component) -> bool {
        self.component_ids.contains(&component.id())
    }

    /// Iterator over the ids of the components in this subindex.
    pub fn component_ids(&self) -> impl Iterator<Item = &AggregateId> {
        self.component_ids.iter()
    }

    /// Discard this subindex. Discarding twice is an error.
    pub fn discard(&mut self, bus: &EventBus) -> Result<(), DomainError> {
        self.check_not_discarded()?;
        self.emit(bus, SubIndexEvent::Discarded)
    }

    /// Adds a component to this subindex.
    pub fn add_component(
        &mut self,
        bus: &EventBus,
        component: &Component,
    ) -> Result<(), DomainError> {
        self.check_not_discarded()?;
        if component.discarded() {
            return Err(DomainError::DiscardedEntity {
                aggregate_type: Component::aggregate_type(),
                id: component.id(),
            });
        }
        if self.contains(component) {
            return Err(DomainError::Constraint(format!(
                "Component {} is already added",
                component.info().code
            )));
        }
        self.emit(
            bus,
            SubIndexEvent::ComponentAdded(ChildAddedData {
                child_id: component.id(),
            }),
        )
    }
}

/// Component aggregate root: groups plain indicators beneath a subindex.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    core: EntityCore,
    info: IndicatorCore,
    order: Option<i32>,
    colour: Option<String>,
    indicator_ids: Vec<AggregateId>,
}

impl Aggregate for Component {
    type Event = ComponentEvent;

    fn aggregate_type() -> &'static str {
        "Component"
    }

    fn entity(&self) -> &EntityCore {
        &self.core
    }

    fn entity_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn apply(state: Option<Self>, record: &EventRecord<Self::Event>) -> Result<Self, DomainError> {
        match &record.event {
            ComponentEvent::Created(data) => {
                require_new::<Self>(&state)?;
                Ok(Component {
                    core: EntityCore::created(record),
                    info: data.info.clone(),
                    order: data.order,
                    colour: data.colour.clone(),
                    indicator_ids: Vec::new(),
                })
            }
            ComponentEvent::Discarded => {
                let mut component = require_existing::<Self>(state, record)?;
                component.core.tombstone();
                component.core.advance();
                Ok(component)
            }
            ComponentEvent::IndicatorAdded(data) => {
                let mut component = require_existing::<Self>(state, record)?;
                component.indicator_ids.push(data.child_id);
                component.core.advance();
                Ok(component)
            }
        }
    }
}

impl Component {
    /// Descriptive identity of the component.
    pub fn info(&self) -> &IndicatorCore {
        &self.info
    }

    /// Display ordering among siblings.
    pub fn order(&self) -> Option<i32> {
        self.order
    }

    /// Display colour for charts.
    pub fn colour(&self) -> Option<&str> {
        self.colour.as_deref()
    }

    /// True if the given indicator has been added to this component.
    pub fn contains(&self, indicator: &Indicator) -> bool {
        self.indicator_ids.contains(&indicator.id())
    }

    /// Iterator over the ids of the indicators in this component.
    pub fn indicator_ids(&self) -> impl Iterator<Item = &AggregateId> {
        self.indicator_ids.iter()
    }

    /// Discard this component. Discarding twice is an error.
    pub fn discard(&mut self, bus: &EventBus) -> Result<(), DomainError> {
        self.check_not_discarded()?;
        self.emit(bus, ComponentEvent::Discarded)
    }

    /// Adds a plain indicator to this component.
    pub fn add_indicator(
        &mut self,
        bus: &EventBus,
        indicator: &Indicator,
    ) -> Result<(), DomainError> {
        self.check_not_discarded()?;
        if indicator.discarded() {
            return Err(DomainError::DiscardedEntity {
                aggregate_type: Indicator::aggregate_type(),
                id: indicator.id(),
            });
        }
        if self.contains(indicator) {
            return Err(DomainError::Constraint(format!(
                "Indicator {} is already added",
                indicator.code()
            )));
        }
        self.emit(
            bus,
            ComponentEvent::IndicatorAdded(ChildAddedData {
                child_id: indicator.id(),
            }),
        )
    }
}

fn validate_info(info: &IndicatorCore, what: &str) -> Result<(), DomainError> {
    if info.name.is_empty() {
        return Err(DomainError::Validation(format!(
            "{what} name cannot be empty"
        )));
    }
    Ok(())
}

/// Creates a new index, emitting and publishing its Created event.
pub fn create_index(
    bus: &EventBus,
    info: IndicatorCore,
    order: Option<i32>,
    colour: Option<String>,
) -> Result<Index, DomainError> {
    validate_info(&info, "Index")?;
    create(
        bus,
        IndexEvent::Created(HierarchyCreatedData { info, order, colour }),
    )
}

/// Creates a new subindex, emitting and publishing its Created event.
pub fn create_sub_index(
    bus: &EventBus,
    info: IndicatorCore,
    order: Option<i32>,
    colour: Option<String>,
) -> Result<SubIndex, DomainError> {
    validate_info(&info, "SubIndex")?;
    create(
        bus,
        SubIndexEvent::Created(HierarchyCreatedData { info, order, colour }),
    )
}

/// Creates a new component, emitting and publishing its Created event.
pub fn create_component(
    bus: &EventBus,
    info: IndicatorCore,
    order: Option<i32>,
    colour: Option<String>,
) -> Result<Component, DomainError> {
    validate_info(&info, "Component")?;
    create(
        bus,
        ComponentEvent::Created(HierarchyCreatedData { info, order, colour }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::IndicatorCode;
    use event_bus::Version;

    fn info(code: &str, name: &str) -> IndicatorCore {
        IndicatorCore {
            code: IndicatorCode::new(code),
            name: name.to_string(),
            comment: None,
            notation: None,
        }
    }

    #[test]
    fn add_sub_index_links_by_id() {
        let bus = EventBus::new();
        let mut index = create_index(&bus, info("INDEX", "The Index"), Some(1), None).unwrap();
        let sub_index = create_sub_index(&bus, info("ACCESS", "Access"), Some(1), None).unwrap();

        index.add_sub_index(&bus, &sub_index).unwrap();
        assert!(index.contains(&sub_index));
        assert_eq!(index.version(), Version::new(2));
        assert_eq!(index.sub_index_ids().count(), 1);
    }

    #[test]
    fn duplicate_sub_index_is_a_constraint_error() {
        let bus = EventBus::new();
        let mut index = create_index(&bus, info("INDEX", "The Index"), None, None).unwrap();
        let sub_index = create_sub_index(&bus, info("ACCESS", "Access"), None, None).unwrap();

        index.add_sub_index(&bus, &sub_index).unwrap();
        let result = index.add_sub_index(&bus, &sub_index);
        assert!(matches!(result, Err(DomainError::Constraint(_))));
    }

    #[test]
    fn discarded_sub_index_cannot_be_added() {
        let bus = EventBus::new();
        let mut index = create_index(&bus, info("INDEX", "The Index"), None, None).unwrap();
        let mut sub_index = create_sub_index(&bus, info("ACCESS", "Access"), None, None).unwrap();
        sub_index.discard(&bus).unwrap();

        let result = index.add_sub_index(&bus, &sub_index);
        assert!(matches!(result, Err(DomainError::DiscardedEntity { .. })));
    }

    #[test]
    fn component_links_indicators() {
        let bus = EventBus::new();
        let mut component =
            create_component(&bus, info("COMMS", "Communications"), None, None).unwrap();
        let indicator = super::super::indicator::create_indicator(
            &bus,
            info("ITU_A", "Internet users"),
            super::super::indicator::IndicatorLevel::Primary,
            Some(IndicatorCode::new("COMMS")),
        )
        .unwrap();

        component.add_indicator(&bus, &indicator).unwrap();
        assert!(component.contains(&indicator));

        let result = component.add_indicator(&bus, &indicator);
        assert!(matches!(result, Err(DomainError::Constraint(_))));
    }

    #[test]
    fn sub_index_add_component_after_discard_fails() {
        let bus = EventBus::new();
        let mut sub_index = create_sub_index(&bus, info("ACCESS", "Access"), None, None).unwrap();
        let component =
            create_component(&bus, info("COMMS", "Communications"), None, None).unwrap();
        sub_index.discard(&bus).unwrap();

        let result = sub_index.add_component(&bus, &component);
        assert!(matches!(result, Err(DomainError::DiscardedEntity { .. })));
    }
}
