//! Plain indicator aggregate (primary/secondary catalogue leaf).

use common::IndicatorCode;
use event_bus::EventBus;
use serde::{Deserialize, Serialize};

use crate::aggregate::{
    Aggregate, EntityCore, EventRecord, create, require_existing, require_new,
};
use crate::error::DomainError;

use super::IndicatorCore;
use super::events::{IndicatorCreatedData, IndicatorEvent, OrganizationAddedData};

/// Catalogue level of a plain indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndicatorLevel {
    /// Directly measured indicator.
    Primary,

    /// Indicator derived from primary sources.
    Secondary,
}

/// Indicator aggregate root.
///
/// Sits beneath a component (or subindex) in the catalogue; the link to its
/// parent is a code string, not an object reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Indicator {
    core: EntityCore,
    info: IndicatorCore,
    level: IndicatorLevel,
    parent: Option<IndicatorCode>,
    provider_link: Option<String>,
    republish: bool,
    organization: Option<String>,
}

impl Aggregate for Indicator {
    type Event = IndicatorEvent;

    fn aggregate_type() -> &'static str {
        "Indicator"
    }

    fn entity(&self) -> &EntityCore {
        &self.core
    }

    fn entity_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn apply(state: Option<Self>, record: &EventRecord<Self::Event>) -> Result<Self, DomainError> {
        match &record.event {
            IndicatorEvent::Created(data) => {
                require_new::<Self>(&state)?;
                Ok(Indicator {
                    core: EntityCore::created(record),
                    info: data.info.clone(),
                    level: data.level,
                    parent: data.parent.clone(),
                    provider_link: data.provider_link.clone(),
                    republish: data.republish,
                    organization: None,
                })
            }
            IndicatorEvent::Discarded => {
                let mut indicator = require_existing::<Self>(state, record)?;
                indicator.core.tombstone();
                indicator.core.advance();
                Ok(indicator)
            }
            IndicatorEvent::OrganizationAdded(data) => {
                let mut indicator = require_existing::<Self>(state, record)?;
                indicator.organization = Some(data.organization.clone());
                indicator.core.advance();
                Ok(indicator)
            }
        }
    }
}

impl Indicator {
    /// Descriptive identity of the indicator.
    pub fn info(&self) -> &IndicatorCore {
        &self.info
    }

    /// Normalized indicator code.
    pub fn code(&self) -> &IndicatorCode {
        &self.info.code
    }

    /// Catalogue level (primary or secondary).
    pub fn level(&self) -> IndicatorLevel {
        self.level
    }

    /// Code of the parent catalogue node, when linked.
    pub fn parent(&self) -> Option<&IndicatorCode> {
        self.parent.as_ref()
    }

    /// Link to the data provider's page for the indicator.
    pub fn provider_link(&self) -> Option<&str> {
        self.provider_link.as_deref()
    }

    /// Whether the provider allows republishing the values.
    pub fn republish(&self) -> bool {
        self.republish
    }

    /// Providing organization, once attached.
    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    /// Discard this indicator. Discarding twice is an error.
    pub fn discard(&mut self, bus: &EventBus) -> Result<(), DomainError> {
        self.check_not_discarded()?;
        self.emit(bus, IndicatorEvent::Discarded)
    }

    /// Attaches the providing organization.
    pub fn add_organization(
        &mut self,
        bus: &EventBus,
        organization: impl Into<String>,
    ) -> Result<(), DomainError> {
        self.check_not_discarded()?;
        let organization = organization.into();
        if organization.is_empty() {
            return Err(DomainError::Validation(
                "Indicator organization cannot be empty".to_string(),
            ));
        }
        self.emit(
            bus,
            IndicatorEvent::OrganizationAdded(OrganizationAddedData { organization }),
        )
    }
}

/// Creates a new plain indicator, emitting and publishing its Created event.
pub fn create_indicator(
    bus: &EventBus,
    info: IndicatorCore,
    level: IndicatorLevel,
    parent: Option<IndicatorCode>,
) -> Result<Indicator, DomainError> {
    if info.name.is_empty() {
        return Err(DomainError::Validation(
            "Indicator name cannot be empty".to_string(),
        ));
    }
    if info.code.as_str().is_empty() {
        return Err(DomainError::Validation(
            "Indicator code cannot be empty".to_string(),
        ));
    }
    create(
        bus,
        IndicatorEvent::Created(IndicatorCreatedData {
            info,
            level,
            parent,
            provider_link: None,
            republish: true,
        }),
    )
}
