//! DataSet aggregate: a published collection of slices.

use common::AggregateId;
use event_bus::EventBus;
use serde::{Deserialize, Serialize};

use crate::aggregate::{
    Aggregate, DomainEvent, EntityCore, EventRecord, create, require_existing, require_new,
};
use crate::error::DomainError;
use crate::slice::Slice;

/// Events that can occur on a dataset aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum DataSetEvent {
    /// DataSet was created.
    Created(DataSetCreatedData),

    /// DataSet was discarded.
    Discarded,

    /// A slice was added to the dataset.
    SliceAdded(SliceAddedData),
}

impl DomainEvent for DataSetEvent {
    fn event_type(&self) -> &'static str {
        match self {
            DataSetEvent::Created(_) => "DataSetCreated",
            DataSetEvent::Discarded => "DataSetDiscarded",
            DataSetEvent::SliceAdded(_) => "SliceAdded",
        }
    }
}

/// Data for the DataSetCreated event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSetCreatedData {
    /// Title of the dataset.
    pub title: String,

    /// Reference to the data structure definition.
    pub structure: Option<String>,

    /// Contributing organization.
    pub contributor: Option<String>,

    /// Unit the values are measured in.
    pub unit_measure: Option<String>,

    /// Free-form description.
    pub comment: Option<String>,

    /// Publishing organization.
    pub publisher: Option<String>,

    /// Subject classification.
    pub subject: Option<String>,
}

/// Data for the SliceAdded event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliceAddedData {
    /// Id of the slice joining the dataset.
    pub slice_id: AggregateId,
}

/// DataSet aggregate root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSet {
    core: EntityCore,
    title: String,
    structure: Option<String>,
    contributor: Option<String>,
    unit_measure: Option<String>,
    comment: Option<String>,
    publisher: Option<String>,
    subject: Option<String>,
    slice_ids: Vec<AggregateId>,
}

impl Aggregate for DataSet {
    type Event = DataSetEvent;

    fn aggregate_type() -> &'static str {
        "DataSet"
    }

    fn entity(&self) -> &EntityCore {
        &self.core
    }

    fn entity_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn apply(state: Option<Self>, record: &EventRecord<Self::Event>) -> Result<Self, DomainError> {
        match &record.event {
            DataSetEvent::Created(data) => {
                require_new::<Self>(&state)?;
                Ok(DataSet {
                    core: EntityCore::created(record),
                    title: data.title.clone(),
                    structure: data.structure.clone(),
                    contributor: data.contributor.clone(),
                    unit_measure: data.unit_measure.clone(),
                    comment: data.comment.clone(),
                    publisher: data.publisher.clone(),
                    subject: data.subject.clone(),
                    slice_ids: Vec::new(),
                })
            }
            DataSetEvent::Discarded => {
                let mut data_set = require_existing::<Self>(state, record)?;
                data_set.core.tombstone();
                data_set.core.advance();
                Ok(data_set)
            }
            DataSetEvent::SliceAdded(data) => {
                let mut data_set = require_existing::<Self>(state, record)?;
                data_set.slice_ids.push(data.slice_id);
                data_set.core.advance();
                Ok(data_set)
            }
        }
    }
}

impl DataSet {
    /// Title of the dataset.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Publishing organization.
    pub fn publisher(&self) -> Option<&str> {
        self.publisher.as_deref()
    }

    /// True if the given slice has been added to this dataset.
    pub fn contains(&self, slice: &Slice) -> bool {
        self.slice_ids.contains(&slice.id())
    }

    /// Iterator over the ids of the slices in this dataset.
    pub fn slice_ids(&self) -> impl Iterator<Item = &AggregateId> {
        self.slice_ids.iter()
    }

    /// Discard this dataset. Discarding twice is an error.
    pub fn discard(&mut self, bus: &EventBus) -> Result<(), DomainError> {
        self.check_not_discarded()?;
        self.emit(bus, DataSetEvent::Discarded)
    }

    /// Adds a slice to this dataset.
    ///
    /// Fails with a constraint error if the slice is already present, or a
    /// discarded-entity error if either side is tombstoned.
    pub fn add_slice(&mut self, bus: &EventBus, slice: &Slice) -> Result<(), DomainError> {
        self.check_not_discarded()?;
        if slice.discarded() {
            return Err(DomainError::DiscardedEntity {
                aggregate_type: Slice::aggregate_type(),
                id: slice.id(),
            });
        }
        if self.contains(slice) {
            return Err(DomainError::Constraint(format!(
                "Slice {} is already added",
                slice.id()
            )));
        }
        self.emit(
            bus,
            DataSetEvent::SliceAdded(SliceAddedData { slice_id: slice.id() }),
        )
    }
}

/// Creates a new dataset, emitting and publishing its Created event.
pub fn create_data_set(bus: &EventBus, data: DataSetCreatedData) -> Result<DataSet, DomainError> {
    if data.title.is_empty() {
        return Err(DomainError::Validation(
            "DataSet title cannot be empty".to_string(),
        ));
    }
    create(bus, DataSetEvent::Created(data))
}
