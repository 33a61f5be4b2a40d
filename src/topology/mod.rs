pub mod face;
pub mod solid;
pub mod wire;

pub use face::{FaceId, FaceRecord};
pub use solid::{SolidId, SolidRecord};
pub use wire::{WireId, WireRecord};

use crate::error::TopologyError;
use slotmap::SlotMap;

/// Central arena holding the topology records the geometry kernel reported
/// for a quoting request.
///
/// Records reference each other via typed IDs (generational indices) and are
/// immutable once inserted; the feature-recognition pipeline only reads from
/// the store.
#[derive(Debug, Default)]
pub struct TopologyStore {
    wires: SlotMap<WireId, WireRecord>,
    faces: SlotMap<FaceId, FaceRecord>,
    solids: SlotMap<SolidId, SolidRecord>,
}

impl TopologyStore {
    /// Creates a new, empty topology store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a wire record and returns its ID.
    pub fn add_wire(&mut self, record: WireRecord) -> WireId {
        self.wires.insert(record)
    }

    /// Returns a reference to the wire record, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn wire(&self, id: WireId) -> Result<&WireRecord, TopologyError> {
        self.wires
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("wire".into()))
    }

    /// Inserts a face record and returns its ID.
    pub fn add_face(&mut self, record: FaceRecord) -> FaceId {
        self.faces.insert(record)
    }

    /// Returns a reference to the face record, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn face(&self, id: FaceId) -> Result<&FaceRecord, TopologyError> {
        self.faces
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()))
    }

    /// Inserts a solid record and returns its ID.
    pub fn add_solid(&mut self, record: SolidRecord) -> SolidId {
        self.solids.insert(record)
    }

    /// Returns a reference to the solid record, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn solid(&self, id: SolidId) -> Result<&SolidRecord, TopologyError> {
        self.solids
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("solid".into()))
    }
}
