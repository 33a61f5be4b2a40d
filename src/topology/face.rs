use super::wire::WireId;

slotmap::new_key_type! {
    /// Unique identifier for a face record in the topology store.
    pub struct FaceId;
}

/// Data associated with one bounded face of a solid.
///
/// A face owns an ordered list of closed wires. Exactly one of them bounds
/// the face from outside; the rest are hole loops. Which one is the outer
/// boundary is not known until classification runs.
#[derive(Debug, Clone, Default)]
pub struct FaceRecord {
    /// The face's wires, in kernel order.
    pub wires: Vec<WireId>,
}
