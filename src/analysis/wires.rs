use crate::error::Result;
use crate::math::bbox::Aabb;
use crate::topology::{FaceRecord, TopologyStore, WireId};

/// Slack applied per axis when testing whether one wire's bounding box
/// encloses another's, in inches.
pub const CONTAINMENT_TOLERANCE: f64 = 0.001;

/// Partition of a face's wires into the outer boundary and hole loops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WirePartition {
    /// The wire bounding the face from outside.
    pub outer: WireId,
    /// All remaining wires, in face order. Each is a hole candidate.
    pub holes: Vec<WireId>,
}

struct Candidate {
    id: WireId,
    area: f64,
    bbox: Aabb,
    contains_all: bool,
    contained_count: usize,
}

/// Identifies which of a face's wires is the outer boundary.
///
/// Raw area alone is not a reliable signal, so strategies apply in order:
///
/// 1. wires whose bounding box encloses every other wire's (within
///    [`CONTAINMENT_TOLERANCE`] per axis); the largest-area one wins;
/// 2. otherwise the wire enclosing the most others, largest area breaking
///    ties;
/// 3. otherwise the largest-area wire.
///
/// Returns `None` for a face with no wires.
///
/// # Errors
///
/// Returns an error if a referenced wire record is missing from the store.
pub fn partition_face_wires(
    face: &FaceRecord,
    store: &TopologyStore,
) -> Result<Option<WirePartition>> {
    if face.wires.len() == 1 {
        return Ok(Some(WirePartition {
            outer: face.wires[0],
            holes: Vec::new(),
        }));
    }
    partition_multi(face, store)
}

fn partition_multi(face: &FaceRecord, store: &TopologyStore) -> Result<Option<WirePartition>> {
    let mut candidates = Vec::with_capacity(face.wires.len());
    for &id in &face.wires {
        let wire = store.wire(id)?;
        candidates.push(Candidate {
            id,
            area: wire.area(),
            bbox: wire.bbox,
            contains_all: true,
            contained_count: 0,
        });
    }

    let bboxes: Vec<Aabb> = candidates.iter().map(|c| c.bbox).collect();
    for (i, candidate) in candidates.iter_mut().enumerate() {
        for (j, other) in bboxes.iter().enumerate() {
            if i == j {
                continue;
            }
            if candidate.bbox.contains_within(other, CONTAINMENT_TOLERANCE) {
                candidate.contained_count += 1;
            } else {
                candidate.contains_all = false;
            }
        }
    }

    let outer = select_outer(&candidates);
    Ok(outer.map(|outer| WirePartition {
        outer,
        holes: face
            .wires
            .iter()
            .copied()
            .filter(|&id| id != outer)
            .collect(),
    }))
}

fn select_outer(candidates: &[Candidate]) -> Option<WireId> {
    if let Some(id) = largest_by_area(candidates.iter().filter(|c| c.contains_all)) {
        tracing::debug!(?id, "outer wire encloses all other wires");
        return Some(id);
    }

    let best_count = candidates.iter().map(|c| c.contained_count).max()?;
    if best_count > 0 {
        let id = largest_by_area(candidates.iter().filter(|c| c.contained_count == best_count));
        tracing::debug!(?id, best_count, "outer wire selected by containment count");
        return id;
    }

    let id = largest_by_area(candidates.iter());
    tracing::debug!(?id, "no containment signal; outer wire selected by area");
    id
}

fn largest_by_area<'a, I>(candidates: I) -> Option<WireId>
where
    I: Iterator<Item = &'a Candidate>,
{
    candidates
        .max_by(|a, b| a.area.total_cmp(&b.area))
        .map(|c| c.id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::topology::WireRecord;

    fn add_wire(
        store: &mut TopologyStore,
        min: (f64, f64),
        max: (f64, f64),
        area: f64,
    ) -> WireId {
        // Sheet wires live in the XZ plane; Y is the thickness axis.
        let bbox = Aabb::new(
            Point3::new(min.0, 0.0, min.1),
            Point3::new(max.0, 0.0, max.1),
        );
        store.add_wire(WireRecord {
            length: 2.0 * ((max.0 - min.0) + (max.1 - min.1)),
            bbox,
            enclosed_area: Some(area),
            edge_count: 4,
        })
    }

    fn face_of(wires: Vec<WireId>) -> FaceRecord {
        FaceRecord { wires }
    }

    #[test]
    fn single_wire_is_outer_with_no_holes() {
        let mut store = TopologyStore::new();
        let w = add_wire(&mut store, (0.0, 0.0), (4.0, 4.0), 16.0);
        let partition = partition_face_wires(&face_of(vec![w]), &store)
            .unwrap()
            .unwrap();
        assert_eq!(partition.outer, w);
        assert!(partition.holes.is_empty());
    }

    #[test]
    fn empty_face_has_no_partition() {
        let store = TopologyStore::new();
        assert!(partition_face_wires(&face_of(vec![]), &store)
            .unwrap()
            .is_none());
    }

    #[test]
    fn containment_beats_raw_area() {
        let mut store = TopologyStore::new();
        // A encloses both B and C. B reports a larger enclosed area than A
        // (as a skewed kernel can), but containment must still win.
        let a = add_wire(&mut store, (0.0, 0.0), (10.0, 10.0), 50.0);
        let b = add_wire(&mut store, (1.0, 1.0), (5.0, 5.0), 80.0);
        let c = add_wire(&mut store, (6.0, 6.0), (9.0, 9.0), 4.0);
        let partition = partition_face_wires(&face_of(vec![a, b, c]), &store)
            .unwrap()
            .unwrap();
        assert_eq!(partition.outer, a);
        assert_eq!(partition.holes, vec![b, c]);
    }

    #[test]
    fn partial_containment_count_decides() {
        let mut store = TopologyStore::new();
        // W1 encloses W2 only; W3 sits outside W1, so nothing contains all.
        let w1 = add_wire(&mut store, (0.0, 0.0), (6.0, 6.0), 36.0);
        let w2 = add_wire(&mut store, (1.0, 1.0), (2.0, 2.0), 1.0);
        let w3 = add_wire(&mut store, (7.0, 7.0), (9.0, 9.0), 4.0);
        let partition = partition_face_wires(&face_of(vec![w1, w2, w3]), &store)
            .unwrap()
            .unwrap();
        assert_eq!(partition.outer, w1);
    }

    #[test]
    fn disjoint_wires_fall_back_to_area() {
        let mut store = TopologyStore::new();
        let small = add_wire(&mut store, (0.0, 0.0), (1.0, 1.0), 1.0);
        let large = add_wire(&mut store, (5.0, 5.0), (9.0, 9.0), 16.0);
        let partition = partition_face_wires(&face_of(vec![small, large]), &store)
            .unwrap()
            .unwrap();
        assert_eq!(partition.outer, large);
        assert_eq!(partition.holes, vec![small]);
    }
}
