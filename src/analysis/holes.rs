use std::f64::consts::PI;

use crate::analysis::shape::HoleShape;
use crate::math::Point3;
use crate::topology::{FaceId, WireId};

/// Maximum center distance on the axes orthogonal to the thickness axis
/// (X and Z) for two holes to count as coincident, in inches.
pub const POSITION_TOLERANCE: f64 = 0.01;

/// Maximum equivalent-diameter difference for a through-hole pair, in
/// inches.
pub const DIAMETER_TOLERANCE: f64 = 0.005;

/// Minimum separation along the thickness axis (Y); anything closer is two
/// features on the same side, not a through-hole.
pub const MIN_THICKNESS_SEPARATION: f64 = 0.05;

/// A hole found on a single face, before through-hole merging.
#[derive(Debug, Clone)]
pub struct HoleCandidate {
    /// Stable id derived from face and wire ordinals, e.g. `f3_w1`.
    pub id: String,
    /// The face the hole loop was found on.
    pub face: FaceId,
    /// The hole loop itself.
    pub wire: WireId,
    /// Shape classification of the loop.
    pub shape: HoleShape,
    /// Equivalent diameter (diameter of the circle of equal area).
    pub diameter: f64,
    /// Center of the loop's bounding box.
    pub location: Point3,
    /// Loop perimeter, when the kernel reported one.
    pub perimeter: Option<f64>,
}

impl HoleCandidate {
    /// Perimeter, defaulting to that of the equivalent circle.
    #[must_use]
    fn resolved_perimeter(&self) -> f64 {
        self.perimeter.unwrap_or(PI * self.diameter)
    }
}

/// A finalized hole after through-hole merging.
#[derive(Debug, Clone, PartialEq)]
pub struct Hole {
    /// Candidate id, or `through_{n}` for a merged pair.
    pub id: String,
    /// Shape classification. A merged pair inherits the first hole's shape.
    pub shape: HoleShape,
    /// Equivalent diameter; averaged for a merged pair.
    pub diameter: f64,
    /// Cut perimeter; averaged for a merged pair.
    pub perimeter: f64,
    /// Hole center; averaged for a merged pair.
    pub location: Point3,
    /// Whether the hole passes through to an opposite face.
    pub has_backside: bool,
    /// Faces the hole was observed on.
    pub faces: Vec<FaceId>,
    /// Source candidate ids for a merged through-hole.
    pub merged_from: Option<[String; 2]>,
    /// Material thickness spanned by a through-hole, in inches.
    pub thickness: Option<f64>,
}

/// Pairs opposite-face single-sided holes into through-holes.
///
/// Greedy first-match: candidates are scanned in insertion order, and each
/// unvisited hole merges with the first later unvisited hole within all
/// three tolerances. With more than two coincident holes, the earliest pair
/// wins; that order dependence is the stated policy, not an accident.
#[must_use]
pub fn merge_opposite_holes(candidates: &[HoleCandidate]) -> Vec<Hole> {
    let mut merged = Vec::with_capacity(candidates.len());
    let mut visited = vec![false; candidates.len()];

    for i in 0..candidates.len() {
        if visited[i] {
            continue;
        }
        visited[i] = true;
        let hole = &candidates[i];

        let partner = (i + 1..candidates.len())
            .find(|&j| !visited[j] && is_through_pair(hole, &candidates[j]));

        match partner {
            Some(j) => {
                visited[j] = true;
                merged.push(merge_pair(hole, &candidates[j], merged.len()));
            }
            None => merged.push(single_sided(hole)),
        }
    }

    merged
}

fn is_through_pair(a: &HoleCandidate, b: &HoleCandidate) -> bool {
    let dx = (a.location.x - b.location.x).abs();
    let dy = (a.location.y - b.location.y).abs();
    let dz = (a.location.z - b.location.z).abs();
    dx < POSITION_TOLERANCE
        && dz < POSITION_TOLERANCE
        && (a.diameter - b.diameter).abs() < DIAMETER_TOLERANCE
        && dy > MIN_THICKNESS_SEPARATION
}

fn merge_pair(a: &HoleCandidate, b: &HoleCandidate, ordinal: usize) -> Hole {
    Hole {
        id: format!("through_{ordinal}"),
        shape: a.shape,
        diameter: (a.diameter + b.diameter) / 2.0,
        perimeter: (a.resolved_perimeter() + b.resolved_perimeter()) / 2.0,
        location: Point3::new(
            (a.location.x + b.location.x) / 2.0,
            (a.location.y + b.location.y) / 2.0,
            (a.location.z + b.location.z) / 2.0,
        ),
        has_backside: true,
        faces: vec![a.face, b.face],
        merged_from: Some([a.id.clone(), b.id.clone()]),
        thickness: Some((a.location.y - b.location.y).abs()),
    }
}

fn single_sided(a: &HoleCandidate) -> Hole {
    Hole {
        id: a.id.clone(),
        shape: a.shape,
        diameter: a.diameter,
        perimeter: a.resolved_perimeter(),
        location: a.location,
        has_backside: false,
        faces: vec![a.face],
        merged_from: None,
        thickness: None,
    }
}
