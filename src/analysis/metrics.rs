use serde::{Deserialize, Serialize};

use crate::analysis::holes::{merge_opposite_holes, Hole, HoleCandidate};
use crate::analysis::shape;
use crate::analysis::wires::partition_face_wires;
use crate::error::Result;
use crate::topology::{SolidId, TopologyStore};

/// Derived manufacturing metrics for one solid body.
///
/// Created once per analyzed body and immutable thereafter. All lengths are
/// in inches and areas in square inches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyMetrics {
    /// Total tool-path length: outer boundary plus every hole boundary.
    pub cut_length: f64,
    /// Number of cutting operations: one per hole plus the outer boundary.
    pub num_cuts: usize,
    /// Area of the dominant flat face, net of cutouts.
    pub sheet_area: f64,
    /// Billed material rectangle (length × width), independent of cutouts.
    pub mat_use_area: f64,
    /// Total surface area of the body.
    pub surface_area: f64,
    /// Enclosed volume.
    pub volume: f64,
    /// Bounding-box extent along X.
    pub length: f64,
    /// Bounding-box extent along Z.
    pub width: f64,
    /// Bounding-box extent along Y (material thickness).
    pub height: f64,
}

/// Result of running the feature-recognition pipeline over one body.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyAnalysis {
    /// Aggregated manufacturing metrics.
    pub metrics: BodyMetrics,
    /// Finalized hole inventory, through-holes merged.
    pub holes: Vec<Hole>,
}

/// Runs the full feature-recognition pipeline over a solid: per-face wire
/// classification, hole shape classification, through-hole merging, and
/// metric aggregation.
pub struct AnalyzeBody {
    solid: SolidId,
}

impl AnalyzeBody {
    /// Creates a new `AnalyzeBody` query.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the pipeline, returning the body's metrics and hole list.
    ///
    /// Deterministic: the same store contents always yield the same result.
    /// Geometric gaps (missing enclosed areas, a body with no wire data,
    /// zero face area) recover through documented fallbacks and are never
    /// fatal.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced topology record is missing from the
    /// store.
    pub fn execute(&self, store: &TopologyStore) -> Result<BodyAnalysis> {
        let solid = store.solid(self.solid)?;
        let length = solid.length();
        let width = solid.width();
        let height = solid.height();

        let mut candidates: Vec<HoleCandidate> = Vec::new();
        let mut max_outer_perimeter: Option<f64> = None;
        let mut max_face_area = 0.0_f64;

        for (face_ordinal, &face_id) in solid.faces.iter().enumerate() {
            let face = store.face(face_id)?;
            let Some(partition) = partition_face_wires(face, store)? else {
                continue;
            };

            let outer = store.wire(partition.outer)?;
            max_outer_perimeter =
                Some(max_outer_perimeter.map_or(outer.length, |p| p.max(outer.length)));

            // Net face area: outer loop minus its hole loops.
            let mut face_area = outer.area();

            for (wire_ordinal, &wire_id) in face.wires.iter().enumerate() {
                if wire_id == partition.outer {
                    continue;
                }
                let wire = store.wire(wire_id)?;
                face_area -= wire.area();
                candidates.push(HoleCandidate {
                    id: format!("f{face_ordinal}_w{wire_ordinal}"),
                    face: face_id,
                    wire: wire_id,
                    shape: shape::classify(wire),
                    diameter: shape::equivalent_diameter(wire.area()),
                    location: wire.bbox.center(),
                    perimeter: Some(wire.length),
                });
            }

            max_face_area = max_face_area.max(face_area.max(0.0));
        }

        let holes = merge_opposite_holes(&candidates);

        let outer_perimeter = max_outer_perimeter.unwrap_or_else(|| {
            tracing::warn!("no wire data; outer perimeter falls back to bounding-box rectangle");
            2.0 * (length + width)
        });
        let hole_perimeters: f64 = holes.iter().map(|h| h.perimeter).sum();

        let mut sheet_area = max_face_area;
        if sheet_area <= 0.0 {
            tracing::warn!("no usable face area; sheet area falls back to bounding box");
            sheet_area = length * width;
        }

        let metrics = BodyMetrics {
            cut_length: outer_perimeter + hole_perimeters,
            num_cuts: holes.len() + 1,
            sheet_area,
            mat_use_area: length * width,
            surface_area: solid.surface_area,
            volume: solid.volume,
            length,
            width,
            height,
        };

        Ok(BodyAnalysis { metrics, holes })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::bbox::Aabb;
    use crate::math::Point3;
    use crate::topology::{FaceRecord, SolidRecord, WireId, WireRecord};
    use std::f64::consts::PI;

    fn rect_wire(store: &mut TopologyStore, w: f64, h: f64, y: f64) -> WireId {
        store.add_wire(WireRecord {
            length: 2.0 * (w + h),
            bbox: Aabb::new(Point3::new(0.0, y, 0.0), Point3::new(w, y, h)),
            enclosed_area: Some(w * h),
            edge_count: 4,
        })
    }

    fn circle_wire(store: &mut TopologyStore, cx: f64, cz: f64, y: f64, r: f64) -> WireId {
        store.add_wire(WireRecord {
            length: 2.0 * PI * r,
            bbox: Aabb::new(
                Point3::new(cx - r, y, cz - r),
                Point3::new(cx + r, y, cz + r),
            ),
            enclosed_area: Some(PI * r * r),
            edge_count: 1,
        })
    }

    /// A 6 x 4 x 0.125 plate with one through-hole of radius 0.5 at (2, 2).
    fn plate_with_through_hole(store: &mut TopologyStore) -> SolidId {
        let mut faces = Vec::new();
        for y in [0.0, 0.125] {
            let outer = rect_wire(store, 6.0, 4.0, y);
            let hole = circle_wire(store, 2.0, 2.0, y, 0.5);
            faces.push(store.add_face(FaceRecord {
                wires: vec![outer, hole],
            }));
        }
        store.add_solid(SolidRecord {
            faces,
            volume: 6.0 * 4.0 * 0.125,
            surface_area: 2.0 * 6.0 * 4.0,
            bbox: Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(6.0, 0.125, 4.0)),
        })
    }

    #[test]
    fn plate_metrics_add_up() {
        let mut store = TopologyStore::new();
        let solid = plate_with_through_hole(&mut store);
        let analysis = AnalyzeBody::new(solid).execute(&store).unwrap();

        // Both single-sided holes merged into one through-hole.
        assert_eq!(analysis.holes.len(), 1);
        assert!(analysis.holes[0].has_backside);
        assert_eq!(analysis.metrics.num_cuts, 2);

        let outer_perimeter = 2.0 * (6.0 + 4.0);
        let hole_perimeter = PI;
        assert!((analysis.metrics.cut_length - (outer_perimeter + hole_perimeter)).abs() < 1e-9);

        // Sheet area is the face net of the cutout; billed area is not.
        assert!((analysis.metrics.sheet_area - (24.0 - PI * 0.25)).abs() < 1e-9);
        assert!((analysis.metrics.mat_use_area - 24.0).abs() < 1e-12);
        assert!((analysis.metrics.height - 0.125).abs() < 1e-12);
    }

    #[test]
    fn cut_length_is_outer_plus_hole_perimeters() {
        let mut store = TopologyStore::new();
        let solid = plate_with_through_hole(&mut store);
        let analysis = AnalyzeBody::new(solid).execute(&store).unwrap();
        let hole_sum: f64 = analysis.holes.iter().map(|h| h.perimeter).sum();
        let outer = 2.0 * (6.0 + 4.0);
        assert!((analysis.metrics.cut_length - (outer + hole_sum)).abs() < 1e-12);
    }

    #[test]
    fn analysis_is_deterministic() {
        let mut store = TopologyStore::new();
        let solid = plate_with_through_hole(&mut store);
        let first = AnalyzeBody::new(solid).execute(&store).unwrap();
        let second = AnalyzeBody::new(solid).execute(&store).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn hole_free_body_has_one_cut() {
        let mut store = TopologyStore::new();
        let outer = rect_wire(&mut store, 3.0, 2.0, 0.0);
        let face = store.add_face(FaceRecord { wires: vec![outer] });
        let solid = store.add_solid(SolidRecord {
            faces: vec![face],
            volume: 3.0 * 2.0 * 0.06,
            surface_area: 12.0,
            bbox: Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(3.0, 0.06, 2.0)),
        });
        let analysis = AnalyzeBody::new(solid).execute(&store).unwrap();
        assert!(analysis.holes.is_empty());
        assert_eq!(analysis.metrics.num_cuts, 1);
        assert!((analysis.metrics.cut_length - 10.0).abs() < 1e-12);
    }

    #[test]
    fn body_without_wires_falls_back_to_bounding_box() {
        let mut store = TopologyStore::new();
        let face = store.add_face(FaceRecord::default());
        let solid = store.add_solid(SolidRecord {
            faces: vec![face],
            volume: 1.0,
            surface_area: 0.0,
            bbox: Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(5.0, 0.1, 3.0)),
        });
        let analysis = AnalyzeBody::new(solid).execute(&store).unwrap();
        assert!((analysis.metrics.cut_length - 2.0 * (5.0 + 3.0)).abs() < 1e-12);
        assert!((analysis.metrics.sheet_area - 15.0).abs() < 1e-12);
        assert_eq!(analysis.metrics.num_cuts, 1);
    }
}
