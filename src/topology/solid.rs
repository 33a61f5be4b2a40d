use crate::math::bbox::Aabb;

use super::face::FaceId;

slotmap::new_key_type! {
    /// Unique identifier for a solid record in the topology store.
    pub struct SolidId;
}

/// Whole-body measurements of one solid, as reported by the geometry
/// kernel.
///
/// Axis convention for sheet parts: length along X, width along Z, and
/// material thickness along Y.
#[derive(Debug, Clone)]
pub struct SolidRecord {
    /// The solid's faces, in kernel order.
    pub faces: Vec<FaceId>,
    /// Enclosed volume, in cubic inches.
    pub volume: f64,
    /// Total surface area over all faces, in square inches.
    pub surface_area: f64,
    /// Axis-aligned bounding box of the whole body.
    pub bbox: Aabb,
}

impl SolidRecord {
    /// Sheet length: the bounding-box extent along X, in inches.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.bbox.max.x - self.bbox.min.x
    }

    /// Sheet width: the bounding-box extent along Z, in inches.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.bbox.max.z - self.bbox.min.z
    }

    /// Sheet height (material thickness): the bounding-box extent along Y,
    /// in inches.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.bbox.max.y - self.bbox.min.y
    }
}
