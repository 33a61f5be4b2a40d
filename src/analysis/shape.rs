use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::math::TOLERANCE;
use crate::topology::WireRecord;

/// Largest relative deviation from the perimeter-equivalent circle area at
/// which a hole still counts as circular.
const CIRCLE_AREA_RATIO: f64 = 0.1;

/// Largest in-plane aspect ratio at which a hole still counts as circular.
const CIRCLE_ASPECT_RATIO: f64 = 1.2;

/// Aspect ratio above which an elongated hole is a slot.
const SLOT_ASPECT_RATIO: f64 = 2.0;

/// Area deviation above which a few-edged hole is rectangular.
const RECTANGLE_AREA_RATIO: f64 = 0.2;

/// Maximum edge count for the rectangular rule.
const RECTANGLE_MAX_EDGES: usize = 4;

/// Shape classification of a hole boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoleShape {
    /// A round hole: area matches its perimeter-equivalent circle and the
    /// in-plane bounding box is near square.
    Circular,
    /// An elongated hole (aspect ratio above [`SLOT_ASPECT_RATIO`]).
    Slot,
    /// A few-edged hole whose area deviates clearly from a circle's.
    Rectangular,
    /// Anything else.
    Irregular,
}

/// Classifies a hole wire from its measured scalar features.
///
/// Pure function of perimeter, area, in-plane bounding-box extents, and
/// edge count; rules are applied in order (circle, slot, rectangle,
/// irregular). Degenerate wires (zero perimeter or a zero in-plane extent)
/// classify without panicking: a zero extent drives the aspect ratio to
/// infinity and the slot rule, a zero perimeter falls through to irregular.
#[must_use]
pub fn classify(wire: &WireRecord) -> HoleShape {
    let perimeter = wire.length;
    let area = wire.area();
    let (w, h) = wire.bbox.planar_extents();

    let theoretical_circle_area = (perimeter / (2.0 * PI)).powi(2) * PI;
    if theoretical_circle_area <= TOLERANCE {
        return HoleShape::Irregular;
    }
    let area_ratio = (area - theoretical_circle_area).abs() / theoretical_circle_area;
    let aspect_ratio = if h > TOLERANCE { w / h } else { f64::INFINITY };

    if area_ratio < CIRCLE_AREA_RATIO && aspect_ratio < CIRCLE_ASPECT_RATIO {
        HoleShape::Circular
    } else if aspect_ratio > SLOT_ASPECT_RATIO {
        HoleShape::Slot
    } else if wire.edge_count <= RECTANGLE_MAX_EDGES && area_ratio > RECTANGLE_AREA_RATIO {
        HoleShape::Rectangular
    } else {
        HoleShape::Irregular
    }
}

/// Diameter of the circle enclosing the same area.
///
/// Used uniformly for every shape class, both for through-hole matching and
/// as a cost feature.
#[must_use]
pub fn equivalent_diameter(area: f64) -> f64 {
    2.0 * (area / PI).sqrt()
}
