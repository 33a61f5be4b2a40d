use crate::math::bbox::Aabb;

slotmap::new_key_type! {
    /// Unique identifier for a wire record in the topology store.
    pub struct WireId;
}

/// Measured attributes of one closed boundary loop, as reported by the
/// geometry kernel. All lengths are in inches.
///
/// `enclosed_area` is optional: not every kernel can build a face from an
/// arbitrary wire. Consumers go through [`WireRecord::area`], which falls
/// back to the bounding-box area.
#[derive(Debug, Clone)]
pub struct WireRecord {
    /// Total length of the loop (its perimeter).
    pub length: f64,
    /// Axis-aligned bounding box of the loop.
    pub bbox: Aabb,
    /// Area enclosed by the loop, when the kernel could compute it.
    pub enclosed_area: Option<f64>,
    /// Number of edges in the loop.
    pub edge_count: usize,
}

impl WireRecord {
    /// Enclosed area, approximated by the bounding-box area when the kernel
    /// could not compute one.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.enclosed_area
            .unwrap_or_else(|| self.bbox.planar_area())
    }
}
