use super::Point3;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Creates a bounding box from its two corners.
    #[must_use]
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Extent along each axis, in (x, y, z) order.
    #[must_use]
    pub fn extents(&self) -> [f64; 3] {
        [
            self.max.x - self.min.x,
            self.max.y - self.min.y,
            self.max.z - self.min.z,
        ]
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> Point3 {
        Point3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    /// The two largest extents, largest first.
    ///
    /// For a planar wire the dropped extent is the near-zero one along the
    /// face normal, leaving the in-plane width and height.
    #[must_use]
    pub fn planar_extents(&self) -> (f64, f64) {
        let mut e = self.extents();
        e.sort_by(f64::total_cmp);
        (e[2], e[1])
    }

    /// Area of the box's dominant plane (product of the two largest extents).
    ///
    /// Used as the documented fallback when a wire's enclosed area is
    /// unavailable.
    #[must_use]
    pub fn planar_area(&self) -> f64 {
        let (w, h) = self.planar_extents();
        w * h
    }

    /// Tests whether this box encloses `other`, allowing `tolerance` of
    /// slack per axis on every side.
    #[must_use]
    pub fn contains_within(&self, other: &Aabb, tolerance: f64) -> bool {
        self.min.x <= other.min.x + tolerance
            && self.max.x >= other.max.x - tolerance
            && self.min.y <= other.min.y + tolerance
            && self.max.y >= other.max.y - tolerance
            && self.min.z <= other.min.z + tolerance
            && self.max.z >= other.max.z - tolerance
    }
}
