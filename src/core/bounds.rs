//! Axis-aligned bounding box for the search volume.

use serde::{Deserialize, Serialize};

use super::point::Point3;

/// Axis-aligned bounding box.
///
/// Represents the rectangular search volume the planner samples within.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum corner (smallest x, y and z values).
    pub min: Point3,
    /// Maximum corner (largest x, y and z values).
    pub max: Point3,
}

impl Bounds {
    /// Create a new bounding box from min and max corners.
    #[inline]
    pub const fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create a cube centered on the origin with the given half extent.
    #[inline]
    pub fn centered_cube(half_extent: f32) -> Self {
        Self {
            min: Point3::new(-half_extent, -half_extent, -half_extent),
            max: Point3::new(half_extent, half_extent, half_extent),
        }
    }

    /// Check if the bounds are valid (min <= max on every axis).
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Check if a point lies inside the box (inclusive on all faces).
    #[inline]
    pub fn contains(&self, p: Point3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Clamp a point component-wise into the box.
    #[inline]
    pub fn clamp(&self, p: Point3) -> Point3 {
        Point3::new(
            p.x.clamp(self.min.x, self.max.x),
            p.y.clamp(self.min.y, self.max.y),
            p.z.clamp(self.min.z, self.max.z),
        )
    }

    /// Center of the box.
    #[inline]
    pub fn center(&self) -> Point3 {
        self.min.midpoint(&self.max)
    }

    /// Extent of the box along each axis.
    #[inline]
    pub fn size(&self) -> Point3 {
        self.max - self.min
    }

    /// Length of the box diagonal.
    #[inline]
    pub fn diagonal(&self) -> f32 {
        self.size().length()
    }
}
