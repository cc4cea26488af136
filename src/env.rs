//! Collision oracle port.
//!
//! The planner never inspects obstacle geometry itself; it only asks
//! whether a candidate edge is traversable and whether it reaches the
//! target. The geometry engine behind these queries lives with the
//! driver. [`crate::mock::MockWorld`] is the reference implementation
//! used by the tests, the benches and the demo binary.

use crate::core::Point3;

/// Segment queries against the environment.
///
/// `direction` is a unit vector and `length` the segment extent, so the
/// segment runs from `start` to `start + direction * length`.
pub trait CollisionOracle {
    /// True if an obstacle lies strictly within the segment.
    ///
    /// A hit on the target object itself must NOT count as blocked.
    fn segment_blocked(&self, start: Point3, direction: Point3, length: f32) -> bool;

    /// True only if the first obstruction along the segment is the target
    /// object.
    fn segment_hits_target(&self, start: Point3, direction: Point3, length: f32) -> bool;
}

impl<T: CollisionOracle + ?Sized> CollisionOracle for &T {
    fn segment_blocked(&self, start: Point3, direction: Point3, length: f32) -> bool {
        (**self).segment_blocked(start, direction, length)
    }

    fn segment_hits_target(&self, start: Point3, direction: Point3, length: f32) -> bool {
        (**self).segment_hits_target(start, direction, length)
    }
}
