//! Deterministic mock environment.
//!
//! Implements the collision port against a hand-built world of sphere
//! and axis-aligned-box obstacles plus a spherical target, with exact
//! ray intersection tests. The integration tests, the benches and the
//! demo binary all run against it; real drivers supply their own
//! geometry engine behind [`CollisionOracle`].

use crate::core::Point3;
use crate::env::CollisionOracle;

const HIT_EPS: f32 = 1e-6;

/// Obstacle shapes the mock world is built from.
#[derive(Clone, Copy, Debug)]
enum Shape {
    Sphere { center: Point3, radius: f32 },
    Box { min: Point3, max: Point3 },
}

/// Hand-built world with a spherical target.
#[derive(Clone, Debug)]
pub struct MockWorld {
    obstacles: Vec<Shape>,
    target_center: Point3,
    target_radius: f32,
}

impl MockWorld {
    /// World with no obstacles and a spherical target.
    pub fn empty(target_center: Point3, target_radius: f32) -> Self {
        Self {
            obstacles: Vec::new(),
            target_center,
            target_radius,
        }
    }

    /// Add a spherical obstacle.
    pub fn with_sphere(mut self, center: Point3, radius: f32) -> Self {
        self.obstacles.push(Shape::Sphere { center, radius });
        self
    }

    /// Add an axis-aligned box obstacle.
    pub fn with_box(mut self, min: Point3, max: Point3) -> Self {
        self.obstacles.push(Shape::Box { min, max });
        self
    }

    /// Distance along the segment to the first obstacle hit, if any.
    fn first_obstacle_hit(&self, start: Point3, direction: Point3, length: f32) -> Option<f32> {
        self.obstacles
            .iter()
            .filter_map(|shape| shape.raycast(start, direction, length))
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Distance along the segment to the target hit, if any.
    fn target_hit(&self, start: Point3, direction: Point3, length: f32) -> Option<f32> {
        ray_sphere(
            start,
            direction,
            length,
            self.target_center,
            self.target_radius,
        )
    }
}

impl CollisionOracle for MockWorld {
    fn segment_blocked(&self, start: Point3, direction: Point3, length: f32) -> bool {
        self.first_obstacle_hit(start, direction, length).is_some()
    }

    fn segment_hits_target(&self, start: Point3, direction: Point3, length: f32) -> bool {
        match (
            self.target_hit(start, direction, length),
            self.first_obstacle_hit(start, direction, length),
        ) {
            (Some(target_t), Some(obstacle_t)) => target_t <= obstacle_t,
            (Some(_), None) => true,
            _ => false,
        }
    }
}

impl Shape {
    fn raycast(&self, start: Point3, direction: Point3, length: f32) -> Option<f32> {
        match *self {
            Shape::Sphere { center, radius } => {
                ray_sphere(start, direction, length, center, radius)
            }
            Shape::Box { min, max } => ray_box(start, direction, length, min, max),
        }
    }
}

/// Smallest positive hit distance of a unit-direction ray against a
/// sphere, within `length`. A ray starting inside the sphere reports the
/// exit point.
fn ray_sphere(
    start: Point3,
    direction: Point3,
    length: f32,
    center: Point3,
    radius: f32,
) -> Option<f32> {
    let oc = start - center;
    let half_b = oc.dot(&direction);
    let c = oc.dot(&oc) - radius * radius;
    let disc = half_b * half_b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let t_in = -half_b - sqrt_disc;
    let t_out = -half_b + sqrt_disc;
    let t = if t_in > HIT_EPS {
        t_in
    } else if t_out > HIT_EPS {
        t_out
    } else {
        return None;
    };
    (t < length).then_some(t)
}

/// Slab test of a unit-direction ray against an axis-aligned box, within
/// `length`. A ray starting inside the box hits at distance zero.
fn ray_box(start: Point3, direction: Point3, length: f32, min: Point3, max: Point3) -> Option<f32> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    for axis in 0..3 {
        let (o, d, lo, hi) = match axis {
            0 => (start.x, direction.x, min.x, max.x),
            1 => (start.y, direction.y, min.y, max.y),
            _ => (start.z, direction.z, min.z, max.z),
        };
        if d.abs() < f32::EPSILON {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let (t0, t1) = ((lo - o) * inv, (hi - o) * inv);
        let (t0, t1) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }
    if t_exit <= HIT_EPS || t_enter >= length {
        return None;
    }
    Some(t_enter.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    const X: Point3 = Point3::X;

    #[test]
    fn test_open_segment_is_clear() {
        let world = MockWorld::empty(Point3::new(10.0, 0.0, 0.0), 0.5);
        assert!(!world.segment_blocked(Point3::ZERO, X, 5.0));
        assert!(!world.segment_hits_target(Point3::ZERO, X, 5.0));
    }

    #[test]
    fn test_sphere_obstacle_blocks() {
        let world = MockWorld::empty(Point3::new(10.0, 0.0, 0.0), 0.5)
            .with_sphere(Point3::new(3.0, 0.0, 0.0), 1.0);
        assert!(world.segment_blocked(Point3::ZERO, X, 5.0));
        // Segment stops short of the sphere.
        assert!(!world.segment_blocked(Point3::ZERO, X, 1.5));
        // Segment misses it sideways.
        assert!(!world.segment_blocked(Point3::new(0.0, 2.0, 0.0), X, 5.0));
    }

    #[test]
    fn test_box_obstacle_blocks() {
        let world = MockWorld::empty(Point3::new(10.0, 0.0, 0.0), 0.5).with_box(
            Point3::new(2.0, -1.0, -1.0),
            Point3::new(3.0, 1.0, 1.0),
        );
        assert!(world.segment_blocked(Point3::ZERO, X, 5.0));
        assert!(!world.segment_blocked(Point3::ZERO, X, 1.9));
        let up = Point3::Z;
        assert!(!world.segment_blocked(Point3::new(2.5, 0.0, 2.0), up, 5.0));
    }

    #[test]
    fn test_target_hit_is_not_blocking() {
        let world = MockWorld::empty(Point3::new(4.0, 0.0, 0.0), 1.0);
        assert!(!world.segment_blocked(Point3::ZERO, X, 5.0));
        assert!(world.segment_hits_target(Point3::ZERO, X, 5.0));
        // Too short to reach the target sphere.
        assert!(!world.segment_hits_target(Point3::ZERO, X, 2.9));
    }

    #[test]
    fn test_obstacle_in_front_of_target_wins() {
        let world = MockWorld::empty(Point3::new(4.0, 0.0, 0.0), 1.0)
            .with_sphere(Point3::new(2.0, 0.0, 0.0), 0.5);
        assert!(world.segment_blocked(Point3::ZERO, X, 5.0));
        assert!(!world.segment_hits_target(Point3::ZERO, X, 5.0));
    }

    #[test]
    fn test_target_in_front_of_obstacle_wins() {
        let world = MockWorld::empty(Point3::new(2.0, 0.0, 0.0), 0.5)
            .with_sphere(Point3::new(4.0, 0.0, 0.0), 0.5);
        assert!(world.segment_hits_target(Point3::ZERO, X, 5.0));
    }

    #[test]
    fn test_ray_box_from_inside() {
        let hit = ray_box(
            Point3::ZERO,
            X,
            10.0,
            Point3::new(-1.0, -1.0, -1.0),
            Point3::new(1.0, 1.0, 1.0),
        );
        assert_eq!(hit, Some(0.0));
    }
}
