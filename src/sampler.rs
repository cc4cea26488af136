//! Candidate position generation.
//!
//! Every strategy asks the sampler for the next position to grow toward.
//! Four sampling laws cover the whole family: uniform in the search
//! volume, forced to the target, constrained to a plane through start
//! and target, and constrained to the prolate spheroid whose foci are
//! start and target (informed sampling once a path exists).

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::PlannerConfig;
use crate::core::{Bounds, Point3};

/// Draws short of giving up on a constrained sample, so a single call
/// never blocks on a nearly-empty acceptance region.
const MAX_REJECTION_DRAWS: usize = 1024;

/// In-plane axes for the planar sampling phases.
///
/// Derived once at construction from the start-to-target direction and
/// the up reference; if the two are parallel the X axis stands in for
/// up.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PlaneBasis {
    pub origin: Point3,
    pub e1: Point3,
    pub e2: Point3,
}

/// Per-run candidate generator owning the run's RNG.
#[derive(Clone, Debug)]
pub struct Sampler {
    rng: SmallRng,
    bounds: Bounds,
    start: Point3,
    target: Point3,
    planar_only: bool,
    vertical: PlaneBasis,
    horizontal: PlaneBasis,
}

impl Sampler {
    /// Create a sampler seeded from system entropy.
    pub fn new(config: &PlannerConfig) -> Self {
        Self::with_rng(config, SmallRng::from_os_rng())
    }

    /// Create a sampler with a fixed seed for reproducible runs.
    pub fn seeded(config: &PlannerConfig, seed: u64) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: &PlannerConfig, rng: SmallRng) -> Self {
        let (vertical, horizontal) = plane_bases(config.start, config.target);
        Self {
            rng,
            bounds: config.bounds,
            start: config.start,
            target: config.target,
            planar_only: config.planar_only,
            vertical,
            horizontal,
        }
    }

    /// The forced-target candidate.
    #[inline]
    pub fn target(&self) -> Point3 {
        self.target
    }

    /// Uniform candidate inside the search volume.
    pub fn uniform(&mut self) -> Point3 {
        let p = Point3::new(
            self.rng.random_range(self.bounds.min.x..=self.bounds.max.x),
            self.rng.random_range(self.bounds.min.y..=self.bounds.max.y),
            self.rng.random_range(self.bounds.min.z..=self.bounds.max.z),
        );
        self.flatten(p)
    }

    /// Candidate in the vertical plane through start and target.
    pub fn vertical_plane(&mut self) -> Point3 {
        let basis = self.vertical;
        self.in_plane(basis)
    }

    /// Candidate in the horizontal plane through start and target.
    pub fn horizontal_plane(&mut self) -> Point3 {
        let basis = self.horizontal;
        self.in_plane(basis)
    }

    fn in_plane(&mut self, basis: PlaneBasis) -> Point3 {
        let extent = self.bounds.diagonal();
        let a = self.rng.random_range(-extent..=extent);
        let b = self.rng.random_range(-extent..=extent);
        let p = self.bounds.clamp(basis.origin + basis.e1 * a + basis.e2 * b);
        self.flatten(p)
    }

    /// Candidate inside the prolate spheroid of all points whose
    /// start-plus-target distance sum stays within `best_cost`.
    ///
    /// Rejection-samples the search volume; returns `None` when the draw
    /// budget runs out, which the caller treats as an ordinary sampling
    /// failure.
    pub fn ellipse(&mut self, best_cost: f32) -> Option<Point3> {
        for _ in 0..MAX_REJECTION_DRAWS {
            let candidate = self.uniform();
            let sum = candidate.distance(&self.start) + candidate.distance(&self.target);
            if sum <= best_cost {
                return Some(candidate);
            }
        }
        None
    }

    /// In 2D-only runs every random candidate stays in the start
    /// position's horizontal plane.
    #[inline]
    fn flatten(&self, mut p: Point3) -> Point3 {
        if self.planar_only {
            p.z = self.start.z;
        }
        p
    }
}

fn plane_bases(start: Point3, target: Point3) -> (PlaneBasis, PlaneBasis) {
    let axis = (target - start).normalize();
    let e1 = if axis.length() > 0.0 { axis } else { Point3::X };
    // Up reference; fall back to X when the start-target axis is
    // (anti)parallel to up.
    let up = if e1.dot(&Point3::Z).abs() > 1.0 - 1e-4 {
        Point3::X
    } else {
        Point3::Z
    };
    let origin = start.midpoint(&target);
    let vertical = PlaneBasis {
        origin,
        e1,
        e2: (up - e1 * up.dot(&e1)).normalize(),
    };
    let horizontal = PlaneBasis {
        origin,
        e1,
        e2: e1.cross(&up).normalize(),
    };
    (vertical, horizontal)
}
