//! Planar phase machine for the informed-planar strategies.
//!
//! Growth starts by shooting straight at the target until the first
//! rejection, then spends a budget of attempts in the vertical plane
//! through start and target, then an equal budget in the horizontal
//! plane, and finally falls back to ordinary target-biased sampling.
//! Bias-multiple attempts go to the target even mid-phase, so only the
//! in-between attempts draw down the plane budgets.

use log::debug;

use crate::core::Point3;
use crate::env::CollisionOracle;

use super::Planner;

/// Mutable phase state, constructed fresh per run.
#[derive(Clone, Copy, Debug)]
pub(super) struct PlanarState {
    going_straight: bool,
    vertical_used: u32,
    horizontal_used: u32,
    budget: u32,
}

impl PlanarState {
    pub fn new(budget: u32) -> Self {
        Self {
            going_straight: true,
            vertical_used: 0,
            horizontal_used: 0,
            budget,
        }
    }

    pub fn reset(&mut self) {
        let budget = self.budget;
        *self = PlanarState::new(budget);
    }

    /// The straight phase ends on the first rejected straight-at-target
    /// attempt and never resumes.
    pub fn end_straight_phase(&mut self) {
        if self.going_straight {
            debug!("straight growth rejected, entering planar phases");
            self.going_straight = false;
        }
    }
}

impl<O: CollisionOracle> Planner<O> {
    /// Next candidate under the planar policy.
    ///
    /// The flag marks a straight-shot attempt; its rejection ends the
    /// straight phase.
    pub(super) fn sample_planar(&mut self) -> (Point3, bool) {
        if self.planar.going_straight {
            return (self.sampler.target(), true);
        }
        if self.executions % u64::from(self.config.target_bias) == 0 {
            return (self.sampler.target(), false);
        }
        if self.planar.vertical_used < self.planar.budget {
            if self.planar.vertical_used == 0 {
                debug!("vertical plane phase: clearing tree");
                self.tree.clear();
            }
            self.planar.vertical_used += 1;
            return (self.sampler.vertical_plane(), false);
        }
        if self.planar.horizontal_used < self.planar.budget {
            // The horizontal phase only starts over when the vertical
            // phase came up empty-handed.
            if self.planar.horizontal_used == 0 && !self.tree.has_found_path() {
                debug!("horizontal plane phase: clearing tree");
                self.tree.clear();
            }
            self.planar.horizontal_used += 1;
            return (self.sampler.horizontal_plane(), false);
        }
        (self.sampler.uniform(), false)
    }
}
