//! Configuration loading for the planner.
//!
//! A [`PlannerConfig`] is built once per search run and stays immutable
//! for the lifetime of that run; restarting or changing strategy means
//! constructing a fresh planner from a fresh (or re-used) config.

use crate::core::{Bounds, Point3};
use crate::error::{PlanError, Result};
use serde::Deserialize;
use std::path::Path;

/// Tunable bundle for a single search run.
#[derive(Clone, Debug, Deserialize)]
pub struct PlannerConfig {
    /// Start position; the tree root is created here.
    #[serde(default)]
    pub start: Point3,

    /// Target position the search tries to reach.
    #[serde(default = "default_target")]
    pub target: Point3,

    /// Axis-aligned search volume; random candidates are drawn inside it.
    #[serde(default = "default_bounds")]
    pub bounds: Bounds,

    /// Maximum edge length between a node and a newly attached child (meters).
    #[serde(default = "default_max_branch_length")]
    pub max_branch_length: f32,

    /// Every Nth candidate is forced to the target position under the
    /// target-biased sampling policies.
    #[serde(default = "default_target_bias")]
    pub target_bias: u32,

    /// Neighborhood radius for the cost-minimizing attach and rewiring
    /// passes (meters).
    #[serde(default = "default_neighbor_radius")]
    pub neighbor_radius: f32,

    /// Scales the per-plane attempt budget of the planar strategies.
    #[serde(default = "default_planar_factor")]
    pub planar_factor: f32,

    /// Rejected-extension count past which a node is removed under the
    /// reduction policies.
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,

    /// Restrict random sampling to the start position's horizontal plane.
    #[serde(default)]
    pub planar_only: bool,

    /// Growth attempts a driver performs per scheduling tick.
    #[serde(default = "default_steps_per_update")]
    pub steps_per_update: usize,
}

// Default value functions
fn default_target() -> Point3 {
    Point3::new(8.0, 0.0, 0.0)
}
fn default_bounds() -> Bounds {
    Bounds::centered_cube(10.0)
}
fn default_max_branch_length() -> f32 {
    1.0
}
fn default_target_bias() -> u32 {
    10
}
fn default_neighbor_radius() -> f32 {
    3.0
}
fn default_planar_factor() -> f32 {
    2.0
}
fn default_failure_threshold() -> u32 {
    5
}
fn default_steps_per_update() -> usize {
    16
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            start: Point3::ZERO,
            target: default_target(),
            bounds: default_bounds(),
            max_branch_length: default_max_branch_length(),
            target_bias: default_target_bias(),
            neighbor_radius: default_neighbor_radius(),
            planar_factor: default_planar_factor(),
            failure_threshold: default_failure_threshold(),
            planar_only: false,
            steps_per_update: default_steps_per_update(),
        }
    }
}

impl PlannerConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PlanError::Config(format!("Failed to read config file: {}", e)))?;
        let config: PlannerConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the planner cannot run with.
    ///
    /// Called by the planner constructors, so a bad bundle fails fast
    /// instead of producing degenerate sampling behavior mid-run.
    pub fn validate(&self) -> Result<()> {
        if !self.bounds.is_valid() {
            return Err(PlanError::Config(
                "bounds min corner must not exceed max corner".into(),
            ));
        }
        if !self.bounds.contains(self.start) {
            return Err(PlanError::Config("start lies outside bounds".into()));
        }
        if !self.bounds.contains(self.target) {
            return Err(PlanError::Config("target lies outside bounds".into()));
        }
        if !(self.max_branch_length > 0.0) {
            return Err(PlanError::Config(
                "max_branch_length must be positive".into(),
            ));
        }
        if self.target_bias == 0 {
            return Err(PlanError::Config("target_bias must be at least 1".into()));
        }
        if !(self.neighbor_radius > 0.0) {
            return Err(PlanError::Config("neighbor_radius must be positive".into()));
        }
        if !(self.planar_factor >= 0.0) {
            return Err(PlanError::Config(
                "planar_factor must not be negative".into(),
            ));
        }
        if self.steps_per_update == 0 {
            return Err(PlanError::Config(
                "steps_per_update must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
