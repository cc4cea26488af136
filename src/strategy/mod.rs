//! The strategy family and the per-run planner.
//!
//! Nine named strategies compose three independent policy axes: how
//! candidate positions are sampled, how an accepted candidate is
//! attached to the tree, and what bookkeeping runs around the attach
//! (pruning after a path-cost improvement, or failure-count removal of
//! unproductive nodes). [`StrategyKind`] names the nine compositions;
//! [`Planner`] executes whichever one it was built with.

mod grow;
mod planar;

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::PlannerConfig;
use crate::core::Point3;
use crate::env::CollisionOracle;
use crate::error::{PlanError, Result};
use crate::sampler::Sampler;
use crate::tree::{NodeId, Tree};

use planar::PlanarState;

/// The nine growth strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Uniform sampling, nearest-node attach.
    Basic,
    /// Every Nth candidate forced to the target, nearest-node attach.
    Informed,
    /// Informed sampling plus failure-count removal of dead-end nodes.
    InformedReduction,
    /// Uniform sampling, cost-minimizing attach with rewiring (RRT*).
    Star,
    /// Star attach, target-biased until a path is found.
    StarInformed,
    /// StarInformed plus tree pruning after every path-cost improvement.
    StarInformedPruning,
    /// StarInformedPruning with spheroid-constrained sampling once a
    /// path exists.
    StarInformedPruningEllipse,
    /// Phased planar sampling (straight shot, vertical plane, horizontal
    /// plane) falling back to informed sampling.
    InformedPlanar,
    /// InformedPlanar plus failure-count removal.
    InformedPlanarReduction,
}

impl StrategyKind {
    /// All strategies, in the order operators usually list them.
    pub const ALL: [StrategyKind; 9] = [
        StrategyKind::Basic,
        StrategyKind::Informed,
        StrategyKind::InformedReduction,
        StrategyKind::Star,
        StrategyKind::StarInformed,
        StrategyKind::StarInformedPruning,
        StrategyKind::StarInformedPruningEllipse,
        StrategyKind::InformedPlanar,
        StrategyKind::InformedPlanarReduction,
    ];

    /// Stable identifier used in configs and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::Basic => "basic",
            StrategyKind::Informed => "informed",
            StrategyKind::InformedReduction => "informed-reduction",
            StrategyKind::Star => "star",
            StrategyKind::StarInformed => "star-informed",
            StrategyKind::StarInformedPruning => "star-informed-pruning",
            StrategyKind::StarInformedPruningEllipse => "star-informed-pruning-ellipse",
            StrategyKind::InformedPlanar => "informed-planar",
            StrategyKind::InformedPlanarReduction => "informed-planar-reduction",
        }
    }

    /// Decompose into the three policy axes.
    pub fn policies(&self) -> Policies {
        use AttachPolicy::*;
        use PostPolicy::*;
        use SamplingPolicy::*;
        let (sampling, attach, post) = match self {
            StrategyKind::Basic => (Uniform, Nearest, None),
            StrategyKind::Informed => (TargetEveryNth, Nearest, None),
            StrategyKind::InformedReduction => (TargetEveryNth, Nearest, RemoveOnFailure),
            StrategyKind::Star => (Uniform, CostMinimizing, None),
            StrategyKind::StarInformed => (TargetUntilFound, CostMinimizing, None),
            StrategyKind::StarInformedPruning => {
                (TargetUntilFound, CostMinimizing, PruneOnImprovement)
            }
            StrategyKind::StarInformedPruningEllipse => {
                (TargetThenEllipse, CostMinimizing, PruneOnImprovement)
            }
            StrategyKind::InformedPlanar => (Planar, Nearest, None),
            StrategyKind::InformedPlanarReduction => (Planar, Nearest, RemoveOnFailure),
        };
        Policies {
            sampling,
            attach,
            post,
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self> {
        StrategyKind::ALL
            .iter()
            .find(|kind| kind.name() == s)
            .copied()
            .ok_or_else(|| PlanError::UnknownStrategy(s.to_string()))
    }
}

/// How candidate positions are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SamplingPolicy {
    /// Uniform in the search volume.
    Uniform,
    /// Every Nth candidate is the target position, the rest uniform.
    TargetEveryNth,
    /// Target-biased until a path is found, then purely uniform.
    TargetUntilFound,
    /// Target-biased until a path is found, then constrained to the
    /// prolate spheroid bounded by the current best cost.
    TargetThenEllipse,
    /// Phased: straight at the target, then the vertical plane, then the
    /// horizontal plane, then informed sampling.
    Planar,
}

/// How an accepted candidate is connected to the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttachPolicy {
    /// Under the nearest node, without cost tracking.
    Nearest,
    /// Under the cost-minimizing neighbor, with rewiring of the
    /// neighborhood through the new node.
    CostMinimizing,
}

/// Bookkeeping around the attach.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PostPolicy {
    None,
    /// Prune the tree whenever the best path cost improves.
    PruneOnImprovement,
    /// Count rejections per source node and remove nodes past the
    /// threshold, cascading the failure to the parent.
    RemoveOnFailure,
}

/// Policy triple a [`StrategyKind`] decomposes into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Policies {
    pub sampling: SamplingPolicy,
    pub attach: AttachPolicy,
    pub post: PostPolicy,
}

/// Per-run growth engine.
///
/// Owns the tree, the sampler (and its RNG), the collision oracle handle
/// and every mutable counter of the selected strategy, all constructed
/// fresh per run. A driver calls [`Planner::add_one_node`] once per unit
/// of work, or [`Planner::grow`] for a bounded batch per tick.
pub struct Planner<O> {
    kind: StrategyKind,
    policies: Policies,
    config: PlannerConfig,
    oracle: O,
    tree: Tree,
    sampler: Sampler,
    /// Growth attempts so far; the bias policies key off this counter.
    executions: u64,
    /// Best known path cost; pruning triggers when it improves.
    best_cost: f32,
    planar: PlanarState,
}

impl<O: CollisionOracle> Planner<O> {
    /// Build a planner for one search run, seeded from system entropy.
    pub fn new(kind: StrategyKind, config: PlannerConfig, oracle: O) -> Result<Self> {
        config.validate()?;
        let sampler = Sampler::new(&config);
        Ok(Self::assemble(kind, config, oracle, sampler))
    }

    /// Build a planner with a fixed RNG seed for reproducible runs.
    pub fn with_seed(
        kind: StrategyKind,
        config: PlannerConfig,
        oracle: O,
        seed: u64,
    ) -> Result<Self> {
        config.validate()?;
        let sampler = Sampler::seeded(&config, seed);
        Ok(Self::assemble(kind, config, oracle, sampler))
    }

    /// Build a planner from a strategy identifier.
    ///
    /// Fails fast on an unrecognized identifier; this is the designated
    /// construction path for operator-facing surfaces.
    pub fn from_name(name: &str, config: PlannerConfig, oracle: O) -> Result<Self> {
        Self::new(name.parse()?, config, oracle)
    }

    fn assemble(kind: StrategyKind, config: PlannerConfig, oracle: O, sampler: Sampler) -> Self {
        let planar = PlanarState::new(planar_budget(&config));
        debug!(
            "planner ready: strategy {}, start {:?}, target {:?}",
            kind, config.start, config.target
        );
        Self {
            kind,
            policies: kind.policies(),
            tree: Tree::new(config.start),
            sampler,
            oracle,
            executions: 0,
            best_cost: f32::INFINITY,
            planar,
            config,
        }
    }

    /// Attempt one growth step.
    ///
    /// Returns the newly attached node, or `None` when the attempt was
    /// rejected (coincident sample, obstructed edge, exhausted
    /// constrained-sampling budget). Rejection is the normal sampling
    /// failure outcome, not an error.
    pub fn add_one_node(&mut self) -> Option<NodeId> {
        self.executions += 1;
        let (sample, straight_shot) = self.next_sample()?;
        let added = self.add_node_at(sample);
        if straight_shot && added.is_none() {
            self.planar.end_straight_phase();
        }
        self.maybe_prune();
        added
    }

    /// Run up to `steps` growth attempts; returns how many nodes were
    /// actually added.
    pub fn grow(&mut self, steps: usize) -> usize {
        (0..steps)
            .filter(|_| self.add_one_node().is_some())
            .count()
    }

    /// The tree built so far.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// True once some edge has terminated at the target.
    pub fn has_found_path(&self) -> bool {
        self.tree.has_found_path()
    }

    /// Waypoints from start to target node, once a path exists.
    pub fn path(&self) -> Option<Vec<Point3>> {
        self.tree.path()
    }

    /// Strategy this planner runs.
    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    /// Configuration of this run.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Restart the run: fresh tree, counters and phase state.
    ///
    /// The sampler keeps its RNG stream; build a new planner instead to
    /// reproduce a run from its seed.
    pub fn reset(&mut self) {
        self.tree = Tree::new(self.config.start);
        self.executions = 0;
        self.best_cost = f32::INFINITY;
        self.planar.reset();
    }

    /// Pick the next candidate position per the sampling policy.
    ///
    /// The second element flags a planar straight-shot attempt, whose
    /// rejection ends the straight phase.
    fn next_sample(&mut self) -> Option<(Point3, bool)> {
        match self.policies.sampling {
            SamplingPolicy::Uniform => Some((self.sampler.uniform(), false)),
            SamplingPolicy::TargetEveryNth => Some((self.biased_sample(), false)),
            SamplingPolicy::TargetUntilFound => {
                if self.tree.has_found_path() {
                    Some((self.sampler.uniform(), false))
                } else {
                    Some((self.biased_sample(), false))
                }
            }
            SamplingPolicy::TargetThenEllipse => match self.tree.target_node() {
                Some(target) => {
                    let best = self.tree.node(target).cost();
                    self.sampler.ellipse(best).map(|p| (p, false))
                }
                None => Some((self.biased_sample(), false)),
            },
            SamplingPolicy::Planar => Some(self.sample_planar()),
        }
    }

    /// Every Nth candidate is the target, the rest uniform.
    fn biased_sample(&mut self) -> Point3 {
        if self.executions % u64::from(self.config.target_bias) == 0 {
            self.sampler.target()
        } else {
            self.sampler.uniform()
        }
    }
}

fn planar_budget(config: &PlannerConfig) -> u32 {
    let steps = config.start.distance(&config.target) / config.max_branch_length;
    (steps * config.planar_factor).ceil() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockWorld;

    #[test]
    fn test_kind_roundtrips_through_name() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.name().parse::<StrategyKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_strategy_fails_fast() {
        let err = "informed-star".parse::<StrategyKind>().unwrap_err();
        assert!(matches!(err, PlanError::UnknownStrategy(_)));

        let config = PlannerConfig::default();
        let world = MockWorld::empty(config.target, 0.5);
        assert!(Planner::from_name("no-such-strategy", config, &world).is_err());
    }

    #[test]
    fn test_kind_serde_uses_kebab_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            strategy: StrategyKind,
        }
        let w: Wrapper = toml::from_str(r#"strategy = "star-informed-pruning-ellipse""#).unwrap();
        assert_eq!(w.strategy, StrategyKind::StarInformedPruningEllipse);
        assert!(toml::from_str::<Wrapper>(r#"strategy = "starry""#).is_err());
    }

    #[test]
    fn test_policy_table_matches_strategy_family() {
        use AttachPolicy as A;
        use PostPolicy as P;
        use SamplingPolicy as S;
        let expect = [
            (StrategyKind::Basic, S::Uniform, A::Nearest, P::None),
            (StrategyKind::Informed, S::TargetEveryNth, A::Nearest, P::None),
            (
                StrategyKind::InformedReduction,
                S::TargetEveryNth,
                A::Nearest,
                P::RemoveOnFailure,
            ),
            (StrategyKind::Star, S::Uniform, A::CostMinimizing, P::None),
            (
                StrategyKind::StarInformed,
                S::TargetUntilFound,
                A::CostMinimizing,
                P::None,
            ),
            (
                StrategyKind::StarInformedPruning,
                S::TargetUntilFound,
                A::CostMinimizing,
                P::PruneOnImprovement,
            ),
            (
                StrategyKind::StarInformedPruningEllipse,
                S::TargetThenEllipse,
                A::CostMinimizing,
                P::PruneOnImprovement,
            ),
            (
                StrategyKind::InformedPlanar,
                S::Planar,
                A::Nearest,
                P::None,
            ),
            (
                StrategyKind::InformedPlanarReduction,
                S::Planar,
                A::Nearest,
                P::RemoveOnFailure,
            ),
        ];
        for (kind, sampling, attach, post) in expect {
            let p = kind.policies();
            assert_eq!(p.sampling, sampling, "{kind}");
            assert_eq!(p.attach, attach, "{kind}");
            assert_eq!(p.post, post, "{kind}");
        }
    }
}
