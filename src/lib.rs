//! # Taru-Plan: Sampling-Tree Path Planner
//!
//! A Rapidly-exploring Random Tree (RRT) family planner for bounded 3D
//! (or 2D) volumes. The planner incrementally grows a tree of sampled
//! waypoints from a start position until some edge reaches the target,
//! then keeps improving the path under the cost-aware strategies.
//!
//! ## Features
//!
//! - **Nine growth strategies** composed from three policy axes:
//!   sampling (uniform, target-biased, planar-phased, spheroid-informed),
//!   attach (nearest-only, or cost-minimizing with rewiring), and
//!   post-attach bookkeeping (prune on improvement, failure-count
//!   removal)
//! - **Arena-backed tree** with owned, insertion-ordered children and
//!   non-owning parent links, so subtree pruning and rewiring stay cheap
//! - **Pluggable collision port**: the planner only ever asks whether a
//!   segment is obstructed and whether it reaches the target
//! - **Deterministic runs** via seeded construction
//!
//! ## Quick Start
//!
//! ```rust
//! use taru_plan::{MockWorld, Planner, PlannerConfig, StrategyKind};
//!
//! let config = PlannerConfig::default();
//! let world = MockWorld::empty(config.target, 0.5);
//! let mut planner = Planner::with_seed(StrategyKind::Informed, config, &world, 42).unwrap();
//!
//! // A driver performs bounded batches of work per tick.
//! while !planner.has_found_path() {
//!     planner.grow(64);
//! }
//! let path = planner.path().unwrap();
//! println!("path with {} waypoints", path.len());
//! ```
//!
//! ## Coordinate Frame
//!
//! All coordinates follow the ROS REP-103 convention: X forward, Y
//! left, Z up; 2D-only runs keep Z fixed at the start height.
//!
//! ## Architecture
//!
//! - [`core`]: fundamental types ([`Point3`], [`Bounds`])
//! - [`config`]: per-run tunables and TOML loading
//! - [`tree`]: the arena-backed search tree
//! - [`sampler`]: candidate position generation
//! - [`strategy`]: the strategy family and the per-run [`Planner`]
//! - [`env`]: the collision oracle port
//! - [`mock`]: deterministic environment for tests and demos
//!
//! ## Data Flow
//!
//! ```text
//!        ┌───────────┐   candidate    ┌──────────────┐
//!        │  Sampler  │ ─────────────► │   Strategy   │ ◄── add_one_node()
//!        └───────────┘                │  (Planner)   │       (driver)
//!                                     └──────┬───────┘
//!                      nearest / neighbors   │   segment queries
//!                   ┌────────────────────────┼────────────────────┐
//!                   ▼                        ▼                    ▼
//!            ┌────────────┐          ┌──────────────┐   ┌──────────────────┐
//!            │    Tree    │ ◄─────── │    attach    │   │ CollisionOracle  │
//!            │  (arena)   │  mutate  │ rewire/prune │   │    (driver's     │
//!            └────────────┘          └──────────────┘   │    geometry)     │
//!                                                       └──────────────────┘
//! ```

pub mod config;
pub mod core;
pub mod env;
pub mod error;
pub mod mock;
pub mod sampler;
pub mod strategy;
pub mod tree;

// Re-export main types at crate root
pub use config::PlannerConfig;
pub use core::{Bounds, Point3};
pub use env::CollisionOracle;
pub use error::{PlanError, Result};
pub use mock::MockWorld;
pub use sampler::Sampler;
pub use strategy::{AttachPolicy, Planner, Policies, PostPolicy, SamplingPolicy, StrategyKind};
pub use tree::{Node, NodeId, Tree};
