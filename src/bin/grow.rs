//! Taru-Grow - reference driver for the taru-plan planner.
//!
//! Builds a small mock world (a wall with a doorway between start and
//! target), runs the selected strategy in bounded ticks, and prints the
//! found path. Usage:
//!
//! ```text
//! taru-grow [config.toml] [--strategy NAME] [--seed N] [--ticks N]
//! ```
//!
//! Without arguments, looks for `taru.toml` and otherwise runs with
//! defaults.

use std::path::Path;

use log::{info, warn};
use taru_plan::{MockWorld, Planner, PlannerConfig, Point3, Result, StrategyKind};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    let config = if args.len() > 1 && !args[1].starts_with("--") {
        let config_path = Path::new(&args[1]);
        info!("Loading configuration from {:?}", config_path);
        PlannerConfig::load(config_path)?
    } else if Path::new("taru.toml").exists() {
        info!("Loading configuration from taru.toml");
        PlannerConfig::load(Path::new("taru.toml"))?
    } else {
        info!("Using default configuration");
        PlannerConfig::default()
    };

    let strategy = match flag_value(&args, "--strategy") {
        Some(name) => name.parse::<StrategyKind>()?,
        None => StrategyKind::StarInformedPruning,
    };
    let ticks: usize = flag_value(&args, "--ticks")
        .and_then(|v| v.parse().ok())
        .unwrap_or(2000);

    info!("Taru-Grow v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Strategy {} | start {:?} -> target {:?} | branch {:.2}m",
        strategy, config.start, config.target, config.max_branch_length
    );

    let world = doorway_world(&config);

    let mut planner = match flag_value(&args, "--seed").and_then(|v| v.parse().ok()) {
        Some(seed) => {
            info!("Seeding RNG with {}", seed);
            Planner::with_seed(strategy, config.clone(), &world, seed)?
        }
        None => Planner::new(strategy, config.clone(), &world)?,
    };

    // Drive in bounded ticks, as a frame loop would.
    let mut found_at = None;
    for tick in 0..ticks {
        planner.grow(config.steps_per_update);
        if found_at.is_none() && planner.has_found_path() {
            found_at = Some(tick);
            info!("Path found after {} ticks ({} nodes)", tick, planner.tree().len());
        }
    }

    let tree = planner.tree();
    info!("Grew {} nodes over {} ticks", tree.len(), ticks);

    match planner.path() {
        Some(path) => {
            let length: f32 = path.windows(2).map(|w| w[0].distance(&w[1])).sum();
            info!("Final path: {} waypoints, {:.3}m", path.len(), length);
            for (i, p) in path.iter().enumerate() {
                println!("{:3}  ({:7.3}, {:7.3}, {:7.3})", i, p.x, p.y, p.z);
            }
        }
        None => warn!("No path found; try more ticks or a larger target"),
    }

    Ok(())
}

/// Value following a `--flag` argument, if present.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

/// Wall with a doorway halfway between start and target.
fn doorway_world(config: &PlannerConfig) -> MockWorld {
    let mid = config.start.midpoint(&config.target);
    let half = config.bounds.size() * 0.5;
    MockWorld::empty(config.target, 0.5)
        .with_box(
            Point3::new(mid.x - 0.2, mid.y - half.y, mid.z - half.z),
            Point3::new(mid.x + 0.2, mid.y + 0.8, mid.z + half.z),
        )
        .with_box(
            Point3::new(mid.x - 0.2, mid.y + 1.6, mid.z - half.z),
            Point3::new(mid.x + 0.2, mid.y + half.y, mid.z + half.z),
        )
}
