//! End-to-end planner scenarios against the mock world.
//!
//! All runs are seeded, so failures reproduce exactly.

use taru_plan::{Bounds, MockWorld, Planner, PlannerConfig, Point3, StrategyKind, Tree};

/// Check the rooted-tree structural invariants: exactly one parent per
/// non-root node, mutual parent/child links, no cycles, everything
/// reachable from the root.
fn assert_valid_tree(tree: &Tree) {
    let root = tree.root();
    assert!(tree.get(root).unwrap().parent().is_none());

    let mut seen = 0;
    for (id, node) in tree.iter() {
        seen += 1;
        match node.parent() {
            None => assert_eq!(id, root, "only the root may lack a parent"),
            Some(parent) => {
                let parent_node = tree.get(parent).expect("parent link must be live");
                assert!(
                    parent_node.children().contains(&id),
                    "parent's children list must contain the node"
                );
            }
        }
        // Walking parent links must reach the root without cycling.
        let mut cursor = id;
        let mut hops = 0;
        while let Some(parent) = tree.get(cursor).unwrap().parent() {
            cursor = parent;
            hops += 1;
            assert!(hops <= tree.len(), "cycle in parent links");
        }
        assert_eq!(cursor, root);
        // Children must point back.
        for &child in node.children() {
            assert_eq!(tree.get(child).unwrap().parent(), Some(id));
        }
    }
    assert_eq!(seen, tree.len());
}

/// Cost invariant for cost-tracked trees: each node's cost is its
/// parent's cost plus the connecting edge length.
fn assert_cost_invariant(tree: &Tree) {
    for (_, node) in tree.iter() {
        if let Some(parent) = node.parent() {
            let parent_node = tree.get(parent).unwrap();
            let expected = parent_node.cost() + parent_node.position().distance(&node.position());
            assert!(
                (node.cost() - expected).abs() < 1e-3,
                "cost {} != parent cost {} + edge",
                node.cost(),
                expected
            );
        }
    }
}

#[test]
fn basic_reaches_target_in_open_volume() {
    let config = PlannerConfig {
        start: Point3::ZERO,
        target: Point3::new(5.0, 0.0, 0.0),
        bounds: Bounds::new(Point3::new(-1.0, -2.0, -2.0), Point3::new(7.0, 2.0, 2.0)),
        max_branch_length: 0.5,
        ..Default::default()
    };
    let world = MockWorld::empty(config.target, 1.0);
    let mut planner = Planner::with_seed(StrategyKind::Basic, config, &world, 42).unwrap();

    for _ in 0..20_000 {
        planner.add_one_node();
        if planner.has_found_path() {
            break;
        }
    }
    assert!(planner.has_found_path(), "open volume must be solvable");
    assert_valid_tree(planner.tree());

    let path = planner.path().unwrap();
    assert_eq!(path[0], Point3::ZERO);
    // Every hop respects the branch length bound.
    for pair in path.windows(2) {
        assert!(pair[0].distance(&pair[1]) <= 0.5 + 1e-4);
    }
    // The last waypoint's edge terminated on the target sphere.
    let last = *path.last().unwrap();
    assert!(last.distance(&Point3::new(5.0, 0.0, 0.0)) <= 1.0 + 0.5 + 1e-4);
}

#[test]
fn star_keeps_cost_invariants_while_improving() {
    let config = PlannerConfig {
        start: Point3::ZERO,
        target: Point3::new(6.0, 0.0, 0.0),
        bounds: Bounds::new(Point3::new(-1.0, -4.0, -1.0), Point3::new(8.0, 4.0, 1.0)),
        max_branch_length: 0.75,
        target_bias: 8,
        neighbor_radius: 1.5,
        planar_only: true,
        ..Default::default()
    };
    let world = MockWorld::empty(config.target, 0.8);
    let mut planner =
        Planner::with_seed(StrategyKind::StarInformedPruning, config, &world, 7).unwrap();

    let mut first_cost = None;
    for _ in 0..10_000 {
        planner.add_one_node();
        if planner.has_found_path() {
            let target = planner.tree().target_node().unwrap();
            first_cost = Some(planner.tree().get(target).unwrap().cost());
            break;
        }
    }
    let first_cost = first_cost.expect("open volume must be solvable");

    // Keep refining; rewiring and pruning must preserve every invariant
    // and never make the path worse.
    for _ in 0..1_500 {
        planner.add_one_node();
    }
    assert_valid_tree(planner.tree());
    assert_cost_invariant(planner.tree());

    let target = planner.tree().target_node().unwrap();
    let final_cost = planner.tree().get(target).unwrap().cost();
    assert!(final_cost <= first_cost + 1e-4);

    // The reconstructed path's length matches the target node's cost.
    let path = planner.path().unwrap();
    let length: f32 = path.windows(2).map(|w| w[0].distance(&w[1])).sum();
    assert!((length - final_cost).abs() < 1e-2);
}

#[test]
fn ellipse_strategy_confines_growth_after_first_path() {
    let config = PlannerConfig {
        start: Point3::ZERO,
        target: Point3::new(6.0, 0.0, 0.0),
        bounds: Bounds::new(Point3::new(-1.0, -4.0, -1.0), Point3::new(8.0, 4.0, 1.0)),
        max_branch_length: 0.75,
        target_bias: 8,
        neighbor_radius: 1.5,
        planar_only: true,
        ..Default::default()
    };
    let start = config.start;
    let focus = config.target;
    let world = MockWorld::empty(config.target, 0.8);
    let mut planner = Planner::with_seed(
        StrategyKind::StarInformedPruningEllipse,
        config,
        &world,
        11,
    )
    .unwrap();

    let mut first_cost = None;
    for _ in 0..10_000 {
        planner.add_one_node();
        if planner.has_found_path() {
            let target = planner.tree().target_node().unwrap();
            first_cost = Some(planner.tree().get(target).unwrap().cost());
            break;
        }
    }
    let first_cost = first_cost.expect("open volume must be solvable");

    for _ in 0..1_500 {
        planner.add_one_node();
    }

    // The first find pruned every node outside the spheroid of the first
    // cost, and spheroid-constrained sampling keeps all later growth
    // inside it. The target node may sit up to one branch length short
    // of the exact target position, so the focal sum gets that much
    // slack.
    for (_, node) in planner.tree().iter() {
        let sum = node.position().distance(&start) + node.position().distance(&focus);
        assert!(
            sum <= first_cost + 0.75 + 1e-3,
            "node outside the informed spheroid: sum {} > {}",
            sum,
            first_cost
        );
    }
    assert_valid_tree(planner.tree());
    assert_cost_invariant(planner.tree());
}

#[test]
fn planar_strategy_escapes_through_gap_above_wall() {
    // Wall across the start-target axis with clearance only high up, so
    // straight shots fail, the vertical plane can slip over the top, and
    // the informed fallback can always finish the job.
    let config = PlannerConfig {
        start: Point3::ZERO,
        target: Point3::new(4.0, 0.0, 0.0),
        bounds: Bounds::new(Point3::new(-1.0, -2.0, -3.0), Point3::new(6.0, 2.0, 3.0)),
        max_branch_length: 0.5,
        target_bias: 10,
        planar_factor: 2.0,
        ..Default::default()
    };
    let world = MockWorld::empty(config.target, 0.8).with_box(
        Point3::new(1.8, -2.0, -3.0),
        Point3::new(2.2, 2.0, 0.5),
    );
    let mut planner =
        Planner::with_seed(StrategyKind::InformedPlanar, config, &world, 3).unwrap();

    let mut found = false;
    for _ in 0..20_000 {
        planner.add_one_node();
        if planner.has_found_path() {
            found = true;
            break;
        }
    }
    assert!(found, "gap above the wall must be reachable");
    assert_valid_tree(planner.tree());

    // The path has to climb over the wall.
    let path = planner.path().unwrap();
    let max_z = path.iter().map(|p| p.z).fold(f32::MIN, f32::max);
    assert!(max_z > 0.4, "path should pass above the wall, peak z {}", max_z);
}

#[test]
fn reduction_strategy_still_solves_open_worlds() {
    let config = PlannerConfig {
        start: Point3::ZERO,
        target: Point3::new(4.0, 0.0, 0.0),
        bounds: Bounds::new(Point3::new(-1.0, -2.0, -2.0), Point3::new(6.0, 2.0, 2.0)),
        max_branch_length: 0.5,
        target_bias: 6,
        failure_threshold: 3,
        ..Default::default()
    };
    let world = MockWorld::empty(config.target, 0.8);
    let mut planner =
        Planner::with_seed(StrategyKind::InformedReduction, config, &world, 19).unwrap();

    for _ in 0..15_000 {
        planner.add_one_node();
        if planner.has_found_path() {
            break;
        }
    }
    assert!(planner.has_found_path());
    assert_valid_tree(planner.tree());
}

#[test]
fn reset_restores_a_fresh_run() {
    let config = PlannerConfig::default();
    let world = MockWorld::empty(config.target, 0.5);
    let mut planner = Planner::with_seed(StrategyKind::Informed, config, &world, 23).unwrap();

    planner.grow(200);
    assert!(planner.tree().len() > 1);

    planner.reset();
    assert_eq!(planner.tree().len(), 1);
    assert!(!planner.has_found_path());
    assert!(planner.path().is_none());

    // The planner remains fully usable after the restart.
    planner.grow(50);
    assert!(planner.tree().len() > 1);
    assert_valid_tree(planner.tree());
}
