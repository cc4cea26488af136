//! Extension primitives shared by the strategy family.
//!
//! Every strategy grows the tree through the same funnel: locate the
//! nearest attach point, bound the edge length, reject coincident or
//! obstructed edges, then attach per the active attach policy. The
//! cost-minimizing (star) attach additionally searches the neighborhood
//! for a cheaper parent and rewires neighbors through the new node, in
//! that order, over the same neighbor set.

use log::trace;

use crate::core::Point3;
use crate::env::CollisionOracle;
use crate::tree::NodeId;

use super::{AttachPolicy, Planner, PostPolicy};

/// A bounded-length edge proposal from an existing node toward a sample.
struct Extension {
    source: NodeId,
    origin: Point3,
    direction: Point3,
    length: f32,
    /// Where the new node lands: exactly the sample when it is within
    /// reach, else one branch length along the direction.
    position: Point3,
}

impl<O: CollisionOracle> Planner<O> {
    /// Perform one extension toward `sample` per the attach policy.
    pub(super) fn add_node_at(&mut self, sample: Point3) -> Option<NodeId> {
        match self.policies.attach {
            AttachPolicy::Nearest => self.extend_nearest(sample),
            AttachPolicy::CostMinimizing => self.extend_star(sample),
        }
    }

    /// Propose the bounded edge from the nearest node toward `sample`,
    /// rejecting coincident samples and obstructed edges. Rejections
    /// feed the failure-count policy.
    fn propose(&mut self, sample: Point3) -> Option<Extension> {
        let source = self.tree.nearest(sample);
        let origin = self.tree.node(source).position();
        let delta = sample - origin;
        let distance = delta.length();
        if distance == 0.0 {
            // Sample coincides with an existing node; no direction to
            // grow in.
            self.note_rejection(source);
            return None;
        }
        let direction = delta / distance;
        let (length, position) = if distance <= self.config.max_branch_length {
            (distance, sample)
        } else {
            let length = self.config.max_branch_length;
            (length, origin + direction * length)
        };
        if self.oracle.segment_blocked(origin, direction, length) {
            self.note_rejection(source);
            return None;
        }
        Some(Extension {
            source,
            origin,
            direction,
            length,
            position,
        })
    }

    /// Nearest-only attach: hang the new node under the nearest node,
    /// no cost tracking, and mark the path found whenever the accepted
    /// edge terminates at the target.
    fn extend_nearest(&mut self, sample: Point3) -> Option<NodeId> {
        let ext = self.propose(sample)?;
        let id = self.tree.add_child(ext.source, ext.position);
        if self
            .oracle
            .segment_hits_target(ext.origin, ext.direction, ext.length)
        {
            self.tree.set_target_node(id);
        }
        Some(id)
    }

    /// Cost-minimizing attach with rewiring (the star family).
    ///
    /// The direct edge from the nearest node is the baseline; any
    /// neighbor offering a strictly cheaper root cost through an
    /// unobstructed edge takes over as parent. Rewiring then runs over
    /// the same neighbor set, after parent selection has finished, so
    /// the re-parenting cannot influence which nodes were parent
    /// candidates.
    fn extend_star(&mut self, sample: Point3) -> Option<NodeId> {
        let ext = self.propose(sample)?;
        let position = ext.position;

        let neighbors = self
            .tree
            .neighbors_within(position, self.config.neighbor_radius);
        let mut min_node = ext.source;
        let mut min_cost = self.tree.node(ext.source).cost() + ext.length;
        for &n in &neighbors {
            let npos = self.tree.node(n).position();
            let candidate = self.tree.node(n).cost() + npos.distance(&position);
            if candidate < min_cost && self.edge_clear(npos, position) {
                min_node = n;
                min_cost = candidate;
            }
        }

        let id = self.tree.add_child_with_cost(min_node, position);
        let new_cost = self.tree.node(id).cost();

        for &n in &neighbors {
            if n == min_node {
                continue;
            }
            let npos = self.tree.node(n).position();
            let through_new = new_cost + position.distance(&npos);
            if through_new < self.tree.node(n).cost() && self.edge_clear(position, npos) {
                trace!("rewiring node at {:?} through new node", npos);
                self.tree.reattach_with_cost(id, n);
            }
        }

        // Path-found test runs on the edge actually attached. If the
        // new node is not exactly on the target, one more extension is
        // forced at the exact target position and its result becomes
        // the target node.
        if !self.tree.has_found_path() {
            let attach_origin = self.tree.node(min_node).position();
            let delta = position - attach_origin;
            let distance = delta.length();
            if distance > 0.0
                && self
                    .oracle
                    .segment_hits_target(attach_origin, delta / distance, distance)
            {
                if position == self.config.target {
                    self.tree.set_target_node(id);
                } else if let Some(target_id) = self.extend_star(self.config.target) {
                    self.tree.set_target_node(target_id);
                }
            }
        }
        Some(id)
    }

    fn edge_clear(&self, from: Point3, to: Point3) -> bool {
        let delta = to - from;
        let distance = delta.length();
        if distance == 0.0 {
            return true;
        }
        !self
            .oracle
            .segment_blocked(from, delta / distance, distance)
    }

    /// Failure-count policy: every rejected extension charges its source
    /// node; a node pushed past the threshold is detached (with its
    /// subtree) and the failure cascades to its former parent.
    pub(super) fn note_rejection(&mut self, source: NodeId) {
        if self.policies.post != PostPolicy::RemoveOnFailure {
            return;
        }
        let mut id = source;
        loop {
            let failures = self.tree.bump_failures(id);
            if failures <= self.config.failure_threshold {
                return;
            }
            let Some(parent) = self.tree.get(id).and_then(|n| n.parent()) else {
                // The root absorbs failures without being removed.
                return;
            };
            if !self.tree.remove_subtree(id) {
                return;
            }
            trace!("removed node after {} failures", failures);
            id = parent;
        }
    }

    /// Prune-on-improvement policy: whenever the target node's cost
    /// drops below the best seen so far, discard every subtree that
    /// cannot beat it.
    pub(super) fn maybe_prune(&mut self) {
        if self.policies.post != PostPolicy::PruneOnImprovement {
            return;
        }
        let Some(target) = self.tree.target_node() else {
            return;
        };
        let cost = self.tree.node(target).cost();
        if cost < self.best_cost {
            self.best_cost = cost;
            self.tree.prune();
        }
    }
}
