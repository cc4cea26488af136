//! The search tree arena.
//!
//! Nodes live in slot storage with a free list; children are owned,
//! insertion-ordered lists of slot handles and parent links are
//! non-owning back-indices, so detaching a subtree frees every slot
//! under it without reference cycles.
//!
//! Nearest and neighborhood queries are full-tree recursive scans in
//! parent-before-child order. There is deliberately no spatial index:
//! tree sizes are bounded by the driver's iteration cap, and the O(n)
//! scan keeps insertion, rewiring and removal trivially cheap.

mod node;

use log::debug;

use crate::core::Point3;

pub use node::{Node, NodeId};

/// Rooted tree of sampled waypoints.
///
/// Created once per search run with only a root; accumulates nodes until
/// the run is stopped or restarted.
#[derive(Clone, Debug)]
pub struct Tree {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    live: usize,
    root: NodeId,
    target_node: Option<NodeId>,
}

impl Tree {
    /// Create a tree containing only a root at the start position.
    pub fn new(start: Point3) -> Self {
        Self {
            slots: vec![Some(Node::new(start, None))],
            free: Vec::new(),
            live: 1,
            root: NodeId(0),
            target_node: None,
        }
    }

    /// Root handle; the root is never removed and never re-parented.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Node that currently marks the found path, if any.
    #[inline]
    pub fn target_node(&self) -> Option<NodeId> {
        self.target_node
    }

    /// True once a target node has been assigned.
    #[inline]
    pub fn has_found_path(&self) -> bool {
        self.target_node.is_some()
    }

    /// Number of live nodes (including the root).
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Look up a node, `None` if the handle is stale.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(|s| s.as_ref())
    }

    /// Iterate over all live nodes in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|n| (NodeId(i), n)))
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        self.slots[id.0].as_ref().expect("stale NodeId")
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.slots[id.0].as_mut().expect("stale NodeId")
    }

    /// Node minimizing Euclidean distance to `point` over the whole tree.
    ///
    /// Recursive descent from the root in parent-before-child order;
    /// comparisons use squared distance and are strict, so ties break to
    /// the first node met in traversal order.
    pub fn nearest(&self, point: Point3) -> NodeId {
        let mut best = (self.root, self.node(self.root).position.distance_squared(&point));
        self.nearest_rec(self.root, point, &mut best);
        best.0
    }

    fn nearest_rec(&self, id: NodeId, point: Point3, best: &mut (NodeId, f32)) {
        for &child in &self.node(id).children {
            let d = self.node(child).position.distance_squared(&point);
            if d < best.1 {
                *best = (child, d);
            }
            self.nearest_rec(child, point, best);
        }
    }

    /// All nodes strictly closer than `radius` to `point`, in traversal
    /// order. Full-tree scan.
    pub fn neighbors_within(&self, point: Point3, radius: f32) -> Vec<NodeId> {
        let mut out = Vec::new();
        let r2 = radius * radius;
        self.collect_within(self.root, point, r2, &mut out);
        out
    }

    fn collect_within(&self, id: NodeId, point: Point3, r2: f32, out: &mut Vec<NodeId>) {
        if self.node(id).position.distance_squared(&point) < r2 {
            out.push(id);
        }
        for &child in &self.node(id).children {
            self.collect_within(child, point, r2, out);
        }
    }

    /// Attach a new node under `parent`. Cost is left at 0.
    pub fn add_child(&mut self, parent: NodeId, position: Point3) -> NodeId {
        let id = self.alloc(Node::new(position, Some(parent)));
        self.node_mut(parent).children.push(id);
        id
    }

    /// Attach a new node under `parent` with cost tracking:
    /// `cost = parent.cost + edge length`.
    pub fn add_child_with_cost(&mut self, parent: NodeId, position: Point3) -> NodeId {
        let id = self.add_child(parent, position);
        let base = self.node(parent).cost;
        let edge = self.node(parent).position.distance(&position);
        self.node_mut(id).cost = base + edge;
        id
    }

    /// Re-parent `child` under `new_parent` with cost tracking.
    ///
    /// Recomputes `child`'s cost and, transitively, the cost of every
    /// descendant before returning, so later queries see consistent
    /// costs.
    pub fn reattach_with_cost(&mut self, new_parent: NodeId, child: NodeId) {
        debug_assert!(child != self.root, "the root is never re-parented");
        debug_assert!(new_parent != child);
        if let Some(old) = self.node(child).parent {
            self.node_mut(old).children.retain(|&c| c != child);
        }
        self.node_mut(new_parent).children.push(child);
        self.node_mut(child).parent = Some(new_parent);
        let base = self.node(new_parent).cost;
        let edge = self
            .node(new_parent)
            .position
            .distance(&self.node(child).position);
        self.node_mut(child).cost = base + edge;
        self.refresh_descendant_costs(child);
    }

    fn refresh_descendant_costs(&mut self, id: NodeId) {
        let children = self.node(id).children.clone();
        let base = self.node(id).cost;
        let pos = self.node(id).position;
        for child in children {
            let edge = pos.distance(&self.node(child).position);
            self.node_mut(child).cost = base + edge;
            self.refresh_descendant_costs(child);
        }
    }

    /// Detach `id` from its parent and free its whole subtree.
    ///
    /// Refuses to remove the root or any subtree containing the current
    /// target node; returns whether removal happened.
    pub fn remove_subtree(&mut self, id: NodeId) -> bool {
        if id == self.root || self.contains_target(id) {
            return false;
        }
        if let Some(parent) = self.node(id).parent {
            self.node_mut(parent).children.retain(|&c| c != id);
        }
        self.free_rec(id);
        true
    }

    fn contains_target(&self, id: NodeId) -> bool {
        let Some(mut cursor) = self.target_node else {
            return false;
        };
        loop {
            if cursor == id {
                return true;
            }
            match self.node(cursor).parent {
                Some(parent) => cursor = parent,
                None => return false,
            }
        }
    }

    fn free_rec(&mut self, id: NodeId) {
        let node = self.slots[id.0].take().expect("stale NodeId");
        self.live -= 1;
        self.free.push(id.0);
        for child in node.children {
            self.free_rec(child);
        }
    }

    /// Remove every subtree that cannot improve on the current best path.
    ///
    /// No-op until a path is found. Works top-down from the root: each
    /// child is judged with current values, and a removed child takes
    /// its whole subtree with it without further per-child evaluation.
    /// A surviving child's subtree is then examined the same way.
    pub fn prune(&mut self) {
        let Some(target) = self.target_node else {
            return;
        };
        let best_cost = self.node(target).cost;
        let target_pos = self.node(target).position;
        let root_pos = self.node(self.root).position;
        let before = self.live;
        self.prune_rec(self.root, root_pos, target_pos, best_cost);
        debug!(
            "pruned {} nodes ({} remain, best cost {:.3})",
            before - self.live,
            self.live,
            best_cost
        );
    }

    fn prune_rec(&mut self, id: NodeId, root_pos: Point3, target_pos: Point3, best_cost: f32) {
        let children = self.node(id).children.clone();
        for child in children {
            let pos = self.node(child).position;
            if pos.distance(&root_pos) + pos.distance(&target_pos) > best_cost {
                self.remove_subtree(child);
            } else {
                self.prune_rec(child, root_pos, target_pos, best_cost);
            }
        }
    }

    /// Drop every node except the root.
    ///
    /// Also drops the target-node reference: the node it named no longer
    /// exists afterwards.
    pub fn clear(&mut self) {
        self.target_node = None;
        let children = self.node(self.root).children.clone();
        for child in children {
            self.remove_subtree(child);
        }
    }

    pub(crate) fn set_target_node(&mut self, id: NodeId) {
        debug!(
            "target reached by node at {:?} (cost {:.3})",
            self.node(id).position,
            self.node(id).cost
        );
        self.target_node = Some(id);
    }

    pub(crate) fn bump_failures(&mut self, id: NodeId) -> u32 {
        let node = self.node_mut(id);
        node.failures += 1;
        node.failures
    }

    /// All (parent-position, child-position) pairs in traversal order,
    /// for rendering.
    pub fn edges(&self) -> Vec<(Point3, Point3)> {
        let mut out = Vec::with_capacity(self.live.saturating_sub(1));
        self.edges_rec(self.root, &mut out);
        out
    }

    fn edges_rec(&self, id: NodeId, out: &mut Vec<(Point3, Point3)>) {
        let position = self.node(id).position;
        for &child in &self.node(id).children {
            out.push((position, self.node(child).position));
            self.edges_rec(child, out);
        }
    }

    /// Walk parent links from the target node back to the root.
    ///
    /// Returns the waypoints in root-first order, or `None` while no
    /// path has been found.
    pub fn path(&self) -> Option<Vec<Point3>> {
        let mut cursor = self.target_node?;
        let mut points = vec![self.node(cursor).position];
        while let Some(parent) = self.node(cursor).parent {
            cursor = parent;
            points.push(self.node(cursor).position);
        }
        points.reverse();
        Some(points)
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        self.live += 1;
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                NodeId(index)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }
}
