//! Tree vertex storage.

use crate::core::Point3;

/// Opaque handle to a node slot in a [`super::Tree`] arena.
///
/// Handles are only meaningful for the tree that issued them, and only
/// while the node is alive; pruning, failure removal and `clear()` free
/// slots for reuse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// A sampled, collision-verified waypoint in the search tree.
///
/// Children are owned and insertion-ordered; the parent link is a
/// non-owning index back into the same arena (`None` for the root only).
#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) position: Point3,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) cost: f32,
    pub(crate) failures: u32,
}

impl Node {
    pub(crate) fn new(position: Point3, parent: Option<NodeId>) -> Self {
        Self {
            position,
            parent,
            children: Vec::new(),
            cost: 0.0,
            failures: 0,
        }
    }

    /// Position in world coordinates (immutable after construction).
    #[inline]
    pub fn position(&self) -> Point3 {
        self.position
    }

    /// Parent handle, `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child handles in insertion order.
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Accumulated edge length from the root.
    ///
    /// Only meaningful for nodes attached with cost tracking; plain
    /// attaches leave it at 0.
    #[inline]
    pub fn cost(&self) -> f32 {
        self.cost
    }

    /// Times an extension attempt sourced from this node was rejected.
    #[inline]
    pub fn failures(&self) -> u32 {
        self.failures
    }
}
