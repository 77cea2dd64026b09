//! The four total traversal orders and their stepping functions.
//!
//! Every step is answered from local links plus coordinates: a bounded step
//! decides subtree membership by comparing abscissas with the bound's right
//! row neighbour instead of walking up the ancestry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::arena::{NodeId, TreeArena, TreeNode};
use crate::errors::{TreeError, TreeResult};

/// Deterministic total order over the nodes of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Traversal {
    /// Level by level, each row left to right
    #[default]
    #[serde(rename = "breadth-left")]
    BreadthFirstLeft,
    /// Level by level, each row right to left
    #[serde(rename = "breadth-right")]
    BreadthFirstRight,
    /// Pre-order, first child first
    #[serde(rename = "depth-left")]
    DepthFirstLeft,
    /// Pre-order, last child first
    #[serde(rename = "depth-right")]
    DepthFirstRight,
}

impl Traversal {
    pub const ALL: [Traversal; 4] = [
        Traversal::BreadthFirstLeft,
        Traversal::BreadthFirstRight,
        Traversal::DepthFirstLeft,
        Traversal::DepthFirstRight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Traversal::BreadthFirstLeft => "breadth-left",
            Traversal::BreadthFirstRight => "breadth-right",
            Traversal::DepthFirstLeft => "depth-left",
            Traversal::DepthFirstRight => "depth-right",
        }
    }
}

impl fmt::Display for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Traversal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Traversal::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown traversal '{}', expected one of: breadth-left, breadth-right, depth-left, depth-right",
                    s
                )
            })
    }
}

impl<T> TreeArena<T> {
    /// Successor of `id` in `order`.
    ///
    /// With `bound` set the walk is restricted to the bound's subtree and
    /// returns `None` once it would leave it; `id` must lie inside the bound.
    #[instrument(level = "trace", skip(self))]
    pub fn next(
        &self,
        id: NodeId,
        order: Traversal,
        bound: Option<NodeId>,
    ) -> TreeResult<Option<NodeId>> {
        self.check(id)?;
        if let Some(bound) = bound {
            self.check(bound)?;
            if !self.descends_from(id, bound) {
                return Err(TreeError::OutsideSubtree { node: id, bound });
            }
        }
        Ok(self.step(id, order, bound))
    }

    /// Whether `candidate` lies in the subtree of `root`; a missing root means the whole tree.
    pub fn is_descendant_of(&self, candidate: NodeId, root: Option<NodeId>) -> TreeResult<bool> {
        self.check(candidate)?;
        match root {
            None => Ok(true),
            Some(root) => {
                self.check(root)?;
                Ok(self.descends_from(candidate, root))
            }
        }
    }

    /// Converse of [`TreeArena::is_descendant_of`].
    pub fn is_predecessor_of(&self, ancestor: NodeId, descendant: NodeId) -> TreeResult<bool> {
        self.is_descendant_of(descendant, Some(ancestor))
    }

    pub(crate) fn step(&self, id: NodeId, order: Traversal, bound: Option<NodeId>) -> Option<NodeId> {
        match order {
            Traversal::BreadthFirstLeft => self.breadth_left_next(id, bound),
            Traversal::BreadthFirstRight => self.breadth_right_next(id, bound),
            Traversal::DepthFirstLeft => self.depth_left_next(id, bound),
            Traversal::DepthFirstRight => self.depth_right_next(id, bound),
        }
    }

    pub(crate) fn descends_from(&self, candidate: NodeId, root: NodeId) -> bool {
        let floor = self.node(root).y;
        let mut current = Some(candidate);
        while let Some(id) = current {
            let node = self.node(id);
            if node.y < floor {
                break;
            }
            if id == root {
                return true;
            }
            current = node.predecessor;
        }
        false
    }

    /// Column test: a node at or below the bound's depth, between the bound's
    /// abscissa and its right row neighbour's, belongs to the bound's subtree.
    pub(crate) fn within(&self, candidate: NodeId, bound: Option<NodeId>) -> bool {
        let Some(bound) = bound else {
            return true;
        };
        let (c, b) = (self.node(candidate), self.node(bound));
        c.y >= b.y
            && c.x >= b.x
            && b.next_sibling.map_or(true, |next| c.x < self.node(next).x)
    }

    fn first_sibling_within(&self, id: NodeId, bound: Option<NodeId>) -> NodeId {
        let mut current = id;
        while let Some(previous) = self.node(current).previous_sibling {
            if !self.within(previous, bound) {
                break;
            }
            current = previous;
        }
        current
    }

    fn last_sibling_within(&self, id: NodeId, bound: Option<NodeId>) -> NodeId {
        let mut current = id;
        while let Some(next) = self.node(current).next_sibling {
            if !self.within(next, bound) {
                break;
            }
            current = next;
        }
        current
    }

    /// First child of the nearest row neighbour to the right that has children.
    pub(crate) fn first_next_descendant(&self, id: NodeId, bound: Option<NodeId>) -> Option<NodeId> {
        let mut current = self.node(id).next_sibling;
        while let Some(sibling) = current {
            if !self.within(sibling, bound) {
                return None;
            }
            let node = self.node(sibling);
            if let Some(&first) = node.children.first() {
                return Some(first);
            }
            current = node.next_sibling;
        }
        None
    }

    /// Last child of the nearest row neighbour to the left that has children.
    pub(crate) fn last_previous_descendant(&self, id: NodeId, bound: Option<NodeId>) -> Option<NodeId> {
        let mut current = self.node(id).previous_sibling;
        while let Some(sibling) = current {
            if !self.within(sibling, bound) {
                return None;
            }
            let node = self.node(sibling);
            if let Some(&last) = node.children.last() {
                return Some(last);
            }
            current = node.previous_sibling;
        }
        None
    }

    /// Right sibling of the closest ancestor that has one under the same parent.
    pub(crate) fn first_next_predecessor(&self, id: NodeId, bound: Option<NodeId>) -> Option<NodeId> {
        self.ancestor_neighbour(id, bound, |node| node.next_sibling)
    }

    /// Left sibling of the closest ancestor that has one under the same parent.
    pub(crate) fn last_previous_predecessor(&self, id: NodeId, bound: Option<NodeId>) -> Option<NodeId> {
        self.ancestor_neighbour(id, bound, |node| node.previous_sibling)
    }

    fn ancestor_neighbour(
        &self,
        id: NodeId,
        bound: Option<NodeId>,
        neighbour: impl Fn(&TreeNode<T>) -> Option<NodeId>,
    ) -> Option<NodeId> {
        let floor = bound.map(|b| self.node(b).y);
        let mut current = self.node(id).predecessor;
        while let Some(ancestor) = current {
            let node = self.node(ancestor);
            if floor.is_some_and(|floor| node.y <= floor) {
                break;
            }
            if let Some(candidate) = neighbour(node) {
                if self.node(candidate).predecessor == node.predecessor {
                    return Some(candidate);
                }
            }
            current = node.predecessor;
        }
        None
    }

    fn breadth_left_next(&self, id: NodeId, bound: Option<NodeId>) -> Option<NodeId> {
        if let Some(next) = self.node(id).next_sibling {
            if self.within(next, bound) {
                return Some(next);
            }
        }
        let first = self.first_sibling_within(id, bound);
        match self.node(first).children.first() {
            Some(&child) => Some(child),
            None => self.first_next_descendant(first, bound),
        }
    }

    fn breadth_right_next(&self, id: NodeId, bound: Option<NodeId>) -> Option<NodeId> {
        if let Some(previous) = self.node(id).previous_sibling {
            if self.within(previous, bound) {
                return Some(previous);
            }
        }
        let last = self.last_sibling_within(id, bound);
        match self.node(last).children.last() {
            Some(&child) => Some(child),
            None => self.last_previous_descendant(last, bound),
        }
    }

    fn depth_left_next(&self, id: NodeId, bound: Option<NodeId>) -> Option<NodeId> {
        let node = self.node(id);
        if let Some(&first) = node.children.first() {
            return Some(first);
        }
        if bound == Some(id) {
            return None;
        }
        match node.next_sibling {
            Some(next) if self.node(next).predecessor == node.predecessor => Some(next),
            _ => self.first_next_predecessor(id, bound),
        }
    }

    fn depth_right_next(&self, id: NodeId, bound: Option<NodeId>) -> Option<NodeId> {
        let node = self.node(id);
        if let Some(&last) = node.children.last() {
            return Some(last);
        }
        if bound == Some(id) {
            return None;
        }
        match node.previous_sibling {
            Some(previous) if self.node(previous).predecessor == node.predecessor => Some(previous),
            _ => self.last_previous_predecessor(id, bound),
        }
    }
}
