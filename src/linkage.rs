//! `attach` and `detach`: the only structural mutation primitives.
//!
//! Both keep coordinates, sizes, row links and the shared traversal cell
//! consistent by touching only the moved subtree and the nodes to the right
//! of it, never the whole tree.

use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, instrument, trace};

use crate::arena::{NodeId, TreeArena};
use crate::errors::{TreeError, TreeResult};

/// Left-most and right-most node of one row of a subtree.
type RowEnds = (NodeId, NodeId);

impl<T> TreeArena<T> {
    /// Appends `child` (with its subtree) as the last child of `parent`.
    ///
    /// A child that already has a parent is detached first, so re-parenting is
    /// always detach followed by attach. Rejected calls leave both trees untouched.
    #[instrument(level = "debug", skip(self))]
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        self.check(parent)?;
        self.check(child)?;
        if parent == child {
            return Err(TreeError::SelfAttach(child));
        }
        if self.descends_from(parent, child) {
            return Err(TreeError::CycleDetected { parent, child });
        }
        self.unlink(child);
        self.link(parent, child);
        Ok(())
    }

    /// Removes `node` and its subtree from its parent; a root is left unchanged.
    ///
    /// The removed subtree becomes a tree of its own, re-originated at `(0, 0)`
    /// with an independent copy of the traversal preference.
    #[instrument(level = "debug", skip(self))]
    pub fn detach(&mut self, node: NodeId) -> TreeResult<()> {
        self.check(node)?;
        self.unlink(node);
        Ok(())
    }

    /// Appends a root `child` below `parent`. Both ids must be valid and `child`
    /// must not have a predecessor.
    pub(crate) fn link(&mut self, parent: NodeId, child: NodeId) {
        let rows = self.subtree_rows(child);
        let parent_x = self.node(parent).x;
        let had_children = !self.node(parent).children.is_empty();
        let child_breadth = self.span(child);
        let (new_x, growth) = if had_children {
            (parent_x + self.span(parent), child_breadth)
        } else {
            (parent_x, child_breadth - 1)
        };
        trace!(?new_x, growth, levels = rows.len(), "linking subtree");

        // rows at and above the parent
        let mut ancestor = Some(parent);
        while let Some(id) = ancestor {
            self.shift_right(self.node(id).next_sibling, growth);
            ancestor = self.node(id).predecessor;
        }

        // rows below the parent: splice the subtree between its new neighbours
        let mut left = match self.node(parent).children.last() {
            Some(&last) => Some(last),
            None => self.last_previous_descendant(parent, None),
        };
        let mut right = self.first_next_descendant(parent, None);
        let mut level = 0;
        while right.is_some() || level < rows.len() {
            self.shift_right(right, growth);
            if let Some(&(first, last)) = rows.get(level) {
                self.join(left, Some(first));
                self.join(Some(last), right);
            }
            left = left.and_then(|id| self.next_left(id));
            right = right.and_then(|id| self.next_right(id));
            level += 1;
        }

        let dx = new_x - self.node(child).x;
        let dy = self.node(parent).y + 1 - self.node(child).y;
        let cell = Rc::clone(&self.node(parent).traversal);
        for id in self.subtree_ids(child) {
            let node = self.node_mut(id);
            node.x += dx;
            node.y += dy;
            node.traversal = Rc::clone(&cell);
        }

        let added = self.node(child).size;
        self.node_mut(parent).children.push(child);
        self.node_mut(child).predecessor = Some(parent);
        let mut ancestor = Some(parent);
        while let Some(id) = ancestor {
            let node = self.node_mut(id);
            node.size += added;
            ancestor = node.predecessor;
        }
        debug!(added, "attached subtree");
    }

    /// Detaches `node` from its parent, if any. `node` must be valid.
    pub(crate) fn unlink(&mut self, node: NodeId) {
        let Some(parent) = self.node(node).predecessor else {
            return;
        };
        let rows = self.subtree_rows(node);
        let node_breadth = self.span(node);
        let shrink = if self.node(parent).children.len() > 1 {
            node_breadth
        } else {
            node_breadth - 1
        };
        let (origin_x, origin_y) = (self.node(node).x, self.node(node).y);
        let removed = self.node(node).size;
        let mut right = self.node(node).next_sibling;
        trace!(shrink, levels = rows.len(), "unlinking subtree");

        for &(first, last) in &rows {
            let before = self.node(first).previous_sibling;
            let after = self.node(last).next_sibling;
            self.join(before, after);
            self.node_mut(first).previous_sibling = None;
            self.node_mut(last).next_sibling = None;
        }

        self.node_mut(parent).children.retain(|&c| c != node);
        self.node_mut(node).predecessor = None;

        let mut ancestor = Some(parent);
        while let Some(id) = ancestor {
            self.node_mut(id).size -= removed;
            self.shift_left(self.node(id).next_sibling, shrink);
            ancestor = self.node(id).predecessor;
        }
        while let Some(id) = right {
            self.shift_left(Some(id), shrink);
            right = self.next_right(id);
        }

        let cell = Rc::new(Cell::new(self.node(node).traversal.get()));
        for id in self.subtree_ids(node) {
            let current = self.node_mut(id);
            current.x -= origin_x;
            current.y -= origin_y;
            current.traversal = Rc::clone(&cell);
        }
        debug!(removed, "detached subtree");
    }

    /// Row ends of every level of the subtree rooted at `top`, top level first.
    fn subtree_rows(&self, top: NodeId) -> Vec<RowEnds> {
        let mut rows = vec![(top, top)];
        while let Some(&(left, right)) = rows.last() {
            let Some(first) = self.scan_row(left, right, true) else {
                break;
            };
            let last = self.scan_row(right, left, false).unwrap_or(first);
            rows.push((first, last));
        }
        rows
    }

    /// Walks the row segment from `from` to `to` and returns the first or last
    /// child of the first node found that has children.
    fn scan_row(&self, from: NodeId, to: NodeId, rightwards: bool) -> Option<NodeId> {
        let mut current = Some(from);
        while let Some(id) = current {
            let node = self.node(id);
            let child = if rightwards {
                node.children.first()
            } else {
                node.children.last()
            };
            if let Some(&child) = child {
                return Some(child);
            }
            if id == to {
                break;
            }
            current = if rightwards {
                node.next_sibling
            } else {
                node.previous_sibling
            };
        }
        None
    }

    /// Right-most node one level below `id` that is not right of `id`'s column range.
    fn next_left(&self, id: NodeId) -> Option<NodeId> {
        match self.node(id).children.last() {
            Some(&last) => Some(last),
            None => self.last_previous_descendant(id, None),
        }
    }

    /// Left-most node one level below `id` that is not left of `id`'s column range.
    fn next_right(&self, id: NodeId) -> Option<NodeId> {
        match self.node(id).children.first() {
            Some(&first) => Some(first),
            None => self.first_next_descendant(id, None),
        }
    }

    fn join(&mut self, left: Option<NodeId>, right: Option<NodeId>) {
        if let Some(left) = left {
            self.node_mut(left).next_sibling = right;
        }
        if let Some(right) = right {
            self.node_mut(right).previous_sibling = left;
        }
    }

    fn shift_right(&mut self, from: Option<NodeId>, columns: usize) {
        if columns == 0 {
            return;
        }
        let mut current = from;
        while let Some(id) = current {
            let node = self.node_mut(id);
            node.x += columns;
            current = node.next_sibling;
        }
    }

    fn shift_left(&mut self, from: Option<NodeId>, columns: usize) {
        if columns == 0 {
            return;
        }
        let mut current = from;
        while let Some(id) = current {
            let node = self.node_mut(id);
            node.x -= columns;
            current = node.next_sibling;
        }
    }
}
