use std::cell::Cell;
use std::rc::Rc;

use generational_arena::{Arena, Index};
use tracing::{instrument, trace};

use crate::errors::{TreeError, TreeResult};
use crate::traversal::Traversal;

/// Handle of a node inside a [`TreeArena`].
///
/// Ids are generational: once a node is discarded its id never resolves again.
pub type NodeId = Index;

/// Shared, tree-wide traversal preference.
pub(crate) type TraversalCell = Rc<Cell<Traversal>>;

/// Tree vertex stored in the arena.
#[derive(Debug)]
pub struct TreeNode<T> {
    /// Payload carried by this node
    pub(crate) element: T,
    /// Direct children in order, owned by this node
    pub(crate) children: Vec<NodeId>,
    /// Right neighbour in the row at this depth, possibly a cousin
    pub(crate) next_sibling: Option<NodeId>,
    /// Left neighbour in the row at this depth, possibly a cousin
    pub(crate) previous_sibling: Option<NodeId>,
    /// Parent, None for roots
    pub(crate) predecessor: Option<NodeId>,
    /// Abscissa: column of this node
    pub(crate) x: usize,
    /// Ordinate: depth of this node
    pub(crate) y: usize,
    /// Number of nodes in the subtree rooted here, self included
    pub(crate) size: usize,
    pub(crate) traversal: TraversalCell,
}

impl<T> TreeNode<T> {
    fn new(element: T, traversal: Traversal) -> Self {
        Self {
            element,
            children: Vec::new(),
            next_sibling: None,
            previous_sibling: None,
            predecessor: None,
            x: 0,
            y: 0,
            size: 1,
            traversal: Rc::new(Cell::new(traversal)),
        }
    }

    pub fn element(&self) -> &T {
        &self.element
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn next_sibling(&self) -> Option<NodeId> {
        self.next_sibling
    }

    pub fn previous_sibling(&self) -> Option<NodeId> {
        self.previous_sibling
    }

    pub fn predecessor(&self) -> Option<NodeId> {
        self.predecessor
    }

    pub fn x(&self) -> usize {
        self.x
    }

    pub fn y(&self) -> usize {
        self.y
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Preferred traversal order of the tree this node belongs to.
    pub fn traversal(&self) -> Traversal {
        self.traversal.get()
    }

    pub fn is_root(&self) -> bool {
        self.predecessor.is_none()
    }
}

/// Arena-backed forest of coordinate trees.
///
/// Every node lives in one generational arena. A node without predecessor is
/// the root of its own tree; detaching a subtree leaves it in the arena as a
/// new root until it is discarded.
#[derive(Debug)]
pub struct TreeArena<T> {
    arena: Arena<TreeNode<T>>,
}

impl<T> Default for TreeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TreeArena<T> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    /// Creates a new single-node tree preferring breadth-first-left order.
    pub fn insert(&mut self, element: T) -> NodeId {
        self.insert_with(element, Traversal::default())
    }

    /// Creates a new single-node tree with the given preferred order.
    #[instrument(level = "trace", skip(self, element))]
    pub fn insert_with(&mut self, element: T, traversal: Traversal) -> NodeId {
        self.arena.insert(TreeNode::new(element, traversal))
    }

    /// Detaches `id` and frees it together with its whole subtree.
    ///
    /// Returns the removed elements in no particular order.
    #[instrument(level = "debug", skip(self))]
    pub fn discard(&mut self, id: NodeId) -> TreeResult<Vec<T>> {
        self.detach(id)?;
        let mut freed = Vec::with_capacity(self.node(id).size);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.arena.remove(current) {
                stack.extend(node.children);
                freed.push(node.element);
            }
        }
        trace!(count = freed.len(), "discarded subtree");
        Ok(freed)
    }

    /// Number of live nodes across all trees of the arena.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.arena.contains(id)
    }

    pub fn get_node(&self, id: NodeId) -> Option<&TreeNode<T>> {
        self.arena.get(id)
    }

    /// Resolves `id`, reporting stale or foreign ids as [`TreeError::MissingNode`].
    pub(crate) fn check(&self, id: NodeId) -> TreeResult<&TreeNode<T>> {
        self.arena.get(id).ok_or(TreeError::MissingNode(id))
    }

    /// Internal lookup for ids already validated or reached through links.
    pub(crate) fn node(&self, id: NodeId) -> &TreeNode<T> {
        &self.arena[id]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut TreeNode<T> {
        &mut self.arena[id]
    }

    pub fn element(&self, id: NodeId) -> TreeResult<&T> {
        Ok(&self.check(id)?.element)
    }

    pub fn element_mut(&mut self, id: NodeId) -> TreeResult<&mut T> {
        self.arena
            .get_mut(id)
            .map(|node| &mut node.element)
            .ok_or(TreeError::MissingNode(id))
    }

    /// Replaces the element of `id`, returning the previous one.
    pub fn set_element(&mut self, id: NodeId, element: T) -> TreeResult<T> {
        Ok(std::mem::replace(self.element_mut(id)?, element))
    }

    pub fn size(&self, id: NodeId) -> TreeResult<usize> {
        Ok(self.check(id)?.size)
    }

    pub fn children(&self, id: NodeId) -> TreeResult<&[NodeId]> {
        Ok(&self.check(id)?.children)
    }

    pub fn child_count(&self, id: NodeId) -> TreeResult<usize> {
        Ok(self.check(id)?.children.len())
    }

    /// Child at position `index`; fails outside `[0, child_count)`.
    pub fn child(&self, id: NodeId, index: usize) -> TreeResult<NodeId> {
        let children = &self.check(id)?.children;
        children.get(index).copied().ok_or(TreeError::OutOfRange {
            index,
            len: children.len(),
        })
    }

    pub fn first_child(&self, id: NodeId) -> TreeResult<Option<NodeId>> {
        Ok(self.check(id)?.children.first().copied())
    }

    pub fn last_child(&self, id: NodeId) -> TreeResult<Option<NodeId>> {
        Ok(self.check(id)?.children.last().copied())
    }

    /// Left-most node of the row `id` belongs to.
    pub fn first_sibling(&self, id: NodeId) -> TreeResult<NodeId> {
        self.check(id)?;
        Ok(self.row_start(id))
    }

    /// Right-most node of the row `id` belongs to.
    pub fn last_sibling(&self, id: NodeId) -> TreeResult<NodeId> {
        self.check(id)?;
        Ok(self.row_end(id))
    }

    /// Deepest node reached by following first children; shares the column of `id`.
    pub fn innermost_left(&self, id: NodeId) -> TreeResult<NodeId> {
        self.check(id)?;
        Ok(self.leftmost(id))
    }

    /// Deepest node reached by following last children; holds the subtree's last column.
    pub fn innermost_right(&self, id: NodeId) -> TreeResult<NodeId> {
        self.check(id)?;
        Ok(self.rightmost(id))
    }

    /// Root of the tree `id` belongs to.
    pub fn root_of(&self, id: NodeId) -> TreeResult<NodeId> {
        self.check(id)?;
        Ok(self.top(id))
    }

    /// Number of columns spanned by the subtree rooted at `id`.
    pub fn breadth(&self, id: NodeId) -> TreeResult<usize> {
        self.check(id)?;
        Ok(self.span(id))
    }

    pub fn traversal(&self, id: NodeId) -> TreeResult<Traversal> {
        Ok(self.check(id)?.traversal.get())
    }

    /// Changes the preferred order of the whole tree `id` belongs to.
    pub fn set_traversal(&mut self, id: NodeId, traversal: Traversal) -> TreeResult<()> {
        self.check(id)?.traversal.set(traversal);
        Ok(())
    }

    /// Whether `a` and `b` belong to the same tree.
    pub fn same_tree(&self, a: NodeId, b: NodeId) -> TreeResult<bool> {
        self.check(a)?;
        self.check(b)?;
        Ok(self.top(a) == self.top(b))
    }

    /// Child positions leading from the root of its tree down to `id`.
    pub fn index_path(&self, id: NodeId) -> TreeResult<Vec<usize>> {
        self.check(id)?;
        let mut path = Vec::with_capacity(self.node(id).y);
        let mut current = id;
        while let Some(parent) = self.node(current).predecessor {
            if let Some(position) = self.node(parent).children.iter().position(|&c| c == current) {
                path.push(position);
            }
            current = parent;
        }
        path.reverse();
        Ok(path)
    }

    /// Follows child positions from `root`; any out-of-range step fails.
    pub fn descend(&self, root: NodeId, path: &[usize]) -> TreeResult<NodeId> {
        self.check(root)?;
        path.iter()
            .try_fold(root, |current, &index| self.child(current, index))
    }

    pub(crate) fn row_start(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(previous) = self.node(current).previous_sibling {
            current = previous;
        }
        current
    }

    pub(crate) fn row_end(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(next) = self.node(current).next_sibling {
            current = next;
        }
        current
    }

    pub(crate) fn leftmost(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(&first) = self.node(current).children.first() {
            current = first;
        }
        current
    }

    pub(crate) fn rightmost(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(&last) = self.node(current).children.last() {
            current = last;
        }
        current
    }

    pub(crate) fn top(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.node(current).predecessor {
            current = parent;
        }
        current
    }

    pub(crate) fn span(&self, id: NodeId) -> usize {
        self.node(self.rightmost(id)).x - self.node(id).x + 1
    }

    /// Pre-order list of the subtree rooted at `id`, without touching row links.
    pub(crate) fn subtree_ids(&self, id: NodeId) -> Vec<NodeId> {
        let mut ids = Vec::with_capacity(self.node(id).size);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            ids.push(current);
            stack.extend(self.node(current).children.iter().rev());
        }
        ids
    }
}
