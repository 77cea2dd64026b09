//! Lazy iteration and search over the traversal orders.

use tracing::{debug, instrument};

use crate::arena::{NodeId, TreeArena};
use crate::errors::{TreeError, TreeResult};
use crate::traversal::Traversal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    NotStarted,
    Positioned(NodeId),
    Exhausted,
}

/// Single-pass cursor over the subtree of `start` that supports removing the
/// node it last yielded.
///
/// The cursor only holds ids; each call borrows the arena, so the tree can be
/// mutated through [`Cursor::remove`] between steps.
#[derive(Debug, Clone)]
pub struct Cursor {
    start: NodeId,
    order: Traversal,
    state: CursorState,
    previous: Option<NodeId>,
    removable: bool,
}

impl Cursor {
    pub fn new(start: NodeId, order: Traversal) -> Self {
        Self {
            start,
            order,
            state: CursorState::NotStarted,
            previous: None,
            removable: false,
        }
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    pub fn order(&self) -> Traversal {
        self.order
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Moves to the next node in order and returns it, `None` once the subtree is exhausted.
    pub fn advance<T>(&mut self, arena: &TreeArena<T>) -> TreeResult<Option<NodeId>> {
        arena.check(self.start)?;
        let next = match self.state {
            CursorState::NotStarted => {
                self.previous = None;
                Some(self.start)
            }
            CursorState::Positioned(id) => {
                arena.check(id)?;
                self.previous = Some(id);
                arena.step(id, self.order, Some(self.start))
            }
            CursorState::Exhausted => None,
        };
        self.state = next.map_or(CursorState::Exhausted, CursorState::Positioned);
        self.removable = next.is_some();
        Ok(next)
    }

    /// Element of the node last yielded by [`Cursor::advance`].
    pub fn current<'a, T>(&self, arena: &'a TreeArena<T>) -> Option<&'a T> {
        match self.state {
            CursorState::Positioned(id) if self.removable => arena.element(id).ok(),
            _ => None,
        }
    }

    /// Detaches the node last yielded, together with its subtree.
    ///
    /// Returns the id of the detached subtree's root, now a root of its own in
    /// the same arena. The start node is never detached: removing it yields
    /// `Ok(None)` and the walk continues below it.
    #[instrument(level = "debug", skip(self, arena), fields(start = ?self.start))]
    pub fn remove<T>(&mut self, arena: &mut TreeArena<T>) -> TreeResult<Option<NodeId>> {
        if !self.removable {
            return Err(TreeError::InvalidState(
                "remove requires a node yielded by advance and not yet removed",
            ));
        }
        let CursorState::Positioned(id) = self.state else {
            return Err(TreeError::InvalidState("cursor is not positioned"));
        };
        self.removable = false;
        if id == self.start {
            debug!("start node kept in place");
            return Ok(None);
        }
        arena.detach(id)?;
        self.state = self
            .previous
            .map_or(CursorState::NotStarted, CursorState::Positioned);
        Ok(Some(id))
    }
}

/// Borrowing iterator over node ids in one traversal order.
#[derive(Debug, Clone)]
pub struct Walk<'a, T> {
    arena: &'a TreeArena<T>,
    order: Traversal,
    bound: Option<NodeId>,
    next: Option<NodeId>,
}

impl<'a, T> Iterator for Walk<'a, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.arena.step(current, self.order, self.bound);
        Some(current)
    }
}

impl<T> TreeArena<T> {
    /// Walks the subtree of `start` in `order`, starting with `start` itself.
    pub fn walk(&self, start: NodeId, order: Traversal) -> TreeResult<Walk<'_, T>> {
        self.walk_from(start, order, Some(start))
    }

    /// Walks from `from` in `order`, restricted to the subtree of `bound` when given.
    pub fn walk_from(
        &self,
        from: NodeId,
        order: Traversal,
        bound: Option<NodeId>,
    ) -> TreeResult<Walk<'_, T>> {
        self.check(from)?;
        if let Some(bound) = bound {
            self.check(bound)?;
            if !self.descends_from(from, bound) {
                return Err(TreeError::OutsideSubtree { node: from, bound });
            }
        }
        Ok(Walk {
            arena: self,
            order,
            bound,
            next: Some(from),
        })
    }

    /// Walks the subtree of `start` in its tree's preferred order.
    pub fn iter(&self, start: NodeId) -> TreeResult<Walk<'_, T>> {
        let order = self.traversal(start)?;
        self.walk(start, order)
    }

    /// Elements of the subtree of `start` in the preferred order.
    pub fn elements(&self, start: NodeId) -> TreeResult<impl Iterator<Item = &T> + '_> {
        Ok(self.iter(start)?.map(move |id| &self.node(id).element))
    }

    /// First node from `from` onwards, in `order`, whose element satisfies `predicate`.
    #[instrument(level = "trace", skip(self, predicate))]
    pub fn find<P>(
        &self,
        from: NodeId,
        order: Traversal,
        bound: Option<NodeId>,
        mut predicate: P,
    ) -> TreeResult<Option<NodeId>>
    where
        P: FnMut(&T) -> bool,
    {
        Ok(self
            .walk_from(from, order, bound)?
            .find(|&id| predicate(&self.node(id).element)))
    }

    pub fn find_value(
        &self,
        from: NodeId,
        order: Traversal,
        bound: Option<NodeId>,
        value: &T,
    ) -> TreeResult<Option<NodeId>>
    where
        T: PartialEq,
    {
        self.find(from, order, bound, |element| element == value)
    }
}
