//! Construction helpers and collection-style operations.
//!
//! Nothing here touches links directly: building reduces to `attach` and
//! removal to a [`Cursor`] walk followed by [`TreeArena::discard`].

use std::collections::VecDeque;

use tracing::{debug, instrument};

use crate::arena::{NodeId, TreeArena};
use crate::cursor::Cursor;
use crate::errors::TreeResult;

impl<T> TreeArena<T> {
    /// New tree with one leaf child per value, in order.
    pub fn with_children<I>(&mut self, element: T, values: I) -> NodeId
    where
        I: IntoIterator<Item = T>,
    {
        let root = self.insert(element);
        for value in values {
            let child = self.insert(value);
            self.link(root, child);
        }
        root
    }

    /// New tree whose children are the given nodes, re-parented in order.
    pub fn with_nodes<I>(&mut self, element: T, nodes: I) -> TreeResult<NodeId>
    where
        I: IntoIterator<Item = NodeId>,
    {
        let root = self.insert(element);
        for node in nodes {
            self.attach(root, node)?;
        }
        Ok(root)
    }

    /// Grows a tree from `seed`: every seed is mapped to an element and
    /// `generator` yields the seeds of its children.
    ///
    /// Runs level by level without recursion; a generator that never returns an
    /// empty sequence does not terminate.
    #[instrument(level = "debug", skip_all)]
    pub fn unfold<S, G, M, I>(&mut self, seed: S, mut generator: G, mut mapper: M) -> NodeId
    where
        G: FnMut(&S) -> I,
        I: IntoIterator<Item = S>,
        M: FnMut(&S) -> T,
    {
        let root = self.insert(mapper(&seed));
        let mut pending = VecDeque::from([(seed, root)]);
        while let Some((seed, parent)) = pending.pop_front() {
            for child_seed in generator(&seed) {
                let child = self.insert(mapper(&child_seed));
                self.link(parent, child);
                pending.push_back((child_seed, child));
            }
        }
        debug!(size = self.node(root).size, "unfolded tree");
        root
    }

    /// Like [`TreeArena::unfold`] with the elements themselves as seeds.
    pub fn expand<G, I>(&mut self, element: T, mut generator: G) -> NodeId
    where
        G: FnMut(&T) -> I,
        I: IntoIterator<Item = T>,
    {
        let root = self.insert(element);
        let mut pending = VecDeque::from([root]);
        while let Some(parent) = pending.pop_front() {
            let values: Vec<T> = generator(&self.node(parent).element).into_iter().collect();
            for value in values {
                let child = self.insert(value);
                self.link(parent, child);
                pending.push_back(child);
            }
        }
        root
    }

    /// True when `id` has no children.
    pub fn is_leaf(&self, id: NodeId) -> TreeResult<bool> {
        Ok(self.size(id)? <= 1)
    }

    /// Whether the subtree of `root` holds `value`, searched in the preferred order.
    pub fn contains(&self, root: NodeId, value: &T) -> TreeResult<bool>
    where
        T: PartialEq,
    {
        let order = self.traversal(root)?;
        Ok(self.find_value(root, order, Some(root), value)?.is_some())
    }

    pub fn contains_all<'v, I>(&self, root: NodeId, values: I) -> TreeResult<bool>
    where
        T: PartialEq + 'v,
        I: IntoIterator<Item = &'v T>,
    {
        for value in values {
            if !self.contains(root, value)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Wraps `value` in a new node appended as the last child of `parent`.
    pub fn add(&mut self, parent: NodeId, value: T) -> TreeResult<NodeId> {
        self.check(parent)?;
        let child = self.insert(value);
        self.link(parent, child);
        Ok(child)
    }

    pub fn add_all<I>(&mut self, parent: NodeId, values: I) -> TreeResult<Vec<NodeId>>
    where
        I: IntoIterator<Item = T>,
    {
        self.check(parent)?;
        Ok(values
            .into_iter()
            .map(|value| {
                let child = self.insert(value);
                self.link(parent, child);
                child
            })
            .collect())
    }

    /// Discards every subtree below `root` whose top element satisfies `predicate`.
    ///
    /// `root` itself always stays. Returns the freed elements.
    #[instrument(level = "debug", skip(self, predicate))]
    pub fn remove_where<P>(&mut self, root: NodeId, mut predicate: P) -> TreeResult<Vec<T>>
    where
        P: FnMut(&T) -> bool,
    {
        let mut cursor = Cursor::new(root, self.traversal(root)?);
        let mut freed = Vec::new();
        while let Some(id) = cursor.advance(self)? {
            if !predicate(&self.node(id).element) {
                continue;
            }
            if let Some(detached) = cursor.remove(self)? {
                freed.extend(self.discard(detached)?);
            }
        }
        debug!(count = freed.len(), "removed elements");
        Ok(freed)
    }

    /// Removes every subtree headed by `value`.
    pub fn remove_value(&mut self, root: NodeId, value: &T) -> TreeResult<Vec<T>>
    where
        T: PartialEq,
    {
        self.remove_where(root, |element| element == value)
    }

    pub fn remove_all(&mut self, root: NodeId, values: &[T]) -> TreeResult<Vec<T>>
    where
        T: PartialEq,
    {
        self.remove_where(root, |element| values.contains(element))
    }

    pub fn retain_all(&mut self, root: NodeId, values: &[T]) -> TreeResult<Vec<T>>
    where
        T: PartialEq,
    {
        self.remove_where(root, |element| !values.contains(element))
    }

    /// Discards every child of `id`, leaving it a leaf.
    pub fn clear(&mut self, id: NodeId) -> TreeResult<Vec<T>> {
        let children = self.children(id)?.to_vec();
        let mut freed = Vec::with_capacity(self.node(id).size - 1);
        for child in children {
            freed.extend(self.discard(child)?);
        }
        Ok(freed)
    }

    /// Elements of the subtree of `root` in the preferred order.
    pub fn to_vec(&self, root: NodeId) -> TreeResult<Vec<T>>
    where
        T: Clone,
    {
        let mut values = Vec::with_capacity(self.size(root)?);
        values.extend(self.elements(root)?.cloned());
        Ok(values)
    }
}
