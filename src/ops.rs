use itertools::{EitherOrBoth, Itertools};
use tracing::{debug, instrument};

use crate::arena::{NodeId, TreeArena};
use crate::errors::TreeResult;
use crate::traversal::Traversal;

/// Pre-order copy plan: the root element plus every other element paired with
/// the plan position of its parent (root = 0).
type Blueprint<U> = (U, Vec<(U, usize)>);

impl<T> TreeArena<T> {
    /// Builds a structurally identical tree in a new arena with every element mapped.
    ///
    /// The new tree keeps the preferred traversal order of the source.
    #[instrument(level = "debug", skip(self, mapper))]
    pub fn translate<U, F>(&self, root: NodeId, mapper: F) -> TreeResult<(TreeArena<U>, NodeId)>
    where
        F: FnMut(&T) -> U,
    {
        let traversal = self.traversal(root)?;
        let plan = self.blueprint(root, mapper);
        let mut target = TreeArena::new();
        let top = target.realize(plan, traversal);
        debug!(size = target.len(), "translated tree");
        Ok((target, top))
    }

    /// Deep copy of the subtree of `root` as a new tree in this arena.
    pub fn duplicate(&mut self, root: NodeId) -> TreeResult<NodeId>
    where
        T: Clone,
    {
        let traversal = self.traversal(root)?;
        let plan = self.blueprint(root, T::clone);
        Ok(self.realize(plan, traversal))
    }

    /// Structural equality with `==` on elements.
    pub fn subtree_eq(&self, root: NodeId, other: &TreeArena<T>, other_root: NodeId) -> TreeResult<bool>
    where
        T: PartialEq,
    {
        structural_eq(self, root, other, other_root, |a, b| a == b)
    }

    fn blueprint<U>(&self, root: NodeId, mut mapper: impl FnMut(&T) -> U) -> Blueprint<U> {
        let top = mapper(&self.node(root).element);
        let mut rest = Vec::with_capacity(self.node(root).size - 1);
        let mut stack: Vec<(NodeId, usize)> =
            self.node(root).children.iter().rev().map(|&c| (c, 0)).collect();
        while let Some((id, parent)) = stack.pop() {
            rest.push((mapper(&self.node(id).element), parent));
            let position = rest.len();
            stack.extend(self.node(id).children.iter().rev().map(|&c| (c, position)));
        }
        (top, rest)
    }

    fn realize(&mut self, (top, rest): Blueprint<T>, traversal: Traversal) -> NodeId {
        let root = self.insert_with(top, traversal);
        let mut ids = Vec::with_capacity(rest.len() + 1);
        ids.push(root);
        for (element, parent) in rest {
            let id = self.insert_with(element, traversal);
            self.link(ids[parent], id);
            ids.push(id);
        }
        root
    }
}

/// Compares two trees node by node in depth-first-left order.
///
/// Sizes are compared first; then every pair of nodes must have the same number
/// of children and satisfy `cmp`. The order is fixed so that neither tree's
/// preferred traversal affects the result.
pub fn structural_eq<A, B, F>(
    a: &TreeArena<A>,
    a_root: NodeId,
    b: &TreeArena<B>,
    b_root: NodeId,
    mut cmp: F,
) -> TreeResult<bool>
where
    F: FnMut(&A, &B) -> bool,
{
    if a.size(a_root)? != b.size(b_root)? {
        return Ok(false);
    }
    let left = a.walk(a_root, Traversal::DepthFirstLeft)?;
    let right = b.walk(b_root, Traversal::DepthFirstLeft)?;
    for pair in left.zip_longest(right) {
        let EitherOrBoth::Both(x, y) = pair else {
            return Ok(false);
        };
        let (x, y) = (a.node(x), b.node(y));
        if x.children.len() != y.children.len() || !cmp(&x.element, &y.element) {
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_two_three() -> (TreeArena<i32>, NodeId) {
        let mut tree = TreeArena::new();
        let root = tree.insert_with(1, Traversal::DepthFirstRight);
        for value in [2, 3] {
            let id = tree.insert(value);
            tree.attach(root, id).unwrap();
        }
        (tree, root)
    }

    #[test]
    fn given_tree_when_translating_then_keeps_shape_and_order() {
        let (tree, root) = one_two_three();
        let (mapped, top) = tree.translate(root, |v| v.to_string()).unwrap();

        assert_eq!(mapped.traversal(top).unwrap(), Traversal::DepthFirstRight);
        assert_eq!(mapped.size(top).unwrap(), 3);
        let labels: Vec<_> = mapped
            .walk(top, Traversal::BreadthFirstLeft)
            .unwrap()
            .map(|id| mapped.element(id).unwrap().clone())
            .collect();
        assert_eq!(labels, ["1", "2", "3"]);
    }

    #[test]
    fn given_same_size_different_shape_when_comparing_then_not_equal() {
        let (flat, flat_root) = one_two_three();
        let mut chain = TreeArena::new();
        let top = chain.insert(1);
        let two = chain.insert(2);
        let three = chain.insert(3);
        chain.attach(top, two).unwrap();
        chain.attach(two, three).unwrap();

        assert!(!flat.subtree_eq(flat_root, &chain, top).unwrap());
    }

    #[test]
    fn given_subtree_when_duplicating_then_copy_is_independent_root() {
        let (mut tree, root) = one_two_three();
        let copy = tree.duplicate(root).unwrap();

        assert_ne!(copy, root);
        assert!(tree.get_node(copy).unwrap().is_root());
        assert!(tree.subtree_eq(root, &tree, copy).unwrap());
        tree.set_element(copy, 9).unwrap();
        assert_eq!(tree.element(root).unwrap(), &1);
    }
}
