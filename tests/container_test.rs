//! Tests for construction helpers and collection-style operations

use gridtree::util::testing::{self, check_invariants};
use gridtree::{Traversal, TreeArena, TreeError};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

// ============================================================
// Construction
// ============================================================

#[test]
fn given_existing_nodes_when_building_with_nodes_then_they_are_reparented() {
    let mut tree = TreeArena::new();
    let old = tree.with_children("old", ["x", "y"]);
    let x = tree.child(old, 0).unwrap();
    let z = tree.insert("z");

    let root = tree.with_nodes("new", [x, z]).unwrap();

    assert_eq!(tree.to_vec(root).unwrap(), ["new", "x", "z"]);
    assert_eq!(tree.to_vec(old).unwrap(), ["old", "y"]);
    check_invariants(&tree, root).unwrap();
    check_invariants(&tree, old).unwrap();
}

#[test]
fn given_repeated_node_when_building_with_nodes_then_reattach_is_idempotent() {
    let mut tree = TreeArena::new();
    let a = tree.insert(1);
    let root = tree.with_nodes(0, [a]).unwrap();
    let top = tree.with_nodes(2, [root, root]).unwrap();

    assert_eq!(tree.children(top).unwrap(), &[root]);
    assert_eq!(tree.size(top).unwrap(), 3);
    assert_eq!(
        tree.attach(a, top),
        Err(TreeError::CycleDetected { parent: a, child: top })
    );
    check_invariants(&tree, top).unwrap();
}

#[test]
fn given_identity_generator_when_expanding_then_builds_binary_tree() {
    let mut tree = TreeArena::new();
    let root = tree.expand(1u32, |&n| if n < 8 { vec![2 * n, 2 * n + 1] } else { vec![] });
    tree.set_traversal(root, Traversal::BreadthFirstLeft).unwrap();

    assert_eq!(tree.size(root).unwrap(), 15);
    assert_eq!(tree.to_vec(root).unwrap(), (1..=15).collect::<Vec<_>>());
    assert_eq!(tree.breadth(root).unwrap(), 8);
    check_invariants(&tree, root).unwrap();
}

#[test]
fn given_seed_and_mapper_when_unfolding_then_elements_are_mapped_seeds() {
    let mut tree = TreeArena::new();
    let root = tree.unfold(
        3usize,
        |&depth| if depth > 0 { vec![depth - 1; 2] } else { vec![] },
        |depth| format!("d{depth}"),
    );
    assert_eq!(tree.size(root).unwrap(), 15);
    assert_eq!(tree.element(root).unwrap(), "d3");
    check_invariants(&tree, root).unwrap();
}

// ============================================================
// Collection surface
// ============================================================

#[test]
fn given_leaf_when_queried_then_is_leaf() {
    let mut tree = TreeArena::new();
    let root = tree.insert('r');
    assert!(tree.is_leaf(root).unwrap());
    tree.add(root, 'c').unwrap();
    assert!(!tree.is_leaf(root).unwrap());
}

#[test]
fn given_values_when_removing_all_then_matching_subtrees_are_freed() {
    let mut tree = TreeArena::new();
    let root = tree.with_children(0, [1, 2, 3, 4]);
    let three = tree.child(root, 2).unwrap();
    tree.add_all(three, [31, 32]).unwrap();

    let mut freed = tree.remove_all(root, &[2, 3]).unwrap();
    freed.sort();

    assert_eq!(freed, [2, 3, 31, 32]);
    assert_eq!(tree.to_vec(root).unwrap(), [0, 1, 4]);
    assert_eq!(tree.len(), 3);
    check_invariants(&tree, root).unwrap();
}

#[test]
fn given_values_when_retaining_then_other_subtrees_are_freed() {
    let mut tree = TreeArena::new();
    let root = tree.with_children(0, [1, 2]);
    let one = tree.child(root, 0).unwrap();
    tree.add_all(one, [11, 12]).unwrap();

    tree.retain_all(root, &[1, 12]).unwrap();

    assert_eq!(tree.to_vec(root).unwrap(), [0, 1, 12]);
    check_invariants(&tree, root).unwrap();
}

#[test]
fn given_node_with_children_when_clearing_then_becomes_leaf() {
    let mut tree = TreeArena::new();
    let root = tree.with_children("r", ["a", "b", "c"]);
    let a = tree.child(root, 0).unwrap();
    tree.add(a, "a1").unwrap();

    let mut freed = tree.clear(root).unwrap();
    freed.sort();

    assert_eq!(freed, ["a", "a1", "b", "c"]);
    assert!(tree.is_leaf(root).unwrap());
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.breadth(root).unwrap(), 1);
}

#[test]
fn given_missing_value_when_removing_then_nothing_changes() {
    let mut tree = TreeArena::new();
    let root = tree.with_children("r", ["a"]);
    assert!(tree.remove_value(root, &"zzz").unwrap().is_empty());
    assert_eq!(tree.size(root).unwrap(), 2);
}
