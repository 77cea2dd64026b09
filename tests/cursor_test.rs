//! Tests for the removing cursor and search

use gridtree::util::testing::{self, check_invariants};
use gridtree::{Cursor, CursorState, NodeId, Traversal, TreeArena, TreeError};
use rstest::{fixture, rstest};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

/// r
/// ├── a
/// │   ├── a1
/// │   └── a2
/// └── b
///     └── b1
#[fixture]
fn sample() -> (TreeArena<&'static str>, NodeId) {
    let mut tree = TreeArena::new();
    let r = tree.insert("r");
    let a = tree.add(r, "a").unwrap();
    tree.add_all(a, ["a1", "a2"]).unwrap();
    let b = tree.add(r, "b").unwrap();
    tree.add(b, "b1").unwrap();
    (tree, r)
}

fn drain(cursor: &mut Cursor, tree: &TreeArena<&'static str>) -> Vec<&'static str> {
    let mut seen = Vec::new();
    while let Some(id) = cursor.advance(tree).unwrap() {
        seen.push(*tree.element(id).unwrap());
    }
    seen
}

// ============================================================
// Removal while walking
// ============================================================

#[rstest]
#[case(Traversal::BreadthFirstLeft, vec!["r", "a", "b", "b1"])]
#[case(Traversal::DepthFirstLeft, vec!["r", "a", "b", "b1"])]
#[case(Traversal::DepthFirstRight, vec!["r", "b", "b1", "a"])]
fn given_cursor_on_inner_node_when_removing_then_continues_with_successor(
    sample: (TreeArena<&'static str>, NodeId),
    #[case] order: Traversal,
    #[case] expected: Vec<&'static str>,
) {
    let (mut tree, r) = sample;
    let mut cursor = Cursor::new(r, order);
    let mut seen = Vec::new();

    while let Some(id) = cursor.advance(&tree).unwrap() {
        let label = *tree.element(id).unwrap();
        seen.push(label);
        if label == "a" {
            let detached = cursor.remove(&mut tree).unwrap().unwrap();
            assert_eq!(detached, id);
            assert!(tree.get_node(detached).unwrap().is_root());
        }
    }

    assert_eq!(seen, expected);
    assert_eq!(tree.size(r).unwrap(), 3);
    check_invariants(&tree, r).unwrap();
}

#[rstest]
fn given_removed_leaf_when_walk_continues_then_remaining_nodes_follow(
    sample: (TreeArena<&'static str>, NodeId),
) {
    let (mut tree, r) = sample;
    let mut cursor = Cursor::new(r, Traversal::BreadthFirstLeft);
    for _ in 0..4 {
        cursor.advance(&tree).unwrap();
    }
    assert_eq!(cursor.current(&tree), Some(&"a1"));
    cursor.remove(&mut tree).unwrap();
    assert_eq!(cursor.current(&tree), None);

    assert_eq!(drain(&mut cursor, &tree), ["a2", "b1"]);
    assert_eq!(cursor.state(), CursorState::Exhausted);
}

#[rstest]
fn given_exhausted_cursor_when_removing_then_invalid_state(
    sample: (TreeArena<&'static str>, NodeId),
) {
    let (mut tree, r) = sample;
    let mut cursor = Cursor::new(r, Traversal::DepthFirstLeft);
    drain(&mut cursor, &tree);
    assert!(matches!(
        cursor.remove(&mut tree),
        Err(TreeError::InvalidState(_))
    ));
}

#[rstest]
fn given_cursor_on_subtree_when_walking_then_stays_inside(
    sample: (TreeArena<&'static str>, NodeId),
) {
    let (tree, r) = sample;
    let a = tree.child(r, 0).unwrap();
    let mut cursor = Cursor::new(a, Traversal::BreadthFirstRight);
    assert_eq!(drain(&mut cursor, &tree), ["a", "a2", "a1"]);
}

#[rstest]
fn given_discarded_start_when_advancing_then_missing_node(
    sample: (TreeArena<&'static str>, NodeId),
) {
    let (mut tree, r) = sample;
    let b = tree.child(r, 1).unwrap();
    let mut cursor = Cursor::new(b, Traversal::DepthFirstLeft);
    tree.discard(b).unwrap();
    assert_eq!(cursor.advance(&tree), Err(TreeError::MissingNode(b)));
}

// ============================================================
// Search
// ============================================================

#[rstest]
fn given_predicate_when_finding_then_returns_first_in_order(
    sample: (TreeArena<&'static str>, NodeId),
) {
    let (tree, r) = sample;
    let starts_with_a = |e: &&str| e.starts_with('a') && e.len() == 2;

    let left = tree
        .find(r, Traversal::BreadthFirstLeft, None, starts_with_a)
        .unwrap()
        .unwrap();
    let right = tree
        .find(r, Traversal::BreadthFirstRight, None, starts_with_a)
        .unwrap()
        .unwrap();

    assert_eq!(tree.element(left).unwrap(), &"a1");
    assert_eq!(tree.element(right).unwrap(), &"a2");
}

#[rstest]
fn given_bound_when_finding_value_outside_then_absent(sample: (TreeArena<&'static str>, NodeId)) {
    let (tree, r) = sample;
    let a = tree.child(r, 0).unwrap();
    assert_eq!(
        tree.find_value(a, Traversal::DepthFirstLeft, Some(a), &"b1")
            .unwrap(),
        None
    );
    assert!(tree
        .find_value(a, Traversal::DepthFirstLeft, None, &"b1")
        .unwrap()
        .is_some());
    assert!(!tree.contains(a, &"b").unwrap());
    assert!(tree.contains_all(r, &["a2", "b1"]).unwrap());
}
