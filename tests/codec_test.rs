//! Tests for the TOML persisted form

use gridtree::util::testing::{self, check_invariants};
use gridtree::{Traversal, TreeArena, TreeError};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

const NESTED: &str = r#"
[[nodes]]
element = "root"
traversal = "depth-right"
children = 2

[[nodes]]
element = "left"
children = 1

[[nodes]]
element = "left.1"

[[nodes]]
element = "right"
"#;

#[test]
fn given_toml_tree_when_decoding_then_rebuilds_coordinates() {
    let mut tree: TreeArena<String> = TreeArena::new();
    let root = tree.from_toml(NESTED).unwrap();

    assert_eq!(tree.size(root).unwrap(), 4);
    assert_eq!(tree.traversal(root).unwrap(), Traversal::DepthFirstRight);
    let right = tree.child(root, 1).unwrap();
    let node = tree.get_node(right).unwrap();
    assert_eq!((node.x(), node.y()), (1, 1));
    check_invariants(&tree, root).unwrap();
}

#[test]
fn given_decoded_tree_when_encoding_again_then_toml_round_trips() {
    let mut tree: TreeArena<String> = TreeArena::new();
    let root = tree.from_toml(NESTED).unwrap();

    let text = tree.to_toml(root).unwrap();
    let again = tree.from_toml(&text).unwrap();

    assert!(tree.subtree_eq(root, &tree, again).unwrap());
    assert_eq!(tree.traversal(again).unwrap(), Traversal::DepthFirstRight);
    assert!(!text.contains("x ="));
}

#[test]
fn given_detached_subtree_when_encoding_then_preference_is_copied_to_first_record() {
    let mut tree = TreeArena::new();
    let root = tree.insert_with("r".to_string(), Traversal::BreadthFirstRight);
    let child = tree.add(root, "c".to_string()).unwrap();

    let encoded = tree.encode(child).unwrap();

    assert_eq!(encoded.nodes.len(), 1);
    assert_eq!(encoded.nodes[0].traversal, Some(Traversal::BreadthFirstRight));
}

#[test]
fn given_invalid_toml_when_decoding_then_reports_decode_error() {
    let mut tree: TreeArena<String> = TreeArena::new();
    let err = tree.from_toml("[[nodes]]\nelement = 3\n").unwrap_err();
    assert!(matches!(err, TreeError::Decode(_)));
}

#[test]
fn given_child_count_beyond_records_when_decoding_then_truncated() {
    let mut tree: TreeArena<String> = TreeArena::new();
    let err = tree
        .from_toml("[[nodes]]\nelement = \"r\"\nchildren = 3\n")
        .unwrap_err();
    assert_eq!(
        err,
        TreeError::Decode("truncated input: 3 records missing".to_string())
    );
    assert!(tree.is_empty());
}

#[test]
fn given_huge_child_counts_when_decoding_then_reports_overflow() {
    let record = "[[nodes]]\nelement = \"n\"\nchildren = 9223372036854775807\n";
    let mut tree: TreeArena<String> = TreeArena::new();

    let err = tree.from_toml(&record.repeat(3)).unwrap_err();

    assert_eq!(err, TreeError::Decode("child count overflow".to_string()));
    assert!(tree.is_empty());
}
