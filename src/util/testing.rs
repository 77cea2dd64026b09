use std::env;
use std::rc::Rc;
use std::sync::Once;
use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::arena::{NodeId, TreeArena};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "gridtree=debug");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gridtree=debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Checks every structural invariant of the tree containing `root`.
///
/// Returns a description of the first violation found.
pub fn check_invariants<T>(tree: &TreeArena<T>, root: NodeId) -> Result<(), String> {
    let top = tree.get_node(root).ok_or("root does not exist")?;
    if !top.is_root() || top.x() != 0 || top.y() != 0 {
        return Err(format!("root {root:?} is not a root at the origin"));
    }
    let mut stack = vec![root];
    let mut rows: Vec<Vec<NodeId>> = Vec::new();
    while let Some(id) = stack.pop() {
        let node = tree.get_node(id).ok_or(format!("dangling id {id:?}"))?;
        if !Rc::ptr_eq(&top.traversal, &node.traversal) {
            return Err(format!("{id:?} does not share the tree's traversal cell"));
        }
        let mut size = 1;
        let mut expected_x = node.x();
        for &child in node.children() {
            let c = tree.get_node(child).ok_or(format!("dangling child {child:?}"))?;
            if c.predecessor() != Some(id) {
                return Err(format!("{child:?} does not point back to {id:?}"));
            }
            if c.y() != node.y() + 1 {
                return Err(format!("{child:?} has y {} below y {}", c.y(), node.y()));
            }
            if c.x() != expected_x {
                return Err(format!("{child:?} has x {} expected {}", c.x(), expected_x));
            }
            expected_x += tree.breadth(child).map_err(|e| e.to_string())?;
            size += c.size();
        }
        if size != node.size() {
            return Err(format!("{id:?} has size {} expected {}", node.size(), size));
        }
        if rows.len() <= node.y() {
            rows.resize_with(node.y() + 1, Vec::new);
        }
        rows[node.y()].push(id);
        stack.extend(node.children().iter().rev());
    }
    // pre-order visits each row left to right
    for row in &rows {
        for pair in row.windows(2) {
            let (left, right) = (pair[0], pair[1]);
            let l = tree.get_node(left).ok_or("dangling row node")?;
            let r = tree.get_node(right).ok_or("dangling row node")?;
            if l.next_sibling() != Some(right) || r.previous_sibling() != Some(left) {
                return Err(format!("row link broken between {left:?} and {right:?}"));
            }
            if l.x() >= r.x() {
                return Err(format!("row not increasing at {left:?}"));
            }
        }
        let (Some(&first), Some(&last)) = (row.first(), row.last()) else {
            return Err("empty row".to_string());
        };
        let first = tree.get_node(first).ok_or("dangling row node")?;
        let last = tree.get_node(last).ok_or("dangling row node")?;
        if first.previous_sibling().is_some() || last.next_sibling().is_some() {
            return Err("row ends link outside the tree".to_string());
        }
    }
    Ok(())
}

// test
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_setup() {
        init_test_setup();
    }
}
