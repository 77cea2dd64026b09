//! Flat pre-order persisted form.
//!
//! Only elements, child counts and the root's traversal preference are
//! stored; coordinates and sizes are rebuilt by attaching on decode.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::arena::{NodeId, TreeArena};
use crate::errors::{TreeError, TreeResult};
use crate::traversal::Traversal;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedNode<T> {
    pub element: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traversal: Option<Traversal>,
    #[serde(default)]
    pub children: usize,
}

/// A tree as its nodes in depth-first-left order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encoded<T> {
    pub nodes: Vec<EncodedNode<T>>,
}

impl<T> TreeArena<T> {
    /// Encodes the subtree of `root`, with its tree's preferred order on the first record.
    pub fn encode(&self, root: NodeId) -> TreeResult<Encoded<T>>
    where
        T: Clone,
    {
        let traversal = self.traversal(root)?;
        let nodes = self
            .walk(root, Traversal::DepthFirstLeft)?
            .map(|id| {
                let node = self.node(id);
                EncodedNode {
                    element: node.element.clone(),
                    traversal: (id == root).then_some(traversal),
                    children: node.children.len(),
                }
            })
            .collect();
        Ok(Encoded { nodes })
    }

    /// Rebuilds an encoded tree as a new root in this arena.
    ///
    /// The record layout is checked before anything is inserted, so malformed
    /// input leaves the arena untouched.
    #[instrument(level = "debug", skip_all, fields(records = encoded.nodes.len()))]
    pub fn decode(&mut self, encoded: Encoded<T>) -> TreeResult<NodeId> {
        validate(&encoded.nodes)?;
        let mut records = encoded.nodes.into_iter();
        let Some(first) = records.next() else {
            return Err(TreeError::Decode("no root record".into()));
        };
        let root = self.insert_with(first.element, first.traversal.unwrap_or_default());
        // (node, children still expected)
        let mut open = vec![(root, first.children)];
        for record in records {
            while matches!(open.last(), Some((_, 0))) {
                open.pop();
            }
            let Some((parent, remaining)) = open.last_mut() else {
                return Err(TreeError::Decode("record without parent".into()));
            };
            *remaining -= 1;
            let parent = *parent;
            let child = self.insert_with(record.element, Traversal::default());
            self.link(parent, child);
            open.push((child, record.children));
        }
        debug!(size = self.node(root).size, "decoded tree");
        Ok(root)
    }

    pub fn to_toml(&self, root: NodeId) -> TreeResult<String>
    where
        T: Clone + Serialize,
    {
        let encoded = self.encode(root)?;
        toml::to_string_pretty(&encoded).map_err(|e| TreeError::Encode(e.to_string()))
    }

    pub fn from_toml(&mut self, input: &str) -> TreeResult<NodeId>
    where
        T: DeserializeOwned,
    {
        let encoded: Encoded<T> =
            toml::from_str(input).map_err(|e| TreeError::Decode(e.to_string()))?;
        self.decode(encoded)
    }
}

fn validate<T>(nodes: &[EncodedNode<T>]) -> TreeResult<()> {
    if nodes.is_empty() {
        return Err(TreeError::Decode("no root record".into()));
    }
    let mut expected = 1usize;
    for (position, node) in nodes.iter().enumerate() {
        if expected == 0 {
            return Err(TreeError::Decode(format!(
                "trailing record at position {}",
                position
            )));
        }
        if position > 0 && node.traversal.is_some() {
            return Err(TreeError::Decode(format!(
                "traversal preference on non-root record at position {}",
                position
            )));
        }
        expected = (expected - 1)
            .checked_add(node.children)
            .ok_or_else(|| TreeError::Decode("child count overflow".into()))?;
    }
    if expected > 0 {
        return Err(TreeError::Decode(format!(
            "truncated input: {} records missing",
            expected
        )));
    }
    Ok(())
}
