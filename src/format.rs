//! Textual renderings of a tree.

use std::fmt::Display;

use termtree::Tree;

use crate::arena::{NodeId, TreeArena};
use crate::errors::TreeResult;

enum Piece {
    Node(NodeId),
    Text(&'static str),
}

impl<T: Display> TreeArena<T> {
    /// Structured one-line dump of the subtree of `root`.
    ///
    /// `{ x: 0, y: 0, size: 2, element: r, descendants: { size: 1, items: [ .. ] } }`
    /// with backslashes and double quotes in elements escaped.
    pub fn dump(&self, root: NodeId) -> TreeResult<String> {
        self.check(root)?;
        let mut out = String::new();
        let mut pending = vec![Piece::Node(root)];
        while let Some(piece) = pending.pop() {
            let id = match piece {
                Piece::Text(text) => {
                    out.push_str(text);
                    continue;
                }
                Piece::Node(id) => id,
            };
            let node = self.node(id);
            out.push_str(&format!(
                "{{ x: {}, y: {}, size: {}, element: {}, descendants: {{ size: {}, items: [ ",
                node.x,
                node.y,
                node.size,
                escape(&node.element.to_string()),
                node.children.len()
            ));
            pending.push(Piece::Text("] } }"));
            for (position, &child) in node.children.iter().enumerate().rev() {
                let last = position + 1 == node.children.len();
                pending.push(Piece::Text(if last { " " } else { ", " }));
                pending.push(Piece::Node(child));
            }
        }
        Ok(out)
    }

    /// Builds a [`termtree::Tree`] of the subtree of `root` for terminal display.
    pub fn to_tree_string(&self, root: NodeId, show_coordinates: bool) -> TreeResult<Tree<String>> {
        self.check(root)?;
        let mut built: Vec<Tree<String>> = Vec::new();
        for id in self.subtree_ids(root).into_iter().rev() {
            let node = self.node(id);
            let label = if show_coordinates {
                format!("{} ({}, {})", node.element, node.x, node.y)
            } else {
                node.element.to_string()
            };
            let leaves: Vec<_> = (0..node.children.len())
                .filter_map(|_| built.pop())
                .collect();
            built.push(Tree::new(label).with_leaves(leaves));
        }
        Ok(built.pop().unwrap_or_else(|| Tree::new(String::new())))
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
