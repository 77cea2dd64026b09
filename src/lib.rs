//! Ordered multi-way trees whose nodes carry a `(x, y)` coordinate.
//!
//! `y` is the depth and `x` the column of a node, so a subtree occupies a
//! contiguous column range. Attach and detach keep coordinates, subtree sizes
//! and same-depth row links current incrementally; traversals use them to
//! stay inside a subtree without walking up the ancestry.

pub mod arena;
pub mod cli;
pub mod codec;
pub mod config;
pub mod container;
pub mod cursor;
pub mod errors;
pub mod exitcode;
pub mod format;
pub mod linkage;
pub mod ops;
pub mod traversal;
pub mod util;

pub use arena::{NodeId, TreeArena, TreeNode};
pub use codec::{Encoded, EncodedNode};
pub use config::{Settings, SettingsError};
pub use cursor::{Cursor, CursorState, Walk};
pub use errors::{TreeError, TreeResult};
pub use ops::structural_eq;
pub use traversal::Traversal;
