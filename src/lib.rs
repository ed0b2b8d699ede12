//! Package implement the insertion kernel of a red-black tree.
//!
//! A red-black tree keeps a binary search tree balanced by coloring its
//! nodes and holding following invariants after every operation:
//!
//! * Every node is red or black, an absent child counts as black.
//! * The root is black.
//! * No red node has a red child.
//! * Every path from a node to an absent leaf has the same number of
//!   black nodes.
//! * In-order traversal yields keys in sorted order.
//!
//! Package is organised in layers, each one built on the previous:
//!
//! * [node] implements nodes, stored in an index arena, and the linking
//!   primitives attach and splice.
//! * [rotate] implements left and right rotation.
//! * [tree] implements [Tree], insertion and the fixup that restores
//!   the invariants after a new red leaf is linked in.
//!
//! Insertion may change the root, [Tree] is hence updated by return:
//!
//! ```
//! use rbfix::Tree;
//!
//! let mut tree: Tree<u32> = Tree::new();
//! assert_eq!(tree.is_empty(), true);
//!
//! for key in 1..=5 {
//!     tree = tree.insert(key);
//! }
//! assert_eq!(tree.len(), 5);
//!
//! let stats = tree.validate().unwrap();
//! assert_eq!(stats.depth, 3);
//! assert_eq!(tree.debug_string(), "((. 1:B .) 2:B ((. 3:R .) 4:B (. 5:R .)))");
//! ```
//!
//! - Duplicate keys are allowed, they follow earlier equal keys in sort
//!   order.
//! - No deletion, no values.
//! - Not thread safe, wrap the tree in a lock to share it between threads.

use std::{error, fmt, result};

// Short form to compose Error values, prefixed with the location.
//
// ```ignore
// use crate::Error;
// err_at!(Fatal, msg: "consecutive reds at {:?}", node);
// ```
//
macro_rules! err_at {
    ($v:ident, msg: $($arg:expr),+) => {{
        let prefix = format!("{}:{}", file!(), line!());
        Err(Error::$v(prefix, format!($($arg),+)))
    }};
}

pub mod node;
pub mod rotate;
pub mod tree;

pub use node::{Color, Dir, NodeId, Nodes};
pub use tree::{Stats, Tree};

/// Error variants that are returned by this package's API.
///
/// Each variant carries a prefix, typically identifying the
/// error location.
pub enum Error {
    /// Tree is not a valid red-black tree.
    Fatal(String, String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        use Error::*;

        match self {
            Fatal(p, msg) => write!(f, "{} Fatal: {}", p, msg),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        write!(f, "{}", self)
    }
}

impl error::Error for Error {}

/// Type alias for Result return type, used by this package.
pub type Result<T> = result::Result<T, Error>;
