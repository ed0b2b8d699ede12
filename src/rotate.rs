//! Module implement rotation, the only shape changing primitive used by
//! insert-fixup.
//!
//! Rotations never touch colors and run in constant time.

use log::trace;

use crate::node::{Dir, NodeId, Nodes};

//              (i)                       (i)
//               |                         |
//               x                         y
//              / \                       / \
//             a   y        ==>          x   c
//                / \                   / \
//               b   c                 a   b
//
/// Rotate left at `x`, `x` must have a right child. Return the tree
/// root, which is the promoted child if `x` was the root.
pub fn rotate_left<K>(nodes: &mut Nodes<K>, root: NodeId, x: NodeId) -> NodeId {
    rotate(nodes, root, x, Dir::Left)
}

//              (i)                       (i)
//               |                         |
//               x                         y
//              / \                       / \
//             y   c        ==>          a   x
//            / \                           / \
//           a   b                         b   c
//
/// Rotate right at `x`, `x` must have a left child. Return the tree
/// root, which is the promoted child if `x` was the root.
pub fn rotate_right<K>(nodes: &mut Nodes<K>, root: NodeId, x: NodeId) -> NodeId {
    rotate(nodes, root, x, Dir::Right)
}

/// Rotate at `x` in direction `dir`: the child of `x` on the opposite
/// side of `dir` is promoted into the position of `x`, and `x` becomes
/// its `dir` child.
pub fn rotate<K>(nodes: &mut Nodes<K>, root: NodeId, x: NodeId, dir: Dir) -> NodeId {
    let y = match nodes.child(x, dir.flip()) {
        Some(y) => y,
        None => panic!(
            "rotate(): {:?} at {:?} without {:?} child ? Call the programmer",
            dir,
            x,
            dir.flip()
        ),
    };
    trace!("rotate {:?} at {:?} promoting {:?}", dir, x, y);

    let inner = nodes.child(y, dir);
    nodes.attach(x, dir.flip(), inner);
    let was_root = nodes.splice_into_parent(x, Some(y));
    nodes.attach(y, dir, Some(x));

    if was_root {
        y
    } else {
        root
    }
}

#[cfg(test)]
#[path = "rotate_test.rs"]
mod rotate_test;
