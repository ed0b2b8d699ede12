//! Module implement the node model for red-black tree.
//!
//! Nodes are stored in an index arena, [Nodes], and addressed using
//! [NodeId] handles. `left` and `right` links express the ownership
//! structure of the tree, `parent` is a back-reference used only for
//! upward traversal and splicing, it never implies ownership.
//!
//! Nothing in this module knows about balancing, routines here only
//! re-link nodes.

use std::fmt;

/// Color of a node. An absent child is always treated as [Color::Black].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    /// Single character tag used by debug strings.
    pub fn to_tag(&self) -> char {
        match self {
            Color::Red => 'R',
            Color::Black => 'B',
        }
    }
}

/// Direction of a child link, also the direction of a rotation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Dir {
    Left,
    Right,
}

impl Dir {
    /// Return the mirror direction.
    #[inline]
    pub fn flip(self) -> Dir {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

/// Handle to a node inside [Nodes].
#[derive(Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub fn to_index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Node corresponds to a single key in the tree.
#[derive(Clone, Debug)]
pub struct Node<K> {
    key: K,
    color: Color,
    left: Option<NodeId>,   // store: left child
    right: Option<NodeId>,  // store: right child
    parent: Option<NodeId>, // back-reference, not an owner
}

impl<K> Node<K> {
    fn new(key: K, color: Color) -> Node<K> {
        Node {
            key,
            color,
            left: None,
            right: None,
            parent: None,
        }
    }

    #[inline]
    pub fn as_key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub fn to_color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn is_black(&self) -> bool {
        self.color == Color::Black
    }

    #[inline]
    pub fn to_left(&self) -> Option<NodeId> {
        self.left
    }

    #[inline]
    pub fn to_right(&self) -> Option<NodeId> {
        self.right
    }

    #[inline]
    pub fn to_parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn to_child(&self, dir: Dir) -> Option<NodeId> {
        match dir {
            Dir::Left => self.left,
            Dir::Right => self.right,
        }
    }
}

/// Arena of nodes. Every node allocated here lives as long as the arena.
#[derive(Clone, Debug)]
pub struct Nodes<K> {
    nodes: Vec<Node<K>>,
}

impl<K> Default for Nodes<K> {
    fn default() -> Nodes<K> {
        Nodes::new()
    }
}

impl<K> Nodes<K> {
    pub fn new() -> Nodes<K> {
        Nodes { nodes: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Nodes<K> {
        Nodes {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Return number of nodes allocated in this arena.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a detached node, with no children and no parent.
    pub fn alloc(&mut self, key: K, color: Color) -> NodeId {
        self.nodes.push(Node::new(key, color));
        NodeId(self.nodes.len() - 1)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node<K> {
        &self.nodes[id.0]
    }

    #[inline]
    fn get_mut(&mut self, id: NodeId) -> &mut Node<K> {
        &mut self.nodes[id.0]
    }

    #[inline]
    pub fn key(&self, id: NodeId) -> &K {
        &self.get(id).key
    }

    #[inline]
    pub fn color(&self, id: NodeId) -> Color {
        self.get(id).color
    }

    #[inline]
    pub fn set_color(&mut self, id: NodeId, color: Color) {
        self.get_mut(id).color = color
    }

    #[inline]
    pub fn set_red(&mut self, id: NodeId) {
        self.set_color(id, Color::Red)
    }

    #[inline]
    pub fn set_black(&mut self, id: NodeId) {
        self.set_color(id, Color::Black)
    }

    #[inline]
    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).left
    }

    #[inline]
    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).right
    }

    #[inline]
    pub fn child(&self, id: NodeId, dir: Dir) -> Option<NodeId> {
        self.get(id).to_child(dir)
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).parent
    }

    /// Absent node is black.
    #[inline]
    pub fn is_black(&self, id: Option<NodeId>) -> bool {
        id.map_or(true, |id| self.get(id).is_black())
    }

    #[inline]
    pub fn is_red(&self, id: Option<NodeId>) -> bool {
        !self.is_black(id)
    }

    /// Return which slot of its parent `id` occupies, None for a
    /// detached node or a root.
    pub fn side_of(&self, id: NodeId) -> Option<Dir> {
        let parent = self.parent(id)?;
        if self.left(parent) == Some(id) {
            Some(Dir::Left)
        } else if self.right(parent) == Some(id) {
            Some(Dir::Right)
        } else {
            panic!("side_of(): {:?} not a child of its parent ? Call the programmer", id)
        }
    }

    /// Link `child` under `parent` at `dir`, passing None clears the slot.
    ///
    /// A child already in that slot is unlinked from `parent` but keeps
    /// its back-link to `parent`, caller must re-attach or splice it.
    pub fn attach(&mut self, parent: NodeId, dir: Dir, child: Option<NodeId>) {
        match dir {
            Dir::Left => self.get_mut(parent).left = child,
            Dir::Right => self.get_mut(parent).right = child,
        }
        if let Some(child) = child {
            self.get_mut(child).parent = Some(parent);
        }
    }

    #[inline]
    pub fn attach_left(&mut self, parent: NodeId, child: Option<NodeId>) {
        self.attach(parent, Dir::Left, child)
    }

    #[inline]
    pub fn attach_right(&mut self, parent: NodeId, child: Option<NodeId>) {
        self.attach(parent, Dir::Right, child)
    }

    pub fn attach_both(
        &mut self,
        parent: NodeId,
        left: Option<NodeId>,
        right: Option<NodeId>,
    ) {
        self.attach_left(parent, left);
        self.attach_right(parent, right);
    }

    /// Put `new` in the structural position of `old`. `old` is left
    /// detached from its former parent.
    ///
    /// Return true if `old` was the root, in which case the caller must
    /// treat `new` as the new root.
    pub fn splice_into_parent(&mut self, old: NodeId, new: Option<NodeId>) -> bool {
        let parent = self.parent(old);
        let side = self.side_of(old);
        self.get_mut(old).parent = None;

        match (parent, side) {
            (Some(parent), Some(dir)) => {
                self.attach(parent, dir, new);
                false
            }
            (None, _) => {
                if let Some(new) = new {
                    self.get_mut(new).parent = None;
                }
                true
            }
            (Some(_), None) => unreachable!(),
        }
    }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
