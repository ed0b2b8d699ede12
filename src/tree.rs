//! Module implement red-black tree insertion and its fixup.
//!
//! [Tree] is a handle over a node arena and the current root. Insertion
//! and rotation may change the root, hence they consume the handle and
//! return the updated one:
//!
//! ```
//! use rbfix::Tree;
//!
//! let mut tree: Tree<u32> = Tree::new();
//! for key in [5, 2, 7, 1, 4, 6, 9].iter() {
//!     tree = tree.insert(*key);
//! }
//! let keys: Vec<u32> = tree.iter().cloned().collect();
//! assert_eq!(keys, vec![1, 2, 4, 5, 6, 7, 9]);
//! assert_eq!(
//!     tree.debug_string(),
//!     "(((. 1:R .) 2:B (. 4:R .)) 5:B ((. 6:R .) 7:B (. 9:R .)))"
//! );
//! ```

use log::{debug, trace};

use std::{
    borrow::Borrow,
    cmp::Ordering,
    fmt, iter, mem,
};

use crate::{
    node::{Color, Dir, NodeId, Nodes},
    rotate::rotate,
    Error, Result,
};

/// Red-black tree of keys, duplicate keys are allowed and ordered by
/// insertion.
pub struct Tree<K> {
    nodes: Nodes<K>,
    root: Option<NodeId>,
}

impl<K> Default for Tree<K> {
    fn default() -> Tree<K> {
        Tree::new()
    }
}

impl<K> Tree<K> {
    /// Create an empty tree.
    pub fn new() -> Tree<K> {
        Tree {
            nodes: Nodes::new(),
            root: None,
        }
    }

    /// Wrap a hand built arena, `root` must be a node in `nodes` with no
    /// parent. Use [Tree::validate] to check the result.
    pub fn from_raw(nodes: Nodes<K>, root: Option<NodeId>) -> Tree<K> {
        Tree { nodes, root }
    }

    pub fn into_raw(self) -> (Nodes<K>, Option<NodeId>) {
        (self.nodes, self.root)
    }

    #[inline]
    pub fn as_nodes(&self) -> &Nodes<K> {
        &self.nodes
    }

    #[inline]
    pub fn to_root(&self) -> Option<NodeId> {
        self.root
    }

    /// Return number of nodes in the arena. For a tree built by insert
    /// this is the number of keys, a hand built arena may also hold nodes
    /// not reachable from root.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }
}

impl<K> Tree<K> {
    /// Insert key into the tree and return the updated tree. Keys equal
    /// to an existing key are placed after it in sort order.
    pub fn insert(self, key: K) -> Tree<K>
    where
        K: Ord,
    {
        let Tree { mut nodes, root } = self;

        let root = match root {
            Some(root) => root,
            None => {
                let root = nodes.alloc(key, Color::Black);
                debug!("insert {:?} as root", root);
                return Tree {
                    nodes,
                    root: Some(root),
                };
            }
        };

        let (mut parent, mut dir) = (root, Dir::Left);
        let mut node = Some(root);
        while let Some(id) = node {
            parent = id;
            dir = match key.cmp(nodes.key(id)) {
                Ordering::Less => Dir::Left,
                Ordering::Equal | Ordering::Greater => Dir::Right,
            };
            node = nodes.child(id, dir);
        }

        let z = nodes.alloc(key, Color::Red);
        nodes.attach(parent, dir, Some(z));
        debug!("insert {:?} under {:?} {:?}", z, parent, dir);

        let root = fixup(&mut nodes, root, z);
        Tree {
            nodes,
            root: Some(root),
        }
    }

    /// Rotate left at `x`, refer to [crate::rotate::rotate_left].
    pub fn rotate_left(self, x: NodeId) -> Tree<K> {
        self.do_rotate(x, Dir::Left)
    }

    /// Rotate right at `x`, refer to [crate::rotate::rotate_right].
    pub fn rotate_right(self, x: NodeId) -> Tree<K> {
        self.do_rotate(x, Dir::Right)
    }

    fn do_rotate(self, x: NodeId, dir: Dir) -> Tree<K> {
        let Tree { mut nodes, root } = self;
        let root = match root {
            Some(root) => rotate(&mut nodes, root, x, dir),
            None => panic!("rotate(): empty tree ? Call the programmer"),
        };
        Tree {
            nodes,
            root: Some(root),
        }
    }

    /// Force root to black. Has no effect on a tree built by insert.
    pub fn blacken_root(mut self) -> Tree<K> {
        if let Some(root) = self.root {
            self.nodes.set_black(root)
        }
        self
    }
}

impl<K> Tree<K> {
    /// Find a node holding `key`. With duplicates, the one closest to
    /// the root is returned.
    pub fn find<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = self.root;
        while let Some(id) = node {
            node = match self.nodes.key(id).borrow().cmp(key) {
                Ordering::Less => self.nodes.right(id),
                Ordering::Greater => self.nodes.left(id),
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    /// Return an iterator over all keys in sort order.
    pub fn iter(&self) -> Iter<'_, K> {
        let mut paths = Vec::default();
        build_iter(&self.nodes, self.root, &mut paths);
        Iter {
            nodes: &self.nodes,
            paths,
        }
    }

    /// Number of black nodes from root to any leaf, root included. Follows
    /// the leftmost path, use [Tree::validate] to check all paths agree.
    pub fn black_height(&self) -> usize {
        let mut node = self.root;
        let mut n_blacks = 0;
        while let Some(id) = node {
            if self.nodes.is_black(Some(id)) {
                n_blacks += 1;
            }
            node = self.nodes.left(id);
        }
        n_blacks
    }

    /// Longest path from root to a leaf, counted in nodes.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut paths = vec![];
        if let Some(root) = self.root {
            paths.push((root, 1));
        }
        while let Some((id, d)) = paths.pop() {
            depth = depth.max(d);
            let children = [self.nodes.left(id), self.nodes.right(id)];
            for child in children.iter().flatten() {
                paths.push((*child, d + 1));
            }
        }
        depth
    }

    /// Render shape, keys and colors, `.` for an absent node and
    /// `(left key:C right)` for a node, `C` being `R` or `B`.
    pub fn debug_string(&self) -> String
    where
        K: fmt::Display,
    {
        self.to_string()
    }

    /// Validate tree with following rules:
    ///
    /// * Root is black.
    /// * From root to any leaf, no consecutive reds allowed in its path.
    /// * Number of blacks should be same under left child and right child.
    /// * Every child links back to its parent.
    /// * Keys are in sorted order.
    ///
    /// Additionally return statistics on the tree, refer to [Stats].
    pub fn validate(&self) -> Result<Stats>
    where
        K: Ord + fmt::Debug,
    {
        let root = match self.root {
            Some(root) => root,
            None => return Ok(Stats::default()),
        };

        if self.nodes.parent(root).is_some() {
            err_at!(Fatal, msg: "root {:?} has a parent", root)?;
        }
        if self.nodes.is_red(Some(root)) {
            err_at!(Fatal, msg: "root {:?} is red", root)?;
        }

        let mut stats = Stats::default();
        let (n_count, n_blacks) =
            validate_tree(&self.nodes, Some(root), false, (0, 0), 1, &mut stats)?;
        if n_count != self.nodes.len() {
            err_at!(Fatal, msg: "mismatch in count {} != {}", n_count, self.nodes.len())?;
        }

        let mut keys = self.iter();
        if let Some(mut prev) = keys.next() {
            for key in keys {
                if key < prev {
                    err_at!(Fatal, msg: "sort key:{:?} after:{:?}", key, prev)?;
                }
                prev = key;
            }
        }

        stats.n_count = n_count;
        stats.n_blacks = n_blacks;
        Ok(stats)
    }
}

/// Restore red-black invariants after `z`, a red leaf, is linked into
/// the tree rooted at `root`. Return the new root, which is black.
pub fn fixup<K>(nodes: &mut Nodes<K>, mut root: NodeId, mut z: NodeId) -> NodeId {
    loop {
        let mut parent = match nodes.parent(z) {
            None => {
                nodes.set_black(z);
                break;
            }
            Some(parent) if nodes.is_black(Some(parent)) => break,
            Some(parent) => parent,
        };
        // a red parent is never the root.
        let grand = match nodes.parent(parent) {
            Some(grand) => grand,
            None => panic!("fixup(): red root {:?} ? Call the programmer", parent),
        };
        let side = match nodes.left(grand) {
            Some(left) if left == parent => Dir::Left,
            _ => Dir::Right,
        };

        match nodes.child(grand, side.flip()) {
            Some(uncle) if nodes.is_red(Some(uncle)) => {
                trace!("fixup {:?} red uncle, recolor {:?}", z, grand);
                nodes.set_black(parent);
                nodes.set_black(uncle);
                nodes.set_red(grand);
                z = grand;
                continue;
            }
            _ => (),
        }

        if nodes.child(parent, side.flip()) == Some(z) {
            trace!("fixup {:?} inner grandchild of {:?}", z, grand);
            root = rotate(nodes, root, parent, side);
            mem::swap(&mut z, &mut parent);
        }

        trace!("fixup {:?} outer grandchild of {:?}", z, grand);
        nodes.set_black(parent);
        nodes.set_red(grand);
        root = rotate(nodes, root, grand, side.flip());
        break;
    }

    nodes.set_black(root);
    root
}

/// Statistics gathered by [Tree::validate].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    /// Number of nodes reachable from root.
    pub n_count: usize,
    /// Number of black nodes from root to any leaf, root included.
    pub n_blacks: usize,
    /// Longest path from root to a leaf, counted in nodes.
    pub depth: usize,
}

fn validate_tree<K>(
    nodes: &Nodes<K>,
    node: Option<NodeId>,
    fromred: bool,
    (mut n_count, mut n_blacks): (usize, usize),
    depth: usize,
    stats: &mut Stats,
) -> Result<(usize, usize)> {
    let node = match node {
        Some(node) => node,
        None => return Ok((n_count, n_blacks)),
    };
    n_count += 1;
    stats.depth = stats.depth.max(depth);

    let red = nodes.is_red(Some(node));
    if fromred && red {
        return err_at!(Fatal, msg: "consecutive reds at {:?}", node)?;
    }
    if !red {
        n_blacks += 1;
    }

    let (left, right) = (nodes.left(node), nodes.right(node));
    for child in [left, right].iter().flatten() {
        if nodes.parent(*child) != Some(node) {
            err_at!(Fatal, msg: "child {:?} does not link back to {:?}", child, node)?;
        }
    }

    let ss = (n_count, n_blacks);
    let (n_count, lb) = validate_tree(nodes, left, red, ss, depth + 1, stats)?;
    let ss = (n_count, n_blacks);
    let (n_count, rb) = validate_tree(nodes, right, red, ss, depth + 1, stats)?;
    if lb != rb {
        err_at!(Fatal, msg: "unbalanced blacks {} {} at {:?}", lb, rb, node)?;
    }

    Ok((n_count, lb))
}

impl<K> Clone for Tree<K>
where
    K: Clone,
{
    /// Copy the tree, node by node in pre-order, into a new arena. Node
    /// handles of the copy do not match those of the source tree.
    fn clone(&self) -> Tree<K> {
        let mut nodes = Nodes::with_capacity(self.nodes.len());
        let root = self.root.map(|root| clone_tree(&self.nodes, root, &mut nodes));
        Tree { nodes, root }
    }
}

fn clone_tree<K>(src: &Nodes<K>, id: NodeId, dst: &mut Nodes<K>) -> NodeId
where
    K: Clone,
{
    let node = src.get(id);
    let new = dst.alloc(node.as_key().clone(), node.to_color());
    let left = node.to_left().map(|left| clone_tree(src, left, dst));
    let right = node.to_right().map(|right| clone_tree(src, right, dst));
    dst.attach_both(new, left, right);
    new
}

impl<K> fmt::Display for Tree<K>
where
    K: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_tree(&self.nodes, self.root, f)
    }
}

impl<K> fmt::Debug for Tree<K>
where
    K: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_tree(&self.nodes, self.root, f)
    }
}

fn fmt_tree<K>(nodes: &Nodes<K>, node: Option<NodeId>, f: &mut fmt::Formatter) -> fmt::Result
where
    K: fmt::Display,
{
    match node {
        None => write!(f, "."),
        Some(id) => {
            write!(f, "(")?;
            fmt_tree(nodes, nodes.left(id), f)?;
            write!(f, " {}:{} ", nodes.key(id), nodes.color(id).to_tag())?;
            fmt_tree(nodes, nodes.right(id), f)?;
            write!(f, ")")
        }
    }
}

impl<K> iter::FromIterator<K> for Tree<K>
where
    K: Ord,
{
    fn from_iter<I>(iter: I) -> Tree<K>
    where
        I: IntoIterator<Item = K>,
    {
        iter.into_iter().fold(Tree::new(), Tree::insert)
    }
}

impl<K> Extend<K> for Tree<K>
where
    K: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = K>,
    {
        let tree = mem::take(self);
        *self = iter.into_iter().fold(tree, Tree::insert);
    }
}

/// In-order iterator over keys, refer to [Tree::iter].
pub struct Iter<'a, K> {
    nodes: &'a Nodes<K>,
    paths: Vec<NodeId>,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.paths.pop()?;
        build_iter(self.nodes, self.nodes.right(id), &mut self.paths);
        Some(self.nodes.key(id))
    }
}

fn build_iter<K>(nodes: &Nodes<K>, mut node: Option<NodeId>, paths: &mut Vec<NodeId>) {
    while let Some(id) = node {
        paths.push(id);
        node = nodes.left(id);
    }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
