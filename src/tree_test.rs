use arbitrary::{self, unstructured::Unstructured, Arbitrary};
use rand::{prelude::random, rngs::SmallRng, Rng, SeedableRng};

use super::*;

use std::cmp;

#[test]
fn test_tree() {
    let seed: u64 = random();
    // let seed: u64 = 11762495723061841210;
    println!("test_tree {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut index: Tree<u16> = Tree::new();
    let mut refkeys: Vec<u16> = Vec::new();

    let mut counts = [0_usize; 8];

    for _i in 0..20_000 {
        let bytes = rng.gen::<[u8; 32]>();
        let mut uns = Unstructured::new(&bytes);

        let op: Op<u16> = uns.arbitrary().unwrap();
        // println!("test_tree op -- {:?}", op);
        match op {
            Op::Len => {
                counts[0] += 1;
                assert_eq!(index.len(), refkeys.len());
            }
            Op::IsEmpty => {
                counts[1] += 1;
                assert_eq!(index.is_empty(), refkeys.is_empty());
            }
            Op::Insert(key) => {
                counts[2] += 1;
                index = index.insert(key);
                let off = refkeys.iter().take_while(|k| **k <= key).count();
                refkeys.insert(off, key);
            }
            Op::Validate => {
                counts[3] += 1;
                let stats = index.validate().unwrap();
                assert_eq!(stats.n_count, refkeys.len());
            }
            Op::Find(key) => {
                counts[4] += 1;
                match (index.find(&key), refkeys.binary_search(&key)) {
                    (None, Err(_)) => (),
                    (Some(id), Ok(_)) => assert_eq!(*index.as_nodes().key(id), key),
                    (None, Ok(_)) => panic!("find no key {} in tree", key),
                    (Some(_), Err(_)) => panic!("find no key {} in refkeys", key),
                }
            }
            Op::Iter => {
                counts[5] += 1;
                let a: Vec<u16> = index.iter().cloned().collect();
                assert_eq!(a, refkeys);
            }
            Op::Snapshot => {
                counts[6] += 1;
                let clone = index.clone();
                assert_eq!(clone.debug_string(), index.debug_string());
                index = clone;
            }
            Op::Extend(keys) => {
                counts[7] += 1;
                index.extend(keys.clone());
                for key in keys.into_iter() {
                    let off = refkeys.iter().take_while(|k| **k <= key).count();
                    refkeys.insert(off, key);
                }
            }
        }
    }

    index.validate().unwrap();
    let a: Vec<u16> = index.iter().cloned().collect();
    assert_eq!(a, refkeys);

    println!("test_tree counts {:?} len:{}", counts, index.len());
}

#[derive(Debug, Arbitrary)]
enum Op<K> {
    Len,
    IsEmpty,
    Insert(K),
    Validate,
    Find(K),
    Iter,
    Snapshot,
    Extend(Vec<K>),
}

#[test]
fn test_invariant_closure() {
    let seed: u64 = random();
    println!("test_invariant_closure {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut index: Tree<u32> = Tree::new();
    let mut keys = vec![];
    for i in 0..2_000 {
        let key = rng.gen::<u32>() % 1000;
        keys.push(key);
        index = index.insert(key);

        let stats = index.validate().unwrap();
        assert_eq!(stats.n_count, i + 1);
        assert!(stats.depth <= max_depth(i + 1), "depth {}", stats.depth);
    }

    keys.sort_unstable();
    let a: Vec<u32> = index.iter().cloned().collect();
    assert_eq!(a, keys);
}

#[test]
fn test_empty() {
    let index: Tree<u32> = Tree::new();
    assert!(index.is_empty());
    assert_eq!(index.len(), 0);
    assert_eq!(index.debug_string(), ".");
    assert_eq!(index.validate().unwrap(), Stats::default());
    assert_eq!(index.iter().next(), None);
    assert_eq!(index.find(&10), None);
    assert_eq!(index.clone().debug_string(), ".");
    assert_eq!(index.blacken_root().debug_string(), ".");
}

#[test]
fn test_insert_root() {
    let index: Tree<u32> = Tree::new().insert(10);
    assert_eq!(index.debug_string(), "(. 10:B .)");
    let stats = index.validate().unwrap();
    assert_eq!(stats.n_blacks, 1);
    assert_eq!(stats.depth, 1);
}

#[test]
fn test_insert_scenario() {
    let index: Tree<u32> = vec![5, 2, 7, 1, 4, 6, 9].into_iter().collect();
    assert_eq!(
        index.debug_string(),
        "(((. 1:R .) 2:B (. 4:R .)) 5:B ((. 6:R .) 7:B (. 9:R .)))"
    );
    let a: Vec<u32> = index.iter().cloned().collect();
    assert_eq!(a, vec![1, 2, 4, 5, 6, 7, 9]);

    let root = index.to_root().unwrap();
    assert_eq!(index.as_nodes().color(root), Color::Black);
    let stats = index.validate().unwrap();
    assert_eq!(stats.n_blacks, 2);
    assert_eq!(stats.depth, 3);
}

#[test]
fn test_insert_ascending() {
    let mut index: Tree<u32> = Tree::new();
    let refs = [
        "(. 1:B .)",
        "(. 1:B (. 2:R .))",
        "((. 1:R .) 2:B (. 3:R .))",
        "((. 1:B .) 2:B (. 3:B (. 4:R .)))",
        "((. 1:B .) 2:B ((. 3:R .) 4:B (. 5:R .)))",
    ];
    for (key, refstr) in (1..=5).zip(refs.iter()) {
        index = index.insert(key);
        assert_eq!(index.debug_string(), *refstr, "key {}", key);
    }
    assert_eq!(index.validate().unwrap().depth, 3);

    let n = 1000;
    let index: Tree<u32> = (0..n as u32).collect();
    let stats = index.validate().unwrap();
    assert!(stats.depth <= max_depth(n), "depth {}", stats.depth);
    let index: Tree<u32> = (0..n as u32).rev().collect();
    let stats = index.validate().unwrap();
    assert!(stats.depth <= max_depth(n), "depth {}", stats.depth);
}

#[test]
fn test_insert_inner_grandchild() {
    // right child of a left child, and its mirror.
    for keys in [[3, 1, 2], [1, 3, 2]].iter() {
        let index: Tree<u32> = keys.iter().cloned().collect();
        assert_eq!(index.debug_string(), "((. 1:R .) 2:B (. 3:R .))", "{:?}", keys);
        index.validate().unwrap();
    }
    // left child of a left child, and its mirror.
    for keys in [[3, 2, 1], [1, 2, 3]].iter() {
        let index: Tree<u32> = keys.iter().cloned().collect();
        assert_eq!(index.debug_string(), "((. 1:R .) 2:B (. 3:R .))", "{:?}", keys);
    }
}

#[test]
fn test_fixup_red_uncle() {
    // (((5R . ) 10R .) 20B (30R)) 50B (60B)
    let mut nodes: Nodes<u32> = Nodes::new();
    let (r, g, p, z, u, s) = (
        nodes.alloc(50, Color::Black),
        nodes.alloc(20, Color::Black),
        nodes.alloc(10, Color::Red),
        nodes.alloc(5, Color::Red),
        nodes.alloc(30, Color::Red),
        nodes.alloc(60, Color::Black),
    );
    nodes.attach_both(r, Some(g), Some(s));
    nodes.attach_both(g, Some(p), Some(u));
    nodes.attach_left(p, Some(z));

    let before = black_height(&nodes, Some(g));
    let root = fixup(&mut nodes, r, z);
    assert_eq!(root, r);
    assert_eq!(black_height(&nodes, Some(g)), before);

    let index = Tree::from_raw(nodes, Some(root));
    assert_eq!(
        index.debug_string(),
        "((((. 5:R .) 10:B .) 20:R (. 30:B .)) 50:B (. 60:B .))"
    );
    index.validate().unwrap();
}

#[test]
fn test_fixup_lone_root() {
    let mut nodes: Nodes<u32> = Nodes::new();
    let z = nodes.alloc(1, Color::Red);
    assert_eq!(fixup(&mut nodes, z, z), z);
    assert_eq!(nodes.color(z), Color::Black);
}

#[test]
fn test_duplicates() {
    let seed: u64 = random();
    println!("test_duplicates {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut index: Tree<Dup> = Tree::new();
    let mut refkeys = vec![];
    for seqno in 0..1000 {
        let item = Dup {
            key: rng.gen::<u8>() % 10,
            seqno,
        };
        refkeys.push(item);
        index = index.insert(item);
    }
    index.validate().unwrap();

    // stable sort, equal keys stay in insertion order.
    refkeys.sort_by_key(|item| item.key);
    let a: Vec<(u8, usize)> = index.iter().map(|d| (d.key, d.seqno)).collect();
    let b: Vec<(u8, usize)> = refkeys.iter().map(|d| (d.key, d.seqno)).collect();
    assert_eq!(a, b);

    let index: Tree<u32> = vec![7, 7, 7].into_iter().collect();
    assert_eq!(index.debug_string(), "((. 7:R .) 7:B (. 7:R .))");
}

#[test]
fn test_clone() {
    let index: Tree<u32> = vec![5, 2, 7, 1, 4, 6, 9, 3, 8].into_iter().collect();
    let refstr = index.debug_string();

    let clone = index.clone();
    assert_eq!(clone.debug_string(), refstr);
    assert_eq!(clone.len(), index.len());
    // pre-order copy, root is the first node in the new arena.
    assert_eq!(clone.to_root().unwrap().to_index(), 0);

    let clone = clone.insert(10).insert(11).insert(0);
    assert_ne!(clone.debug_string(), refstr);
    assert_eq!(index.debug_string(), refstr);
    clone.validate().unwrap();
    index.validate().unwrap();
}

#[test]
fn test_blacken_root() {
    let index: Tree<u32> = vec![5, 2, 7, 1].into_iter().collect();
    let refstr = index.debug_string();
    let index = index.blacken_root().blacken_root();
    assert_eq!(index.debug_string(), refstr);
}

#[test]
fn test_extend() {
    let mut index: Tree<u32> = vec![5, 2].into_iter().collect();
    index.extend(vec![7, 1, 4, 6, 9]);
    assert_eq!(
        index.debug_string(),
        "(((. 1:R .) 2:B (. 4:R .)) 5:B ((. 6:R .) 7:B (. 9:R .)))"
    );
    assert_eq!(format!("{}", index), index.debug_string());
}

#[test]
fn test_debug_and_shape() {
    let index: Tree<u32> = vec![5, 2, 7, 1, 4, 6, 9, 3].into_iter().collect();
    assert_eq!(format!("{:?}", index), index.debug_string());
    assert_eq!(format!("{:?}", Tree::<u32>::new()), ".");

    let stats = index.validate().unwrap();
    assert_eq!(index.black_height(), stats.n_blacks);
    assert_eq!(index.depth(), stats.depth);

    assert_eq!(
        format!("{:?}", index),
        "(((. 1:B .) 2:R ((. 3:R .) 4:B .)) 5:B ((. 6:R .) 7:B (. 9:R .)))"
    );
    assert_eq!(index.black_height(), 2);
    assert_eq!(index.depth(), 4);

    let empty: Tree<u32> = Tree::new();
    assert_eq!(empty.black_height(), 0);
    assert_eq!(empty.depth(), 0);
}

#[test]
fn test_len_counts_arena() {
    let mut nodes: Nodes<u32> = Nodes::new();
    let a = nodes.alloc(2, Color::Black);
    nodes.alloc(1, Color::Red);
    let index = Tree::from_raw(nodes, Some(a));
    assert_eq!(index.len(), 2);
    assert_eq!(index.iter().count(), 1);
    assert!(index.validate().is_err());

    let index: Tree<u32> = vec![3, 1, 2].into_iter().collect();
    assert_eq!(index.len(), index.iter().count());
}

#[test]
fn test_validate() {
    // consecutive reds.
    let mut nodes: Nodes<u32> = Nodes::new();
    let (a, b, c) = (
        nodes.alloc(1, Color::Black),
        nodes.alloc(2, Color::Red),
        nodes.alloc(3, Color::Red),
    );
    nodes.attach_right(a, Some(b));
    nodes.attach_right(b, Some(c));
    let index = Tree::from_raw(nodes, Some(a));
    assert!(index.validate().is_err());

    // unbalanced blacks.
    let mut nodes: Nodes<u32> = Nodes::new();
    let (a, b) = (nodes.alloc(1, Color::Black), nodes.alloc(2, Color::Black));
    nodes.attach_right(a, Some(b));
    let index = Tree::from_raw(nodes, Some(a));
    assert!(index.validate().is_err());

    // out of order.
    let mut nodes: Nodes<u32> = Nodes::new();
    let (a, b) = (nodes.alloc(2, Color::Black), nodes.alloc(1, Color::Red));
    nodes.attach_right(a, Some(b));
    let index = Tree::from_raw(nodes, Some(a));
    let err = index.validate().unwrap_err();
    assert!(err.to_string().contains("Fatal"), "{}", err);

    // detached node.
    let mut nodes: Nodes<u32> = Nodes::new();
    let a = nodes.alloc(2, Color::Black);
    nodes.alloc(1, Color::Red);
    let index = Tree::from_raw(nodes, Some(a));
    assert!(index.validate().is_err());
}

#[derive(Clone, Copy, Debug)]
struct Dup {
    key: u8,
    seqno: usize,
}

impl PartialEq for Dup {
    fn eq(&self, other: &Dup) -> bool {
        self.key == other.key
    }
}

impl Eq for Dup {}

impl PartialOrd for Dup {
    fn partial_cmp(&self, other: &Dup) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Dup {
    fn cmp(&self, other: &Dup) -> cmp::Ordering {
        self.key.cmp(&other.key)
    }
}

// upper bound on depth of a red-black tree with n nodes.
fn max_depth(n: usize) -> usize {
    (2.0 * ((n + 1) as f64).log2()).floor() as usize
}

// count of black nodes from `id` down its leftmost path, `id` included.
fn black_height(nodes: &Nodes<u32>, id: Option<NodeId>) -> usize {
    match id {
        Some(id) if nodes.is_black(Some(id)) => 1 + black_height(nodes, nodes.left(id)),
        Some(id) => black_height(nodes, nodes.left(id)),
        None => 0,
    }
}
