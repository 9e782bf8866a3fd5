#![deny(warnings)]

use crate::forest::{ParseForest, ParseTree};
use fnv::FnvHashMap;
use std::sync::Arc;

/// Shape of the trees represented by a forest.
///
/// `min_*` and `max_*` range over every concrete derivation. Nodes count
/// derivation steps (terminal leaves count 0) and depth is the height of
/// the tree (a leaf has depth 0). Node counts saturate at `usize::MAX`.
/// `ways` is the number of distinct derivations, `None` when it doesn't
/// fit in a `u64`.
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub struct ForestStats {
    pub min_nodes: usize,
    pub max_nodes: usize,
    pub min_depth: usize,
    pub max_depth: usize,
    pub ways: Option<u64>,
}

type Memo<K> = FnvHashMap<*const ParseForest<K>, ForestStats>;

impl ForestStats {
    const LEAF: ForestStats = ForestStats {
        min_nodes: 0, max_nodes: 0, min_depth: 0, max_depth: 0, ways: Some(1),
    };

    /// Stats of a single forest
    pub fn of<K>(forest: &ParseForest<K>) -> ForestStats {
        compute(forest, &mut Memo::default())
    }

    /// Combined stats of alternative forests (eg: every root of a parse).
    /// Shared sub-forests are only walked once. None if there are no forests.
    pub fn of_all<K>(forests: &[Arc<ParseForest<K>>]) -> Option<ForestStats> {
        let mut memo = Memo::default();
        forests.iter()
            .map(|forest| compute(forest, &mut memo))
            .reduce(ForestStats::either)
    }

    // Stats when choosing either self or other
    fn either(self, other: ForestStats) -> ForestStats {
        ForestStats {
            min_nodes: self.min_nodes.min(other.min_nodes),
            max_nodes: self.max_nodes.max(other.max_nodes),
            min_depth: self.min_depth.min(other.min_depth),
            max_depth: self.max_depth.max(other.max_depth),
            ways: self.ways.zip(other.ways).and_then(|(a, b)| a.checked_add(b)),
        }
    }

    // Stats when combining self and other side by side under a new node
    fn along(self, other: ForestStats) -> ForestStats {
        ForestStats {
            min_nodes: self.min_nodes.saturating_add(other.min_nodes),
            max_nodes: self.max_nodes.saturating_add(other.max_nodes),
            min_depth: self.min_depth.max(other.min_depth),
            max_depth: self.max_depth.max(other.max_depth),
            ways: self.ways.zip(other.ways).and_then(|(a, b)| a.checked_mul(b)),
        }
    }
}

fn tree_stats<K>(tree: &ParseTree<K>, memo: &Memo<K>) -> ForestStats {
    let children = tree.children().iter()
        .map(|child| memo[&Arc::as_ptr(child)])
        .reduce(ForestStats::along);
    match children {
        None => ForestStats::LEAF,
        Some(stats) => ForestStats {
            min_nodes: stats.min_nodes.saturating_add(1),
            max_nodes: stats.max_nodes.saturating_add(1),
            min_depth: stats.min_depth + 1,
            max_depth: stats.max_depth + 1,
            ways: stats.ways,
        },
    }
}

// Post-order walk with an explicit stack, each forest is computed once
fn compute<K>(root: &ParseForest<K>, memo: &mut Memo<K>) -> ForestStats {
    let mut pending = vec![(root, false)];
    while let Some((forest, expanded)) = pending.pop() {
        let ptr: *const ParseForest<K> = forest;
        if memo.contains_key(&ptr) {
            continue;
        }
        if !expanded {
            pending.push((forest, true));
            for child in forest.possibilities().iter().flat_map(ParseTree::children) {
                if !memo.contains_key(&Arc::as_ptr(child)) {
                    pending.push((&**child, false));
                }
            }
            continue;
        }
        let stats = {
            let memo: &Memo<K> = memo;
            forest.possibilities().iter()
                .map(|tree| tree_stats(tree, memo))
                .reduce(ForestStats::either)
                .unwrap_or(ForestStats::LEAF)
        };
        memo.insert(ptr, stats);
    }
    memo[&(root as *const ParseForest<K>)]
}
