#![deny(warnings)]

use std::sync::Arc;

/// Every derivation of `rule` over one span of the input.
///
/// Sub-forests are shared by `Arc`: when two derivations use the same rule
/// over the same sub-span they point at the same `ParseForest`.
#[derive(Debug,PartialEq,Eq)]
pub struct ParseForest<K> {
    rule: K,
    possibilities: Vec<ParseTree<K>>,
}

/// One derivation choice of a forest.
/// Parser output has two children (left, right) or none for a terminal leaf.
#[derive(Debug,PartialEq,Eq)]
pub struct ParseTree<K> {
    children: Vec<Arc<ParseForest<K>>>,
}

impl<K> ParseForest<K> {
    pub fn new(rule: K, possibilities: Vec<ParseTree<K>>) -> Self {
        ParseForest{rule, possibilities}
    }

    /// Forest of a terminal match: a single tree without children
    pub fn leaf(rule: K) -> Self {
        ParseForest{rule, possibilities: vec![ParseTree::leaf()]}
    }

    pub fn rule(&self) -> &K {
        &self.rule
    }

    pub fn possibilities(&self) -> &[ParseTree<K>] {
        &self.possibilities
    }

    pub fn is_leaf(&self) -> bool {
        self.possibilities.iter().all(ParseTree::is_leaf)
    }

    pub fn is_ambiguous(&self) -> bool {
        self.possibilities.len() > 1
    }
}

impl<K> ParseTree<K> {
    pub fn new(children: Vec<Arc<ParseForest<K>>>) -> Self {
        ParseTree{children}
    }

    pub fn leaf() -> Self {
        ParseTree{children: Vec::new()}
    }

    pub fn binary(left: Arc<ParseForest<K>>, right: Arc<ParseForest<K>>) -> Self {
        ParseTree{children: vec![left, right]}
    }

    pub fn children(&self) -> &[Arc<ParseForest<K>>] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn left(&self) -> Option<&Arc<ParseForest<K>>> {
        self.children.first()
    }

    pub fn right(&self) -> Option<&Arc<ParseForest<K>>> {
        self.children.get(1)
    }
}
