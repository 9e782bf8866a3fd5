#![deny(warnings)]

use crate::error::Error;
use crate::forest::{ParseForest, ParseTree};
use crate::grammar::Grammar;
use fnv::FnvHashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

/// Label of a flattened forest: rule keys on inner nodes, the input
/// values consumed by terminal rules on the leaves.
#[derive(Clone,Debug,PartialEq,Eq,Hash)]
pub enum Symbol<K, V> {
    Rule(K),
    Value(V),
}

type Flat<K, V> = Arc<ParseForest<Symbol<K, V>>>;

// Alternative children lists a tree flattens into
type Alternatives<K, V> = Vec<Vec<Flat<K, V>>>;

struct Flattener<K, V> {
    temporary: FnvHashMap<K, bool>,
    // one shared leaf per terminal key
    outputs: FnvHashMap<K, Flat<K, V>>,
    forests: FnvHashMap<*const ParseForest<K>, Flat<K, V>>,
    trees: FnvHashMap<*const ParseTree<K>, Arc<Alternatives<K, V>>>,
}

/// Splice forests of temporary rules into their parents.
///
/// A tree with a temporary child is replaced by one tree per alternative
/// of that child, taking the child's own children in its place. Terminal
/// leaves become the value their rule produces. Sub-forests shared in the
/// input stay shared.
pub fn flatten_temporaries<K, V>(
    forests: &[Arc<ParseForest<K>>],
    grammar: &Grammar<K, V>) -> Result<Vec<Flat<K, V>>, Error>
    where K: Clone + Eq + Hash + Debug, V: Clone + Eq + Hash
{
    let mut flattener = Flattener::new(grammar)?;
    forests.iter().map(|forest| {
        if flattener.is_temporary(forest.rule())? {
            return Err(Error::Unflattenable(
                format!("root rule {:?} is temporary", forest.rule())));
        }
        flattener.forest(forest)
    }).collect()
}

// Keys mapped to two different things by `rules`
fn conflicting<'a, K, T>(rules: impl Iterator<Item=(&'a K, T)>) -> (FnvHashMap<K, T>, Vec<&'a K>)
    where K: 'a + Clone + Eq + Hash, T: PartialEq
{
    let mut mapping = FnvHashMap::default();
    let mut conflicts = Vec::new();
    for (key, item) in rules {
        if let Some(previous) = mapping.get(key) {
            if *previous != item && !conflicts.contains(&key) {
                conflicts.push(key);
            }
        } else {
            mapping.insert(key.clone(), item);
        }
    }
    (mapping, conflicts)
}

impl<K: Clone + Eq + Hash + Debug, V: Clone + Eq + Hash> Flattener<K, V> {
    fn new(grammar: &Grammar<K, V>) -> Result<Self, Error> {
        let (temporary, mixed) = conflicting(grammar.non_terminal_rules().iter()
            .map(|rule| (&rule.key, rule.temporary))
            .chain(grammar.terminal_rules().iter().map(|rule| (&rule.key, rule.temporary))));
        if !mixed.is_empty() {
            return Err(Error::Unflattenable(format!(
                "rule keys with both temporary and non-temporary rules: {:?}", mixed)));
        }
        let (outputs, differing) = conflicting(grammar.terminal_rules().iter()
            .map(|rule| (&rule.key, &rule.output)));
        if !differing.is_empty() {
            return Err(Error::Unflattenable(format!(
                "terminal rule keys producing differing outputs: {:?}", differing)));
        }
        let outputs = outputs.into_iter()
            .map(|(key, output)| (key, Arc::new(ParseForest::leaf(Symbol::Value(output.clone())))))
            .collect();
        Ok(Flattener {
            temporary,
            outputs,
            forests: FnvHashMap::default(),
            trees: FnvHashMap::default(),
        })
    }

    fn is_temporary(&self, key: &K) -> Result<bool, Error> {
        self.temporary.get(key).copied().ok_or_else(||
            Error::Unflattenable(format!("rule key {:?} not in grammar", key)))
    }

    fn leaf(&self, key: &K) -> Result<Flat<K, V>, Error> {
        self.outputs.get(key).cloned().ok_or_else(||
            Error::Unflattenable(format!("leaf {:?} has no terminal rule", key)))
    }

    fn forest(&mut self, forest: &Arc<ParseForest<K>>) -> Result<Flat<K, V>, Error> {
        if let Some(flat) = self.forests.get(&Arc::as_ptr(forest)) {
            return Ok(flat.clone());
        }
        let flat = if forest.is_leaf() {
            self.leaf(forest.rule())?
        } else {
            let mut possibilities = Vec::new();
            for tree in forest.possibilities() {
                let alternatives = self.tree(tree)?;
                possibilities.extend(alternatives.iter().cloned().map(ParseTree::new));
            }
            Arc::new(ParseForest::new(Symbol::Rule(forest.rule().clone()), possibilities))
        };
        self.forests.insert(Arc::as_ptr(forest), flat.clone());
        Ok(flat)
    }

    fn tree(&mut self, tree: &ParseTree<K>) -> Result<Arc<Alternatives<K, V>>, Error> {
        let ptr: *const ParseTree<K> = tree;
        if let Some(alternatives) = self.trees.get(&ptr) {
            return Ok(alternatives.clone());
        }
        let mut combinations: Alternatives<K, V> = vec![Vec::new()];
        for child in tree.children() {
            let child_alternatives: Alternatives<K, V> = if child.is_leaf() {
                vec![vec![self.leaf(child.rule())?]]
            } else if self.is_temporary(child.rule())? {
                let mut spliced = Vec::new();
                for child_tree in child.possibilities() {
                    spliced.extend(self.tree(child_tree)?.iter().cloned());
                }
                spliced
            } else {
                vec![vec![self.forest(child)?]]
            };
            combinations = combinations.iter()
                .flat_map(|prefix| child_alternatives.iter().map(move |suffix| {
                    let mut children = prefix.clone();
                    children.extend(suffix.iter().cloned());
                    children
                }))
                .collect();
        }
        let combinations = Arc::new(combinations);
        self.trees.insert(ptr, combinations.clone());
        Ok(combinations)
    }
}
