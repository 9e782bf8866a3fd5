#![deny(warnings)]

use crate::grammar::Grammar;
use fnv::FnvHashMap;
use std::hash::Hash;

/// Lookup tables derived from a `Grammar` so that joining two cells of the
/// chart is a double hash lookup instead of a scan over every rule.
#[derive(Clone,Debug)]
pub struct RuleIndex<K, V> {
    // value -> keys of terminal rules producing it
    produces: FnvHashMap<V, Vec<K>>,
    // left key -> right key -> keys of rules joining them
    joins: FnvHashMap<K, FnvHashMap<K, Vec<K>>>,
}

fn push_unique<K: PartialEq>(keys: &mut Vec<K>, key: K) {
    if !keys.contains(&key) {
        keys.push(key);
    }
}

impl<K, V> RuleIndex<K, V>
    where K: Clone + Eq + Hash, V: Clone + Eq + Hash
{
    pub fn new(grammar: &Grammar<K, V>) -> Self {
        let mut produces: FnvHashMap<V, Vec<K>> = FnvHashMap::default();
        for rule in grammar.terminal_rules() {
            push_unique(produces.entry(rule.output.clone()).or_default(),
                        rule.key.clone());
        }
        let mut joins: FnvHashMap<K, FnvHashMap<K, Vec<K>>> = FnvHashMap::default();
        for rule in grammar.non_terminal_rules() {
            let by_right = joins.entry(rule.left.clone()).or_default();
            push_unique(by_right.entry(rule.right.clone()).or_default(),
                        rule.key.clone());
        }
        RuleIndex{produces, joins}
    }

    /// Keys of every terminal rule whose output is `value`.
    pub fn produces_value(&self, value: &V) -> &[K] {
        self.produces.get(value).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Keys of every non-terminal rule with children `left` `right`.
    pub fn joins_children(&self, left: &K, right: &K) -> &[K] {
        self.joins_left(left)
            .and_then(|by_right| by_right.get(right))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    // Allows skipping a whole cell when no rule starts with `left`
    pub(crate) fn joins_left(&self, left: &K) -> Option<&FnvHashMap<K, Vec<K>>> {
        self.joins.get(left)
    }
}


///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::RuleIndex;
    use crate::grammar::{Grammar, NonTerminalRule, TerminalRule};

    fn grammar() -> Grammar<&'static str, char> {
        Grammar::new(
            vec![
                TerminalRule::new("A", 'a'),
                TerminalRule::new("X", 'a'),
                TerminalRule::new("B", 'b'),
            ],
            vec![
                NonTerminalRule::new("S", "A", "B"),
                NonTerminalRule::new("T", "A", "B"),
                NonTerminalRule::new("S", "X", "B"),
                NonTerminalRule::temporary("S", "A", "B"),
            ],
            vec!["S"])
    }

    #[test]
    fn produces_value() {
        let index = RuleIndex::new(&grammar());
        assert_eq!(index.produces_value(&'a'), &["A", "X"]);
        assert_eq!(index.produces_value(&'b'), &["B"]);
        assert!(index.produces_value(&'c').is_empty());
    }

    #[test]
    fn joins_children() {
        let index = RuleIndex::new(&grammar());
        // temporary and non-temporary versions of S share the key
        assert_eq!(index.joins_children(&"A", &"B"), &["S", "T"]);
        assert_eq!(index.joins_children(&"X", &"B"), &["S"]);
        assert!(index.joins_children(&"B", &"A").is_empty());
        assert!(index.joins_children(&"A", &"A").is_empty());
        assert!(index.joins_left(&"A").is_some());
        assert!(index.joins_left(&"B").is_none());
    }
}
