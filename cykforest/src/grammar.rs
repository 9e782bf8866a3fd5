#![deny(warnings)]

use crate::error::Error;
use fnv::FnvHashSet;
use std::fmt;
use std::hash::Hash;

/// A rule that produces exactly one input value.
#[derive(Clone,Debug,PartialEq,Eq,Hash)]
pub struct TerminalRule<K, V> {
    pub key: K,
    // bookkeeping only (eg: rule synthesized while reducing a grammar)
    pub temporary: bool,
    pub output: V,
}

/// A rule that joins two consecutive derivations.
#[derive(Clone,Debug,PartialEq,Eq,Hash)]
pub struct NonTerminalRule<K> {
    pub key: K,
    pub temporary: bool,
    pub left: K,
    pub right: K,
}

/// Immutable Chomsky Reduced Form grammar.
///
/// Rules behave as sets: duplicates are dropped, first insertion order is
/// kept so that parsing enumerates matches deterministically.
#[derive(Clone,Debug)]
pub struct Grammar<K, V> {
    terminals: Vec<TerminalRule<K, V>>,
    non_terminals: Vec<NonTerminalRule<K>>,
    start_keys: Vec<K>,
    starts: FnvHashSet<K>,
}

#[derive(Clone,Debug)]
pub struct GrammarBuilder<K, V> {
    terminals: Vec<TerminalRule<K, V>>,
    non_terminals: Vec<NonTerminalRule<K>>,
    start_keys: Vec<K>,
    error: Option<Error>,
}


impl<K, V> TerminalRule<K, V> {
    pub fn new(key: K, output: V) -> Self {
        TerminalRule{key, temporary: false, output}
    }

    pub fn temporary(key: K, output: V) -> Self {
        TerminalRule{key, temporary: true, output}
    }
}

impl<K> NonTerminalRule<K> {
    pub fn new(key: K, left: K, right: K) -> Self {
        NonTerminalRule{key, temporary: false, left, right}
    }

    pub fn temporary(key: K, left: K, right: K) -> Self {
        NonTerminalRule{key, temporary: true, left, right}
    }
}

impl<K: fmt::Display, V: fmt::Debug> fmt::Display for TerminalRule<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> {:?}", self.key, self.output)
    }
}

impl<K: fmt::Display> fmt::Display for NonTerminalRule<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> {} {}", self.key, self.left, self.right)
    }
}

// Drop repeated items keeping the first occurrence in place
fn dedup<T: Clone + Eq + Hash>(items: impl IntoIterator<Item=T>) -> Vec<T> {
    let mut seen = FnvHashSet::default();
    items.into_iter().filter(|item| seen.insert(item.clone())).collect()
}

impl<K, V> Grammar<K, V>
    where K: Clone + Eq + Hash, V: Clone + Eq + Hash
{
    pub fn new(
        terminals: impl IntoIterator<Item=TerminalRule<K, V>>,
        non_terminals: impl IntoIterator<Item=NonTerminalRule<K>>,
        start_keys: impl IntoIterator<Item=K>) -> Self
    {
        let start_keys = dedup(start_keys);
        let starts = start_keys.iter().cloned().collect();
        Grammar {
            terminals: dedup(terminals),
            non_terminals: dedup(non_terminals),
            start_keys,
            starts,
        }
    }

    pub fn terminal_rules(&self) -> &[TerminalRule<K, V>] {
        &self.terminals
    }

    pub fn non_terminal_rules(&self) -> &[NonTerminalRule<K>] {
        &self.non_terminals
    }

    pub fn start_keys(&self) -> &[K] {
        &self.start_keys
    }

    pub fn is_start(&self, key: &K) -> bool {
        self.starts.contains(key)
    }

    /// The `temporary` flag of the first rule defining `key`, if any does.
    pub fn is_temporary(&self, key: &K) -> Option<bool> {
        self.non_terminals.iter()
            .find(|rule| rule.key == *key)
            .map(|rule| rule.temporary)
            .or_else(|| self.terminals.iter()
                .find(|rule| rule.key == *key)
                .map(|rule| rule.temporary))
    }
}

impl<K, V> Default for GrammarBuilder<K, V> {
    fn default() -> Self {
        GrammarBuilder {
            terminals: Vec::new(),
            non_terminals: Vec::new(),
            start_keys: Vec::new(),
            error: None,
        }
    }
}

/// Builds a Grammar while checking rules are only registered once.
impl<K, V> GrammarBuilder<K, V>
    where K: Clone + Eq + Hash + fmt::Debug, V: Clone + Eq + Hash + fmt::Debug
{
    fn add_terminal(&mut self, rule: TerminalRule<K, V>, quiet: bool) {
        if !self.terminals.contains(&rule) {
            self.terminals.push(rule);
        } else if !quiet && self.error.is_none() {
            self.error = Some(Error::DuplicateRule(
                format!("{:?} -> {:?}", rule.key, rule.output)));
        }
    }

    fn add_non_terminal(&mut self, rule: NonTerminalRule<K>, quiet: bool) {
        if !self.non_terminals.contains(&rule) {
            self.non_terminals.push(rule);
        } else if !quiet && self.error.is_none() {
            self.error = Some(Error::DuplicateRule(
                format!("{:?} -> {:?} {:?}", rule.key, rule.left, rule.right)));
        }
    }

    pub fn terminal(mut self, key: K, output: V) -> Self {
        self.add_terminal(TerminalRule::new(key, output), false);
        self
    }

    pub fn temp_terminal(mut self, key: K, output: V) -> Self {
        self.add_terminal(TerminalRule::temporary(key, output), false);
        self
    }

    pub fn rule(mut self, key: K, left: K, right: K) -> Self {
        self.add_non_terminal(NonTerminalRule::new(key, left, right), false);
        self
    }

    pub fn temp_rule(mut self, key: K, left: K, right: K) -> Self {
        self.add_non_terminal(NonTerminalRule::temporary(key, left, right), false);
        self
    }

    pub fn start(mut self, key: K) -> Self {
        if !self.start_keys.contains(&key) {
            self.start_keys.push(key);
        }
        self
    }

    // Quiet silently ignores adding pre-existent rules to the grammar.
    // Also quiet versions don't use chaining to be invoked in loops.

    pub fn quiet_terminal(&mut self, rule: TerminalRule<K, V>) {
        self.add_terminal(rule, true);
    }

    pub fn quiet_rule(&mut self, rule: NonTerminalRule<K>) {
        self.add_non_terminal(rule, true);
    }

    pub fn into_grammar(self) -> Result<Grammar<K, V>, Error> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if self.start_keys.is_empty() {
            return Err(Error::MissingStart);
        }
        Ok(Grammar::new(self.terminals, self.non_terminals, self.start_keys))
    }
}


///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{Grammar, GrammarBuilder, NonTerminalRule, TerminalRule};
    use crate::error::Error;

    #[test]
    fn grammar_dedups_rules() {
        let g = Grammar::new(
            vec![TerminalRule::new("A", 'a'), TerminalRule::new("A", 'a'),
                 TerminalRule::new("B", 'b')],
            vec![NonTerminalRule::new("S", "A", "B"),
                 NonTerminalRule::new("S", "A", "B")],
            vec!["S", "S"]);
        assert_eq!(g.terminal_rules().len(), 2);
        assert_eq!(g.non_terminal_rules().len(), 1);
        assert_eq!(g.start_keys(), &["S"]);
        // order of first insertion is kept
        assert_eq!(g.terminal_rules()[0].key, "A");
        assert_eq!(g.terminal_rules()[1].key, "B");
    }

    #[test]
    fn grammar_lookups() {
        let g = Grammar::new(
            vec![TerminalRule::new("A", 'a')],
            vec![NonTerminalRule::temporary("T", "A", "A"),
                 NonTerminalRule::new("S", "T", "A")],
            vec!["S"]);
        assert!(g.is_start(&"S"));
        assert!(!g.is_start(&"T"));
        assert_eq!(g.is_temporary(&"T"), Some(true));
        assert_eq!(g.is_temporary(&"S"), Some(false));
        assert_eq!(g.is_temporary(&"A"), Some(false));
        assert_eq!(g.is_temporary(&"X"), None);
    }

    #[test]
    fn start_key_set() {
        let g: Grammar<&str, char> = Grammar::new(
            vec![], vec![], vec!["T", "S", "T", "U"]);
        // listed in first insertion order, looked up as a set
        assert_eq!(g.start_keys(), &["T", "S", "U"]);
        assert!(["S", "T", "U"].iter().all(|key| g.is_start(key)));
        assert!(!g.is_start(&"V"));
    }

    #[test]
    fn rule_display() {
        assert_eq!(TerminalRule::new("A", 'a').to_string(), "A -> 'a'");
        assert_eq!(NonTerminalRule::new("S", "A", "B").to_string(), "S -> A B");
    }

    #[test]
    fn build_grammar() {
        let g = GrammarBuilder::default()
            .terminal("A", 'a')
            .terminal("B", 'b')
            .rule("S", "A", "B")
            .temp_rule("T", "S", "B")
            .start("S")
            .into_grammar()
            .unwrap();
        assert_eq!(g.terminal_rules().len(), 2);
        assert_eq!(g.non_terminal_rules().len(), 2);
        assert!(g.non_terminal_rules()[1].temporary);
    }

    #[test]
    fn dup_rule() {
        let g = GrammarBuilder::default()
            .terminal("A", 'a')
            .rule("S", "A", "A")
            .rule("S", "A", "A")
            .start("S")
            .into_grammar();
        assert_eq!(g.unwrap_err(), Error::DuplicateRule(r#""S" -> "A" "A""#.to_string()));

        let g = GrammarBuilder::default()
            .terminal("A", 'a')
            .terminal("A", 'a')
            .start("A")
            .into_grammar();
        assert_eq!(g.unwrap_err().to_string(), r#"Duplicate Rule: "A" -> 'a'"#);
    }

    #[test]
    fn quiet_dup_rule() {
        let mut builder = GrammarBuilder::default().start("S");
        for _ in 0..3 {
            builder.quiet_terminal(TerminalRule::new("A", 'a'));
            builder.quiet_rule(NonTerminalRule::new("S", "A", "A"));
        }
        let g = builder.into_grammar().unwrap();
        assert_eq!(g.terminal_rules().len(), 1);
        assert_eq!(g.non_terminal_rules().len(), 1);
    }

    #[test]
    fn missing_start() {
        let g = GrammarBuilder::default()
            .terminal("A", 'a')
            .into_grammar();
        assert_eq!(g.unwrap_err(), Error::MissingStart);
    }
}
