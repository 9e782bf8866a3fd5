#![deny(warnings)]

use crate::forest::{ParseForest, ParseTree};
use fnv::FnvHashMap;
use std::cell::OnceCell;
use std::hash::Hash;
use std::sync::Arc;
use std::fmt;


/// Stable handle of a `RuleMatch` within its `Chart`
#[derive(Clone,Copy,Debug,PartialEq,Eq,Hash,PartialOrd,Ord)]
pub struct MatchId(usize);

/// Contiguous range of the input: `len` symbols starting at `start`
#[derive(Clone,Copy,Debug,PartialEq,Eq,Hash)]
pub struct Span {
    pub len: usize,
    pub start: usize,
}

/// A rule key derivable over a span along with every way it was derived.
pub struct RuleMatch<K> {
    pub key: K,
    pub span: Span,
    // (left, right) pairs justifying this match. Empty for terminal matches.
    derivations: Vec<(MatchId, MatchId)>,
    // Built once on demand, then shared by every parent derivation
    forest: OnceCell<Arc<ParseForest<K>>>,
}

/// Matches of a single span. There's at most one `RuleMatch` per key.
pub struct Cell<K> {
    order: Vec<MatchId>,
    dedup: FnvHashMap<K, MatchId>,
}

/// Triangular CYK table. `rows[len - 1][start]` holds the cell for the span
/// of length `len` starting at `start`. All matches live in `arena`.
pub struct Chart<K> {
    input_len: usize,
    rows: Vec<Vec<Cell<K>>>,
    arena: Vec<RuleMatch<K>>,
}

///////////////////////////////////////////////////////////////////////////////

impl Span {
    pub fn new(len: usize, start: usize) -> Self {
        Span{len, start}
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

impl<K> RuleMatch<K> {
    fn new(key: K, span: Span) -> Self {
        RuleMatch{key, span, derivations: Vec::new(), forest: OnceCell::new()}
    }

    pub fn derivations(&self) -> &[(MatchId, MatchId)] {
        &self.derivations
    }

    pub fn is_terminal(&self) -> bool {
        self.derivations.is_empty()
    }

    /// The forest if it was already materialized
    pub fn forest(&self) -> Option<&Arc<ParseForest<K>>> {
        self.forest.get()
    }
}

impl<K: fmt::Debug> fmt::Debug for RuleMatch<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({} - {}) {:?} #derivations: {}",
               self.span.start, self.span.end(), self.key, self.derivations.len())
    }
}

impl<K: Eq + Hash> Cell<K> {
    fn new() -> Self {
        Cell{order: Vec::new(), dedup: FnvHashMap::default()}
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, key: &K) -> Option<MatchId> {
        self.dedup.get(key).copied()
    }

    /// Match ids in order of creation
    pub fn iter(&self) -> impl Iterator<Item=MatchId> + '_ {
        self.order.iter().copied()
    }
}

impl<K: Clone + Eq + Hash> Chart<K> {
    pub(crate) fn new(input_len: usize) -> Self {
        Chart{input_len, rows: Vec::new(), arena: Vec::new()}
    }

    /// Start a new row for spans of length `rows.len() + 1`
    pub(crate) fn push_row(&mut self) {
        let len = self.rows.len() + 1;
        let cells = (0..=self.input_len - len).map(|_| Cell::new()).collect();
        self.rows.push(cells);
    }

    fn cell_mut(&mut self, span: Span) -> &mut Cell<K> {
        &mut self.rows[span.len - 1][span.start]
    }

    /// Get the unique match of `key` over `span`, creating it if missing.
    pub(crate) fn get_or_create(&mut self, span: Span, key: &K) -> MatchId {
        if let Some(id) = self.cell_mut(span).get(key) {
            return id;
        }
        let id = MatchId(self.arena.len());
        self.arena.push(RuleMatch::new(key.clone(), span));
        let cell = self.cell_mut(span);
        cell.order.push(id);
        cell.dedup.insert(key.clone(), id);
        id
    }

    /// Record that `left` followed by `right` derives `key` over `span`.
    pub(crate) fn derive(&mut self, span: Span, key: &K, left: MatchId, right: MatchId) {
        // Children always cover shorter spans so the match graph is a DAG
        debug_assert!(self.arena[left.0].span.len < span.len);
        debug_assert!(self.arena[right.0].span.len < span.len);
        debug_assert_eq!(self.arena[left.0].span.end(), self.arena[right.0].span.start);
        let id = self.get_or_create(span, key);
        self.arena[id.0].derivations.push((left, right));
    }
}

impl<K> Chart<K> {
    pub fn input_len(&self) -> usize {
        self.input_len
    }

    /// Cell for the span of length `len` starting at `start`
    pub fn cell(&self, len: usize, start: usize) -> Option<&Cell<K>> {
        self.rows.get(len.checked_sub(1)?)?.get(start)
    }

    /// Cell spanning the whole input
    pub fn root(&self) -> Option<&Cell<K>> {
        self.cell(self.input_len, 0)
    }

    pub fn rule_match(&self, id: MatchId) -> &RuleMatch<K> {
        &self.arena[id.0]
    }

    /// Iterate the matches of the cell at (`len`, `start`)
    pub fn matches(&self, len: usize, start: usize) -> impl Iterator<Item=&RuleMatch<K>> + '_ {
        self.cell(len, start).into_iter()
            .flat_map(|cell| cell.order.iter())
            .map(|id| &self.arena[id.0])
    }

    pub fn num_matches(&self) -> usize {
        self.arena.len()
    }

    pub fn num_cells(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }
}

impl<K: Clone> Chart<K> {
    fn built(&self, id: MatchId) -> Arc<ParseForest<K>> {
        self.arena[id.0].forest.get()
            .expect("BUG: child forest not materialized")
            .clone()
    }

    /// Materialize (or fetch) the forest of a match.
    ///
    /// Walks the match graph in post-order with an explicit stack, so that
    /// every child forest exists before its parents and is built only once.
    pub fn forest(&self, root: MatchId) -> Arc<ParseForest<K>> {
        let mut pending = vec![(root, false)];
        while let Some((id, expanded)) = pending.pop() {
            let rule_match = &self.arena[id.0];
            if rule_match.forest.get().is_some() {
                continue;
            }
            if !expanded {
                pending.push((id, true));
                for &(left, right) in rule_match.derivations.iter().rev() {
                    for child in [right, left] {
                        if self.arena[child.0].forest.get().is_none() {
                            pending.push((child, false));
                        }
                    }
                }
                continue;
            }
            let forest = if rule_match.is_terminal() {
                ParseForest::leaf(rule_match.key.clone())
            } else {
                let possibilities = rule_match.derivations.iter()
                    .map(|&(left, right)| ParseTree::binary(self.built(left), self.built(right)))
                    .collect();
                ParseForest::new(rule_match.key.clone(), possibilities)
            };
            if rule_match.forest.set(Arc::new(forest)).is_err() {
                unreachable!("BUG: forest materialized twice");
            }
        }
        self.built(root)
    }
}

impl<K: fmt::Debug> fmt::Debug for Chart<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (row, cells) in self.rows.iter().enumerate() {
            writeln!(f, "=== Span length {} ===", row + 1)?;
            for cell in cells {
                for id in &cell.order {
                    let rule_match = &self.arena[id.0];
                    let src = rule_match.derivations.iter()
                        .map(|(l, r)| format!("{:?} + {:?}",
                                              self.arena[l.0].key, self.arena[r.0].key))
                        .collect::<Vec<_>>().join(", ");
                    writeln!(f, "{:?} -- SRC: {}", rule_match, src)?;
                }
            }
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::{Chart, Span};
    use std::sync::Arc;

    #[test]
    fn span_basics() {
        let span = Span::new(3, 2);
        assert_eq!(span.end(), 5);
    }

    #[test]
    fn chart_dedups_matches() {
        let mut chart = Chart::new(2);
        chart.push_row();
        let a = chart.get_or_create(Span::new(1, 0), &"A");
        assert_eq!(a, chart.get_or_create(Span::new(1, 0), &"A"));
        let b = chart.get_or_create(Span::new(1, 1), &"B");
        assert_ne!(a, b);
        chart.push_row();
        chart.derive(Span::new(2, 0), &"S", a, b);
        chart.derive(Span::new(2, 0), &"S", a, b);
        assert_eq!(chart.num_matches(), 3);
        assert_eq!(chart.num_cells(), 3);
        let root = chart.root().unwrap();
        assert_eq!(root.len(), 1);
        let s = root.get(&"S").unwrap();
        assert_eq!(chart.rule_match(s).derivations().len(), 2);
        assert!(chart.cell(0, 0).is_none());
        assert!(chart.cell(2, 1).is_none());
        assert!(chart.cell(3, 0).is_none());
    }

    #[test]
    fn forest_is_built_once() {
        let mut chart = Chart::new(2);
        chart.push_row();
        let a = chart.get_or_create(Span::new(1, 0), &"A");
        let b = chart.get_or_create(Span::new(1, 1), &"A");
        chart.push_row();
        chart.derive(Span::new(2, 0), &"S", a, b);
        chart.derive(Span::new(2, 0), &"T", a, b);
        let s = chart.forest(chart.root().unwrap().get(&"S").unwrap());
        let t = chart.forest(chart.root().unwrap().get(&"T").unwrap());
        assert!(Arc::ptr_eq(s.possibilities()[0].left().unwrap(),
                            t.possibilities()[0].left().unwrap()));
        assert!(Arc::ptr_eq(&s, &chart.forest(chart.root().unwrap().get(&"S").unwrap())));
        assert!(chart.rule_match(a).forest().is_some());
        assert!(chart.rule_match(a).is_terminal());
    }
}
