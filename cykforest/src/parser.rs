#![deny(warnings)]

use crate::chart::{Chart, MatchId, Span};
use crate::error::Error;
use crate::forest::ParseForest;
use crate::grammar::Grammar;
use crate::rules::RuleIndex;
use log::{debug, trace};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

pub struct CykParser<K, V> {
    grammar: Grammar<K, V>,
    index: RuleIndex<K, V>,
}

///////////////////////////////////////////////////////////////////////////////

impl<K, V> CykParser<K, V>
    where K: Clone + Eq + Hash + Debug, V: Clone + Eq + Hash
{
    /// Index the grammar once. The index is reused by every parse.
    pub fn new(grammar: Grammar<K, V>) -> Self {
        let index = RuleIndex::new(&grammar);
        CykParser{grammar, index}
    }

    pub fn grammar(&self) -> &Grammar<K, V> {
        &self.grammar
    }

    pub fn index(&self) -> &RuleIndex<K, V> {
        &self.index
    }

    /// Spans of length 1: one leaf match per terminal rule producing the symbol
    fn fill_terminals(&self, chart: &mut Chart<K>, input: &[V]) {
        chart.push_row();
        for (start, value) in input.iter().enumerate() {
            for key in self.index.produces_value(value) {
                chart.get_or_create(Span::new(1, start), key);
            }
        }
    }

    /// Build the matches of one cell joining every pair of shorter cells
    /// that split its span. Both halves are always already computed.
    fn fill_cell(&self, chart: &mut Chart<K>, span: Span) {
        let mut joined: Vec<(&K, MatchId, MatchId)> = Vec::new();
        for left_len in 1..span.len {
            let (Some(left_cell), Some(right_cell)) = (
                chart.cell(left_len, span.start),
                chart.cell(span.len - left_len, span.start + left_len),
            ) else {
                continue;
            };
            for left in left_cell.iter() {
                let left_key = &chart.rule_match(left).key;
                if self.index.joins_left(left_key).is_none() {
                    continue;
                }
                for right in right_cell.iter() {
                    let right_key = &chart.rule_match(right).key;
                    for parent in self.index.joins_children(left_key, right_key) {
                        joined.push((parent, left, right));
                    }
                }
            }
        }
        for (parent, left, right) in joined {
            chart.derive(span, parent, left, right);
        }
    }

    /// Fill the whole CYK table for `input`.
    pub fn chart<I>(&self, input: I) -> Result<Chart<K>, Error>
        where I: IntoIterator<Item=V>
    {
        let input: Vec<V> = input.into_iter().collect();
        if input.is_empty() {
            return Err(Error::EmptyInput);
        }
        let mut chart = Chart::new(input.len());
        self.fill_terminals(&mut chart, &input);
        for len in 2..=input.len() {
            chart.push_row();
            for start in 0..=input.len() - len {
                self.fill_cell(&mut chart, Span::new(len, start));
            }
            trace!("filled spans of length {}: {} matches so far", len, chart.num_matches());
        }
        debug!("chart for {} symbols: {} matches over {} cells",
               input.len(), chart.num_matches(), chart.num_cells());
        // debug Chart
        if cfg!(feature="debug") {
            eprintln!("{:?}", chart);
        }
        Ok(chart)
    }

    /// Matches spanning the whole input whose key is a valid start key
    fn roots(&self, chart: &Chart<K>) -> Vec<MatchId> {
        chart.root()
            .map(|cell| cell.iter()
                .filter(|&id| self.grammar.is_start(&chart.rule_match(id).key))
                .collect())
            .unwrap_or_default()
    }

    /// Check the input can be derived without building any forest
    pub fn recognize<I>(&self, input: I) -> Result<bool, Error>
        where I: IntoIterator<Item=V>
    {
        let chart = self.chart(input)?;
        Ok(!self.roots(&chart).is_empty())
    }

    /// One forest per start key deriving the whole input.
    /// An empty result means the input has no parse.
    pub fn parse<I>(&self, input: I) -> Result<Vec<Arc<ParseForest<K>>>, Error>
        where I: IntoIterator<Item=V>
    {
        let chart = self.chart(input)?;
        let forests: Vec<_> = self.roots(&chart).into_iter()
            .map(|root| chart.forest(root))
            .collect();
        debug!("parse produced {} forest(s)", forests.len());
        Ok(forests)
    }
}
