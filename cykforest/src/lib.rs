#![deny(warnings)]

mod error;
pub use crate::error::Error;

mod grammar;
pub use crate::grammar::{Grammar, GrammarBuilder, NonTerminalRule, TerminalRule};

mod rules;
pub use crate::rules::RuleIndex;

mod forest;
pub use crate::forest::{ParseForest, ParseTree};

mod chart;
pub use crate::chart::{Cell, Chart, MatchId, RuleMatch, Span};

mod parser;
pub use crate::parser::CykParser;

mod stats;
pub use crate::stats::ForestStats;

mod flatten;
pub use crate::flatten::{Symbol, flatten_temporaries};

mod trees;
pub use crate::trees::Tree;
