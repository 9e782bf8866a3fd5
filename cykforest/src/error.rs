#![deny(warnings)]

use thiserror::Error;

#[derive(Debug,Clone,PartialEq,Eq,Error)]
pub enum Error {
    /// Chomsky Reduced Form has no empty derivations so there's nothing to parse
    #[error("Empty Input")]
    EmptyInput,
    #[error("Missing Start Key")]
    MissingStart,
    #[error("Duplicate Rule: {0}")]
    DuplicateRule(String),
    /// Forests can't be flattened with the temporary flags of the grammar
    #[error("Unflattenable Forest: {0}")]
    Unflattenable(String),
}
