use thiserror::Error;

/// Errors that can occur when building a filter specification
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("Filter has no terms; enter at least one non-empty condition")]
    Empty,

    #[error("Filter term at position {0} is empty")]
    EmptyTerm(usize),
}
