use crate::filter::MatchMode;
use clap::ValueEnum;

/// How multiple filter terms combine on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Combine {
    /// Every term must appear in a line (AND)
    All,
    /// Any one term is enough (OR)
    Any,
}

impl From<Combine> for MatchMode {
    fn from(combine: Combine) -> Self {
        match combine {
            Combine::All => MatchMode::All,
            Combine::Any => MatchMode::Any,
        }
    }
}
