use super::error::FilterError;
use std::fmt;

/// Separator used between terms when none is configured
pub const DEFAULT_SEPARATOR: char = '#';

/// How the terms of a filter combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Every term must appear in the line
    All,
    /// At least one term must appear in the line
    #[default]
    Any,
}

impl MatchMode {
    pub fn from_match_all(match_all: bool) -> Self {
        if match_all { MatchMode::All } else { MatchMode::Any }
    }

    pub fn is_match_all(&self) -> bool {
        *self == MatchMode::All
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::All => write!(f, "all"),
            MatchMode::Any => write!(f, "any"),
        }
    }
}

/// The substring terms and combination policy applied to every line
///
/// A `FilterSpec` always holds at least one term and never an empty one,
/// so the matcher does not have to decide what an empty filter means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    terms: Vec<String>,
    mode: MatchMode,
    case_sensitive: bool,
}

impl FilterSpec {
    /// Build a spec from already split terms
    pub fn new(
        terms: Vec<String>,
        mode: MatchMode,
        case_sensitive: bool,
    ) -> Result<Self, FilterError> {
        if terms.is_empty() {
            return Err(FilterError::Empty);
        }
        if let Some(pos) = terms.iter().position(|t| t.is_empty()) {
            return Err(FilterError::EmptyTerm(pos));
        }

        Ok(FilterSpec {
            terms,
            mode,
            case_sensitive,
        })
    }

    /// Parse a raw delimited filter string
    ///
    /// Empty segments are dropped; if nothing remains the filter is rejected.
    pub fn parse(
        raw: &str,
        separator: char,
        mode: MatchMode,
        case_sensitive: bool,
    ) -> Result<Self, FilterError> {
        let terms: Vec<String> = raw
            .split(separator)
            .filter(|term| !term.is_empty())
            .map(str::to_string)
            .collect();

        Self::new(terms, mode, case_sensitive)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] (match {}, {})",
            self.terms.join(", "),
            self.mode,
            if self.case_sensitive {
                "case-sensitive"
            } else {
                "case-insensitive"
            }
        )
    }
}
