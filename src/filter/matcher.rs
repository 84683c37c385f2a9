use super::parser::{FilterSpec, MatchMode};
use std::borrow::Cow;

/// Check a single line against a filter
///
/// Convenience wrapper around [`LineMatcher`]; prefer building one matcher
/// per file when checking many lines.
pub fn matches(line: &str, spec: &FilterSpec) -> bool {
    LineMatcher::new(spec).is_match(line)
}

/// A filter prepared for repeated line checks
///
/// In case-insensitive mode the terms are upper-cased once here, into the
/// matcher's own storage. The spec it was built from is left untouched.
#[derive(Debug, Clone)]
pub struct LineMatcher<'a> {
    terms: Vec<Cow<'a, str>>,
    mode: MatchMode,
    case_sensitive: bool,
}

impl<'a> LineMatcher<'a> {
    pub fn new(spec: &'a FilterSpec) -> Self {
        let case_sensitive = spec.is_case_sensitive();
        let terms = spec
            .terms()
            .iter()
            .map(|term| {
                if case_sensitive {
                    Cow::Borrowed(term.as_str())
                } else {
                    Cow::Owned(term.to_uppercase())
                }
            })
            .collect();

        LineMatcher {
            terms,
            mode: spec.mode(),
            case_sensitive,
        }
    }

    pub fn is_match(&self, line: &str) -> bool {
        let line: Cow<'_, str> = if self.case_sensitive {
            Cow::Borrowed(line)
        } else {
            Cow::Owned(line.to_uppercase())
        };

        match self.mode {
            MatchMode::All => self.terms.iter().all(|term| line.contains(term.as_ref())),
            MatchMode::Any => self.terms.iter().any(|term| line.contains(term.as_ref())),
        }
    }
}
