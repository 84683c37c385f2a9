//! Filter term parsing and line matching
//!
//! A filter is a single text field split on a separator character into a
//! list of plain substring terms. Every line of an input file is checked
//! against those terms under one of two combination modes.
//!
//! # Syntax
//!
//! ```text
//! ERROR                 Lines containing "ERROR"
//! ERROR#WARN            Lines containing "ERROR" or "WARN" (mode any)
//! session-42#timeout    Lines containing both terms (mode all)
//! ```
//!
//! Empty segments (`ERROR##WARN`, a trailing `#`) are dropped. Terms are
//! kept verbatim, surrounding whitespace included.

pub mod error;
pub mod matcher;
pub mod parser;

pub use error::FilterError;
pub use matcher::{LineMatcher, matches};
pub use parser::{DEFAULT_SEPARATOR, FilterSpec, MatchMode};
