//! Errors for query parsing and compilation.

use thiserror::Error;

/// Failure to parse a raw search string into a
/// [`SearchQuery`](crate::SearchQuery).
///
/// Parsing is deliberately forgiving: unrecognized `is:` values and odd
/// generic-field shapes are dropped, not rejected. The variants below are
/// the only hard failures, and every message names the offending token so
/// it can be surfaced to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// `flag:` with a non-integer or out-of-range value.
    #[error("invalid flag number in {token:?}: flags range from 0 to 7")]
    InvalidFlag { token: String },

    /// `prop:` whose value does not match `<property><op><integer>`.
    #[error(
        "malformed property filter {token:?}: expected <property><op><integer>, e.g. prop:ivl>=10"
    )]
    MalformedProperty { token: String },

    /// `prop:` naming a property that does not exist.
    #[error("unknown property {property:?} in {token:?}: expected one of {valid}")]
    UnknownProperty {
        token: String,
        property: String,
        /// Comma-separated list of the recognized property names.
        valid: String,
    },
}

impl ParseError {
    /// The token that failed to parse.
    pub fn token(&self) -> &str {
        match self {
            ParseError::InvalidFlag { token }
            | ParseError::MalformedProperty { token }
            | ParseError::UnknownProperty { token, .. } => token,
        }
    }
}

/// Failure to lower a [`SearchQuery`](crate::SearchQuery) into an
/// executable [`FilterSet`](crate::FilterSet).
///
/// Regex patterns are accepted verbatim at parse time and validated here,
/// before any predicate is assembled, so a filter set is either complete
/// or not produced at all.
#[derive(Debug, Clone, Error)]
pub enum CompileError {
    /// A regex search whose pattern the engine rejects.
    #[error("invalid regex pattern {pattern:?}: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
