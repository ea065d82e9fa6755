//! Parsed representation of a search query.
//!
//! [`SearchQuery`] is the immutable output of [`parse`](crate::parse): a
//! flat bag of typed criteria with no boolean structure beyond implicit
//! conjunction. Lowering it into executable predicates is a separate,
//! fallible phase; see [`compile_for_notes`](crate::compile_for_notes)
//! and [`compile_for_cards`](crate::compile_for_cards).

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// How the text of a [`TextSearch`] is interpreted.
///
/// The variants are mutually exclusive by construction; the orthogonal
/// `no_combining` / `word_boundary` modifiers live on [`TextSearch`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMode {
    /// Plain substring match.
    #[default]
    Plain,
    /// Quoted phrase: matched literally, wildcard characters inert.
    Exact,
    /// `*` matches any run of characters, `_` matches exactly one.
    Wildcard,
    /// Regular expression; the pattern is validated at compile time, not
    /// at parse time.
    Regex,
}

/// A single free-text criterion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSearch {
    /// The search text; for [`TextMode::Regex`] the raw, unvalidated
    /// pattern.
    pub text: String,
    pub mode: TextMode,
    /// Match with combining marks stripped from both sides (`nc:`).
    pub no_combining: bool,
    /// Match only on word boundaries (`w:`).
    pub word_boundary: bool,
    pub negated: bool,
    /// Restricts the match to one named note field; `None` matches any
    /// field.
    pub field: Option<String>,
}

/// Card states addressable with `is:`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum StateFilter {
    New,
    Due,
    Review,
    Learn,
    Suspended,
    Buried,
    Marked,
}

impl StateFilter {
    /// Parses an `is:` keyword; `None` for anything unrecognized.
    pub fn from_keyword(keyword: &str) -> Option<StateFilter> {
        match keyword {
            "new" => Some(StateFilter::New),
            "due" => Some(StateFilter::Due),
            "review" => Some(StateFilter::Review),
            "learn" => Some(StateFilter::Learn),
            "suspended" => Some(StateFilter::Suspended),
            "buried" => Some(StateFilter::Buried),
            "marked" => Some(StateFilter::Marked),
            _ => None,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            StateFilter::New => "new",
            StateFilter::Due => "due",
            StateFilter::Review => "review",
            StateFilter::Learn => "learn",
            StateFilter::Suspended => "suspended",
            StateFilter::Buried => "buried",
            StateFilter::Marked => "marked",
        }
    }
}

/// Numeric card properties addressable with `prop:`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SearchProperty {
    /// Days until due, relative to the moment the query is compiled.
    Due,
    /// Current review interval in days.
    Ivl,
    /// Lapse count.
    Lapses,
    /// Total review count.
    Reps,
}

impl SearchProperty {
    /// Every recognized property, in the order error messages list them.
    pub const ALL: [SearchProperty; 4] = [
        SearchProperty::Due,
        SearchProperty::Ivl,
        SearchProperty::Lapses,
        SearchProperty::Reps,
    ];

    /// Parses a property name; `None` for anything unrecognized.
    pub fn from_keyword(keyword: &str) -> Option<SearchProperty> {
        match keyword {
            "due" => Some(SearchProperty::Due),
            "ivl" => Some(SearchProperty::Ivl),
            "lapses" => Some(SearchProperty::Lapses),
            "reps" => Some(SearchProperty::Reps),
            _ => None,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            SearchProperty::Due => "due",
            SearchProperty::Ivl => "ivl",
            SearchProperty::Lapses => "lapses",
            SearchProperty::Reps => "reps",
        }
    }
}

/// Comparison operator of a `prop:` criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Ge,
    Le,
    Gt,
    Lt,
    Eq,
}

impl CompareOp {
    /// Operators in scan order: two-character symbols first, so `>=` is
    /// never read as `>` followed by a stray `=`.
    pub(crate) const SCAN_ORDER: [CompareOp; 5] = [
        CompareOp::Ge,
        CompareOp::Le,
        CompareOp::Gt,
        CompareOp::Lt,
        CompareOp::Eq,
    ];

    pub const fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Ge => ">=",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Eq => "=",
        }
    }

    /// Applies the operator to an ordered pair.
    pub fn compare<T: PartialOrd>(&self, lhs: T, rhs: T) -> bool {
        match self {
            CompareOp::Ge => lhs >= rhs,
            CompareOp::Le => lhs <= rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Lt => lhs < rhs,
            CompareOp::Eq => lhs == rhs,
        }
    }
}

/// One `prop:` criterion: `<property><op><integer>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyFilter {
    pub property: SearchProperty,
    pub op: CompareOp,
    pub value: i64,
}

/// The parsed form of a search string.
///
/// Criteria are combined by implicit conjunction. `has_or` and
/// `has_grouping` record that the input used `or` / parentheses, but the
/// flags are informational only; neither ever changes what is compiled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Field name → literal search text. Repeating a field keeps the last
    /// value.
    pub field_searches: HashMap<String, String>,
    pub tags_include: Vec<String>,
    pub tags_exclude: Vec<String>,
    pub decks_include: Vec<String>,
    pub decks_exclude: Vec<String>,
    pub states: BTreeSet<StateFilter>,
    /// Flag indices requested with `flag:`, each in `0..=7`.
    pub flags: BTreeSet<u8>,
    /// `prop:` criteria in the order they were written.
    pub property_filters: Vec<PropertyFilter>,
    /// Free-text criteria in the order they were written.
    pub text_searches: Vec<TextSearch>,
    pub has_or: bool,
    pub has_grouping: bool,
}

impl SearchQuery {
    /// True when no criterion at all was parsed. The informational
    /// `has_or` / `has_grouping` flags are not criteria.
    pub fn is_empty(&self) -> bool {
        self.field_searches.is_empty()
            && self.tags_include.is_empty()
            && self.tags_exclude.is_empty()
            && self.decks_include.is_empty()
            && self.decks_exclude.is_empty()
            && self.states.is_empty()
            && self.flags.is_empty()
            && self.property_filters.is_empty()
            && self.text_searches.is_empty()
    }
}
