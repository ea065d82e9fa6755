//! Executable filter predicates.
//!
//! A [`FilterSet`] is the compiler output: a flat conjunction of typed
//! predicates plus the ownership scope, ready for a storage engine to
//! evaluate. API callers treat filter sets as opaque; the structure exists
//! so engines (relational or in-memory) can interpret the search without
//! re-parsing anything. Text matchers are prebuilt here (patterns already
//! escaped, regexes already validated), which is why the type is neither
//! serializable nor comparable.

use chrono::{DateTime, Utc};
use mnemo_model::{CardState, UserId};
use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::query::CompareOp;

/// Entity collection a [`FilterSet`] applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterTarget {
    Notes,
    Cards,
}

/// Where a text predicate looks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextScope {
    /// The predicate holds when any field of the note matches.
    AnyField,
    /// Only the named field, with the name compared case-insensitively.
    Field(String),
}

/// Folding applied to the candidate side of a text comparison. The
/// pattern side is folded once at compile time; case-insensitivity itself
/// is handled by the regex engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFold {
    CaseInsensitive,
    /// Case-insensitive with combining marks stripped, so `café` matches
    /// `cafe`.
    CaseAndDiacriticInsensitive,
}

/// An escaped SQL-style pattern: `%` matches any run, `_` exactly one
/// character, `\` escapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikePattern(String);

impl LikePattern {
    /// Substring pattern matching `text` literally; pattern
    /// metacharacters in the text are escaped.
    pub fn substring(text: &str) -> LikePattern {
        let mut pattern = String::with_capacity(text.len() + 2);
        pattern.push('%');
        for ch in text.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        LikePattern(pattern)
    }

    /// Substring pattern where `*` in `text` matches any run and `_`
    /// stays the native single-character wildcard. Literal `%` and `\`
    /// are escaped.
    pub fn wildcard(text: &str) -> LikePattern {
        let mut pattern = String::with_capacity(text.len() + 2);
        pattern.push('%');
        for ch in text.chars() {
            match ch {
                '*' => pattern.push('%'),
                '%' | '\\' => {
                    pattern.push('\\');
                    pattern.push(ch);
                }
                _ => pattern.push(ch),
            }
        }
        pattern.push('%');
        LikePattern(pattern)
    }

    /// The raw pattern, suitable for `LIKE ? ESCAPE '\'`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Renders the pattern as an anchored regular expression for engines
    /// without native `LIKE`. `%` becomes `.*`, `_` becomes `.`, escaped
    /// characters turn literal; `(?s)` keeps wildcards running across
    /// newlines.
    pub fn to_regex_string(&self) -> String {
        let mut out = String::with_capacity(self.0.len() + 8);
        out.push_str("(?s)^");
        let mut chars = self.0.chars();
        while let Some(ch) = chars.next() {
            match ch {
                '%' => out.push_str(".*"),
                '_' => out.push('.'),
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        push_literal(&mut out, escaped);
                    }
                }
                _ => push_literal(&mut out, ch),
            }
        }
        out.push('$');
        out
    }
}

fn push_literal(out: &mut String, ch: char) {
    let mut buf = [0u8; 4];
    out.push_str(&regex::escape(ch.encode_utf8(&mut buf)));
}

/// How a compiled text predicate matches a candidate string.
#[derive(Debug, Clone)]
pub enum TextMatcher {
    /// SQL-style pattern, with the equivalent matcher prebuilt for
    /// engines that evaluate directly.
    Like { pattern: LikePattern, regex: Regex },
    /// Regular expression (user-supplied, or built for word-boundary
    /// matching).
    Regex(Regex),
}

/// A compiled text criterion.
#[derive(Debug, Clone)]
pub struct TextFilter {
    pub scope: TextScope,
    pub matcher: TextMatcher,
    pub fold: TextFold,
    pub negated: bool,
}

impl TextFilter {
    /// True when one candidate value satisfies the matcher. Folding is
    /// applied here; scope and negation are resolved by the engine, which
    /// knows which fields exist.
    pub fn matches_value(&self, value: &str) -> bool {
        let folded;
        let candidate = match self.fold {
            TextFold::CaseInsensitive => value,
            TextFold::CaseAndDiacriticInsensitive => {
                folded = fold_diacritics(value);
                &folded
            }
        };
        match &self.matcher {
            TextMatcher::Like { regex, .. } => regex.is_match(candidate),
            TextMatcher::Regex(regex) => regex.is_match(candidate),
        }
    }
}

/// Card attributes addressable by literal integer comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericAttr {
    Interval,
    Lapses,
    Reps,
}

/// One predicate of a [`FilterSet`] conjunction.
#[derive(Debug, Clone)]
pub enum Filter {
    /// Text match over note fields; for cards, through the owning note.
    Text(TextFilter),
    /// The note carries any of the listed tags (none of them when
    /// negated). Tag names compare case-insensitively.
    TagsAnyOf { tags: Vec<String>, negated: bool },
    /// Deck-name membership. For cards this is the owning deck; for notes
    /// it is an existence test over the note's cards.
    DecksAnyOf { decks: Vec<String>, negated: bool },
    /// Card state membership.
    StateAnyOf { states: Vec<CardState> },
    SuspendedIs(bool),
    BuriedIs(bool),
    /// The note (for cards, the owning note) is marked.
    Marked { negated: bool },
    /// Card flag membership.
    FlagAnyOf { flags: Vec<u8> },
    /// Literal integer comparison against a card attribute.
    IntCompare {
        attr: NumericAttr,
        op: CompareOp,
        value: i64,
    },
    /// Timestamp comparison against the card's due moment.
    DueCompare { op: CompareOp, at: DateTime<Utc> },
    /// Disjunction of alternatives; produced only by the compilers (the
    /// `is:due` lowering), never from user-level syntax.
    AnyOf(Vec<Filter>),
    /// Conjunction group, used inside [`Filter::AnyOf`] alternatives.
    AllOf(Vec<Filter>),
}

/// A compiled search: a flat conjunction of [`Filter`]s scoped to one
/// owner and one target collection.
///
/// Compilation fails rather than producing a partial conjunction.
#[derive(Debug, Clone)]
pub struct FilterSet {
    pub target: FilterTarget,
    /// Every search is implicitly restricted to this owner's records;
    /// note searches additionally exclude soft-deleted notes.
    pub owner: UserId,
    pub filters: Vec<Filter>,
    /// Join-backed predicates (deck membership, `marked`) can multiply
    /// rows in relational engines; when set, results must be deduplicated
    /// by primary id.
    pub requires_distinct: bool,
}

/// Strips combining marks after NFD decomposition, so `café` and `cafe`
/// compare equal. Case folding is left to the regex engine.
pub fn fold_diacritics(text: &str) -> String {
    text.nfd().filter(|ch| !is_combining_mark(*ch)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::RegexBuilder;

    fn like_matches(pattern: &LikePattern, candidate: &str) -> bool {
        RegexBuilder::new(&pattern.to_regex_string())
            .case_insensitive(true)
            .build()
            .expect("derived pattern is valid")
            .is_match(candidate)
    }

    #[test]
    fn test_substring_escapes_metacharacters() {
        assert_eq!(LikePattern::substring("a_b").as_str(), "%a\\_b%");
        assert_eq!(LikePattern::substring("50%").as_str(), "%50\\%%");
        assert_eq!(LikePattern::substring("a\\b").as_str(), "%a\\\\b%");
    }

    #[test]
    fn test_wildcard_translation() {
        assert_eq!(LikePattern::wildcard("h*llo").as_str(), "%h%llo%");
        // `_` stays native only for wildcard patterns.
        assert_eq!(LikePattern::wildcard("h_llo").as_str(), "%h_llo%");
        assert_eq!(LikePattern::wildcard("50%*").as_str(), "%50\\%%%");
    }

    #[test]
    fn test_like_semantics_through_regex() {
        let substring = LikePattern::substring("under_score");
        assert!(like_matches(&substring, "an under_score here"));
        // Escaped `_` must not act as a single-character wildcard.
        assert!(!like_matches(&substring, "an underscore here"));
        assert!(!like_matches(&substring, "an underXscore here"));

        let wildcard = LikePattern::wildcard("h*llo");
        assert!(like_matches(&wildcard, "hello"));
        assert!(like_matches(&wildcard, "heLLo world"));
        assert!(like_matches(&wildcard, "h-x-llo"));
        assert!(!like_matches(&wildcard, "hell"));

        let single = LikePattern::wildcard("hol_");
        assert!(like_matches(&single, "hola"));
        assert!(like_matches(&single, "holanda"));
        assert!(!like_matches(&single, "hol"));
    }

    #[test]
    fn test_like_regex_crosses_newlines() {
        let pattern = LikePattern::substring("b c");
        assert!(like_matches(&pattern, "a\nb c\nd"));
        let wildcard = LikePattern::wildcard("a*d");
        assert!(like_matches(&wildcard, "a\nd"));
    }

    #[test]
    fn test_fold_diacritics() {
        assert_eq!(fold_diacritics("café"), "cafe");
        assert_eq!(fold_diacritics("adiós"), "adios");
        assert_eq!(fold_diacritics("señor"), "senor");
        assert_eq!(fold_diacritics("plain"), "plain");
    }

    #[test]
    fn test_text_filter_folding() {
        let pattern = LikePattern::substring("adios");
        let regex = RegexBuilder::new(&pattern.to_regex_string())
            .case_insensitive(true)
            .build()
            .expect("valid");
        let folded = TextFilter {
            scope: TextScope::AnyField,
            matcher: TextMatcher::Like { pattern, regex },
            fold: TextFold::CaseAndDiacriticInsensitive,
            negated: false,
        };
        assert!(folded.matches_value("Adiós amigo"));

        let pattern = LikePattern::substring("adios");
        let regex = RegexBuilder::new(&pattern.to_regex_string())
            .case_insensitive(true)
            .build()
            .expect("valid");
        let unfolded = TextFilter {
            scope: TextScope::AnyField,
            matcher: TextMatcher::Like { pattern, regex },
            fold: TextFold::CaseInsensitive,
            negated: false,
        };
        assert!(!unfolded.matches_value("Adiós amigo"));
    }
}
