//! Raw search string tokenization.
//!
//! Splits a search string into candidate tokens ahead of classification.
//! The scan is quote-aware: a double quote toggles quote mode, whitespace
//! inside quotes accumulates into the current token, and the quote
//! characters stay attached to the token so the classifier can still
//! recognize exact phrases. There is no escape sequence for embedded
//! quotes; a dangling quote stays part of its token and later falls through
//! to the plain-text classification rules.

/// Splits `raw` into trimmed, non-empty tokens.
///
/// The conjunction keywords `AND` and `OR` (any letter case) are recognized
/// and consumed here: conjunction is implicit between tokens, and
/// disjunction is never compiled (see [`SearchQuery::has_or`]). Quoting a
/// keyword protects it.
///
/// [`SearchQuery::has_or`]: crate::query::SearchQuery::has_or
pub(crate) fn tokenize(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in raw.chars() {
        if ch == '"' {
            in_quotes = !in_quotes;
            current.push(ch);
        } else if ch.is_whitespace() && !in_quotes {
            flush(&mut tokens, &mut current);
        } else {
            current.push(ch);
        }
    }
    flush(&mut tokens, &mut current);
    tokens
}

fn flush(tokens: &mut Vec<String>, current: &mut String) {
    let token = current.trim();
    if !token.is_empty() && !is_conjunction_keyword(token) {
        tokens.push(token.to_string());
    }
    current.clear();
}

fn is_conjunction_keyword(token: &str) -> bool {
    token.eq_ignore_ascii_case("and") || token.eq_ignore_ascii_case("or")
}

/// True when the raw input contains the infix `or` keyword, any case.
pub(crate) fn contains_or_keyword(raw: &str) -> bool {
    raw.to_lowercase().contains(" or ")
}

/// True when the raw input contains a grouping parenthesis.
pub(crate) fn contains_grouping(raw: &str) -> bool {
    raw.contains(['(', ')'])
}
