//! Search string parsing: token classification into a [`SearchQuery`].
//!
//! Every token is an independent criterion and tokens combine by
//! implicit conjunction, so parsing is a single pass: tokenize, then
//! classify each token in a fixed decision order. That order is load
//! bearing and pinned by the tests below: negation strip, exact phrase,
//! `re:` / `nc:` / `w:` prefixes, field token, wildcard, plain text.
//!
//! Classification is atomic per token: on error nothing is appended and
//! the whole parse fails, so a [`SearchQuery`] is never partially built.

use itertools::Itertools;

use crate::error::ParseError;
use crate::query::{
    CompareOp, PropertyFilter, SearchProperty, SearchQuery, StateFilter, TextMode, TextSearch,
};
use crate::tokenizer;

/// Parses a raw search string.
///
/// Empty and all-whitespace input yield the empty (match-everything)
/// query. Parsing never touches storage or the clock and performs no
/// regex validation; the fallible lowering step is
/// [`compile_for_notes`](crate::compile_for_notes) /
/// [`compile_for_cards`](crate::compile_for_cards).
///
/// # Errors
///
/// Returns a [`ParseError`] naming the offending token for malformed
/// `flag:` and `prop:` criteria. Everything else is accepted; see the
/// module docs for the deliberate silent drops.
pub fn parse(raw: &str) -> Result<SearchQuery, ParseError> {
    let mut query = SearchQuery {
        has_or: tokenizer::contains_or_keyword(raw),
        has_grouping: tokenizer::contains_grouping(raw),
        ..SearchQuery::default()
    };
    for token in tokenizer::tokenize(raw) {
        classify(&mut query, &token)?;
    }
    Ok(query)
}

/// Classifies one token into `query`, honoring the decision order
/// documented on the module.
fn classify(query: &mut SearchQuery, token: &str) -> Result<(), ParseError> {
    let (negated, body) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    if body.is_empty() {
        return Ok(());
    }
    if let Some(phrase) = unwrap_quotes(body) {
        push_text(query, phrase, TextMode::Exact, negated);
    } else if let Some(pattern) = body.strip_prefix("re:") {
        push_text(query, pattern, TextMode::Regex, negated);
    } else if let Some(rest) = body.strip_prefix("nc:") {
        classify_modified(query, rest, true, false, negated);
    } else if let Some(rest) = body.strip_prefix("w:") {
        classify_modified(query, rest, false, true, negated);
    } else if let Some((field, value)) = body.split_once(':') {
        classify_field(query, token, field, value, negated)?;
    } else if is_wildcard(body) {
        push_text(query, body, TextMode::Wildcard, negated);
    } else {
        push_text(query, body, TextMode::Plain, negated);
    }
    Ok(())
}

/// Handles the remainder of an `nc:` / `w:` token. The modifier combines
/// with any text mode, so the remainder is re-examined for an exact
/// phrase, a regex prefix or wildcard characters.
fn classify_modified(
    query: &mut SearchQuery,
    rest: &str,
    no_combining: bool,
    word_boundary: bool,
    negated: bool,
) {
    let (text, mode) = if let Some(phrase) = unwrap_quotes(rest) {
        (phrase, TextMode::Exact)
    } else if let Some(pattern) = rest.strip_prefix("re:") {
        (pattern, TextMode::Regex)
    } else if is_wildcard(rest) {
        (rest, TextMode::Wildcard)
    } else {
        (rest, TextMode::Plain)
    };
    if text.is_empty() {
        return;
    }
    query.text_searches.push(TextSearch {
        text: text.to_string(),
        mode,
        no_combining,
        word_boundary,
        negated,
        ..TextSearch::default()
    });
}

/// Handles tokens containing `:`: dispatch on the lower-cased field name.
/// `token` is the original text for error reporting; `field`/`raw_value`
/// come from splitting on the first colon after the negation strip.
fn classify_field(
    query: &mut SearchQuery,
    token: &str,
    field: &str,
    raw_value: &str,
    negated: bool,
) -> Result<(), ParseError> {
    let (value, quoted) = match unwrap_quotes(raw_value) {
        Some(inner) => (inner, true),
        None => (raw_value, false),
    };
    let field = field.to_lowercase();
    match field.as_str() {
        "deck" => {
            let list = if negated {
                &mut query.decks_exclude
            } else {
                &mut query.decks_include
            };
            list.push(value.to_string());
        }
        "tag" => {
            let list = if negated {
                &mut query.tags_exclude
            } else {
                &mut query.tags_include
            };
            list.push(value.to_string());
        }
        // Negation on `is:` / `flag:` / `prop:` is accepted and ignored:
        // the query model has no negated slot for them.
        "is" => match StateFilter::from_keyword(&value.to_lowercase()) {
            Some(state) => {
                query.states.insert(state);
            }
            None => log::debug!("ignoring unrecognized state keyword in search token {token:?}"),
        },
        "flag" => match value.parse::<u8>() {
            Ok(flag) if flag <= mnemo_model::MAX_FLAG => {
                query.flags.insert(flag);
            }
            _ => {
                return Err(ParseError::InvalidFlag {
                    token: token.to_string(),
                });
            }
        },
        "prop" => {
            let filter = parse_property(token, value)?;
            query.property_filters.push(filter);
        }
        "front" | "back" => classify_named_field(query, &field, value, quoted, negated),
        // Unknown field names fall back to generic named-field search. A
        // reserved `re:` prefix on the value wins, as on `front:`/`back:`;
        // after that, `field:Name:text` addresses a note field whose name
        // would otherwise be taken for a keyword, so a second colon is
        // checked before reading the value as literal text.
        _ => {
            if value.starts_with("re:") {
                classify_named_field(query, &field, value, quoted, negated);
            } else if let Some((name, rest)) = value.split_once(':') {
                classify_named_field(query, name, rest, quoted, negated);
            } else {
                classify_named_field(query, &field, value, quoted, negated);
            }
        }
    }
    Ok(())
}

/// `front:` / `back:` and generic named-field criteria.
///
/// A `re:` prefix on the value always wins and produces a field-scoped
/// regex predicate. Negated criteria become field-scoped text predicates,
/// because the field-search map cannot express negation; a quoted value
/// classifies as exact there, keeping wildcard characters inert. Everything
/// else lands in `field_searches`, where the last write for a name wins.
fn classify_named_field(
    query: &mut SearchQuery,
    name: &str,
    value: &str,
    quoted: bool,
    negated: bool,
) {
    if let Some(pattern) = value.strip_prefix("re:") {
        query.text_searches.push(TextSearch {
            text: pattern.to_string(),
            mode: TextMode::Regex,
            negated,
            field: Some(name.to_string()),
            ..TextSearch::default()
        });
    } else if negated {
        let mode = if quoted {
            TextMode::Exact
        } else if is_wildcard(value) {
            TextMode::Wildcard
        } else {
            TextMode::Plain
        };
        query.text_searches.push(TextSearch {
            text: value.to_string(),
            mode,
            negated: true,
            field: Some(name.to_string()),
            ..TextSearch::default()
        });
    } else {
        query
            .field_searches
            .insert(name.to_string(), value.to_string());
    }
}

fn push_text(query: &mut SearchQuery, text: &str, mode: TextMode, negated: bool) {
    if text.is_empty() {
        return;
    }
    query.text_searches.push(TextSearch {
        text: text.to_string(),
        mode,
        negated,
        ..TextSearch::default()
    });
}

/// Parses the value of a `prop:` token: `<property><op><integer>`, e.g.
/// `ivl>=10` or `due=-1`. Two-character operators are tried before their
/// one-character prefixes.
fn parse_property(token: &str, value: &str) -> Result<PropertyFilter, ParseError> {
    for op in CompareOp::SCAN_ORDER {
        let Some((name, number)) = value.split_once(op.symbol()) else {
            continue;
        };
        let property = SearchProperty::from_keyword(&name.trim().to_lowercase()).ok_or_else(
            || ParseError::UnknownProperty {
                token: token.to_string(),
                property: name.to_string(),
                valid: SearchProperty::ALL.iter().map(|p| p.name()).join(", "),
            },
        )?;
        let value =
            number
                .trim()
                .parse::<i64>()
                .map_err(|_| ParseError::MalformedProperty {
                    token: token.to_string(),
                })?;
        return Ok(PropertyFilter {
            property,
            op,
            value,
        });
    }
    Err(ParseError::MalformedProperty {
        token: token.to_string(),
    })
}

/// Returns the inner text when `s` is wrapped in double quotes.
fn unwrap_quotes(s: &str) -> Option<&str> {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        Some(&s[1..s.len() - 1])
    } else {
        None
    }
}

fn is_wildcard(s: &str) -> bool {
    s.contains(['*', '_'])
}
