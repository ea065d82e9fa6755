//! Lowering parsed queries into executable filter sets.
//!
//! Two independent compilers share one immutable [`SearchQuery`]: notes
//! and cards overlap on text, tag and deck handling but diverge on states,
//! flags and properties, so the shared lowering lives here and the
//! divergent parts in the per-target submodules. Both compilers validate
//! every user regex before assembling predicates; a [`FilterSet`] is
//! either complete or not produced at all.

mod cards;
mod notes;

pub use cards::{compile_for_cards, compile_for_cards_at};
pub use notes::compile_for_notes;

use regex::{Regex, RegexBuilder};

use crate::error::CompileError;
use crate::filter::{
    Filter, LikePattern, TextFilter, TextFold, TextMatcher, TextScope, fold_diacritics,
};
use crate::query::{SearchQuery, StateFilter, TextMode, TextSearch};

/// Builds the text predicates both compilers share: the text searches in
/// model order (user regexes validate first), then the field-search map
/// entries.
pub(crate) fn build_text_filters(query: &SearchQuery) -> Result<Vec<Filter>, CompileError> {
    let mut filters = Vec::new();
    for search in &query.text_searches {
        filters.push(Filter::Text(compile_text_search(search)?));
    }
    for (field, text) in &query.field_searches {
        filters.push(Filter::Text(compile_field_search(field, text)?));
    }
    Ok(filters)
}

/// Appends tag membership criteria: include list, then exclude list.
pub(crate) fn build_tag_filters(query: &SearchQuery, filters: &mut Vec<Filter>) {
    if !query.tags_include.is_empty() {
        filters.push(Filter::TagsAnyOf {
            tags: query.tags_include.clone(),
            negated: false,
        });
    }
    if !query.tags_exclude.is_empty() {
        filters.push(Filter::TagsAnyOf {
            tags: query.tags_exclude.clone(),
            negated: true,
        });
    }
}

/// Appends deck membership criteria: include list, then exclude list.
pub(crate) fn build_deck_filters(query: &SearchQuery, filters: &mut Vec<Filter>) {
    if !query.decks_include.is_empty() {
        filters.push(Filter::DecksAnyOf {
            decks: query.decks_include.clone(),
            negated: false,
        });
    }
    if !query.decks_exclude.is_empty() {
        filters.push(Filter::DecksAnyOf {
            decks: query.decks_exclude.clone(),
            negated: true,
        });
    }
}

/// True when the query contains a join-backed criterion (deck membership
/// or the `marked` state), which relational engines answer with joins
/// that can multiply result rows.
pub(crate) fn needs_distinct(query: &SearchQuery) -> bool {
    !query.decks_include.is_empty()
        || !query.decks_exclude.is_empty()
        || query.states.contains(&StateFilter::Marked)
}

/// Lowers one free-text criterion into a matcher.
///
/// The pattern side of a diacritic-insensitive search is folded here, once;
/// engines fold the candidate side per value. Word-boundary criteria always
/// compile to a regex matcher, since `LIKE` cannot express boundaries.
fn compile_text_search(search: &TextSearch) -> Result<TextFilter, CompileError> {
    let scope = match &search.field {
        Some(name) => TextScope::Field(name.clone()),
        None => TextScope::AnyField,
    };
    let fold = if search.no_combining {
        TextFold::CaseAndDiacriticInsensitive
    } else {
        TextFold::CaseInsensitive
    };
    let text = match fold {
        TextFold::CaseAndDiacriticInsensitive => fold_diacritics(&search.text),
        TextFold::CaseInsensitive => search.text.clone(),
    };
    let matcher = match search.mode {
        TextMode::Regex => {
            let pattern = if search.word_boundary {
                // Errors must name the pattern as written, not the
                // boundary-wrapped form.
                build_regex(&text)?;
                format!(r"\b(?:{text})\b")
            } else {
                text
            };
            TextMatcher::Regex(build_regex(&pattern)?)
        }
        TextMode::Plain | TextMode::Exact => {
            build_matcher(&text, false, search.word_boundary)?
        }
        TextMode::Wildcard => build_matcher(&text, true, search.word_boundary)?,
    };
    Ok(TextFilter {
        scope,
        matcher,
        fold,
        negated: search.negated,
    })
}

/// Field-search map entries are literal text scoped to one field.
fn compile_field_search(field: &str, text: &str) -> Result<TextFilter, CompileError> {
    let pattern = LikePattern::substring(text);
    let regex = build_regex(&pattern.to_regex_string())?;
    Ok(TextFilter {
        scope: TextScope::Field(field.to_string()),
        matcher: TextMatcher::Like { pattern, regex },
        fold: TextFold::CaseInsensitive,
        negated: false,
    })
}

/// Builds a like-pattern matcher, or a boundary-wrapped regex when the
/// criterion demands word boundaries.
fn build_matcher(
    text: &str,
    wildcard: bool,
    word_boundary: bool,
) -> Result<TextMatcher, CompileError> {
    if word_boundary {
        let mut body = String::with_capacity(text.len());
        if wildcard {
            for ch in text.chars() {
                match ch {
                    '*' => body.push_str(".*"),
                    '_' => body.push('.'),
                    _ => body.push_str(&regex::escape(ch.encode_utf8(&mut [0u8; 4]))),
                }
            }
        } else {
            body.push_str(&regex::escape(text));
        }
        let pattern = format!(r"(?s)\b(?:{body})\b");
        Ok(TextMatcher::Regex(build_regex(&pattern)?))
    } else {
        let pattern = if wildcard {
            LikePattern::wildcard(text)
        } else {
            LikePattern::substring(text)
        };
        let regex = build_regex(&pattern.to_regex_string())?;
        Ok(TextMatcher::Like { pattern, regex })
    }
}

/// Builds a case-insensitive matcher, mapping engine rejection into
/// [`CompileError::InvalidRegex`].
fn build_regex(pattern: &str) -> Result<Regex, CompileError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| CompileError::InvalidRegex {
            pattern: pattern.to_string(),
            source,
        })
}
