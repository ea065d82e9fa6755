//! Note-target compilation.

use mnemo_model::UserId;

use crate::error::CompileError;
use crate::filter::{Filter, FilterSet, FilterTarget};
use crate::query::{SearchQuery, StateFilter};

use super::{build_deck_filters, build_tag_filters, build_text_filters, needs_distinct};

/// Compiles `query` into a filter set over the owner's notes.
///
/// Card-level criteria (every state except `marked`, flags, scheduling
/// properties) have no note counterpart; they are skipped with a debug
/// log entry rather than failing the search.
pub fn compile_for_notes(query: &SearchQuery, owner: UserId) -> Result<FilterSet, CompileError> {
    let mut filters = build_text_filters(query)?;
    build_tag_filters(query, &mut filters);
    build_deck_filters(query, &mut filters);
    for state in &query.states {
        match state {
            StateFilter::Marked => filters.push(Filter::Marked { negated: false }),
            other => {
                log::debug!("note search ignores card state criterion is:{}", other.name());
            }
        }
    }
    if !query.flags.is_empty() {
        log::debug!("note search ignores {} flag criteria", query.flags.len());
    }
    if !query.property_filters.is_empty() {
        log::debug!(
            "note search ignores {} scheduling property criteria",
            query.property_filters.len()
        );
    }
    Ok(FilterSet {
        target: FilterTarget::Notes,
        owner,
        filters,
        requires_distinct: needs_distinct(query),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_empty_query_compiles_to_empty_conjunction() {
        let query = parse("").expect("parses");
        let set = compile_for_notes(&query, UserId::new()).expect("compiles");
        assert!(set.filters.is_empty());
        assert!(!set.requires_distinct);
    }

    #[test]
    fn test_marked_is_the_only_state_with_a_note_lowering() {
        let query = parse("is:marked is:suspended is:due").expect("parses");
        let set = compile_for_notes(&query, UserId::new()).expect("compiles");
        assert_eq!(set.filters.len(), 1);
        assert!(matches!(set.filters[0], Filter::Marked { negated: false }));
        assert!(set.requires_distinct);
    }
}
