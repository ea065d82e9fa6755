//! Card-target compilation.

use chrono::{DateTime, Duration, Utc};
use mnemo_model::{CardState, UserId};

use crate::error::CompileError;
use crate::filter::{Filter, FilterSet, FilterTarget, NumericAttr};
use crate::query::{CompareOp, PropertyFilter, SearchProperty, SearchQuery, StateFilter};

use super::{build_deck_filters, build_tag_filters, build_text_filters, needs_distinct};

/// Compiles `query` into a filter set over the owner's cards, resolving
/// time-relative criteria against the current instant.
pub fn compile_for_cards(query: &SearchQuery, owner: UserId) -> Result<FilterSet, CompileError> {
    compile_for_cards_at(query, owner, Utc::now())
}

/// Same as [`compile_for_cards`] with an explicit reference instant, so
/// due-time criteria stay reproducible under test.
pub fn compile_for_cards_at(
    query: &SearchQuery,
    owner: UserId,
    now: DateTime<Utc>,
) -> Result<FilterSet, CompileError> {
    let mut filters = build_text_filters(query)?;
    build_tag_filters(query, &mut filters);
    build_deck_filters(query, &mut filters);
    for state in &query.states {
        filters.push(state_filter(*state, now));
    }
    if !query.flags.is_empty() {
        filters.push(Filter::FlagAnyOf {
            flags: query.flags.iter().copied().collect(),
        });
    }
    for property in &query.property_filters {
        filters.push(property_filter(property, now));
    }
    Ok(FilterSet {
        target: FilterTarget::Cards,
        owner,
        filters,
        requires_distinct: needs_distinct(query),
    })
}

/// Lowers one `is:` keyword. `due` expands into the study-queue rule:
/// not suspended, not buried, and either brand new or past due in a
/// reviewing state.
fn state_filter(state: StateFilter, now: DateTime<Utc>) -> Filter {
    match state {
        StateFilter::New => Filter::StateAnyOf {
            states: vec![CardState::New],
        },
        StateFilter::Learn => Filter::StateAnyOf {
            states: vec![CardState::Learning, CardState::Relearning],
        },
        StateFilter::Review => Filter::StateAnyOf {
            states: vec![CardState::Review],
        },
        StateFilter::Suspended => Filter::SuspendedIs(true),
        StateFilter::Buried => Filter::BuriedIs(true),
        StateFilter::Marked => Filter::Marked { negated: false },
        StateFilter::Due => Filter::AllOf(vec![
            Filter::SuspendedIs(false),
            Filter::BuriedIs(false),
            Filter::AnyOf(vec![
                Filter::StateAnyOf {
                    states: vec![CardState::New],
                },
                Filter::AllOf(vec![
                    Filter::StateAnyOf {
                        states: vec![CardState::Review, CardState::Relearning],
                    },
                    Filter::DueCompare {
                        op: CompareOp::Le,
                        at: now,
                    },
                ]),
            ]),
        ]),
    }
}

/// Lowers one `prop:` comparison. `due` values are day offsets from the
/// reference instant; the remaining properties compare literally.
fn property_filter(property: &PropertyFilter, now: DateTime<Utc>) -> Filter {
    match property.property {
        SearchProperty::Due => Filter::DueCompare {
            op: property.op,
            at: due_offset(now, property.value),
        },
        SearchProperty::Ivl => Filter::IntCompare {
            attr: NumericAttr::Interval,
            op: property.op,
            value: property.value,
        },
        SearchProperty::Lapses => Filter::IntCompare {
            attr: NumericAttr::Lapses,
            op: property.op,
            value: property.value,
        },
        SearchProperty::Reps => Filter::IntCompare {
            attr: NumericAttr::Reps,
            op: property.op,
            value: property.value,
        },
    }
}

/// Offsets `now` by a whole number of days, saturating at the datetime
/// range limits when the offset cannot be represented.
fn due_offset(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    Duration::try_days(days)
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(if days >= 0 {
            DateTime::<Utc>::MAX_UTC
        } else {
            DateTime::<Utc>::MIN_UTC
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn test_simple_state_lowerings() {
        assert!(matches!(
            state_filter(StateFilter::Suspended, now()),
            Filter::SuspendedIs(true)
        ));
        assert!(matches!(
            state_filter(StateFilter::Buried, now()),
            Filter::BuriedIs(true)
        ));
        let Filter::StateAnyOf { states } = state_filter(StateFilter::Learn, now()) else {
            panic!("expected state membership");
        };
        assert_eq!(states, vec![CardState::Learning, CardState::Relearning]);
    }

    #[test]
    fn test_interval_property_lowering() {
        let query = parse("prop:ivl>=10").expect("parses");
        let set = compile_for_cards_at(&query, UserId::new(), now()).expect("compiles");
        let Filter::IntCompare { attr, op, value } = &set.filters[0] else {
            panic!("expected integer comparison, got {:?}", set.filters[0]);
        };
        assert_eq!(*attr, NumericAttr::Interval);
        assert_eq!(*op, CompareOp::Ge);
        assert_eq!(*value, 10);
    }

    #[test]
    fn test_due_offset_saturates() {
        assert_eq!(due_offset(now(), 3), now() + Duration::days(3));
        assert_eq!(due_offset(now(), 9_999_999_999_999), DateTime::<Utc>::MAX_UTC);
        assert_eq!(due_offset(now(), -9_999_999_999_999), DateTime::<Utc>::MIN_UTC);
    }
}
