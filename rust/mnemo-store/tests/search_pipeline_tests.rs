//! End-to-end coverage of the search pipeline: query text is parsed and
//! compiled by `mnemo-search`, then executed against a [`MemoryStore`]
//! loaded with the shared sample collection.

use mnemo_model::Note;
use mnemo_search::{compile_for_cards_at, compile_for_notes, parse};
use mnemo_store::{MemoryStore, Page, SearchStore, SortOrder, StoreError};
use mnemo_testkit::{SampleCollection, sample_collection};

/// Loads the sample collection into a fresh in-memory store.
fn store_of(sample: &SampleCollection) -> MemoryStore {
    let mut store = MemoryStore::new();
    for deck in &sample.decks {
        store.insert_deck(deck.clone());
    }
    for note in &sample.notes {
        store.insert_note(note.clone());
    }
    for card in &sample.cards {
        store
            .insert_card(card.clone())
            .expect("fixture references are valid");
    }
    store
}

fn fronts_of(notes: &[Note]) -> Vec<String> {
    notes
        .iter()
        .map(|note| note.field("Front").unwrap_or_default().to_string())
        .collect()
}

/// Runs a note search as the primary owner and returns the `Front`
/// values in creation order.
fn note_fronts(sample: &SampleCollection, store: &MemoryStore, input: &str) -> Vec<String> {
    let query = parse(input).expect("query parses");
    let set = compile_for_notes(&query, sample.owner).expect("query compiles");
    let notes = store
        .search_notes(&set, SortOrder::CreatedAsc, Page::all())
        .expect("search executes");
    fronts_of(&notes)
}

/// Runs a card search as the primary owner, compiled against the fixture
/// instant, and returns the owning notes' `Front` values in creation
/// order.
fn card_fronts(sample: &SampleCollection, store: &MemoryStore, input: &str) -> Vec<String> {
    let query = parse(input).expect("query parses");
    let set = compile_for_cards_at(&query, sample.owner, sample.now).expect("query compiles");
    let cards = store
        .search_cards(&set, SortOrder::CreatedAsc, Page::all())
        .expect("search executes");
    cards
        .iter()
        .map(|card| {
            store
                .note(card.note_id)
                .and_then(|note| note.field("Front"))
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}

/// The browse-screen scenario: several criteria of different kinds in one
/// query, combined by implicit conjunction.
#[test]
fn test_browse_scenario_end_to_end() {
    let sample = sample_collection();
    let store = store_of(&sample);
    assert_eq!(
        note_fronts(
            &sample,
            &store,
            "deck:Default tag:vocab front:hello -tag:marked"
        ),
        vec!["hello"]
    );
}

#[test]
fn test_plain_text_scans_all_fields() {
    let sample = sample_collection();
    let store = store_of(&sample);
    // "hello" appears in the first note's Front and the second note's
    // Back; the soft-deleted "ghost hello" note never surfaces.
    assert_eq!(
        note_fronts(&sample, &store, "hello"),
        vec!["hello", "hola"]
    );
}

#[test]
fn test_searches_are_owner_scoped() {
    let sample = sample_collection();
    let store = store_of(&sample);
    let query = parse("hello").expect("query parses");
    let set = compile_for_notes(&query, sample.other_owner).expect("query compiles");
    let notes = store
        .search_notes(&set, SortOrder::CreatedAsc, Page::all())
        .expect("search executes");
    // The second user sees only their own record, never the primary
    // owner's notes.
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].owner_id, sample.other_owner);
}

#[test]
fn test_exact_phrase_matches_within_one_field() {
    let sample = sample_collection();
    let store = store_of(&sample);
    // "hello" and "world" sit in separate fields of the first note, so
    // only the note carrying the contiguous phrase matches.
    assert_eq!(
        note_fronts(&sample, &store, "\"hello world\""),
        vec!["hola"]
    );
}

#[test]
fn test_wildcard_translation() {
    let sample = sample_collection();
    let store = store_of(&sample);
    assert_eq!(
        note_fronts(&sample, &store, "h*llo"),
        vec!["hello", "hola"]
    );
    // `_` matches exactly one character.
    assert_eq!(note_fronts(&sample, &store, "hol_"), vec!["hola", "test"]);
}

#[test]
fn test_plain_text_treats_pattern_characters_literally() {
    let sample = sample_collection();
    let store = store_of(&sample);
    // A literal underscore must not match "plain underscore".
    assert_eq!(note_fronts(&sample, &store, "under_score"), vec!["test"]);
    assert_eq!(note_fronts(&sample, &store, "50%"), vec!["test"]);
}

#[test]
fn test_diacritic_insensitive_modifier() {
    let sample = sample_collection();
    let store = store_of(&sample);
    assert_eq!(note_fronts(&sample, &store, "adios"), Vec::<String>::new());
    assert_eq!(note_fronts(&sample, &store, "nc:adios"), vec!["adiós"]);
}

#[test]
fn test_word_boundary_modifier() {
    let sample = sample_collection();
    let store = store_of(&sample);
    // Substring search also hits "holanda"; the whole-word search does
    // not.
    assert_eq!(note_fronts(&sample, &store, "hola"), vec!["hola", "test"]);
    assert_eq!(note_fronts(&sample, &store, "w:hola"), vec!["hola"]);
}

#[test]
fn test_field_scoped_regex() {
    let sample = sample_collection();
    let store = store_of(&sample);
    assert_eq!(
        note_fronts(&sample, &store, "front:re:[a-c]1"),
        vec!["a1", "b1", "c1"]
    );
}

#[test]
fn test_negated_field_search() {
    let sample = sample_collection();
    let store = store_of(&sample);
    let fronts = note_fronts(&sample, &store, "-front:hello");
    assert_eq!(fronts.len(), 8);
    assert!(!fronts.contains(&"hello".to_string()));
}

#[test]
fn test_generic_field_search() {
    let sample = sample_collection();
    let store = store_of(&sample);
    assert_eq!(note_fronts(&sample, &store, "back:goodbye"), vec!["adiós"]);
}

#[test]
fn test_invalid_regex_fails_compilation() {
    let sample = sample_collection();
    let query = parse("re:[invalid").expect("query parses");
    let err = compile_for_notes(&query, sample.owner).expect_err("pattern is rejected");
    assert!(err.to_string().contains("invalid regex pattern"));
    let err =
        compile_for_cards_at(&query, sample.owner, sample.now).expect_err("pattern is rejected");
    assert!(err.to_string().contains("invalid regex pattern"));
}

#[test]
fn test_parse_errors_surface_through_the_pipeline() {
    let err = parse("flag:9").expect_err("flag out of range");
    assert!(err.to_string().contains("flags range from 0 to 7"));
    let err = parse("prop:bogus>5").expect_err("unknown property");
    assert!(err.to_string().contains("bogus"));
    assert!(err.to_string().contains("due, ivl, lapses, reps"));
}

#[test]
fn test_due_state_respects_queue_rules() {
    let sample = sample_collection();
    let store = store_of(&sample);
    // New cards and past-due review/relearning cards are due; suspended
    // and buried cards are not, and neither is the future-due review
    // card.
    assert_eq!(
        card_fronts(&sample, &store, "is:due"),
        vec!["hello", "adiós", "test", "repaso", "el café"]
    );
}

#[test]
fn test_learn_state_covers_both_learning_phases() {
    let sample = sample_collection();
    let store = store_of(&sample);
    assert_eq!(
        card_fronts(&sample, &store, "is:learn"),
        vec!["hola", "repaso"]
    );
}

#[test]
fn test_state_and_flag_criteria() {
    let sample = sample_collection();
    let store = store_of(&sample);
    assert_eq!(card_fronts(&sample, &store, "flag:7"), vec!["b1"]);
    assert_eq!(card_fronts(&sample, &store, "is:suspended"), vec!["b1"]);
    assert_eq!(card_fronts(&sample, &store, "is:marked"), vec!["a1"]);
}

#[test]
fn test_marked_state_applies_to_notes_too() {
    let sample = sample_collection();
    let store = store_of(&sample);
    assert_eq!(note_fronts(&sample, &store, "is:marked"), vec!["a1"]);
}

#[test]
fn test_scheduling_property_comparisons() {
    let sample = sample_collection();
    let store = store_of(&sample);
    assert_eq!(card_fronts(&sample, &store, "prop:ivl>=10"), vec!["hello"]);
    assert_eq!(
        card_fronts(&sample, &store, "prop:lapses>=2"),
        vec!["b1", "repaso"]
    );
    assert_eq!(card_fronts(&sample, &store, "prop:reps>=30"), vec!["hello"]);
}

#[test]
fn test_due_property_is_relative_to_now() {
    let sample = sample_collection();
    let store = store_of(&sample);
    // Only one card is due strictly after today: the review card
    // scheduled three days out.
    assert_eq!(card_fronts(&sample, &store, "prop:due>0"), vec!["a1"]);
    assert_eq!(card_fronts(&sample, &store, "prop:due>=3"), vec!["a1"]);
    assert_eq!(
        card_fronts(&sample, &store, "prop:due<0"),
        vec!["hello", "hola", "b1", "c1", "repaso"]
    );
}

#[test]
fn test_deck_membership_for_notes() {
    let sample = sample_collection();
    let store = store_of(&sample);
    let query = parse("deck:Spanish").expect("query parses");
    let set = compile_for_notes(&query, sample.owner).expect("query compiles");
    assert!(set.requires_distinct);
    let notes = store
        .search_notes(&set, SortOrder::CreatedAsc, Page::all())
        .expect("search executes");
    assert_eq!(fronts_of(&notes), vec!["hola", "adiós", "repaso", "el café"]);

    assert_eq!(
        note_fronts(&sample, &store, "-deck:Spanish"),
        vec!["hello", "a1", "b1", "c1", "test"]
    );
}

#[test]
fn test_deck_and_tag_membership_for_cards() {
    let sample = sample_collection();
    let store = store_of(&sample);
    assert_eq!(
        card_fronts(&sample, &store, "deck:Default"),
        vec!["hello", "a1", "b1", "c1", "test"]
    );
    // Tag names compare case-insensitively, so "Vocab" counts.
    assert_eq!(
        card_fronts(&sample, &store, "tag:vocab"),
        vec!["hello", "hola", "adiós"]
    );
}

#[test]
fn test_pagination_and_ordering() {
    let sample = sample_collection();
    let store = store_of(&sample);
    let set = compile_for_notes(&parse("").expect("query parses"), sample.owner)
        .expect("query compiles");

    let first = store
        .search_notes(&set, SortOrder::CreatedAsc, Page::new(3, 0))
        .expect("search executes");
    assert_eq!(fronts_of(&first), vec!["hello", "hola", "adiós"]);
    let second = store
        .search_notes(&set, SortOrder::CreatedAsc, Page::new(3, 3))
        .expect("search executes");
    assert_eq!(fronts_of(&second), vec!["a1", "b1", "c1"]);

    let newest = store
        .search_notes(&set, SortOrder::CreatedDesc, Page::new(3, 0))
        .expect("search executes");
    assert_eq!(fronts_of(&newest), vec!["el café", "repaso", "test"]);

    // Nine live notes; the soft-deleted one is never counted.
    assert_eq!(store.count_notes(&set).expect("count executes"), 9);
}

#[test]
fn test_cards_order_by_due_time() {
    let sample = sample_collection();
    let store = store_of(&sample);
    let query = parse("is:learn").expect("query parses");
    let set = compile_for_cards_at(&query, sample.owner, sample.now).expect("query compiles");
    let cards = store
        .search_cards(&set, SortOrder::DueAsc, Page::all())
        .expect("search executes");
    let fronts: Vec<String> = cards
        .iter()
        .map(|card| {
            store
                .note(card.note_id)
                .and_then(|note| note.field("Front"))
                .unwrap_or_default()
                .to_string()
        })
        .collect();
    assert_eq!(fronts, vec!["hola", "repaso"]);
}

#[test]
fn test_target_mismatch_is_rejected() {
    let sample = sample_collection();
    let store = store_of(&sample);
    let set = compile_for_cards_at(&parse("hello").expect("query parses"), sample.owner, sample.now)
        .expect("query compiles");
    let err = store
        .search_notes(&set, SortOrder::CreatedAsc, Page::all())
        .expect_err("card filters cannot run over notes");
    assert!(matches!(err, StoreError::TargetMismatch { .. }));
}
