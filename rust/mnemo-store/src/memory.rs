//! In-memory store implementation.
//!
//! [`MemoryStore`] keeps every record in ordered maps and evaluates
//! compiled filter sets by direct predicate checks, resolving card
//! criteria through the owning note and deck. It is the reference
//! implementation of the search semantics and the backend the test
//! suites run against.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use itertools::Itertools;
use mnemo_model::{Card, CardId, Deck, DeckId, Note, NoteId, UserId};
use mnemo_search::{Filter, FilterSet, FilterTarget, NumericAttr, TextFilter, TextScope};

use crate::error::StoreError;
use crate::{Page, SearchStore, SortOrder};

#[derive(Debug, Default)]
pub struct MemoryStore {
    decks: BTreeMap<DeckId, Deck>,
    notes: BTreeMap<NoteId, Note>,
    cards: BTreeMap<CardId, Card>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    /// Inserts or replaces a deck.
    pub fn insert_deck(&mut self, deck: Deck) {
        self.decks.insert(deck.id, deck);
    }

    /// Inserts or replaces a note.
    pub fn insert_note(&mut self, note: Note) {
        self.notes.insert(note.id, note);
    }

    /// Inserts or replaces a card. The referenced note and deck must
    /// already be present.
    pub fn insert_card(&mut self, card: Card) -> Result<(), StoreError> {
        if !self.notes.contains_key(&card.note_id) {
            return Err(StoreError::UnknownReference {
                entity: "note",
                id: card.note_id.to_string(),
            });
        }
        if !self.decks.contains_key(&card.deck_id) {
            return Err(StoreError::UnknownReference {
                entity: "deck",
                id: card.deck_id.to_string(),
            });
        }
        self.cards.insert(card.id, card);
        Ok(())
    }

    pub fn deck(&self, id: DeckId) -> Option<&Deck> {
        self.decks.get(&id)
    }

    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.notes.get(&id)
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    fn note_of(&self, card: &Card) -> Option<&Note> {
        self.notes.get(&card.note_id)
    }

    fn deck_of(&self, card: &Card) -> Option<&Deck> {
        self.decks.get(&card.deck_id)
    }

    fn card_owner(&self, card: &Card) -> Option<UserId> {
        self.deck_of(card).map(|deck| deck.owner_id)
    }

    /// Names of the decks the note's cards currently live in.
    fn note_deck_names(&self, note: &Note) -> Vec<&str> {
        self.cards
            .values()
            .filter(|card| card.note_id == note.id)
            .filter_map(|card| self.deck_of(card))
            .map(|deck| deck.name.as_str())
            .collect()
    }

    fn note_matches(&self, note: &Note, filter: &Filter) -> bool {
        match filter {
            Filter::Text(text) => note_text_matches(note, text),
            Filter::TagsAnyOf { tags, negated } => {
                let hit = note
                    .tags
                    .iter()
                    .any(|tag| tags.iter().any(|wanted| eq_fold(wanted, tag)));
                hit != *negated
            }
            Filter::DecksAnyOf { decks, negated } => {
                let hit = self
                    .note_deck_names(note)
                    .iter()
                    .any(|name| decks.iter().any(|wanted| eq_fold(wanted, name)));
                hit != *negated
            }
            Filter::Marked { negated } => note.marked != *negated,
            Filter::AnyOf(alternatives) => {
                alternatives.iter().any(|inner| self.note_matches(note, inner))
            }
            Filter::AllOf(parts) => parts.iter().all(|inner| self.note_matches(note, inner)),
            // Card-only predicates never reach the note engine; the note
            // compiler drops them.
            _ => false,
        }
    }

    fn card_matches(&self, card: &Card, filter: &Filter) -> bool {
        match filter {
            Filter::Text(text) => self
                .note_of(card)
                .is_some_and(|note| note_text_matches(note, text)),
            Filter::TagsAnyOf { tags, negated } => {
                let hit = self.note_of(card).is_some_and(|note| {
                    note.tags
                        .iter()
                        .any(|tag| tags.iter().any(|wanted| eq_fold(wanted, tag)))
                });
                hit != *negated
            }
            Filter::DecksAnyOf { decks, negated } => {
                let hit = self
                    .deck_of(card)
                    .is_some_and(|deck| decks.iter().any(|wanted| eq_fold(wanted, &deck.name)));
                hit != *negated
            }
            Filter::StateAnyOf { states } => states.contains(&card.state),
            Filter::SuspendedIs(value) => card.suspended == *value,
            Filter::BuriedIs(value) => card.buried == *value,
            Filter::Marked { negated } => {
                let hit = self.note_of(card).is_some_and(|note| note.marked);
                hit != *negated
            }
            Filter::FlagAnyOf { flags } => flags.contains(&card.flag),
            Filter::IntCompare { attr, op, value } => {
                let current = match attr {
                    NumericAttr::Interval => i64::from(card.interval_days),
                    NumericAttr::Lapses => i64::from(card.lapses),
                    NumericAttr::Reps => i64::from(card.reps),
                };
                op.compare(current, *value)
            }
            Filter::DueCompare { op, at } => op.compare(card.due_at, *at),
            Filter::AnyOf(alternatives) => {
                alternatives.iter().any(|inner| self.card_matches(card, inner))
            }
            Filter::AllOf(parts) => parts.iter().all(|inner| self.card_matches(card, inner)),
        }
    }
}

impl SearchStore for MemoryStore {
    fn search_notes(
        &self,
        filters: &FilterSet,
        order: SortOrder,
        page: Page,
    ) -> Result<Vec<Note>, StoreError> {
        expect_target(filters, FilterTarget::Notes)?;
        let mut hits: Vec<&Note> = self
            .notes
            .values()
            .filter(|note| note.owner_id == filters.owner && !note.is_deleted())
            .filter(|note| filters.filters.iter().all(|f| self.note_matches(note, f)))
            .collect();
        if filters.requires_distinct {
            // One map entry per note here, but the contract still calls
            // for dedup by id.
            hits = hits.into_iter().unique_by(|note| note.id).collect();
        }
        match order {
            SortOrder::CreatedAsc | SortOrder::DueAsc => {
                hits.sort_by_key(|note| (note.created_at, note.id));
            }
            SortOrder::CreatedDesc => {
                hits.sort_by_key(|note| (Reverse(note.created_at), note.id));
            }
        }
        Ok(page.clip(hits).into_iter().cloned().collect())
    }

    fn search_cards(
        &self,
        filters: &FilterSet,
        order: SortOrder,
        page: Page,
    ) -> Result<Vec<Card>, StoreError> {
        expect_target(filters, FilterTarget::Cards)?;
        let mut hits: Vec<&Card> = self
            .cards
            .values()
            .filter(|card| self.card_owner(card) == Some(filters.owner))
            .filter(|card| filters.filters.iter().all(|f| self.card_matches(card, f)))
            .collect();
        if filters.requires_distinct {
            hits = hits.into_iter().unique_by(|card| card.id).collect();
        }
        match order {
            SortOrder::CreatedAsc => hits.sort_by_key(|card| (card.created_at, card.id)),
            SortOrder::CreatedDesc => {
                hits.sort_by_key(|card| (Reverse(card.created_at), card.id));
            }
            SortOrder::DueAsc => hits.sort_by_key(|card| (card.due_at, card.id)),
        }
        Ok(page.clip(hits).into_iter().cloned().collect())
    }
}

fn expect_target(filters: &FilterSet, expected: FilterTarget) -> Result<(), StoreError> {
    if filters.target == expected {
        Ok(())
    } else {
        Err(StoreError::TargetMismatch {
            expected,
            actual: filters.target,
        })
    }
}

/// Case-insensitive comparison for user-facing names (tags, decks).
fn eq_fold(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn note_text_matches(note: &Note, filter: &TextFilter) -> bool {
    let hit = match &filter.scope {
        TextScope::AnyField => note
            .fields
            .iter()
            .any(|field| filter.matches_value(&field.value)),
        TextScope::Field(name) => note
            .fields
            .iter()
            .filter(|field| field.name.eq_ignore_ascii_case(name))
            .any(|field| filter.matches_value(&field.value)),
    };
    hit != filter.negated
}
