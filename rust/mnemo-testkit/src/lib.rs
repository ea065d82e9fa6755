//! Test fixtures for the Mnemo backend crates.
//!
//! The builders construct model records with sensible defaults, and
//! [`sample_collection`] assembles a small, fully cross-referenced review
//! setup shared by the search test suites. Everything is anchored to
//! [`reference_now`] so scheduling assertions stay reproducible.

pub mod collection;

pub use collection::{SampleCollection, sample_collection};

use chrono::{DateTime, Duration, TimeZone, Utc};
use mnemo_model::{Card, CardId, CardState, Deck, Note, NoteField, NoteId, UserId};

/// Fixed instant all fixtures are scheduled around.
pub fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Creates a deck owned by `owner`.
pub fn deck(owner: UserId, name: &str) -> Deck {
    Deck::new(owner, name)
}

/// Builder for [`Note`] fixtures. Every note gets `Front` and `Back`
/// fields; creation time defaults to [`reference_now`].
#[derive(Debug, Clone)]
pub struct NoteBuilder {
    note: Note,
}

impl NoteBuilder {
    pub fn new(owner: UserId, front: impl Into<String>, back: impl Into<String>) -> NoteBuilder {
        NoteBuilder {
            note: Note {
                id: NoteId::new(),
                owner_id: owner,
                fields: vec![NoteField::new("Front", front), NoteField::new("Back", back)],
                tags: Vec::new(),
                marked: false,
                created_at: reference_now(),
                deleted_at: None,
            },
        }
    }

    pub fn tags(mut self, tags: &[&str]) -> NoteBuilder {
        self.note.tags = tags.iter().map(|tag| tag.to_string()).collect();
        self
    }

    pub fn marked(mut self) -> NoteBuilder {
        self.note.marked = true;
        self
    }

    /// Soft-deletes the note as of [`reference_now`].
    pub fn deleted(mut self) -> NoteBuilder {
        self.note.deleted_at = Some(reference_now());
        self
    }

    pub fn created(mut self, at: DateTime<Utc>) -> NoteBuilder {
        self.note.created_at = at;
        self
    }

    pub fn build(self) -> Note {
        self.note
    }
}

/// Builder for [`Card`] fixtures. Cards start new, due at
/// [`reference_now`], with zeroed review statistics, and inherit the
/// note's creation time.
#[derive(Debug, Clone)]
pub struct CardBuilder {
    card: Card,
}

impl CardBuilder {
    pub fn new(note: &Note, deck: &Deck) -> CardBuilder {
        CardBuilder {
            card: Card {
                id: CardId::new(),
                note_id: note.id,
                deck_id: deck.id,
                state: CardState::New,
                due_at: reference_now(),
                interval_days: 0,
                lapses: 0,
                reps: 0,
                flag: 0,
                suspended: false,
                buried: false,
                created_at: note.created_at,
            },
        }
    }

    pub fn state(mut self, state: CardState) -> CardBuilder {
        self.card.state = state;
        self
    }

    pub fn due(mut self, at: DateTime<Utc>) -> CardBuilder {
        self.card.due_at = at;
        self
    }

    /// Shifts the due moment a whole number of days from
    /// [`reference_now`]; negative values move it into the past.
    pub fn due_in_days(mut self, days: i64) -> CardBuilder {
        self.card.due_at = reference_now() + Duration::days(days);
        self
    }

    pub fn stats(mut self, interval_days: u32, reps: u32, lapses: u32) -> CardBuilder {
        self.card.interval_days = interval_days;
        self.card.reps = reps;
        self.card.lapses = lapses;
        self
    }

    pub fn flag(mut self, flag: u8) -> CardBuilder {
        self.card.flag = flag;
        self
    }

    pub fn suspended(mut self) -> CardBuilder {
        self.card.suspended = true;
        self
    }

    pub fn buried(mut self) -> CardBuilder {
        self.card.buried = true;
        self
    }

    pub fn build(self) -> Card {
        self.card
    }
}
