//! A shared sample collection exercised by the search test suites.

use chrono::{DateTime, Duration, Utc};
use mnemo_model::{Card, CardState, Deck, Note, UserId};

use crate::{CardBuilder, NoteBuilder, deck, reference_now};

/// A compact two-user review setup with the text, tag, deck, state and
/// scheduling variety the search pipeline needs.
///
/// The primary owner has a `Default` and a `Spanish` deck, ten notes
/// (one soft-deleted, one marked) and nine cards spread across states,
/// flags and due times. A second user owns one note and card so scoping
/// is always observable.
#[derive(Debug, Clone)]
pub struct SampleCollection {
    pub owner: UserId,
    pub other_owner: UserId,
    pub decks: Vec<Deck>,
    pub notes: Vec<Note>,
    pub cards: Vec<Card>,
    /// The instant the fixtures are scheduled around; card searches
    /// should compile against this.
    pub now: DateTime<Utc>,
}

impl SampleCollection {
    /// The first note whose `Front` field equals `front`.
    pub fn note_with_front(&self, front: &str) -> &Note {
        self.notes
            .iter()
            .find(|note| note.field("Front") == Some(front))
            .expect("fixture note present")
    }
}

pub fn sample_collection() -> SampleCollection {
    let owner = UserId::new();
    let other_owner = UserId::new();
    let now = reference_now();
    let base = now - Duration::days(1);

    let default_deck = deck(owner, "Default");
    let spanish = deck(owner, "Spanish");
    let other_default = deck(other_owner, "Default");

    let mut notes = Vec::new();
    let mut cards = Vec::new();

    let hello = NoteBuilder::new(owner, "hello", "world")
        .tags(&["vocab"])
        .created(base)
        .build();
    cards.push(
        CardBuilder::new(&hello, &default_deck)
            .state(CardState::Review)
            .due_in_days(-1)
            .stats(12, 30, 1)
            .flag(1)
            .build(),
    );
    notes.push(hello);

    let hola = NoteBuilder::new(owner, "hola", "hello world")
        .tags(&["vocab", "verb"])
        .created(base + Duration::minutes(1))
        .build();
    cards.push(
        CardBuilder::new(&hola, &spanish)
            .state(CardState::Learning)
            .due_in_days(-1)
            .stats(0, 2, 0)
            .build(),
    );
    notes.push(hola);

    let adios = NoteBuilder::new(owner, "adiós", "goodbye")
        .tags(&["Vocab"])
        .created(base + Duration::minutes(2))
        .build();
    cards.push(CardBuilder::new(&adios, &spanish).flag(2).build());
    notes.push(adios);

    let a1 = NoteBuilder::new(owner, "a1", "plain underscore")
        .marked()
        .created(base + Duration::minutes(3))
        .build();
    cards.push(
        CardBuilder::new(&a1, &default_deck)
            .state(CardState::Review)
            .due_in_days(3)
            .stats(5, 10, 0)
            .flag(3)
            .build(),
    );
    notes.push(a1);

    let b1 = NoteBuilder::new(owner, "b1", "bravo")
        .created(base + Duration::minutes(4))
        .build();
    cards.push(
        CardBuilder::new(&b1, &default_deck)
            .state(CardState::Review)
            .due_in_days(-1)
            .stats(8, 20, 2)
            .flag(7)
            .suspended()
            .build(),
    );
    notes.push(b1);

    let c1 = NoteBuilder::new(owner, "c1", "charlie")
        .created(base + Duration::minutes(5))
        .build();
    cards.push(
        CardBuilder::new(&c1, &default_deck)
            .state(CardState::Review)
            .due_in_days(-1)
            .stats(3, 5, 0)
            .buried()
            .build(),
    );
    notes.push(c1);

    let promo = NoteBuilder::new(owner, "test", "under_score 50% off holanda")
        .created(base + Duration::minutes(6))
        .build();
    cards.push(CardBuilder::new(&promo, &default_deck).flag(1).build());
    notes.push(promo);

    // Soft-deleted, and deliberately without a card.
    notes.push(
        NoteBuilder::new(owner, "ghost hello", "gone")
            .created(base + Duration::minutes(7))
            .deleted()
            .build(),
    );

    let repaso = NoteBuilder::new(owner, "repaso", "review session")
        .created(base + Duration::minutes(8))
        .build();
    cards.push(
        CardBuilder::new(&repaso, &spanish)
            .state(CardState::Relearning)
            .due(now - Duration::hours(1))
            .stats(1, 4, 3)
            .build(),
    );
    notes.push(repaso);

    let cafe = NoteBuilder::new(owner, "el café", "the coffee")
        .created(base + Duration::minutes(9))
        .build();
    cards.push(CardBuilder::new(&cafe, &spanish).build());
    notes.push(cafe);

    let foreign = NoteBuilder::new(other_owner, "hello", "world")
        .created(base)
        .build();
    cards.push(
        CardBuilder::new(&foreign, &other_default)
            .state(CardState::Review)
            .due_in_days(-1)
            .stats(100, 12, 0)
            .build(),
    );
    notes.push(foreign);

    SampleCollection {
        owner,
        other_owner,
        decks: vec![default_deck, spanish, other_default],
        notes,
        cards,
        now,
    }
}
