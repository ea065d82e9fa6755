//! Cards: the scheduled, reviewable items generated from notes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CardId, DeckId, NoteId};

/// Highest flag index a card can carry; `0` means no flag, `1..=7` are the
/// flag colors.
pub const MAX_FLAG: u8 = 7;

/// Scheduling state of a card.
///
/// `Learning` and `Relearning` are distinct states to the scheduler (fresh
/// cards vs. lapsed reviews) but are addressed together by the `learn`
/// search keyword.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CardState {
    New,
    Learning,
    Review,
    Relearning,
}

/// One reviewable item, scheduled within a deck.
///
/// Cards carry no text of their own; searchable content lives on the owning
/// note. Ownership is transitive through the deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub note_id: NoteId,
    pub deck_id: DeckId,
    pub state: CardState,
    /// Moment the card next becomes ready for review.
    pub due_at: DateTime<Utc>,
    /// Current review interval in whole days.
    pub interval_days: u32,
    /// Times the card fell out of review back into relearning.
    pub lapses: u32,
    /// Total reviews performed.
    pub reps: u32,
    /// `0` = no flag, `1..=7` = flag colors.
    pub flag: u8,
    pub suspended: bool,
    pub buried: bool,
    pub created_at: DateTime<Utc>,
}
