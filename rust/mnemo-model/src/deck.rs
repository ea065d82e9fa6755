//! Decks: named card collections owned by a single user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{DeckId, UserId};

/// A named collection of cards. Deck names are unique per owner and are
/// matched case-insensitively by search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub id: DeckId,
    pub owner_id: UserId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Deck {
    pub fn new(owner_id: UserId, name: impl Into<String>) -> Deck {
        Deck {
            id: DeckId::new(),
            owner_id,
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}
