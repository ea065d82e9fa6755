//! Typed entity identifiers.
//!
//! Each entity gets its own newtype over [`Uuid`] so ids cannot be mixed up
//! across entity kinds. The types are cheap to copy and ordered, which lets
//! stores use them directly as map keys and sort tiebreakers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$docs:meta])* $name:ident) => {
        $(#[$docs])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a fresh random identifier.
            pub fn new() -> $name {
                $name(Uuid::new_v4())
            }

            /// Returns the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> $name {
                $name::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> $name {
                $name(value)
            }
        }
    };
}

entity_id!(
    /// Identifies a user, the owner of decks, notes and cards.
    UserId
);

entity_id!(
    /// Identifies a deck.
    DeckId
);

entity_id!(
    /// Identifies a note.
    NoteId
);

entity_id!(
    /// Identifies a card.
    CardId
);
