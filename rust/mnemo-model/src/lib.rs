//! Entity model for the mnemo spaced-repetition backend.
//!
//! The types here are the persistent shapes the rest of the workspace works
//! against: a [`Deck`] owns scheduled [`Card`]s, each card is generated from
//! a [`Note`], and all searchable text and tags live on the note. The model
//! carries no behavior beyond small lookup helpers; scheduling and search
//! are separate crates.

pub mod card;
pub mod deck;
pub mod ids;
pub mod note;

pub use card::{Card, CardState, MAX_FLAG};
pub use deck::Deck;
pub use ids::{CardId, DeckId, NoteId, UserId};
pub use note::{Note, NoteField};
