//! Notes: the textual content unit of a collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{NoteId, UserId};

/// A single named field of a note, such as `Front` or `Back`.
///
/// Field names are user-defined per note type; nothing in the backend
/// assumes a fixed schema beyond the conventional front/back pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteField {
    pub name: String,
    pub value: String,
}

impl NoteField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> NoteField {
        NoteField {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The content a user studies. Cards are generated from notes; all
/// searchable text, the tag list and the marked bit live here.
///
/// Deletion is soft: a deleted note keeps its row with `deleted_at` set and
/// becomes invisible to search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub owner_id: UserId,
    pub fields: Vec<NoteField>,
    pub tags: Vec<String>,
    pub marked: bool,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Note {
    /// Returns the value of the named field, matching the name
    /// case-insensitively.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(name))
            .map(|field| field.value.as_str())
    }

    /// True when the note carries the given tag (ASCII case-insensitive).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|have| have.eq_ignore_ascii_case(tag))
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
