//! Note model and its projections.
//!
//! # Responsibility
//! - Define the stored `Note` row and the write shapes used to build it.
//! - Define the summary/detail projections returned to callers.
//!
//! # Invariants
//! - `owner_id` is only ever taken from a resolved `OwnerContext`; no write
//!   shape can be built from a client-supplied owner.
//! - `created_at` is set once; `modified_at` stays `None` until the first
//!   successful update.

use crate::identity::OwnerContext;
use crate::model::user::UserId;
use serde::{Deserialize, Serialize};

/// Numeric identifier of a stored note.
pub type NoteId = i64;

/// Canonical stored note row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    pub owner_id: UserId,
    pub title: String,
    pub content: String,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
    /// Last update time in epoch milliseconds, `None` until first update.
    pub modified_at: Option<i64>,
}

/// Insert shape for a new note, already stamped with its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    owner_id: UserId,
    pub title: String,
    pub content: String,
    pub created_at: i64,
}

impl NewNote {
    /// Builds an insert shape owned by the caller of `ctx`.
    pub fn stamped(
        ctx: &OwnerContext,
        title: impl Into<String>,
        content: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            owner_id: ctx.owner_id(),
            title: title.into(),
            content: content.into(),
            created_at,
        }
    }

    /// Owner this note will be persisted under.
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }
}

/// Full replacement of the mutable note fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteChanges {
    pub title: String,
    pub content: String,
    pub modified_at: i64,
}

/// List projection: no content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSummary {
    pub id: NoteId,
    pub title: String,
    pub created_at: i64,
}

/// Detail projection returned by single-note reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDetail {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub created_at: i64,
    pub modified_at: Option<i64>,
}

impl From<Note> for NoteDetail {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            created_at: note.created_at,
            modified_at: note.modified_at,
        }
    }
}

impl From<&Note> for NoteSummary {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id,
            title: note.title.clone(),
            created_at: note.created_at,
        }
    }
}
