//! Note repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide owner-filtered persistence APIs over the `notes` table.
//! - Run ownership check and mutation for update/delete in one write
//!   transaction.
//!
//! # Invariants
//! - Every query and mutation carries `owner_id = ?` in its `WHERE` clause.
//! - Update/delete take the SQLite write lock (`BEGIN IMMEDIATE`) before the
//!   ownership read, so no other writer can interleave between check and act.
//! - A write that touches a row count other than one is rolled back.

use crate::model::note::{NewNote, Note, NoteChanges, NoteId, NoteSummary};
use crate::model::user::UserId;
use crate::repo::{ensure_table_ready, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const NOTE_COLUMNS: &[&str] = &[
    "id",
    "owner_id",
    "title",
    "content",
    "created_at",
    "modified_at",
];

/// Repository interface for ownership-scoped note persistence.
///
/// Write methods return the number of rows they affected.
pub trait NoteRepository {
    /// Inserts one note row.
    fn insert_note(&self, note: &NewNote) -> RepoResult<usize>;
    /// Lists summary projections of every note owned by `owner_id`.
    fn list_note_summaries(&self, owner_id: UserId) -> RepoResult<Vec<NoteSummary>>;
    /// Finds one note by id, only when owned by `owner_id`.
    fn find_note(&self, owner_id: UserId, note_id: NoteId) -> RepoResult<Option<Note>>;
    /// Verifies ownership, then overwrites title/content/modified_at.
    fn update_note(
        &mut self,
        owner_id: UserId,
        note_id: NoteId,
        changes: &NoteChanges,
    ) -> RepoResult<usize>;
    /// Verifies ownership, then removes the row.
    fn delete_note(&mut self, owner_id: UserId, note_id: NoteId) -> RepoResult<usize>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "notes", NOTE_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn insert_note(&self, note: &NewNote) -> RepoResult<usize> {
        let inserted = self.conn.execute(
            "INSERT INTO notes (owner_id, title, content, created_at, modified_at)
             VALUES (?1, ?2, ?3, ?4, NULL);",
            params![
                note.owner_id(),
                note.title.as_str(),
                note.content.as_str(),
                note.created_at,
            ],
        )?;
        Ok(inserted)
    }

    fn list_note_summaries(&self, owner_id: UserId) -> RepoResult<Vec<NoteSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, created_at
             FROM notes
             WHERE owner_id = ?1
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([owner_id])?;
        let mut summaries = Vec::new();
        while let Some(row) = rows.next()? {
            summaries.push(NoteSummary {
                id: row.get("id")?,
                title: row.get("title")?,
                created_at: row.get("created_at")?,
            });
        }
        Ok(summaries)
    }

    fn find_note(&self, owner_id: UserId, note_id: NoteId) -> RepoResult<Option<Note>> {
        let note = self
            .conn
            .query_row(
                "SELECT id, owner_id, title, content, created_at, modified_at
                 FROM notes
                 WHERE id = ?1
                   AND owner_id = ?2;",
                params![note_id, owner_id],
                parse_note_row,
            )
            .optional()?;
        Ok(note)
    }

    fn update_note(
        &mut self,
        owner_id: UserId,
        note_id: NoteId,
        changes: &NoteChanges,
    ) -> RepoResult<usize> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !note_owned_in_tx(&tx, owner_id, note_id)? {
            return Ok(0);
        }

        let changed = tx.execute(
            "UPDATE notes
             SET
                title = ?3,
                content = ?4,
                modified_at = ?5
             WHERE id = ?1
               AND owner_id = ?2;",
            params![
                note_id,
                owner_id,
                changes.title.as_str(),
                changes.content.as_str(),
                changes.modified_at,
            ],
        )?;

        // Dropping the transaction without commit rolls back.
        if changed == 1 {
            tx.commit()?;
        }
        Ok(changed)
    }

    fn delete_note(&mut self, owner_id: UserId, note_id: NoteId) -> RepoResult<usize> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !note_owned_in_tx(&tx, owner_id, note_id)? {
            return Ok(0);
        }

        let removed = tx.execute(
            "DELETE FROM notes WHERE id = ?1 AND owner_id = ?2;",
            params![note_id, owner_id],
        )?;

        if removed == 1 {
            tx.commit()?;
        }
        Ok(removed)
    }
}

fn parse_note_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get("id")?,
        owner_id: row.get("owner_id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        created_at: row.get("created_at")?,
        modified_at: row.get("modified_at")?,
    })
}

fn note_owned_in_tx(tx: &Transaction<'_>, owner_id: UserId, note_id: NoteId) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM notes
            WHERE id = ?1
              AND owner_id = ?2
        );",
        params![note_id, owner_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
