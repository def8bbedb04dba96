//! Ownership-scoped note use-case service.
//!
//! # Responsibility
//! - Provide create/list/get/update/delete APIs bound to a caller identity.
//! - Stamp new notes with the caller's owner id and creation time.
//! - Collapse single-record write outcomes into a success flag.
//!
//! # Invariants
//! - Every operation takes the caller's `OwnerContext` explicitly; the owner
//!   id is never read from request data.
//! - A note owned by someone else is reported exactly like a missing note.
//! - A write succeeds only when exactly one row was affected.
//! - Storage errors on writes are logged and reported as `false`; on reads
//!   they are returned as `NoteServiceError`.

use crate::identity::OwnerContext;
use crate::model::note::{NewNote, NoteChanges, NoteDetail, NoteId, NoteSummary};
use crate::model::now_epoch_ms;
use crate::repo::note_repo::NoteRepository;
use crate::repo::{RepoError, RepoResult};
use log::{error, info, warn};
use thiserror::Error;

/// Service error for note reads.
#[derive(Debug, Error)]
pub enum NoteServiceError {
    /// Persistence-layer failure.
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one note owned by the caller.
    ///
    /// Returns `true` iff exactly one row was written.
    pub fn create_note(
        &self,
        ctx: &OwnerContext,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> bool {
        let note = NewNote::stamped(ctx, title, content, now_epoch_ms());
        let outcome = self.repo.insert_note(&note);
        single_row_write("note_create", ctx, None, outcome)
    }

    /// Lists summaries of every note owned by the caller, in storage order.
    pub fn list_notes(&self, ctx: &OwnerContext) -> Result<Vec<NoteSummary>, NoteServiceError> {
        let summaries = self
            .repo
            .list_note_summaries(ctx.owner_id())
            .inspect_err(|err| read_failed("note_list", ctx, None, err))?;
        Ok(summaries)
    }

    /// Gets one note when it exists and is owned by the caller.
    pub fn get_note(
        &self,
        ctx: &OwnerContext,
        note_id: NoteId,
    ) -> Result<Option<NoteDetail>, NoteServiceError> {
        let note = self
            .repo
            .find_note(ctx.owner_id(), note_id)
            .inspect_err(|err| read_failed("note_get", ctx, Some(note_id), err))?;
        Ok(note.map(NoteDetail::from))
    }

    /// Replaces title and content of a note owned by the caller.
    ///
    /// Ownership is re-verified inside the write transaction. `created_at` is
    /// left untouched and `modified_at` is set to the current time.
    pub fn update_note(
        &mut self,
        ctx: &OwnerContext,
        note_id: NoteId,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> bool {
        let changes = NoteChanges {
            title: title.into(),
            content: content.into(),
            modified_at: now_epoch_ms(),
        };
        let outcome = self.repo.update_note(ctx.owner_id(), note_id, &changes);
        single_row_write("note_update", ctx, Some(note_id), outcome)
    }

    /// Deletes a note owned by the caller.
    pub fn delete_note(&mut self, ctx: &OwnerContext, note_id: NoteId) -> bool {
        let outcome = self.repo.delete_note(ctx.owner_id(), note_id);
        single_row_write("note_delete", ctx, Some(note_id), outcome)
    }
}

fn single_row_write(
    event: &str,
    ctx: &OwnerContext,
    note_id: Option<NoteId>,
    outcome: RepoResult<usize>,
) -> bool {
    let note_id = note_id_label(note_id);
    match outcome {
        Ok(1) => {
            info!(
                "event={event} module=note_service status=ok owner_id={} note_id={note_id}",
                ctx.owner_id()
            );
            true
        }
        Ok(rows) => {
            warn!(
                "event={event} module=note_service status=rejected owner_id={} note_id={note_id} rows_affected={rows}",
                ctx.owner_id()
            );
            false
        }
        Err(err) => {
            error!(
                "event={event} module=note_service status=error owner_id={} note_id={note_id} error={err}",
                ctx.owner_id()
            );
            false
        }
    }
}

fn read_failed(event: &str, ctx: &OwnerContext, note_id: Option<NoteId>, err: &RepoError) {
    error!(
        "event={event} module=note_service status=error owner_id={} note_id={} error={err}",
        ctx.owner_id(),
        note_id_label(note_id)
    );
}

fn note_id_label(note_id: Option<NoteId>) -> String {
    note_id.map_or_else(|| "-".to_string(), |id| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::NoteService;
    use crate::db::DbError;
    use crate::identity::OwnerContext;
    use crate::model::note::{NewNote, Note, NoteChanges, NoteId, NoteSummary};
    use crate::model::user::UserId;
    use crate::repo::note_repo::NoteRepository;
    use crate::repo::{RepoError, RepoResult};

    /// Repository double that reports a fixed affected-row count.
    struct FixedRowsRepo {
        rows: usize,
        fail: bool,
    }

    impl FixedRowsRepo {
        fn outcome(&self) -> RepoResult<usize> {
            if self.fail {
                Err(RepoError::Db(DbError::Sqlite(
                    rusqlite::Error::InvalidQuery,
                )))
            } else {
                Ok(self.rows)
            }
        }
    }

    impl NoteRepository for FixedRowsRepo {
        fn insert_note(&self, _note: &NewNote) -> RepoResult<usize> {
            self.outcome()
        }

        fn list_note_summaries(&self, _owner_id: UserId) -> RepoResult<Vec<NoteSummary>> {
            self.outcome().map(|_| Vec::new())
        }

        fn find_note(&self, _owner_id: UserId, _note_id: NoteId) -> RepoResult<Option<Note>> {
            self.outcome().map(|_| None)
        }

        fn update_note(
            &mut self,
            _owner_id: UserId,
            _note_id: NoteId,
            _changes: &NoteChanges,
        ) -> RepoResult<usize> {
            self.outcome()
        }

        fn delete_note(&mut self, _owner_id: UserId, _note_id: NoteId) -> RepoResult<usize> {
            self.outcome()
        }
    }

    #[test]
    fn writes_fail_unless_exactly_one_row_changed() {
        let ctx = OwnerContext::for_user(1);
        for rows in [0, 2] {
            let mut service = NoteService::new(FixedRowsRepo { rows, fail: false });
            assert!(!service.create_note(&ctx, "t", "c"));
            assert!(!service.update_note(&ctx, 1, "t", "c"));
            assert!(!service.delete_note(&ctx, 1));
        }

        let mut service = NoteService::new(FixedRowsRepo {
            rows: 1,
            fail: false,
        });
        assert!(service.create_note(&ctx, "t", "c"));
        assert!(service.update_note(&ctx, 1, "t", "c"));
        assert!(service.delete_note(&ctx, 1));
    }

    #[test]
    fn storage_errors_become_false_on_writes_and_errors_on_reads() {
        let ctx = OwnerContext::for_user(1);
        let mut service = NoteService::new(FixedRowsRepo {
            rows: 1,
            fail: true,
        });

        assert!(!service.create_note(&ctx, "t", "c"));
        assert!(!service.update_note(&ctx, 1, "t", "c"));
        assert!(!service.delete_note(&ctx, 1));
        assert!(service.list_notes(&ctx).is_err());
        assert!(service.get_note(&ctx, 1).is_err());
    }
}
