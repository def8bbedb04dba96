use quillnote_core::db::open_db;
use quillnote_core::{NoteService, OwnerContext, SqliteNoteRepository};
use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;

const WRITERS: usize = 8;

fn seeded_note(path: &Path) -> (OwnerContext, i64) {
    let mut conn = open_db(path).unwrap();
    conn.execute(
        "INSERT INTO users (email, username, password_hash, created_at)
         VALUES ('owner@example.com', 'owner', 'hash', 0);",
        [],
    )
    .unwrap();
    let owner = OwnerContext::for_user(conn.last_insert_rowid());

    let service = NoteService::new(SqliteNoteRepository::try_new(&mut conn).unwrap());
    assert!(service.create_note(&owner, "start", "start"));
    let note_id = service.list_notes(&owner).unwrap()[0].id;
    (owner, note_id)
}

#[test]
fn concurrent_updates_never_splice_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("concurrent.db");
    let (owner, note_id) = seeded_note(&path);
    let barrier = Arc::new(Barrier::new(WRITERS));

    let handles: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut conn = open_db(&path).unwrap();
                let mut service =
                    NoteService::new(SqliteNoteRepository::try_new(&mut conn).unwrap());
                barrier.wait();
                service.update_note(
                    &owner,
                    note_id,
                    format!("title-{writer}"),
                    format!("content-{writer}"),
                )
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap(), "every owned update should succeed");
    }

    let mut conn = open_db(&path).unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&mut conn).unwrap());
    let detail = service.get_note(&owner, note_id).unwrap().unwrap();
    let title_writer = detail.title.trim_start_matches("title-");
    let content_writer = detail.content.trim_start_matches("content-");
    assert_eq!(title_writer, content_writer, "row mixes two writes: {detail:?}");
}

#[test]
fn concurrent_deletes_succeed_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("concurrent.db");
    let (owner, note_id) = seeded_note(&path);
    let barrier = Arc::new(Barrier::new(WRITERS));

    let handles: Vec<_> = (0..WRITERS)
        .map(|_| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut conn = open_db(&path).unwrap();
                let mut service =
                    NoteService::new(SqliteNoteRepository::try_new(&mut conn).unwrap());
                barrier.wait();
                service.delete_note(&owner, note_id)
            })
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .filter(|deleted| *deleted)
        .count();
    assert_eq!(successes, 1);
}
