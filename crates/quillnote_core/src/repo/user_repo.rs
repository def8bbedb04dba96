//! User repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Email and username are unique, compared case-insensitively.
//! - The duplicate check and the insert share one `BEGIN IMMEDIATE`
//!   transaction; the `UNIQUE` constraints back it up.

use crate::model::user::{NewUser, User};
use crate::repo::{ensure_table_ready, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

const USER_COLUMNS: &[&str] = &["id", "email", "username", "password_hash", "created_at"];

/// Repository interface for user accounts.
pub trait UserRepository {
    /// Inserts `user` unless its email or username is already taken.
    ///
    /// Returns the number of inserted rows (`0` on duplicates).
    fn insert_user_if_unique(&mut self, user: &NewUser) -> RepoResult<usize>;
    /// Finds a user by username, case-insensitively.
    fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "users", USER_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn insert_user_if_unique(&mut self, user: &NewUser) -> RepoResult<usize> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let taken: i64 = tx.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM users
                WHERE email = ?1 COLLATE NOCASE
                   OR username = ?2 COLLATE NOCASE
            );",
            params![user.email.as_str(), user.username.as_str()],
            |row| row.get(0),
        )?;
        if taken == 1 {
            return Ok(0);
        }

        let inserted = tx.execute(
            "INSERT INTO users (email, username, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                user.email.as_str(),
                user.username.as_str(),
                user.password_hash.as_str(),
                user.created_at,
            ],
        )?;

        if inserted == 1 {
            tx.commit()?;
        }
        Ok(inserted)
    }

    fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, email, username, password_hash, created_at
                 FROM users
                 WHERE username = ?1 COLLATE NOCASE;",
                [username],
                |row| {
                    Ok(User {
                        id: row.get("id")?,
                        email: row.get("email")?,
                        username: row.get("username")?,
                        password_hash: row.get("password_hash")?,
                        created_at: row.get("created_at")?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }
}
