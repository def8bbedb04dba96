//! User account model.

/// Numeric identifier of a registered user.
pub type UserId = i64;

/// Persisted user account.
///
/// Only the password hash is ever held; the plaintext credential is dropped
/// once hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    /// Registration time in epoch milliseconds.
    pub created_at: i64,
}

/// Insert shape for a new user row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: i64,
}
