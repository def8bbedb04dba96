//! Password credential hashing.
//!
//! Credentials are stored as argon2id PHC strings
//! (`$argon2id$v=19$m=19456,t=2,p=1$...`) with a fresh random salt per hash.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;
use thiserror::Error;

/// Hash checked when no stored credential exists, so lookups for unknown
/// accounts pay the same argon2 cost as real ones.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("quillnote-unknown-account").ok());

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("password cannot be empty")]
    Empty,
    #[error("failed to hash password: {0}")]
    Hash(String),
    #[error("stored password hash is malformed: {0}")]
    MalformedHash(String),
}

/// Hashes `password` with argon2id and a random salt.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    if password.is_empty() {
        return Err(CredentialError::Empty);
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| CredentialError::Hash(err.to_string()))?;
    Ok(hash.to_string())
}

/// Checks `password` against a stored PHC hash.
///
/// Returns `Ok(false)` on mismatch and `Err` only when `hash` cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, CredentialError> {
    let parsed =
        PasswordHash::new(hash).map_err(|err| CredentialError::MalformedHash(err.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Runs a full verification against a throwaway hash and reports a mismatch.
pub fn verify_password_unknown_account(password: &str) -> bool {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
    false
}
