//! User registration service.
//!
//! # Responsibility
//! - Register accounts with a hashed credential and server-side timestamp.
//! - Check a username/password pair against the stored hash.
//!
//! # Invariants
//! - Plaintext passwords never reach the repository.
//! - Duplicate email or username registrations fail without writing.

use crate::credential::{hash_password, verify_password, verify_password_unknown_account};
use crate::model::now_epoch_ms;
use crate::model::user::{NewUser, UserId};
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use log::{error, info, warn};
use thiserror::Error;

/// Registration input after transport-level validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Error)]
pub enum UserServiceError {
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// User service facade over repository implementations.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers one user.
    ///
    /// Returns `true` iff exactly one row was inserted. Duplicate email or
    /// username, hashing failures and storage errors all return `false`.
    pub fn register_user(&mut self, request: &NewUserRequest) -> bool {
        let password_hash = match hash_password(&request.password) {
            Ok(hash) => hash,
            Err(err) => {
                error!("event=user_register module=user_service status=error error={err}");
                return false;
            }
        };

        let user = NewUser {
            email: request.email.trim().to_string(),
            username: request.username.trim().to_string(),
            password_hash,
            created_at: now_epoch_ms(),
        };

        match self.repo.insert_user_if_unique(&user) {
            Ok(1) => {
                info!("event=user_register module=user_service status=ok");
                true
            }
            Ok(rows) => {
                warn!(
                    "event=user_register module=user_service status=rejected rows_affected={rows}"
                );
                false
            }
            Err(err) => {
                error!("event=user_register module=user_service status=error error={err}");
                false
            }
        }
    }

    /// Returns the user id when `password` matches the stored credential.
    ///
    /// Unknown usernames and wrong passwords both yield `Ok(None)` after the
    /// same hashing work.
    pub fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserId>, UserServiceError> {
        let Some(user) = self.repo.find_by_username(username.trim())? else {
            verify_password_unknown_account(password);
            return Ok(None);
        };

        match verify_password(password, &user.password_hash) {
            Ok(true) => Ok(Some(user.id)),
            Ok(false) => Ok(None),
            Err(err) => {
                error!(
                    "event=user_verify module=user_service status=error user_id={} error={err}",
                    user.id
                );
                Ok(None)
            }
        }
    }
}
