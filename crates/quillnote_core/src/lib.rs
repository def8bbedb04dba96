//! Core domain logic for quillnote.
//! This crate is the single source of truth for note ownership rules.

pub mod api;
pub mod config;
pub mod credential;
pub mod db;
pub mod identity;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use crate::config::Settings;
pub use identity::{IdentityError, OwnerContext, SessionClaims, OWNER_ID_CLAIM};
pub use logging::{
    default_log_level, init_logging, logging_status, normalize_level, LoggingError,
};
pub use model::note::{NewNote, Note, NoteChanges, NoteDetail, NoteId, NoteSummary};
pub use model::user::{NewUser, User, UserId};
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::note_service::{NoteService, NoteServiceError};
pub use service::user_service::{NewUserRequest, UserService, UserServiceError};
