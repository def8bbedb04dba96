//! Transport-facing request/response layer.
//!
//! # Responsibility
//! - Validate request shapes before they reach services.
//! - Resolve the caller identity once per note request.
//! - Map service outcomes to status codes and response bodies.
//!
//! # Invariants
//! - Identity failures map to a generic `401` without detail.
//! - Not-owned and missing notes map to the same `404` / `400` responses.
//! - Storage error details are logged, never returned.
//!
//! Status mapping:
//! - create/update/delete `false` -> `400`
//! - get not-found -> `404`
//! - storage error on reads -> `500`
//! - otherwise `200`

use crate::identity::{OwnerContext, SessionClaims};
use crate::model::note::{NoteDetail, NoteId, NoteSummary};
use crate::repo::note_repo::NoteRepository;
use crate::repo::user_repo::UserRepository;
use crate::service::note_service::NoteService;
use crate::service::user_service::{NewUserRequest, UserService};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_UNAUTHORIZED: u16 = 401;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

const TITLE_MIN_CHARS: usize = 2;
const TITLE_MAX_CHARS: usize = 100;
const CONTENT_MAX_CHARS: usize = 8000;
const USERNAME_MIN_CHARS: usize = 4;
const PASSWORD_MIN_CHARS: usize = 4;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// One failed validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Response payload variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ApiBody {
    Message(String),
    ValidationErrors(Vec<FieldError>),
    NoteList(Vec<NoteSummary>),
    Note(NoteDetail),
    Empty,
}

/// Transport response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ApiBody,
}

impl ApiResponse {
    fn ok(body: ApiBody) -> Self {
        Self {
            status: STATUS_OK,
            body,
        }
    }

    fn message(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiBody::Message(message.into()),
        }
    }

    fn invalid(errors: Vec<FieldError>) -> Self {
        Self {
            status: STATUS_BAD_REQUEST,
            body: ApiBody::ValidationErrors(errors),
        }
    }

    fn unauthorized() -> Self {
        Self::message(STATUS_UNAUTHORIZED, "Unauthorized.")
    }

    fn internal_error() -> Self {
        Self::message(STATUS_INTERNAL_ERROR, "An unexpected error occurred.")
    }

    /// Whether the status is in the `2xx` range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Create-note request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteCreate {
    pub title: String,
    pub content: String,
}

impl NoteCreate {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        validate_note_fields(&self.title, &self.content, &mut errors);
        errors
    }
}

/// Update-note request body. Carries no owner field by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteUpdate {
    pub id: NoteId,
    pub title: String,
    pub content: String,
}

impl NoteUpdate {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.id <= 0 {
            errors.push(FieldError::new("id", "must be a positive integer"));
        }
        validate_note_fields(&self.title, &self.content, &mut errors);
        errors
    }
}

/// Registration request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRegister {
    pub email: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

impl UserRegister {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if !EMAIL_RE.is_match(self.email.trim()) {
            errors.push(FieldError::new("email", "must be a valid email address"));
        }
        if self.username.trim().chars().count() < USERNAME_MIN_CHARS {
            errors.push(FieldError::new(
                "username",
                format!("must be at least {USERNAME_MIN_CHARS} characters"),
            ));
        }
        if self.password.chars().count() < PASSWORD_MIN_CHARS {
            errors.push(FieldError::new(
                "password",
                format!("must be at least {PASSWORD_MIN_CHARS} characters"),
            ));
        }
        if self.confirm_password != self.password {
            errors.push(FieldError::new("confirm_password", "must match password"));
        }
        errors
    }
}

fn validate_note_fields(title: &str, content: &str, errors: &mut Vec<FieldError>) {
    let title_chars = title.trim().chars().count();
    if title_chars < TITLE_MIN_CHARS {
        errors.push(FieldError::new(
            "title",
            format!("must be at least {TITLE_MIN_CHARS} characters"),
        ));
    } else if title_chars > TITLE_MAX_CHARS {
        errors.push(FieldError::new(
            "title",
            format!("must be at most {TITLE_MAX_CHARS} characters"),
        ));
    }

    if content.trim().is_empty() {
        errors.push(FieldError::new("content", "is required"));
    } else if content.chars().count() > CONTENT_MAX_CHARS {
        errors.push(FieldError::new(
            "content",
            format!("must be at most {CONTENT_MAX_CHARS} characters"),
        ));
    }
}

/// Create-note handler (`POST /notes`).
pub fn create_note<R: NoteRepository>(
    service: &NoteService<R>,
    claims: &SessionClaims,
    request: &NoteCreate,
) -> ApiResponse {
    let Ok(ctx) = OwnerContext::resolve(claims) else {
        return ApiResponse::unauthorized();
    };
    let errors = request.validate();
    if !errors.is_empty() {
        return ApiResponse::invalid(errors);
    }

    if service.create_note(&ctx, request.title.as_str(), request.content.as_str()) {
        ApiResponse::message(STATUS_OK, "Note created successfully.")
    } else {
        ApiResponse::message(STATUS_BAD_REQUEST, "Note could not be created.")
    }
}

/// List-notes handler (`GET /notes`).
pub fn list_notes<R: NoteRepository>(
    service: &NoteService<R>,
    claims: &SessionClaims,
) -> ApiResponse {
    let Ok(ctx) = OwnerContext::resolve(claims) else {
        return ApiResponse::unauthorized();
    };

    match service.list_notes(&ctx) {
        Ok(notes) => ApiResponse::ok(ApiBody::NoteList(notes)),
        Err(_) => ApiResponse::internal_error(),
    }
}

/// Note-detail handler (`GET /notes/{id}`).
pub fn get_note<R: NoteRepository>(
    service: &NoteService<R>,
    claims: &SessionClaims,
    note_id: NoteId,
) -> ApiResponse {
    let Ok(ctx) = OwnerContext::resolve(claims) else {
        return ApiResponse::unauthorized();
    };

    match service.get_note(&ctx, note_id) {
        Ok(Some(detail)) => ApiResponse::ok(ApiBody::Note(detail)),
        Ok(None) => ApiResponse {
            status: STATUS_NOT_FOUND,
            body: ApiBody::Empty,
        },
        Err(_) => ApiResponse::internal_error(),
    }
}

/// Update-note handler (`PUT /notes`).
pub fn update_note<R: NoteRepository>(
    service: &mut NoteService<R>,
    claims: &SessionClaims,
    request: &NoteUpdate,
) -> ApiResponse {
    let Ok(ctx) = OwnerContext::resolve(claims) else {
        return ApiResponse::unauthorized();
    };
    let errors = request.validate();
    if !errors.is_empty() {
        return ApiResponse::invalid(errors);
    }

    if service.update_note(
        &ctx,
        request.id,
        request.title.as_str(),
        request.content.as_str(),
    ) {
        ApiResponse::message(STATUS_OK, "Note updated successfully.")
    } else {
        ApiResponse::message(STATUS_BAD_REQUEST, "Note could not be updated.")
    }
}

/// Delete-note handler (`DELETE /notes/{id}`).
pub fn delete_note<R: NoteRepository>(
    service: &mut NoteService<R>,
    claims: &SessionClaims,
    note_id: NoteId,
) -> ApiResponse {
    let Ok(ctx) = OwnerContext::resolve(claims) else {
        return ApiResponse::unauthorized();
    };

    if service.delete_note(&ctx, note_id) {
        ApiResponse::message(
            STATUS_OK,
            format!("Note {note_id} was deleted successfully."),
        )
    } else {
        ApiResponse::message(
            STATUS_BAD_REQUEST,
            format!("Note {note_id} could not be deleted."),
        )
    }
}

/// Registration handler (`POST /users`).
pub fn register_user<R: UserRepository>(
    service: &mut UserService<R>,
    request: &UserRegister,
) -> ApiResponse {
    let errors = request.validate();
    if !errors.is_empty() {
        return ApiResponse::invalid(errors);
    }

    let registration = NewUserRequest {
        email: request.email.clone(),
        username: request.username.clone(),
        password: request.password.clone(),
    };
    if service.register_user(&registration) {
        ApiResponse::message(STATUS_OK, "User was registered.")
    } else {
        ApiResponse::message(STATUS_BAD_REQUEST, "User could not be registered.")
    }
}
