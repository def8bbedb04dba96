//! Caller identity resolution.
//!
//! # Responsibility
//! - Turn an authenticated session's claim set into a validated owner id.
//! - Hand that id to note operations as an explicit per-request value.
//!
//! # Invariants
//! - An `OwnerContext` always holds a positive user id.
//! - Resolution failures never carry the raw claim value in logs or in the
//!   error's `Display` output.

use crate::model::user::UserId;
use log::warn;
use thiserror::Error;

/// Claim carrying the caller's numeric user id.
pub const OWNER_ID_CLAIM: &str = "Id";

/// Claim set of an already-authenticated session.
///
/// Claims keep insertion order; lookups return the first match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionClaims {
    claims: Vec<(String, String)>,
}

impl SessionClaims {
    /// Creates an empty claim set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one claim.
    pub fn with_claim(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.claims.push((name.into(), value.into()));
        self
    }

    /// Returns the value of the first claim named `name`.
    pub fn find_first(&self, name: &str) -> Option<&str> {
        self.claims
            .iter()
            .find(|(claim, _)| claim == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Identity resolution failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("session has no `Id` claim")]
    MissingClaim,
    #[error("session `Id` claim is not a positive integer")]
    MalformedClaim,
}

/// Resolved caller identity for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerContext {
    owner_id: UserId,
}

impl OwnerContext {
    /// Resolves the caller from the session's `Id` claim.
    ///
    /// # Errors
    /// - `MissingClaim` when the claim is absent.
    /// - `MalformedClaim` when the value is not a positive integer.
    pub fn resolve(claims: &SessionClaims) -> Result<Self, IdentityError> {
        let Some(raw) = claims.find_first(OWNER_ID_CLAIM) else {
            warn!("event=identity_resolve module=identity status=rejected reason=missing_claim");
            return Err(IdentityError::MissingClaim);
        };

        match raw.trim().parse::<UserId>() {
            Ok(owner_id) if owner_id > 0 => Ok(Self { owner_id }),
            _ => {
                warn!(
                    "event=identity_resolve module=identity status=rejected reason=malformed_claim"
                );
                Err(IdentityError::MalformedClaim)
            }
        }
    }

    /// Builds a context for a known user id without a session.
    pub fn for_user(owner_id: UserId) -> Self {
        Self { owner_id }
    }

    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }
}
