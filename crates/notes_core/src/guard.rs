//! crates/notes_core/src/guard.rs
//!
//! Per-request identity and the ownership checks every guarded operation runs
//! before touching the store.

use crate::domain::Note;
use crate::error::{ServiceError, ServiceResult};

/// Who is making the current request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Identity {
    #[default]
    Anonymous,
    Authenticated(String),
}

impl Identity {
    pub fn authenticated(username: impl Into<String>) -> Self {
        Identity::Authenticated(username.into())
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Identity::Anonymous => None,
            Identity::Authenticated(username) => Some(username),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated(_))
    }

    /// Hard check: the caller must be logged in as `owner`.
    ///
    /// Anonymous callers get `Unauthorized` too, not `LoginRequired`.
    pub fn authorize(&self, owner: &str) -> ServiceResult<()> {
        match self.username() {
            Some(username) if username == owner => Ok(()),
            _ => Err(ServiceError::Unauthorized),
        }
    }

    /// Check for read-only pages: anonymous callers are asked to log in,
    /// logged-in strangers are denied.
    pub fn authorize_view(&self, owner: &str) -> ServiceResult<()> {
        match self {
            Identity::Anonymous => Err(ServiceError::LoginRequired),
            Identity::Authenticated(_) => self.authorize(owner),
        }
    }
}

//=========================================================================================
// Ownership
//=========================================================================================

/// Resources that belong to exactly one user.
pub trait OwnedResource {
    fn owner_username(&self) -> &str;
}

pub trait OwnershipEnforcer {
    /// Returns `Unauthorized` unless `identity` is the owner.
    fn verify_ownership(&self, identity: &Identity) -> ServiceResult<()>;
}

impl<T: OwnedResource> OwnershipEnforcer for T {
    fn verify_ownership(&self, identity: &Identity) -> ServiceResult<()> {
        identity.authorize(self.owner_username())
    }
}

impl OwnedResource for Note {
    fn owner_username(&self) -> &str {
        &self.owner_username
    }
}

/// Gate for the anti-forgery token. The caller computes `valid`.
pub fn require_valid_token(valid: bool) -> ServiceResult<()> {
    if valid {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}
