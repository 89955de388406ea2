//! crates/notes_core/src/error.rs
//!
//! The error values returned by every core operation. The request layer
//! inspects the variant to decide which response to produce.

use crate::ports::PortError;
use crate::validation::FieldError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// One or more user-correctable field errors. Nothing was written.
    #[error("Validation failed: {0:?}")]
    Validation(Vec<FieldError>),

    /// The caller's identity does not own the resource, or the anti-forgery
    /// token was missing or wrong.
    #[error("Unauthorized")]
    Unauthorized,

    /// An anonymous caller asked for a page that needs a login.
    #[error("Login required")]
    LoginRequired,

    #[error("Not found: {0}")]
    NotFound(String),

    /// The store could not complete the operation. Nothing was applied.
    #[error("Store failure: {0}")]
    Store(String),
}

impl From<PortError> for ServiceError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound(what) => ServiceError::NotFound(what),
            PortError::Conflict(field) => {
                ServiceError::Store(format!("unexpected unique violation on {field}"))
            }
            PortError::Unexpected(msg) => ServiceError::Store(msg),
        }
    }
}

/// A convenience type alias for `Result<T, ServiceError>`.
pub type ServiceResult<T> = Result<T, ServiceError>;
