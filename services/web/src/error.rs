//! services/web/src/error.rs
//!
//! Defines the startup error type for the service and the error type returned
//! by request handlers.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use notes_core::ServiceError;
use tracing::{error, warn};

use crate::config::ConfigError;
use crate::web::templates;

/// The primary error type for starting the `web` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

//=========================================================================================
// Handler Errors
//=========================================================================================

/// A core error that escaped a handler. Each variant maps to one page.
#[derive(Debug)]
pub struct WebError(pub ServiceError);

impl From<ServiceError> for WebError {
    fn from(err: ServiceError) -> Self {
        WebError(err)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self.0 {
            ServiceError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Html(templates::denied_page()),
            )
                .into_response(),
            ServiceError::NotFound(what) => {
                warn!("Not found: {}", what);
                (StatusCode::NOT_FOUND, Html(templates::not_found_page())).into_response()
            }
            ServiceError::LoginRequired => Redirect::to("/").into_response(),
            ServiceError::Validation(errors) => {
                warn!("Unhandled validation errors: {:?}", errors);
                (StatusCode::BAD_REQUEST, Html(templates::failure_page())).into_response()
            }
            ServiceError::Store(msg) => {
                error!("Store failure: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(templates::failure_page()),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn unauthorized_is_a_hard_denial_page() {
        let response = WebError(ServiceError::Unauthorized).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert!(body.contains("Unauthorized"));
    }

    #[tokio::test]
    async fn store_failure_hides_details() {
        let response =
            WebError(ServiceError::Store("connection reset by peer".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert!(!body.contains("connection reset"));
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = WebError(ServiceError::NotFound("Note 7".into())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
