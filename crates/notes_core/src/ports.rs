//! crates/notes_core/src/ports.rs
//!
//! Defines the storage contract for the application's core logic.
//! The trait forms the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete database.

use async_trait::async_trait;

use crate::domain::{NewUser, Note, User, UserCredentials};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the underlying store.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    /// A unique constraint rejected the write. Carries the offending column.
    #[error("Unique constraint violated on {0}")]
    Conflict(UniqueField),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// The user columns that carry a unique constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

impl std::fmt::Display for UniqueField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UniqueField::Username => f.write_str("username"),
            UniqueField::Email => f.write_str("email"),
        }
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Persistent store for users and notes.
///
/// Every method is one atomic unit: implementations must either apply all of a
/// method's writes or none of them.
#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- User Management ---
    async fn username_exists(&self, username: &str) -> PortResult<bool>;

    async fn email_exists(&self, email: &str) -> PortResult<bool>;

    async fn create_user(&self, new_user: NewUser) -> PortResult<User>;

    async fn get_user(&self, username: &str) -> PortResult<User>;

    async fn get_user_credentials(&self, username: &str) -> PortResult<UserCredentials>;

    /// Removes every note owned by `username` and then the user row itself.
    async fn delete_user_and_notes(&self, username: &str) -> PortResult<()>;

    // --- Note Management ---
    async fn get_notes_for_user(&self, username: &str) -> PortResult<Vec<Note>>;

    async fn get_note_by_id(&self, note_id: i32) -> PortResult<Note>;

    async fn create_note(&self, owner_username: &str, title: &str, content: &str)
        -> PortResult<Note>;

    /// Replaces title and content. Id and owner are never touched.
    async fn update_note(&self, note_id: i32, title: &str, content: &str) -> PortResult<Note>;

    async fn delete_note(&self, note_id: i32) -> PortResult<()>;
}
