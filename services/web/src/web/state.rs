//! services/web/src/web/state.rs
//!
//! Defines the application's shared state. It holds no per-user data: identity
//! lives in the client's session cookie.

use notes_core::{CredentialStore, DatabaseService, NoteManager};
use std::sync::Arc;

use crate::web::session::SessionCodec;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub credentials: CredentialStore,
    pub notes: NoteManager,
    pub sessions: SessionCodec,
}

impl AppState {
    pub fn new(db: Arc<dyn DatabaseService>, sessions: SessionCodec) -> Self {
        Self {
            credentials: CredentialStore::new(db.clone()),
            notes: NoteManager::new(db),
            sessions,
        }
    }
}
