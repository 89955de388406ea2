//! crates/notes_core/src/testing.rs
//!
//! An in-memory `DatabaseService` for tests. One mutex guards the whole store,
//! so every method is trivially atomic.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::{NewUser, Note, User, UserCredentials};
use crate::ports::{DatabaseService, PortError, PortResult, UniqueField};

#[derive(Default)]
struct Tables {
    users: BTreeMap<String, NewUser>,
    notes: BTreeMap<i32, Note>,
    next_note_id: i32,
}

#[derive(Default)]
pub struct InMemoryDatabase {
    tables: Mutex<Tables>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_count(&self) -> usize {
        self.lock().map(|t| t.users.len()).unwrap_or_default()
    }

    pub fn note_count(&self) -> usize {
        self.lock().map(|t| t.notes.len()).unwrap_or_default()
    }

    /// Stored password hash, so tests can assert it is not the plaintext.
    pub fn password_hash(&self, username: &str) -> Option<String> {
        self.lock()
            .ok()?
            .users
            .get(username)
            .map(|u| u.password_hash.clone())
    }

    fn lock(&self) -> PortResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| PortError::Unexpected("in-memory store poisoned".to_string()))
    }
}

fn to_user(row: &NewUser) -> User {
    User {
        username: row.username.clone(),
        email: row.email.clone(),
        first_name: row.first_name.clone(),
        last_name: row.last_name.clone(),
    }
}

fn note_not_found(note_id: i32) -> PortError {
    PortError::NotFound(format!("Note {} not found", note_id))
}

#[async_trait]
impl DatabaseService for InMemoryDatabase {
    async fn username_exists(&self, username: &str) -> PortResult<bool> {
        Ok(self.lock()?.users.contains_key(username))
    }

    async fn email_exists(&self, email: &str) -> PortResult<bool> {
        Ok(self.lock()?.users.values().any(|u| u.email == email))
    }

    async fn create_user(&self, new_user: NewUser) -> PortResult<User> {
        let mut tables = self.lock()?;
        if tables.users.contains_key(&new_user.username) {
            return Err(PortError::Conflict(UniqueField::Username));
        }
        if tables.users.values().any(|u| u.email == new_user.email) {
            return Err(PortError::Conflict(UniqueField::Email));
        }
        let user = to_user(&new_user);
        tables.users.insert(new_user.username.clone(), new_user);
        Ok(user)
    }

    async fn get_user(&self, username: &str) -> PortResult<User> {
        self.lock()?
            .users
            .get(username)
            .map(to_user)
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", username)))
    }

    async fn get_user_credentials(&self, username: &str) -> PortResult<UserCredentials> {
        self.lock()?
            .users
            .get(username)
            .map(|u| UserCredentials {
                username: u.username.clone(),
                password_hash: u.password_hash.clone(),
            })
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", username)))
    }

    async fn delete_user_and_notes(&self, username: &str) -> PortResult<()> {
        let mut tables = self.lock()?;
        if !tables.users.contains_key(username) {
            return Err(PortError::NotFound(format!("User {} not found", username)));
        }
        tables.notes.retain(|_, n| n.owner_username != username);
        tables.users.remove(username);
        Ok(())
    }

    async fn get_notes_for_user(&self, username: &str) -> PortResult<Vec<Note>> {
        Ok(self
            .lock()?
            .notes
            .values()
            .filter(|n| n.owner_username == username)
            .cloned()
            .collect())
    }

    async fn get_note_by_id(&self, note_id: i32) -> PortResult<Note> {
        self.lock()?
            .notes
            .get(&note_id)
            .cloned()
            .ok_or_else(|| note_not_found(note_id))
    }

    async fn create_note(
        &self,
        owner_username: &str,
        title: &str,
        content: &str,
    ) -> PortResult<Note> {
        let mut tables = self.lock()?;
        if !tables.users.contains_key(owner_username) {
            return Err(PortError::Unexpected(format!(
                "foreign key violation: no user {}",
                owner_username
            )));
        }
        tables.next_note_id += 1;
        let note = Note {
            id: tables.next_note_id,
            title: title.to_string(),
            content: content.to_string(),
            owner_username: owner_username.to_string(),
        };
        tables.notes.insert(note.id, note.clone());
        Ok(note)
    }

    async fn update_note(&self, note_id: i32, title: &str, content: &str) -> PortResult<Note> {
        let mut tables = self.lock()?;
        let note = tables
            .notes
            .get_mut(&note_id)
            .ok_or_else(|| note_not_found(note_id))?;
        note.title = title.to_string();
        note.content = content.to_string();
        Ok(note.clone())
    }

    async fn delete_note(&self, note_id: i32) -> PortResult<()> {
        self.lock()?
            .notes
            .remove(&note_id)
            .map(|_| ())
            .ok_or_else(|| note_not_found(note_id))
    }
}
