//! crates/notes_core/src/notes.rs
//!
//! Note lifecycle scoped to the owning user, plus the account deletion that
//! takes a user's notes with it. Every operation takes the caller's `Identity`
//! and checks ownership before it reads or writes anything it guards.

use std::sync::Arc;

use crate::domain::{Note, User};
use crate::error::{ServiceError, ServiceResult};
use crate::guard::{Identity, OwnershipEnforcer};
use crate::ports::DatabaseService;
use crate::validation::NoteInput;

#[derive(Clone)]
pub struct NoteManager {
    db: Arc<dyn DatabaseService>,
}

impl NoteManager {
    pub fn new(db: Arc<dyn DatabaseService>) -> Self {
        Self { db }
    }

    /// The profile page: the user and all of their notes.
    ///
    /// Anonymous callers get `LoginRequired`, other users get `Unauthorized`.
    pub async fn user_profile(
        &self,
        identity: &Identity,
        username: &str,
    ) -> ServiceResult<(User, Vec<Note>)> {
        identity.authorize_view(username)?;
        let user = self.db.get_user(username).await?;
        let notes = self.db.get_notes_for_user(username).await?;
        Ok((user, notes))
    }

    /// Guard for showing the empty add-note form. The owner must still exist,
    /// since a session can outlive its account.
    pub async fn authorize_add_note(
        &self,
        identity: &Identity,
        owner_username: &str,
    ) -> ServiceResult<()> {
        identity.authorize(owner_username)?;
        self.db.get_user(owner_username).await?;
        Ok(())
    }

    pub async fn add_note(
        &self,
        identity: &Identity,
        owner_username: &str,
        input: NoteInput,
    ) -> ServiceResult<Note> {
        self.authorize_add_note(identity, owner_username).await?;
        let errors = input.validate();
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }
        Ok(self
            .db
            .create_note(owner_username, &input.title, &input.content)
            .await?)
    }

    /// Loads a note for the edit form, only for its owner.
    pub async fn note_for_edit(&self, identity: &Identity, note_id: i32) -> ServiceResult<Note> {
        let note = self.db.get_note_by_id(note_id).await?;
        note.verify_ownership(identity)?;
        Ok(note)
    }

    pub async fn update_note(
        &self,
        identity: &Identity,
        note_id: i32,
        input: NoteInput,
    ) -> ServiceResult<Note> {
        let note = self.db.get_note_by_id(note_id).await?;
        note.verify_ownership(identity)?;
        let errors = input.validate();
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }
        Ok(self
            .db
            .update_note(note.id, &input.title, &input.content)
            .await?)
    }

    /// Deletes a note and hands it back so the caller knows whose page to show.
    pub async fn delete_note(&self, identity: &Identity, note_id: i32) -> ServiceResult<Note> {
        let note = self.db.get_note_by_id(note_id).await?;
        note.verify_ownership(identity)?;
        self.db.delete_note(note.id).await?;
        Ok(note)
    }

    /// Removes the user's notes and then the user, in one store transaction.
    /// Clearing the session afterwards is up to the caller.
    pub async fn delete_user_and_notes(
        &self,
        identity: &Identity,
        username: &str,
    ) -> ServiceResult<()> {
        identity.authorize(username)?;
        self.db.delete_user_and_notes(username).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewUser;
    use crate::testing::InMemoryDatabase;

    async fn seeded() -> (Arc<InMemoryDatabase>, NoteManager) {
        let db = Arc::new(InMemoryDatabase::new());
        for name in ["alice", "bob"] {
            db.create_user(NewUser {
                username: name.into(),
                password_hash: "$argon2id$fake".into(),
                email: format!("{name}@x.com"),
                first_name: name.into(),
                last_name: "Test".into(),
            })
            .await
            .unwrap();
        }
        (db.clone(), NoteManager::new(db))
    }

    fn input(title: &str, content: &str) -> NoteInput {
        NoteInput {
            title: title.into(),
            content: content.into(),
        }
    }

    #[tokio::test]
    async fn add_note_binds_to_owner() {
        let (_db, notes) = seeded().await;
        let alice = Identity::authenticated("alice");

        let note = notes.add_note(&alice, "alice", input("T", "C")).await.unwrap();

        assert_eq!(note.owner_username, "alice");
        assert_eq!(note.title, "T");
        assert_eq!(note.content, "C");
    }

    #[tokio::test]
    async fn add_note_for_someone_else_is_denied() {
        let (db, notes) = seeded().await;

        let as_bob = notes
            .add_note(&Identity::authenticated("bob"), "alice", input("T", "C"))
            .await;
        let anonymous = notes.add_note(&Identity::Anonymous, "alice", input("T", "C")).await;

        assert!(matches!(as_bob, Err(ServiceError::Unauthorized)));
        assert!(matches!(anonymous, Err(ServiceError::Unauthorized)));
        assert_eq!(db.note_count(), 0);
    }

    #[tokio::test]
    async fn invalid_note_is_not_created() {
        let (db, notes) = seeded().await;

        let result = notes
            .add_note(&Identity::authenticated("alice"), "alice", input("", "C"))
            .await;

        assert!(matches!(result, Err(ServiceError::Validation(_))));
        assert_eq!(db.note_count(), 0);
    }

    #[tokio::test]
    async fn update_by_stranger_leaves_note_unchanged() {
        let (db, notes) = seeded().await;
        let alice = Identity::authenticated("alice");
        let note = notes.add_note(&alice, "alice", input("T", "C")).await.unwrap();

        let result = notes
            .update_note(&Identity::authenticated("bob"), note.id, input("X", "Y"))
            .await;

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
        assert_eq!(db.get_note_by_id(note.id).await.unwrap(), note);
    }

    #[tokio::test]
    async fn update_by_owner_keeps_id_and_owner() {
        let (_db, notes) = seeded().await;
        let alice = Identity::authenticated("alice");
        let note = notes.add_note(&alice, "alice", input("T", "C")).await.unwrap();

        let updated = notes
            .update_note(&alice, note.id, input("New", "Body"))
            .await
            .unwrap();

        assert_eq!(updated.id, note.id);
        assert_eq!(updated.owner_username, "alice");
        assert_eq!(updated.title, "New");
        assert_eq!(updated.content, "Body");
    }

    #[tokio::test]
    async fn invalid_update_leaves_note_unchanged() {
        let (db, notes) = seeded().await;
        let alice = Identity::authenticated("alice");
        let note = notes.add_note(&alice, "alice", input("T", "C")).await.unwrap();

        let result = notes
            .update_note(&alice, note.id, input(&"t".repeat(101), "Body"))
            .await;

        assert!(matches!(result, Err(ServiceError::Validation(_))));
        assert_eq!(db.get_note_by_id(note.id).await.unwrap(), note);
    }

    #[tokio::test]
    async fn missing_note_is_not_found() {
        let (_db, notes) = seeded().await;
        let alice = Identity::authenticated("alice");

        assert!(matches!(
            notes.update_note(&alice, 42, input("T", "C")).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            notes.delete_note(&alice, 42).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_note_respects_ownership() {
        let (db, notes) = seeded().await;
        let alice = Identity::authenticated("alice");
        let note = notes.add_note(&alice, "alice", input("T", "C")).await.unwrap();

        let denied = notes.delete_note(&Identity::authenticated("bob"), note.id).await;
        assert!(matches!(denied, Err(ServiceError::Unauthorized)));
        assert_eq!(db.note_count(), 1);

        let deleted = notes.delete_note(&alice, note.id).await.unwrap();
        assert_eq!(deleted.id, note.id);
        assert_eq!(db.note_count(), 0);
    }

    #[tokio::test]
    async fn deleting_a_user_leaves_no_orphans() {
        let (db, notes) = seeded().await;
        let alice = Identity::authenticated("alice");
        let bob = Identity::authenticated("bob");
        notes.add_note(&alice, "alice", input("A1", "C")).await.unwrap();
        notes.add_note(&alice, "alice", input("A2", "C")).await.unwrap();
        notes.add_note(&bob, "bob", input("B1", "C")).await.unwrap();

        notes.delete_user_and_notes(&alice, "alice").await.unwrap();

        assert!(db.get_notes_for_user("alice").await.unwrap().is_empty());
        assert!(matches!(
            db.get_user("alice").await,
            Err(crate::ports::PortError::NotFound(_))
        ));
        assert_eq!(db.note_count(), 1);
        assert_eq!(db.user_count(), 1);
    }

    #[tokio::test]
    async fn deleting_another_account_is_denied() {
        let (db, notes) = seeded().await;

        let result = notes
            .delete_user_and_notes(&Identity::authenticated("bob"), "alice")
            .await;

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
        assert_eq!(db.user_count(), 2);
    }

    #[tokio::test]
    async fn profile_lists_only_own_notes() {
        let (_db, notes) = seeded().await;
        let alice = Identity::authenticated("alice");
        let bob = Identity::authenticated("bob");
        notes.add_note(&alice, "alice", input("A1", "C")).await.unwrap();
        notes.add_note(&bob, "bob", input("B1", "C")).await.unwrap();

        let (user, listed) = notes.user_profile(&alice, "alice").await.unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "A1");
        assert!(matches!(
            notes.user_profile(&Identity::Anonymous, "alice").await,
            Err(ServiceError::LoginRequired)
        ));
        assert!(matches!(
            notes.user_profile(&bob, "alice").await,
            Err(ServiceError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn adding_for_a_deleted_account_is_not_found() {
        let (db, notes) = seeded().await;
        let alice = Identity::authenticated("alice");
        notes.delete_user_and_notes(&alice, "alice").await.unwrap();

        let form = notes.authorize_add_note(&alice, "alice").await;
        let added = notes.add_note(&alice, "alice", input("T", "C")).await;

        assert!(matches!(form, Err(ServiceError::NotFound(_))));
        assert!(matches!(added, Err(ServiceError::NotFound(_))));
        assert_eq!(db.note_count(), 0);
    }
}
