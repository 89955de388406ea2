//! crates/notes_core/src/credentials.rs
//!
//! Registration and login against the user table.

use std::sync::Arc;

use crate::domain::{NewUser, User};
use crate::error::{ServiceError, ServiceResult};
use crate::password::{hash_password, verify_password};
use crate::ports::{DatabaseService, PortError, UniqueField};
use crate::validation::{FieldError, LoginInput, RegisterInput};

pub const USERNAME_TAKEN_MESSAGE: &str = "Username already exists!";
pub const EMAIL_TAKEN_MESSAGE: &str = "Email is already associated with a user!";
/// Same text for unknown users and wrong passwords.
pub const BAD_CREDENTIALS_MESSAGE: &str = "Bad name/password";

#[derive(Clone)]
pub struct CredentialStore {
    db: Arc<dyn DatabaseService>,
}

impl CredentialStore {
    pub fn new(db: Arc<dyn DatabaseService>) -> Self {
        Self { db }
    }

    /// Validates the form, checks username and email uniqueness, then stores
    /// the user with a hashed password.
    ///
    /// Both uniqueness errors are reported together when both apply.
    pub async fn register(&self, input: RegisterInput) -> ServiceResult<User> {
        let mut errors = input.validate();

        if !input.username.is_empty() && self.db.username_exists(&input.username).await? {
            errors.push(FieldError::new("username", USERNAME_TAKEN_MESSAGE));
        }
        if !input.email.is_empty() && self.db.email_exists(&input.email).await? {
            errors.push(FieldError::new("email", EMAIL_TAKEN_MESSAGE));
        }
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }

        let password_hash =
            hash_password(&input.password).map_err(|e| ServiceError::Store(e.to_string()))?;

        let new_user = NewUser {
            username: input.username,
            password_hash,
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
        };

        // A concurrent registration can still win between the checks and the insert.
        self.db.create_user(new_user).await.map_err(|e| match e {
            PortError::Conflict(UniqueField::Username) => {
                ServiceError::Validation(vec![FieldError::new("username", USERNAME_TAKEN_MESSAGE)])
            }
            PortError::Conflict(UniqueField::Email) => {
                ServiceError::Validation(vec![FieldError::new("email", EMAIL_TAKEN_MESSAGE)])
            }
            other => other.into(),
        })
    }

    /// Returns the user when the password matches, `None` otherwise.
    ///
    /// Unknown usernames and wrong passwords are indistinguishable to the caller.
    pub async fn authenticate(&self, input: LoginInput) -> ServiceResult<Option<User>> {
        let errors = input.validate();
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }

        let credentials = match self.db.get_user_credentials(&input.username).await {
            Ok(credentials) => credentials,
            Err(PortError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let valid = verify_password(&input.password, &credentials.password_hash)
            .map_err(|e| ServiceError::Store(e.to_string()))?;
        if !valid {
            return Ok(None);
        }

        Ok(Some(self.db.get_user(&credentials.username).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Note, UserCredentials};
    use crate::ports::PortResult;
    use crate::testing::InMemoryDatabase;
    use crate::validation::messages_for;
    use async_trait::async_trait;

    /// Loses the race: nothing looks taken up front, then the insert collides.
    struct RacedDatabase {
        conflict: UniqueField,
    }

    #[async_trait]
    impl DatabaseService for RacedDatabase {
        async fn username_exists(&self, _username: &str) -> PortResult<bool> {
            Ok(false)
        }
        async fn email_exists(&self, _email: &str) -> PortResult<bool> {
            Ok(false)
        }
        async fn create_user(&self, _new_user: NewUser) -> PortResult<User> {
            Err(PortError::Conflict(self.conflict))
        }
        async fn get_user(&self, username: &str) -> PortResult<User> {
            Err(PortError::NotFound(username.to_string()))
        }
        async fn get_user_credentials(&self, username: &str) -> PortResult<UserCredentials> {
            Err(PortError::NotFound(username.to_string()))
        }
        async fn delete_user_and_notes(&self, _username: &str) -> PortResult<()> {
            Ok(())
        }
        async fn get_notes_for_user(&self, _username: &str) -> PortResult<Vec<Note>> {
            Ok(Vec::new())
        }
        async fn get_note_by_id(&self, note_id: i32) -> PortResult<Note> {
            Err(PortError::NotFound(note_id.to_string()))
        }
        async fn create_note(
            &self,
            owner_username: &str,
            _title: &str,
            _content: &str,
        ) -> PortResult<Note> {
            Err(PortError::NotFound(owner_username.to_string()))
        }
        async fn update_note(&self, note_id: i32, _title: &str, _content: &str) -> PortResult<Note> {
            Err(PortError::NotFound(note_id.to_string()))
        }
        async fn delete_note(&self, note_id: i32) -> PortResult<()> {
            Err(PortError::NotFound(note_id.to_string()))
        }
    }

    fn registration(username: &str, email: &str) -> RegisterInput {
        RegisterInput {
            username: username.into(),
            password: "secret".into(),
            email: email.into(),
            first_name: "First".into(),
            last_name: "Last".into(),
        }
    }

    fn store() -> (Arc<InMemoryDatabase>, CredentialStore) {
        let db = Arc::new(InMemoryDatabase::new());
        (db.clone(), CredentialStore::new(db))
    }

    #[tokio::test]
    async fn register_creates_exactly_one_user_with_hashed_password() {
        let (db, credentials) = store();

        let user = credentials
            .register(registration("alice", "alice@x.com"))
            .await
            .unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(db.user_count(), 1);
        let hash = db.password_hash("alice").unwrap();
        assert_ne!(hash, "secret");
        assert!(verify_password("secret", &hash).unwrap());
    }

    #[tokio::test]
    async fn duplicate_username_is_a_field_error() {
        let (db, credentials) = store();
        credentials.register(registration("alice", "alice@x.com")).await.unwrap();

        let err = credentials
            .register(registration("alice", "other@x.com"))
            .await
            .unwrap_err();

        let ServiceError::Validation(errors) = err else {
            panic!("expected a validation error");
        };
        assert_eq!(messages_for(&errors, "username"), vec![USERNAME_TAKEN_MESSAGE]);
        assert!(messages_for(&errors, "email").is_empty());
        assert_eq!(db.user_count(), 1);
    }

    #[tokio::test]
    async fn duplicate_username_and_email_are_reported_together() {
        let (db, credentials) = store();
        credentials.register(registration("alice", "alice@x.com")).await.unwrap();

        let err = credentials
            .register(registration("alice", "alice@x.com"))
            .await
            .unwrap_err();

        let ServiceError::Validation(errors) = err else {
            panic!("expected a validation error");
        };
        assert_eq!(messages_for(&errors, "username"), vec![USERNAME_TAKEN_MESSAGE]);
        assert_eq!(messages_for(&errors, "email"), vec![EMAIL_TAKEN_MESSAGE]);
        assert_eq!(db.user_count(), 1);
    }

    #[tokio::test]
    async fn invalid_form_creates_nothing() {
        let (db, credentials) = store();

        let err = credentials
            .register(registration("bob", "not-an-email"))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(db.user_count(), 0);
    }

    #[tokio::test]
    async fn authenticate_accepts_the_right_password() {
        let (_db, credentials) = store();
        credentials.register(registration("alice", "alice@x.com")).await.unwrap();

        let user = credentials
            .authenticate(LoginInput {
                username: "alice".into(),
                password: "secret".into(),
            })
            .await
            .unwrap();

        assert_eq!(user.map(|u| u.email), Some("alice@x.com".to_string()));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let (_db, credentials) = store();
        credentials.register(registration("alice", "alice@x.com")).await.unwrap();

        let wrong_password = credentials
            .authenticate(LoginInput {
                username: "alice".into(),
                password: "nope".into(),
            })
            .await
            .unwrap();
        let unknown_user = credentials
            .authenticate(LoginInput {
                username: "mallory".into(),
                password: "secret".into(),
            })
            .await
            .unwrap();

        assert!(wrong_password.is_none());
        assert!(unknown_user.is_none());
    }

    #[tokio::test]
    async fn insert_time_conflict_is_reported_on_the_matching_field() {
        for (conflict, field, message) in [
            (UniqueField::Username, "username", USERNAME_TAKEN_MESSAGE),
            (UniqueField::Email, "email", EMAIL_TAKEN_MESSAGE),
        ] {
            let credentials = CredentialStore::new(Arc::new(RacedDatabase { conflict }));

            let err = credentials
                .register(registration("alice", "alice@x.com"))
                .await
                .unwrap_err();

            let ServiceError::Validation(errors) = err else {
                panic!("expected a validation error for {conflict}");
            };
            assert_eq!(messages_for(&errors, field), vec![message]);
            assert_eq!(errors.len(), 1);
        }
    }
}
