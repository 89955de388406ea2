//! services/web/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use notes_core::domain::{NewUser, Note, User, UserCredentials};
use notes_core::ports::{DatabaseService, PortError, PortResult, UniqueField};
use sqlx::{FromRow, PgPool};

/// SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    username: String,
    email: String,
    first_name: String,
    last_name: String,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    username: String,
    password_hash: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            username: self.username,
            password_hash: self.password_hash,
        }
    }
}

#[derive(FromRow)]
struct NoteRecord {
    id: i32,
    title: String,
    content: String,
    owner_username: String,
}
impl NoteRecord {
    fn to_domain(self) -> Note {
        Note {
            id: self.id,
            title: self.title,
            content: self.content,
            owner_username: self.owner_username,
        }
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn not_found_or_unexpected(e: sqlx::Error, what: String) -> PortError {
    match e {
        sqlx::Error::RowNotFound => PortError::NotFound(what),
        _ => unexpected(e),
    }
}

/// Maps a unique violation on the users table to the column it hit.
fn user_insert_error(e: sqlx::Error) -> PortError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let field = match db_err.constraint() {
                Some(constraint) if constraint.contains("email") => UniqueField::Email,
                _ => UniqueField::Username,
            };
            return PortError::Conflict(field);
        }
    }
    unexpected(e)
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn username_exists(&self, username: &str) -> PortResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)
    }

    async fn email_exists(&self, email: &str) -> PortResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)
    }

    async fn create_user(&self, new_user: NewUser) -> PortResult<User> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (username, password_hash, email, first_name, last_name) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING username, email, first_name, last_name",
        )
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .bind(&new_user.email)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(user_insert_error)?;
        tx.commit().await.map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn get_user(&self, username: &str) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT username, email, first_name, last_name FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or_unexpected(e, format!("User {} not found", username)))?;
        Ok(record.to_domain())
    }

    async fn get_user_credentials(&self, username: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or_unexpected(e, format!("User {} not found", username)))?;
        Ok(record.to_domain())
    }

    async fn delete_user_and_notes(&self, username: &str) -> PortResult<()> {
        // Dropping `tx` without commit rolls both deletes back.
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        sqlx::query("DELETE FROM notes WHERE owner_username = $1")
            .bind(username)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;

        let deleted = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        if deleted.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("User {} not found", username)));
        }

        tx.commit().await.map_err(unexpected)?;
        Ok(())
    }

    async fn get_notes_for_user(&self, username: &str) -> PortResult<Vec<Note>> {
        let records = sqlx::query_as::<_, NoteRecord>(
            "SELECT id, title, content, owner_username FROM notes \
             WHERE owner_username = $1 ORDER BY id ASC",
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let notes = records.into_iter().map(|r| r.to_domain()).collect();
        Ok(notes)
    }

    async fn get_note_by_id(&self, note_id: i32) -> PortResult<Note> {
        let record = sqlx::query_as::<_, NoteRecord>(
            "SELECT id, title, content, owner_username FROM notes WHERE id = $1",
        )
        .bind(note_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or_unexpected(e, format!("Note {} not found", note_id)))?;
        Ok(record.to_domain())
    }

    async fn create_note(
        &self,
        owner_username: &str,
        title: &str,
        content: &str,
    ) -> PortResult<Note> {
        let record = sqlx::query_as::<_, NoteRecord>(
            "INSERT INTO notes (title, content, owner_username) VALUES ($1, $2, $3) \
             RETURNING id, title, content, owner_username",
        )
        .bind(title)
        .bind(content)
        .bind(owner_username)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn update_note(&self, note_id: i32, title: &str, content: &str) -> PortResult<Note> {
        let record = sqlx::query_as::<_, NoteRecord>(
            "UPDATE notes SET title = $1, content = $2 WHERE id = $3 \
             RETURNING id, title, content, owner_username",
        )
        .bind(title)
        .bind(content)
        .bind(note_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or_unexpected(e, format!("Note {} not found", note_id)))?;
        Ok(record.to_domain())
    }

    async fn delete_note(&self, note_id: i32) -> PortResult<()> {
        let deleted = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(note_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if deleted.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Note {} not found", note_id)));
        }
        Ok(())
    }
}
