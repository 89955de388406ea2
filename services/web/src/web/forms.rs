//! services/web/src/web/forms.rs
//!
//! Raw form bodies as submitted by the browser. Every field defaults to empty
//! so a missing field becomes a validation error instead of a rejection.

use axum::{extract::rejection::FormRejection, Form};
use notes_core::{FieldError, LoginInput, NoteInput, RegisterInput};
use serde::Deserialize;

/// Field name used for form-level anti-forgery errors.
pub const CSRF_FIELD: &str = "csrf_token";
pub const CSRF_INVALID_MESSAGE: &str = "The CSRF token is invalid.";

pub fn csrf_error() -> FieldError {
    FieldError::new(CSRF_FIELD, CSRF_INVALID_MESSAGE)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub csrf_token: String,
}

impl From<RegisterForm> for RegisterInput {
    fn from(form: RegisterForm) -> Self {
        RegisterInput {
            username: form.username,
            password: form.password,
            email: form.email,
            first_name: form.first_name,
            last_name: form.last_name,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub csrf_token: String,
}

impl From<LoginForm> for LoginInput {
    fn from(form: LoginForm) -> Self {
        LoginInput {
            username: form.username,
            password: form.password,
        }
    }
}

/// Used by both the add and the edit note pages.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NoteForm {
    pub title: String,
    pub content: String,
    pub csrf_token: String,
}

impl From<NoteForm> for NoteInput {
    fn from(form: NoteForm) -> Self {
        NoteInput {
            title: form.title,
            content: form.content,
        }
    }
}

/// The body of the logout and delete buttons: nothing but the token.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CsrfForm {
    pub csrf_token: String,
}

/// The submitted token, or empty when the body was missing or unreadable.
pub fn submitted_token(form: Result<Form<CsrfForm>, FormRejection>) -> String {
    form.map(|Form(f)| f.csrf_token).unwrap_or_default()
}
