//! crates/notes_core/src/validation.rs
//!
//! Typed form inputs and the pure functions that validate them. Each validator
//! returns every field-scoped error it finds; an empty list means valid.

use std::sync::OnceLock;

use regex::Regex;

pub const USERNAME_MAX: usize = 20;
pub const PASSWORD_MAX: usize = 100;
pub const EMAIL_MAX: usize = 50;
pub const NAME_MAX: usize = 30;
pub const TITLE_MAX: usize = 100;

const REQUIRED_MESSAGE: &str = "This field is required.";
const EMAIL_MESSAGE: &str = "Invalid email address.";

/// A validation message attached to one input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Finds the messages for one field, in the order they were reported.
pub fn messages_for<'a>(errors: &'a [FieldError], field: &str) -> Vec<&'a str> {
    errors
        .iter()
        .filter(|e| e.field == field)
        .map(|e| e.message.as_str())
        .collect()
}

//=========================================================================================
// Inputs
//=========================================================================================

#[derive(Debug, Clone, Default)]
pub struct RegisterInput {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl RegisterInput {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_text(&mut errors, "username", &self.username, Some(USERNAME_MAX));
        check_text(&mut errors, "password", &self.password, Some(PASSWORD_MAX));
        if check_text(&mut errors, "email", &self.email, Some(EMAIL_MAX)) && !is_email(&self.email)
        {
            errors.push(FieldError::new("email", EMAIL_MESSAGE));
        }
        check_text(&mut errors, "first_name", &self.first_name, Some(NAME_MAX));
        check_text(&mut errors, "last_name", &self.last_name, Some(NAME_MAX));
        errors
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

impl LoginInput {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_text(&mut errors, "username", &self.username, Some(USERNAME_MAX));
        check_text(&mut errors, "password", &self.password, Some(PASSWORD_MAX));
        errors
    }
}

/// Title and content of a note. Shared by the add and edit flows.
#[derive(Debug, Clone, Default)]
pub struct NoteInput {
    pub title: String,
    pub content: String,
}

impl NoteInput {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_text(&mut errors, "title", &self.title, Some(TITLE_MAX));
        check_text(&mut errors, "content", &self.content, None);
        errors
    }
}

//=========================================================================================
// Rules
//=========================================================================================

/// Required + optional max length. Returns true when the value passed both.
///
/// Only an empty value fails "required"; whitespace counts as input.
fn check_text(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: &str,
    max: Option<usize>,
) -> bool {
    if value.is_empty() {
        errors.push(FieldError::new(field, REQUIRED_MESSAGE));
        return false;
    }
    if let Some(max) = max {
        if value.chars().count() > max {
            errors.push(FieldError::new(
                field,
                format!("Field cannot be longer than {max} characters."),
            ));
            return false;
        }
    }
    true
}

fn is_email(value: &str) -> bool {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE
        .get_or_init(|| {
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("email pattern is valid")
        })
        .is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_registration() -> RegisterInput {
        RegisterInput {
            username: "alice".into(),
            password: "hunter2".into(),
            email: "alice@x.com".into(),
            first_name: "Alice".into(),
            last_name: "Liddell".into(),
        }
    }

    #[test]
    fn valid_registration_has_no_errors() {
        assert!(valid_registration().validate().is_empty());
    }

    #[test]
    fn blank_fields_are_required() {
        let errors = RegisterInput::default().validate();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["username", "password", "email", "first_name", "last_name"]
        );
        assert!(errors.iter().all(|e| e.message == REQUIRED_MESSAGE));
    }

    #[test]
    fn username_longer_than_twenty_chars_is_rejected() {
        let input = RegisterInput {
            username: "a".repeat(21),
            ..valid_registration()
        };
        assert_eq!(
            messages_for(&input.validate(), "username"),
            vec!["Field cannot be longer than 20 characters."]
        );

        let at_limit = RegisterInput {
            username: "a".repeat(20),
            ..valid_registration()
        };
        assert!(at_limit.validate().is_empty());
    }

    #[test]
    fn malformed_email_is_rejected() {
        for bad in ["alice", "alice@", "@x.com", "alice@x", "al ice@x.com"] {
            let input = RegisterInput {
                email: bad.into(),
                ..valid_registration()
            };
            assert_eq!(
                messages_for(&input.validate(), "email"),
                vec![EMAIL_MESSAGE],
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn oversized_email_reports_length_only() {
        let input = RegisterInput {
            email: format!("{}@x.com", "a".repeat(50)),
            ..valid_registration()
        };
        assert_eq!(
            messages_for(&input.validate(), "email"),
            vec!["Field cannot be longer than 50 characters."]
        );
    }

    #[test]
    fn note_content_is_unbounded_but_required() {
        let long = NoteInput {
            title: "T".into(),
            content: "x".repeat(100_000),
        };
        assert!(long.validate().is_empty());

        let empty = NoteInput {
            title: "T".into(),
            content: String::new(),
        };
        assert_eq!(messages_for(&empty.validate(), "content"), vec![REQUIRED_MESSAGE]);
    }

    #[test]
    fn whitespace_only_counts_as_present() {
        let input = NoteInput {
            title: " ".into(),
            content: "   ".into(),
        };
        assert!(input.validate().is_empty());
    }

    #[test]
    fn note_title_is_capped_at_one_hundred_chars() {
        let input = NoteInput {
            title: "t".repeat(101),
            content: "C".into(),
        };
        assert_eq!(
            messages_for(&input.validate(), "title"),
            vec!["Field cannot be longer than 100 characters."]
        );
    }

    #[test]
    fn login_requires_both_fields() {
        let errors = LoginInput {
            username: "alice".into(),
            password: String::new(),
        }
        .validate();
        assert_eq!(errors, vec![FieldError::new("password", REQUIRED_MESSAGE)]);
    }
}
