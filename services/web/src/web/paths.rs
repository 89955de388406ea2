//! services/web/src/web/paths.rs
//!
//! URLs the app links and redirects to. Usernames are free text, so they are
//! always percent-encoded as a single path segment; axum's `Path` extractor
//! decodes them back on the way in.

use urlencoding::encode;

pub fn user_path(username: &str) -> String {
    format!("/users/{}", encode(username))
}

pub fn add_note_path(username: &str) -> String {
    format!("/users/{}/notes/add", encode(username))
}

pub fn delete_user_path(username: &str) -> String {
    format!("/users/{}/delete", encode(username))
}

pub fn update_note_path(note_id: i32) -> String {
    format!("/notes/{}/update", note_id)
}

pub fn delete_note_path(note_id: i32) -> String {
    format!("/notes/{}/delete", note_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn plain_usernames_are_unchanged() {
        assert_eq!(user_path("alice_01"), "/users/alice_01");
        assert_eq!(add_note_path("alice"), "/users/alice/notes/add");
    }

    #[test]
    fn separators_stay_inside_one_segment() {
        assert_eq!(user_path("a/b"), "/users/a%2Fb");
        assert_eq!(user_path("a?b#c"), "/users/a%3Fb%23c");
        assert_eq!(delete_user_path("a b"), "/users/a%20b/delete");
    }

    #[test]
    fn control_characters_make_a_valid_header() {
        let path = user_path("a\nb");
        assert_eq!(path, "/users/a%0Ab");
        assert!(HeaderValue::from_str(&path).is_ok());
    }
}
