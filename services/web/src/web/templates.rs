//! HTML views.
//!
//! Plain `format!` templates. Every value that came from a user goes through
//! `html_escape` before it is interpolated.

use notes_core::validation::messages_for;
use notes_core::{FieldError, Note, NoteInput, RegisterInput, User};

use crate::web::forms::CSRF_FIELD;
use crate::web::paths::{add_note_path, delete_note_path, delete_user_path, update_note_path};
use crate::web::session::{Flash, FlashKind};

/// Base HTML layout wrapper.
pub fn layout(title: &str, flashes: &[Flash], content: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Notes</title>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css">
</head>
<body>
    <nav class="navbar navbar-light bg-light mb-4">
        <div class="container"><span class="navbar-brand">Notes</span></div>
    </nav>
    <main class="container">
        {flashes}
        {content}
    </main>
</body>
</html>"##,
        title = html_escape(title),
        flashes = flash_list(flashes),
        content = content,
    )
}

fn flash_list(flashes: &[Flash]) -> String {
    flashes
        .iter()
        .map(|f| {
            let class = match f.kind {
                FlashKind::Success => "success",
                FlashKind::Info => "info",
                FlashKind::Danger => "danger",
            };
            format!(
                r#"<div class="alert alert-{class}">{}</div>"#,
                html_escape(&f.message)
            )
        })
        .collect()
}

//=========================================================================================
// Form pieces
//=========================================================================================

fn csrf_input(token: &str) -> String {
    format!(
        r#"<input type="hidden" name="{CSRF_FIELD}" value="{}">"#,
        html_escape(token)
    )
}

fn error_list(errors: &[FieldError], field: &str) -> String {
    messages_for(errors, field)
        .into_iter()
        .map(|m| format!(r#"<div class="invalid-feedback d-block">{}</div>"#, html_escape(m)))
        .collect()
}

fn input(label: &str, name: &str, kind: &str, value: &str, errors: &[FieldError]) -> String {
    format!(
        r#"<div class="mb-3">
            <label for="{name}" class="form-label">{label}</label>
            <input type="{kind}" id="{name}" name="{name}" value="{value}" class="form-control">
            {errors}
        </div>"#,
        value = html_escape(value),
        errors = error_list(errors, name),
    )
}

fn textarea(label: &str, name: &str, value: &str, errors: &[FieldError]) -> String {
    format!(
        r#"<div class="mb-3">
            <label for="{name}" class="form-label">{label}</label>
            <textarea id="{name}" name="{name}" rows="8" class="form-control">{value}</textarea>
            {errors}
        </div>"#,
        value = html_escape(value),
        errors = error_list(errors, name),
    )
}

/// A bare POST button carrying only the anti-forgery token.
fn post_button(action: &str, csrf_token: &str, label: &str, class: &str) -> String {
    format!(
        r#"<form method="POST" action="{action}" class="d-inline">
            {csrf}
            <button type="submit" class="btn {class}">{label}</button>
        </form>"#,
        action = html_escape(action),
        csrf = csrf_input(csrf_token),
    )
}

//=========================================================================================
// Pages
//=========================================================================================

pub fn register_page(
    csrf_token: &str,
    values: &RegisterInput,
    errors: &[FieldError],
    flashes: &[Flash],
) -> String {
    let body = format!(
        r#"<h1>Register</h1>
        <form method="POST" action="/register">
            {csrf}
            {csrf_errors}
            {username}
            {password}
            {email}
            {first_name}
            {last_name}
            <button type="submit" class="btn btn-primary">Register</button>
        </form>
        <p class="mt-3">Already have an account? <a href="/login">Log in</a></p>"#,
        csrf = csrf_input(csrf_token),
        csrf_errors = error_list(errors, CSRF_FIELD),
        username = input("Username", "username", "text", &values.username, errors),
        password = input("Password", "password", "password", "", errors),
        email = input("Email", "email", "email", &values.email, errors),
        first_name = input("First Name", "first_name", "text", &values.first_name, errors),
        last_name = input("Last Name", "last_name", "text", &values.last_name, errors),
    );
    layout("Register", flashes, &body)
}

pub fn login_page(
    csrf_token: &str,
    username: &str,
    errors: &[FieldError],
    flashes: &[Flash],
) -> String {
    let body = format!(
        r#"<h1>Log in</h1>
        <form method="POST" action="/login">
            {csrf}
            {csrf_errors}
            {username}
            {password}
            <button type="submit" class="btn btn-primary">Log in</button>
        </form>
        <p class="mt-3">New here? <a href="/register">Register</a></p>"#,
        csrf = csrf_input(csrf_token),
        csrf_errors = error_list(errors, CSRF_FIELD),
        username = input("Username", "username", "text", username, errors),
        password = input("Password", "password", "password", "", errors),
    );
    layout("Log in", flashes, &body)
}

pub fn profile_page(csrf_token: &str, user: &User, notes: &[Note], flashes: &[Flash]) -> String {
    let username = html_escape(&user.username);
    let note_items: String = notes
        .iter()
        .map(|note| {
            format!(
                r#"<li class="list-group-item">
                    <h5>{title}</h5>
                    <p>{content}</p>
                    <a href="{edit}" class="btn btn-sm btn-outline-primary">Edit</a>
                    {delete}
                </li>"#,
                title = html_escape(&note.title),
                content = html_escape(&note.content),
                edit = update_note_path(note.id),
                delete = post_button(
                    &delete_note_path(note.id),
                    csrf_token,
                    "Delete",
                    "btn-sm btn-outline-danger"
                ),
            )
        })
        .collect();
    let notes_html = if notes.is_empty() {
        r#"<p class="text-muted">No notes yet.</p>"#.to_string()
    } else {
        format!(r#"<ul class="list-group mb-3">{note_items}</ul>"#)
    };

    let body = format!(
        r#"<h1>{username}</h1>
        <dl>
            <dt>Name</dt><dd>{full_name}</dd>
            <dt>Email</dt><dd>{email}</dd>
        </dl>
        <h2>Notes</h2>
        {notes_html}
        <a href="{add_note}" class="btn btn-primary">Add note</a>
        <hr>
        {logout}
        {delete_account}"#,
        add_note = html_escape(&add_note_path(&user.username)),
        full_name = html_escape(&user.full_name()),
        email = html_escape(&user.email),
        logout = post_button("/logout", csrf_token, "Log out", "btn-secondary"),
        delete_account = post_button(
            &delete_user_path(&user.username),
            csrf_token,
            "Delete account",
            "btn-danger"
        ),
    );
    layout(&user.username, flashes, &body)
}

pub fn note_form_page(
    heading: &str,
    action: &str,
    csrf_token: &str,
    values: &NoteInput,
    errors: &[FieldError],
    flashes: &[Flash],
) -> String {
    let body = format!(
        r#"<h1>{heading}</h1>
        <form method="POST" action="{action}">
            {csrf}
            {csrf_errors}
            {title}
            {content}
            <button type="submit" class="btn btn-primary">Save</button>
        </form>"#,
        heading = html_escape(heading),
        action = html_escape(action),
        csrf = csrf_input(csrf_token),
        csrf_errors = error_list(errors, CSRF_FIELD),
        title = input("Title", "title", "text", &values.title, errors),
        content = textarea("Content", "content", &values.content, errors),
    );
    layout(heading, flashes, &body)
}

pub fn denied_page() -> String {
    layout(
        "Unauthorized",
        &[],
        r#"<h1>Unauthorized</h1><p>You are not allowed to do that.</p><a href="/">Home</a>"#,
    )
}

pub fn not_found_page() -> String {
    layout(
        "Not Found",
        &[],
        r#"<h1>Not Found</h1><p>That page does not exist.</p><a href="/">Home</a>"#,
    )
}

pub fn failure_page() -> String {
    layout(
        "Something went wrong",
        &[],
        r#"<h1>Something went wrong</h1><p>Nothing was changed. Please try again.</p>"#,
    )
}

/// Simple HTML escape function
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
