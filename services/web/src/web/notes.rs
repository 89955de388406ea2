//! services/web/src/web/notes.rs
//!
//! Add, edit and delete notes. Ownership is checked in the core before any
//! form is shown or processed.

use axum::{
    extract::{rejection::FormRejection, Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use notes_core::guard::require_valid_token;
use notes_core::{NoteInput, ServiceError};
use std::sync::Arc;
use tracing::info;

use crate::error::WebError;
use crate::web::forms::{csrf_error, submitted_token, CsrfForm, NoteForm};
use crate::web::paths::{add_note_path, update_note_path, user_path};
use crate::web::session::{FlashKind, RequestContext};
use crate::web::state::AppState;
use crate::web::templates;

const ADD_HEADING: &str = "Add Note";
const EDIT_HEADING: &str = "Edit Note";

//=========================================================================================
// Add
//=========================================================================================

/// GET /users/{username}/notes/add
pub async fn show_add_note_handler(
    State(state): State<Arc<AppState>>,
    mut ctx: RequestContext,
    Path(username): Path<String>,
) -> Result<Response, WebError> {
    state
        .notes
        .authorize_add_note(ctx.identity(), &username)
        .await?;

    let flashes = ctx.take_flashes();
    let page = templates::note_form_page(
        ADD_HEADING,
        &add_note_path(&username),
        ctx.csrf_token(),
        &NoteInput::default(),
        &[],
        &flashes,
    );
    Ok((ctx, Html(page)).into_response())
}

/// POST /users/{username}/notes/add
pub async fn add_note_handler(
    State(state): State<Arc<AppState>>,
    mut ctx: RequestContext,
    Path(username): Path<String>,
    Form(form): Form<NoteForm>,
) -> Result<Response, WebError> {
    state
        .notes
        .authorize_add_note(ctx.identity(), &username)
        .await?;

    let csrf_ok = ctx.verify_csrf(&form.csrf_token);
    let input = NoteInput::from(form);
    let result = if csrf_ok {
        state
            .notes
            .add_note(ctx.identity(), &username, input.clone())
            .await
    } else {
        Err(ServiceError::Validation(vec![csrf_error()]))
    };

    match result {
        Ok(note) => {
            info!("User {} added note {}", username, note.id);
            ctx.flash(FlashKind::Success, "Note added!");
            Ok((ctx, Redirect::to(&user_path(&username))).into_response())
        }
        Err(ServiceError::Validation(errors)) => {
            let flashes = ctx.take_flashes();
            let page = templates::note_form_page(
                ADD_HEADING,
                &add_note_path(&username),
                ctx.csrf_token(),
                &input,
                &errors,
                &flashes,
            );
            Ok((ctx, Html(page)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

//=========================================================================================
// Update
//=========================================================================================

/// GET /notes/{id}/update
pub async fn show_update_note_handler(
    State(state): State<Arc<AppState>>,
    mut ctx: RequestContext,
    Path(note_id): Path<i32>,
) -> Result<Response, WebError> {
    let note = state.notes.note_for_edit(ctx.identity(), note_id).await?;

    let values = NoteInput {
        title: note.title,
        content: note.content,
    };
    let flashes = ctx.take_flashes();
    let page = templates::note_form_page(
        EDIT_HEADING,
        &update_note_path(note.id),
        ctx.csrf_token(),
        &values,
        &[],
        &flashes,
    );
    Ok((ctx, Html(page)).into_response())
}

/// POST /notes/{id}/update
pub async fn update_note_handler(
    State(state): State<Arc<AppState>>,
    mut ctx: RequestContext,
    Path(note_id): Path<i32>,
    Form(form): Form<NoteForm>,
) -> Result<Response, WebError> {
    // Not-found and ownership come before any form handling.
    state.notes.note_for_edit(ctx.identity(), note_id).await?;

    let csrf_ok = ctx.verify_csrf(&form.csrf_token);
    let input = NoteInput::from(form);
    let result = if csrf_ok {
        state
            .notes
            .update_note(ctx.identity(), note_id, input.clone())
            .await
    } else {
        Err(ServiceError::Validation(vec![csrf_error()]))
    };

    match result {
        Ok(note) => {
            info!("User {} updated note {}", note.owner_username, note.id);
            ctx.flash(FlashKind::Success, "Note updated!");
            Ok((ctx, Redirect::to(&user_path(&note.owner_username))).into_response())
        }
        Err(ServiceError::Validation(errors)) => {
            let flashes = ctx.take_flashes();
            let page = templates::note_form_page(
                EDIT_HEADING,
                &update_note_path(note_id),
                ctx.csrf_token(),
                &input,
                &errors,
                &flashes,
            );
            Ok((ctx, Html(page)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

//=========================================================================================
// Delete
//=========================================================================================

/// POST /notes/{id}/delete
pub async fn delete_note_handler(
    State(state): State<Arc<AppState>>,
    mut ctx: RequestContext,
    Path(note_id): Path<i32>,
    form: Result<Form<CsrfForm>, FormRejection>,
) -> Result<Response, WebError> {
    require_valid_token(ctx.verify_csrf(&submitted_token(form)))?;

    let note = state.notes.delete_note(ctx.identity(), note_id).await?;

    info!("User {} deleted note {}", note.owner_username, note.id);
    ctx.flash(FlashKind::Success, "Note deleted!");
    Ok((ctx, Redirect::to(&user_path(&note.owner_username))).into_response())
}
