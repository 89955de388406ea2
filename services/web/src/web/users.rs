//! services/web/src/web/users.rs
//!
//! The profile page and account deletion.

use axum::{
    extract::{rejection::FormRejection, Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use notes_core::guard::require_valid_token;
use notes_core::ServiceError;
use std::sync::Arc;
use tracing::info;

use crate::error::WebError;
use crate::web::forms::{submitted_token, CsrfForm};
use crate::web::session::{FlashKind, RequestContext};
use crate::web::state::AppState;
use crate::web::templates;

/// GET /users/{username} - Profile and notes, for that user only.
///
/// Anonymous visitors are sent back to the landing page with a notice; a
/// different logged-in user gets the hard denial.
pub async fn show_user_handler(
    State(state): State<Arc<AppState>>,
    mut ctx: RequestContext,
    Path(username): Path<String>,
) -> Result<Response, WebError> {
    let profile = state.notes.user_profile(ctx.identity(), &username).await;
    match profile {
        Ok((user, notes)) => {
            let flashes = ctx.take_flashes();
            let page = templates::profile_page(ctx.csrf_token(), &user, &notes, &flashes);
            Ok((ctx, Html(page)).into_response())
        }
        Err(ServiceError::LoginRequired) => {
            ctx.flash(FlashKind::Danger, "You must be logged in to view!");
            Ok((ctx, Redirect::to("/")).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /users/{username}/delete - Delete the account, its notes, and the session.
pub async fn delete_user_handler(
    State(state): State<Arc<AppState>>,
    mut ctx: RequestContext,
    Path(username): Path<String>,
    form: Result<Form<CsrfForm>, FormRejection>,
) -> Result<Response, WebError> {
    require_valid_token(ctx.verify_csrf(&submitted_token(form)))?;

    state
        .notes
        .delete_user_and_notes(ctx.identity(), &username)
        .await?;

    info!("Deleted user {} and their notes", username);
    ctx.logout();
    ctx.flash(FlashKind::Info, "Your account has been deleted.");
    Ok((ctx, Redirect::to("/")).into_response())
}
