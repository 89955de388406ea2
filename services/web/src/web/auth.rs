//! services/web/src/web/auth.rs
//!
//! Registration, login and logout.

use axum::{
    extract::{rejection::FormRejection, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use notes_core::credentials::BAD_CREDENTIALS_MESSAGE;
use notes_core::guard::require_valid_token;
use notes_core::{FieldError, LoginInput, RegisterInput, ServiceError};
use std::sync::Arc;
use tracing::info;

use crate::error::WebError;
use crate::web::forms::{csrf_error, submitted_token, CsrfForm, LoginForm, RegisterForm};
use crate::web::paths::user_path;
use crate::web::session::{FlashKind, RequestContext};
use crate::web::state::AppState;
use crate::web::templates;

/// GET / - The landing page is the registration form.
pub async fn root_handler() -> Redirect {
    Redirect::to("/register")
}

//=========================================================================================
// Register
//=========================================================================================

/// GET /register
pub async fn show_register_handler(mut ctx: RequestContext) -> Response {
    if let Some(username) = ctx.identity().username() {
        let to = user_path(username);
        return (ctx, Redirect::to(&to)).into_response();
    }
    let flashes = ctx.take_flashes();
    let page = templates::register_page(ctx.csrf_token(), &RegisterInput::default(), &[], &flashes);
    (ctx, Html(page)).into_response()
}

/// POST /register - Create the account and log the new user in.
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    mut ctx: RequestContext,
    Form(form): Form<RegisterForm>,
) -> Result<Response, WebError> {
    let csrf_ok = ctx.verify_csrf(&form.csrf_token);
    let input = RegisterInput::from(form);

    let result = if csrf_ok {
        state.credentials.register(input.clone()).await
    } else {
        Err(ServiceError::Validation(vec![csrf_error()]))
    };

    match result {
        Ok(user) => {
            info!("Registered user {}", user.username);
            ctx.login(&user.username);
            let to = user_path(&user.username);
            Ok((ctx, Redirect::to(&to)).into_response())
        }
        Err(ServiceError::Validation(errors)) => {
            let flashes = ctx.take_flashes();
            let page = templates::register_page(ctx.csrf_token(), &input, &errors, &flashes);
            Ok((ctx, Html(page)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

//=========================================================================================
// Login
//=========================================================================================

/// GET /login
pub async fn show_login_handler(mut ctx: RequestContext) -> Response {
    if let Some(username) = ctx.identity().username() {
        let to = user_path(username);
        return (ctx, Redirect::to(&to)).into_response();
    }
    let flashes = ctx.take_flashes();
    let page = templates::login_page(ctx.csrf_token(), "", &[], &flashes);
    (ctx, Html(page)).into_response()
}

/// POST /login - Check the credentials and establish the session.
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    mut ctx: RequestContext,
    Form(form): Form<LoginForm>,
) -> Result<Response, WebError> {
    let csrf_ok = ctx.verify_csrf(&form.csrf_token);
    let input = LoginInput::from(form);
    let username = input.username.clone();

    let errors = if !csrf_ok {
        vec![csrf_error()]
    } else {
        match state.credentials.authenticate(input).await {
            Ok(Some(user)) => {
                info!("User {} logged in", user.username);
                ctx.login(&user.username);
                let to = user_path(&user.username);
                return Ok((ctx, Redirect::to(&to)).into_response());
            }
            Ok(None) => vec![FieldError::new("username", BAD_CREDENTIALS_MESSAGE)],
            Err(ServiceError::Validation(errors)) => errors,
            Err(e) => return Err(e.into()),
        }
    };

    let flashes = ctx.take_flashes();
    let page = templates::login_page(ctx.csrf_token(), &username, &errors, &flashes);
    Ok((ctx, Html(page)).into_response())
}

//=========================================================================================
// Logout
//=========================================================================================

/// POST /logout - Clear the session identity.
///
/// Needs a valid anti-forgery token. Logging out twice is harmless: the token
/// outlives the identity.
pub async fn logout_handler(
    mut ctx: RequestContext,
    form: Result<Form<CsrfForm>, FormRejection>,
) -> Result<Response, WebError> {
    require_valid_token(ctx.verify_csrf(&submitted_token(form)))?;

    if let Some(username) = ctx.identity().username() {
        info!("User {} logged out", username);
    }
    ctx.logout();
    ctx.flash(FlashKind::Info, "Successfully logged out!");
    Ok((ctx, Redirect::to("/login")).into_response())
}
