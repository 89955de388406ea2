//! services/web/src/web/router.rs
//!
//! Wires every route to its handler. Shared by the binary and the HTTP tests.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::web::auth::{
    login_handler, logout_handler, register_handler, root_handler, show_login_handler,
    show_register_handler,
};
use crate::web::notes::{
    add_note_handler, delete_note_handler, show_add_note_handler, show_update_note_handler,
    update_note_handler,
};
use crate::web::state::AppState;
use crate::web::users::{delete_user_handler, show_user_handler};

pub fn build_router(app_state: Arc<AppState>) -> Router {
    // Anyone may reach these.
    let public_routes = Router::new()
        .route("/", get(root_handler))
        .route("/register", get(show_register_handler).post(register_handler))
        .route("/login", get(show_login_handler).post(login_handler))
        .route("/logout", post(logout_handler));

    // Guarded per handler against the session identity.
    let owner_routes = Router::new()
        .route("/users/{username}", get(show_user_handler))
        .route("/users/{username}/delete", post(delete_user_handler))
        .route(
            "/users/{username}/notes/add",
            get(show_add_note_handler).post(add_note_handler),
        )
        .route(
            "/notes/{id}/update",
            get(show_update_note_handler).post(update_note_handler),
        )
        .route("/notes/{id}/delete", post(delete_note_handler));

    Router::new()
        .merge(public_routes)
        .merge(owner_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
