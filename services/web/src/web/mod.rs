pub mod auth;
pub mod forms;
pub mod notes;
pub mod paths;
pub mod router;
pub mod session;
pub mod state;
pub mod templates;
pub mod users;

// Re-export what the binary needs to build the web server.
pub use router::build_router;
pub use session::SessionCodec;
pub use state::AppState;
