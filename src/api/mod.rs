//! HTTP API for the chat surface and direct task CRUD.

mod routes;

pub use routes::{build_router, serve, AppState};
