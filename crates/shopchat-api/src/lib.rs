//! ShopChat API crate - the catalog service over HTTP.
//!
//! Serves product search and detail, the chat log, server-side chat
//! parsing, and conversation reset as JSON endpoints.

pub mod error;
pub mod handlers;
pub mod query;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
