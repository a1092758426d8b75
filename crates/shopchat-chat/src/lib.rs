//! Conversational catalog interface for ShopChat.
//!
//! Extracts structured filters from free-text questions, keeps the session
//! transcript and detail-view selection, and talks to the catalog service.

pub mod catalog;
pub mod confirmation;
pub mod context;
pub mod error;
pub mod orchestrator;
pub mod parser;
pub mod response;
pub mod selection;

pub use catalog::{CatalogService, HttpCatalogClient};
pub use confirmation::{ConfirmationGate, FixedAnswer, RESET_PROMPT};
pub use context::ConversationStore;
pub use error::{CatalogError, ChatError};
pub use orchestrator::{ChatSession, ResetOutcome, SessionState};
pub use parser::FilterExtractor;
pub use response::{compose_reply, summary_message, NOT_FOUND_MESSAGE};
pub use selection::Selection;
