//! Error types for the conversational interface.

use shopchat_core::error::ShopchatError;
use shopchat_core::types::ProductId;

/// Failures talking to the catalog service.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("catalog returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("product not found: {0}")]
    NotFound(ProductId),
    #[error("invalid response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CatalogError::Decode(err.to_string())
        } else {
            CatalogError::Transport(err.to_string())
        }
    }
}

/// Errors from the chat session.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("catalog service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("invalid turn: {0}")]
    InvalidTurn(String),
    #[error("session state lock poisoned: {0}")]
    StatePoisoned(String),
}

impl From<CatalogError> for ChatError {
    fn from(err: CatalogError) -> Self {
        ChatError::ServiceUnavailable(err.to_string())
    }
}

impl From<ChatError> for ShopchatError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::ServiceUnavailable(msg) => ShopchatError::Catalog(msg),
            other => ShopchatError::Api(other.to_string()),
        }
    }
}
