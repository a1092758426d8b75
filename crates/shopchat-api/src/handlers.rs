//! Route handler functions for all API endpoints.

use axum::extract::{Path, Query, RawQuery, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use shopchat_core::types::{Product, ProductId, Sender, Turn};
use shopchat_storage::{ChatMessageRow, ProductQuery};

use crate::error::ApiError;
use crate::query::{chat_reply, parse_chat_query, search_log_reply};
use crate::state::AppState;

/// Chat log timestamp format.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// Request / response types
// =============================================================================

/// Query parameters for GET /api/products. Values arrive as strings so a
/// malformed number can be reported as a 400.
#[derive(Debug, Default, Deserialize)]
pub struct ProductParams {
    pub category: Option<String>,
    pub max_price: Option<String>,
    pub min_price: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub product_count: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessageResponse {
    pub sender: Sender,
    pub text: String,
    pub timestamp: String,
}

impl From<ChatMessageRow> for ChatMessageResponse {
    fn from(row: ChatMessageRow) -> Self {
        Self {
            sender: row.sender,
            text: row.text,
            timestamp: row.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatExchange {
    pub user: Turn,
    pub bot: Turn,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResetResponse {
    pub status: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /health
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        product_count: state.products.count()?,
    }))
}

/// GET /api/products - filtered listing; every call is recorded in the chat log.
pub async fn list_products(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
    Query(params): Query<ProductParams>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let query = ProductQuery {
        category: non_empty(params.category),
        max_price: parse_price("max_price", params.max_price)?,
        min_price: parse_price("min_price", params.min_price)?,
        limit: None,
    };
    let products = state.products.search(&query)?;

    state
        .chat_log
        .record(Sender::User, raw.as_deref().unwrap_or_default())?;
    state
        .chat_log
        .record(Sender::Bot, &search_log_reply(products.len()))?;

    tracing::debug!(?query, results = products.len(), "Product search");
    Ok(Json(products))
}

/// GET /api/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, ApiError> {
    state
        .products
        .find_by_id(ProductId(id))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))
}

/// GET /api/chats - full chat log, oldest first.
pub async fn list_chats(
    State(state): State<AppState>,
) -> Result<Json<Vec<ChatMessageResponse>>, ApiError> {
    let messages = state.chat_log.list()?;
    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

/// POST /api/chat - parse the text server-side and answer with matching products.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatExchange>, ApiError> {
    let text = request.text.to_lowercase();
    state.chat_log.record(Sender::User, &text)?;

    let query = parse_chat_query(&text, state.config.server.chat_result_limit);
    let products = state.products.search(&query)?;
    let reply = chat_reply(&products);
    state.chat_log.record(Sender::Bot, &reply)?;

    tracing::debug!(?query, results = products.len(), "Chat query");
    Ok(Json(ChatExchange {
        user: Turn::user(text),
        bot: Turn::bot(reply, Some(products)),
    }))
}

/// POST /api/reset - delete the chat log.
pub async fn reset(State(state): State<AppState>) -> Result<Json<ResetResponse>, ApiError> {
    let removed = state.chat_log.clear()?;
    tracing::info!(removed, "Chat log reset");
    Ok(Json(ResetResponse {
        status: "Chat reset successful".to_string(),
    }))
}

// =============================================================================
// Helpers
// =============================================================================

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Parse a price bound. Values beyond `f64` range (including `inf`) clamp to
/// `f64::MAX` / `f64::MIN`, so an oversized ceiling means no ceiling.
fn parse_price(name: &str, value: Option<String>) -> Result<Option<f64>, ApiError> {
    match non_empty(value) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<f64>()
            .ok()
            .filter(|v| !v.is_nan())
            .map(|v| Some(v.clamp(f64::MIN, f64::MAX)))
            .ok_or_else(|| ApiError::BadRequest(format!("{} must be a number, got '{}'", name, raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("max_price", None).unwrap(), None);
        assert_eq!(parse_price("max_price", Some(String::new())).unwrap(), None);
        assert_eq!(
            parse_price("max_price", Some("500".into())).unwrap(),
            Some(500.0)
        );
        assert!(matches!(
            parse_price("max_price", Some("cheap".into())),
            Err(ApiError::BadRequest(_))
        ));
        assert!(parse_price("max_price", Some("NaN".into())).is_err());
    }

    #[test]
    fn test_parse_price_out_of_range_clamps() {
        assert_eq!(
            parse_price("max_price", Some("9".repeat(400))).unwrap(),
            Some(f64::MAX)
        );
        assert_eq!(
            parse_price("max_price", Some("inf".into())).unwrap(),
            Some(f64::MAX)
        );
        assert_eq!(
            parse_price("min_price", Some("-inf".into())).unwrap(),
            Some(f64::MIN)
        );
    }
}
