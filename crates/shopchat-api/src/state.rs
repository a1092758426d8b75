//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use shopchat_core::config::ShopchatConfig;
use shopchat_storage::{ChatLogRepository, Database, ProductRepository};

/// Shared application state. All fields are `Arc` for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ShopchatConfig>,
    pub database: Arc<Database>,
    pub products: Arc<ProductRepository>,
    pub chat_log: Arc<ChatLogRepository>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: ShopchatConfig, database: Arc<Database>) -> Self {
        Self {
            config: Arc::new(config),
            products: Arc::new(ProductRepository::new(Arc::clone(&database))),
            chat_log: Arc::new(ChatLogRepository::new(Arc::clone(&database))),
            database,
            start_time: Instant::now(),
        }
    }
}
