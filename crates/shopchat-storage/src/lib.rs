//! ShopChat storage crate - SQLite persistence for the reference catalog.
//!
//! Provides a WAL-mode SQLite database with migrations, repositories for
//! products and the chat log, a credential store, and catalog seeding.

pub mod credentials;
pub mod db;
pub mod migrations;
pub mod repository;
pub mod seed;

pub use credentials::SqliteCredentialStore;
pub use db::Database;
pub use repository::{ChatLogRepository, ChatMessageRow, ProductQuery, ProductRepository};
pub use seed::{seed_if_empty, seed_products, CATEGORIES};
