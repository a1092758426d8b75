//! Repositories for products and the chat log.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{OptionalExtension, Row};

use shopchat_core::error::ShopchatError;
use shopchat_core::types::{Product, ProductId, Sender};

use crate::db::Database;

/// Catalog search constraints.
///
/// `category` is a case-insensitive substring match; price bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub max_price: Option<f64>,
    pub min_price: Option<f64>,
    pub limit: Option<u32>,
}

/// Repository for catalog products.
pub struct ProductRepository {
    db: Arc<Database>,
}

impl ProductRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Insert a product and return it with its assigned id.
    pub fn insert(
        &self,
        name: &str,
        category: &str,
        price: f64,
        description: &str,
    ) -> Result<Product, ShopchatError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO products (name, category, price, description)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![name, category, price, description],
            )
            .map_err(|e| ShopchatError::Storage(format!("Failed to save product: {}", e)))?;
            Ok(Product {
                id: ProductId(conn.last_insert_rowid()),
                name: name.to_string(),
                category: category.to_string(),
                price,
                description: description.to_string(),
            })
        })
    }

    /// Find a product by id.
    pub fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, ShopchatError> {
        self.db.with_conn(|conn| {
            conn.query_row(
                "SELECT id, name, category, price, description FROM products WHERE id = ?1",
                rusqlite::params![id.0],
                row_to_product,
            )
            .optional()
            .map_err(|e| ShopchatError::Storage(e.to_string()))
        })
    }

    /// Products matching `query`, in id order.
    pub fn search(&self, query: &ProductQuery) -> Result<Vec<Product>, ShopchatError> {
        // SQLite treats a negative LIMIT as "no limit".
        let limit = query.limit.map(i64::from).unwrap_or(-1);
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, name, category, price, description
                     FROM products
                     WHERE (?1 IS NULL OR instr(lower(category), lower(?1)) > 0)
                       AND (?2 IS NULL OR price <= ?2)
                       AND (?3 IS NULL OR price >= ?3)
                     ORDER BY id
                     LIMIT ?4",
                )
                .map_err(|e| ShopchatError::Storage(e.to_string()))?;

            let rows = stmt
                .query_map(
                    rusqlite::params![query.category, query.max_price, query.min_price, limit],
                    row_to_product,
                )
                .map_err(|e| ShopchatError::Storage(e.to_string()))?;

            rows.collect::<Result<Vec<_>, _>>()
                .map_err(|e| ShopchatError::Storage(e.to_string()))
        })
    }

    pub fn count(&self) -> Result<u64, ShopchatError> {
        self.db.with_conn(|conn| {
            conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get::<_, i64>(0))
                .map(|n| n as u64)
                .map_err(|e| ShopchatError::Storage(e.to_string()))
        })
    }
}

fn row_to_product(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: ProductId(row.get(0)?),
        name: row.get(1)?,
        category: row.get(2)?,
        price: row.get(3)?,
        description: row.get(4)?,
    })
}

/// A stored chat log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessageRow {
    pub id: i64,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Repository for the server-side chat log.
pub struct ChatLogRepository {
    db: Arc<Database>,
}

impl ChatLogRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Append a message stamped with the current time.
    pub fn record(&self, sender: Sender, text: &str) -> Result<ChatMessageRow, ShopchatError> {
        self.record_at(sender, text, Utc::now())
    }

    /// Append a message with an explicit timestamp.
    pub fn record_at(
        &self,
        sender: Sender,
        text: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<ChatMessageRow, ShopchatError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO chat_messages (sender, text, timestamp) VALUES (?1, ?2, ?3)",
                rusqlite::params![sender.as_str(), text, timestamp.timestamp()],
            )
            .map_err(|e| ShopchatError::Storage(format!("Failed to save chat message: {}", e)))?;
            Ok(ChatMessageRow {
                id: conn.last_insert_rowid(),
                sender,
                text: text.to_string(),
                timestamp,
            })
        })
    }

    /// All messages, oldest first.
    pub fn list(&self) -> Result<Vec<ChatMessageRow>, ShopchatError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, sender, text, timestamp FROM chat_messages
                     ORDER BY timestamp, id",
                )
                .map_err(|e| ShopchatError::Storage(e.to_string()))?;

            let rows = stmt
                .query_map([], |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                })
                .map_err(|e| ShopchatError::Storage(e.to_string()))?;

            let mut messages = Vec::new();
            for row in rows {
                let (id, sender, text, ts) =
                    row.map_err(|e| ShopchatError::Storage(e.to_string()))?;
                messages.push(ChatMessageRow {
                    id,
                    sender: parse_sender(&sender)?,
                    text,
                    timestamp: Utc.timestamp_opt(ts, 0).single().ok_or_else(|| {
                        ShopchatError::Storage(format!("Invalid timestamp: {}", ts))
                    })?,
                });
            }
            Ok(messages)
        })
    }

    /// Delete every message. Returns the number removed.
    pub fn clear(&self) -> Result<usize, ShopchatError> {
        self.db.with_conn(|conn| {
            conn.execute("DELETE FROM chat_messages", [])
                .map_err(|e| ShopchatError::Storage(format!("Failed to clear chat log: {}", e)))
        })
    }
}

fn parse_sender(value: &str) -> Result<Sender, ShopchatError> {
    match value {
        "user" => Ok(Sender::User),
        "bot" => Ok(Sender::Bot),
        other => Err(ShopchatError::Storage(format!("Unknown sender: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (ProductRepository, ChatLogRepository) {
        let db = Arc::new(Database::in_memory().unwrap());
        (
            ProductRepository::new(Arc::clone(&db)),
            ChatLogRepository::new(db),
        )
    }

    fn fill(repo: &ProductRepository) {
        repo.insert("Nova Phone", "Electronics", 450.0, "A phone.").unwrap();
        repo.insert("Iron Kettle", "Home", 900.0, "A kettle.").unwrap();
        repo.insert("Pixel Tablet", "Electronics", 2500.0, "A tablet.").unwrap();
        repo.insert("Trail Boots", "Shoes", 300.0, "Boots.").unwrap();
    }

    #[test]
    fn test_insert_and_find() {
        let (repo, _) = setup();
        let saved = repo.insert("Nova Phone", "Electronics", 450.0, "A phone.").unwrap();
        let found = repo.find_by_id(saved.id).unwrap().unwrap();
        assert_eq!(found, saved);
        assert!(repo.find_by_id(ProductId(999)).unwrap().is_none());
    }

    #[test]
    fn test_search_unfiltered_returns_all_in_id_order() {
        let (repo, _) = setup();
        fill(&repo);
        let all = repo.search(&ProductQuery::default()).unwrap();
        assert_eq!(all.len(), 4);
        assert!(all.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn test_search_category_is_case_insensitive_substring() {
        let (repo, _) = setup();
        fill(&repo);
        let query = ProductQuery {
            category: Some("electr".to_string()),
            ..ProductQuery::default()
        };
        let names: Vec<String> = repo.search(&query).unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Nova Phone", "Pixel Tablet"]);
    }

    #[test]
    fn test_search_price_bounds_inclusive() {
        let (repo, _) = setup();
        fill(&repo);
        let query = ProductQuery {
            max_price: Some(900.0),
            min_price: Some(450.0),
            ..ProductQuery::default()
        };
        let names: Vec<String> = repo.search(&query).unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Nova Phone", "Iron Kettle"]);
    }

    #[test]
    fn test_search_combined_and_limit() {
        let (repo, _) = setup();
        fill(&repo);
        let query = ProductQuery {
            category: Some("Electronics".to_string()),
            max_price: Some(500.0),
            ..ProductQuery::default()
        };
        assert_eq!(repo.search(&query).unwrap().len(), 1);

        let limited = ProductQuery {
            limit: Some(2),
            ..ProductQuery::default()
        };
        assert_eq!(repo.search(&limited).unwrap().len(), 2);
    }

    #[test]
    fn test_search_wildcards_are_literal() {
        let (repo, _) = setup();
        fill(&repo);
        let query = ProductQuery {
            category: Some("%".to_string()),
            ..ProductQuery::default()
        };
        assert!(repo.search(&query).unwrap().is_empty());
    }

    #[test]
    fn test_count() {
        let (repo, _) = setup();
        assert_eq!(repo.count().unwrap(), 0);
        fill(&repo);
        assert_eq!(repo.count().unwrap(), 4);
    }

    #[test]
    fn test_chat_log_ordered_by_time_then_id() {
        let (_, log) = setup();
        let later = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap();
        log.record_at(Sender::User, "second", later).unwrap();
        log.record_at(Sender::User, "first", earlier).unwrap();
        log.record_at(Sender::Bot, "third", later).unwrap();

        let texts: Vec<String> = log.list().unwrap().into_iter().map(|m| m.text).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_chat_log_clear() {
        let (_, log) = setup();
        log.record(Sender::User, "hello").unwrap();
        log.record(Sender::Bot, "No products found.").unwrap();
        assert_eq!(log.clear().unwrap(), 2);
        assert!(log.list().unwrap().is_empty());
        assert_eq!(log.clear().unwrap(), 0);
    }

    #[test]
    fn test_chat_log_preserves_sender() {
        let (_, log) = setup();
        log.record(Sender::Bot, "3 products matched.").unwrap();
        let messages = log.list().unwrap();
        assert_eq!(messages[0].sender, Sender::Bot);
    }
}
