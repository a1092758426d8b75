//! Database schema migrations.

use rusqlite::Connection;
use tracing::info;

use shopchat_core::error::ShopchatError;

/// Run all pending database migrations.
pub fn run_migrations(conn: &Connection) -> Result<(), ShopchatError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| ShopchatError::Storage(format!("Failed to create migrations table: {}", e)))?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| ShopchatError::Storage(format!("Failed to query migration version: {}", e)))?;

    if current_version < 1 {
        apply_v1(conn)?;
        info!("Applied migration v1: initial_schema");
    }

    Ok(())
}

/// Version 1: products, chat log and credentials.
fn apply_v1(conn: &Connection) -> Result<(), ShopchatError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS products (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            category    TEXT NOT NULL,
            price       REAL NOT NULL CHECK (price >= 0),
            description TEXT NOT NULL DEFAULT ''
        );

        CREATE INDEX IF NOT EXISTS idx_products_category
            ON products (category);

        CREATE TABLE IF NOT EXISTS chat_messages (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            sender      TEXT NOT NULL CHECK (sender IN ('user', 'bot')),
            text        TEXT NOT NULL,
            timestamp   INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_chat_messages_timestamp
            ON chat_messages (timestamp, id);

        CREATE TABLE IF NOT EXISTS credentials (
            key         TEXT PRIMARY KEY NOT NULL,
            value       TEXT NOT NULL
        );

        INSERT INTO schema_migrations (version, name) VALUES (1, 'initial_schema');
        ",
    )
    .map_err(|e| ShopchatError::Storage(format!("Migration v1 failed: {}", e)))?;
    Ok(())
}
