//! SQLite-backed credential store.

use std::sync::Arc;

use rusqlite::OptionalExtension;

use shopchat_core::credentials::CredentialStore;
use shopchat_core::error::{Result, ShopchatError};

use crate::db::Database;

/// Credential store persisted in the `credentials` table.
pub struct SqliteCredentialStore {
    db: Arc<Database>,
}

impl SqliteCredentialStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

impl CredentialStore for SqliteCredentialStore {
    fn store(&self, key: &str, value: &str) -> Result<()> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO credentials (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                rusqlite::params![key, value],
            )
            .map_err(|e| ShopchatError::Storage(format!("Failed to store credential: {}", e)))?;
            Ok(())
        })
    }

    fn retrieve(&self, key: &str) -> Result<Option<String>> {
        self.db.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM credentials WHERE key = ?1",
                rusqlite::params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| ShopchatError::Storage(e.to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopchat_core::credentials::{current_user, login, DEFAULT_CREDENTIAL_KEY};

    #[test]
    fn test_store_and_retrieve() {
        let store = SqliteCredentialStore::new(Arc::new(Database::in_memory().unwrap()));
        assert!(store.retrieve("user").unwrap().is_none());
        store.store("user", "alice").unwrap();
        store.store("user", "bob").unwrap();
        assert_eq!(store.retrieve("user").unwrap().as_deref(), Some("bob"));
    }

    #[test]
    fn test_login_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shopchat.db");
        {
            let store = SqliteCredentialStore::new(Arc::new(Database::new(&path).unwrap()));
            login(&store, DEFAULT_CREDENTIAL_KEY, " carol ").unwrap();
        }
        let store = SqliteCredentialStore::new(Arc::new(Database::new(&path).unwrap()));
        assert_eq!(
            current_user(&store, DEFAULT_CREDENTIAL_KEY).unwrap().as_deref(),
            Some("carol")
        );
    }
}
