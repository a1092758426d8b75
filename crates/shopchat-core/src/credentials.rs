//! Local credential storage used by login.
//!
//! A session exists only once a username has been stored. Backends implement
//! [`CredentialStore`]; the in-memory one here serves tests and ephemeral runs.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::info;

use crate::error::{Result, ShopchatError};

/// Key the logged-in username is stored under unless configured otherwise.
pub const DEFAULT_CREDENTIAL_KEY: &str = "user";

/// Key/value store for a single credential string.
pub trait CredentialStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    fn store(&self, key: &str, value: &str) -> Result<()>;

    /// Retrieve the value stored under `key`, if any.
    fn retrieve(&self, key: &str) -> Result<Option<String>>;
}

/// Process-local credential store.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn store(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| ShopchatError::Storage(format!("credential lock poisoned: {}", e)))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn retrieve(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| ShopchatError::Storage(format!("credential lock poisoned: {}", e)))?;
        Ok(entries.get(key).cloned())
    }
}

/// Log a user in by storing the trimmed username under `key`.
///
/// A blank username is rejected without touching the store.
pub fn login(store: &dyn CredentialStore, key: &str, username: &str) -> Result<String> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ShopchatError::InvalidCredential(
            "username is empty".to_string(),
        ));
    }
    store.store(key, username)?;
    info!(user = %username, "Logged in");
    Ok(username.to_string())
}

/// The currently stored username, if someone has logged in.
pub fn current_user(store: &dyn CredentialStore, key: &str) -> Result<Option<String>> {
    Ok(store
        .retrieve(key)?
        .filter(|user| !user.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_stores_trimmed_username() {
        let store = MemoryCredentialStore::new();
        let user = login(&store, DEFAULT_CREDENTIAL_KEY, "  alice  ").unwrap();
        assert_eq!(user, "alice");
        assert_eq!(
            store.retrieve(DEFAULT_CREDENTIAL_KEY).unwrap().as_deref(),
            Some("alice")
        );
    }

    #[test]
    fn test_login_blank_rejected_without_store() {
        let store = MemoryCredentialStore::new();
        let err = login(&store, DEFAULT_CREDENTIAL_KEY, "   ").unwrap_err();
        assert!(matches!(err, ShopchatError::InvalidCredential(_)));
        assert!(store.retrieve(DEFAULT_CREDENTIAL_KEY).unwrap().is_none());
    }

    #[test]
    fn test_login_replaces_previous_user() {
        let store = MemoryCredentialStore::new();
        login(&store, DEFAULT_CREDENTIAL_KEY, "alice").unwrap();
        login(&store, DEFAULT_CREDENTIAL_KEY, "bob").unwrap();
        assert_eq!(
            current_user(&store, DEFAULT_CREDENTIAL_KEY).unwrap().as_deref(),
            Some("bob")
        );
    }

    #[test]
    fn test_current_user_none_before_login() {
        let store = MemoryCredentialStore::new();
        assert!(current_user(&store, DEFAULT_CREDENTIAL_KEY).unwrap().is_none());
    }

    #[test]
    fn test_keys_are_independent() {
        let store = MemoryCredentialStore::new();
        store.store("user", "alice").unwrap();
        assert!(store.retrieve("token").unwrap().is_none());
    }
}
