//! Browser-scoped key/value storage and the session store on top of it.
//!
//! [`ClientStorage`] is the string key/value surface the page persists its
//! credential in. In production it is the cookie-identified `tower-sessions`
//! session; tests use [`MemoryStorage`].

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use secrecy::{ExposeSecret, SecretString};
use snooze_core::Username;
use thiserror::Error;

use crate::models::{ClientSession, session_keys};

/// Errors raised by the backing store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The session backend failed.
    #[error("session store error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// String key/value storage scoped to one browser.
pub trait ClientStorage {
    /// Read a value.
    fn get_item(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Write a value, replacing any previous one.
    fn set_item(
        &self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Remove every key.
    fn clear(&self) -> impl Future<Output = Result<(), StorageError>> + Send;
}

impl ClientStorage for tower_sessions::Session {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get::<String>(key).await?)
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Ok(self.insert(key, value).await?)
    }

    async fn clear(&self) -> Result<(), StorageError> {
        Self::clear(self).await;
        Ok(())
    }
}

/// In-memory storage, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ClientStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }
}

/// Loads, saves and clears the persisted [`ClientSession`].
#[derive(Debug, Clone)]
pub struct SessionStore<C> {
    storage: C,
}

impl<C: ClientStorage + Sync> SessionStore<C> {
    pub const fn new(storage: C) -> Self {
        Self { storage }
    }

    /// Read the stored credential.
    ///
    /// Returns `None` unless both the token and the username are stored and non-empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    pub async fn load(&self) -> Result<Option<ClientSession>, StorageError> {
        let token = self.storage.get_item(session_keys::TOKEN).await?;
        let username = self.storage.get_item(session_keys::USERNAME).await?;

        Ok(match (token, username) {
            (Some(token), Some(username)) if !token.is_empty() && !username.is_empty() => {
                Some(ClientSession {
                    token: SecretString::from(token),
                    username: Username::new(username),
                })
            }
            _ => None,
        })
    }

    /// Persist a credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    pub async fn save(&self, session: &ClientSession) -> Result<(), StorageError> {
        self.storage
            .set_item(session_keys::TOKEN, session.token.expose_secret())
            .await?;
        self.storage
            .set_item(session_keys::USERNAME, session.username.as_str())
            .await
    }

    /// Wipe the storage, not only the credential keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.storage.clear().await
    }
}
