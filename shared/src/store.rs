//! Keyed session persistence on top of a string key-value storage.
//!
//! The whole collection lives under one key as a JSON list, which is the
//! layout browsers already hold. Every operation re-reads the collection, so
//! callers never mutate a stale copy.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::ChatSession;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The storage backend refused the operation (quota, privacy mode, ...)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Stored sessions are unreadable: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("Failed to serialize sessions: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Minimal string storage, modelled on the Web Storage API
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory storage. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub struct SessionStore<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> SessionStore<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// All sessions in creation order
    pub fn list(&self) -> Result<Vec<ChatSession>, StoreError> {
        match self.storage.get_item(&self.key)? {
            Some(json) => serde_json::from_str(&json).map_err(StoreError::Corrupt),
            None => Ok(Vec::new()),
        }
    }

    pub fn get(&self, chat_id: &str) -> Result<Option<ChatSession>, StoreError> {
        Ok(self.list()?.into_iter().find(|s| s.chat_id == chat_id))
    }

    /// Most recently created session (the last one appended)
    pub fn most_recent(&self) -> Result<Option<ChatSession>, StoreError> {
        Ok(self.list()?.pop())
    }

    /// Replace the session with the same id, or append it
    pub fn upsert(&self, session: &ChatSession) -> Result<(), StoreError> {
        let mut sessions = self.list()?;
        match sessions.iter_mut().find(|s| s.chat_id == session.chat_id) {
            Some(existing) => *existing = session.clone(),
            None => sessions.push(session.clone()),
        }
        self.save(&sessions)
    }

    /// Read-modify-write a single session.
    ///
    /// Returns the updated session, or `None` if it no longer exists.
    pub fn update<F>(&self, chat_id: &str, f: F) -> Result<Option<ChatSession>, StoreError>
    where
        F: FnOnce(&mut ChatSession),
    {
        let mut sessions = self.list()?;
        let Some(session) = sessions.iter_mut().find(|s| s.chat_id == chat_id) else {
            return Ok(None);
        };
        f(session);
        let updated = session.clone();
        self.save(&sessions)?;
        Ok(Some(updated))
    }

    /// Remove a session. Returns whether it existed.
    pub fn delete(&self, chat_id: &str) -> Result<bool, StoreError> {
        let mut sessions = self.list()?;
        let before = sessions.len();
        sessions.retain(|s| s.chat_id != chat_id);
        if sessions.len() == before {
            return Ok(false);
        }
        self.save(&sessions)?;
        Ok(true)
    }

    fn save(&self, sessions: &[ChatSession]) -> Result<(), StoreError> {
        let json = serde_json::to_string(sessions).map_err(StoreError::Serialize)?;
        self.storage.set_item(&self.key, &json)
    }
}
