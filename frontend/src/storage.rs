//! Browser localStorage access

use serde::{de::DeserializeOwned, Serialize};
use shared::{KeyValueStorage, StoreError};

fn local_storage() -> Result<web_sys::Storage, StoreError> {
    web_sys::window()
        .ok_or_else(|| StoreError::Unavailable("no global window".to_string()))?
        .local_storage()
        .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?
        .ok_or_else(|| StoreError::Unavailable("localStorage is disabled".to_string()))
}

/// `window.localStorage` as a [`KeyValueStorage`]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl KeyValueStorage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        local_storage()?
            .get_item(key)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        local_storage()?
            .set_item(key, value)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }
}

/// Load a JSON value, falling back to the default when missing or unreadable
pub fn load_json<T: DeserializeOwned + Default>(key: &str) -> T {
    LocalStorage
        .get_item(key)
        .ok()
        .flatten()
        .and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or_default()
}

/// Save a JSON value, logging failures
pub fn save_json<T: Serialize>(key: &str, value: &T) {
    let result = serde_json::to_string(value)
        .map_err(StoreError::Serialize)
        .and_then(|json| LocalStorage.set_item(key, &json));
    if let Err(e) = result {
        log::warn!("Failed to save {}: {}", key, e);
    }
}
