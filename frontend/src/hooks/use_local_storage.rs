//! Hook for typed localStorage persistence with automatic save on change.

use crate::storage::{load_json, save_json};
use serde::{de::DeserializeOwned, Serialize};
use yew::prelude::*;

/// Return value from the use_local_storage hook.
pub struct UseLocalStorage<T: Clone + PartialEq + 'static> {
    /// Current value
    pub value: T,
    /// Set a new value (automatically persists to localStorage)
    pub set: Callback<T>,
}

/// Hook for managing state that persists to localStorage.
///
/// The value is loaded on mount and saved whenever it is set. If nothing is
/// stored under `key`, the default value is used.
///
/// # Example
/// ```ignore
/// let collapsed = use_local_storage::<bool>("chat_sidebar_collapsed".into());
/// collapsed.set.emit(!collapsed.value);
/// ```
#[hook]
pub fn use_local_storage<T>(key: AttrValue) -> UseLocalStorage<T>
where
    T: Clone + PartialEq + Serialize + DeserializeOwned + Default + 'static,
{
    let state = {
        let key = key.clone();
        use_state(move || load_json::<T>(&key))
    };

    let set = {
        let state = state.clone();
        Callback::from(move |new_value: T| {
            save_json(&key, &new_value);
            state.set(new_value);
        })
    };

    UseLocalStorage {
        value: (*state).clone(),
        set,
    }
}
