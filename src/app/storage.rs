//! Persisted credentials in browser localStorage.

use std::cell::RefCell;
use std::collections::HashMap;

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const TOKEN_EXPIRY_KEY: &str = "tokenExpiry";

/// String key/value persistence
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// `window.localStorage`. Outside the browser (SSR) it stores nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

impl KeyValueStore for BrowserStorage {
    #[cfg(target_arch = "wasm32")]
    fn get(&self, key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok().flatten()
    }

    #[cfg(target_arch = "wasm32")]
    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = local_storage() {
            if let Err(e) = storage.set_item(key, value) {
                tracing::warn!("localStorage set {} failed: {:?}", key, e);
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn remove(&self, key: &str) {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(key);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn set(&self, _key: &str, _value: &str) {}

    #[cfg(not(target_arch = "wasm32"))]
    fn remove(&self, _key: &str) {}
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

/// Bearer token and its expiry as persisted by the login flow
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoredCredentials {
    pub access_token: Option<String>,
    /// Raw `tokenExpiry` value (epoch milliseconds as text)
    pub token_expiry: Option<String>,
}

impl StoredCredentials {
    pub fn load(store: &impl KeyValueStore) -> Self {
        Self {
            access_token: store.get(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty()),
            token_expiry: store.get(TOKEN_EXPIRY_KEY),
        }
    }

    /// Remove both keys
    pub fn clear(store: &impl KeyValueStore) {
        store.remove(ACCESS_TOKEN_KEY);
        store.remove(TOKEN_EXPIRY_KEY);
    }

    /// Expiry in epoch milliseconds; `None` when absent or not numeric
    pub fn expiry_millis(&self) -> Option<i64> {
        let raw = self.token_expiry.as_deref()?.trim();
        // Leading integer digits, as `parseInt` reads them
        let end = raw
            .char_indices()
            .find(|(i, c)| !(c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+'))))
            .map(|(i, _)| i)
            .unwrap_or(raw.len());
        raw[..end].parse::<i64>().ok()
    }

    /// Whether the stored expiry lies before `now_ms`
    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.expiry_millis().is_some_and(|expiry| now_ms > expiry)
    }
}
