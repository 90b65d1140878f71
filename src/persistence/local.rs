//! LocalStorage backend (wasm32 only)

use web_sys::Storage;

use super::KeyValueStore;
use crate::error::{CakeError, CakeResult};

/// Browser LocalStorage for the current origin
pub struct LocalStore {
    storage: Storage,
}

impl LocalStore {
    /// Open the window's LocalStorage (fails in private modes that disable it)
    pub fn open() -> CakeResult<Self> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| CakeError::unsupported("LocalStorage not available"))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> CakeResult<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| CakeError::storage(format!("read {}: {:?}", key, e)))
    }

    fn set(&mut self, key: &str, value: &str) -> CakeResult<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| CakeError::storage(format!("write {}: {:?}", key, e)))
    }
}
