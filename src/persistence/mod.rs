//! Key-value persistence
//!
//! Features:
//! - Get/set-by-key string store, last writer wins
//! - LocalStorage backend on web
//! - In-memory backend for native runs and tests

use std::collections::HashMap;

use crate::error::CakeResult;

#[cfg(target_arch = "wasm32")]
pub mod local;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;

/// Simple string store with get/set-by-key semantics
pub trait KeyValueStore {
    fn get(&self, key: &str) -> CakeResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> CakeResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> CakeResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> CakeResult<()> {
        (**self).set(key, value)
    }
}

/// Store that lives only as long as the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key (useful for simulating an earlier session)
    pub fn with_item(mut self, key: &str, value: &str) -> Self {
        self.items.insert(key.to_string(), value.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> CakeResult<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> CakeResult<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
