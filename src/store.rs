//! Candle store
//!
//! Owns the session's candles and keeps the persisted layout in step with
//! them. Only positions are written; every reload starts with all candles lit.

use crate::cake::{CandleSet, PersistedLayout};
use crate::error::CakeResult;
use crate::persistence::KeyValueStore;

/// Candles plus the key-value store they persist to
#[derive(Debug)]
pub struct CandleStore<S: KeyValueStore> {
    storage: S,
    key: String,
    candles: CandleSet,
}

impl<S: KeyValueStore> CandleStore<S> {
    /// Restore candles from `key`, seeding the heart layout when nothing
    /// usable is stored.
    pub fn load(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let stored = match storage.get(&key) {
            Ok(Some(json)) => match PersistedLayout::from_json(&json) {
                Ok(layout) => layout,
                Err(e) => {
                    log::warn!("Ignoring malformed candle layout: {}", e);
                    PersistedLayout::default()
                }
            },
            Ok(None) => PersistedLayout::default(),
            Err(e) => {
                log::warn!("Could not read candle layout: {}", e);
                PersistedLayout::default()
            }
        };

        let mut store = Self {
            storage,
            key,
            candles: CandleSet::new(),
        };

        if stored.is_empty() {
            store.seed_default();
        } else {
            log::info!("Loaded {} candles", stored.len());
            store.candles = stored.positions.into_iter().collect();
        }
        store
    }

    /// Place the heart arrangement and persist it
    fn seed_default(&mut self) {
        for pos in PersistedLayout::heart().positions {
            self.candles.push(pos.left, pos.top);
        }
        if let Err(e) = self.save() {
            log::warn!("Could not persist default layout: {}", e);
        }
        log::info!(
            "Set {} initial candles in a heart shape!",
            self.candles.len()
        );
    }

    /// Append a lit candle. With `persist`, the whole layout is rewritten
    /// before returning; the candle is kept even if that write fails.
    pub fn add(&mut self, left: f64, top: f64, persist: bool) -> CakeResult<usize> {
        let index = self.candles.push(left, top);
        if persist {
            self.save()?;
        }
        Ok(index)
    }

    /// Overwrite the persisted layout with current positions
    pub fn save(&mut self) -> CakeResult<()> {
        let json = PersistedLayout::new(self.candles.positions()).to_json()?;
        self.storage.set(&self.key, &json)
    }

    pub fn active_count(&self) -> usize {
        self.candles.active_count()
    }

    /// True iff there is at least one candle and all are out
    pub fn visible_empty_state(&self) -> bool {
        self.candles.all_out()
    }

    pub fn candles(&self) -> &CandleSet {
        &self.candles
    }

    pub(crate) fn candles_mut(&mut self) -> &mut CandleSet {
        &mut self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Give the backing store back (e.g. to load a fresh session from it)
    pub fn into_storage(self) -> S {
        self.storage
    }
}
