//! Session settings
//!
//! Persisted separately from the candle layout. Missing or malformed entries
//! fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::KeyValueStore;

/// Tunables for storage and the blow detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Key the candle layout is stored under
    pub storage_key: String,

    // === Blow detection ===
    /// Mean bin energy (0-255) that must be exceeded to count as blowing
    pub blow_threshold: f32,
    /// Per-candle chance of going out on a blowing tick
    pub blow_probability: f64,
    /// Sampling cadence
    pub tick_interval_ms: u32,
    /// Analyser FFT window
    pub fft_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_key: CANDLE_STORAGE_KEY.to_string(),
            blow_threshold: BLOW_THRESHOLD,
            blow_probability: BLOW_PROBABILITY,
            tick_interval_ms: TICK_INTERVAL_MS,
            fft_size: FFT_SIZE,
        }
    }
}

impl Settings {
    /// Smallest accepted tick interval (one frame at 60 Hz)
    pub const MIN_TICK_INTERVAL_MS: u32 = 16;

    /// Clamp every field into a usable range
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if self.storage_key.trim().is_empty() {
            self.storage_key = defaults.storage_key;
        }

        self.blow_threshold = if self.blow_threshold.is_finite() {
            self.blow_threshold.clamp(0.0, 255.0)
        } else {
            defaults.blow_threshold
        };

        self.blow_probability = if self.blow_probability.is_nan() {
            defaults.blow_probability
        } else {
            self.blow_probability.clamp(0.0, 1.0)
        };

        self.tick_interval_ms = self.tick_interval_ms.max(Self::MIN_TICK_INTERVAL_MS);

        // Web Audio accepts powers of two in 32..=32768
        self.fft_size = self.fft_size.clamp(32, 32768).next_power_of_two();

        self
    }

    /// Frequency bins the analyser produces for this window
    pub fn frequency_bin_count(&self) -> usize {
        (self.fft_size / 2) as usize
    }

    /// Load from `store`, falling back to defaults
    pub fn load<S: KeyValueStore>(store: &S) -> Self {
        match store.get(SETTINGS_STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from storage");
                    return settings.sanitized();
                }
                Err(e) => log::warn!("Ignoring malformed settings: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Could not read settings: {}", e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save to `store`
    pub fn save<S: KeyValueStore>(&self, store: &mut S) {
        match serde_json::to_string(self) {
            Ok(json) => match store.set(SETTINGS_STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Could not save settings: {}", e),
            },
            Err(e) => log::warn!("Could not encode settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.storage_key, "virtualCakeCandles");
        assert_eq!(settings.blow_threshold, 40.0);
        assert_eq!(settings.blow_probability, 0.5);
        assert_eq!(settings.tick_interval_ms, 200);
        assert_eq!(settings.fft_size, 256);
        assert_eq!(settings.frequency_bin_count(), 128);
    }

    #[test]
    fn test_load_missing_uses_defaults() {
        assert_eq!(Settings::load(&MemoryStore::new()), Settings::default());
    }

    #[test]
    fn test_load_malformed_uses_defaults() {
        let store = MemoryStore::new().with_item(SETTINGS_STORAGE_KEY, "nope");
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let store =
            MemoryStore::new().with_item(SETTINGS_STORAGE_KEY, r#"{"blow_threshold":60}"#);
        let settings = Settings::load(&store);
        assert_eq!(settings.blow_threshold, 60.0);
        assert_eq!(settings.fft_size, 256);
        assert_eq!(settings.storage_key, CANDLE_STORAGE_KEY);
    }

    #[test]
    fn test_sanitized_clamps() {
        let settings = Settings {
            storage_key: "  ".to_string(),
            blow_threshold: 900.0,
            blow_probability: 3.0,
            tick_interval_ms: 0,
            fft_size: 200,
        }
        .sanitized();
        assert_eq!(settings.storage_key, CANDLE_STORAGE_KEY);
        assert_eq!(settings.blow_threshold, 255.0);
        assert_eq!(settings.blow_probability, 1.0);
        assert_eq!(settings.tick_interval_ms, Settings::MIN_TICK_INTERVAL_MS);
        assert_eq!(settings.fft_size, 256);

        let settings = Settings {
            blow_threshold: f32::NAN,
            blow_probability: f64::NAN,
            fft_size: 1 << 20,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(settings.blow_threshold, BLOW_THRESHOLD);
        assert_eq!(settings.blow_probability, BLOW_PROBABILITY);
        assert_eq!(settings.fft_size, 32768);
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            tick_interval_ms: 100,
            ..Default::default()
        };
        settings.save(&mut store);
        assert_eq!(Settings::load(&store), settings);
    }
}
