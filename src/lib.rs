//! Virtual Cake - an interactive birthday cake
//!
//! Core modules:
//! - `cake`: Candle state, the default heart layout and the blow-out tick
//! - `store`: Candle store backed by a key-value persistence layer
//! - `persistence`: Key-value storage (LocalStorage on web, memory elsewhere)
//! - `audio`: Blow detector state machine and energy sampling
//! - `session`: Cake session controller tying it all together
//! - `ui`: Click handling and display outputs
//! - `platform`: Browser bindings (wasm32 only)

pub mod audio;
pub mod cake;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod store;
pub mod ui;

pub use audio::{BlowDetector, DetectorState, EnergySource};
pub use cake::{Candle, CandleSet};
pub use error::{CakeError, CakeResult};
pub use persistence::{KeyValueStore, MemoryStore};
pub use session::CakeSession;
pub use settings::Settings;
pub use store::CandleStore;
pub use ui::{HudView, SurfaceRect};

/// Session configuration constants
pub mod consts {
    /// LocalStorage key holding the candle layout
    pub const CANDLE_STORAGE_KEY: &str = "virtualCakeCandles";
    /// LocalStorage key holding user settings
    pub const SETTINGS_STORAGE_KEY: &str = "virtualCakeSettings";

    /// Candles in the default layout (18th birthday)
    pub const INITIAL_CANDLE_COUNT: usize = 18;

    /// Blow detector cadence
    pub const TICK_INTERVAL_MS: u32 = 200;
    /// Analyser FFT window (yields FFT_SIZE / 2 frequency bins)
    pub const FFT_SIZE: u32 = 256;
    /// Mean bin energy (0-255 scale) above which the input counts as blowing
    pub const BLOW_THRESHOLD: f32 = 40.0;
    /// Chance for each lit candle to go out on a blowing tick
    pub const BLOW_PROBABILITY: f64 = 0.5;
}
