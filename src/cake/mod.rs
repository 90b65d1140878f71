//! Cake state module
//!
//! Pure candle logic with no platform dependencies:
//! - Candles and the ordered candle set
//! - The default heart-shaped layout and the persisted layout format
//! - One blow-out tick against a sampled energy

pub mod layout;
pub mod state;
pub mod tick;

pub use layout::{CandlePosition, HEART_LAYOUT, PersistedLayout};
pub use state::{Candle, CandleSet};
pub use tick::{BlowInput, TickOutcome, blow_tick};
