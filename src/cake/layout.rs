//! Default heart layout and the persisted layout format

use serde::{Deserialize, Serialize};

use crate::consts::INITIAL_CANDLE_COUNT;
use crate::error::CakeResult;

/// Stored position of one candle. Lit state is never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandlePosition {
    pub left: f64,
    pub top: f64,
}

/// (left, top) pairs forming a heart on the 250px wide cake
pub const HEART_LAYOUT: [(f64, f64); INITIAL_CANDLE_COUNT] = [
    // Top curves
    (90.0, -15.0),
    (110.0, -25.0),
    (130.0, -25.0),
    (150.0, -15.0),
    // Sides of the V
    (70.0, 0.0),
    (170.0, 0.0),
    (50.0, 15.0),
    (190.0, 15.0),
    (40.0, 30.0),
    (200.0, 30.0),
    // Point
    (125.0, 60.0),
    // Central dip
    (125.0, -15.0),
    // Fill
    (100.0, 5.0),
    (150.0, 5.0),
    (80.0, 20.0),
    (170.0, 20.0),
    (125.0, 40.0),
    (140.0, 45.0),
];

/// Ordered candle positions as written under the candle storage key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersistedLayout {
    pub positions: Vec<CandlePosition>,
}

impl PersistedLayout {
    pub fn new(positions: Vec<CandlePosition>) -> Self {
        Self { positions }
    }

    /// The heart arrangement used when nothing usable is stored
    pub fn heart() -> Self {
        Self::new(
            HEART_LAYOUT
                .iter()
                .map(|&(left, top)| CandlePosition { left, top })
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Decode a stored JSON array of `{left, top}` objects
    pub fn from_json(json: &str) -> CakeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> CakeResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
