//! Blow-out tick
//!
//! One evaluation of the sampled microphone energy against the threshold.
//! When the input counts as blowing, each lit candle rolls independently so
//! candles go out unevenly rather than all at once.

use rand::Rng;

use super::state::CandleSet;
use crate::consts::{BLOW_PROBABILITY, BLOW_THRESHOLD};

/// Inputs for a single blow-out tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlowInput {
    /// Mean frequency-bin energy for this interval (0-255 scale)
    pub mean_energy: f32,
    /// Energy must be strictly above this to count as blowing
    pub threshold: f32,
    /// Per-candle chance of going out while blowing
    pub probability: f64,
}

impl BlowInput {
    pub fn new(mean_energy: f32) -> Self {
        Self {
            mean_energy,
            ..Default::default()
        }
    }

    pub fn is_blowing(&self) -> bool {
        self.mean_energy > self.threshold
    }
}

impl Default for BlowInput {
    fn default() -> Self {
        Self {
            mean_energy: 0.0,
            threshold: BLOW_THRESHOLD,
            probability: BLOW_PROBABILITY,
        }
    }
}

/// What a tick did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Energy was above the threshold
    pub blowing: bool,
    /// Candles flipped from lit to out this tick
    pub extinguished: usize,
}

impl TickOutcome {
    /// Display needs refreshing
    pub fn changed(&self) -> bool {
        self.extinguished > 0
    }
}

/// Advance the candles by one blow-out tick
pub fn blow_tick<R: Rng>(
    candles: &mut CandleSet,
    input: &BlowInput,
    rng: &mut R,
) -> TickOutcome {
    if !input.is_blowing() {
        return TickOutcome::default();
    }

    let p = input.probability.clamp(0.0, 1.0);
    let mut extinguished = 0;
    for candle in candles.iter_mut().filter(|c| c.lit) {
        if rng.random_bool(p) && candle.extinguish() {
            extinguished += 1;
        }
    }

    if extinguished > 0 {
        log::debug!(
            "Blew out {} candle(s) at energy {:.1}",
            extinguished,
            input.mean_energy
        );
    }

    TickOutcome {
        blowing: true,
        extinguished,
    }
}
