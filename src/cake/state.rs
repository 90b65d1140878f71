//! Candle and candle set
//!
//! Candles are never removed. The only state change is lit -> out.

use serde::{Deserialize, Serialize};

use super::layout::CandlePosition;

/// A single candle on the cake surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Horizontal offset from the cake surface's left edge (px)
    pub left: f64,
    /// Vertical offset from the cake surface's top edge (px)
    pub top: f64,
    /// Whether the flame is still burning
    pub lit: bool,
}

impl Candle {
    /// New candles always start lit
    pub fn new(left: f64, top: f64) -> Self {
        Self {
            left,
            top,
            lit: true,
        }
    }

    /// Put the flame out. Returns true if the candle was lit.
    pub fn extinguish(&mut self) -> bool {
        std::mem::replace(&mut self.lit, false)
    }

    pub fn position(&self) -> CandlePosition {
        CandlePosition {
            left: self.left,
            top: self.top,
        }
    }
}

impl From<CandlePosition> for Candle {
    fn from(pos: CandlePosition) -> Self {
        Self::new(pos.left, pos.top)
    }
}

/// Ordered candles (insertion order = display and storage order)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandleSet {
    candles: Vec<Candle>,
}

impl CandleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a lit candle, returning its index
    pub fn push(&mut self, left: f64, top: f64) -> usize {
        self.candles.push(Candle::new(left, top));
        self.candles.len() - 1
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Candle> {
        self.candles.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candle> {
        self.candles.iter()
    }

    /// Mutable access to individual candles. The set itself cannot shrink.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Candle> {
        self.candles.iter_mut()
    }

    /// Candles not marked out
    pub fn active_count(&self) -> usize {
        self.candles.iter().filter(|c| c.lit).count()
    }

    /// At least one candle exists and every one of them is out
    pub fn all_out(&self) -> bool {
        !self.candles.is_empty() && self.active_count() == 0
    }

    /// Positions in order, lit state dropped
    pub fn positions(&self) -> Vec<CandlePosition> {
        self.candles.iter().map(Candle::position).collect()
    }
}

impl FromIterator<CandlePosition> for CandleSet {
    fn from_iter<I: IntoIterator<Item = CandlePosition>>(iter: I) -> Self {
        Self {
            candles: iter.into_iter().map(Candle::from).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CandleSet {
    type Item = &'a Candle;
    type IntoIter = std::slice::Iter<'a, Candle>;

    fn into_iter(self) -> Self::IntoIter {
        self.candles.iter()
    }
}
