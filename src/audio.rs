//! Blow detector
//!
//! Two states: idle (no audio) and listening (an energy source is attached).
//! The browser analyser lives in `platform::web`; here we only deal with
//! byte frequency data and the state machine around it.

use crate::error::CakeError;

/// Anything that can report the current frequency-domain energy
pub trait EnergySource {
    /// Mean energy across all frequency bins (0-255 scale)
    fn mean_energy(&mut self) -> f32;
}

/// Mean of 8-bit frequency bins. Empty input has no energy.
pub fn mean_energy(bins: &[u8]) -> f32 {
    if bins.is_empty() {
        return 0.0;
    }
    let sum: u64 = bins.iter().map(|&b| b as u64).sum();
    sum as f32 / bins.len() as f32
}

/// Detector state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    /// No audio stream
    Idle,
    /// Microphone attached, sampling on every tick
    Listening,
}

/// Microphone-driven blow detector
pub struct BlowDetector {
    source: Option<Box<dyn EnergySource>>,
    /// Why the microphone is unavailable, once we know it never will be
    unavailable: Option<String>,
}

impl Default for BlowDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl BlowDetector {
    pub fn new() -> Self {
        Self {
            source: None,
            unavailable: None,
        }
    }

    pub fn state(&self) -> DetectorState {
        if self.source.is_some() {
            DetectorState::Listening
        } else {
            DetectorState::Idle
        }
    }

    pub fn is_listening(&self) -> bool {
        self.state() == DetectorState::Listening
    }

    /// Permission granted: idle -> listening
    pub fn attach(&mut self, source: Box<dyn EnergySource>) {
        if self.unavailable.is_some() {
            log::warn!("Microphone already reported unavailable, ignoring stream");
            return;
        }
        self.source = Some(source);
        log::info!("Microphone attached, listening for blowing");
    }

    /// Permission denied or capability missing. Stays idle for good.
    pub fn on_unavailable(&mut self, err: &CakeError) {
        log::warn!("Unable to access microphone: {}", err);
        self.source = None;
        self.unavailable = Some(err.to_string());
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        self.unavailable.as_deref()
    }

    /// Listening -> idle, dropping the source
    pub fn stop(&mut self) {
        if self.source.take().is_some() {
            log::info!("Blow detector stopped");
        }
    }

    /// Current mean energy, or None while idle
    pub fn sample(&mut self) -> Option<f32> {
        self.source.as_mut().map(|s| s.mean_energy())
    }
}
