//! Platform abstraction layer
//!
//! Browser bindings for:
//! - Microphone capture and the Web Audio analyser
//! - The repeating sampling timer
//! - Candle elements and the HUD
//!
//! Storage lives in `persistence` (LocalStorage on web).

#[cfg(target_arch = "wasm32")]
pub mod web;
