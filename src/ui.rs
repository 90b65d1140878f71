//! Click handling and display outputs

use crate::persistence::KeyValueStore;
use crate::store::CandleStore;

/// Bounding box origin of the cake surface, in client coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceRect {
    pub left: f64,
    pub top: f64,
}

/// Click position relative to the cake surface
pub fn click_offset(client_x: f64, client_y: f64, surface: SurfaceRect) -> (f64, f64) {
    (client_x - surface.left, client_y - surface.top)
}

/// What the page shows: the lit candle count and the end-of-session message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HudView {
    pub active_count: usize,
    pub show_message: bool,
}

impl HudView {
    pub fn from_store<S: KeyValueStore>(store: &CandleStore<S>) -> Self {
        Self {
            active_count: store.active_count(),
            show_message: store.visible_empty_state(),
        }
    }
}
