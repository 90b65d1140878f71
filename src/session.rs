//! Cake session controller
//!
//! Owns the candle store and the blow detector. The browser layer forwards
//! clicks and timer ticks here and renders the returned [`HudView`].

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::{BlowDetector, EnergySource};
use crate::cake::{BlowInput, TickOutcome, blow_tick};
use crate::error::CakeError;
use crate::persistence::KeyValueStore;
use crate::settings::Settings;
use crate::store::CandleStore;
use crate::ui::{HudView, SurfaceRect, click_offset};

/// One page session
pub struct CakeSession<S: KeyValueStore> {
    store: CandleStore<S>,
    detector: BlowDetector,
    settings: Settings,
    rng: Pcg32,
    /// Whether the end-of-session message was showing after the last update
    message_shown: bool,
}

impl<S: KeyValueStore> CakeSession<S> {
    /// Load settings and candles from `storage`
    pub fn start(storage: S, seed: u64) -> Self {
        let settings = Settings::load(&storage);
        Self::with_settings(storage, settings, seed)
    }

    pub fn with_settings(storage: S, settings: Settings, seed: u64) -> Self {
        let settings = settings.sanitized();
        let store = CandleStore::load(storage, settings.storage_key.clone());
        let message_shown = store.visible_empty_state();
        Self {
            store,
            detector: BlowDetector::new(),
            settings,
            rng: Pcg32::seed_from_u64(seed),
            message_shown,
        }
    }

    pub fn store(&self) -> &CandleStore<S> {
        &self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn detector(&self) -> &BlowDetector {
        &self.detector
    }

    pub fn hud(&self) -> HudView {
        HudView::from_store(&self.store)
    }

    /// Place a persisted candle where the surface was clicked.
    /// Returns the new candle's index and the refreshed display.
    pub fn handle_click(
        &mut self,
        client_x: f64,
        client_y: f64,
        surface: SurfaceRect,
    ) -> (usize, HudView) {
        let (left, top) = click_offset(client_x, client_y, surface);
        self.add_candle(left, top)
    }

    /// Append a persisted candle at a surface offset
    pub fn add_candle(&mut self, left: f64, top: f64) -> (usize, HudView) {
        let index = match self.store.add(left, top, true) {
            Ok(index) => index,
            Err(e) => {
                log::warn!("Candle added but layout not saved: {}", e);
                self.store.len() - 1
            }
        };
        (index, self.refresh())
    }

    /// Microphone granted
    pub fn attach_microphone(&mut self, source: Box<dyn EnergySource>) {
        self.detector.attach(source);
    }

    /// Microphone denied or unsupported
    pub fn microphone_unavailable(&mut self, err: &CakeError) {
        self.detector.on_unavailable(err);
    }

    pub fn stop_listening(&mut self) {
        self.detector.stop();
    }

    /// One blow-out tick. Returns a display update only when a candle went out.
    pub fn on_tick(&mut self) -> Option<HudView> {
        let mean_energy = self.detector.sample()?;
        let outcome = self.blow(mean_energy);
        outcome.changed().then(|| self.refresh())
    }

    /// Run a tick against a known energy (no microphone needed)
    pub fn blow(&mut self, mean_energy: f32) -> TickOutcome {
        let input = BlowInput {
            mean_energy,
            threshold: self.settings.blow_threshold,
            probability: self.settings.blow_probability,
        };
        blow_tick(self.store.candles_mut(), &input, &mut self.rng)
    }

    fn refresh(&mut self) -> HudView {
        let hud = self.hud();
        if hud.show_message && !self.message_shown {
            log::info!("All candles are out. Happy birthday!");
        }
        self.message_shown = hud.show_message;
        hud
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::DetectorState;
    use crate::audio::tests::ScriptedEnergy;
    use crate::consts::{CANDLE_STORAGE_KEY, SETTINGS_STORAGE_KEY};
    use crate::persistence::MemoryStore;
    use proptest::prelude::*;

    fn one_candle() -> MemoryStore {
        MemoryStore::new().with_item(CANDLE_STORAGE_KEY, r#"[{"left":10,"top":5}]"#)
    }

    #[test]
    fn test_click_adds_candle_at_offset() {
        let mut session = CakeSession::start(one_candle(), 1);
        let surface = SurfaceRect {
            left: 200.0,
            top: 100.0,
        };
        let (index, hud) = session.handle_click(250.0, 130.0, surface);
        assert_eq!(index, 1);
        assert_eq!(
            hud,
            HudView {
                active_count: 2,
                show_message: false
            }
        );
        let candle = session.store().candles().get(1).unwrap();
        assert_eq!((candle.left, candle.top), (50.0, 30.0));
    }

    #[test]
    fn test_tick_while_idle_does_nothing() {
        let mut session = CakeSession::start(one_candle(), 1);
        assert_eq!(session.detector().state(), DetectorState::Idle);
        assert_eq!(session.on_tick(), None);
        assert_eq!(session.hud().active_count, 1);
    }

    #[test]
    fn test_quiet_microphone_never_blows() {
        let mut session = CakeSession::start(MemoryStore::new(), 9);
        session.attach_microphone(Box::new(ScriptedEnergy::constant(40.0)));
        for _ in 0..300 {
            assert_eq!(session.on_tick(), None);
        }
        assert_eq!(session.hud().active_count, 18);
    }

    #[test]
    fn test_loud_microphone_ends_session() {
        let mut session = CakeSession::start(MemoryStore::new(), 2024);
        session.attach_microphone(Box::new(ScriptedEnergy::constant(95.0)));

        let mut updates = Vec::new();
        for _ in 0..200 {
            if let Some(hud) = session.on_tick() {
                updates.push(hud);
            }
        }
        let last = updates.last().copied().unwrap();
        assert_eq!(
            last,
            HudView {
                active_count: 0,
                show_message: true
            }
        );
        // Counts only go down between updates
        for pair in updates.windows(2) {
            assert!(pair[1].active_count < pair[0].active_count);
        }
    }

    #[test]
    fn test_new_candle_hides_message() {
        let mut session = CakeSession::start(one_candle(), 5);
        session.attach_microphone(Box::new(ScriptedEnergy::constant(255.0)));
        while session.on_tick().is_none_or(|hud| !hud.show_message) {}
        assert!(session.hud().show_message);

        let (_, hud) = session.add_candle(0.0, 0.0);
        assert_eq!(
            hud,
            HudView {
                active_count: 1,
                show_message: false
            }
        );
    }

    #[test]
    fn test_denied_microphone_keeps_clicks_working() {
        let mut session = CakeSession::start(one_candle(), 1);
        session.microphone_unavailable(&CakeError::unsupported("getUserMedia"));
        session.attach_microphone(Box::new(ScriptedEnergy::constant(255.0)));
        assert_eq!(session.on_tick(), None);

        let (_, hud) = session.add_candle(3.0, 4.0);
        assert_eq!(hud.active_count, 2);
    }

    #[test]
    fn test_stop_listening() {
        let mut session = CakeSession::start(one_candle(), 1);
        session.attach_microphone(Box::new(ScriptedEnergy::constant(255.0)));
        session.stop_listening();
        assert_eq!(session.on_tick(), None);
        assert_eq!(session.hud().active_count, 1);
    }

    #[test]
    fn test_settings_drive_threshold_and_key() {
        let storage = MemoryStore::new()
            .with_item(
                SETTINGS_STORAGE_KEY,
                r#"{"storage_key":"cake2","blow_threshold":100}"#,
            )
            .with_item("cake2", r#"[{"left":1,"top":1},{"left":2,"top":2}]"#);
        let mut session = CakeSession::start(storage, 3);
        assert_eq!(session.settings().storage_key, "cake2");
        assert_eq!(session.store().len(), 2);

        assert!(!session.blow(80.0).blowing);
        assert!(session.blow(101.0).blowing);
    }

    proptest! {
        #[test]
        fn prop_counts_match_candle_states(
            clicks in proptest::collection::vec((0.0f64..250.0, -30.0f64..80.0), 0..20),
            energies in proptest::collection::vec(0.0f32..255.0, 0..30),
            seed in any::<u64>(),
        ) {
            let mut session = CakeSession::start(one_candle(), seed);
            for &(x, y) in &clicks {
                session.add_candle(x, y);
            }
            for &e in &energies {
                session.blow(e);
            }
            let candles = session.store().candles();
            let out = candles.iter().filter(|c| !c.lit).count();
            let hud = session.hud();
            prop_assert_eq!(candles.len(), 1 + clicks.len());
            prop_assert_eq!(hud.active_count, candles.len() - out);
            prop_assert_eq!(hud.show_message, !candles.is_empty() && out == candles.len());
        }

        #[test]
        fn prop_sub_threshold_never_extinguishes(
            energies in proptest::collection::vec(0.0f32..=40.0, 1..100),
            seed in any::<u64>(),
        ) {
            let mut session = CakeSession::start(MemoryStore::new(), seed);
            for &e in &energies {
                prop_assert!(!session.blow(e).changed());
            }
            prop_assert_eq!(session.hud().active_count, 18);
        }
    }
}
