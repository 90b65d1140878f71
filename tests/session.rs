//! Full page lifecycle against in-memory storage: load, click, blow, reload.

use virtual_cake::cake::{HEART_LAYOUT, PersistedLayout};
use virtual_cake::consts::CANDLE_STORAGE_KEY;
use virtual_cake::{
    CakeSession, DetectorState, EnergySource, HudView, KeyValueStore, MemoryStore, SurfaceRect,
};

struct Loud;

impl EnergySource for Loud {
    fn mean_energy(&mut self) -> f32 {
        180.0
    }
}

/// Hand the storage of a finished session to a new one, like a page reload
fn reload(session: CakeSession<MemoryStore>, seed: u64) -> CakeSession<MemoryStore> {
    let storage = session.store().storage().clone();
    CakeSession::start(storage, seed)
}

#[test]
fn test_first_visit_gets_heart() {
    let session = CakeSession::start(MemoryStore::new(), 1);
    let positions: Vec<(f64, f64)> = session
        .store()
        .candles()
        .iter()
        .map(|c| (c.left, c.top))
        .collect();
    assert_eq!(positions, HEART_LAYOUT.to_vec());
    assert_eq!(
        session.hud(),
        HudView {
            active_count: 18,
            show_message: false
        }
    );
}

#[test]
fn test_clicked_candle_survives_reload() {
    let mut session = CakeSession::start(MemoryStore::new(), 1);
    let surface = SurfaceRect {
        left: 40.0,
        top: 320.0,
    };
    session.handle_click(117.5, 345.0, surface);

    let session = reload(session, 2);
    assert_eq!(session.store().len(), 19);
    let last = session.store().candles().get(18).unwrap();
    assert_eq!((last.left, last.top), (77.5, 25.0));
    assert!(last.lit);
}

#[test]
fn test_blown_out_candles_relight_on_reload() {
    // Lit/out state is not persisted, so a reload brings every flame back
    let mut session = CakeSession::start(MemoryStore::new(), 7);
    session.attach_microphone(Box::new(Loud));
    assert_eq!(session.detector().state(), DetectorState::Listening);

    let mut ticks = 0;
    while !session.hud().show_message {
        session.on_tick();
        ticks += 1;
        assert!(ticks < 500, "candles never went out");
    }
    assert_eq!(session.hud().active_count, 0);

    let stored = session
        .store()
        .storage()
        .get(CANDLE_STORAGE_KEY)
        .unwrap()
        .unwrap();
    assert_eq!(
        PersistedLayout::from_json(&stored).unwrap(),
        PersistedLayout::heart()
    );

    let session = reload(session, 8);
    assert_eq!(
        session.hud(),
        HudView {
            active_count: 18,
            show_message: false
        }
    );
}

#[test]
fn test_stored_layout_is_used_verbatim() {
    let storage = MemoryStore::new().with_item(
        CANDLE_STORAGE_KEY,
        r#"[{"left":10,"top":5},{"left":-3.5,"top":70}]"#,
    );
    let session = CakeSession::start(storage, 1);
    let candles: Vec<_> = session.store().candles().iter().copied().collect();
    assert_eq!(candles.len(), 2);
    assert_eq!((candles[0].left, candles[0].top), (10.0, 5.0));
    assert_eq!((candles[1].left, candles[1].top), (-3.5, 70.0));
    assert!(candles.iter().all(|c| c.lit));
}
