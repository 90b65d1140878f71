//! Virtual Cake entry point
//!
//! Wires the cake session into the page on web. The native build runs a
//! short scripted session against in-memory storage.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_cake {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, MouseEvent};

    use virtual_cake::persistence::{KeyValueStore, LocalStore, MemoryStore};
    use virtual_cake::platform::web::{
        Interval, MicAnalyser, append_candle, render_hud, request_microphone, surface_rect,
        sync_candles,
    };
    use virtual_cake::CakeSession;

    type Session = CakeSession<Box<dyn KeyValueStore>>;

    thread_local! {
        /// Sampling timer, kept until the page goes away or `stop_listening` runs
        static TICKER: RefCell<Option<Interval>> = const { RefCell::new(None) };
        static SESSION: RefCell<Option<Rc<RefCell<Session>>>> = const { RefCell::new(None) };
    }

    fn open_storage() -> Box<dyn KeyValueStore> {
        match LocalStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("{} - candles will not survive a reload", e);
                Box::new(MemoryStore::new())
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Virtual Cake starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let cake = document
            .query_selector(".cake")
            .ok()
            .flatten()
            .expect("no .cake element");

        let seed = js_sys::Date::now() as u64;
        let session = Rc::new(RefCell::new(CakeSession::start(open_storage(), seed)));

        {
            let s = session.borrow();
            for candle in s.store().candles() {
                if let Err(e) = append_candle(&document, &cake, candle) {
                    log::error!("Could not draw candle: {}", e);
                }
            }
            render_hud(&document, s.hud());
        }

        setup_click_handler(&document, &cake, session.clone());
        SESSION.with(|slot| *slot.borrow_mut() = Some(session.clone()));

        let fft_size = session.borrow().settings().fft_size;
        let period = session.borrow().settings().tick_interval_ms;
        match request_microphone()
            .await
            .and_then(|stream| MicAnalyser::new(&stream, fft_size))
        {
            Ok(analyser) => {
                session.borrow_mut().attach_microphone(Box::new(analyser));
                start_ticker(document, cake, session, period);
            }
            Err(e) => session.borrow_mut().microphone_unavailable(&e),
        }
    }

    fn setup_click_handler(document: &Document, cake: &Element, session: Rc<RefCell<Session>>) {
        let document = document.clone();
        let cake_clone = cake.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let mut s = session.borrow_mut();
            let (index, hud) = s.handle_click(
                event.client_x() as f64,
                event.client_y() as f64,
                surface_rect(&cake_clone),
            );
            if let Some(candle) = s.store().candles().get(index) {
                if let Err(e) = append_candle(&document, &cake_clone, candle) {
                    log::error!("Could not draw candle: {}", e);
                }
            }
            render_hud(&document, hud);
        });
        let _ = cake.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn start_ticker(
        document: Document,
        cake: Element,
        session: Rc<RefCell<Session>>,
        period_ms: u32,
    ) {
        let tick = move || {
            let mut s = session.borrow_mut();
            if let Some(hud) = s.on_tick() {
                sync_candles(&cake, s.store().candles());
                render_hud(&document, hud);
            }
        };
        match Interval::start(period_ms, tick) {
            Ok(interval) => TICKER.with(|slot| *slot.borrow_mut() = Some(interval)),
            Err(e) => log::error!("Could not start blow detector: {}", e),
        }
    }

    /// Tear down the sampling timer and release the microphone
    pub fn stop() {
        TICKER.with(|slot| {
            if let Some(mut interval) = slot.borrow_mut().take() {
                interval.stop();
            }
        });
        SESSION.with(|slot| {
            if let Some(session) = slot.borrow().as_ref() {
                session.borrow_mut().stop_listening();
            }
        });
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_cake::run().await;
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn stop_listening() {
    wasm_cake::stop();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use virtual_cake::consts::CANDLE_STORAGE_KEY;
    use virtual_cake::{CakeSession, EnergySource, KeyValueStore, MemoryStore, SurfaceRect};

    /// Quiet room, then a long breath
    struct Breath {
        ticks: u32,
    }

    impl EnergySource for Breath {
        fn mean_energy(&mut self) -> f32 {
            self.ticks += 1;
            if self.ticks <= 5 { 12.0 } else { 85.0 }
        }
    }

    env_logger::init();
    log::info!("Virtual Cake (native) starting...");
    log::info!("The interactive cake needs a browser - run with `trunk serve` for the web version");

    let mut session = CakeSession::start(MemoryStore::new(), 18);
    println!("Loaded {} candles", session.store().len());

    let surface = SurfaceRect {
        left: 100.0,
        top: 200.0,
    };
    let (_, hud) = session.handle_click(160.0, 230.0, surface);
    println!("Clicked a candle in: {} lit", hud.active_count);

    session.attach_microphone(Box::new(Breath { ticks: 0 }));
    let mut ticks = 0;
    while !session.hud().show_message && ticks < 1000 {
        ticks += 1;
        if let Some(hud) = session.on_tick() {
            println!("tick {:>3}: {} lit", ticks, hud.active_count);
        }
    }
    session.stop_listening();

    let stored = session
        .store()
        .storage()
        .get(CANDLE_STORAGE_KEY)
        .ok()
        .flatten()
        .unwrap_or_default();
    println!("Persisted layout: {}", stored);

    println!("✓ All candles out after {} ticks", ticks);
}
