//! Browser bindings (wasm32 only)

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AnalyserNode, AudioContext, Document, Element, HtmlElement, MediaStream};

use crate::audio::{EnergySource, mean_energy};
use crate::cake::Candle;
use crate::error::{CakeError, CakeResult};
use crate::ui::{HudView, SurfaceRect};

/// Live microphone analyser
pub struct MicAnalyser {
    // Kept alive for as long as we sample
    _ctx: AudioContext,
    analyser: AnalyserNode,
    bins: Vec<u8>,
}

impl MicAnalyser {
    /// Wire `stream` into an analyser with the given FFT window
    pub fn new(stream: &MediaStream, fft_size: u32) -> CakeResult<Self> {
        let ctx = AudioContext::new().map_err(js_err(CakeError::Microphone))?;
        let analyser = ctx.create_analyser().map_err(js_err(CakeError::Microphone))?;
        let source = ctx
            .create_media_stream_source(stream)
            .map_err(js_err(CakeError::Microphone))?;
        source
            .connect_with_audio_node(&analyser)
            .map_err(js_err(CakeError::Microphone))?;
        analyser.set_fft_size(fft_size);

        let bins = vec![0u8; analyser.frequency_bin_count() as usize];
        Ok(Self {
            _ctx: ctx,
            analyser,
            bins,
        })
    }
}

impl EnergySource for MicAnalyser {
    fn mean_energy(&mut self) -> f32 {
        self.analyser.get_byte_frequency_data(&mut self.bins);
        mean_energy(&self.bins)
    }
}

/// Ask for the microphone. Resolves once: to a stream, or to why not.
pub async fn request_microphone() -> CakeResult<MediaStream> {
    let window = web_sys::window().ok_or_else(|| CakeError::unsupported("no window"))?;
    let devices = window
        .navigator()
        .media_devices()
        .map_err(|_| CakeError::unsupported("getUserMedia not supported on your browser!"))?;

    let constraints = web_sys::MediaStreamConstraints::new();
    constraints.set_audio(&JsValue::TRUE);
    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(js_err(CakeError::Unsupported))?;

    let stream = JsFuture::from(promise)
        .await
        .map_err(js_err(CakeError::Microphone))?;
    stream
        .dyn_into::<MediaStream>()
        .map_err(|_| CakeError::microphone("getUserMedia did not return a MediaStream"))
}

/// Repeating browser timer, cleared on `stop` or drop
pub struct Interval {
    handle: Option<i32>,
    _closure: Closure<dyn FnMut()>,
}

impl Interval {
    pub fn start(period_ms: u32, callback: impl FnMut() + 'static) -> CakeResult<Self> {
        let window = web_sys::window().ok_or_else(|| CakeError::unsupported("no window"))?;
        let closure = Closure::<dyn FnMut()>::new(callback);
        let handle = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                period_ms as i32,
            )
            .map_err(js_err(CakeError::Unsupported))?;
        Ok(Self {
            handle: Some(handle),
            _closure: closure,
        })
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn stop(&mut self) {
        if let (Some(handle), Some(window)) = (self.handle.take(), web_sys::window()) {
            window.clear_interval_with_handle(handle);
        }
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Bounding box origin of an element
pub fn surface_rect(el: &Element) -> SurfaceRect {
    let rect = el.get_bounding_client_rect();
    SurfaceRect {
        left: rect.left(),
        top: rect.top(),
    }
}

/// Append a candle (with its flame) to the cake element
pub fn append_candle(document: &Document, cake: &Element, candle: &Candle) -> CakeResult<()> {
    let el: HtmlElement = document
        .create_element("div")
        .map_err(js_err(CakeError::Unsupported))?
        .dyn_into()
        .map_err(|_| CakeError::unsupported("div is not an HtmlElement"))?;
    el.set_class_name(if candle.lit { "candle" } else { "candle out" });
    let style = el.style();
    style
        .set_property("left", &format!("{}px", candle.left))
        .map_err(js_err(CakeError::Unsupported))?;
    style
        .set_property("top", &format!("{}px", candle.top))
        .map_err(js_err(CakeError::Unsupported))?;

    let flame = document
        .create_element("div")
        .map_err(js_err(CakeError::Unsupported))?;
    flame.set_class_name("flame");
    el.append_child(&flame).map_err(js_err(CakeError::Unsupported))?;
    cake.append_child(&el).map_err(js_err(CakeError::Unsupported))?;
    Ok(())
}

/// Mark the candle elements whose candles are out
pub fn sync_candles<'a>(cake: &Element, candles: impl IntoIterator<Item = &'a Candle>) {
    let elements = cake.get_elements_by_class_name("candle");
    for (i, candle) in candles.into_iter().enumerate() {
        if candle.lit {
            continue;
        }
        if let Some(el) = elements.item(i as u32) {
            let _ = el.class_list().add_1("out");
        }
    }
}

/// Write the count and toggle the end-of-session message
pub fn render_hud(document: &Document, hud: HudView) {
    if let Some(el) = document.get_element_by_id("candleCount") {
        el.set_text_content(Some(&hud.active_count.to_string()));
    }
    if let Some(el) = document.get_element_by_id("message-container") {
        let classes = el.class_list();
        let _ = if hud.show_message {
            classes.add_1("show")
        } else {
            classes.remove_1("show")
        };
    }
}

fn js_err(make: fn(String) -> CakeError) -> impl Fn(JsValue) -> CakeError {
    move |e| make(format!("{:?}", e))
}
