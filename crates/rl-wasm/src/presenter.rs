//! Presenter that forwards to JS callbacks.
//!
//! The user script passes an object such as
//!
//! ```js
//! {
//!   renderBlockOverlay(until) {},
//!   clearOverlay() {},
//!   renderProgress(current, max, elapsedMs) {},
//!   removeProgress() {},
//!   stopAllMedia() {},
//! }
//! ```
//!
//! Missing callbacks are skipped. A callback that throws is logged and
//! otherwise ignored so presentation bugs never break counting.

use js_sys::{Function, Object, Reflect};
use rl_core::{Millis, Presenter};
use wasm_bindgen::{JsCast, JsValue};

pub struct JsPresenter {
    callbacks: Object,
}

impl JsPresenter {
    pub fn new(callbacks: Object) -> Self {
        Self { callbacks }
    }

    fn callback(&self, name: &str) -> Option<Function> {
        Reflect::get(&self.callbacks, &name.into())
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok())
    }

    fn invoke(&self, name: &str, args: &[JsValue]) {
        let func = match self.callback(name) {
            Some(func) => func,
            None => {
                log::debug!("presenter has no {name}");
                return;
            }
        };

        let this: &JsValue = self.callbacks.as_ref();
        let result = match args {
            [] => func.call0(this),
            [a] => func.call1(this, a),
            [a, b] => func.call2(this, a, b),
            [a, b, c, ..] => func.call3(this, a, b, c),
        };

        if let Err(e) = result {
            log::error!("presenter {name} threw: {e:?}");
        }
    }
}

impl Presenter for JsPresenter {
    fn render_block_overlay(&mut self, until: Millis) {
        self.invoke("renderBlockOverlay", &[JsValue::from_f64(until as f64)]);
    }

    fn clear_overlay(&mut self) {
        self.invoke("clearOverlay", &[]);
    }

    fn render_progress(&mut self, current: u32, max: u32, elapsed_since_first_view: Millis) {
        self.invoke(
            "renderProgress",
            &[
                JsValue::from(current),
                JsValue::from(max),
                JsValue::from_f64(elapsed_since_first_view as f64),
            ],
        );
    }

    fn remove_progress(&mut self) {
        self.invoke("removeProgress", &[]);
    }

    fn stop_all_media(&mut self) {
        self.invoke("stopAllMedia", &[]);
    }
}
