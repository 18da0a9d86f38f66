//! WebAssembly bindings for the reel limiter
//!
//! The user script owns one `ReelLimiter`, feeds it `location.href` from a
//! `MutationObserver` callback, forwards `visibilitychange`, and calls
//! `tick()` from a one-second interval.

use js_sys::Object;
use rl_core::{
    display, Clock, LimiterConfig, LimiterStatus, Millis, SessionController, Transition,
};
use wasm_bindgen::prelude::*;

pub mod logger;
pub mod presenter;
pub mod storage;

use presenter::JsPresenter;
use storage::WebStorage;

/// `Date.now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsClock;

impl Clock for JsClock {
    fn now(&self) -> Millis {
        js_sys::Date::now() as Millis
    }
}

#[wasm_bindgen]
pub struct ReelLimiter {
    inner: SessionController<WebStorage, JsClock, JsPresenter>,
}

#[wasm_bindgen]
impl ReelLimiter {
    /// `config` may be `undefined` for defaults or a partial config object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, presenter: Object) -> Result<ReelLimiter, JsValue> {
        logger::init();

        let config = parse_config(&config)?;
        let inner = SessionController::new(
            config,
            WebStorage::from_window(),
            JsClock,
            JsPresenter::new(presenter),
        )
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(ReelLimiter { inner })
    }

    /// Eager check for the URL the page loaded at.
    pub fn start(&mut self, url: &str) -> JsValue {
        transition_to_js(self.inner.start(url))
    }

    pub fn on_url_observed(&mut self, url: &str) -> JsValue {
        transition_to_js(self.inner.on_url_observed(url))
    }

    pub fn on_visibility_change(&mut self, visible: bool) -> bool {
        self.inner.on_visibility_change(visible)
    }

    pub fn tick(&mut self) {
        self.inner.tick();
    }

    pub fn is_blocked(&self) -> bool {
        self.inner.status().blocked
    }

    pub fn status(&self) -> JsValue {
        status_to_js(&self.inner.status())
    }
}

#[wasm_bindgen]
pub fn set_log_level(level: &str) {
    logger::set_level(logger::parse_level(level));
}

#[wasm_bindgen]
pub fn format_countdown(remaining_ms: f64) -> String {
    display::format_countdown(remaining_ms as Millis)
}

#[wasm_bindgen]
pub fn format_elapsed(elapsed_ms: f64) -> String {
    display::format_elapsed(elapsed_ms as Millis)
}

#[wasm_bindgen]
pub fn progress_percent(current: u32, max: u32) -> u8 {
    display::progress_percent(current, max)
}

fn parse_config(value: &JsValue) -> Result<LimiterConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(LimiterConfig::default());
    }

    let text: String = js_sys::JSON::stringify(value)
        .map_err(|_| JsValue::from_str("Config must be a plain object"))?
        .into();

    LimiterConfig::from_json(&text).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn transition_to_js(transition: Option<Transition>) -> JsValue {
    let transition = match transition {
        Some(transition) => transition,
        None => return JsValue::UNDEFINED,
    };

    let result = Object::new();
    match transition {
        Transition::Counted { count, max } => {
            set(&result, "kind", JsValue::from_str("counted"));
            set(&result, "count", JsValue::from(count));
            set(&result, "max", JsValue::from(max));
        }
        Transition::BlockEngaged { until } => {
            set(&result, "kind", JsValue::from_str("blockEngaged"));
            set(&result, "until", JsValue::from_f64(until as f64));
        }
        Transition::StillBlocked { until } => {
            set(&result, "kind", JsValue::from_str("stillBlocked"));
            set(&result, "until", JsValue::from_f64(until as f64));
        }
        Transition::LeftScope => {
            set(&result, "kind", JsValue::from_str("leftScope"));
        }
    }
    result.into()
}

fn status_to_js(status: &LimiterStatus) -> JsValue {
    let result = Object::new();
    set(&result, "count", JsValue::from(status.count));
    set(&result, "max", JsValue::from(status.max));
    set(&result, "blocked", JsValue::from(status.blocked));
    set(&result, "blockedUntil", JsValue::from_f64(status.blocked_until as f64));
    set(&result, "remainingMs", JsValue::from_f64(status.remaining_ms as f64));
    set(&result, "elapsedMs", JsValue::from_f64(status.elapsed_ms as f64));
    result.into()
}

fn set(target: &Object, key: &str, value: JsValue) {
    let _ = js_sys::Reflect::set(target, &key.into(), &value);
}
