//! Browser tests. Run with `wasm-pack test --headless --chrome crates/rl-wasm`.

#![cfg(target_arch = "wasm32")]

use js_sys::{Function, Object, Reflect};
use rl_core::{PreferenceStore, Scope};
use rl_wasm::storage::WebStorage;
use rl_wasm::{format_countdown, set_log_level, ReelLimiter};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn clear_storage() {
    let window = web_sys::window().unwrap();
    window.session_storage().unwrap().unwrap().clear().unwrap();
    window.local_storage().unwrap().unwrap().clear().unwrap();
}

fn noop_presenter() -> Object {
    let presenter = Object::new();
    for name in ["renderBlockOverlay", "clearOverlay", "renderProgress", "removeProgress", "stopAllMedia"] {
        Reflect::set(&presenter, &name.into(), &Function::new_no_args("")).unwrap();
    }
    presenter
}

fn kind(result: &JsValue) -> Option<String> {
    Reflect::get(result, &"kind".into()).ok()?.as_string()
}

#[wasm_bindgen_test]
fn test_web_storage_round_trip() {
    clear_storage();
    let mut store = WebStorage::from_window();
    store.write_scoped(Scope::Durable, "rl.test", 42).unwrap();
    assert_eq!(store.read_scoped(Scope::Durable, "rl.test"), Some(42));
    assert_eq!(store.read_scoped(Scope::Session, "rl.test"), None);
}

#[wasm_bindgen_test]
fn test_limiter_blocks_after_limit() {
    clear_storage();
    let config = Object::new();
    Reflect::set(&config, &"maxViewsPerSession".into(), &JsValue::from(1)).unwrap();

    let mut limiter = ReelLimiter::new(config.into(), noop_presenter()).unwrap();
    let first = limiter.on_url_observed("https://x/reel/a");
    assert_eq!(kind(&first).as_deref(), Some("counted"));

    let second = limiter.on_url_observed("https://x/reel/b");
    assert_eq!(kind(&second).as_deref(), Some("blockEngaged"));
    assert!(limiter.is_blocked());

    assert!(limiter.on_url_observed("https://x/reel/b").is_undefined());
}

#[wasm_bindgen_test]
fn test_presenter_without_callbacks() {
    clear_storage();
    let mut limiter = ReelLimiter::new(JsValue::UNDEFINED, Object::new()).unwrap();
    let result = limiter.start("https://x/reel/a");
    assert_eq!(kind(&result).as_deref(), Some("counted"));
}

#[wasm_bindgen_test]
fn test_invalid_config_throws() {
    let config = Object::new();
    Reflect::set(&config, &"blockDurationMs".into(), &JsValue::from(0)).unwrap();
    assert!(ReelLimiter::new(config.into(), noop_presenter()).is_err());
}

#[wasm_bindgen_test]
fn test_log_level_kept_across_construction() {
    clear_storage();
    set_log_level("warn");
    let _limiter = ReelLimiter::new(JsValue::UNDEFINED, noop_presenter()).unwrap();
    assert_eq!(log::max_level(), log::LevelFilter::Warn);
    set_log_level("info");
}

#[wasm_bindgen_test]
fn test_format_countdown_export() {
    assert_eq!(format_countdown(61_000.0), "1:01");
}
