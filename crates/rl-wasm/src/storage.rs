//! `sessionStorage` / `localStorage` backed preference store.

use rl_core::{PreferenceStore, Scope, StorageError};
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// Browser storage for both scopes. A scope whose storage object could not be
/// obtained (sandboxed iframe, privacy mode) reports every access as
/// unavailable, which the core treats as absent / kept in memory.
pub struct WebStorage {
    session: Option<Storage>,
    durable: Option<Storage>,
}

impl WebStorage {
    pub fn from_window() -> Self {
        let window = web_sys::window();
        let session = window
            .as_ref()
            .and_then(|w| w.session_storage().ok().flatten());
        let durable = window
            .as_ref()
            .and_then(|w| w.local_storage().ok().flatten());

        if session.is_none() {
            log::warn!("sessionStorage unavailable");
        }
        if durable.is_none() {
            log::warn!("localStorage unavailable");
        }

        Self { session, durable }
    }

    fn storage(&self, scope: Scope) -> Result<&Storage, StorageError> {
        let storage = match scope {
            Scope::Session => self.session.as_ref(),
            Scope::Durable => self.durable.as_ref(),
        };
        storage.ok_or_else(|| StorageError::Unavailable(format!("no {scope} storage")))
    }
}

impl PreferenceStore for WebStorage {
    fn read_raw(&self, scope: Scope, key: &str) -> Result<Option<String>, StorageError> {
        self.storage(scope)?
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(describe(&e)))
    }

    fn write_raw(&mut self, scope: Scope, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage(scope)?
            .set_item(key, value)
            .map_err(|e| classify_write_error(&e, scope, key))
    }
}

fn classify_write_error(err: &JsValue, scope: Scope, key: &str) -> StorageError {
    let name = js_sys::Reflect::get(err, &"name".into())
        .ok()
        .and_then(|value| value.as_string())
        .unwrap_or_default();

    match name.as_str() {
        "QuotaExceededError" => StorageError::QuotaExceeded {
            scope,
            key: key.to_string(),
        },
        "SecurityError" => StorageError::Denied {
            scope,
            key: key.to_string(),
        },
        _ => StorageError::Unavailable(describe(err)),
    }
}

fn describe(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            js_sys::Reflect::get(err, &"message".into())
                .ok()
                .and_then(|value| value.as_string())
        })
        .unwrap_or_else(|| "unknown storage error".to_string())
}
