//! Reel Limiter Core Library
//!
//! This crate provides the view-session state machine behind the reel limiter:
//! it counts distinct short-video views in a single-page application, engages a
//! cooldown block once a per-session threshold is exceeded, and keeps that
//! state consistent across a tab-local and a browser-wide storage scope.
//!
//! # Architecture
//!
//! Everything is synchronous and single-threaded. The host environment (a
//! browser via `rl-wasm`, or the replay tool in `rl-cli`) supplies a [`Clock`],
//! a [`PreferenceStore`] and a [`Presenter`], then feeds location-change events
//! into one [`SessionController`]. No operation here can fail in a way the host
//! has to handle: storage problems degrade to in-memory state.
//!
//! # Modules
//!
//! - `clock`: time sources (system, manual)
//! - `storage`: two-scope key/value persistence and an in-memory store
//! - `block`: cooldown window reconciled across scopes
//! - `counter`: session view counter with inactivity reset
//! - `navigation`: SPA location watcher with duplicate suppression
//! - `controller`: the state machine tying the above together
//! - `config`: limiter configuration
//! - `display`: formatting helpers for presenters
//! - `url`: allocation-free URL slicing
//! - `types`: shared type definitions

pub mod block;
pub mod clock;
pub mod config;
pub mod controller;
pub mod counter;
pub mod display;
pub mod error;
pub mod navigation;
pub mod storage;
pub mod types;
pub mod url;

// Re-export commonly used types
pub use block::BlockState;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::LimiterConfig;
pub use controller::{Presenter, SessionController};
pub use counter::ViewCounter;
pub use error::{ConfigError, StorageError};
pub use navigation::{NavigationSignal, NavigationWatcher};
pub use storage::{MemoryStore, PreferenceStore, StorageKeys};
pub use types::{LimiterState, LimiterStatus, Millis, Scope, ScopeMask, Transition};
