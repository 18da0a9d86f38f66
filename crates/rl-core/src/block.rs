//! Cooldown block window
//!
//! The single fact "blocked until T" lives in three places: the durable
//! scope, the session scope and an in-memory cache. Any of them can be stale,
//! missing or unwritable, so resolution takes the first *live* value in the
//! order durable, session, cache.

use crate::storage::PreferenceStore;
use crate::types::{Millis, Scope, ScopeMask};

/// Owns the block window.
#[derive(Debug, Clone)]
pub struct BlockState {
    key: String,
    cache: Millis,
}

impl BlockState {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            cache: 0,
        }
    }

    /// Start a cooldown of `duration` from `now` and return its end.
    ///
    /// The end is written to both scopes and to the cache. Failed writes are
    /// logged; the cache keeps the block alive for this page instance.
    pub fn engage<S>(&mut self, store: &mut S, now: Millis, duration: Millis) -> Millis
    where
        S: PreferenceStore + ?Sized,
    {
        let until = now.saturating_add(duration);
        self.cache = until;

        let failed = store.write_scopes(ScopeMask::ALL, &self.key, until);
        if failed == ScopeMask::ALL {
            log::warn!("block until {until} held in memory only");
        }

        log::info!("block engaged until {until}");
        until
    }

    /// End of the active block, or 0 when not blocked.
    pub fn current_until<S>(&self, store: &S, now: Millis) -> Millis
    where
        S: PreferenceStore + ?Sized,
    {
        for scope in [Scope::Durable, Scope::Session] {
            match store.read_scoped(scope, &self.key) {
                Some(until) if until > now => {
                    log::debug!("block until {until} from {scope} scope");
                    return until;
                }
                Some(_) => log::debug!("block in {scope} scope is expired"),
                None => {}
            }
        }

        if self.cache > now {
            log::warn!("restoring block until {} from memory", self.cache);
            return self.cache;
        }

        0
    }

    pub fn is_blocked<S>(&self, store: &S, now: Millis) -> bool
    where
        S: PreferenceStore + ?Sized,
    {
        now < self.current_until(store, now)
    }
}
