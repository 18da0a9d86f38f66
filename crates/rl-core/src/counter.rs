//! Session view counter
//!
//! The counter lives in the session scope so it survives reloads within a tab
//! but not a new browsing session. A copy is kept in memory and used for any
//! field the store cannot produce, which keeps counting working for the life
//! of the page when session storage refuses writes.

use crate::storage::{PreferenceStore, StorageKeys};
use crate::types::{Millis, Scope};

/// Counter state for one viewing session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewSession {
    pub count: u32,
    pub first_view_at: Option<Millis>,
    pub last_view_at: Option<Millis>,
}

impl ViewSession {
    fn reset(&mut self, now: Millis) {
        *self = Self {
            count: 0,
            first_view_at: Some(now),
            last_view_at: Some(now),
        };
    }
}

/// Owns the session view count and its timestamps.
#[derive(Debug, Clone)]
pub struct ViewCounter {
    count_key: String,
    first_key: String,
    last_key: String,
    session: ViewSession,
}

impl ViewCounter {
    pub fn new(keys: &StorageKeys) -> Self {
        Self {
            count_key: keys.view_count.clone(),
            first_key: keys.first_view_at.clone(),
            last_key: keys.last_view_at.clone(),
            session: ViewSession::default(),
        }
    }

    /// Count one view at `now` and return the new count.
    ///
    /// A gap since the previous view longer than `inactivity_reset` starts a
    /// fresh session first, so the returned count is 1 in that case.
    pub fn register_view<S>(&mut self, store: &mut S, inactivity_reset: Millis, now: Millis) -> u32
    where
        S: PreferenceStore + ?Sized,
    {
        let mut session = self.session(&*store);

        if session.first_view_at.is_none() {
            session.first_view_at = Some(now);
        }

        match session.last_view_at {
            None => {
                log::debug!("first view in session");
                session.last_view_at = Some(now);
            }
            Some(last) if now.saturating_sub(last) > inactivity_reset => {
                log::info!("inactive for {}s, resetting", now.saturating_sub(last) / 1000);
                session.reset(now);
            }
            Some(_) => {}
        }

        session.count = session.count.saturating_add(1);
        session.last_view_at = session.last_view_at.map(|last| last.max(now));

        self.commit(store, session);
        session.count
    }

    /// Start a fresh session at `now`.
    pub fn reset<S>(&mut self, store: &mut S, now: Millis)
    where
        S: PreferenceStore + ?Sized,
    {
        let mut session = self.session;
        session.reset(now);
        self.commit(store, session);
        log::info!("counter reset");
    }

    pub fn current_count<S>(&self, store: &S) -> u32
    where
        S: PreferenceStore + ?Sized,
    {
        self.session(store).count
    }

    /// Current session state, stored values taking precedence over memory.
    ///
    /// Negative stored timestamps are treated as absent.
    pub fn session<S>(&self, store: &S) -> ViewSession
    where
        S: PreferenceStore + ?Sized,
    {
        let count = store
            .read_scoped(Scope::Session, &self.count_key)
            .map(|n| u32::try_from(n.max(0)).unwrap_or(u32::MAX))
            .unwrap_or(self.session.count);

        ViewSession {
            count,
            first_view_at: store
                .read_scoped(Scope::Session, &self.first_key)
                .filter(|at| *at >= 0)
                .or(self.session.first_view_at),
            last_view_at: store
                .read_scoped(Scope::Session, &self.last_key)
                .filter(|at| *at >= 0)
                .or(self.session.last_view_at),
        }
    }

    fn commit<S>(&mut self, store: &mut S, session: ViewSession)
    where
        S: PreferenceStore + ?Sized,
    {
        self.session = session;

        let mut writes = vec![(&self.count_key, i64::from(session.count))];
        if let Some(first) = session.first_view_at {
            writes.push((&self.first_key, first));
        }
        if let Some(last) = session.last_view_at {
            writes.push((&self.last_key, last));
        }

        for (key, value) in writes {
            if let Err(e) = store.write_scoped(Scope::Session, key, value) {
                log::warn!("counter kept in memory: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::types::ScopeMask;

    const MINUTE: Millis = 60_000;

    fn counter() -> (ViewCounter, MemoryStore, StorageKeys) {
        let keys = StorageKeys::with_prefix("t.");
        (ViewCounter::new(&keys), MemoryStore::new(), keys)
    }

    #[test]
    fn test_counts_sequential_views() {
        let (mut counter, mut store, _) = counter();
        for i in 1..=5u32 {
            let now = i64::from(i) * MINUTE;
            assert_eq!(counter.register_view(&mut store, 10 * MINUTE, now), i);
        }
        assert_eq!(counter.current_count(&store), 5);
    }

    #[test]
    fn test_first_view_sets_timestamps() {
        let (mut counter, mut store, keys) = counter();
        counter.register_view(&mut store, 10 * MINUTE, 1_234);

        let session = counter.session(&store);
        assert_eq!(session.first_view_at, Some(1_234));
        assert_eq!(session.last_view_at, Some(1_234));
        assert_eq!(store.read_scoped(Scope::Session, &keys.view_count), Some(1));
        assert_eq!(store.read_scoped(Scope::Session, &keys.first_view_at), Some(1_234));
    }

    #[test]
    fn test_inactivity_gap_resets_to_one() {
        let (mut counter, mut store, _) = counter();
        counter.register_view(&mut store, 10 * MINUTE, 0);
        counter.register_view(&mut store, 10 * MINUTE, MINUTE);
        counter.register_view(&mut store, 10 * MINUTE, 2 * MINUTE);

        let later = 2 * MINUTE + 10 * MINUTE + 1;
        assert_eq!(counter.register_view(&mut store, 10 * MINUTE, later), 1);

        let session = counter.session(&store);
        assert_eq!(session.first_view_at, Some(later));
        assert_eq!(session.last_view_at, Some(later));
    }

    #[test]
    fn test_gap_equal_to_threshold_does_not_reset() {
        let (mut counter, mut store, _) = counter();
        counter.register_view(&mut store, 10 * MINUTE, 0);
        assert_eq!(counter.register_view(&mut store, 10 * MINUTE, 10 * MINUTE), 2);
    }

    #[test]
    fn test_first_view_at_kept_across_views() {
        let (mut counter, mut store, _) = counter();
        counter.register_view(&mut store, 10 * MINUTE, 100);
        counter.register_view(&mut store, 10 * MINUTE, 200);
        assert_eq!(counter.session(&store).first_view_at, Some(100));
        assert_eq!(counter.session(&store).last_view_at, Some(200));
    }

    #[test]
    fn test_last_view_at_never_moves_backwards() {
        let (mut counter, mut store, _) = counter();
        counter.register_view(&mut store, 10 * MINUTE, 5_000);
        counter.register_view(&mut store, 10 * MINUTE, 4_000);
        assert_eq!(counter.session(&store).last_view_at, Some(5_000));
        assert_eq!(counter.current_count(&store), 2);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let (mut counter, mut store, _) = counter();
        counter.register_view(&mut store, 10 * MINUTE, 0);
        counter.register_view(&mut store, 10 * MINUTE, 1);

        counter.reset(&mut store, 50);
        let once = counter.session(&store);
        counter.reset(&mut store, 50);
        assert_eq!(counter.session(&store), once);
        assert_eq!(
            once,
            ViewSession {
                count: 0,
                first_view_at: Some(50),
                last_view_at: Some(50),
            }
        );
    }

    #[test]
    fn test_resumes_from_stored_session() {
        let (_, mut store, keys) = counter();
        store.insert_raw(Scope::Session, &keys.view_count, "7");
        store.insert_raw(Scope::Session, &keys.first_view_at, "100");
        store.insert_raw(Scope::Session, &keys.last_view_at, "200");

        let mut counter = ViewCounter::new(&keys);
        assert_eq!(counter.register_view(&mut store, 10 * MINUTE, 300), 8);
    }

    #[test]
    fn test_malformed_count_treated_as_zero() {
        let (_, mut store, keys) = counter();
        store.insert_raw(Scope::Session, &keys.view_count, "not-a-number");
        store.insert_raw(Scope::Session, &keys.last_view_at, "100");

        let mut counter = ViewCounter::new(&keys);
        assert_eq!(counter.register_view(&mut store, 10 * MINUTE, 200), 1);
    }

    #[test]
    fn test_negative_count_clamped() {
        let (_, mut store, keys) = counter();
        store.insert_raw(Scope::Session, &keys.view_count, "-4");
        let counter = ViewCounter::new(&keys);
        assert_eq!(counter.current_count(&store), 0);
    }

    #[test]
    fn test_extreme_stored_timestamps_do_not_overflow() {
        let (_, mut store, keys) = counter();
        store.insert_raw(Scope::Session, &keys.view_count, "3");
        store.insert_raw(Scope::Session, &keys.last_view_at, "-9223372036854775807");

        let mut counter = ViewCounter::new(&keys);
        assert_eq!(counter.register_view(&mut store, 10 * MINUTE, 200), 4);
        assert_eq!(counter.session(&store).last_view_at, Some(200));

        store.insert_raw(Scope::Session, &keys.last_view_at, "9223372036854775807");
        assert_eq!(counter.register_view(&mut store, 10 * MINUTE, 300), 5);

        counter.reset(&mut store, 400);
        assert_eq!(counter.register_view(&mut store, 10 * MINUTE, Millis::MAX), 1);
    }

    #[test]
    fn test_counts_in_memory_when_writes_denied() {
        let (mut counter, mut store, _) = counter();
        store.deny_writes(ScopeMask::SESSION);
        assert_eq!(counter.register_view(&mut store, 10 * MINUTE, 0), 1);
        assert_eq!(counter.register_view(&mut store, 10 * MINUTE, 1), 2);
        assert_eq!(counter.register_view(&mut store, 10 * MINUTE, 2), 3);
    }
}
