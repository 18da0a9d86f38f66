//! Session controller
//!
//! The state machine proper. There are two externally meaningful states,
//! `Counting` and `Blocked`, and neither is stored: both are derived from the
//! block window and the view counter each time they are needed, so a block
//! written by another tab takes effect here on the next event.
//!
//! # Events
//!
//! - location change (`start`, `on_url_observed`): filtered through the
//!   [`NavigationWatcher`], then counted or refused
//! - visibility change: stops media if the page comes back while blocked
//! - tick (about once per second): re-renders countdown and elapsed time and
//!   notices block expiry; never touches the counter or the block window
//!
//! Events must be delivered in the order the host observed them. Counting
//! depends on strictly sequential application.

use crate::block::BlockState;
use crate::clock::Clock;
use crate::config::LimiterConfig;
use crate::counter::ViewCounter;
use crate::error::ConfigError;
use crate::navigation::{NavigationSignal, NavigationWatcher};
use crate::storage::PreferenceStore;
use crate::types::{LimiterState, LimiterStatus, Millis, Transition};

// =============================================================================
// Presenter
// =============================================================================

/// Presentation collaborator. The controller calls these and never touches
/// the page itself.
///
/// Render calls repeat on every tick, so implementations should update in
/// place rather than stack new elements.
pub trait Presenter {
    /// Show (or refresh) the block overlay for a cooldown ending at `until`.
    fn render_block_overlay(&mut self, until: Millis);
    fn clear_overlay(&mut self);
    /// Show (or refresh) the progress widget.
    fn render_progress(&mut self, current: u32, max: u32, elapsed_since_first_view: Millis);
    fn remove_progress(&mut self);
    /// Pause and silence every audio/video element on the page.
    fn stop_all_media(&mut self);
}

impl<P: Presenter + ?Sized> Presenter for &mut P {
    fn render_block_overlay(&mut self, until: Millis) {
        (**self).render_block_overlay(until)
    }

    fn clear_overlay(&mut self) {
        (**self).clear_overlay()
    }

    fn render_progress(&mut self, current: u32, max: u32, elapsed_since_first_view: Millis) {
        (**self).render_progress(current, max, elapsed_since_first_view)
    }

    fn remove_progress(&mut self) {
        (**self).remove_progress()
    }

    fn stop_all_media(&mut self) {
        (**self).stop_all_media()
    }
}

// =============================================================================
// Controller
// =============================================================================

/// Owns every piece of limiter state for one page instance.
pub struct SessionController<S, C, P> {
    config: LimiterConfig,
    store: S,
    clock: C,
    presenter: P,
    block: BlockState,
    counter: ViewCounter,
    watcher: NavigationWatcher,
    /// Cooldown end currently shown by the presenter
    overlay_until: Option<Millis>,
    progress_shown: bool,
}

impl<S, C, P> SessionController<S, C, P>
where
    S: PreferenceStore,
    C: Clock,
    P: Presenter,
{
    pub fn new(config: LimiterConfig, store: S, clock: C, presenter: P) -> Result<Self, ConfigError> {
        config.validate()?;

        let keys = config.storage_keys();
        Ok(Self {
            block: BlockState::new(keys.block_until.clone()),
            counter: ViewCounter::new(&keys),
            watcher: NavigationWatcher::new(&config.content_segment),
            config,
            store,
            clock,
            presenter,
            overlay_until: None,
            progress_shown: false,
        })
    }

    /// Process the location the page loaded at.
    pub fn start(&mut self, url: &str) -> Option<Transition> {
        let signal = self.watcher.start(url)?;
        Some(self.apply(signal))
    }

    /// Process a URL reported by the host's observation mechanism.
    pub fn on_url_observed(&mut self, url: &str) -> Option<Transition> {
        let signal = self.watcher.on_url_observed(url)?;
        Some(self.apply(signal))
    }

    fn apply(&mut self, signal: NavigationSignal) -> Transition {
        match signal {
            NavigationSignal::Entered(content_id) => self.enter_content(&content_id),
            NavigationSignal::LeftScope => {
                self.presenter.remove_progress();
                self.progress_shown = false;
                Transition::LeftScope
            }
        }
    }

    fn enter_content(&mut self, content_id: &str) -> Transition {
        let now = self.clock.now();

        let until = self.block.current_until(&self.store, now);
        if now < until {
            log::info!("blocked, not counting {content_id}");
            self.show_block(until);
            return Transition::StillBlocked { until };
        }

        let max = self.config.max_views_per_session;
        let count = self
            .counter
            .register_view(&mut self.store, self.config.inactivity_reset_ms, now);

        if count > max {
            let until = self
                .block
                .engage(&mut self.store, now, self.config.block_duration_ms);
            self.counter.reset(&mut self.store, self.clock.now());
            self.show_block(until);
            return Transition::BlockEngaged { until };
        }

        log::info!("count = {count}/{max} ({content_id})");
        let elapsed = self.elapsed_since_first_view(now);
        self.presenter.render_progress(count, max, elapsed);
        self.progress_shown = true;
        Transition::Counted { count, max }
    }

    fn show_block(&mut self, until: Millis) {
        if self.progress_shown {
            self.presenter.remove_progress();
            self.progress_shown = false;
        }
        self.presenter.render_block_overlay(until);
        self.presenter.stop_all_media();
        self.overlay_until = Some(until);
    }

    /// Handle a tab visibility change. Returns true if media was stopped.
    pub fn on_visibility_change(&mut self, visible: bool) -> bool {
        if !visible {
            return false;
        }

        let now = self.clock.now();
        if self.block.is_blocked(&self.store, now) {
            log::debug!("visible while blocked, stopping media");
            self.presenter.stop_all_media();
            return true;
        }
        false
    }

    /// Periodic refresh.
    pub fn tick(&mut self) {
        let now = self.clock.now();

        if self.overlay_until.is_some() {
            let until = self.block.current_until(&self.store, now);
            if now < until {
                self.overlay_until = Some(until);
                self.presenter.render_block_overlay(until);
            } else {
                log::info!("block expired");
                self.overlay_until = None;
                self.presenter.clear_overlay();
            }
            return;
        }

        if self.progress_shown {
            let count = self.counter.current_count(&self.store);
            let elapsed = self.elapsed_since_first_view(now);
            self.presenter
                .render_progress(count, self.config.max_views_per_session, elapsed);
        }
    }

    fn elapsed_since_first_view(&self, now: Millis) -> Millis {
        self.counter
            .session(&self.store)
            .first_view_at
            .map(|first| now.saturating_sub(first).max(0))
            .unwrap_or(0)
    }

    pub fn state(&self) -> LimiterState {
        let now = self.clock.now();
        let until = self.block.current_until(&self.store, now);
        if now < until {
            LimiterState::Blocked { until }
        } else {
            LimiterState::Counting
        }
    }

    pub fn status(&self) -> LimiterStatus {
        let now = self.clock.now();
        let until = self.block.current_until(&self.store, now);
        let blocked = now < until;

        LimiterStatus {
            count: self.counter.current_count(&self.store),
            max: self.config.max_views_per_session,
            blocked,
            blocked_until: if blocked { until } else { 0 },
            remaining_ms: if blocked { until - now } else { 0 },
            elapsed_ms: self.elapsed_since_first_view(now),
        }
    }

    pub fn is_overlay_shown(&self) -> bool {
        self.overlay_until.is_some()
    }

    pub fn is_progress_shown(&self) -> bool {
        self.progress_shown
    }

    pub fn config(&self) -> &LimiterConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn into_parts(self) -> (S, P) {
        (self.store, self.presenter)
    }
}
