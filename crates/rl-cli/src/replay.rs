use rl_core::display::{format_countdown, format_elapsed, progress_percent};
use rl_core::{Clock, LimiterConfig, ManualClock, Millis, Presenter, SessionController, Transition};

use crate::file_store::FileStore;
use crate::trace::TraceEvent;

/// Presenter that records what a page would show.
pub struct TextPresenter {
    clock: ManualClock,
    base: Millis,
    pub lines: Vec<String>,
}

impl TextPresenter {
    pub fn new(clock: ManualClock, base: Millis) -> Self {
        Self {
            clock,
            base,
            lines: Vec::new(),
        }
    }

    fn push(&mut self, text: String) {
        let offset = self.clock.now() - self.base;
        self.lines.push(format!("[{:>9}ms] {}", offset, text));
    }
}

impl Presenter for TextPresenter {
    fn render_block_overlay(&mut self, until: Millis) {
        let remaining = until - self.clock.now();
        self.push(format!("overlay: blocked, {} remaining", format_countdown(remaining)));
    }

    fn clear_overlay(&mut self) {
        self.push("overlay: cleared".to_string());
    }

    fn render_progress(&mut self, current: u32, max: u32, elapsed: Millis) {
        self.push(format!(
            "progress: {}/{} ({}%), time wasted {}",
            current,
            max,
            progress_percent(current, max),
            format_elapsed(elapsed)
        ));
    }

    fn remove_progress(&mut self) {
        self.push("progress: removed".to_string());
    }

    fn stop_all_media(&mut self) {
        self.push("media: stopped".to_string());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub events: usize,
    pub counted: usize,
    pub blocks_engaged: usize,
    pub refused: usize,
    pub final_count: u32,
    pub blocked_at_end: bool,
}

pub struct ReplayOutput {
    pub lines: Vec<String>,
    pub stats: ReplayStats,
    pub store: FileStore,
}

/// Run `events` through a fresh controller, with the clock starting at `base`.
pub fn replay(
    config: LimiterConfig,
    store: FileStore,
    events: &[TraceEvent],
    base: Millis,
) -> Result<ReplayOutput, String> {
    let clock = ManualClock::new(base);
    let presenter = TextPresenter::new(clock.clone(), base);
    let mut controller = SessionController::new(config, store, clock.clone(), presenter)
        .map_err(|e| e.to_string())?;

    log::info!("replaying {} events from base {}", events.len(), base);
    let mut stats = ReplayStats::default();

    for event in events {
        clock.set(base + event.at());
        stats.events += 1;

        let transition = match event {
            TraceEvent::Start { url, .. } => controller.start(url),
            TraceEvent::Url { url, .. } => controller.on_url_observed(url),
            TraceEvent::Visibility { visible, .. } => {
                controller.on_visibility_change(*visible);
                None
            }
            TraceEvent::Tick { .. } => {
                controller.tick();
                None
            }
        };

        match transition {
            Some(Transition::Counted { .. }) => stats.counted += 1,
            Some(Transition::BlockEngaged { .. }) => stats.blocks_engaged += 1,
            Some(Transition::StillBlocked { .. }) => stats.refused += 1,
            Some(Transition::LeftScope) | None => {}
        }
    }

    let status = controller.status();
    stats.final_count = status.count;
    stats.blocked_at_end = status.blocked;

    let (store, presenter) = controller.into_parts();
    Ok(ReplayOutput {
        lines: presenter.lines,
        stats,
        store,
    })
}
