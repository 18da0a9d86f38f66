//! Formatting helpers shared by presenters.

use crate::types::Millis;

/// Block countdown as `m:ss`. Negative input renders as `0:00`.
pub fn format_countdown(remaining: Millis) -> String {
    let remaining = remaining.max(0);
    let mins = remaining / 60_000;
    let secs = (remaining % 60_000) / 1000;
    format!("{mins}:{secs:02}")
}

/// Session elapsed time as `Ns`, or `Mm SSs` from one minute up.
pub fn format_elapsed(elapsed: Millis) -> String {
    let elapsed = elapsed.max(0);
    let mins = elapsed / 60_000;
    let secs = (elapsed % 60_000) / 1000;
    if mins > 0 {
        format!("{mins}m {secs:02}s")
    } else {
        format!("{secs}s")
    }
}

/// Fill percentage for a progress bar, clamped to 100.
pub fn progress_percent(current: u32, max: u32) -> u8 {
    if max == 0 {
        return 100;
    }
    let percent = u64::from(current) * 100 / u64::from(max);
    percent.min(100) as u8
}
