//! Drift-corrected workout timer engine.
//!
//! The engine is a wall-clock-based state machine with no internal thread:
//! the host schedules `tick()` while `wants_tick()` is true (once per display
//! frame is plenty) and reports visibility changes. Elapsed time is never a
//! count of ticks; it is recomputed from wall-clock deltas on every tick and
//! on every pause/resume/stop boundary, so a throttled or irregular scheduler
//! cannot make the clock drift.

use crate::clock::{Clock, SystemClock};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Default countdown duration in seconds (typical rest interval)
pub const DEFAULT_COUNTDOWN_SECS: u32 = 60;

/// Direction the timer runs in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerMode {
    /// Counts down from a configured duration to zero
    Countdown,
    /// Counts up from zero with no upper bound
    Stopwatch,
}

/// Countdown/stopwatch clock with pause/resume and visibility-aware
/// resynchronization.
///
/// Invariant: `anchor` is `Some` iff the timer is active and not paused.
pub struct TimerEngine {
    clock: Arc<dyn Clock>,
    mode: TimerMode,
    /// Configured countdown duration in ms; unused in stopwatch mode
    duration_ms: u64,
    /// Elapsed active time folded up to the last recompute boundary
    elapsed_ms: u64,
    /// Wall-clock instant elapsed time is extrapolated from
    anchor: Option<DateTime<Utc>>,
    active: bool,
    paused: bool,
    hidden: bool,
}

impl TimerEngine {
    /// Countdown timer over `duration_secs`, driven by the system clock
    pub fn countdown(duration_secs: u32) -> Self {
        Self::with_clock(TimerMode::Countdown, duration_secs, Arc::new(SystemClock))
    }

    /// Stopwatch timer driven by the system clock
    pub fn stopwatch() -> Self {
        Self::with_clock(TimerMode::Stopwatch, 0, Arc::new(SystemClock))
    }

    pub fn with_clock(mode: TimerMode, duration_secs: u32, clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            mode,
            duration_ms: u64::from(duration_secs) * 1000,
            elapsed_ms: 0,
            anchor: None,
            active: false,
            paused: false,
            hidden: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the host should keep the tick loop scheduled
    pub fn wants_tick(&self) -> bool {
        self.active && !self.paused && !self.hidden
    }

    /// Elapsed active time in whole seconds, as of the last recompute
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_ms / 1000
    }

    /// Remaining countdown time in whole seconds, clamped at zero.
    /// Always zero in stopwatch mode.
    pub fn remaining_seconds(&self) -> u64 {
        match self.mode {
            TimerMode::Countdown => self.duration_ms.saturating_sub(self.elapsed_ms) / 1000,
            TimerMode::Stopwatch => 0,
        }
    }

    /// Display string in MM:SS — remaining time for countdown, elapsed for
    /// stopwatch
    pub fn display_time(&self) -> String {
        let ms = match self.mode {
            TimerMode::Countdown => self.duration_ms.saturating_sub(self.elapsed_ms),
            TimerMode::Stopwatch => self.elapsed_ms,
        };
        format_mm_ss(ms)
    }

    // ── Commands ─────────────────────────────────────────────────────
    //
    // Control calls in an invalid state are silent no-ops: these are wired to
    // UI buttons whose enabled state already guards the transitions.

    pub fn start(&mut self) {
        if self.active {
            return;
        }
        self.active = true;
        self.paused = false;
        self.anchor = Some(self.clock.now());
        tracing::debug!(mode = ?self.mode, "timer started");
    }

    pub fn pause(&mut self) {
        if !self.active || self.paused {
            return;
        }
        self.fold_elapsed();
        self.anchor = None;
        self.paused = true;
        tracing::debug!(elapsed_ms = self.elapsed_ms, "timer paused");
    }

    pub fn resume(&mut self) {
        if !self.active || !self.paused {
            return;
        }
        self.paused = false;
        self.anchor = Some(self.clock.now());
        tracing::debug!("timer resumed");
    }

    /// Start if inactive, pause if running, resume if paused
    pub fn toggle(&mut self) {
        if !self.active {
            self.start();
        } else if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Return to the initial inactive state with zero elapsed time.
    /// The configured countdown duration is kept.
    pub fn reset(&mut self) {
        self.active = false;
        self.paused = false;
        self.elapsed_ms = 0;
        self.anchor = None;
    }

    /// Fold the final delta and go inactive. Returns the final elapsed
    /// seconds (stopwatch) or remaining seconds (countdown).
    pub fn stop(&mut self) -> u64 {
        if self.active {
            self.fold_elapsed();
        }
        self.active = false;
        self.paused = false;
        self.anchor = None;
        match self.mode {
            TimerMode::Stopwatch => self.elapsed_seconds(),
            TimerMode::Countdown => self.remaining_seconds(),
        }
    }

    /// Add or subtract seconds from the remaining (if active) or configured
    /// (if inactive) countdown duration, clamped at zero. No-op in stopwatch
    /// mode.
    pub fn adjust_duration(&mut self, delta_seconds: i64) {
        if self.mode != TimerMode::Countdown {
            return;
        }
        let delta_ms = delta_seconds.saturating_mul(1000);
        if self.active {
            self.fold_elapsed();
            let remaining = self.duration_ms.saturating_sub(self.elapsed_ms);
            let new_remaining = (remaining as i64).saturating_add(delta_ms).max(0) as u64;
            self.duration_ms = self.elapsed_ms + new_remaining;
        } else {
            self.duration_ms = (self.duration_ms as i64).saturating_add(delta_ms).max(0) as u64;
        }
    }

    /// Replace the configured countdown duration. Only honored while
    /// inactive; no-op in stopwatch mode.
    pub fn set_duration(&mut self, duration_secs: u32) {
        if self.mode != TimerMode::Countdown || self.active {
            return;
        }
        self.duration_ms = u64::from(duration_secs) * 1000;
    }

    /// Recompute elapsed time from the wall clock. Call periodically while
    /// `wants_tick()` is true.
    ///
    /// Returns true exactly once per active period, when a countdown reaches
    /// zero; the engine auto-stops at that point and wants no further ticks.
    pub fn tick(&mut self) -> bool {
        if !self.wants_tick() {
            return false;
        }
        self.fold_elapsed();
        if self.mode == TimerMode::Countdown && self.elapsed_ms >= self.duration_ms {
            self.active = false;
            self.paused = false;
            self.anchor = None;
            tracing::debug!("countdown completed");
            return true;
        }
        false
    }

    /// Report the host environment going hidden or visible.
    ///
    /// Going hidden while running folds elapsed time and de-schedules the
    /// loop; coming back re-anchors to now, so backgrounded throttling can
    /// neither drop the pre-hide delta nor double-count it when ticks resume.
    pub fn set_hidden(&mut self, hidden: bool) {
        if self.hidden == hidden {
            return;
        }
        self.hidden = hidden;
        if !self.active || self.paused {
            return;
        }
        if hidden {
            self.fold_elapsed();
        } else {
            self.anchor = Some(self.clock.now());
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn fold_elapsed(&mut self) {
        if let Some(anchor) = self.anchor {
            let now = self.clock.now();
            let delta = (now - anchor).num_milliseconds().max(0) as u64;
            self.elapsed_ms += delta;
            self.anchor = Some(now);
        }
    }
}

/// Format milliseconds as MM:SS, clamped at zero
pub fn format_mm_ss(ms: u64) -> String {
    let total_secs = ms / 1000;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}
