//! Auto-advance timing state machine.
//!
//! The host drives this from its UI loop by passing the current instant
//! into [`AutoAdvance::poll`]; there is no spawned task and no global
//! handle, so pausing cancels exactly this widget's pending check and
//! dropping the widget is the teardown.

use embassy_time::{Duration, Instant};
use log::trace;

/// Auto-advance lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceState {
    /// No pending advance.
    Idle,
    /// A delayed advance check is scheduled.
    Armed { deadline: Instant },
    /// Advancing is suspended by an active touch.
    Paused,
}

/// Per-widget-instance auto-advance scheduler.
pub struct AutoAdvance {
    state: AdvanceState,
    advance_delay: Duration,
    min_dwell: Duration,
    last_page_change: Option<Instant>,
}

impl AutoAdvance {
    pub fn new(advance_delay: Duration, min_dwell: Duration) -> Self {
        Self {
            state: AdvanceState::Idle,
            advance_delay,
            min_dwell,
            last_page_change: None,
        }
    }

    pub fn state(&self) -> AdvanceState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, AdvanceState::Armed { .. })
    }

    pub fn is_paused(&self) -> bool {
        self.state == AdvanceState::Paused
    }

    /// Schedule the next check at `now + advance_delay`.
    pub fn arm(&mut self, now: Instant) {
        self.state = AdvanceState::Armed {
            deadline: now + self.advance_delay,
        };
    }

    /// Touch-down: cancel the pending check.
    pub fn pause(&mut self) {
        self.state = AdvanceState::Paused;
    }

    /// Touch-up or touch-cancel: schedule a fresh check.
    pub fn resume(&mut self, now: Instant) {
        self.arm(now);
    }

    /// Record a page-change event (user drag or programmatic advance) as
    /// the dwell reference point.
    pub fn note_page_change(&mut self, now: Instant) {
        self.last_page_change = Some(now);
    }

    /// Fires the scheduled check once its deadline has passed. Returns
    /// `true` when the caller should advance one page.
    ///
    /// A check that fires before the minimum dwell has elapsed performs no
    /// advance but still re-arms; the check chain never silently stalls.
    pub fn poll(&mut self, now: Instant) -> bool {
        let AdvanceState::Armed { deadline } = self.state else {
            return false;
        };
        if now < deadline {
            return false;
        }

        let dwell_met = match self.last_page_change {
            Some(changed_at) => now - changed_at >= self.min_dwell,
            None => true,
        };
        trace!("auto-advance check fired, dwell_met={}", dwell_met);
        self.arm(now);
        dwell_met
    }
}
