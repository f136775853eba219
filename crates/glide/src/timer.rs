//! Cancellable one-shot timers advanced by frame time.
//!
//! The momentum window and the touch grace period are deferred actions that
//! must be cancellable and must never fire twice. A [`OneShotTimer`] counts
//! down by the same deltas the owning engine integrates with, so simulated
//! time and rendered motion can never drift apart.
//!
//! # Example
//!
//! ```rust
//! use glide::timer::OneShotTimer;
//! use std::time::Duration;
//!
//! let mut timer = OneShotTimer::new();
//! timer.schedule(Duration::from_millis(200));
//! assert!(!timer.advance(0.1));
//! assert!(timer.advance(0.1));
//! assert!(!timer.advance(0.1)); // fired once, now idle
//! ```

use std::time::Duration;

/// Slack for accumulated floating point error in frame deltas.
const FIRE_EPSILON: f64 = 1e-9;

/// A countdown that fires at most once per [`schedule`](OneShotTimer::schedule).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OneShotTimer {
    remaining: Option<f64>,
}

impl OneShotTimer {
    /// Creates an idle timer.
    #[must_use]
    pub const fn new() -> Self {
        Self { remaining: None }
    }

    /// Arms the timer, replacing any pending countdown.
    pub fn schedule(&mut self, delay: Duration) {
        self.remaining = Some(delay.as_secs_f64());
    }

    /// Disarms the timer. Returns whether a countdown was pending.
    pub fn cancel(&mut self) -> bool {
        self.remaining.take().is_some()
    }

    /// Whether a countdown is pending.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.remaining.is_some()
    }

    /// Time left before the timer fires, if armed.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.remaining.map(|r| Duration::from_secs_f64(r.max(0.0)))
    }

    /// Counts down by `delta_seconds`. Returns `true` on the call that fires.
    pub fn advance(&mut self, delta_seconds: f64) -> bool {
        let Some(remaining) = self.remaining.as_mut() else {
            return false;
        };
        if delta_seconds.is_finite() && delta_seconds > 0.0 {
            *remaining -= delta_seconds;
        }
        if *remaining <= FIRE_EPSILON {
            self.remaining = None;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_timer_never_fires() {
        let mut timer = OneShotTimer::new();
        assert!(!timer.is_pending());
        assert!(!timer.advance(10.0));
        assert!(!timer.cancel());
    }

    #[test]
    fn fires_after_accumulated_tenths() {
        // 0.1 * 10 accumulates to slightly under 1.0 in f64.
        let mut timer = OneShotTimer::new();
        timer.schedule(Duration::from_secs(1));
        for _ in 0..9 {
            assert!(!timer.advance(0.1));
        }
        assert!(timer.advance(0.1));
        assert!(!timer.is_pending());
    }

    #[test]
    fn reschedule_replaces_countdown() {
        let mut timer = OneShotTimer::new();
        timer.schedule(Duration::from_millis(100));
        assert!(!timer.advance(0.08));
        timer.schedule(Duration::from_millis(100));
        assert!(!timer.advance(0.08));
        assert!(timer.advance(0.02));
    }

    #[test]
    fn cancel_prevents_fire() {
        let mut timer = OneShotTimer::new();
        timer.schedule(Duration::from_millis(50));
        assert!(timer.cancel());
        assert!(!timer.advance(1.0));
    }

    #[test]
    fn zero_delay_fires_on_next_advance() {
        let mut timer = OneShotTimer::new();
        timer.schedule(Duration::ZERO);
        assert!(timer.advance(0.0));
    }

    #[test]
    fn remaining_reports_time_left() {
        let mut timer = OneShotTimer::new();
        timer.schedule(Duration::from_secs(2));
        timer.advance(0.5);
        let left = timer.remaining().unwrap();
        assert!((left.as_secs_f64() - 1.5).abs() < 1e-9);
    }
}
