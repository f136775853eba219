//! Display-refresh driver.
//!
//! A [`MotionClock`] turns refresh callbacks from a platform
//! [`FrameScheduler`] into elapsed-seconds ticks for a single update function.
//! The clock keeps at most one frame request outstanding, clamps long gaps
//! (backgrounded tabs, debugger pauses) to [`MAX_FRAME_DELTA`], and honours a
//! reduced-motion preference by ticking once with zero elapsed time instead
//! of animating.
//!
//! The platform side only has to request and cancel frames and report the
//! refresh timestamp back through [`MotionClock::on_frame`]; see
//! [`ManualScheduler`](crate::simulator::ManualScheduler) for a headless
//! implementation.
//!
//! # Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use std::time::Duration;
//! use glide::clock::MotionClock;
//! use glide::simulator::ManualScheduler;
//!
//! let elapsed = Rc::new(Cell::new(0.0));
//! let sink = Rc::clone(&elapsed);
//!
//! let mut clock = MotionClock::new(ManualScheduler::new());
//! clock.start(move |dt| sink.set(sink.get() + dt));
//!
//! // First refresh only establishes the baseline.
//! let frame = clock.pending_frame().unwrap();
//! clock.on_frame(frame, Duration::from_millis(1000));
//! let frame = clock.pending_frame().unwrap();
//! clock.on_frame(frame, Duration::from_millis(1016));
//!
//! assert!((elapsed.get() - 0.016).abs() < 1e-9);
//! clock.stop();
//! assert!(clock.pending_frame().is_none());
//! ```

use std::fmt;
use std::time::Duration;

use tracing::{debug, trace};

/// Upper bound on the delta handed to the tick function, in seconds.
pub const MAX_FRAME_DELTA: f64 = 0.1;

/// Opaque identifier of one outstanding frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// Platform hook that delivers display refreshes.
///
/// Implementations call [`MotionClock::on_frame`] with the handle they
/// returned once the refresh happens.
pub trait FrameScheduler {
    /// Requests one refresh callback. `None` means the platform has no
    /// refresh-scheduling facility.
    fn request_frame(&mut self) -> Option<FrameHandle>;

    /// Cancels a previously requested refresh.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Whether the user asked for reduced motion.
    fn prefers_reduced_motion(&self) -> bool {
        false
    }
}

/// Lifecycle state of a [`MotionClock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    /// Not started, or stopped.
    Stopped,
    /// Waiting on a refresh.
    Running,
    /// Started under reduced motion (or without a scheduler): ticked once, idle.
    Settled,
}

type TickFn = Box<dyn FnMut(f64)>;

/// Continuous-time driver feeding elapsed seconds to one update function.
pub struct MotionClock<S: FrameScheduler> {
    scheduler: S,
    state: ClockState,
    pending: Option<FrameHandle>,
    last_timestamp: Option<Duration>,
    tick_fn: Option<TickFn>,
    max_delta: f64,
    reduced_motion_override: Option<bool>,
}

impl<S: FrameScheduler> MotionClock<S> {
    /// Creates a stopped clock on top of `scheduler`.
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            state: ClockState::Stopped,
            pending: None,
            last_timestamp: None,
            tick_fn: None,
            max_delta: MAX_FRAME_DELTA,
            reduced_motion_override: None,
        }
    }

    /// Overrides the delta clamp (seconds). Non-positive values are ignored.
    #[must_use]
    pub fn with_max_delta(mut self, max_delta: f64) -> Self {
        if max_delta.is_finite() && max_delta > 0.0 {
            self.max_delta = max_delta;
        }
        self
    }

    /// Forces the reduced-motion decision instead of asking the scheduler.
    #[must_use]
    pub fn with_reduced_motion(mut self, reduced: Option<bool>) -> Self {
        self.reduced_motion_override = reduced;
        self
    }

    /// Begins feeding `tick` once per refresh.
    ///
    /// Restarting a running clock replaces the tick function and its frame
    /// request. Under reduced motion, or when the platform cannot schedule
    /// frames, `tick(0.0)` is called synchronously and nothing is scheduled.
    pub fn start<F>(&mut self, tick: F)
    where
        F: FnMut(f64) + 'static,
    {
        self.stop();
        let mut tick: TickFn = Box::new(tick);

        if self.reduced_motion() {
            debug!("motion clock: reduced motion, settling without animation");
            tick(0.0);
            self.tick_fn = Some(tick);
            self.state = ClockState::Settled;
            return;
        }

        match self.scheduler.request_frame() {
            Some(handle) => {
                debug!(?handle, "motion clock: started");
                self.pending = Some(handle);
                self.tick_fn = Some(tick);
                self.state = ClockState::Running;
            }
            None => {
                debug!("motion clock: no frame scheduler, settling without animation");
                tick(0.0);
                self.tick_fn = Some(tick);
                self.state = ClockState::Settled;
            }
        }
    }

    /// Halts ticking and releases any outstanding frame request.
    ///
    /// Idempotent; safe before [`start`](Self::start).
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
            debug!(?handle, "motion clock: stopped");
        }
        self.tick_fn = None;
        self.last_timestamp = None;
        self.state = ClockState::Stopped;
    }

    /// Delivers a refresh at `timestamp` (monotonic, any origin).
    ///
    /// Returns whether the tick function ran. Refreshes for stale handles
    /// are ignored.
    pub fn on_frame(&mut self, handle: FrameHandle, timestamp: Duration) -> bool {
        if self.state != ClockState::Running || self.pending != Some(handle) {
            trace!(?handle, "motion clock: ignoring stale frame");
            return false;
        }
        self.pending = None;

        let ticked = match self.last_timestamp.replace(timestamp) {
            None => false,
            Some(previous) => {
                let delta = timestamp.saturating_sub(previous).as_secs_f64().min(self.max_delta);
                if let Some(tick) = self.tick_fn.as_mut() {
                    tick(delta);
                }
                true
            }
        };

        if let Some(next) = self.scheduler.request_frame() {
            self.pending = Some(next);
        } else {
            debug!("motion clock: frame scheduler went away, stopping");
            self.tick_fn = None;
            self.last_timestamp = None;
            self.state = ClockState::Stopped;
        }
        ticked
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ClockState {
        self.state
    }

    /// Whether refreshes are being delivered to the tick function.
    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    /// The outstanding frame request, if any.
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Effective reduced-motion decision.
    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion_override
            .unwrap_or_else(|| self.scheduler.prefers_reduced_motion())
    }

    /// The platform scheduler.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Mutable access to the platform scheduler.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

impl<S: FrameScheduler> Drop for MotionClock<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<S: FrameScheduler + fmt::Debug> fmt::Debug for MotionClock<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotionClock")
            .field("scheduler", &self.scheduler)
            .field("state", &self.state)
            .field("pending", &self.pending)
            .field("last_timestamp", &self.last_timestamp)
            .field("max_delta", &self.max_delta)
            .finish_non_exhaustive()
    }
}
