//! Headless frame delivery for tests and offline runs.
//!
//! [`ManualScheduler`] is a [`FrameScheduler`] that only records requests;
//! [`FrameSimulator`] owns a [`MotionClock`] on top of it and advances
//! virtual time at a fixed refresh rate, delivering each pending frame.
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use std::time::Duration;
//! use glide::config::TrackConfig;
//! use glide::simulator::FrameSimulator;
//! use glide::track::{Direction, LoopTrack, Track};
//!
//! let looped = Rc::new(RefCell::new(LoopTrack::new(TrackConfig::default())));
//! looped.borrow_mut().configure(Track::new(vec!["a", "b"]), 100.0, Direction::Left);
//! looped.borrow_mut().measure(800.0, 300.0);
//!
//! let mut sim = FrameSimulator::new(60);
//! let driven = Rc::clone(&looped);
//! sim.clock_mut().start(move |dt| driven.borrow_mut().tick(dt));
//! sim.advance(Duration::from_millis(500));
//!
//! assert!(looped.borrow().offset() > 0.0);
//! ```

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;
use std::time::Duration;

use crate::clock::{FrameHandle, FrameScheduler, MotionClock};

/// Bookkeeping shared between a [`ManualScheduler`] and its observers.
#[derive(Debug, Default)]
pub struct FrameLog {
    next_id: u64,
    outstanding: BTreeSet<FrameHandle>,
    requested: usize,
    cancelled: usize,
}

impl FrameLog {
    /// Requests not yet delivered or cancelled.
    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    /// Total requests ever made.
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Total cancellations of outstanding requests.
    pub fn cancelled(&self) -> usize {
        self.cancelled
    }

    /// Oldest outstanding request.
    pub fn next_pending(&self) -> Option<FrameHandle> {
        self.outstanding.iter().next().copied()
    }

    /// Marks `handle` as delivered. Returns `false` if it was not outstanding.
    pub fn deliver(&mut self, handle: FrameHandle) -> bool {
        self.outstanding.remove(&handle)
    }
}

/// A scheduler whose frames are delivered by hand.
#[derive(Debug, Clone)]
pub struct ManualScheduler {
    log: Rc<RefCell<FrameLog>>,
    reduced_motion: bool,
    supported: bool,
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualScheduler {
    /// Creates a scheduler that accepts frame requests.
    pub fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(FrameLog::default())),
            reduced_motion: false,
            supported: true,
        }
    }

    /// Creates a scheduler for a platform without refresh callbacks.
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new()
        }
    }

    /// Sets the reported reduced-motion preference.
    #[must_use]
    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    /// Shared handle to the request log, usable after the scheduler moves.
    pub fn log(&self) -> Rc<RefCell<FrameLog>> {
        Rc::clone(&self.log)
    }

    /// See [`FrameLog::outstanding`].
    pub fn outstanding(&self) -> usize {
        self.log.borrow().outstanding()
    }

    /// See [`FrameLog::requested`].
    pub fn requested(&self) -> usize {
        self.log.borrow().requested()
    }

    /// See [`FrameLog::cancelled`].
    pub fn cancelled(&self) -> usize {
        self.log.borrow().cancelled()
    }

    /// See [`FrameLog::next_pending`].
    pub fn next_pending(&self) -> Option<FrameHandle> {
        self.log.borrow().next_pending()
    }

    /// See [`FrameLog::deliver`].
    pub fn deliver(&self, handle: FrameHandle) -> bool {
        self.log.borrow_mut().deliver(handle)
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        if !self.supported {
            return None;
        }
        let mut log = self.log.borrow_mut();
        log.next_id += 1;
        log.requested += 1;
        let handle = FrameHandle(log.next_id);
        log.outstanding.insert(handle);
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let mut log = self.log.borrow_mut();
        if log.outstanding.remove(&handle) {
            log.cancelled += 1;
        }
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }
}

/// Drives a [`MotionClock`] through virtual time at a fixed refresh rate.
#[derive(Debug)]
pub struct FrameSimulator {
    clock: MotionClock<ManualScheduler>,
    now: Duration,
    interval: Duration,
    frames: usize,
    ticks: usize,
}

impl FrameSimulator {
    /// Creates a simulator refreshing `fps` times per second.
    pub fn new(fps: u32) -> Self {
        Self::with_scheduler(ManualScheduler::new(), fps)
    }

    /// Creates a simulator on a preconfigured scheduler.
    pub fn with_scheduler(scheduler: ManualScheduler, fps: u32) -> Self {
        Self::with_clock(MotionClock::new(scheduler), fps)
    }

    /// Creates a simulator around an existing clock.
    pub fn with_clock(clock: MotionClock<ManualScheduler>, fps: u32) -> Self {
        let fps = fps.max(1);
        Self {
            clock,
            now: Duration::ZERO,
            interval: Duration::from_secs(1) / fps,
            frames: 0,
            ticks: 0,
        }
    }

    /// The driven clock.
    pub fn clock(&self) -> &MotionClock<ManualScheduler> {
        &self.clock
    }

    /// Mutable access to the driven clock (to start or stop it).
    pub fn clock_mut(&mut self) -> &mut MotionClock<ManualScheduler> {
        &mut self.clock
    }

    /// Virtual time elapsed so far.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Time between refreshes.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Refreshes delivered so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Refreshes that reached the tick function.
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    /// Advances one refresh interval and delivers the pending frame, if any.
    ///
    /// Returns whether the tick function ran.
    pub fn step(&mut self) -> bool {
        self.step_by(self.interval)
    }

    /// Advances by `elapsed` and delivers the pending frame, if any.
    pub fn step_by(&mut self, elapsed: Duration) -> bool {
        self.now += elapsed;
        let Some(handle) = self.clock.pending_frame() else {
            return false;
        };
        self.frames += 1;
        self.clock.scheduler().deliver(handle);
        let ticked = self.clock.on_frame(handle, self.now);
        if ticked {
            self.ticks += 1;
        }
        ticked
    }

    /// Steps until at least `duration` of virtual time has passed.
    ///
    /// Returns the number of ticks delivered.
    pub fn advance(&mut self, duration: Duration) -> usize {
        let until = self.now + duration;
        let mut ticked = 0;
        while self.now < until {
            if self.step() {
                ticked += 1;
            }
        }
        ticked
    }
}
