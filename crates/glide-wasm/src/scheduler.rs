//! `requestAnimationFrame` plumbing.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use glide::clock::{FrameHandle, FrameScheduler, MotionClock};
use glide::config::ClockConfig;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::Window;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

type FrameCallback = Closure<dyn FnMut(f64)>;

/// Whether the user asked the browser for reduced motion.
pub fn prefers_reduced_motion(window: &Window) -> bool {
    window
        .match_media(REDUCED_MOTION_QUERY)
        .ok()
        .flatten()
        .is_some_and(|query| query.matches())
}

/// Converts a `DOMHighResTimeStamp` (milliseconds) into a [`Duration`].
pub fn timestamp(ms: f64) -> Duration {
    Duration::try_from_secs_f64(ms / 1000.0).unwrap_or_default()
}

/// Frame scheduler backed by `window.requestAnimationFrame`.
pub struct RafScheduler {
    window: Option<Window>,
    callback: Option<FrameCallback>,
}

impl RafScheduler {
    fn new(window: Option<Window>) -> Self {
        Self {
            window,
            callback: None,
        }
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let window = self.window.as_ref()?;
        let callback = self.callback.as_ref()?;
        let id = window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .ok()?;
        u64::try_from(id).ok().map(FrameHandle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let (Some(window), Ok(id)) = (self.window.as_ref(), i32::try_from(handle.0)) {
            let _ = window.cancel_animation_frame(id);
        }
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.window.as_ref().is_some_and(prefers_reduced_motion)
    }
}

/// A [`MotionClock`] wired to the browser's refresh callback.
///
/// The clock owns the JS callback; the callback only holds a weak reference
/// back, so dropping the driver releases both.
pub struct FrameDriver {
    clock: Rc<RefCell<MotionClock<RafScheduler>>>,
}

impl FrameDriver {
    /// Creates a stopped driver on the current window.
    pub fn new(config: &ClockConfig) -> Self {
        let clock = MotionClock::new(RafScheduler::new(web_sys::window()))
            .with_max_delta(config.max_frame_delta)
            .with_reduced_motion(config.reduced_motion);
        let clock = Rc::new(RefCell::new(clock));

        let weak: Weak<RefCell<MotionClock<RafScheduler>>> = Rc::downgrade(&clock);
        let callback = Closure::<dyn FnMut(f64)>::new(move |ms: f64| {
            let Some(clock) = weak.upgrade() else {
                return;
            };
            let mut clock = clock.borrow_mut();
            if let Some(handle) = clock.pending_frame() {
                clock.on_frame(handle, timestamp(ms));
            }
        });
        clock.borrow_mut().scheduler_mut().callback = Some(callback);

        Self { clock }
    }

    /// Starts delivering ticks to `tick`.
    pub fn start<F>(&self, tick: F)
    where
        F: FnMut(f64) + 'static,
    {
        self.clock.borrow_mut().start(tick);
    }

    /// Stops ticking and cancels the outstanding frame.
    pub fn stop(&self) {
        self.clock.borrow_mut().stop();
    }

    /// Effective reduced-motion decision.
    pub fn reduced_motion(&self) -> bool {
        self.clock.borrow().reduced_motion()
    }
}

impl Drop for FrameDriver {
    fn drop(&mut self) {
        if let Ok(mut clock) = self.clock.try_borrow_mut() {
            clock.stop();
        }
    }
}
