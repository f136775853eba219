#![forbid(unsafe_code)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::float_cmp)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::module_name_repetitions)]

//! # Glide
//!
//! Frame-driven motion engines for a portfolio-style web front end.
//!
//! Glide provides:
//! - **MotionClock**: turns display refreshes into clamped elapsed-time ticks,
//!   honouring reduced motion
//! - **LoopTrack**: an infinitely looping marquee with hover speed, drag to
//!   scrub and release momentum
//! - **TiltResponder**: spring-damped 3D tilt following a pointer or finger
//! - **ViewportGate**: fire-once "became visible" triggers for entrance
//!   animations and lazy loading
//!
//! The engines never touch a platform API. Events go in through plain method
//! calls (`tick`, `on_pointer_move`, `on_entry`, ...) and only numbers come
//! out: a translation for the track, a pose for the tilt. Host adapters read
//! layout first, feed the engines, then write the resulting transforms, so a
//! frame never interleaves layout reads with style writes.
//!
//! ## Example
//!
//! ```rust
//! use glide::prelude::*;
//!
//! let config = MotionConfig::default();
//! let mut marquee = LoopTrack::new(config.track.clone());
//! marquee.configure(Track::new(vec!["rust", "wasm"]), 100.0, Direction::Right);
//! marquee.measure(1200.0, 480.0);
//!
//! let mut tilt = TiltResponder::new(config.tilt);
//! tilt.on_pointer_enter();
//! tilt.on_pointer_move(Point::new(10.0, 10.0), Rect::new(0.0, 0.0, 200.0, 200.0));
//!
//! for _ in 0..30 {
//!     marquee.tick(1.0 / 60.0);
//!     tilt.tick(1.0 / 60.0);
//! }
//!
//! assert!(marquee.offset() > 0.0 && marquee.offset() < 480.0);
//! assert!(tilt.pose().rotate_x > 0.0);
//! assert!(marquee.momentum_remaining().is_none());
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod gate;
pub mod geometry;
pub mod simulator;
pub mod tilt;
pub mod timer;
pub mod track;

pub use clock::{ClockState, FrameHandle, FrameScheduler, MotionClock, MAX_FRAME_DELTA};
pub use config::{ClockConfig, GateConfig, MotionConfig, SpringParams, TiltConfig, TrackConfig};
pub use error::{Error, Result};
pub use gate::{
    BecameVisible, IntersectionEntry, IntersectionSource, LazyReveal, ObserveOutcome,
    ViewportGate, VisibilityFlag,
};
pub use geometry::{Axis, Point, Rect};
pub use simulator::{FrameSimulator, ManualScheduler};
pub use tilt::{TiltPhase, TiltPose, TiltResponder};
pub use timer::OneShotTimer;
pub use track::{
    ContentLoader, Direction, DragSession, LoopTrack, Track, TrackTransform, recompute_copies,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::clock::{ClockState, FrameScheduler, MotionClock};
    pub use crate::config::MotionConfig;
    pub use crate::gate::{IntersectionEntry, IntersectionSource, ViewportGate};
    pub use crate::geometry::{Axis, Point, Rect};
    pub use crate::tilt::{TiltPose, TiltResponder};
    pub use crate::track::{Direction, LoopTrack, Track};
}
