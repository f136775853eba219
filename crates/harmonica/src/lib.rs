#![forbid(unsafe_code)]
// Allow these clippy lints for physics/math code readability
#![allow(clippy::must_use_candidate)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::struct_field_names)]

//! # Harmonica
//!
//! Physics-based motion primitives for frame-driven UI animation.
//!
//! Harmonica provides:
//! - **Spring**: a damped harmonic oscillator, stepped with whatever time
//!   delta the last display refresh took
//! - **SpringValue**: an animated scalar chasing a target
//! - **Smoothing**: frame-rate independent exponential blending
//!
//! ## Spring Example
//!
//! ```rust
//! use harmonica::{SpringConfig, SpringValue};
//!
//! let mut tilt = SpringValue::new(0.0, SpringConfig::from_physical(100.0, 30.0, 2.0));
//! tilt.set_target(14.0);
//!
//! // Frames of uneven length
//! for dt in [0.016, 0.017, 0.033, 0.016].iter().cycle().take(200) {
//!     tilt.advance(*dt);
//! }
//!
//! assert!((tilt.position() - 14.0).abs() < 0.01);
//! ```
//!
//! ## Damping Ratios
//!
//! - **Over-damped (ζ > 1)**: No oscillation, slow return to equilibrium
//! - **Critically-damped (ζ = 1)**: Fastest return without oscillation
//! - **Under-damped (ζ < 1)**: Oscillates around equilibrium with decay
//!
//! ## Attribution
//!
//! The spring algorithm is based on Ryan Juckett's damped harmonic motion:
//! <https://www.ryanjuckett.com/damped-springs/>

mod smoothing;
mod spring;

pub use smoothing::{smooth_toward, smoothing_factor};
pub use spring::{
    fps, Spring, SpringConfig, SpringValue, REST_POSITION_THRESHOLD, REST_VELOCITY_THRESHOLD,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::smoothing::{smooth_toward, smoothing_factor};
    pub use crate::spring::{fps, Spring, SpringConfig, SpringValue};
}
