//! Frame-rate independent exponential smoothing.
//!
//! Blends a value toward a target with a time constant `tau`: after `tau`
//! seconds roughly 63% of the gap has closed, regardless of how the elapsed
//! time was split into frames.
//!
//! ```rust
//! use harmonica::smooth_toward;
//!
//! let v = smooth_toward(0.0, 100.0, 0.1, 0.1);
//! assert!((v - 100.0 * (1.0 - (-1.0f64).exp())).abs() < 1e-9);
//! ```

/// Fraction of the remaining gap closed over `delta_time` seconds.
///
/// Returns `1 - e^(-dt/tau)`. A non-positive `tau` closes the gap instantly;
/// a non-positive `delta_time` closes nothing.
#[inline]
pub fn smoothing_factor(delta_time: f64, tau: f64) -> f64 {
    if delta_time <= 0.0 {
        return 0.0;
    }
    if tau <= 0.0 {
        return 1.0;
    }
    1.0 - (-delta_time / tau).exp()
}

/// Moves `current` toward `target` by [`smoothing_factor`] of the gap.
#[inline]
pub fn smooth_toward(current: f64, target: f64, delta_time: f64, tau: f64) -> f64 {
    current + (target - current) * smoothing_factor(delta_time, tau)
}
