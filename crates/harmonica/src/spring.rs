//! Damped harmonic oscillator (spring) implementation.
//!
//! The closed-form coefficients follow Ryan Juckett's damped harmonic motion
//! derivation. Unlike a fixed-framerate spring, the coefficients here are
//! derived per step so a display-refresh driver can feed whatever time delta
//! the last frame actually took.
//!
//! For background on the algorithm see:
//! <https://www.ryanjuckett.com/damped-springs/>
//!
//! # License
//!
//! ```text
//! Copyright (c) 2008-2012 Ryan Juckett
//! http://www.ryanjuckett.com/
//!
//! This software is provided 'as-is', without any express or implied
//! warranty. In no event will the authors be held liable for any damages
//! arising from the use of this software.
//!
//! Permission is granted to anyone to use this software for any purpose,
//! including commercial applications, and to alter it and redistribute it
//! freely, subject to the following restrictions:
//!
//! 1. The origin of this software must not be misrepresented; you must not
//!    claim that you wrote the original software. If you use this software
//!    in a product, an acknowledgment in the product documentation would be
//!    appreciated but is not required.
//!
//! 2. Altered source versions must be plainly marked as such, and must not be
//!    misrepresented as being the original software.
//!
//! 3. This notice may not be removed or altered from any source
//!    distribution.
//! ```

/// Machine epsilon for floating point comparisons.
const EPSILON: f64 = f64::EPSILON;

/// Position delta below which a [`SpringValue`] counts as settled.
pub const REST_POSITION_THRESHOLD: f64 = 1e-3;

/// Velocity below which a [`SpringValue`] counts as settled.
pub const REST_VELOCITY_THRESHOLD: f64 = 1e-2;

/// Returns a time delta for a given number of frames per second.
///
/// # Example
///
/// ```rust
/// use harmonica::fps;
///
/// assert!((fps(60) - 1.0 / 60.0).abs() < 1e-12);
/// ```
#[inline]
pub fn fps(n: u32) -> f64 {
    1.0 / n as f64
}

/// Shape of a spring, independent of the time step.
///
/// A `SpringConfig` is either given directly as angular frequency and damping
/// ratio, or derived from the physical description most UI code uses
/// (stiffness, damping, mass) with [`SpringConfig::from_physical`].
///
/// # Example
///
/// ```rust
/// use harmonica::SpringConfig;
///
/// let config = SpringConfig::from_physical(100.0, 30.0, 2.0);
/// assert!(config.damping_ratio() > 1.0); // over-damped, never overshoots
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    angular_frequency: f64,
    damping_ratio: f64,
}

impl SpringConfig {
    /// Creates a config from angular frequency (rad/s) and damping ratio.
    ///
    /// Negative values are clamped to zero.
    pub fn new(angular_frequency: f64, damping_ratio: f64) -> Self {
        Self {
            angular_frequency: angular_frequency.max(0.0),
            damping_ratio: damping_ratio.max(0.0),
        }
    }

    /// Creates a config from stiffness (k), damping coefficient (c) and mass (m).
    ///
    /// Uses `ω = √(k/m)` and `ζ = c / (2√(k·m))`. A non-positive mass or
    /// stiffness yields a spring that never moves.
    pub fn from_physical(stiffness: f64, damping: f64, mass: f64) -> Self {
        if stiffness <= 0.0 || mass <= 0.0 {
            return Self::new(0.0, 0.0);
        }
        let angular_frequency = (stiffness / mass).sqrt();
        let damping_ratio = damping.max(0.0) / (2.0 * (stiffness * mass).sqrt());
        Self::new(angular_frequency, damping_ratio)
    }

    /// Angular frequency in radians per second.
    pub fn angular_frequency(&self) -> f64 {
        self.angular_frequency
    }

    /// Damping ratio (ζ).
    pub fn damping_ratio(&self) -> f64 {
        self.damping_ratio
    }

    /// Precomputes the step coefficients for a time delta of `delta_time` seconds.
    pub fn step(&self, delta_time: f64) -> Spring {
        Spring::new(delta_time, self.angular_frequency, self.damping_ratio)
    }
}

/// Precomputed spring motion coefficients for one time step.
///
/// Useful when many values share the same spring shape and the same frame:
/// compute the step once, then call [`Spring::update`] per value.
///
/// # Example
///
/// ```rust
/// use harmonica::{fps, Spring};
///
/// let spring = Spring::new(fps(60), 6.0, 1.0);
/// let (mut pos, mut vel) = (0.0, 0.0);
/// for _ in 0..240 {
///     (pos, vel) = spring.update(pos, vel, 10.0);
/// }
/// assert!((pos - 10.0).abs() < 0.01);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Spring {
    pos_pos_coef: f64,
    pos_vel_coef: f64,
    vel_pos_coef: f64,
    vel_vel_coef: f64,
}

impl Spring {
    /// Computes the coefficients to advance a spring by `delta_time` seconds.
    ///
    /// * `angular_frequency` - speed of motion; zero produces an identity step.
    /// * `damping_ratio` - `> 1` over-damped, `= 1` critical, `< 1` under-damped.
    pub fn new(delta_time: f64, angular_frequency: f64, damping_ratio: f64) -> Self {
        let delta_time = delta_time.max(0.0);
        let angular_frequency = angular_frequency.max(0.0);
        let damping_ratio = damping_ratio.max(0.0);

        if angular_frequency < EPSILON {
            return Self::identity();
        }

        if damping_ratio > 1.0 + EPSILON {
            Self::over_damped(delta_time, angular_frequency, damping_ratio)
        } else if damping_ratio < 1.0 - EPSILON {
            Self::under_damped(delta_time, angular_frequency, damping_ratio)
        } else {
            Self::critically_damped(delta_time, angular_frequency)
        }
    }

    /// A step that leaves position and velocity unchanged.
    pub const fn identity() -> Self {
        Self {
            pos_pos_coef: 1.0,
            pos_vel_coef: 0.0,
            vel_pos_coef: 0.0,
            vel_vel_coef: 1.0,
        }
    }

    fn over_damped(delta_time: f64, angular_frequency: f64, damping_ratio: f64) -> Self {
        let za = -angular_frequency * damping_ratio;
        let zb = angular_frequency * (damping_ratio * damping_ratio - 1.0).sqrt();
        let z1 = za - zb;
        let z2 = za + zb;

        let e1 = (z1 * delta_time).exp();
        let e2 = (z2 * delta_time).exp();

        let inv_two_zb = 1.0 / (2.0 * zb);
        let e1_over_two_zb = e1 * inv_two_zb;
        let e2_over_two_zb = e2 * inv_two_zb;
        let z1e1_over_two_zb = z1 * e1_over_two_zb;
        let z2e2_over_two_zb = z2 * e2_over_two_zb;

        Self {
            pos_pos_coef: e1_over_two_zb * z2 - z2e2_over_two_zb + e2,
            pos_vel_coef: -e1_over_two_zb + e2_over_two_zb,
            vel_pos_coef: (z1e1_over_two_zb - z2e2_over_two_zb + e2) * z2,
            vel_vel_coef: -z1e1_over_two_zb + z2e2_over_two_zb,
        }
    }

    fn under_damped(delta_time: f64, angular_frequency: f64, damping_ratio: f64) -> Self {
        let omega_zeta = angular_frequency * damping_ratio;
        let alpha = angular_frequency * (1.0 - damping_ratio * damping_ratio).sqrt();

        let exp_term = (-omega_zeta * delta_time).exp();
        let cos_term = (alpha * delta_time).cos();
        let sin_term = (alpha * delta_time).sin();
        let inv_alpha = 1.0 / alpha;

        let exp_sin = exp_term * sin_term;
        let exp_cos = exp_term * cos_term;
        let exp_omega_zeta_sin_over_alpha = exp_term * omega_zeta * sin_term * inv_alpha;

        Self {
            pos_pos_coef: exp_cos + exp_omega_zeta_sin_over_alpha,
            pos_vel_coef: exp_sin * inv_alpha,
            vel_pos_coef: -exp_sin * alpha - omega_zeta * exp_omega_zeta_sin_over_alpha,
            vel_vel_coef: exp_cos - exp_omega_zeta_sin_over_alpha,
        }
    }

    fn critically_damped(delta_time: f64, angular_frequency: f64) -> Self {
        let exp_term = (-angular_frequency * delta_time).exp();
        let time_exp = delta_time * exp_term;
        let time_exp_freq = time_exp * angular_frequency;

        Self {
            pos_pos_coef: time_exp_freq + exp_term,
            pos_vel_coef: time_exp,
            vel_pos_coef: -angular_frequency * time_exp_freq,
            vel_vel_coef: -time_exp_freq + exp_term,
        }
    }

    /// Advances `(pos, vel)` one step toward `equilibrium_pos`.
    ///
    /// Returns `(new_position, new_velocity)`.
    #[inline]
    pub fn update(&self, pos: f64, vel: f64, equilibrium_pos: f64) -> (f64, f64) {
        let old_pos = pos - equilibrium_pos;
        let old_vel = vel;

        let new_pos = old_pos * self.pos_pos_coef + old_vel * self.pos_vel_coef + equilibrium_pos;
        let new_vel = old_pos * self.vel_pos_coef + old_vel * self.vel_vel_coef;

        (new_pos, new_vel)
    }
}

/// A single animated scalar: position, velocity and the target it chases.
///
/// This is the shape animation code usually wants: set a target from an
/// input handler, then call [`SpringValue::advance`] once per frame with the
/// frame's elapsed seconds.
///
/// # Example
///
/// ```rust
/// use harmonica::{SpringConfig, SpringValue};
///
/// let mut scale = SpringValue::new(1.0, SpringConfig::from_physical(100.0, 30.0, 2.0));
/// scale.set_target(1.1);
/// for _ in 0..300 {
///     scale.advance(1.0 / 60.0);
/// }
/// assert!((scale.position() - 1.1).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringValue {
    position: f64,
    velocity: f64,
    target: f64,
    config: SpringConfig,
}

impl SpringValue {
    /// Creates a value resting at `initial`.
    pub fn new(initial: f64, config: SpringConfig) -> Self {
        Self {
            position: initial,
            velocity: 0.0,
            target: initial,
            config,
        }
    }

    /// Current position.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Current velocity in units per second.
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Position the spring is converging toward.
    pub fn target(&self) -> f64 {
        self.target
    }

    /// The spring shape driving this value.
    pub fn config(&self) -> SpringConfig {
        self.config
    }

    /// Retargets the value; momentum is preserved.
    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    /// Jumps to `position` with zero velocity and makes it the target.
    pub fn snap_to(&mut self, position: f64) {
        self.position = position;
        self.velocity = 0.0;
        self.target = position;
    }

    /// Integrates `delta_time` seconds of motion.
    pub fn advance(&mut self, delta_time: f64) {
        if delta_time <= 0.0 {
            return;
        }
        let step = self.config.step(delta_time);
        (self.position, self.velocity) = step.update(self.position, self.velocity, self.target);
    }

    /// Whether the value has settled on its target.
    pub fn is_at_rest(&self) -> bool {
        (self.position - self.target).abs() < REST_POSITION_THRESHOLD
            && self.velocity.abs() < REST_VELOCITY_THRESHOLD
    }
}
