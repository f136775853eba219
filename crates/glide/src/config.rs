//! Tunables for every engine.
//!
//! [`MotionConfig`] is the single source of truth for recognised options,
//! independent of where they came from (defaults, a TOML file, CLI flags or
//! JavaScript). Every field has a default, so a config file only needs the
//! keys it changes:
//!
//! ```toml
//! [track]
//! speed = 80.0
//! direction = "right"
//! pause_on_hover = false
//!
//! [tilt]
//! rotate_amplitude = 10.0
//! touch_grace_ms = 1500
//! ```
//!
//! ```rust
//! use glide::config::MotionConfig;
//! use glide::track::Direction;
//!
//! let config = MotionConfig::from_toml_str("[track]\ndirection = \"up\"\n").unwrap();
//! assert_eq!(config.track.direction, Direction::Up);
//! assert_eq!(config.tilt.rotate_amplitude, 14.0);
//! ```

use std::path::Path;
use std::time::Duration;

use harmonica::SpringConfig;
use serde::{Deserialize, Serialize};

use crate::clock::MAX_FRAME_DELTA;
use crate::error::{Error, Result};
use crate::track::Direction;

/// All engine tunables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MotionConfig {
    /// Refresh driver settings.
    pub clock: ClockConfig,
    /// Looped marquee settings.
    pub track: TrackConfig,
    /// Pointer-tilt settings.
    pub tilt: TiltConfig,
    /// Viewport gate settings.
    pub gate: GateConfig,
}

impl MotionConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseConfig`] on malformed TOML or unknown keys and
    /// [`Error::InvalidConfig`] when a value is out of range.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReadConfig`] if the file cannot be read, otherwise as
    /// [`MotionConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| Error::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "loaded motion config");
        Ok(config)
    }

    /// Renders the config as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EncodeConfig`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks every value is finite and within its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        self.clock.validate()?;
        self.track.validate()?;
        self.tilt.validate()?;
        self.gate.validate()
    }
}

fn ensure(field: &'static str, ok: bool, reason: impl Into<String>) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(Error::InvalidConfig {
            field,
            reason: reason.into(),
        })
    }
}

/// Refresh driver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClockConfig {
    /// Largest elapsed time handed to a tick, in seconds.
    pub max_frame_delta: f64,
    /// Forces the reduced-motion decision; `None` asks the platform.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduced_motion: Option<bool>,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            max_frame_delta: MAX_FRAME_DELTA,
            reduced_motion: None,
        }
    }
}

impl ClockConfig {
    fn validate(&self) -> Result<()> {
        ensure(
            "clock.max_frame_delta",
            self.max_frame_delta.is_finite() && self.max_frame_delta > 0.0,
            "must be a positive number of seconds",
        )
    }
}

/// Looped marquee settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackConfig {
    /// Autoplay speed in px/s. A negative speed reverses `direction`.
    pub speed: f64,
    /// Travel direction.
    pub direction: Direction,
    /// Speed while hovered. Takes precedence over `pause_on_hover`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover_speed: Option<f64>,
    /// `true` pauses on hover, `false` disables hover behaviour.
    /// Unset behaves like `true` unless `hover_speed` is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause_on_hover: Option<bool>,
    /// Velocity smoothing time constant, in seconds.
    pub smoothing_tau: f64,
    /// Largest release velocity carried into momentum, in px/s.
    pub momentum_clamp: f64,
    /// How long release momentum overrides autoplay.
    pub momentum_decay_ms: u64,
    /// Shortest interval between drag samples used for velocity estimates.
    pub min_drag_sample_ms: f64,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            speed: 120.0,
            direction: Direction::Left,
            hover_speed: None,
            pause_on_hover: None,
            smoothing_tau: 0.1,
            momentum_clamp: 500.0,
            momentum_decay_ms: 1000,
            min_drag_sample_ms: 1.0,
        }
    }
}

impl TrackConfig {
    /// Resolves the hover speed: `None` means hovering changes nothing.
    ///
    /// ```rust
    /// use glide::config::TrackConfig;
    ///
    /// let mut config = TrackConfig::default();
    /// assert_eq!(config.effective_hover_speed(), Some(0.0));
    /// config.pause_on_hover = Some(false);
    /// assert_eq!(config.effective_hover_speed(), None);
    /// config.hover_speed = Some(30.0);
    /// assert_eq!(config.effective_hover_speed(), Some(30.0));
    /// ```
    pub fn effective_hover_speed(&self) -> Option<f64> {
        match (self.hover_speed, self.pause_on_hover) {
            (Some(speed), _) => Some(speed),
            (None, Some(false)) => None,
            (None, Some(true) | None) => Some(0.0),
        }
    }

    /// Momentum window as a [`Duration`].
    pub fn momentum_decay(&self) -> Duration {
        Duration::from_millis(self.momentum_decay_ms)
    }

    /// Minimum drag sample interval in seconds.
    pub fn min_drag_sample_secs(&self) -> f64 {
        self.min_drag_sample_ms / 1000.0
    }

    fn validate(&self) -> Result<()> {
        ensure("track.speed", self.speed.is_finite(), "must be finite")?;
        if let Some(hover) = self.hover_speed {
            ensure("track.hover_speed", hover.is_finite(), "must be finite")?;
        }
        ensure(
            "track.smoothing_tau",
            self.smoothing_tau.is_finite() && self.smoothing_tau >= 0.0,
            "must be a non-negative number of seconds",
        )?;
        ensure(
            "track.momentum_clamp",
            self.momentum_clamp.is_finite() && self.momentum_clamp >= 0.0,
            "must be non-negative",
        )?;
        ensure(
            "track.min_drag_sample_ms",
            self.min_drag_sample_ms.is_finite() && self.min_drag_sample_ms > 0.0,
            "must be positive",
        )
    }
}

/// Physical description of a spring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpringParams {
    /// Restoring force per unit displacement.
    pub stiffness: f64,
    /// Velocity drag.
    pub damping: f64,
    /// Inertia.
    pub mass: f64,
}

impl SpringParams {
    /// Creates spring parameters.
    pub const fn new(stiffness: f64, damping: f64, mass: f64) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// The integrator shape for these parameters.
    pub fn spring_config(&self) -> SpringConfig {
        SpringConfig::from_physical(self.stiffness, self.damping, self.mass)
    }

    fn validate(&self, field: &'static str) -> Result<()> {
        ensure(
            field,
            self.stiffness.is_finite() && self.stiffness > 0.0,
            "stiffness must be positive",
        )?;
        ensure(
            field,
            self.damping.is_finite() && self.damping >= 0.0,
            "damping must be non-negative",
        )?;
        ensure(
            field,
            self.mass.is_finite() && self.mass > 0.0,
            "mass must be positive",
        )
    }
}

/// Pointer-tilt settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TiltConfig {
    /// Rotation reached at the surface edge, in degrees.
    pub rotate_amplitude: f64,
    /// Scale while a pointer is over the surface.
    pub scale_on_hover: f64,
    /// How long a touch pose is held after the finger lifts.
    pub touch_grace_ms: u64,
    /// Caption rotation per pixel of vertical pointer travel between samples.
    pub caption_velocity_gain: f64,
    /// Spring for both rotations and the scale.
    pub rotation_spring: SpringParams,
    /// Spring for the caption rotation.
    pub caption_spring: SpringParams,
    /// Spring for the caption opacity.
    pub opacity_spring: SpringParams,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            rotate_amplitude: 14.0,
            scale_on_hover: 1.1,
            touch_grace_ms: 2000,
            caption_velocity_gain: 0.6,
            rotation_spring: SpringParams::new(100.0, 30.0, 2.0),
            caption_spring: SpringParams::new(350.0, 30.0, 1.0),
            opacity_spring: SpringParams::new(100.0, 10.0, 1.0),
        }
    }
}

impl TiltConfig {
    /// Touch grace period as a [`Duration`].
    pub fn touch_grace(&self) -> Duration {
        Duration::from_millis(self.touch_grace_ms)
    }

    fn validate(&self) -> Result<()> {
        ensure(
            "tilt.rotate_amplitude",
            self.rotate_amplitude.is_finite(),
            "must be finite",
        )?;
        ensure(
            "tilt.scale_on_hover",
            self.scale_on_hover.is_finite() && self.scale_on_hover > 0.0,
            "must be positive",
        )?;
        ensure(
            "tilt.caption_velocity_gain",
            self.caption_velocity_gain.is_finite(),
            "must be finite",
        )?;
        self.rotation_spring.validate("tilt.rotation_spring")?;
        self.caption_spring.validate("tilt.caption_spring")?;
        self.opacity_spring.validate("tilt.opacity_spring")
    }
}

/// Viewport gate settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
    /// Visible fraction required before an element counts as seen.
    pub threshold: f64,
    /// Margin grown around the viewport, in CSS margin syntax.
    pub root_margin: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: "50px".to_string(),
        }
    }
}

impl GateConfig {
    fn validate(&self) -> Result<()> {
        ensure(
            "gate.threshold",
            (0.0..=1.0).contains(&self.threshold),
            "must be between 0 and 1",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = MotionConfig::default();
        assert_eq!(config.clock.max_frame_delta, 0.1);
        assert_eq!(config.track.speed, 120.0);
        assert_eq!(config.track.momentum_clamp, 500.0);
        assert_eq!(config.track.momentum_decay(), Duration::from_secs(1));
        assert_eq!(config.tilt.touch_grace(), Duration::from_secs(2));
        assert_eq!(config.tilt.rotate_amplitude, 14.0);
        assert_eq!(config.tilt.scale_on_hover, 1.1);
        assert_eq!(config.gate.threshold, 0.1);
        assert_eq!(config.gate.root_margin, "50px");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(MotionConfig::from_toml_str("").unwrap(), MotionConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = MotionConfig::from_toml_str(
            r#"
            [tilt]
            touch_grace_ms = 500

            [tilt.caption_spring]
            stiffness = 200.0
            damping = 20.0
            mass = 1.0
            "#,
        )
        .unwrap();
        assert_eq!(config.tilt.touch_grace_ms, 500);
        assert_eq!(config.tilt.caption_spring.stiffness, 200.0);
        assert_eq!(config.tilt.rotation_spring, SpringParams::new(100.0, 30.0, 2.0));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = MotionConfig::from_toml_str("[track]\nsped = 3.0\n").unwrap_err();
        assert!(matches!(err, Error::ParseConfig(_)));
    }

    #[test]
    fn invalid_values_name_the_field() {
        let err = MotionConfig::from_toml_str("[gate]\nthreshold = 1.5\n").unwrap_err();
        match err {
            Error::InvalidConfig { field, .. } => assert_eq!(field, "gate.threshold"),
            other => panic!("unexpected error: {other}"),
        }

        let err = MotionConfig::from_toml_str("[track]\nsmoothing_tau = -1.0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { field: "track.smoothing_tau", .. }));
    }

    #[test]
    fn zero_mass_spring_is_rejected() {
        let mut config = MotionConfig::default();
        config.tilt.rotation_spring.mass = 0.0;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfig { field: "tilt.rotation_spring", .. })
        ));
    }

    #[test]
    fn toml_round_trip_preserves_overrides() {
        let mut config = MotionConfig::default();
        config.track.direction = Direction::Down;
        config.track.hover_speed = Some(15.0);
        config.clock.reduced_motion = Some(true);

        let text = config.to_toml_string().unwrap();
        assert_eq!(MotionConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn hover_speed_resolution() {
        let mut config = TrackConfig::default();
        assert_eq!(config.effective_hover_speed(), Some(0.0));

        config.pause_on_hover = Some(true);
        assert_eq!(config.effective_hover_speed(), Some(0.0));

        config.pause_on_hover = Some(false);
        assert_eq!(config.effective_hover_speed(), None);

        config.hover_speed = Some(-20.0);
        assert_eq!(config.effective_hover_speed(), Some(-20.0));
    }

    #[test]
    fn load_reads_file_and_reports_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("motion.toml");
        std::fs::write(&path, "[tilt]\ntouch_grace_ms = 500\n").unwrap();

        let config = MotionConfig::load(&path).unwrap();
        assert_eq!(config.tilt.touch_grace(), Duration::from_millis(500));

        let missing = dir.path().join("absent.toml");
        match MotionConfig::load(&missing) {
            Err(Error::ReadConfig { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected ReadConfig, got {other:?}"),
        }
    }
}
