//! Pointer-driven 3D tilt.
//!
//! A [`TiltResponder`] maps a pointer (or finger) position over a surface to
//! a rotation pose. Every channel chases its target through its own damped
//! spring, so the rendered pose is always continuous:
//!
//! | channel            | target source                                  |
//! |--------------------|------------------------------------------------|
//! | `rotate_x`         | vertical offset from centre, inverted          |
//! | `rotate_y`         | horizontal offset from centre                  |
//! | `caption_rotation` | vertical pointer velocity between samples      |
//! | `scale`            | `scale_on_hover` while active                  |
//! | `caption_opacity`  | 1 while a mouse hovers                         |
//!
//! Mouse interaction resets as soon as the pointer leaves. Touch has no hover
//! signal, so the pose is held for a grace period after the finger lifts and
//! only then reset; touching or entering again inside the window keeps it.

use std::time::Duration;

use harmonica::SpringValue;
use tracing::{debug, trace};

use crate::config::TiltConfig;
use crate::geometry::{Point, Rect};
use crate::timer::OneShotTimer;

/// Interaction phase of a [`TiltResponder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TiltPhase {
    /// No pointer over the surface; every target is at rest.
    #[default]
    Idle,
    /// A pointer or finger is driving the pose.
    Active,
}

/// A rendered tilt pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltPose {
    /// Rotation about the horizontal axis, degrees.
    pub rotate_x: f64,
    /// Rotation about the vertical axis, degrees.
    pub rotate_y: f64,
    /// Rotation of the floating caption, degrees.
    pub caption_rotation: f64,
    /// Uniform scale of the surface.
    pub scale: f64,
    /// Caption opacity in `[0, 1]`.
    pub caption_opacity: f64,
    /// Caption anchor relative to the surface's top-left corner.
    pub caption_anchor: Point,
}

impl TiltPose {
    /// The resting pose.
    pub const REST: Self = Self {
        rotate_x: 0.0,
        rotate_y: 0.0,
        caption_rotation: 0.0,
        scale: 1.0,
        caption_opacity: 0.0,
        caption_anchor: Point::new(0.0, 0.0),
    };

    /// CSS `transform` for the surface.
    ///
    /// ```rust
    /// use glide::tilt::TiltPose;
    ///
    /// assert_eq!(TiltPose::REST.surface_css(), "rotateX(0deg) rotateY(0deg) scale(1)");
    /// ```
    pub fn surface_css(&self) -> String {
        format!(
            "rotateX({}deg) rotateY({}deg) scale({})",
            self.rotate_x, self.rotate_y, self.scale
        )
    }

    /// CSS `transform` for the caption.
    pub fn caption_css(&self) -> String {
        format!(
            "translate3d({}px, {}px, 0) rotate({}deg)",
            self.caption_anchor.x, self.caption_anchor.y, self.caption_rotation
        )
    }

    /// Whether every channel is at its resting value.
    pub fn is_rest(&self) -> bool {
        self.rotate_x == 0.0
            && self.rotate_y == 0.0
            && self.caption_rotation == 0.0
            && self.scale == 1.0
            && self.caption_opacity == 0.0
    }
}

impl Default for TiltPose {
    fn default() -> Self {
        Self::REST
    }
}

/// Spring-damped pointer tilt for one surface.
#[derive(Debug, Clone)]
pub struct TiltResponder {
    config: TiltConfig,
    phase: TiltPhase,
    rotate_x: SpringValue,
    rotate_y: SpringValue,
    caption: SpringValue,
    scale: SpringValue,
    opacity: SpringValue,
    anchor: Point,
    last_offset_y: f64,
    reset: OneShotTimer,
}

impl Default for TiltResponder {
    fn default() -> Self {
        Self::new(TiltConfig::default())
    }
}

impl TiltResponder {
    /// Creates an idle responder.
    pub fn new(config: TiltConfig) -> Self {
        let rotation = config.rotation_spring.spring_config();
        let caption = config.caption_spring.spring_config();
        let opacity = config.opacity_spring.spring_config();
        Self {
            phase: TiltPhase::Idle,
            rotate_x: SpringValue::new(0.0, rotation),
            rotate_y: SpringValue::new(0.0, rotation),
            caption: SpringValue::new(0.0, caption),
            scale: SpringValue::new(1.0, rotation),
            opacity: SpringValue::new(0.0, opacity),
            anchor: Point::default(),
            last_offset_y: 0.0,
            reset: OneShotTimer::new(),
            config,
        }
    }

    /// Mouse entered the surface.
    pub fn on_pointer_enter(&mut self) {
        self.cancel_reset();
        self.scale.set_target(self.config.scale_on_hover);
        self.opacity.set_target(1.0);
        self.phase = TiltPhase::Active;
    }

    /// Pointer sample at `at` over a surface measured as `surface`.
    ///
    /// Ignored while idle or when the surface has no size.
    pub fn on_pointer_move(&mut self, at: Point, surface: Rect) {
        if self.phase == TiltPhase::Idle || !surface.is_measured() {
            return;
        }
        let center = surface.center();
        let half_width = surface.width / 2.0;
        let half_height = surface.height / 2.0;
        // Samples outside the surface (a dragged finger) pin to its edge.
        let offset_x = (at.x - center.x).clamp(-half_width, half_width);
        let offset_y = (at.y - center.y).clamp(-half_height, half_height);
        let amplitude = self.config.rotate_amplitude;

        self.rotate_x.set_target(offset_y / half_height * -amplitude);
        self.rotate_y.set_target(offset_x / half_width * amplitude);

        let velocity_y = offset_y - self.last_offset_y;
        self.caption.set_target(-velocity_y * self.config.caption_velocity_gain);
        self.last_offset_y = offset_y;

        self.anchor = surface.local(at);
        trace!(offset_x, offset_y, "tilt: pointer sample");
    }

    /// Mouse left the surface: every target returns to rest immediately.
    pub fn on_pointer_leave_mouse(&mut self) {
        self.cancel_reset();
        self.reset_targets();
    }

    /// Finger down at `at`.
    pub fn on_touch_start(&mut self, at: Point, surface: Rect) {
        self.cancel_reset();
        self.scale.set_target(self.config.scale_on_hover);
        self.phase = TiltPhase::Active;
        self.on_pointer_move(at, surface);
    }

    /// Finger moved to `at`.
    pub fn on_touch_move(&mut self, at: Point, surface: Rect) {
        self.on_pointer_move(at, surface);
    }

    /// Finger lifted: the pose is held for the grace period, then reset.
    ///
    /// Lifting again replaces the pending reset rather than adding one.
    pub fn on_touch_end(&mut self) {
        let grace = self.config.touch_grace();
        self.reset.schedule(grace);
        debug!(grace_ms = grace.as_millis(), "tilt: reset scheduled");
    }

    /// Advances the springs and the grace timer by `delta_seconds`.
    ///
    /// A zero-length tick snaps every channel onto its target.
    pub fn tick(&mut self, delta_seconds: f64) {
        let dt = if delta_seconds.is_finite() {
            delta_seconds.max(0.0)
        } else {
            0.0
        };

        if self.reset.advance(dt) {
            debug!("tilt: grace period elapsed");
            self.reset_targets();
        }

        for channel in self.channels_mut() {
            if dt == 0.0 {
                channel.snap_to(channel.target());
                continue;
            }
            channel.advance(dt);
            if channel.is_at_rest() {
                channel.snap_to(channel.target());
            }
        }
    }

    /// Pose to render this frame.
    pub fn pose(&self) -> TiltPose {
        TiltPose {
            rotate_x: self.rotate_x.position(),
            rotate_y: self.rotate_y.position(),
            caption_rotation: self.caption.position(),
            scale: self.scale.position(),
            caption_opacity: self.opacity.position().clamp(0.0, 1.0),
            caption_anchor: self.anchor,
        }
    }

    /// Pose the springs are converging toward.
    pub fn target_pose(&self) -> TiltPose {
        TiltPose {
            rotate_x: self.rotate_x.target(),
            rotate_y: self.rotate_y.target(),
            caption_rotation: self.caption.target(),
            scale: self.scale.target(),
            caption_opacity: self.opacity.target(),
            caption_anchor: self.anchor,
        }
    }

    /// Current interaction phase.
    pub fn phase(&self) -> TiltPhase {
        self.phase
    }

    /// Whether a touch grace reset is waiting to fire.
    pub fn is_reset_pending(&self) -> bool {
        self.reset.is_pending()
    }

    /// Time left before the pending touch reset.
    pub fn reset_remaining(&self) -> Option<Duration> {
        self.reset.remaining()
    }

    /// Whether every spring has settled on its target.
    pub fn is_at_rest(&self) -> bool {
        [
            &self.rotate_x,
            &self.rotate_y,
            &self.caption,
            &self.scale,
            &self.opacity,
        ]
        .iter()
        .all(|channel| channel.is_at_rest())
    }

    /// Tunables in effect.
    pub fn config(&self) -> &TiltConfig {
        &self.config
    }

    /// Drops any pending reset on unmount.
    pub fn cancel_interactions(&mut self) {
        self.cancel_reset();
    }

    fn channels_mut(&mut self) -> [&mut SpringValue; 5] {
        [
            &mut self.rotate_x,
            &mut self.rotate_y,
            &mut self.caption,
            &mut self.scale,
            &mut self.opacity,
        ]
    }

    fn cancel_reset(&mut self) {
        if self.reset.cancel() {
            debug!("tilt: pending reset cancelled");
        }
    }

    fn reset_targets(&mut self) {
        self.rotate_x.set_target(0.0);
        self.rotate_y.set_target(0.0);
        self.caption.set_target(0.0);
        self.scale.set_target(1.0);
        self.opacity.set_target(0.0);
        self.phase = TiltPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f64 = 1.0 / 60.0;

    fn surface() -> Rect {
        Rect::new(100.0, 50.0, 300.0, 200.0)
    }

    fn run(responder: &mut TiltResponder, seconds: f64) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let frames = (seconds / FRAME).round() as usize;
        for _ in 0..frames {
            responder.tick(FRAME);
        }
    }

    #[test]
    fn idle_pose_is_rest() {
        let mut tilt = TiltResponder::default();
        assert!(tilt.pose().is_rest());
        run(&mut tilt, 1.0);
        assert!(tilt.pose().is_rest());
        assert_eq!(tilt.phase(), TiltPhase::Idle);
    }

    #[test]
    fn top_left_corner_reaches_amplitude() {
        let mut tilt = TiltResponder::default();
        tilt.on_pointer_enter();
        tilt.on_pointer_move(Point::new(100.0, 50.0), surface());

        let target = tilt.target_pose();
        assert_eq!(target.rotate_x, 14.0);
        assert_eq!(target.rotate_y, -14.0);

        run(&mut tilt, 2.0);
        let pose = tilt.pose();
        assert!((pose.rotate_x - 14.0).abs() < 0.01);
        assert!((pose.rotate_y + 14.0).abs() < 0.01);
        assert!(pose.rotate_x <= 14.0 + 1e-9);
        assert!(pose.rotate_y >= -14.0 - 1e-9);
        assert!((pose.scale - 1.1).abs() < 1e-3);
    }

    #[test]
    fn centre_is_flat() {
        let mut tilt = TiltResponder::default();
        tilt.on_pointer_enter();
        tilt.on_pointer_move(Point::new(250.0, 150.0), surface());
        let target = tilt.target_pose();
        assert_eq!(target.rotate_x, 0.0);
        assert_eq!(target.rotate_y, 0.0);
        assert_eq!(target.caption_anchor, Point::new(150.0, 100.0));
    }

    #[test]
    fn caption_follows_vertical_velocity() {
        let mut tilt = TiltResponder::default();
        tilt.on_pointer_enter();
        // Centre y is 150; first sample 10px below centre.
        tilt.on_pointer_move(Point::new(250.0, 160.0), surface());
        assert!((tilt.target_pose().caption_rotation + 6.0).abs() < 1e-9);
        // Same position again: no vertical velocity.
        tilt.on_pointer_move(Point::new(260.0, 160.0), surface());
        assert_eq!(tilt.target_pose().caption_rotation, 0.0);
        // Move up 20px.
        tilt.on_pointer_move(Point::new(260.0, 140.0), surface());
        assert!((tilt.target_pose().caption_rotation - 12.0).abs() < 1e-9);
    }

    #[test]
    fn mouse_leave_resets_immediately() {
        let mut tilt = TiltResponder::default();
        tilt.on_pointer_enter();
        tilt.on_pointer_move(Point::new(400.0, 250.0), surface());
        run(&mut tilt, 0.3);
        tilt.on_pointer_leave_mouse();

        assert_eq!(tilt.phase(), TiltPhase::Idle);
        let target = tilt.target_pose();
        assert!(target.is_rest());

        run(&mut tilt, 3.0);
        assert!(tilt.pose().is_rest());
        assert!(tilt.is_at_rest());
    }

    #[test]
    fn moves_while_idle_are_ignored() {
        let mut tilt = TiltResponder::default();
        tilt.on_pointer_move(Point::new(100.0, 50.0), surface());
        assert!(tilt.target_pose().is_rest());
    }

    #[test]
    fn touch_outside_surface_stays_within_amplitude() {
        let mut tilt = TiltResponder::default();
        tilt.on_touch_start(Point::new(250.0, 150.0), surface());
        tilt.on_touch_move(Point::new(900.0, -400.0), surface());

        let target = tilt.target_pose();
        assert_eq!(target.rotate_x, 14.0);
        assert_eq!(target.rotate_y, 14.0);
        // Vertical travel is measured from the pinned edge, not the raw finger.
        assert!((target.caption_rotation - 60.0).abs() < 1e-9);

        tilt.on_touch_move(Point::new(-500.0, 1200.0), surface());
        let target = tilt.target_pose();
        assert_eq!(target.rotate_x, -14.0);
        assert_eq!(target.rotate_y, -14.0);

        run(&mut tilt, 1.5);
        let pose = tilt.pose();
        assert!(pose.rotate_x.abs() <= 14.0 + 1e-6);
        assert!(pose.rotate_y.abs() <= 14.0 + 1e-6);
    }

    #[test]
    fn zero_sized_surface_is_ignored() {
        let mut tilt = TiltResponder::default();
        tilt.on_pointer_enter();
        tilt.on_pointer_move(Point::new(10.0, 10.0), Rect::new(0.0, 0.0, 0.0, 100.0));
        let target = tilt.target_pose();
        assert_eq!(target.rotate_x, 0.0);
        assert_eq!(target.rotate_y, 0.0);
        assert!(target.rotate_x.is_finite());
    }

    #[test]
    fn touch_holds_pose_for_grace_period() {
        let mut tilt = TiltResponder::default();
        tilt.on_touch_start(Point::new(400.0, 250.0), surface());
        assert_eq!(tilt.phase(), TiltPhase::Active);
        tilt.on_touch_end();

        run(&mut tilt, 1.9);
        assert_eq!(tilt.phase(), TiltPhase::Active);
        assert!(tilt.is_reset_pending());

        run(&mut tilt, 0.2);
        assert_eq!(tilt.phase(), TiltPhase::Idle);
        assert!(tilt.target_pose().is_rest());
    }

    #[test]
    fn reentry_inside_grace_cancels_reset() {
        let mut tilt = TiltResponder::default();
        tilt.on_touch_start(Point::new(400.0, 250.0), surface());
        tilt.on_touch_end();

        run(&mut tilt, 0.5);
        tilt.on_pointer_enter();
        assert!(!tilt.is_reset_pending());

        run(&mut tilt, 2.5);
        assert_eq!(tilt.phase(), TiltPhase::Active);
        let target = tilt.target_pose();
        assert_eq!(target.rotate_x, -14.0);
        assert_eq!(target.rotate_y, 14.0);
        assert!((tilt.pose().rotate_y - 14.0).abs() < 0.01);
    }

    #[test]
    fn repeated_touch_end_replaces_reset() {
        let mut tilt = TiltResponder::default();
        tilt.on_touch_start(Point::new(250.0, 150.0), surface());
        tilt.on_touch_end();
        run(&mut tilt, 1.5);
        tilt.on_touch_end();
        assert_eq!(tilt.reset_remaining(), Some(Duration::from_secs(2)));

        run(&mut tilt, 1.0);
        assert_eq!(tilt.phase(), TiltPhase::Active);
    }

    #[test]
    fn zero_tick_snaps_to_target() {
        let mut tilt = TiltResponder::default();
        tilt.on_pointer_enter();
        tilt.on_pointer_move(Point::new(100.0, 50.0), surface());
        tilt.tick(0.0);
        let pose = tilt.pose();
        assert_eq!(pose.rotate_x, 14.0);
        assert_eq!(pose.scale, 1.1);
        assert_eq!(pose.caption_opacity, 1.0);
    }

    #[test]
    fn opacity_stays_in_unit_range() {
        let mut tilt = TiltResponder::default();
        tilt.on_pointer_enter();
        for _ in 0..120 {
            tilt.tick(FRAME);
            let opacity = tilt.pose().caption_opacity;
            assert!((0.0..=1.0).contains(&opacity));
        }
    }

    #[test]
    fn css_output() {
        let pose = TiltPose {
            rotate_x: 2.5,
            rotate_y: -3.0,
            caption_rotation: 1.0,
            scale: 1.1,
            caption_opacity: 1.0,
            caption_anchor: Point::new(10.0, 20.0),
        };
        assert_eq!(pose.surface_css(), "rotateX(2.5deg) rotateY(-3deg) scale(1.1)");
        assert_eq!(pose.caption_css(), "translate3d(10px, 20px, 0) rotate(1deg)");
    }
}
