//! Infinite looped marquee.
//!
//! A [`LoopTrack`] scrolls a repeated sequence of items at a smoothed
//! velocity. Three sources compete for the velocity target each tick, in
//! priority order:
//!
//! 1. an active drag (target 0; the pointer writes the offset directly),
//! 2. release momentum, for a fixed window after the drag ends,
//! 3. the hover speed, while hovered and when one is configured,
//! 4. the autoplay speed.
//!
//! The velocity chases the target with exponential smoothing, so every
//! hand-off (hover in/out, release, momentum expiry) is continuous.
//!
//! The offset is always kept in `[0, unit_length)`, where the unit length is
//! one full pass through the item sequence; the renderer translates the strip
//! by `-offset` and repeats the sequence [`Track::copies`] times so the
//! visible window is always covered.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use glide::config::TrackConfig;
//! use glide::geometry::Point;
//! use glide::track::{Direction, LoopTrack, Track};
//!
//! let mut marquee = LoopTrack::new(TrackConfig::default());
//! marquee.configure(Track::new(vec!["rust", "wasm", "css"]), 100.0, Direction::Left);
//! marquee.measure(1000.0, 300.0);
//! assert_eq!(marquee.track().copies(), 6);
//!
//! marquee.tick(0.1);
//! assert!((marquee.offset() - 10.0).abs() < 1e-9);
//!
//! // Scrub backwards by 40px.
//! marquee.on_drag_start(Point::new(500.0, 20.0), Duration::from_millis(0));
//! marquee.on_drag_move(Point::new(540.0, 20.0), Duration::from_millis(125));
//! assert!((marquee.offset() - 270.0).abs() < 1e-9);
//! assert_eq!(marquee.on_drag_end(), Some(-320.0));
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use harmonica::smooth_toward;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TrackConfig;
use crate::geometry::{Axis, Point};
use crate::timer::OneShotTimer;

/// Fewest copies of the sequence ever rendered.
pub const MIN_COPIES: usize = 2;

/// Copies rendered beyond what the container needs.
pub const COPY_HEADROOM: usize = 2;

/// Upper bound on rendered copies, whatever the measured ratio.
pub const MAX_COPIES: usize = 256;

/// Travel direction of a marquee.
///
/// Left and up grow the offset (content moves toward the start edge);
/// right and down shrink it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Content travels toward the left edge.
    #[default]
    Left,
    /// Content travels toward the right edge.
    Right,
    /// Content travels toward the top edge.
    Up,
    /// Content travels toward the bottom edge.
    Down,
}

impl Direction {
    /// All directions.
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];

    /// Axis the direction travels along.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::Horizontal,
            Self::Up | Self::Down => Axis::Vertical,
        }
    }

    /// Sign applied to the offset growth.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Left | Self::Up => 1.0,
            Self::Right | Self::Down => -1.0,
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown direction name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDirectionError(String);

impl fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown direction `{}` (expected left, right, up or down)",
            self.0
        )
    }
}

impl std::error::Error for ParseDirectionError {}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseDirectionError(s.to_string()))
    }
}

/// Autoplay velocity for a signed speed and a direction.
///
/// `|speed| × direction sign`, flipped again when `speed` is negative.
#[must_use]
pub fn autoplay_velocity(speed: f64, direction: Direction) -> f64 {
    let speed_sign = if speed < 0.0 { -1.0 } else { 1.0 };
    speed.abs() * direction.sign() * speed_sign
}

/// Copies of the sequence needed to cover `container_extent`.
///
/// `max(2, ceil(container / sequence) + 2)`, capped at [`MAX_COPIES`], or
/// `None` while the sequence has not been measured.
#[must_use]
pub fn recompute_copies(container_extent: f64, sequence_extent: f64) -> Option<usize> {
    if !sequence_extent.is_finite() || sequence_extent <= 0.0 {
        return None;
    }
    let container = if container_extent.is_finite() {
        container_extent.max(0.0)
    } else {
        0.0
    };
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let fill = (container / sequence_extent).ceil().min(MAX_COPIES as f64) as usize;
    Some(fill.saturating_add(COPY_HEADROOM).clamp(MIN_COPIES, MAX_COPIES))
}

/// Wraps `value` into `[0, length)` with floored modulo.
#[must_use]
pub fn wrap_offset(value: f64, length: f64) -> f64 {
    if length.is_nan() || length <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    let wrapped = value.rem_euclid(length);
    // rem_euclid can round up to `length` for tiny negative inputs.
    if wrapped >= length { 0.0 } else { wrapped }
}

/// The repeated item sequence and its measurements.
#[derive(Debug, Clone, PartialEq)]
pub struct Track<T> {
    items: Vec<T>,
    axis: Axis,
    unit_length: f64,
    copies: usize,
}

impl<T> Track<T> {
    /// Creates an unmeasured horizontal track.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            axis: Axis::Horizontal,
            unit_length: 0.0,
            copies: MIN_COPIES,
        }
    }

    /// Items in one pass of the sequence.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Scroll axis.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Length of one pass in pixels; 0 until measured.
    pub fn unit_length(&self) -> f64 {
        self.unit_length
    }

    /// Copies of the sequence to render.
    pub fn copies(&self) -> usize {
        self.copies
    }

    /// Whether the sequence has a usable measurement.
    pub fn is_measured(&self) -> bool {
        self.unit_length > 0.0
    }

    /// Every rendered item as `(copy, index, item)`, copies in order.
    pub fn rendered(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        (0..self.copies).flat_map(move |copy| {
            self.items
                .iter()
                .enumerate()
                .map(move |(index, item)| (copy, index, item))
        })
    }
}

impl<T> Default for Track<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// State of one press-drag-release gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Where the press happened.
    pub start: Point,
    /// Most recent pointer position.
    pub last: Point,
    /// Timestamp of the most recent sample.
    pub last_sample: Duration,
    /// Offset velocity implied by the latest move, px/s.
    pub velocity: f64,
}

/// Translation the renderer applies to the strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackTransform {
    /// Axis of translation.
    pub axis: Axis,
    /// Signed translation in pixels (the negated offset).
    pub translate: f64,
}

impl TrackTransform {
    /// CSS `transform` value.
    ///
    /// ```rust
    /// use glide::geometry::Axis;
    /// use glide::track::TrackTransform;
    ///
    /// let t = TrackTransform { axis: Axis::Vertical, translate: -12.5 };
    /// assert_eq!(t.to_css(), "translate3d(0, -12.5px, 0)");
    /// ```
    pub fn to_css(&self) -> String {
        match self.axis {
            Axis::Horizontal => format!("translate3d({}px, 0, 0)", self.translate),
            Axis::Vertical => format!("translate3d(0, {}px, 0)", self.translate),
        }
    }
}

/// Velocity-integrated looped marquee with drag-to-scrub and momentum.
#[derive(Debug, Clone)]
pub struct LoopTrack<T> {
    config: TrackConfig,
    track: Track<T>,
    direction: Direction,
    autoplay_target: f64,
    hover_speed: Option<f64>,
    hovered: bool,
    velocity: f64,
    velocity_primed: bool,
    offset: f64,
    drag: Option<DragSession>,
    momentum: f64,
    momentum_timer: OneShotTimer,
    reduced_motion: bool,
}

impl<T> LoopTrack<T> {
    /// Creates an empty, unmeasured track using `config` for tunables.
    ///
    /// The autoplay speed and direction from `config` apply until
    /// [`configure`](Self::configure) is called. Velocity starts at rest and
    /// jumps to the autoplay target on the first non-zero configure.
    pub fn new(config: TrackConfig) -> Self {
        let direction = config.direction;
        let autoplay_target = autoplay_velocity(config.speed, direction);
        let hover_speed = config.effective_hover_speed();
        let mut track = Track::new(Vec::new());
        track.axis = direction.axis();
        Self {
            config,
            track,
            direction,
            autoplay_target,
            hover_speed,
            hovered: false,
            velocity: 0.0,
            velocity_primed: false,
            offset: 0.0,
            drag: None,
            momentum: 0.0,
            momentum_timer: OneShotTimer::new(),
            reduced_motion: false,
        }
    }

    /// Starts at full speed instead of ramping up from rest.
    fn prime_velocity(&mut self) {
        if !self.velocity_primed && self.autoplay_target != 0.0 {
            self.velocity = self.autoplay_target;
            self.velocity_primed = true;
        }
    }

    /// Installs `track` and sets the autoplay velocity to `speed` along `direction`.
    ///
    /// The track's axis follows the direction. Existing measurements are kept
    /// when the axis is unchanged.
    pub fn configure(&mut self, mut track: Track<T>, speed: f64, direction: Direction) {
        track.axis = direction.axis();
        if track.axis == self.track.axis && !track.is_measured() {
            track.unit_length = self.track.unit_length;
            track.copies = self.track.copies;
        }
        self.track = track;
        self.offset = wrap_offset(self.offset, self.track.unit_length);
        self.set_autoplay(speed, direction);
    }

    /// Changes the autoplay speed and direction, keeping the items.
    pub fn set_autoplay(&mut self, speed: f64, direction: Direction) {
        if direction.axis() != self.track.axis {
            self.track.axis = direction.axis();
            self.track.unit_length = 0.0;
            self.track.copies = MIN_COPIES;
            self.offset = 0.0;
        }
        self.direction = direction;
        self.autoplay_target = autoplay_velocity(speed, direction);
        self.prime_velocity();
        debug!(
            speed,
            %direction,
            target = self.autoplay_target,
            "loop track: autoplay configured"
        );
    }

    /// Sets the hover speed; `None` makes hovering a no-op.
    pub fn set_hover_speed(&mut self, hover_speed: Option<f64>) {
        self.hover_speed = hover_speed;
        if hover_speed.is_none() {
            self.hovered = false;
        }
    }

    /// Records pointer hover. Ignored when no hover speed is configured.
    pub fn on_hover_change(&mut self, hovered: bool) {
        if self.hover_speed.is_some() {
            self.hovered = hovered;
        }
    }

    /// Pins the rendered translation to zero.
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    /// Updates measurements after a content, font or container size change.
    ///
    /// Returns `false` (and changes nothing) while the sequence has no size.
    pub fn measure(&mut self, container_extent: f64, sequence_extent: f64) -> bool {
        let Some(copies) = recompute_copies(container_extent, sequence_extent) else {
            return false;
        };
        self.track.unit_length = sequence_extent.ceil();
        self.track.copies = copies;
        self.offset = wrap_offset(self.offset, self.track.unit_length);
        true
    }

    /// Press: autoplay is suspended and the pointer owns the offset.
    pub fn on_drag_start(&mut self, at: Point, timestamp: Duration) {
        self.momentum = 0.0;
        self.momentum_timer.cancel();
        self.drag = Some(DragSession {
            start: at,
            last: at,
            last_sample: timestamp,
            velocity: 0.0,
        });
        debug!(x = at.x, y = at.y, "loop track: drag started");
    }

    /// Move: the offset follows the pointer 1:1 along the track axis.
    pub fn on_drag_move(&mut self, at: Point, timestamp: Duration) {
        let axis = self.track.axis;
        let min_sample = self.config.min_drag_sample_secs();
        let Some(session) = self.drag.as_mut() else {
            return;
        };

        let elapsed = timestamp
            .saturating_sub(session.last_sample)
            .as_secs_f64()
            .max(min_sample);
        let delta = at.along(axis) - session.last.along(axis);

        session.velocity = -delta / elapsed;
        session.last = at;
        session.last_sample = timestamp;

        if self.track.is_measured() {
            self.offset = wrap_offset(self.offset - delta, self.track.unit_length);
        }
    }

    /// Release: the last velocity estimate becomes momentum for a fixed window.
    ///
    /// Returns the momentum applied, or `None` if no drag was active.
    pub fn on_drag_end(&mut self) -> Option<f64> {
        let session = self.drag.take()?;
        let clamp = self.config.momentum_clamp;
        let clamp = if clamp.is_nan() { 0.0 } else { clamp.abs() };
        self.momentum = session.velocity.clamp(-clamp, clamp);
        self.momentum_timer.schedule(self.config.momentum_decay());
        debug!(momentum = self.momentum, "loop track: drag released");
        Some(self.momentum)
    }

    /// Velocity target for the current interaction state.
    pub fn target_velocity(&self) -> f64 {
        if self.drag.is_some() {
            0.0
        } else if self.momentum != 0.0 {
            self.momentum
        } else if let (true, Some(hover)) = (self.hovered, self.hover_speed) {
            hover
        } else {
            self.autoplay_target
        }
    }

    /// Advances the motion by `delta_seconds`.
    ///
    /// Velocity is settled before the offset moves, and the offset is wrapped
    /// before this returns.
    pub fn tick(&mut self, delta_seconds: f64) {
        let dt = if delta_seconds.is_finite() {
            delta_seconds.max(0.0)
        } else {
            0.0
        };

        if self.momentum_timer.advance(dt) {
            self.momentum = 0.0;
            debug!("loop track: momentum expired");
        }

        let target = self.target_velocity();
        self.velocity = smooth_toward(self.velocity, target, dt, self.config.smoothing_tau);

        if self.drag.is_none() && self.track.is_measured() {
            self.offset = wrap_offset(self.offset + self.velocity * dt, self.track.unit_length);
        }
    }

    /// Current offset in `[0, unit_length)`.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Current smoothed velocity, px/s.
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Autoplay velocity, px/s.
    pub fn autoplay_target(&self) -> f64 {
        self.autoplay_target
    }

    /// Release momentum still in effect, px/s.
    pub fn momentum(&self) -> f64 {
        self.momentum
    }

    /// Time left before momentum hands back to autoplay.
    pub fn momentum_remaining(&self) -> Option<Duration> {
        self.momentum_timer.remaining()
    }

    /// Effective hover speed.
    pub fn hover_speed(&self) -> Option<f64> {
        self.hover_speed
    }

    /// Whether the pointer is over the track (and hover matters).
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// The active drag, if any.
    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// Configured direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The item sequence and its measurements.
    pub fn track(&self) -> &Track<T> {
        &self.track
    }

    /// Tunables in effect.
    pub fn config(&self) -> &TrackConfig {
        &self.config
    }

    /// Translation to render this frame.
    pub fn transform(&self) -> TrackTransform {
        let translate = if self.reduced_motion || !self.track.is_measured() {
            0.0
        } else {
            -self.offset
        };
        TrackTransform {
            axis: self.track.axis,
            translate,
        }
    }

    /// Drops interaction state (drag, momentum, hover) on unmount.
    pub fn cancel_interactions(&mut self) {
        self.drag = None;
        self.momentum = 0.0;
        self.momentum_timer.cancel();
        self.hovered = false;
    }
}

/// Counts outstanding assets in a sequence and reports readiness once.
///
/// Measurements taken before images load are wrong, so the sequence is
/// measured again when every image has either loaded or failed.
///
/// ```rust
/// use glide::track::ContentLoader;
///
/// let mut loader = ContentLoader::new(2);
/// assert!(!loader.settle_one());
/// assert!(loader.settle_one());
/// assert!(!loader.settle_one()); // reported once
///
/// let mut empty = ContentLoader::new(0);
/// assert!(empty.take_ready());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentLoader {
    pending: usize,
    reported: bool,
}

impl ContentLoader {
    /// Tracks `pending` assets.
    pub const fn new(pending: usize) -> Self {
        Self {
            pending,
            reported: false,
        }
    }

    /// Assets still loading.
    pub const fn pending(&self) -> usize {
        self.pending
    }

    /// Marks one asset loaded or failed. Returns `true` when that made the
    /// content ready for the first time.
    pub fn settle_one(&mut self) -> bool {
        self.pending = self.pending.saturating_sub(1);
        self.take_ready()
    }

    /// Returns `true` exactly once, as soon as nothing is pending.
    pub fn take_ready(&mut self) -> bool {
        if self.pending == 0 && !self.reported {
            self.reported = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measured(direction: Direction, speed: f64) -> LoopTrack<&'static str> {
        let mut track = LoopTrack::new(TrackConfig::default());
        track.configure(Track::new(vec!["a", "b", "c"]), speed, direction);
        assert!(track.measure(1000.0, 300.0));
        track
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn direction_signs() {
        assert_eq!(autoplay_velocity(100.0, Direction::Left), 100.0);
        assert_eq!(autoplay_velocity(100.0, Direction::Right), -100.0);
        assert_eq!(autoplay_velocity(100.0, Direction::Up), 100.0);
        assert_eq!(autoplay_velocity(100.0, Direction::Down), -100.0);
        assert_eq!(autoplay_velocity(-100.0, Direction::Left), -100.0);
        assert_eq!(autoplay_velocity(-100.0, Direction::Down), 100.0);
    }

    #[test]
    fn direction_axes() {
        assert_eq!(Direction::Left.axis(), Axis::Horizontal);
        assert_eq!(Direction::Right.axis(), Axis::Horizontal);
        assert_eq!(Direction::Up.axis(), Axis::Vertical);
        assert_eq!(Direction::Down.axis(), Axis::Vertical);
    }

    #[test]
    fn direction_parse() {
        assert_eq!("left".parse::<Direction>(), Ok(Direction::Left));
        assert_eq!(" Down ".parse::<Direction>(), Ok(Direction::Down));
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn copies_formula() {
        assert_eq!(recompute_copies(1000.0, 300.0), Some(6));
        assert_eq!(recompute_copies(300.0, 300.0), Some(3));
        assert_eq!(recompute_copies(0.0, 300.0), Some(2));
        assert_eq!(recompute_copies(1000.0, 0.0), None);
        assert_eq!(recompute_copies(1000.0, f64::NAN), None);
    }

    #[test]
    fn copies_are_capped_for_huge_ratios() {
        assert_eq!(recompute_copies(1e300, 1.0), Some(MAX_COPIES));
        assert_eq!(recompute_copies(1000.0, f64::MIN_POSITIVE), Some(MAX_COPIES));
        assert_eq!(recompute_copies(f64::INFINITY, 1.0), Some(MIN_COPIES));
    }

    #[test]
    fn wrap_is_floored() {
        assert_eq!(wrap_offset(-10.0, 300.0), 290.0);
        assert_eq!(wrap_offset(610.0, 300.0), 10.0);
        assert_eq!(wrap_offset(300.0, 300.0), 0.0);
        assert_eq!(wrap_offset(-1e-18, 300.0), 0.0);
        assert_eq!(wrap_offset(5.0, 0.0), 0.0);
    }

    #[test]
    fn starts_at_full_speed() {
        let fresh: LoopTrack<()> = LoopTrack::new(TrackConfig::default());
        assert_eq!(fresh.velocity(), 0.0);

        let track = measured(Direction::Left, 120.0);
        assert_eq!(track.velocity(), 120.0);
    }

    #[test]
    fn left_grows_right_shrinks() {
        let mut left = measured(Direction::Left, 100.0);
        left.tick(0.05);
        assert!((left.offset() - 5.0).abs() < 1e-9);

        let mut right = measured(Direction::Right, 100.0);
        right.tick(0.05);
        assert!((right.offset() - 295.0).abs() < 1e-9);
    }

    #[test]
    fn unmeasured_track_does_not_move() {
        let mut track: LoopTrack<()> = LoopTrack::new(TrackConfig::default());
        track.tick(0.1);
        assert_eq!(track.offset(), 0.0);
        assert!(!track.measure(800.0, 0.0));
        assert_eq!(track.track().copies(), MIN_COPIES);
        assert_eq!(track.transform().translate, 0.0);
    }

    #[test]
    fn unit_length_is_rounded_up() {
        let mut track = measured(Direction::Left, 0.0);
        track.measure(500.0, 212.3);
        assert_eq!(track.track().unit_length(), 213.0);
    }

    #[test]
    fn hover_pauses_by_default() {
        let mut track = measured(Direction::Left, 100.0);
        track.on_hover_change(true);
        assert_eq!(track.target_velocity(), 0.0);
        track.on_hover_change(false);
        assert_eq!(track.target_velocity(), 100.0);
    }

    #[test]
    fn hover_without_speed_is_noop() {
        let config = TrackConfig {
            pause_on_hover: Some(false),
            ..TrackConfig::default()
        };
        let mut track: LoopTrack<()> = LoopTrack::new(config);
        track.on_hover_change(true);
        assert!(!track.is_hovered());
        assert_eq!(track.target_velocity(), 120.0);
    }

    #[test]
    fn drag_moves_offset_against_pointer() {
        let mut track = measured(Direction::Left, 100.0);
        track.on_drag_start(Point::new(100.0, 0.0), ms(0));
        track.on_drag_move(Point::new(90.0, 0.0), ms(50));
        assert!((track.offset() - 10.0).abs() < 1e-9);
        assert!((track.drag().unwrap().velocity - 200.0).abs() < 1e-9);

        // Ticks during the drag never move the offset.
        track.tick(0.1);
        assert!((track.offset() - 10.0).abs() < 1e-9);
        assert_eq!(track.target_velocity(), 0.0);
    }

    #[test]
    fn vertical_drag_uses_y() {
        let mut track = measured(Direction::Up, 100.0);
        track.on_drag_start(Point::new(0.0, 50.0), ms(0));
        track.on_drag_move(Point::new(999.0, 80.0), ms(100));
        assert!((track.offset() - 270.0).abs() < 1e-9);
    }

    #[test]
    fn zero_interval_samples_use_minimum() {
        let mut track = measured(Direction::Left, 100.0);
        track.on_drag_start(Point::new(0.0, 0.0), ms(10));
        track.on_drag_move(Point::new(-1.0, 0.0), ms(10));
        assert!((track.drag().unwrap().velocity - 1000.0).abs() < 1e-6);
        assert_eq!(track.on_drag_end(), Some(500.0));
    }

    #[test]
    fn momentum_expires_after_window() {
        let mut track = measured(Direction::Left, 100.0);
        track.on_drag_start(Point::new(0.0, 0.0), ms(0));
        track.on_drag_move(Point::new(30.0, 0.0), ms(125));
        assert_eq!(track.on_drag_end(), Some(-240.0));

        for _ in 0..9 {
            track.tick(0.1);
            assert_eq!(track.momentum(), -240.0);
        }
        track.tick(0.1);
        assert_eq!(track.momentum(), 0.0);
        assert_eq!(track.target_velocity(), 100.0);
    }

    #[test]
    fn momentum_clamp_sign_is_ignored() {
        let config = TrackConfig {
            momentum_clamp: -200.0,
            ..TrackConfig::default()
        };
        let mut track = LoopTrack::new(config);
        track.configure(Track::new(vec!["a"]), 100.0, Direction::Left);
        track.measure(1000.0, 300.0);

        track.on_drag_start(Point::new(0.0, 0.0), ms(0));
        track.on_drag_move(Point::new(-100.0, 0.0), ms(100));
        assert_eq!(track.on_drag_end(), Some(200.0));

        track.config.momentum_clamp = f64::NAN;
        track.on_drag_start(Point::new(0.0, 0.0), ms(200));
        track.on_drag_move(Point::new(-100.0, 0.0), ms(300));
        assert_eq!(track.on_drag_end(), Some(0.0));
    }

    #[test]
    fn new_drag_cancels_momentum() {
        let mut track = measured(Direction::Left, 100.0);
        track.on_drag_start(Point::default(), ms(0));
        track.on_drag_move(Point::new(10.0, 0.0), ms(20));
        track.on_drag_end();
        assert!(track.momentum_remaining().is_some());

        track.on_drag_start(Point::default(), ms(30));
        assert_eq!(track.momentum(), 0.0);
        assert!(track.momentum_remaining().is_none());
    }

    #[test]
    fn stray_move_and_end_are_ignored() {
        let mut track = measured(Direction::Left, 100.0);
        track.on_drag_move(Point::new(50.0, 0.0), ms(10));
        assert_eq!(track.offset(), 0.0);
        assert_eq!(track.on_drag_end(), None);
    }

    #[test]
    fn reduced_motion_pins_transform() {
        let mut track = measured(Direction::Left, 100.0);
        track.tick(0.1);
        track.set_reduced_motion(true);
        assert_eq!(track.transform().translate, 0.0);
        track.set_reduced_motion(false);
        assert!((track.transform().translate + 10.0).abs() < 1e-9);
    }

    #[test]
    fn rendered_items_cover_copies() {
        let track = measured(Direction::Left, 100.0);
        let rendered: Vec<_> = track.track().rendered().collect();
        assert_eq!(rendered.len(), 18);
        assert_eq!(rendered[3], (1, 0, &"a"));
    }

    #[test]
    fn cancel_interactions_clears_state() {
        let mut track = measured(Direction::Left, 100.0);
        track.on_hover_change(true);
        track.on_drag_start(Point::default(), ms(0));
        track.cancel_interactions();
        assert!(!track.is_dragging());
        assert!(!track.is_hovered());
        assert_eq!(track.target_velocity(), 100.0);
    }

    #[test]
    fn switching_axis_drops_measurement() {
        let mut track = measured(Direction::Left, 100.0);
        track.set_autoplay(100.0, Direction::Down);
        assert!(!track.track().is_measured());
        assert_eq!(track.track().axis(), Axis::Vertical);
    }
}
