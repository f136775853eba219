//! Scripted runs over the headless frame simulator.
//!
//! A run builds an engine, starts a [`MotionClock`] on a [`FrameSimulator`]
//! and replays a list of [`Cue`]s as virtual time passes. After every refresh
//! one JSON record is written to the output.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use std::time::Duration;

use glide::clock::MotionClock;
use glide::geometry::{Axis, Point, Rect};
use glide::simulator::{FrameSimulator, ManualScheduler};
use glide::tilt::{TiltPhase, TiltResponder};
use glide::track::{LoopTrack, Track};
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::{MarqueeArgs, MarqueeScript, TiltArgs, TiltInput};
use crate::config::Config;

/// Spacing of scripted pointer samples.
const SAMPLE_INTERVAL: Duration = Duration::from_millis(20);

/// Distance covered by each scripted drag sample, in px.
const DRAG_STEP: f64 = 24.0;

/// Samples in a scripted drag.
const DRAG_SAMPLES: u32 = 5;

/// A scripted input delivered once virtual time reaches `at`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cue<E> {
    /// Virtual time of the event; also used as its timestamp.
    pub at: Duration,
    /// The input.
    pub event: E,
}

/// Inputs understood by the marquee run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarqueeEvent {
    HoverEnter,
    HoverLeave,
    Press(Point),
    Move(Point),
    Release,
}

/// Inputs understood by the tilt run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TiltEvent {
    Enter,
    Move(Point),
    Leave,
    TouchStart(Point),
    TouchMove(Point),
    TouchEnd,
}

/// One marquee frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackFrame {
    pub time_ms: f64,
    pub offset: f64,
    pub velocity: f64,
    pub target: f64,
    pub copies: usize,
    pub hovered: bool,
    pub dragging: bool,
    pub transform: String,
}

/// One tilt frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoseFrame {
    pub time_ms: f64,
    pub phase: &'static str,
    pub rotate_x: f64,
    pub rotate_y: f64,
    pub caption_rotation: f64,
    pub scale: f64,
    pub caption_opacity: f64,
    pub reset_pending: bool,
}

/// Totals reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Records written.
    pub records: usize,
    /// Refreshes delivered to the clock.
    pub frames: usize,
    /// Refreshes that reached the engine.
    pub ticks: usize,
    /// Cues replayed.
    pub cues: usize,
}

fn at_fraction(duration: Duration, fraction: f64) -> Duration {
    duration.mul_f64(fraction)
}

fn millis(time: Duration) -> f64 {
    time.as_secs_f64() * 1000.0
}

fn point_on(axis: Axis, along: f64, across: f64) -> Point {
    match axis {
        Axis::Horizontal => Point::new(along, across),
        Axis::Vertical => Point::new(across, along),
    }
}

/// Builds the marquee cue list for `script` over a run of `duration`.
///
/// Hovering covers 15%..35% of the run. The drag starts at 50% and pulls the
/// strip backwards by [`DRAG_STEP`] per sample before releasing.
pub fn marquee_script(
    script: MarqueeScript,
    axis: Axis,
    duration: Duration,
) -> Vec<Cue<MarqueeEvent>> {
    let mut cues = Vec::new();
    if script.hovers() {
        cues.push(Cue {
            at: at_fraction(duration, 0.15),
            event: MarqueeEvent::HoverEnter,
        });
        cues.push(Cue {
            at: at_fraction(duration, 0.35),
            event: MarqueeEvent::HoverLeave,
        });
    }
    if script.drags() {
        let start = at_fraction(duration, 0.5);
        let origin = 400.0;
        cues.push(Cue {
            at: start,
            event: MarqueeEvent::Press(point_on(axis, origin, 20.0)),
        });
        for step in 1..=DRAG_SAMPLES {
            let along = origin - DRAG_STEP * f64::from(step);
            cues.push(Cue {
                at: start + SAMPLE_INTERVAL * step,
                event: MarqueeEvent::Move(point_on(axis, along, 20.0)),
            });
        }
        cues.push(Cue {
            at: start + SAMPLE_INTERVAL * DRAG_SAMPLES,
            event: MarqueeEvent::Release,
        });
    }
    cues
}

/// Builds the tilt cue list: a diagonal sweep across `surface` between 10%
/// and 45% of the run, played with the mouse or a finger.
pub fn tilt_script(input: TiltInput, surface: Rect, duration: Duration) -> Vec<Cue<TiltEvent>> {
    let start = at_fraction(duration, 0.1);
    let end = at_fraction(duration, 0.45);
    let span = end.saturating_sub(start);
    let along = |at: Duration| {
        let t = if span.is_zero() {
            0.0
        } else {
            (at - start).as_secs_f64() / span.as_secs_f64()
        };
        let t = 0.1 + 0.8 * t.min(1.0);
        Point::new(
            surface.left + surface.width * t,
            surface.top + surface.height * t,
        )
    };

    let mut cues = Vec::new();
    let mut at = start;
    match input {
        TiltInput::Mouse => cues.push(Cue {
            at,
            event: TiltEvent::Enter,
        }),
        TiltInput::Touch => cues.push(Cue {
            at,
            event: TiltEvent::TouchStart(along(at)),
        }),
    }
    while at < end {
        let point = along(at);
        cues.push(Cue {
            at,
            event: match input {
                TiltInput::Mouse => TiltEvent::Move(point),
                TiltInput::Touch => TiltEvent::TouchMove(point),
            },
        });
        at += SAMPLE_INTERVAL;
    }
    cues.push(Cue {
        at: end,
        event: match input {
            TiltInput::Mouse => TiltEvent::Leave,
            TiltInput::Touch => TiltEvent::TouchEnd,
        },
    });
    cues
}

fn simulator(config: &Config) -> FrameSimulator {
    let clock = MotionClock::new(ManualScheduler::new())
        .with_max_delta(config.motion.clock.max_frame_delta)
        .with_reduced_motion(config.motion.clock.reduced_motion);
    FrameSimulator::with_clock(clock, config.fps)
}

/// Replays `cues` while stepping `sim` until `duration` has passed.
fn play<E: Copy>(
    sim: &mut FrameSimulator,
    duration: Duration,
    cues: &[Cue<E>],
    mut apply: impl FnMut(E, Duration),
    mut record: impl FnMut(Duration) -> anyhow::Result<()>,
) -> anyhow::Result<Summary> {
    let mut next = 0;
    let mut records = 0;
    while sim.now() < duration {
        while let Some(cue) = cues.get(next).filter(|cue| cue.at <= sim.now()) {
            apply(cue.event, cue.at);
            next += 1;
        }
        sim.step();
        record(sim.now())?;
        records += 1;
    }
    Ok(Summary {
        records,
        frames: sim.frames(),
        ticks: sim.ticks(),
        cues: next,
    })
}

fn emit(out: &mut impl Write, record: &impl Serialize) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, record)?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Runs the scripted marquee and writes one [`TrackFrame`] per refresh.
///
/// # Errors
///
/// Fails if the output cannot be written.
pub fn run_marquee(
    config: &Config,
    args: &MarqueeArgs,
    out: &mut impl Write,
) -> anyhow::Result<Summary> {
    let mut sim = simulator(config);
    let items = (0..args.items).map(|i| format!("item-{i}")).collect();

    let engine = Rc::new(RefCell::new(LoopTrack::new(config.motion.track.clone())));
    let axis = {
        let mut engine = engine.borrow_mut();
        engine.configure(
            Track::new(items),
            config.motion.track.speed,
            config.motion.track.direction,
        );
        engine.set_reduced_motion(sim.clock().reduced_motion());
        if !engine.measure(args.container, args.sequence) {
            tracing::warn!(
                sequence = args.sequence,
                "sequence has no measurable size, the track will not move"
            );
        }
        engine.track().axis()
    };
    info!(
        copies = engine.borrow().track().copies(),
        direction = %config.motion.track.direction,
        speed = config.motion.track.speed,
        "marquee run"
    );

    let driven = Rc::clone(&engine);
    sim.clock_mut().start(move |dt| driven.borrow_mut().tick(dt));

    let cues = marquee_script(args.script, axis, config.duration);
    let summary = play(
        &mut sim,
        config.duration,
        &cues,
        |event, at| {
            let mut engine = engine.borrow_mut();
            debug!(?event, at_ms = millis(at), "cue");
            match event {
                MarqueeEvent::HoverEnter => engine.on_hover_change(true),
                MarqueeEvent::HoverLeave => engine.on_hover_change(false),
                MarqueeEvent::Press(point) => engine.on_drag_start(point, at),
                MarqueeEvent::Move(point) => engine.on_drag_move(point, at),
                MarqueeEvent::Release => {
                    let momentum = engine.on_drag_end();
                    debug!(?momentum, "released");
                }
            }
        },
        |now| {
            let engine = engine.borrow();
            emit(
                &mut *out,
                &TrackFrame {
                    time_ms: millis(now),
                    offset: engine.offset(),
                    velocity: engine.velocity(),
                    target: engine.target_velocity(),
                    copies: engine.track().copies(),
                    hovered: engine.is_hovered(),
                    dragging: engine.is_dragging(),
                    transform: engine.transform().to_css(),
                },
            )
        },
    )?;
    sim.clock_mut().stop();
    Ok(summary)
}

const fn phase_name(phase: TiltPhase) -> &'static str {
    match phase {
        TiltPhase::Idle => "idle",
        TiltPhase::Active => "active",
    }
}

/// Runs the scripted tilt path and writes one [`PoseFrame`] per refresh.
///
/// Under reduced motion the card ignores input and stays at rest.
///
/// # Errors
///
/// Fails if the output cannot be written.
pub fn run_tilt(config: &Config, args: &TiltArgs, out: &mut impl Write) -> anyhow::Result<Summary> {
    let mut sim = simulator(config);
    let surface = Rect::new(0.0, 0.0, args.width, args.height);
    let engine = Rc::new(RefCell::new(TiltResponder::new(config.motion.tilt.clone())));
    let reduced_motion = sim.clock().reduced_motion();
    info!(input = ?args.input, reduced_motion, "tilt run");

    let driven = Rc::clone(&engine);
    sim.clock_mut().start(move |dt| driven.borrow_mut().tick(dt));

    let cues = if reduced_motion {
        Vec::new()
    } else {
        tilt_script(args.input, surface, config.duration)
    };
    let summary = play(
        &mut sim,
        config.duration,
        &cues,
        |event, at| {
            let mut engine = engine.borrow_mut();
            debug!(?event, at_ms = millis(at), "cue");
            match event {
                TiltEvent::Enter => engine.on_pointer_enter(),
                TiltEvent::Move(point) => engine.on_pointer_move(point, surface),
                TiltEvent::Leave => engine.on_pointer_leave_mouse(),
                TiltEvent::TouchStart(point) => engine.on_touch_start(point, surface),
                TiltEvent::TouchMove(point) => engine.on_touch_move(point, surface),
                TiltEvent::TouchEnd => engine.on_touch_end(),
            }
        },
        |now| {
            let engine = engine.borrow();
            let pose = engine.pose();
            emit(
                &mut *out,
                &PoseFrame {
                    time_ms: millis(now),
                    phase: phase_name(engine.phase()),
                    rotate_x: pose.rotate_x,
                    rotate_y: pose.rotate_y,
                    caption_rotation: pose.caption_rotation,
                    scale: pose.scale,
                    caption_opacity: pose.caption_opacity,
                    reset_pending: engine.is_reset_pending(),
                },
            )
        },
    )?;
    sim.clock_mut().stop();
    Ok(summary)
}
