#![allow(clippy::float_cmp)]
#![allow(clippy::uninlined_format_args)]

use std::time::Duration;

use glide::config::{TiltConfig, TrackConfig};
use glide::geometry::{Point, Rect};
use glide::tilt::TiltResponder;
use glide::track::{Direction, LoopTrack, Track, recompute_copies};
use proptest::prelude::*;

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Left),
        Just(Direction::Right),
        Just(Direction::Up),
        Just(Direction::Down),
    ]
}

#[derive(Debug, Clone)]
enum Input {
    Tick(f64),
    Hover(bool),
    Press(f64),
    Drag(f64, u64),
    Release,
}

fn input() -> impl Strategy<Value = Input> {
    prop_oneof![
        6 => (0.0f64..0.1).prop_map(Input::Tick),
        1 => any::<bool>().prop_map(Input::Hover),
        1 => (-500.0f64..500.0).prop_map(Input::Press),
        2 => ((-800.0f64..800.0), 0u64..50).prop_map(|(d, ms)| Input::Drag(d, ms)),
        1 => Just(Input::Release),
    ]
}

// =============================================================================
// LoopTrack invariants
// =============================================================================

proptest! {
    #[test]
    fn offset_stays_in_range(
        speed in -2000.0f64..2000.0,
        dir in direction(),
        sequence in 1.0f64..2000.0,
        container in 0.0f64..4000.0,
        inputs in proptest::collection::vec(input(), 1..200),
    ) {
        let mut track = LoopTrack::new(TrackConfig::default());
        track.configure(Track::new(vec![(); 4]), speed, dir);
        prop_assert!(track.measure(container, sequence));
        let unit = track.track().unit_length();

        let mut now = Duration::ZERO;
        let mut pointer = 0.0;
        for step in inputs {
            match step {
                Input::Tick(dt) => track.tick(dt),
                Input::Hover(h) => track.on_hover_change(h),
                Input::Press(at) => {
                    pointer = at;
                    track.on_drag_start(Point::new(at, at), now);
                }
                Input::Drag(delta, ms) => {
                    pointer += delta;
                    now += Duration::from_millis(ms);
                    track.on_drag_move(Point::new(pointer, pointer), now);
                }
                Input::Release => {
                    if let Some(momentum) = track.on_drag_end() {
                        prop_assert!(momentum.abs() <= 500.0);
                    }
                }
            }
            let offset = track.offset();
            prop_assert!(
                (0.0..unit).contains(&offset),
                "offset {} escaped [0, {})", offset, unit
            );
        }
    }

    #[test]
    fn direction_sets_travel_sense(
        speed in 1.0f64..1000.0,
        dir in direction(),
        frames in proptest::collection::vec(0.0f64..0.1, 1..100),
    ) {
        let mut track = LoopTrack::new(TrackConfig::default());
        track.configure(Track::new(vec!["a"]), speed, dir);
        track.measure(1000.0, 400.0);
        let unit = track.track().unit_length();

        for dt in frames {
            let before = track.offset();
            track.tick(dt);
            let mut moved = track.offset() - before;
            if moved > unit / 2.0 {
                moved -= unit;
            } else if moved < -unit / 2.0 {
                moved += unit;
            }
            prop_assert!(moved * dir.sign() >= -1e-9, "moved {} against {}", moved, dir);
        }
    }

    #[test]
    fn release_momentum_is_clamped_estimate(
        delta in -400.0f64..400.0,
        ms in 1u64..500,
    ) {
        let mut track = LoopTrack::new(TrackConfig::default());
        track.configure(Track::new(vec!["a"]), 100.0, Direction::Left);
        track.measure(1000.0, 300.0);

        track.on_drag_start(Point::new(0.0, 0.0), Duration::ZERO);
        track.on_drag_move(Point::new(delta, 0.0), Duration::from_millis(ms));
        let momentum = track.on_drag_end().unwrap();

        #[allow(clippy::cast_precision_loss)]
        let expected = (-delta / (ms as f64 / 1000.0)).clamp(-500.0, 500.0);
        prop_assert!((momentum - expected).abs() < 1e-6);
    }

    #[test]
    fn copies_cover_container(
        container in 0.0f64..10_000.0,
        sequence in 50.0f64..5_000.0,
    ) {
        #[allow(clippy::cast_precision_loss)]
        let copies = recompute_copies(container, sequence).unwrap() as f64;
        prop_assert!(copies >= 2.0);
        prop_assert!(copies * sequence >= container + sequence);
    }
}

// =============================================================================
// TiltResponder invariants
// =============================================================================

proptest! {
    #[test]
    fn tilt_never_exceeds_amplitude_at_steady_state(
        x in 0.0f64..=1.0,
        y in 0.0f64..=1.0,
        width in 10.0f64..800.0,
        height in 10.0f64..800.0,
    ) {
        let config = TiltConfig::default();
        let amplitude = config.rotate_amplitude;
        let surface = Rect::new(20.0, 30.0, width, height);
        let mut tilt = TiltResponder::new(config);

        tilt.on_pointer_enter();
        tilt.on_pointer_move(Point::new(20.0 + x * width, 30.0 + y * height), surface);
        for _ in 0..240 {
            tilt.tick(1.0 / 60.0);
        }

        let pose = tilt.pose();
        prop_assert!(pose.rotate_x.abs() <= amplitude + 1e-6);
        prop_assert!(pose.rotate_y.abs() <= amplitude + 1e-6);
        prop_assert!(pose.rotate_x.is_finite() && pose.rotate_y.is_finite());
    }
}
