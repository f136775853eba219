//! Runtime configuration for the `glide` runner.
//!
//! Engine tunables come from [`MotionConfig`]: defaults, then the file given
//! with `--config`, then command-line flags. The result is validated once
//! every layer has been applied.

use std::time::Duration;

use anyhow::Context as _;
use glide::config::MotionConfig;

use crate::cli::{Cli, Command};

/// Everything a run needs, resolved from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Engine tunables after layering.
    pub motion: MotionConfig,
    /// Virtual refresh rate.
    pub fps: u32,
    /// Length of the run.
    pub duration: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            motion: MotionConfig::default(),
            fps: 60,
            duration: Duration::from_secs(3),
        }
    }
}

impl Config {
    /// Create config from CLI arguments.
    ///
    /// # Errors
    ///
    /// Fails when the config file cannot be read or parsed, or when the
    /// layered result is out of range.
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let mut motion = match &cli.config {
            Some(path) => MotionConfig::load(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => MotionConfig::default(),
        };

        if cli.reduced_motion {
            motion.clock.reduced_motion = Some(true);
        }
        if let Command::Marquee(args) = &cli.command {
            if let Some(speed) = args.speed {
                motion.track.speed = speed;
            }
            if let Some(direction) = args.direction {
                motion.track.direction = direction;
            }
            if let Some(hover_speed) = args.hover_speed {
                motion.track.hover_speed = Some(hover_speed);
            }
        }
        motion
            .validate()
            .context("invalid configuration after applying flags")?;

        Ok(Self {
            motion,
            fps: cli.fps,
            duration: Duration::from_millis(cli.duration),
        })
    }
}
