//! Command-line interface for the `glide` runner.
//!
//! # Examples
//!
//! ```bash
//! # Four seconds of the scripted marquee at 60 fps
//! glide marquee --duration 4000
//!
//! # A right-running strip with settings from a file
//! glide --config motion.toml marquee --direction right --speed 80
//!
//! # Touch path on a tilt card, with debug logging on stderr
//! glide -vv tilt --input touch
//!
//! # Effective configuration as TOML
//! glide config
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use glide::track::Direction;

/// Drives the glide motion engines through virtual time.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "glide",
    author,
    version,
    about = "Headless runner for the glide motion engines",
    long_about = "Runs scripted pointer and hover input through the marquee and tilt \
                  engines on a virtual frame clock and prints one JSON record per frame."
)]
pub struct Cli {
    /// TOML file with engine tunables
    ///
    /// Flags given on the command line win over values from the file
    #[arg(long, short = 'c', env = "GLIDE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Virtual refresh rate
    #[arg(
        long,
        default_value_t = 60,
        global = true,
        value_parser = clap::value_parser!(u32).range(1..=1000)
    )]
    pub fps: u32,

    /// Length of the run in milliseconds
    #[arg(long, default_value_t = 3000, global = true)]
    pub duration: u64,

    /// Behave as if the user asked for reduced motion
    #[arg(long, env = "GLIDE_REDUCED_MOTION", global = true)]
    pub reduced_motion: bool,

    /// Enable verbose logging (repeat for more)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the marquee script and print track records
    Marquee(MarqueeArgs),

    /// Run a pointer or touch path over a tilt card and print pose records
    Tilt(TiltArgs),

    /// Print the effective configuration as TOML
    Config,
}

/// Arguments for the marquee run.
#[derive(Parser, Debug, Clone)]
pub struct MarqueeArgs {
    /// Travel direction (left, right, up, down)
    #[arg(long, short = 'd')]
    pub direction: Option<Direction>,

    /// Autoplay speed in px/s; negative values reverse the direction
    #[arg(long, short = 's', allow_negative_numbers = true)]
    pub speed: Option<f64>,

    /// Speed while hovered in px/s
    #[arg(long, allow_negative_numbers = true)]
    pub hover_speed: Option<f64>,

    /// Container extent along the travel axis, in px
    #[arg(long, default_value_t = 1000.0)]
    pub container: f64,

    /// Extent of one full item sequence, in px
    #[arg(long, default_value_t = 300.0)]
    pub sequence: f64,

    /// Number of items in the sequence
    #[arg(long, default_value_t = 6)]
    pub items: usize,

    /// Which interactions the script performs
    #[arg(long, default_value = "full")]
    pub script: MarqueeScript,
}

/// Scripted interactions for the marquee run.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MarqueeScript {
    /// Autoplay only
    Autoplay,
    /// Hover in and out
    Hover,
    /// Drag and release with momentum
    Drag,
    /// Hover, then drag and release
    #[default]
    Full,
}

impl MarqueeScript {
    /// Whether the script hovers the track.
    #[must_use]
    pub const fn hovers(self) -> bool {
        matches!(self, Self::Hover | Self::Full)
    }

    /// Whether the script drags the track.
    #[must_use]
    pub const fn drags(self) -> bool {
        matches!(self, Self::Drag | Self::Full)
    }
}

/// Arguments for the tilt run.
#[derive(Parser, Debug, Clone)]
pub struct TiltArgs {
    /// Input device the path is played with
    #[arg(long, short = 'i', default_value = "mouse")]
    pub input: TiltInput,

    /// Surface width in px
    #[arg(long, default_value_t = 300.0)]
    pub width: f64,

    /// Surface height in px
    #[arg(long, default_value_t = 300.0)]
    pub height: f64,
}

/// Pointer kinds for the tilt run.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TiltInput {
    /// Enter, sweep, leave
    #[default]
    Mouse,
    /// Touch, sweep, lift and wait out the grace period
    Touch,
}

impl Cli {
    /// Parse command line arguments.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create CLI from iterator (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if argument parsing fails.
    pub fn try_parse_from<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Get log level based on verbosity.
    #[must_use]
    pub const fn log_level(&self) -> LogLevel {
        match self.verbose {
            0 => LogLevel::Warn,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

/// Log level for the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Only show warnings and errors
    Warn,
    /// Show info messages
    Info,
    /// Show debug messages
    Debug,
    /// Show all messages including trace
    Trace,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    #[must_use]
    pub const fn as_directive(self) -> &'static str {
        match self {
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::try_parse_from(["glide", "marquee"]).unwrap();

        assert!(cli.config.is_none());
        assert_eq!(cli.fps, 60);
        assert_eq!(cli.duration, 3000);
        assert!(!cli.reduced_motion);
        let Command::Marquee(args) = cli.command else {
            panic!("expected marquee");
        };
        assert!(args.direction.is_none());
        assert!(args.speed.is_none());
        assert_eq!(args.script, MarqueeScript::Full);
    }

    #[test]
    fn cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["glide"]).is_err());
    }

    #[test]
    fn cli_parses_direction_case_insensitively() {
        let cli = Cli::try_parse_from(["glide", "marquee", "--direction", "Right"]).unwrap();
        let Command::Marquee(args) = cli.command else {
            panic!("expected marquee");
        };
        assert_eq!(args.direction, Some(Direction::Right));

        assert!(Cli::try_parse_from(["glide", "marquee", "-d", "sideways"]).is_err());
    }

    #[test]
    fn cli_accepts_negative_speed() {
        let cli = Cli::try_parse_from(["glide", "marquee", "--speed", "-40"]).unwrap();
        let Command::Marquee(args) = cli.command else {
            panic!("expected marquee");
        };
        assert_eq!(args.speed, Some(-40.0));
    }

    #[test]
    fn cli_global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "glide",
            "tilt",
            "--fps",
            "30",
            "--duration",
            "500",
            "--reduced-motion",
            "--input",
            "touch",
        ])
        .unwrap();

        assert_eq!(cli.fps, 30);
        assert_eq!(cli.duration, 500);
        assert!(cli.reduced_motion);
        let Command::Tilt(args) = cli.command else {
            panic!("expected tilt");
        };
        assert_eq!(args.input, TiltInput::Touch);
    }

    #[test]
    fn cli_rejects_zero_fps() {
        assert!(Cli::try_parse_from(["glide", "--fps", "0", "marquee"]).is_err());
    }

    #[test]
    fn cli_parses_verbose() {
        let cli = Cli::try_parse_from(["glide", "config"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.log_level(), LogLevel::Warn);

        let cli = Cli::try_parse_from(["glide", "-v", "config"]).unwrap();
        assert_eq!(cli.log_level(), LogLevel::Info);

        let cli = Cli::try_parse_from(["glide", "-vv", "config"]).unwrap();
        assert_eq!(cli.log_level(), LogLevel::Debug);

        let cli = Cli::try_parse_from(["glide", "config", "-vvv"]).unwrap();
        assert_eq!(cli.log_level(), LogLevel::Trace);
        assert_eq!(cli.log_level().as_directive(), "trace");
    }

    #[test]
    fn script_flags() {
        assert!(MarqueeScript::Full.hovers() && MarqueeScript::Full.drags());
        assert!(!MarqueeScript::Autoplay.hovers() && !MarqueeScript::Autoplay.drags());
        assert!(MarqueeScript::Drag.drags() && !MarqueeScript::Drag.hovers());
    }
}
