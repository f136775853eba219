#![forbid(unsafe_code)]

//! # Glide CLI
//!
//! Plays scripted input through the glide engines on a virtual frame clock
//! and prints one JSON record per frame.
//!
//! ## Usage
//!
//! ```bash
//! glide marquee --direction right --speed 80
//! glide tilt --input touch --duration 5000
//! glide --config motion.toml config
//! ```

use std::io::{self, BufWriter, Write as _};

use anyhow::Context as _;
use glide_demo::cli::{Cli, Command};
use glide_demo::config::Config;
use glide_demo::scenario;
use tracing_subscriber::EnvFilter;

fn init_tracing(cli: &Cli) {
    // RUST_LOG wins over -v.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().as_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    init_tracing(&cli);

    let config = Config::from_cli(&cli)?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let summary = match &cli.command {
        Command::Marquee(args) => scenario::run_marquee(&config, args, &mut out)?,
        Command::Tilt(args) => scenario::run_tilt(&config, args, &mut out)?,
        Command::Config => {
            let rendered = config
                .motion
                .to_toml_string()
                .context("failed to render configuration")?;
            out.write_all(rendered.as_bytes())?;
            out.flush()?;
            return Ok(());
        }
    };
    out.flush().context("failed to write records")?;

    tracing::info!(
        records = summary.records,
        frames = summary.frames,
        ticks = summary.ticks,
        cues = summary.cues,
        "run finished"
    );
    Ok(())
}
