//! handbell - play a plain-text song through the default audio device
//!
//! Run with: cargo run -- song.txt

mod app;
mod signal;

use std::path::PathBuf;

use clap::{error::ErrorKind, Parser};
use handbell::{PlayerConfig, GAP_SAMPLES, MEASURE_LENGTH_SECS, SAMPLE_RATE};
use tracing_subscriber::EnvFilter;

/// Play a plain-text song through the default audio device.
///
/// Each line of the song is `<NOTE> <LENGTH>`, e.g. `C4 4`.
#[derive(Parser, Debug)]
#[command(name = "handbell", version, about)]
pub struct Args {
    /// Song file to play
    pub song: PathBuf,

    /// Validate the song and exit without playing it
    #[arg(long)]
    pub check: bool,

    /// Don't print each note as it plays
    #[arg(short, long)]
    pub quiet: bool,

    /// Source sample rate in Hz
    #[arg(long, value_name = "HZ", default_value_t = SAMPLE_RATE,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub sample_rate: u32,

    /// Length of one measure in seconds
    #[arg(long, value_name = "SECS", default_value_t = MEASURE_LENGTH_SECS,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub measure_secs: u32,

    /// Silent samples written after every note
    #[arg(long, value_name = "SAMPLES", default_value_t = GAP_SAMPLES)]
    pub gap: usize,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn player_config(&self) -> PlayerConfig {
        PlayerConfig::default()
            .sample_rate(self.sample_rate)
            .measure_length_secs(self.measure_secs)
            .gap_samples(self.gap)
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => err.exit(),
        Err(err) => {
            // Usage errors exit 1, not clap's default 2
            let _ = err.print();
            std::process::exit(1);
        }
    };

    init_tracing(args.verbose);
    app::run(&args)
}

fn init_tracing(verbose: u8) {
    let default_directive = match verbose {
        0 => "handbell=info",
        1 => "handbell=debug",
        _ => "handbell=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
