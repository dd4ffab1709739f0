//! ticksynth - play a patch from the first MIDI keyboard found
//!
//! Run with: cargo run -- --patch organ

mod app;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use app::Ticksynth;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PatchKind {
    Organ,
    Subtractive,
    PhaseMod,
}

#[derive(Debug, Parser)]
#[command(version, about = "Per-sample monophonic synthesizer")]
struct Args {
    /// TOML file with engine settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Instrument to play
    #[arg(long, value_enum, default_value_t = PatchKind::Organ)]
    patch: PatchKind,

    /// Stop after this many seconds (runs until killed otherwise)
    #[arg(long)]
    seconds: Option<f64>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    Ticksynth::new(args.patch)
        .config_file(args.config)
        .seconds(args.seconds)
        .run()
}
