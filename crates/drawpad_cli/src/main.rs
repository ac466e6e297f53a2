//! DrawPad CLI
//!
//! Works on drawings stored as a JSON array of SVG path strings, the format
//! `DrawPad::get_paths` produces:
//! - `export`: write the standalone SVG document
//! - `length`: per-stroke and total path length
//! - `reveal`: stroke visibility at a playback position
//! - `replay`: simulate playback frame by frame
//! - `config`: print the default configuration

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Measure, replay, and export DrawPad drawings
#[derive(Parser, Debug)]
#[command(name = "drawpad")]
#[command(about = "Measure, replay, and export DrawPad drawings")]
#[command(version)]
struct Cli {
    /// Widget configuration (drawpad.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Reject malformed path data instead of measuring it as zero
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export the drawing as SVG
    Export {
        /// JSON file with an array of path strings
        paths: PathBuf,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print stroke lengths
    Length {
        paths: PathBuf,
    },
    /// Print each stroke's reveal at a playback position
    Reveal {
        paths: PathBuf,
        /// Playback position in [0, 1]
        #[arg(short, long, default_value = "1.0")]
        position: f32,
    },
    /// Simulate playback and print progress per frame
    Replay {
        paths: PathBuf,
        /// Simulated frame rate
        #[arg(long, default_value = "60")]
        fps: u32,
        /// Stop early as if a signature was accepted
        #[arg(long)]
        signed_after_ms: Option<f32>,
    },
    /// Print the default configuration as TOML
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let opts = commands::Options {
        config: cli.config,
        strict: cli.strict,
    };

    match cli.command {
        Command::Export { paths, output } => commands::export(&opts, &paths, output.as_deref()),
        Command::Length { paths } => commands::length(&opts, &paths),
        Command::Reveal { paths, position } => commands::reveal(&opts, &paths, position),
        Command::Replay {
            paths,
            fps,
            signed_after_ms,
        } => commands::replay(&opts, &paths, fps, signed_after_ms),
        Command::Config => commands::print_config(&opts),
    }
}
