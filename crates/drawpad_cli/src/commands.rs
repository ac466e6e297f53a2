//! Subcommand implementations

use anyhow::{Context, Result};
use drawpad::{DrawPad, DrawPadConfig};
use drawpad_paint::format_number;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings shared by every subcommand
pub struct Options {
    pub config: Option<PathBuf>,
    pub strict: bool,
}

/// Upper bound on simulated frames so a bad duration cannot spin forever
const MAX_REPLAY_FRAMES: usize = 100_000;

fn load_config(opts: &Options) -> Result<DrawPadConfig> {
    match &opts.config {
        Some(path) => DrawPadConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(DrawPadConfig::default()),
    }
}

fn read_paths(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of path strings", path.display()))
}

/// Build a pad holding the drawing in `paths`
fn load_pad(opts: &Options, paths: &Path) -> Result<DrawPad> {
    let mut pad = DrawPad::new(load_config(opts)?);
    let data = read_paths(paths)?;
    if opts.strict {
        pad.try_set_paths(data)
            .with_context(|| format!("Invalid drawing in {}", paths.display()))?;
    } else {
        pad.set_paths(data);
    }
    tracing::info!(
        strokes = pad.get_paths().len(),
        length = pad.total_length(),
        "loaded drawing"
    );
    Ok(pad)
}

pub fn export(opts: &Options, paths: &Path, output: Option<&Path>) -> Result<()> {
    let pad = load_pad(opts, paths)?;
    let svg = pad.get_svg();
    match output {
        Some(out) => {
            fs::write(out, svg).with_context(|| format!("Failed to write {}", out.display()))?;
            println!("Wrote {}", out.display());
        }
        None => print!("{svg}"),
    }
    Ok(())
}

pub fn length(opts: &Options, paths: &Path) -> Result<()> {
    let pad = load_pad(opts, paths)?;
    for (i, (data, len)) in pad.get_paths().iter().zip(pad.stroke_lengths()).enumerate() {
        println!("{i:>4}  {:>10}  {}", format_number(len), data);
    }
    println!("total {}", format_number(pad.total_length()));
    Ok(())
}

pub fn reveal(opts: &Options, paths: &Path, position: f32) -> Result<()> {
    anyhow::ensure!(
        (0.0..=1.0).contains(&position),
        "position must be within [0, 1], got {position}"
    );
    let pad = load_pad(opts, paths)?;
    for (i, stroke) in pad.render_strokes_at(position).iter().enumerate() {
        let frame = &stroke.reveal;
        let offset = frame
            .dash_offset
            .map(format_number)
            .unwrap_or_else(|| "-".to_string());
        let dashes: Vec<String> = frame.dash_array.iter().copied().map(format_number).collect();
        println!(
            "{i:>4}  opacity {}  dasharray {}  offset {}",
            format_number(frame.opacity),
            dashes.join(","),
            offset
        );
    }
    Ok(())
}

pub fn replay(opts: &Options, paths: &Path, fps: u32, signed_after_ms: Option<f32>) -> Result<()> {
    anyhow::ensure!(fps > 0, "fps must be positive");
    let mut pad = load_pad(opts, paths)?;
    let frame_ms = 1000.0 / fps as f32;

    pad.play();
    if !pad.is_playing() {
        println!("nothing to replay");
        return Ok(());
    }
    println!("duration {} ms", format_number(pad.duration_ms()));

    let mut elapsed = 0.0_f32;
    let mut frames = 0;
    while pad.is_animating() && frames < MAX_REPLAY_FRAMES {
        if signed_after_ms.is_some_and(|at| elapsed >= at) && pad.is_playing() {
            pad.set_signed(true);
            pad.stop();
        }
        pad.tick(frame_ms);
        elapsed += frame_ms;
        frames += 1;

        let visible = pad
            .render_strokes()
            .iter()
            .filter(|s| s.reveal.is_visible())
            .count();
        println!(
            "{:>8.1} ms  {:?}  progress {:.3}  visible {}",
            elapsed,
            pad.state(),
            pad.progress(),
            visible
        );
    }
    Ok(())
}

pub fn print_config(opts: &Options) -> Result<()> {
    let config = load_config(opts)?;
    print!("{}", config.to_toml().context("Failed to serialize config")?);
    Ok(())
}
