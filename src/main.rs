//! Headless host for the ray caster: renders a scene for a number of frames and
//! saves the last one as a PNG.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use image::{imageops, RgbaImage};
use log::info;

use raycast::{Config, Picture, RGBA8};

#[derive(Parser, Debug)]
#[command(version, about = "Ray casts a scene of implicit surfaces into a PNG")]
struct Args {
    /// Scene description (JSON). The built-in scene is used when omitted.
    #[arg(long)]
    scene: Option<PathBuf>,
    #[arg(long, default_value_t = 720)]
    width: u32,
    #[arg(long, default_value_t = 720)]
    height: u32,
    /// Frames to render; the light turns between frames.
    #[arg(long, default_value_t = 1)]
    frames: u32,
    #[arg(short, long, default_value = "frame.png")]
    output: PathBuf,
}

fn save(picture: &Picture<RGBA8>, path: &Path) -> Result<()> {
    let image = RgbaImage::from_raw(picture.width(), picture.height(), picture.as_bytes().to_vec())
        .context("frame buffer does not match its dimensions")?;
    // pictures start at the bottom row, image files at the top
    imageops::flip_vertical(&image)
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::builder().target(env_logger::Target::Stdout).init();

    let args = Args::parse();
    let config = match &args.scene {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };
    let mut renderer = config.renderer()?;
    info!(
        target: "app",
        "Rendering {} objects at {}x{} for {} frames",
        renderer.scene().objects().len(),
        args.width,
        args.height,
        args.frames,
    );

    let start = Instant::now();
    let mut picture = renderer.render_frame(args.width, args.height);
    for _ in 1..args.frames {
        picture = renderer.render_frame(args.width, args.height);
    }
    info!(target: "app", "All frames done. Took {:?}", start.elapsed());

    save(&picture, &args.output)?;
    info!(target: "app", "Saved {}", args.output.display());
    Ok(())
}
