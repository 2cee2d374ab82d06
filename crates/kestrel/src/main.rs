use std::path::PathBuf;

use clap::Parser;
use kestrel::{DemoConfig, Fireworks};
use kestrel_draw::HeadlessBackend;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file in RON format (default: kestrel.ron if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(long)]
    frames: Option<u64>,

    /// Seed for rocket launches and bursts
    #[arg(long)]
    seed: Option<u64>,

    /// Render every frame even when nothing changed
    #[arg(long)]
    continuous: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = DemoConfig::load(args.config.as_deref())?;
    if let Some(frames) = args.frames {
        config.run.frames = frames;
    }
    if let Some(seed) = args.seed {
        config.run.seed = seed;
    }
    if args.continuous {
        config.display.continuous_render = true;
    }

    log::info!(
        "Starting Kestrel fireworks: {} frames at {}x{}, seed {}",
        config.run.frames,
        config.display.width,
        config.display.height,
        config.run.seed
    );

    let backend =
        HeadlessBackend::new(config.display.width, config.display.height).with_recording(false);
    let frames = config.run.frames;
    let mut fireworks = Fireworks::new(backend, config)?;
    fireworks.run(frames)?;
    fireworks.shutdown();

    Ok(())
}
