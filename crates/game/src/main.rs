//! Wavepool headless demo
//!
//! Runs the scripted pool session without a window and reports what the
//! water and the sphere did.
//!
//! Usage: `pool_demo [--config path.json] [--frames N] [--dump out.json]`
//! Set `RUST_LOG=debug` for per-frame statistics.

use std::error::Error;

use game::demo::{run_session, DemoArgs};
use wavepool::{SimConfig, Viewport};

const VIEWPORT_WIDTH: f32 = 800.0;
const VIEWPORT_HEIGHT: f32 = 600.0;

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        log::error!("pool_demo failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = DemoArgs::parse(std::env::args().skip(1))?;

    let config = match &args.config {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            SimConfig::load_json(path)?
        }
        None => SimConfig::default(),
    };

    let viewport = Viewport::from_size(VIEWPORT_WIDTH, VIEWPORT_HEIGHT);
    let summary = run_session(&config, args.frames, viewport);

    log::info!(
        "Done: {} frames at {}x{}, peak |h| {:.5}, final |h| {:.5}",
        summary.frames,
        summary.resolution,
        summary.resolution,
        summary.peak_height,
        summary.final_max_height
    );
    log::info!(
        "Sphere ended at {:?} after {} floor contacts",
        summary.final_sphere_center,
        summary.floor_contacts
    );

    if let Some(path) = &args.dump {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(path, json)?;
        log::info!("Wrote summary to {}", path.display());
    }
    Ok(())
}
