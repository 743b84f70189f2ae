//! Scripted headless session.
//!
//! Drives a [`Scene`] through the same pointer and key events a window would
//! send: a stroke of drops across the surface, a sphere grabbed and pulled up
//! through the water, then released with physics on so it falls back in.

use std::path::PathBuf;

use glam::Vec3;
use serde::Serialize;
use wavepool::{InteractionMode, OrbitCamera, Scene, SceneKey, SimConfig, Viewport};

use crate::app::FrameData;

pub const DEFAULT_FRAMES: usize = 240;
const FRAME_DT: f32 = 1.0 / 60.0;
const SAMPLE_EVERY: usize = 10;

// Script timeline, in frames
const STROKE_START: usize = 0;
const STROKE_END: usize = 12;
const GRAB_START: usize = 20;
const GRAB_END: usize = 44;
const PHYSICS_ON: usize = 48;
const LIGHT_FROM_CAMERA: usize = 60;

/// Pixels the pointer moves per frame while lifting the sphere.
const LIFT_STEP: f32 = 6.0;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DemoArgs {
    pub config: Option<PathBuf>,
    pub frames: usize,
    pub dump: Option<PathBuf>,
}

impl DemoArgs {
    /// Parse `[--config path.json] [--frames N] [--dump out.json]`.
    pub fn parse<I>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Self {
            frames: DEFAULT_FRAMES,
            ..Default::default()
        };
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let mut value = || args.next().ok_or_else(|| format!("{arg} expects a value"));
            match arg.as_str() {
                "--config" => parsed.config = Some(PathBuf::from(value()?)),
                "--dump" => parsed.dump = Some(PathBuf::from(value()?)),
                "--frames" => {
                    let raw = value()?;
                    parsed.frames = raw
                        .parse()
                        .map_err(|e| format!("invalid --frames {raw:?}: {e}"))?;
                }
                other => return Err(format!("unknown argument {other:?}")),
            }
        }
        Ok(parsed)
    }
}

/// Snapshot taken every few frames.
#[derive(Clone, Debug, Serialize)]
pub struct FrameStats {
    pub frame: usize,
    pub mode: String,
    pub max_height: f32,
    pub mean_caustic: f32,
    pub sphere_center: [f32; 3],
    pub sphere_velocity: [f32; 3],
}

#[derive(Clone, Debug, Serialize)]
pub struct SessionSummary {
    pub frames: usize,
    pub resolution: usize,
    pub drops_mode_frames: usize,
    pub sphere_mode_frames: usize,
    pub floor_contacts: usize,
    pub peak_height: f32,
    pub final_max_height: f32,
    pub final_sphere_center: [f32; 3],
    pub samples: Vec<FrameStats>,
}

/// Pixel at which a world point appears.
pub fn project_to_pixel(camera: &OrbitCamera, viewport: Viewport, p: Vec3) -> (f32, f32) {
    let clip = camera.view_projection(viewport.aspect()) * p.extend(1.0);
    let ndc = clip.truncate() / clip.w;
    (
        viewport.x + (ndc.x + 1.0) * 0.5 * viewport.width,
        viewport.y + (1.0 - (ndc.y + 1.0) * 0.5) * viewport.height,
    )
}

/// Pointer and key events for frame `frame`, applied before it is simulated.
fn apply_script(scene: &mut Scene, viewport: Viewport, frame: usize, pointer: &mut (f32, f32)) {
    match frame {
        STROKE_START => {
            *pointer = project_to_pixel(scene.camera(), viewport, Vec3::new(-0.6, 0.0, -0.2));
            scene.pointer_down(viewport, pointer.0, pointer.1);
        }
        f if f > STROKE_START && f < STROKE_END => {
            let t = (f - STROKE_START) as f32 / (STROKE_END - STROKE_START) as f32;
            let p = Vec3::new(-0.6 + 1.2 * t, 0.0, -0.2 + 0.4 * t);
            *pointer = project_to_pixel(scene.camera(), viewport, p);
            scene.pointer_move(viewport, pointer.0, pointer.1);
        }
        STROKE_END => scene.pointer_up(),
        GRAB_START => {
            *pointer = project_to_pixel(scene.camera(), viewport, scene.sphere.center);
            let mode = scene.pointer_down(viewport, pointer.0, pointer.1);
            if mode != InteractionMode::MoveSphere {
                log::warn!("frame {frame}: expected to grab the sphere, got {mode:?}");
            }
        }
        f if f > GRAB_START && f < GRAB_END => {
            pointer.1 -= LIFT_STEP;
            scene.pointer_move(viewport, pointer.0, pointer.1);
        }
        GRAB_END => scene.pointer_up(),
        PHYSICS_ON => {
            if !scene.sphere_physics {
                scene.key(SceneKey::TogglePhysics);
            }
        }
        LIGHT_FROM_CAMERA => scene.key(SceneKey::LightFromCamera),
        _ => {}
    }
}

fn mean_caustic(scene: &Scene) -> f32 {
    let caustics = scene.water.caustics();
    caustics.iter().map(|s| s.intensity).sum::<f32>() / caustics.len() as f32
}

/// Run the scripted session for `frames` frames.
pub fn run_session(config: &SimConfig, frames: usize, viewport: Viewport) -> SessionSummary {
    let mut scene = Scene::new(config);
    let mut frame_data = FrameData::capture(&scene, viewport);
    let mut pointer = (0.0, 0.0);

    let mut summary = SessionSummary {
        frames,
        resolution: scene.water.width,
        drops_mode_frames: 0,
        sphere_mode_frames: 0,
        floor_contacts: 0,
        peak_height: scene.water.max_abs_height(),
        final_max_height: 0.0,
        final_sphere_center: [0.0; 3],
        samples: Vec::new(),
    };

    for frame in 0..frames {
        apply_script(&mut scene, viewport, frame, &mut pointer);
        match scene.mode() {
            InteractionMode::AddDrops => summary.drops_mode_frames += 1,
            InteractionMode::MoveSphere => summary.sphere_mode_frames += 1,
            _ => {}
        }

        let report = scene.frame(FRAME_DT);
        if report.floor_contact {
            summary.floor_contacts += 1;
        }
        frame_data.update(&scene, viewport);

        let max_height = scene.water.max_abs_height();
        summary.peak_height = summary.peak_height.max(max_height);

        if frame % SAMPLE_EVERY == 0 {
            let stats = FrameStats {
                frame,
                mode: format!("{:?}", scene.mode()),
                max_height,
                mean_caustic: mean_caustic(&scene),
                sphere_center: scene.sphere.center.to_array(),
                sphere_velocity: scene.sphere.velocity.to_array(),
            };
            log::debug!(
                "frame {:4}: max |h| {:.5}, mean caustic {:.4}, sphere {:?}, {} KiB uploaded",
                frame,
                stats.max_height,
                stats.mean_caustic,
                stats.sphere_center,
                (frame_data.water_bytes().len() + frame_data.caustic_bytes().len()) / 1024
            );
            summary.samples.push(stats);
        }
        if frame % 60 == 59 {
            log::info!(
                "{} frames, max |h| {:.5}, sphere y {:.3}",
                frame + 1,
                max_height,
                scene.sphere.center.y
            );
        }
    }

    summary.final_max_height = scene.water.max_abs_height();
    summary.final_sphere_center = scene.sphere.center.to_array();
    summary
}
