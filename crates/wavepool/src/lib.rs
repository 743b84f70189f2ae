//! Interactive Pool Water Simulation
//!
//! A height-field water surface in a unit pool, a sphere that can be dragged
//! through it or left to float, and the picking and caustics math needed to
//! drive a renderer. Everything here runs on the CPU; rendering lives
//! downstream.
//!
//! # Example
//!
//! ```
//! use wavepool::{Scene, SimConfig, Viewport};
//!
//! let config = SimConfig { resolution: 32, seed: Some(7), ..Default::default() };
//! let mut scene = Scene::new(&config);
//! let viewport = Viewport::from_size(800.0, 600.0);
//!
//! // Press on the water, then advance a frame
//! scene.pointer_down(viewport, 400.0, 400.0);
//! scene.pointer_up();
//! scene.frame(1.0 / 60.0);
//! ```

pub mod camera;
pub mod config;
pub mod constants;
pub mod interaction;
pub mod math;
pub mod raytracer;
pub mod scene;
pub mod sphere;
pub mod water;

pub use camera::OrbitCamera;
pub use config::SimConfig;
pub use glam::{Mat4, Vec3};
pub use interaction::{
    pick_water_plane, pointer_down, pointer_move, pointer_up, InteractionMode, InteractionState,
    PointerTargets,
};
pub use raytracer::{HitTest, Raytracer, Viewport};
pub use scene::{FrameReport, FrameStage, Scene, SceneKey};
pub use sphere::SphereBody;
pub use water::{volume_in_sphere, CausticSample, Water};
